use ndarray::ArrayView2;
use tracing::info;

use bottletap_domain::{ClassifierConfig, DomainError, FeatureVector};

use crate::kmeans::{KMeans, KMeansConfig};
use crate::scaler::StandardScaler;

/// Standardiser and k-means partition fitted together on the training
/// corpus. Every vector passes through the same scaler before prediction.
#[derive(Clone, Debug)]
pub struct ClusterModel {
    scaler: StandardScaler,
    kmeans: KMeans,
}

impl ClusterModel {
    pub fn fit(features: ArrayView2<'_, f64>, config: &ClassifierConfig) -> Result<Self, DomainError> {
        if features.nrows() < config.clusters {
            return Err(DomainError::InsufficientSamples {
                samples: features.nrows(),
                clusters: config.clusters,
            });
        }
        let scaler = StandardScaler::fit(features)?;
        let scaled = scaler.transform_matrix(features);
        let kmeans = KMeans::fit(scaled.view(), &KMeansConfig::from(config))?;
        info!(
            samples = features.nrows(),
            clusters = kmeans.clusters(),
            inertia = kmeans.inertia(),
            "fitted cluster model"
        );
        Ok(Self { scaler, kmeans })
    }

    pub fn predict(&self, features: &FeatureVector) -> usize {
        let scaled = self.scaler.transform(features.to_array1().view());
        self.kmeans.predict(scaled.view())
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn kmeans(&self) -> &KMeans {
        &self.kmeans
    }
}
