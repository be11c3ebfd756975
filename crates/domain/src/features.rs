use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 4;

/// Spectral descriptor of one energy table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    /// Mean spectral centroid over time, in the table's frequency unit.
    pub centroid_mean: f64,
    pub bandwidth_mean: f64,
    /// Mean 85% roll-off frequency.
    pub rolloff: f64,
    /// Frequency of the row with the most total energy.
    pub peak_frequency: f64,
}

impl FeatureVector {
    pub fn new(centroid_mean: f64, bandwidth_mean: f64, rolloff: f64, peak_frequency: f64) -> Self {
        Self {
            centroid_mean,
            bandwidth_mean,
            rolloff,
            peak_frequency,
        }
    }

    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.centroid_mean,
            self.bandwidth_mean,
            self.rolloff,
            self.peak_frequency,
        ]
    }

    pub fn to_array1(&self) -> Array1<f64> {
        Array1::from(self.as_array().to_vec())
    }
}
