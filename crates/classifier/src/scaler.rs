use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use bottletap_domain::DomainError;

/// Per-column standardisation learned from the training matrix.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(data: ArrayView2<'_, f64>) -> Result<Self, DomainError> {
        let samples = data.nrows();
        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| DomainError::validation("cannot standardise an empty matrix"))?;
        let variance = data.var_axis(Axis(0), 0.0);
        // columns whose spread is rounding noise are left unscaled
        let scale = ndarray::Zip::from(&variance)
            .and(&mean)
            .map_collect(|&var, &m| {
                let noise = samples as f64 * m.abs() * f64::EPSILON;
                if var.is_finite() && var > noise * noise && var > 0.0 {
                    var.sqrt()
                } else {
                    1.0
                }
            });
        Ok(Self { mean, scale })
    }

    pub fn transform(&self, row: ArrayView1<'_, f64>) -> Array1<f64> {
        (&row - &self.mean) / &self.scale
    }

    pub fn transform_matrix(&self, data: ArrayView2<'_, f64>) -> Array2<f64> {
        (&data - &self.mean) / &self.scale
    }

    pub fn mean(&self) -> ArrayView1<'_, f64> {
        self.mean.view()
    }

    pub fn scale(&self) -> ArrayView1<'_, f64> {
        self.scale.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn standardises_columns_with_population_std() {
        let data = array![[1.0, 10.0], [3.0, 10.0]];
        let scaler = StandardScaler::fit(data.view()).unwrap();
        assert_eq!(scaler.mean(), array![2.0, 10.0]);
        assert_eq!(scaler.scale(), array![1.0, 1.0]);

        let scaled = scaler.transform_matrix(data.view());
        assert_eq!(scaled, array![[-1.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn transform_reuses_training_statistics() {
        let data = array![[0.0], [4.0], [8.0]];
        let scaler = StandardScaler::fit(data.view()).unwrap();
        let query = scaler.transform(array![12.0].view());
        assert_relative_eq!(query[0], 8.0 / (32.0f64 / 3.0).sqrt());
    }

    #[test]
    fn constant_column_is_centred_only() {
        let data = array![[0.1, 5.0], [0.1, 7.0], [0.1, 9.0]];
        let scaler = StandardScaler::fit(data.view()).unwrap();
        assert_eq!(scaler.scale()[0], 1.0);
        let scaled = scaler.transform(array![0.3, 7.0].view());
        assert_relative_eq!(scaled[0], 0.2, epsilon = 1e-12);
        assert_eq!(scaled[1], 0.0);
    }

    #[test]
    fn empty_matrix_is_rejected() {
        let data = Array2::<f64>::zeros((0, 4));
        assert!(StandardScaler::fit(data.view()).is_err());
    }
}
