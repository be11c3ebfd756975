use std::path::Path;

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use bottletap_domain::{ClassifierConfig, DomainError, EnergyTable, FeatureVector};

use crate::dsp::{argmax, bin_totals, finite_mean, finite_or_zero, frame_totals, guard_zero};
use crate::io::EnergyTableReader;

pub trait FeatureExtractor {
    fn extract(&self, table: &EnergyTable) -> FeatureVector;

    fn extract_path(&self, path: &Path) -> Result<FeatureVector, DomainError> {
        let table = EnergyTableReader::open(path)?;
        Ok(self.extract(&table))
    }
}

/// Centroid, bandwidth, roll-off and peak frequency of an energy table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpectralFeatureExtractor {
    pub rolloff_fraction: f64,
    pub epsilon: f64,
}

impl Default for SpectralFeatureExtractor {
    fn default() -> Self {
        Self {
            rolloff_fraction: 0.85,
            epsilon: 1e-8,
        }
    }
}

impl SpectralFeatureExtractor {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            rolloff_fraction: config.rolloff_fraction,
            epsilon: config.epsilon,
        }
    }
}

impl FeatureExtractor for SpectralFeatureExtractor {
    fn extract(&self, table: &EnergyTable) -> FeatureVector {
        let freqs = table.frequencies();
        let energy = table.energy();

        let centroids = spectral_centroids(freqs, energy, self.epsilon);
        let centroid_mean = centroids.mean().unwrap_or(0.0);

        let spreads = spectral_spreads(freqs, energy, centroid_mean, self.epsilon);
        let bandwidth_mean = spreads.mean().unwrap_or(0.0).sqrt();

        let rolloff_freqs: Array1<f64> = rolloff_indices(energy, self.rolloff_fraction)
            .into_iter()
            .map(|index| freqs[index])
            .collect();
        let rolloff = finite_mean(rolloff_freqs.view());

        let peak = argmax(bin_totals(energy).view()).unwrap_or(0);
        let features = FeatureVector::new(centroid_mean, bandwidth_mean, rolloff, freqs[peak]);
        debug!(?features, "extracted spectral features");
        features
    }
}

/// Energy-weighted mean frequency of each frame. Silent frames divide by
/// `epsilon` and so come out as 0.
pub fn spectral_centroids(
    freqs: ArrayView1<'_, f64>,
    energy: ArrayView2<'_, f64>,
    epsilon: f64,
) -> Array1<f64> {
    let denom = guard_zero(&frame_totals(energy), epsilon);
    let weighted = freqs.dot(&energy);
    (weighted / denom).mapv(finite_or_zero)
}

/// Energy-weighted squared distance of each frame's spectrum from `center`.
pub fn spectral_spreads(
    freqs: ArrayView1<'_, f64>,
    energy: ArrayView2<'_, f64>,
    center: f64,
    epsilon: f64,
) -> Array1<f64> {
    let denom = guard_zero(&frame_totals(energy), epsilon);
    let deviations = freqs.mapv(|f| (f - center).powi(2));
    (deviations.dot(&energy) / denom).mapv(finite_or_zero)
}

/// For each frame, the first bin at which the cumulative energy reaches
/// `fraction` of the frame total. Frames that never reach it report bin 0.
pub fn rolloff_indices(energy: ArrayView2<'_, f64>, fraction: f64) -> Vec<usize> {
    let totals = frame_totals(energy);
    energy
        .columns()
        .into_iter()
        .zip(totals.iter())
        .map(|(column, &total)| {
            let threshold = fraction * total;
            let mut cumulative = 0.0;
            column
                .iter()
                .position(|&value| {
                    cumulative += value;
                    cumulative >= threshold
                })
                .unwrap_or(0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};
    use std::io::Write;

    fn table(freqs: Array1<f64>, energy: Array2<f64>) -> EnergyTable {
        EnergyTable::new(freqs, energy).unwrap()
    }

    #[test]
    fn single_hit_reports_its_frequency() {
        let freqs = array![100.0, 250.0, 400.0, 800.0];
        let mut energy = Array2::zeros((4, 5));
        energy[[2, 3]] = 2.0;
        let table = table(freqs, energy);

        let features = SpectralFeatureExtractor::default().extract(&table);
        assert_eq!(features.peak_frequency, 400.0);

        let centroids = spectral_centroids(table.frequencies(), table.energy(), 1e-8);
        assert_eq!(centroids[3], 400.0);
        assert_eq!(centroids[0], 0.0);
        assert_relative_eq!(features.centroid_mean, 80.0);
    }

    #[test]
    fn silent_frame_contributes_zero() {
        let freqs = array![100.0, 200.0, 300.0, 400.0];
        let energy = array![[1.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 0.0]];
        let features = SpectralFeatureExtractor::default().extract(&table(freqs, energy));

        assert_relative_eq!(features.centroid_mean, 125.0);
        // spreads are [28125, 0] around the mean centroid of 125
        assert_relative_eq!(features.bandwidth_mean, 14062.5f64.sqrt());
        assert_relative_eq!(features.rolloff, 250.0);
        assert_eq!(features.peak_frequency, 100.0);
    }

    #[test]
    fn rolloff_uses_first_bin_over_threshold() {
        let energy = array![[1.0, 0.0, 5.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0]];
        assert_eq!(rolloff_indices(energy.view(), 0.85), vec![3, 0, 3]);
        assert_eq!(rolloff_indices(energy.view(), 0.5), vec![1, 0, 0]);
    }

    #[test]
    fn spreads_are_zero_for_pure_tone_at_center() {
        let freqs = array![100.0, 200.0];
        let energy = array![[0.0], [3.0]];
        let spreads = spectral_spreads(freqs.view(), energy.view(), 200.0, 1e-8);
        assert_eq!(spreads, array![0.0]);
    }

    #[test]
    fn extract_path_reads_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "freq,t0\n100,0\n200,4\n300,0").unwrap();
        let features = SpectralFeatureExtractor::default()
            .extract_path(file.path())
            .unwrap();
        assert_eq!(features.centroid_mean, 200.0);
        assert_eq!(features.bandwidth_mean, 0.0);
        assert_eq!(features.rolloff, 200.0);
        assert_eq!(features.peak_frequency, 200.0);
    }

    #[test]
    fn extract_path_propagates_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "freq,t0\n100,abc").unwrap();
        let result = SpectralFeatureExtractor::default().extract_path(file.path());
        assert!(matches!(result, Err(DomainError::MalformedTable(_))));
    }
}
