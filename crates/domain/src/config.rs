use serde::{Deserialize, Serialize};

use crate::{DomainError, StrikeLabel};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    pub clusters: usize,
    /// Fraction of a frame's energy that lies below the roll-off frequency.
    pub rolloff_fraction: f64,
    /// Substituted for zero per-frame energy totals.
    pub epsilon: f64,
    pub seed: u64,
    pub max_iter: usize,
    /// Number of k-means restarts; the lowest-inertia run is kept.
    pub n_init: usize,
    pub tolerance: f64,
    pub top_anchor: String,
    pub bottom_anchor: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            clusters: 3,
            rolloff_fraction: 0.85,
            epsilon: 1e-8,
            seed: 0,
            max_iter: 300,
            n_init: 10,
            tolerance: 1e-4,
            top_anchor: "top.csv".to_string(),
            bottom_anchor: "bottom.csv".to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Reads overrides from JSON; omitted fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| DomainError::Serialization(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.clusters == 0 {
            return Err(DomainError::validation("cluster count must be positive"));
        }
        if !(self.rolloff_fraction > 0.0 && self.rolloff_fraction <= 1.0) {
            return Err(DomainError::validation(
                "roll-off fraction must be in (0, 1]",
            ));
        }
        if !(self.epsilon > 0.0) {
            return Err(DomainError::validation("epsilon must be positive"));
        }
        if self.max_iter == 0 || self.n_init == 0 {
            return Err(DomainError::validation(
                "max_iter and n_init must be positive",
            ));
        }
        if self.top_anchor == self.bottom_anchor {
            return Err(DomainError::validation(
                "top and bottom anchors must be different files",
            ));
        }
        Ok(())
    }

    pub fn anchor_file(&self, label: StrikeLabel) -> &str {
        match label {
            StrikeLabel::Top => &self.top_anchor,
            StrikeLabel::Bottom => &self.bottom_anchor,
        }
    }

    pub fn is_anchor(&self, file_name: &str) -> bool {
        file_name == self.top_anchor || file_name == self.bottom_anchor
    }
}
