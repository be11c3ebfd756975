use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use bottletap_audio::FeatureExtractor;
use bottletap_domain::{ClassifierConfig, ClusterAssignment, StrikeLabel};

use crate::model::ClusterModel;

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Resolved(ClusterAssignment),
    MissingAnchor(StrikeLabel),
}

/// Maps cluster ids to labels by predicting the cluster of each anchor
/// recording.
pub struct LabelResolver<'a, E: FeatureExtractor> {
    extractor: &'a E,
    config: &'a ClassifierConfig,
}

impl<'a, E: FeatureExtractor> LabelResolver<'a, E> {
    pub fn new(extractor: &'a E, config: &'a ClassifierConfig) -> Self {
        Self { extractor, config }
    }

    pub fn resolve(&self, model: &ClusterModel, data_dir: &Path) -> Result<Resolution> {
        let mut assignment = ClusterAssignment::new();
        for label in StrikeLabel::ANCHORS {
            let path = data_dir.join(self.config.anchor_file(label));
            if !path.exists() {
                warn!(%label, path = %path.display(), "anchor recording is missing");
                return Ok(Resolution::MissingAnchor(label));
            }
            let features = self
                .extractor
                .extract_path(&path)
                .with_context(|| format!("extract anchor features from {:?}", path))?;
            let cluster = model.predict(&features);
            debug!(%label, cluster, "anchor assigned");
            if let Some(previous) = assignment.assign(cluster, label) {
                warn!(cluster, %previous, %label, "anchors share a cluster; keeping the later one");
            }
        }
        Ok(Resolution::Resolved(assignment))
    }
}
