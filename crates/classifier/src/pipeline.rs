use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use bottletap_audio::{FeatureExtractor, SpectralFeatureExtractor};
use bottletap_domain::{ClassifierConfig, DomainError, StrikeLabel};

use crate::corpus::CorpusLoader;
use crate::model::ClusterModel;
use crate::resolver::{LabelResolver, Resolution};

/// Why a recording could not be labelled.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AbsentReason {
    EmptyCorpus,
    InsufficientCorpus { samples: usize, clusters: usize },
    MissingAnchor(StrikeLabel),
    MissingQuery,
    /// The query fell into the cluster no anchor claimed.
    UnmappedCluster(usize),
}

impl fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsentReason::EmptyCorpus => f.write_str("no unlabeled recordings in corpus"),
            AbsentReason::InsufficientCorpus { samples, clusters } => {
                write!(f, "{samples} recordings cannot form {clusters} clusters")
            }
            AbsentReason::MissingAnchor(label) => write!(f, "{label} anchor is missing"),
            AbsentReason::MissingQuery => f.write_str("query recording does not exist"),
            AbsentReason::UnmappedCluster(cluster) => {
                write!(f, "cluster {cluster} has no anchor")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Classification {
    Label(StrikeLabel),
    Absent(AbsentReason),
}

impl Classification {
    pub fn label(&self) -> Option<StrikeLabel> {
        match self {
            Classification::Label(label) => Some(*label),
            Classification::Absent(_) => None,
        }
    }

    /// 0 for top, 1 for bottom.
    pub fn code(&self) -> Option<u8> {
        self.label().map(StrikeLabel::code)
    }
}

/// Refits the whole model from the corpus on every call; nothing is cached
/// between calls.
pub struct StrikeClassifier {
    config: ClassifierConfig,
    extractor: SpectralFeatureExtractor,
}

impl StrikeClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let extractor = SpectralFeatureExtractor::from_config(&config);
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    #[instrument(skip_all, fields(data_dir = %data_dir.display(), query = %query.display()))]
    pub fn classify_detailed(&self, data_dir: &Path, query: &Path) -> Result<Classification> {
        let corpus = CorpusLoader::new(&self.extractor, &self.config).load(data_dir)?;
        if corpus.is_empty() {
            return Ok(self.absent(AbsentReason::EmptyCorpus));
        }

        let model = match ClusterModel::fit(corpus.features.view(), &self.config) {
            Ok(model) => model,
            Err(DomainError::InsufficientSamples { samples, clusters }) => {
                return Ok(self.absent(AbsentReason::InsufficientCorpus { samples, clusters }));
            }
            Err(err) => return Err(err).context("fit cluster model"),
        };

        let assignment = match LabelResolver::new(&self.extractor, &self.config)
            .resolve(&model, data_dir)?
        {
            Resolution::Resolved(assignment) => assignment,
            Resolution::MissingAnchor(label) => {
                return Ok(self.absent(AbsentReason::MissingAnchor(label)));
            }
        };

        if !query.exists() {
            return Ok(self.absent(AbsentReason::MissingQuery));
        }
        let features = self
            .extractor
            .extract_path(query)
            .with_context(|| format!("extract query features from {:?}", query))?;
        let cluster = model.predict(&features);

        let classification = match assignment.label_for(cluster) {
            Some(label) => Classification::Label(label),
            None => self.absent(AbsentReason::UnmappedCluster(cluster)),
        };
        info!(cluster, ?classification, "classified recording");
        Ok(classification)
    }

    pub fn classify(&self, data_dir: &Path, query: &Path) -> Result<Option<StrikeLabel>> {
        Ok(self.classify_detailed(data_dir, query)?.label())
    }

    fn absent(&self, reason: AbsentReason) -> Classification {
        warn!(%reason, "recording left unlabelled");
        Classification::Absent(reason)
    }
}

impl Default for StrikeClassifier {
    fn default() -> Self {
        let config = ClassifierConfig::default();
        let extractor = SpectralFeatureExtractor::from_config(&config);
        Self { config, extractor }
    }
}

/// Classifies `query` against the corpus in `data_dir` with the default
/// settings. Returns 0 for a top strike, 1 for a bottom strike and `None`
/// when the recording cannot be labelled.
pub fn classify<D: AsRef<Path>, Q: AsRef<Path>>(data_dir: D, query: Q) -> Result<Option<u8>> {
    let classification =
        StrikeClassifier::default().classify_detailed(data_dir.as_ref(), query.as_ref())?;
    Ok(classification.code())
}
