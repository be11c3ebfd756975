use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;
use tracing::{debug, info, warn};

use bottletap_audio::FeatureExtractor;
use bottletap_domain::{ClassifierConfig, FeatureVector, FEATURE_COUNT};

/// Feature matrix of the unlabeled recordings, one row per file.
#[derive(Clone, Debug, PartialEq)]
pub struct Corpus {
    pub files: Vec<String>,
    pub features: Array2<f64>,
}

impl Corpus {
    pub fn empty() -> Self {
        Self {
            files: Vec::new(),
            features: Array2::zeros((0, FEATURE_COUNT)),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub struct CorpusLoader<'a, E: FeatureExtractor> {
    extractor: &'a E,
    config: &'a ClassifierConfig,
}

impl<'a, E: FeatureExtractor> CorpusLoader<'a, E> {
    pub fn new(extractor: &'a E, config: &'a ClassifierConfig) -> Self {
        Self { extractor, config }
    }

    /// Names of the `.csv` files in `dir` other than the anchors, sorted.
    pub fn eligible_files(&self, dir: &Path) -> Result<Vec<String>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(dir = %dir.display(), "corpus directory does not exist");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("list corpus directory {:?}", dir))
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("list corpus directory {:?}", dir))?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !name.ends_with(".csv") || self.config.is_anchor(&name) {
                continue;
            }
            if !entry.path().is_file() {
                continue;
            }
            files.push(name);
        }
        files.sort();
        Ok(files)
    }

    pub fn load(&self, dir: &Path) -> Result<Corpus> {
        let files = self.eligible_files(dir)?;
        if files.is_empty() {
            return Ok(Corpus::empty());
        }

        let mut values = Vec::with_capacity(files.len() * FEATURE_COUNT);
        for name in &files {
            let path = dir.join(name);
            let features: FeatureVector = self
                .extractor
                .extract_path(&path)
                .with_context(|| format!("extract features from {:?}", path))?;
            debug!(file = %name, ?features, "corpus entry");
            values.extend_from_slice(&features.as_array());
        }
        let features = Array2::from_shape_vec((files.len(), FEATURE_COUNT), values)?;
        info!(files = files.len(), dir = %dir.display(), "loaded training corpus");
        Ok(Corpus { files, features })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{broadband, low_tap, scenario_corpus, write_table};
    use bottletap_audio::SpectralFeatureExtractor;

    fn loader_parts() -> (SpectralFeatureExtractor, ClassifierConfig) {
        (SpectralFeatureExtractor::default(), ClassifierConfig::default())
    }

    #[test]
    fn skips_anchors_and_other_extensions() {
        let dir = scenario_corpus();
        std::fs::write(dir.path().join("notes.txt"), "not a table").unwrap();
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();
        let (extractor, config) = loader_parts();

        let corpus = CorpusLoader::new(&extractor, &config).load(dir.path()).unwrap();
        assert_eq!(
            corpus.files,
            vec!["high_a.csv", "high_b.csv", "low_a.csv", "low_b.csv", "thump.csv"]
        );
        assert_eq!(corpus.features.dim(), (5, FEATURE_COUNT));
        assert_eq!(corpus.features[[4, 0]], 550.0);
    }

    #[test]
    fn anchors_only_gives_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        write_table(dir.path(), "top.csv", &low_tap(0.0));
        write_table(dir.path(), "bottom.csv", &broadband());
        let (extractor, config) = loader_parts();

        let corpus = CorpusLoader::new(&extractor, &config).load(dir.path()).unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.features.nrows(), 0);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (extractor, config) = loader_parts();
        let corpus = CorpusLoader::new(&extractor, &config)
            .load(&dir.path().join("data"))
            .unwrap();
        assert_eq!(corpus, Corpus::empty());
    }

    #[test]
    fn malformed_file_is_fatal() {
        let dir = scenario_corpus();
        std::fs::write(dir.path().join("broken.csv"), "freq,t0\n100,??\n").unwrap();
        let (extractor, config) = loader_parts();
        let err = CorpusLoader::new(&extractor, &config)
            .load(dir.path())
            .unwrap_err();
        assert!(format!("{err:#}").contains("broken.csv"));
    }
}
