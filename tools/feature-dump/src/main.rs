use std::path::PathBuf;

use anyhow::Result;
use bottletap_audio::SpectralFeatureExtractor;
use bottletap_classifier::CorpusLoader;
use bottletap_domain::{ClassifierConfig, FeatureVector};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Print the spectral features of every unlabeled recording in a corpus"
)]
struct Args {
    /// Corpus directory
    #[arg(default_value = "data")]
    dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct FeatureRecord<'a> {
    file: &'a str,
    features: FeatureVector,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClassifierConfig::default();
    let extractor = SpectralFeatureExtractor::from_config(&config);
    let corpus = CorpusLoader::new(&extractor, &config).load(&args.dir)?;

    let records: Vec<FeatureRecord<'_>> = corpus
        .files
        .iter()
        .zip(corpus.features.rows())
        .map(|(file, row)| FeatureRecord {
            file,
            features: FeatureVector::new(row[0], row[1], row[2], row[3]),
        })
        .collect();
    info!(count = records.len(), "extracted corpus features");
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
