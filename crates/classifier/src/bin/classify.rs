use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use bottletap_classifier::StrikeClassifier;
use bottletap_domain::ClassifierConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Classify a bottle tap recording as a top or bottom strike", long_about = None)]
struct Cli {
    /// Energy table (CSV) of the recording to classify
    input: PathBuf,
    /// Directory holding top.csv, bottom.csv and the unlabeled recordings
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,
    /// JSON file overriding classifier settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("read config {:?}", path))?;
            ClassifierConfig::from_json(&text)?
        }
        None => ClassifierConfig::default(),
    };
    let classifier = StrikeClassifier::new(config)?;
    let classification = classifier.classify_detailed(&cli.data_dir, &cli.input)?;
    match classification.code() {
        Some(code) => println!("{code}"),
        None => println!("none"),
    }
    Ok(())
}
