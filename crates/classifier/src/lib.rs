pub mod corpus;
pub mod kmeans;
pub mod model;
pub mod pipeline;
pub mod resolver;
pub mod scaler;

#[cfg(test)]
mod fixtures;

pub use corpus::{Corpus, CorpusLoader};
pub use kmeans::{KMeans, KMeansConfig};
pub use model::ClusterModel;
pub use pipeline::{classify, AbsentReason, Classification, StrikeClassifier};
pub use resolver::{LabelResolver, Resolution};
pub use scaler::StandardScaler;
