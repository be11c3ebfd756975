pub mod config;
pub mod error;
pub mod features;
pub mod label;
pub mod table;

pub use crate::config::ClassifierConfig;
pub use crate::error::DomainError;
pub use crate::features::{FeatureVector, FEATURE_COUNT};
pub use crate::label::{ClusterAssignment, StrikeLabel};
pub use crate::table::EnergyTable;
