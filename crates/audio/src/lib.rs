pub mod analysis;
pub mod dsp;
pub mod io;

pub use analysis::{FeatureExtractor, SpectralFeatureExtractor};
pub use io::EnergyTableReader;
