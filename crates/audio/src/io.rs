use std::fs;
use std::path::Path;

use tracing::debug;

use bottletap_domain::{DomainError, EnergyTable};

pub struct EnergyTableReader;

impl EnergyTableReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<EnergyTable, DomainError> {
        let path_ref = path.as_ref();
        let text = fs::read_to_string(path_ref)?;
        let table = EnergyTable::parse(&text).map_err(|err| match err {
            DomainError::MalformedTable(message) => {
                DomainError::malformed(format!("{}: {message}", path_ref.display()))
            }
            other => other,
        })?;
        debug!(
            path = %path_ref.display(),
            bins = table.bins(),
            frames = table.frames(),
            "read energy table"
        );
        Ok(table)
    }
}
