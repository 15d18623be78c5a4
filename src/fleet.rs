//! Static description of the fleet, shipped with the package as JSON.

use crate::error::FleetDataError;
use std::fs;
use std::path::{Path, PathBuf};

/// `data/fleet.json` inside the package.
pub fn bundled_fleet_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("fleet.json")
}

/// Reads and parses the fleet file verbatim. Nothing is recovered: a missing
/// or malformed file is an error for the caller.
pub fn load_fleet_data(path: impl AsRef<Path>) -> Result<serde_json::Value, FleetDataError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| FleetDataError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| FleetDataError::Parse {
        path: path.display().to_string(),
        source,
    })
}
