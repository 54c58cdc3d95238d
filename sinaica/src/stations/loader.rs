//! Station metadata file loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{StationId, StationMeta, StationTable};

use super::error::StationError;

/// One station as stored in the metadata file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationRecord {
    #[serde(alias = "station_id")]
    pub id: u32,
    #[serde(alias = "station_name")]
    pub name: String,
    #[serde(alias = "station_code")]
    pub code: String,
    pub network_name: String,
    pub network_code: String,
    pub network_id: u32,
}

/// Read a JSON array of station records from disk.
pub fn load_station_table(path: impl AsRef<Path>) -> Result<StationTable, StationError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| StationError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_station_table(&contents)
}

/// Parse a JSON array of station records.
pub fn parse_station_table(json: &str) -> Result<StationTable, StationError> {
    let records: Vec<StationRecord> =
        serde_json::from_str(json).map_err(|e| StationError::Json {
            message: e.to_string(),
        })?;
    Ok(build_table(records))
}

/// Build the id → metadata table; on duplicate ids the last record wins.
fn build_table(records: Vec<StationRecord>) -> StationTable {
    let mut table = StationTable::new();
    for r in records {
        let id = StationId(r.id);
        if table.get(id).is_some() {
            warn!(station = r.id, "duplicate station id in metadata file");
        }
        table.insert(
            id,
            StationMeta {
                name: r.name,
                code: r.code,
                network_name: r.network_name,
                network_code: r.network_code,
                network_id: r.network_id,
            },
        );
    }
    table
}
