//! Monitoring stations and their metadata lookup.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric identifier SINAICA assigns to a monitoring station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl StationId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive fields joined onto every measurement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationMeta {
    /// Human-readable station name.
    pub name: String,
    /// Short station code (e.g. "MER").
    pub code: String,
    /// Name of the reporting network.
    pub network_name: String,
    /// Short network code.
    pub network_code: String,
    /// Numeric network identifier.
    pub network_id: u32,
}

/// Read-only station id → metadata lookup.
///
/// Built once by the caller and shared with the client; the normalizers
/// only ever read from it. Stations missing from the table still produce
/// rows, just without metadata.
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    stations: HashMap<StationId, StationMeta>,
}

impl StationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one station.
    pub fn insert(&mut self, id: StationId, meta: StationMeta) {
        self.stations.insert(id, meta);
    }

    /// Look up a station's metadata.
    pub fn get(&self, id: StationId) -> Option<&StationMeta> {
        self.stations.get(&id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl FromIterator<(StationId, StationMeta)> for StationTable {
    fn from_iter<I: IntoIterator<Item = (StationId, StationMeta)>>(iter: I) -> Self {
        Self {
            stations: iter.into_iter().collect(),
        }
    }
}
