//! Station metadata table loading.
//!
//! Provides station id → name/code/network mapping, read once from a
//! JSON file and then shared read-only with the client.

mod error;
mod loader;

pub use error::StationError;
pub use loader::{StationRecord, load_station_table, parse_station_table};
