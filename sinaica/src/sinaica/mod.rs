//! SINAICA web service client.
//!
//! This module talks to the Mexican national air-quality information
//! system and turns its responses into normalized tables.
//!
//! Key characteristics of SINAICA:
//! - Requests are form-encoded POSTs; responses are JSON, often served
//!   with an HTML content type
//! - Numeric fields frequently arrive as strings
//! - Measurement downloads are limited to one month per request
//! - The service is small; the client pauses between requests

mod client;
mod convert;
mod error;
mod request;
mod throttle;
mod types;

pub use client::{
    DEFAULT_DATA_URL, DEFAULT_META_URL, HttpTransport, Measurements, SinaicaClient, SinaicaConfig,
    Transport,
};
pub use convert::{
    clean_value, normalize_crude, normalize_date_limits, normalize_manual, normalize_params,
};
pub use error::SinaicaError;
pub use request::{
    DataQuery, Form, StationMethod, StationQuery, WhereClause, build_data_query,
    build_station_query,
};
pub use types::{
    DateLimitsResponse, RawCrudeRecord, RawDateLimits, RawManualRecord, RawParam, decode_list,
};
