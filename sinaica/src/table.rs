//! Normalized output tables.
//!
//! Each row type has a fixed column list; the struct fields are declared in
//! exactly that order so serialized rows line up with [`Schema::COLUMNS`].
//! A table always carries its columns, even when it has no rows.

use chrono::NaiveDate;
use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::domain::StationId;

/// A row type with a stable, ordered column list.
pub trait Schema {
    /// Column names in output order.
    const COLUMNS: &'static [&'static str];
}

/// One row of automatically logged ("crude") data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrudeRow {
    pub id: Option<i64>,
    pub station_id: Option<StationId>,
    pub station_name: Option<String>,
    pub station_code: Option<String>,
    pub network_name: Option<String>,
    pub network_code: Option<String>,
    pub network_id: Option<u32>,
    pub date: Option<NaiveDate>,
    pub hour: Option<u8>,
    pub parameter: String,
    pub value_original: Option<f64>,
    pub flag_original: Option<String>,
    pub valid_original: Option<i64>,
    pub value_actual: Option<f64>,
    pub valid_actual: Option<i64>,
    pub date_validated: Option<String>,
    pub validation_level: Option<i64>,
    pub unit: Option<&'static str>,
    pub value: Option<f64>,
}

impl Schema for CrudeRow {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "station_id",
        "station_name",
        "station_code",
        "network_name",
        "network_code",
        "network_id",
        "date",
        "hour",
        "parameter",
        "value_original",
        "flag_original",
        "valid_original",
        "value_actual",
        "valid_actual",
        "date_validated",
        "validation_level",
        "unit",
        "value",
    ];
}

/// One row of manually collected data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualRow {
    pub id: Option<i64>,
    pub station_id: Option<StationId>,
    pub station_name: Option<String>,
    pub station_code: Option<String>,
    pub network_name: Option<String>,
    pub network_code: Option<String>,
    pub network_id: Option<u32>,
    pub date: Option<NaiveDate>,
    pub hour: Option<u8>,
    pub parameter: String,
    pub value_actual: Option<f64>,
    pub valid_actual: Option<i64>,
    pub validation_level: Option<i64>,
    pub unit: Option<&'static str>,
    pub value: Option<f64>,
}

impl Schema for ManualRow {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "station_id",
        "station_name",
        "station_code",
        "network_name",
        "network_code",
        "network_id",
        "date",
        "hour",
        "parameter",
        "value_actual",
        "valid_actual",
        "validation_level",
        "unit",
        "value",
    ];
}

/// A parameter a station measures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamRow {
    pub param_code: String,
    pub param_name: String,
}

impl Schema for ParamRow {
    const COLUMNS: &'static [&'static str] = &["param_code", "param_name"];
}

/// Measurement table: ordered columns plus rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R: Schema> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    /// A table with the full schema and no rows.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Schema + Serialize> Serialize for Table<R> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Table", 2)?;
        s.serialize_field("columns", R::COLUMNS)?;
        s.serialize_field("rows", &self.rows)?;
        s.end()
    }
}

/// First and last date a station has data for.
///
/// Both ends are `None` when the station has no data (or the lookup failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DateLimits {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateLimits {
    /// The limits as a `[start, end]` pair.
    pub fn as_pair(&self) -> [Option<NaiveDate>; 2] {
        [self.start, self.end]
    }
}
