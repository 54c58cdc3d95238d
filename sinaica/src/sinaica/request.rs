//! Upstream request payloads.
//!
//! The data endpoint takes a SQL-like `where` string. It is only ever
//! rendered from typed values (a closed `Parameter`, formatted dates, an
//! integer station id), and text literals are quote-escaped on the way out.

use std::fmt;

use crate::domain::{DATE_FORMAT, DataType, DateRange, InvalidArgument, Parameter, StationId};

/// Form fields for one POST request.
pub type Form = Vec<(&'static str, String)>;

/// A literal on the right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Text(String),
    Int(i64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Int(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Eq,
    Ge,
    Le,
}

impl Op {
    fn as_str(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ge => ">=",
            Op::Le => "<=",
        }
    }
}

/// A conjunction of `column op literal` conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    conditions: Vec<(&'static str, Op, Literal)>,
}

impl WhereClause {
    fn push(mut self, column: &'static str, op: Op, value: Literal) -> Self {
        self.conditions.push((column, op, value));
        self
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (column, op, value)) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{column} {} {value}", op.as_str())?;
        }
        Ok(())
    }
}

/// A measurement download request (data endpoint).
#[derive(Debug, Clone, PartialEq)]
pub struct DataQuery {
    parameter: Parameter,
    range: DateRange,
    data_type: DataType,
    station: Option<StationId>,
}

impl DataQuery {
    /// Create a query for every station reporting `parameter`.
    ///
    /// Fails if `data_type` is `Validated`, which the download does not serve.
    pub fn new(
        parameter: Parameter,
        range: DateRange,
        data_type: DataType,
    ) -> Result<Self, InvalidArgument> {
        Ok(Self {
            parameter,
            range,
            data_type: data_type.require_downloadable()?,
            station: None,
        })
    }

    /// Restrict the query to one station.
    pub fn with_station(mut self, station: StationId) -> Self {
        self.station = Some(station);
        self
    }

    pub fn parameter(&self) -> Parameter {
        self.parameter
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// The row filter sent as the `where` field.
    pub fn where_clause(&self) -> WhereClause {
        let clause = WhereClause::default()
            .push("parametro", Op::Eq, Literal::Text(self.parameter.as_str().to_string()))
            .push(
                "fecha",
                Op::Ge,
                Literal::Text(self.range.start().format(DATE_FORMAT).to_string()),
            )
            .push(
                "fecha",
                Op::Le,
                Literal::Text(self.range.end().format(DATE_FORMAT).to_string()),
            );

        match self.station {
            Some(id) => clause.push("estacionesId", Op::Eq, Literal::Int(i64::from(id.get()))),
            None => clause,
        }
    }

    /// Form fields for the data endpoint.
    pub fn form(&self) -> Form {
        vec![
            ("tabla", self.data_type.table().to_string()),
            ("fields", "*".to_string()),
            ("where", self.where_clause().to_string()),
        ]
    }
}

/// What to ask the station metadata endpoint for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationMethod {
    /// Parameters the station measures.
    Parameters,
    /// First and last date with data.
    DateLimits,
}

impl StationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationMethod::Parameters => "getParametrosEstacion",
            StationMethod::DateLimits => "getFechasLimite",
        }
    }
}

/// A station metadata request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationQuery {
    pub station: StationId,
    pub method: StationMethod,
    pub data_type: DataType,
}

impl StationQuery {
    pub fn new(station: StationId, method: StationMethod, data_type: DataType) -> Self {
        Self {
            station,
            method,
            data_type,
        }
    }

    /// Form fields for the metadata endpoint.
    pub fn form(&self) -> Form {
        vec![
            ("entityId", self.station.to_string()),
            ("method", self.method.as_str().to_string()),
            ("tipoDatos", self.data_type.suffix().to_string()),
        ]
    }
}

/// Validate raw caller input and build a download query.
///
/// Checks run in argument order: parameter, data type, then dates.
pub fn build_data_query(
    parameter: &str,
    start: Option<&str>,
    end: Option<&str>,
    data_type: &str,
) -> Result<DataQuery, InvalidArgument> {
    let parameter = Parameter::parse(parameter)?;
    let data_type = DataType::parse(data_type)?.require_downloadable()?;
    let range = DateRange::parse(start, end)?;
    DataQuery::new(parameter, range, data_type)
}

/// Validate a raw data type and build a station metadata query.
pub fn build_station_query(
    station: StationId,
    method: StationMethod,
    data_type: &str,
) -> Result<StationQuery, InvalidArgument> {
    Ok(StationQuery::new(station, method, DataType::parse(data_type)?))
}
