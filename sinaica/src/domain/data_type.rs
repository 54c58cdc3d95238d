//! Kinds of measurement data SINAICA publishes.

use std::fmt;
use std::str::FromStr;

use super::error::InvalidArgument;

/// Which stage of the data pipeline to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// Automatically logged, unvalidated readings.
    #[default]
    Crude,
    /// Crude data after quality review.
    Validated,
    /// Periodic lab-analyzed samples.
    Manual,
}

impl DataType {
    /// Parse `"Crude"`, `"Validated"` or `"Manual"`.
    pub fn parse(s: &str) -> Result<Self, InvalidArgument> {
        match s {
            "Crude" => Ok(DataType::Crude),
            "Validated" => Ok(DataType::Validated),
            "Manual" => Ok(DataType::Manual),
            other => Err(InvalidArgument::UnknownDataType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Crude => "Crude",
            DataType::Validated => "Validated",
            DataType::Manual => "Manual",
        }
    }

    /// Upstream table holding measurements of this type.
    pub fn table(&self) -> &'static str {
        match self {
            DataType::Crude => "Datos",
            DataType::Validated => "DatosValidados",
            DataType::Manual => "DatosManuales",
        }
    }

    /// Suffix the metadata endpoint uses to select this type.
    pub fn suffix(&self) -> &'static str {
        match self {
            DataType::Crude => "",
            DataType::Validated => "V",
            DataType::Manual => "M",
        }
    }

    /// Reject types the measurement download cannot return.
    pub fn require_downloadable(self) -> Result<Self, InvalidArgument> {
        match self {
            DataType::Crude | DataType::Manual => Ok(self),
            DataType::Validated => Err(InvalidArgument::UnsupportedDataType(self.as_str())),
        }
    }
}

impl FromStr for DataType {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
