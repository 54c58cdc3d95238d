//! Argument validation errors.
//!
//! These are raised before any request is made. They are distinct from
//! transport and decoding errors, which live in [`crate::sinaica::SinaicaError`].

/// A caller-supplied argument failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    /// A required date was not supplied
    #[error("missing {0} date")]
    MissingDate(&'static str),

    /// A date did not parse as YYYY-MM-DD
    #[error("invalid {field} date {value:?}: expected YYYY-MM-DD")]
    MalformedDate { field: &'static str, value: String },

    /// Parameter code is not one SINAICA measures
    #[error("unknown parameter {0:?}")]
    UnknownParameter(String),

    /// Data type is not Crude, Validated or Manual
    #[error("unknown data type {0:?}: expected Crude, Validated or Manual")]
    UnknownDataType(String),

    /// Data type exists but the operation does not accept it
    #[error("data type {0} is not supported here: expected Crude or Manual")]
    UnsupportedDataType(&'static str),

    /// End date comes before the start date
    #[error("end date {end} is before start date {start}")]
    InvertedRange { start: String, end: String },

    /// Range is wider than one calendar month
    #[error("date range {start} to {end} is longer than one month")]
    RangeTooWide { start: String, end: String },
}
