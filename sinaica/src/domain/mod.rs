//! Domain types for SINAICA queries.
//!
//! Everything here is validated by construction: a `Parameter`,
//! `DataType` or `DateRange` that exists is safe to send upstream.

mod data_type;
mod date_range;
mod error;
mod parameter;
mod station;

pub use data_type::DataType;
pub use date_range::{DATE_FORMAT, DateRange};
pub use error::InvalidArgument;
pub use parameter::{Parameter, unit_for_code};
pub use station::{StationId, StationMeta, StationTable};
