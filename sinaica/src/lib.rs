//! SINAICA air-quality data client.
//!
//! Downloads measurements from the Mexican national air-quality
//! information system and normalizes them into tables with stable
//! column names, units and data-quality flags.

pub mod domain;
pub mod sinaica;
pub mod stations;
pub mod table;
