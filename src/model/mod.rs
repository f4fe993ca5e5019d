//! WaterML-oriented domain model
//!
//! The objects handed to the web layer for serialization:
//! - `Site`, `SpatialReference`: where observations are made
//! - `Variable`, `Unit`: what is observed, keyed by a composite code
//! - `Series`: a site × variable time-series summary
//! - `DataValue`, `DataValues`: individual observations
//! - `Method`, `Source`, `QualityControlLevel`: descriptive records
//!
//! Every object is built fresh per call by [`mapper`] and never cached.

pub mod error;
pub mod mapper;

pub use error::{MappingError, MappingResult};

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Organization types whose name and code are published as a site's agency
pub const AGENCY_ORGANIZATION_TYPES: &[&str] = &["Government agency", "Research agency"];

/// Composite variable key: `"{code}::{units_id}-{medium}"`
///
/// Disambiguates one variable code measured in several units or media. The
/// same string is the externally visible variable code and the bucketing key
/// for grouped data values.
pub fn variable_key(code: &str, units_id: i64, medium: &str) -> String {
    format!("{}::{}-{}", code, units_id, medium)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpatialReference {
    pub id: i64,
    pub srs_code: Option<String>,
    pub srs_name: String,
    pub notes: Option<String>,
}

/// A monitoring site (an ODM2 sampling feature of type Site)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Site {
    /// Sampling feature id
    pub site_id: i64,
    pub code: String,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub lat_long_datum_id: Option<i64>,
    pub elevation_m: Option<f64>,
    pub comments: Option<String>,
    pub lat_long_datum: SpatialReference,
    /// Set only for government and research agencies
    pub agency_name: Option<String>,
    pub agency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub unit_type: String,
    pub abbreviation: String,
}

/// No-data sentinel, collapsed to an integer when it has no fractional part
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(untagged)]
pub enum NoDataValue {
    Integer(i64),
    Float(f64),
}

impl From<f64> for NoDataValue {
    fn from(value: f64) -> Self {
        if value.is_finite()
            && value.fract() == 0.0
            && value >= i64::MIN as f64
            && value <= i64::MAX as f64
        {
            NoDataValue::Integer(value as i64)
        } else {
            NoDataValue::Float(value)
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Variable {
    pub variable_id: i64,
    /// Composite key, see [`variable_key`]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub no_data_value: NoDataValue,
    pub sample_medium: String,
    pub data_type: Option<String>,
    pub speciation: Option<String>,
    pub value_type: String,
    pub general_category: String,
    pub units: Unit,
    pub time_units: Option<Unit>,
    pub time_support: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Method {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QualityControlLevel {
    pub id: i64,
    pub code: String,
    pub definition: Option<String>,
    pub explanation: Option<String>,
}

/// A data source, derived from an affiliation and its organization
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Source {
    /// Affiliation id
    pub source_id: i64,
    pub source_code: Option<String>,
    pub organization: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub contact_name: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Option<String>,
}

/// Summary of one result time series at a site
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Series {
    /// Result id
    pub series_id: i64,
    pub variable: Variable,
    pub method: Method,
    pub sample_medium: String,
    pub quality_control_level: QualityControlLevel,
    pub begin_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub value_count: i64,
    pub source: Option<Source>,
    pub organization: Option<String>,
}

/// A single observation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DataValue {
    pub value_id: i64,
    pub value: f64,
    /// Local time of the observation
    pub date_time: NaiveDateTime,
    /// Hours east of UTC
    pub utc_offset: i32,
    pub censor_code: String,
    pub method_id: i64,
    pub quality_control_level_id: i64,
    pub quality_control_level_code: String,
    pub source_id: Option<i64>,
}

impl DataValue {
    /// ISO-8601 timestamp with the UTC offset appended, e.g.
    /// `2020-01-01T00:00:00-07:00`
    pub fn date_time_iso(&self) -> String {
        let sign = if self.utc_offset < 0 { '-' } else { '+' };
        format!(
            "{}{}{:02}:00",
            self.date_time.format("%Y-%m-%dT%H:%M:%S"),
            sign,
            self.utc_offset.abs()
        )
    }
}

/// Data values for one site and variable code
///
/// `Grouped` is returned when the variable code named neither a unit nor a
/// sample medium: one bucket per composite variable key. `Flat` is returned
/// when either filter was given. Every sequence is in ascending time order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "shape", content = "values", rename_all = "lowercase")]
pub enum DataValues {
    Grouped(BTreeMap<String, Vec<DataValue>>),
    Flat(Vec<DataValue>),
}

impl DataValues {
    /// Total number of values across all buckets
    pub fn len(&self) -> usize {
        match self {
            DataValues::Grouped(groups) => groups.values().map(Vec::len).sum(),
            DataValues::Flat(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_flat(&self) -> Option<&[DataValue]> {
        match self {
            DataValues::Flat(values) => Some(values),
            DataValues::Grouped(_) => None,
        }
    }

    pub fn as_grouped(&self) -> Option<&BTreeMap<String, Vec<DataValue>>> {
        match self {
            DataValues::Grouped(groups) => Some(groups),
            DataValues::Flat(_) => None,
        }
    }
}
