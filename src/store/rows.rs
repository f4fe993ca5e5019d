//! Raw relational rows
//!
//! One struct per joined row shape returned by the query layer. Related
//! entities reached through a nullable join are `Option`s so that a broken
//! ownership chain survives until the mapper can report it.

use chrono::NaiveDateTime;

/// `sites` joined with `samplingfeatures` and `spatialreferences`
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRow {
    pub sampling_feature_id: i64,
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub elevation_m: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub spatial_reference_id: Option<i64>,
    pub spatial_reference: Option<SpatialReferenceRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialReferenceRow {
    pub id: i64,
    pub srs_code: Option<String>,
    pub srs_name: String,
    pub srs_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationRow {
    pub id: i64,
    pub type_cv: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// `affiliations` with its person and organization
#[derive(Debug, Clone, PartialEq)]
pub struct AffiliationRow {
    pub id: i64,
    pub phone: Option<String>,
    pub email: String,
    pub address: Option<String>,
    pub person: Option<PersonRow>,
    pub organization: Option<OrganizationRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitRow {
    pub id: i64,
    pub type_cv: String,
    pub abbreviation: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableRow {
    pub id: i64,
    pub type_cv: String,
    pub code: String,
    pub name_cv: String,
    pub definition: Option<String>,
    pub speciation_cv: Option<String>,
    pub no_data_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingLevelRow {
    pub id: i64,
    pub code: String,
    pub definition: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub organization_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionRow {
    pub id: i64,
    pub type_cv: String,
    pub begin: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub method: Option<MethodRow>,
}

/// `results` + `measurementresults` with everything a Series or Variable needs
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementResultRow {
    pub result_id: i64,
    pub feature_action_id: i64,
    pub variable_id: Option<i64>,
    pub units_id: Option<i64>,
    pub sampled_medium: String,
    pub value_count: i64,
    pub censor_code: String,
    pub aggregation_statistic: Option<String>,
    pub time_aggregation_interval: Option<f64>,
    pub variable: Option<VariableRow>,
    pub units: Option<UnitRow>,
    pub time_units: Option<UnitRow>,
    pub processing_level: Option<ProcessingLevelRow>,
    pub action: Option<ActionRow>,
}

/// Action date range per (variable, units, medium) for specimens of a site
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRangeRow {
    pub variable_id: i64,
    pub units_id: i64,
    pub sampled_medium: String,
    pub begin: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// One `measurementresultvalues` row with the owning chain flattened
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRow {
    pub value_id: i64,
    pub result_id: i64,
    pub value: f64,
    pub date_time: NaiveDateTime,
    pub utc_offset: i32,
    pub variable_code: String,
    pub units_id: Option<i64>,
    pub sampled_medium: String,
    pub censor_code: String,
    pub method_id: Option<i64>,
    pub organization_id: Option<i64>,
    pub processing_level_id: Option<i64>,
    pub processing_level_code: Option<String>,
}
