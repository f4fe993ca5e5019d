//! Row → domain object mapping
//!
//! Pure functions over [`crate::store::rows`]. Each one checks the owning
//! chain it needs and fails with [`MappingError::IncompleteRecord`] instead
//! of producing a partially filled object. CV normalization of data type and
//! sample medium happens here, after the composite variable key is built from
//! the raw medium.

use super::{
    variable_key, DataValue, MappingError, MappingResult, Method, QualityControlLevel, Series,
    Site, Source, SpatialReference, Unit, Variable, AGENCY_ORGANIZATION_TYPES,
};
use crate::cvmap::{CvMapper, CV_DATA_TYPE, CV_SAMPLE_MEDIUM};
use crate::store::rows::{
    AffiliationRow, MeasurementResultRow, MethodRow, ProcessingLevelRow, SiteRow, UnitRow,
    ValueRow,
};
use chrono::NaiveDateTime;

pub fn map_site(row: &SiteRow, affiliation: Option<&AffiliationRow>) -> MappingResult<Site> {
    let sr = row
        .spatial_reference
        .as_ref()
        .ok_or_else(|| MappingError::incomplete("site", row.sampling_feature_id, "spatial reference"))?;

    let agency = affiliation
        .and_then(|aff| aff.organization.as_ref())
        .filter(|org| AGENCY_ORGANIZATION_TYPES.contains(&org.type_cv.as_str()));

    Ok(Site {
        site_id: row.sampling_feature_id,
        code: row.code.clone(),
        name: row.name.clone(),
        latitude: row.latitude,
        longitude: row.longitude,
        lat_long_datum_id: row.spatial_reference_id,
        elevation_m: row.elevation_m,
        comments: row.description.clone(),
        lat_long_datum: SpatialReference {
            id: sr.id,
            srs_code: sr.srs_code.clone(),
            srs_name: sr.srs_name.clone(),
            notes: sr.srs_description.clone(),
        },
        agency_name: agency.map(|org| org.name.clone()),
        agency_code: agency.map(|org| org.code.clone()),
    })
}

pub fn map_unit(row: &UnitRow) -> Unit {
    Unit {
        id: row.id,
        name: row.name.clone(),
        unit_type: row.type_cv.clone(),
        abbreviation: row.abbreviation.clone(),
    }
}

pub fn map_method(row: &MethodRow) -> Method {
    Method {
        id: row.id,
        code: row.code.clone(),
        description: row.description.clone(),
        link: row.link.clone(),
    }
}

pub fn map_quality_control_level(row: &ProcessingLevelRow) -> QualityControlLevel {
    QualityControlLevel {
        id: row.id,
        code: row.code.clone(),
        definition: row.definition.clone(),
        explanation: row.explanation.clone(),
    }
}

pub fn map_source(row: &AffiliationRow) -> MappingResult<Source> {
    let person = row
        .person
        .as_ref()
        .ok_or_else(|| MappingError::incomplete("affiliation", row.id, "person"))?;
    let org = row.organization.as_ref();

    Ok(Source {
        source_id: row.id,
        source_code: org.map(|_| row.id.to_string()),
        organization: org.map(|o| o.name.clone()),
        description: org.and_then(|o| o.description.clone()),
        link: org.and_then(|o| o.link.clone()),
        contact_name: format!("{} {}", person.first_name, person.last_name),
        phone: row.phone.clone(),
        email: row.email.clone(),
        address: row.address.clone(),
    })
}

/// Variable as observed by one result: the result's units, medium and
/// aggregation statistic qualify the bare ODM2 variable
pub fn map_variable(row: &MeasurementResultRow, cv: &CvMapper) -> MappingResult<Variable> {
    let variable = row
        .variable
        .as_ref()
        .ok_or_else(|| MappingError::incomplete("result", row.result_id, "variable"))?;
    let units = row
        .units
        .as_ref()
        .ok_or_else(|| MappingError::incomplete("result", row.result_id, "units"))?;
    let action = row
        .action
        .as_ref()
        .ok_or_else(|| MappingError::incomplete("result", row.result_id, "action"))?;

    Ok(Variable {
        variable_id: variable.id,
        code: variable_key(&variable.code, units.id, &row.sampled_medium),
        name: variable.name_cv.clone(),
        description: variable.definition.clone(),
        no_data_value: variable.no_data_value.into(),
        sample_medium: cv.resolve(CV_SAMPLE_MEDIUM, &row.sampled_medium),
        data_type: cv.resolve_opt(CV_DATA_TYPE, row.aggregation_statistic.as_deref()),
        speciation: variable.speciation_cv.clone(),
        value_type: action.type_cv.clone(),
        general_category: variable.type_cv.clone(),
        units: map_unit(units),
        time_units: row.time_units.as_ref().map(map_unit),
        time_support: row.time_aggregation_interval,
    })
}

pub fn map_series(
    row: &MeasurementResultRow,
    affiliation: Option<&AffiliationRow>,
    begin: NaiveDateTime,
    end: NaiveDateTime,
    cv: &CvMapper,
) -> MappingResult<Series> {
    let variable = map_variable(row, cv)?;
    let level = row
        .processing_level
        .as_ref()
        .ok_or_else(|| MappingError::incomplete("result", row.result_id, "processing level"))?;
    let method = row
        .action
        .as_ref()
        .and_then(|a| a.method.as_ref())
        .ok_or_else(|| MappingError::incomplete("result", row.result_id, "method"))?;

    let source = affiliation.map(map_source).transpose()?;
    let organization =
        affiliation.and_then(|aff| aff.organization.as_ref().map(|org| org.name.clone()));

    Ok(Series {
        series_id: row.result_id,
        sample_medium: variable.sample_medium.clone(),
        variable,
        method: map_method(method),
        quality_control_level: map_quality_control_level(level),
        begin_date_time: begin,
        end_date_time: end,
        value_count: row.value_count,
        source,
        organization,
    })
}

pub fn map_data_value(
    row: &ValueRow,
    affiliation: Option<&AffiliationRow>,
) -> MappingResult<DataValue> {
    let method_id = row
        .method_id
        .ok_or_else(|| MappingError::incomplete("value", row.value_id, "method"))?;
    let (level_id, level_code) = match (row.processing_level_id, &row.processing_level_code) {
        (Some(id), Some(code)) => (id, code.clone()),
        _ => {
            return Err(MappingError::incomplete(
                "value",
                row.value_id,
                "processing level",
            ))
        }
    };

    Ok(DataValue {
        value_id: row.value_id,
        value: row.value,
        date_time: row.date_time,
        utc_offset: row.utc_offset,
        censor_code: row.censor_code.clone(),
        method_id,
        quality_control_level_id: level_id,
        quality_control_level_code: level_code,
        source_id: affiliation.map(|aff| aff.id),
    })
}
