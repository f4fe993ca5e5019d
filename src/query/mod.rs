//! ODM2 query builders
//!
//! One module per use case, each a set of free functions over a [`Store`]
//! returning raw rows from [`crate::store::rows`]:
//!
//! - **sites**: sites by code, all sites with measurements, bounding box
//! - **variables**: distinct (variable, units, medium) result rows
//! - **series**: result rows for a site, and action date ranges for specimens
//! - **values**: measurement values for a site and variable token
//! - **catalog**: methods, affiliations and processing levels by id
//! - **aggregate**: per-result min/max value timestamps
//! - **token**: composite variable code parsing
//!
//! Every query returns `StoreResult`. No matching rows is an empty `Vec` or
//! `None`, never an error.

pub mod aggregate;
pub mod catalog;
pub mod series;
pub mod sites;
pub mod token;
pub mod values;
pub mod variables;

pub use aggregate::compute_date_bounds;
pub use token::{UnitFilter, VariableToken};

use crate::store::rows::{
    ActionRow, MeasurementResultRow, MethodRow, ProcessingLevelRow, UnitRow, VariableRow,
};
use crate::store::{Store, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Row};

/// Timestamp format used for bound parameters
pub(crate) const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Result row with variable, units, time units, processing level, action and
/// method. Related rows are LEFT JOINed so a broken chain reaches the mapper.
pub(crate) const RESULT_SELECT: &str = "
SELECT r.resultid, r.featureactionid, r.variableid, r.unitsid, r.sampledmediumcv, r.valuecount,
       mr.censorcodecv, mr.aggregationstatisticcv, mr.timeaggregationinterval,
       v.variableid, v.variabletypecv, v.variablecode, v.variablenamecv,
       v.variabledefinition, v.speciationcv, v.nodatavalue,
       u.unitsid, u.unitstypecv, u.unitsabbreviation, u.unitsname,
       tu.unitsid, tu.unitstypecv, tu.unitsabbreviation, tu.unitsname,
       pl.processinglevelid, pl.processinglevelcode, pl.definition, pl.explanation,
       a.actionid, a.actiontypecv, a.begindatetime, a.enddatetime,
       m.methodid, m.methodcode, m.methodname, m.methoddescription, m.methodlink, m.organizationid
FROM measurementresults mr
JOIN results r ON r.resultid = mr.resultid
LEFT JOIN featureactions fa ON fa.featureactionid = r.featureactionid
LEFT JOIN actions a ON a.actionid = fa.actionid
LEFT JOIN methods m ON m.methodid = a.methodid
LEFT JOIN variables v ON v.variableid = r.variableid
LEFT JOIN units u ON u.unitsid = r.unitsid
LEFT JOIN units tu ON tu.unitsid = mr.timeaggregationintervalunitsid
LEFT JOIN processinglevels pl ON pl.processinglevelid = r.processinglevelid
";

pub(crate) fn read_result_row(row: &Row<'_>) -> rusqlite::Result<MeasurementResultRow> {
    let variable = match row.get::<_, Option<i64>>(9)? {
        Some(id) => Some(VariableRow {
            id,
            type_cv: row.get(10)?,
            code: row.get(11)?,
            name_cv: row.get(12)?,
            definition: row.get(13)?,
            speciation_cv: row.get(14)?,
            no_data_value: row.get(15)?,
        }),
        None => None,
    };

    let action = match row.get::<_, Option<i64>>(28)? {
        Some(id) => Some(ActionRow {
            id,
            type_cv: row.get(29)?,
            begin: row.get(30)?,
            end: row.get(31)?,
            method: match row.get::<_, Option<i64>>(32)? {
                Some(method_id) => Some(MethodRow {
                    id: method_id,
                    code: row.get(33)?,
                    name: row.get(34)?,
                    description: row.get(35)?,
                    link: row.get(36)?,
                    organization_id: row.get(37)?,
                }),
                None => None,
            },
        }),
        None => None,
    };

    let processing_level = match row.get::<_, Option<i64>>(24)? {
        Some(id) => Some(ProcessingLevelRow {
            id,
            code: row.get(25)?,
            definition: row.get(26)?,
            explanation: row.get(27)?,
        }),
        None => None,
    };

    Ok(MeasurementResultRow {
        result_id: row.get(0)?,
        feature_action_id: row.get(1)?,
        variable_id: row.get(2)?,
        units_id: row.get(3)?,
        sampled_medium: row.get(4)?,
        value_count: row.get(5)?,
        censor_code: row.get(6)?,
        aggregation_statistic: row.get(7)?,
        time_aggregation_interval: row.get(8)?,
        variable,
        units: read_unit(row, 16)?,
        time_units: read_unit(row, 20)?,
        processing_level,
        action,
    })
}

/// Four unit columns starting at `start`, `None` when the join missed
fn read_unit(row: &Row<'_>, start: usize) -> rusqlite::Result<Option<UnitRow>> {
    match row.get::<_, Option<i64>>(start)? {
        Some(id) => Ok(Some(UnitRow {
            id,
            type_cv: row.get(start + 1)?,
            abbreviation: row.get(start + 2)?,
            name: row.get(start + 3)?,
        })),
        None => Ok(None),
    }
}

/// Run a result-row query with positional parameters
pub(crate) fn query_result_rows(
    store: &Store,
    sql: &str,
    params: Vec<Value>,
) -> StoreResult<Vec<MeasurementResultRow>> {
    let mut stmt = store.conn().prepare(sql)?;
    let rows = stmt
        .query_map(params_from_iter(params), read_result_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// `?, ?, ?` for an IN list of `n` values
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// `MIN`/`MAX` of a TEXT timestamp column compared as instants, so `T` and
/// space separated values order together; millisecond precision
pub(crate) fn instant_extreme(func: &str, column: &str) -> String {
    format!(
        "strftime('%Y-%m-%d %H:%M:%f', {}(julianday({})))",
        func, column
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
        assert_eq!(placeholders(0), "");
    }

    #[test]
    fn test_instant_extreme_sql() {
        assert_eq!(
            instant_extreme("MIN", "a.begindatetime"),
            "strftime('%Y-%m-%d %H:%M:%f', MIN(julianday(a.begindatetime)))"
        );
    }
}
