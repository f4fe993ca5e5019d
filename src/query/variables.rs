//! Variables in use
//!
//! A variable is reported once per distinct (variable, units, sampled
//! medium) triple across measurement results. The lowest result id of each
//! triple is the representative row.

use super::token::{UnitFilter, VariableToken};
use super::{query_result_rows, RESULT_SELECT};
use crate::store::rows::MeasurementResultRow;
use crate::store::{Store, StoreResult};
use rusqlite::types::Value;

/// One representative result row per distinct triple
pub fn distinct_variable_results(store: &Store) -> StoreResult<Vec<MeasurementResultRow>> {
    let sql = format!(
        "{} WHERE r.resultid IN (
             SELECT MIN(r2.resultid) FROM results r2
             JOIN measurementresults mr2 ON mr2.resultid = r2.resultid
             GROUP BY r2.variableid, r2.unitsid, r2.sampledmediumcv
         )
         ORDER BY r.resultid",
        RESULT_SELECT
    );
    let rows = query_result_rows(store, &sql, Vec::new())?;
    tracing::debug!(count = rows.len(), "Queried distinct variables");
    Ok(rows)
}

/// Representative rows whose variable matches a parsed code token
pub fn variable_results_for_token(
    store: &Store,
    token: &VariableToken,
) -> StoreResult<Vec<MeasurementResultRow>> {
    let mut filters = String::from("v2.variablecode = ?");
    let mut params = vec![Value::Text(token.code.clone())];

    match token.unit_filter() {
        UnitFilter::Any => {}
        UnitFilter::Id(id) => {
            filters.push_str(" AND r2.unitsid = ?");
            params.push(Value::Integer(id));
        }
        UnitFilter::Unmatchable => return Ok(Vec::new()),
    }
    if let Some(medium) = &token.medium {
        filters.push_str(" AND r2.sampledmediumcv = ?");
        params.push(Value::Text(medium.clone()));
    }

    let sql = format!(
        "{} WHERE r.resultid IN (
             SELECT MIN(r2.resultid) FROM results r2
             JOIN measurementresults mr2 ON mr2.resultid = r2.resultid
             JOIN variables v2 ON v2.variableid = r2.variableid
             WHERE {}
             GROUP BY r2.variableid, r2.unitsid, r2.sampledmediumcv
         )
         ORDER BY r.resultid",
        RESULT_SELECT, filters
    );
    let rows = query_result_rows(store, &sql, params)?;
    tracing::debug!(code = %token.code, count = rows.len(), "Queried variables by code");
    Ok(rows)
}
