//! Series queries
//!
//! Site series are results performed at the site's own sampling feature.
//! Site + variable series are results on specimens related to the site,
//! dated by the range of the specimen actions.

use super::token::{UnitFilter, VariableToken};
use super::{instant_extreme, query_result_rows, RESULT_SELECT};
use crate::store::rows::{ActionRangeRow, MeasurementResultRow};
use crate::store::{Store, StoreResult};
use rusqlite::params_from_iter;
use rusqlite::types::Value;

/// Measurement results at the sampling feature with `site_code`
pub fn results_for_site(store: &Store, site_code: &str) -> StoreResult<Vec<MeasurementResultRow>> {
    let sql = format!(
        "{} JOIN samplingfeatures sf ON sf.samplingfeatureid = fa.samplingfeatureid
         WHERE sf.samplingfeaturecode = ?
         ORDER BY r.variableid, r.resultid",
        RESULT_SELECT
    );
    let rows = query_result_rows(store, &sql, vec![Value::Text(site_code.to_string())])?;
    tracing::debug!(site_code = %site_code, count = rows.len(), "Queried site results");
    Ok(rows)
}

/// Specimen restriction shared by both site + variable queries
///
/// Returns the WHERE clause and its parameters, or `None` when the token's
/// unit segment cannot match anything.
fn specimen_filter(site_id: i64, token: &VariableToken) -> Option<(String, Vec<Value>)> {
    let mut clause = String::from("rf.relatedfeatureid = ? AND v.variablecode = ?");
    let mut params = vec![Value::Integer(site_id), Value::Text(token.code.clone())];

    match token.unit_filter() {
        UnitFilter::Any => {}
        UnitFilter::Id(id) => {
            clause.push_str(" AND r.unitsid = ?");
            params.push(Value::Integer(id));
        }
        UnitFilter::Unmatchable => return None,
    }
    if let Some(medium) = &token.medium {
        clause.push_str(" AND r.sampledmediumcv = ?");
        params.push(Value::Text(medium.clone()));
    }
    Some((clause, params))
}

const SPECIMEN_JOINS: &str = "
JOIN featureactions fa ON fa.featureactionid = r.featureactionid
JOIN specimens sp ON sp.samplingfeatureid = fa.samplingfeatureid
JOIN relatedfeatures rf ON rf.samplingfeatureid = sp.samplingfeatureid
JOIN variables v ON v.variableid = r.variableid
";

/// Action begin/end range per (variable, units, medium) over specimens
/// related to the site
pub fn specimen_action_ranges(
    store: &Store,
    site_id: i64,
    token: &VariableToken,
) -> StoreResult<Vec<ActionRangeRow>> {
    let Some((clause, params)) = specimen_filter(site_id, token) else {
        return Ok(Vec::new());
    };

    let sql = format!(
        "SELECT r.variableid, r.unitsid, r.sampledmediumcv, {}, {}
         FROM results r
         JOIN measurementresults mr ON mr.resultid = r.resultid
         {}
         JOIN actions a ON a.actionid = fa.actionid
         WHERE {} AND r.unitsid IS NOT NULL
         GROUP BY r.variableid, r.unitsid, r.sampledmediumcv",
        instant_extreme("MIN", "a.begindatetime"),
        instant_extreme("MAX", "a.enddatetime"),
        SPECIMEN_JOINS,
        clause
    );

    let mut stmt = store.conn().prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params), |row| {
            Ok(ActionRangeRow {
                variable_id: row.get(0)?,
                units_id: row.get(1)?,
                sampled_medium: row.get(2)?,
                begin: row.get(3)?,
                end: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(site_id, code = %token.code, count = rows.len(), "Queried specimen action ranges");
    Ok(rows)
}

/// One representative result per (variable, units, medium) over specimens
/// related to the site
pub fn specimen_results(
    store: &Store,
    site_id: i64,
    token: &VariableToken,
) -> StoreResult<Vec<MeasurementResultRow>> {
    let Some((clause, params)) = specimen_filter(site_id, token) else {
        return Ok(Vec::new());
    };

    let sql = format!(
        "{} WHERE r.resultid IN (
             SELECT MIN(r.resultid) FROM results r
             JOIN measurementresults mr ON mr.resultid = r.resultid
             {}
             WHERE {}
             GROUP BY r.variableid, r.unitsid, r.sampledmediumcv
         )
         ORDER BY r.resultid",
        RESULT_SELECT, SPECIMEN_JOINS, clause
    );
    let rows = query_result_rows(store, &sql, params)?;
    tracing::debug!(site_id, code = %token.code, count = rows.len(), "Queried specimen results");
    Ok(rows)
}
