//! Measurement value queries

use super::token::{UnitFilter, VariableToken};
use super::SQL_DATETIME_FORMAT;
use crate::store::rows::ValueRow;
use crate::store::{Store, StoreResult};
use chrono::NaiveDateTime;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

const VALUE_SELECT: &str = "
SELECT mrv.valueid, mrv.resultid, mrv.datavalue, mrv.valuedatetime, mrv.valuedatetimeutcoffset,
       v.variablecode, r.unitsid, r.sampledmediumcv, mr.censorcodecv,
       m.methodid, m.organizationid, pl.processinglevelid, pl.processinglevelcode
FROM measurementresultvalues mrv
JOIN measurementresults mr ON mr.resultid = mrv.resultid
JOIN results r ON r.resultid = mr.resultid
JOIN featureactions fa ON fa.featureactionid = r.featureactionid
JOIN samplingfeatures sf ON sf.samplingfeatureid = fa.samplingfeatureid
JOIN variables v ON v.variableid = r.variableid
LEFT JOIN actions a ON a.actionid = fa.actionid
LEFT JOIN methods m ON m.methodid = a.methodid
LEFT JOIN processinglevels pl ON pl.processinglevelid = r.processinglevelid
";

/// Inclusive local-time window on `valuedatetime`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Values for a site code and variable token, oldest first
///
/// Unit and medium from the token narrow the results; a range, if given,
/// bounds the value timestamps inclusively.
pub fn values_for_site_variable(
    store: &Store,
    site_code: &str,
    token: &VariableToken,
    range: Option<TimeRange>,
) -> StoreResult<Vec<ValueRow>> {
    let mut sql = format!(
        "{} WHERE sf.samplingfeaturecode = ? AND v.variablecode = ?",
        VALUE_SELECT
    );
    let mut params = vec![
        Value::Text(site_code.to_string()),
        Value::Text(token.code.clone()),
    ];

    match token.unit_filter() {
        UnitFilter::Any => {}
        UnitFilter::Id(id) => {
            sql.push_str(" AND r.unitsid = ?");
            params.push(Value::Integer(id));
        }
        UnitFilter::Unmatchable => return Ok(Vec::new()),
    }
    if let Some(medium) = &token.medium {
        sql.push_str(" AND r.sampledmediumcv = ?");
        params.push(Value::Text(medium.clone()));
    }
    if let Some(range) = range {
        sql.push_str(
            " AND julianday(mrv.valuedatetime) >= julianday(?)
              AND julianday(mrv.valuedatetime) <= julianday(?)",
        );
        params.push(Value::Text(
            range.begin.format(SQL_DATETIME_FORMAT).to_string(),
        ));
        params.push(Value::Text(range.end.format(SQL_DATETIME_FORMAT).to_string()));
    }
    sql.push_str(" ORDER BY julianday(mrv.valuedatetime), mrv.valueid");

    let mut stmt = store.conn().prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params), |row| {
            Ok(ValueRow {
                value_id: row.get(0)?,
                result_id: row.get(1)?,
                value: row.get(2)?,
                date_time: row.get(3)?,
                utc_offset: row.get(4)?,
                variable_code: row.get(5)?,
                units_id: row.get(6)?,
                sampled_medium: row.get(7)?,
                censor_code: row.get(8)?,
                method_id: row.get(9)?,
                organization_id: row.get(10)?,
                processing_level_id: row.get(11)?,
                processing_level_code: row.get(12)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        site_code = %site_code,
        code = %token.code,
        ranged = range.is_some(),
        count = rows.len(),
        "Queried data values"
    );
    Ok(rows)
}
