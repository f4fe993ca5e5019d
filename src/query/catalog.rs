//! Descriptive records by id, and affiliation resolution
//!
//! "First" affiliation always means lowest affiliation id.

use super::placeholders;
use crate::store::rows::{AffiliationRow, MethodRow, OrganizationRow, PersonRow, ProcessingLevelRow};
use crate::store::{Store, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

const METHOD_SELECT: &str = "
SELECT methodid, methodcode, methodname, methoddescription, methodlink, organizationid
FROM methods
";

const PROCESSING_LEVEL_SELECT: &str = "
SELECT processinglevelid, processinglevelcode, definition, explanation
FROM processinglevels
";

const AFFILIATION_SELECT: &str = "
SELECT af.affiliationid, af.primaryphone, af.primaryemail, af.primaryaddress,
       p.personid, p.personfirstname, p.personlastname,
       o.organizationid, o.organizationtypecv, o.organizationcode, o.organizationname,
       o.organizationdescription, o.organizationlink
FROM affiliations af
LEFT JOIN people p ON p.personid = af.personid
LEFT JOIN organizations o ON o.organizationid = af.organizationid
";

fn read_method(row: &Row<'_>) -> rusqlite::Result<MethodRow> {
    Ok(MethodRow {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        link: row.get(4)?,
        organization_id: row.get(5)?,
    })
}

fn read_processing_level(row: &Row<'_>) -> rusqlite::Result<ProcessingLevelRow> {
    Ok(ProcessingLevelRow {
        id: row.get(0)?,
        code: row.get(1)?,
        definition: row.get(2)?,
        explanation: row.get(3)?,
    })
}

fn read_affiliation(row: &Row<'_>) -> rusqlite::Result<AffiliationRow> {
    let person = match row.get::<_, Option<i64>>(4)? {
        Some(id) => Some(PersonRow {
            id,
            first_name: row.get(5)?,
            last_name: row.get(6)?,
        }),
        None => None,
    };
    let organization = match row.get::<_, Option<i64>>(7)? {
        Some(id) => Some(OrganizationRow {
            id,
            type_cv: row.get(8)?,
            code: row.get(9)?,
            name: row.get(10)?,
            description: row.get(11)?,
            link: row.get(12)?,
        }),
        None => None,
    };

    Ok(AffiliationRow {
        id: row.get(0)?,
        phone: row.get(1)?,
        email: row.get(2)?,
        address: row.get(3)?,
        person,
        organization,
    })
}

/// Rows of `select` whose `id_column` is in `ids`, ordered by that column
fn by_ids<T>(
    store: &Store,
    select: &str,
    id_column: &str,
    ids: &[i64],
    read: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> StoreResult<Vec<T>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "{} WHERE {} IN ({}) ORDER BY {}",
        select,
        id_column,
        placeholders(ids.len()),
        id_column
    );
    let mut stmt = store.conn().prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(ids.iter()), read)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn first<T>(
    store: &Store,
    sql: &str,
    param: Value,
    read: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> StoreResult<Option<T>> {
    let mut stmt = store.conn().prepare_cached(sql)?;
    let row = stmt.query_row(params![param], read).optional()?;
    Ok(row)
}

pub fn methods_by_ids(store: &Store, ids: &[i64]) -> StoreResult<Vec<MethodRow>> {
    by_ids(store, METHOD_SELECT, "methodid", ids, read_method)
}

pub fn method_by_id(store: &Store, id: i64) -> StoreResult<Option<MethodRow>> {
    Ok(methods_by_ids(store, &[id])?.into_iter().next())
}

pub fn processing_levels_by_ids(
    store: &Store,
    ids: &[i64],
) -> StoreResult<Vec<ProcessingLevelRow>> {
    by_ids(
        store,
        PROCESSING_LEVEL_SELECT,
        "processinglevelid",
        ids,
        read_processing_level,
    )
}

pub fn processing_level_by_id(store: &Store, id: i64) -> StoreResult<Option<ProcessingLevelRow>> {
    Ok(processing_levels_by_ids(store, &[id])?.into_iter().next())
}

pub fn affiliations_by_ids(store: &Store, ids: &[i64]) -> StoreResult<Vec<AffiliationRow>> {
    by_ids(store, AFFILIATION_SELECT, "af.affiliationid", ids, read_affiliation)
}

pub fn affiliation_by_id(store: &Store, id: i64) -> StoreResult<Option<AffiliationRow>> {
    Ok(affiliations_by_ids(store, &[id])?.into_iter().next())
}

/// First affiliation acting on the site: actionby → actions → featureactions
pub fn affiliation_for_site(store: &Store, site_code: &str) -> StoreResult<Option<AffiliationRow>> {
    let sql = format!(
        "{} JOIN actionby ab ON ab.affiliationid = af.affiliationid
           JOIN featureactions fa ON fa.actionid = ab.actionid
           JOIN samplingfeatures sf ON sf.samplingfeatureid = fa.samplingfeatureid
         WHERE sf.samplingfeaturecode = ?
         ORDER BY af.affiliationid LIMIT 1",
        AFFILIATION_SELECT
    );
    first(store, &sql, Value::Text(site_code.to_string()), read_affiliation)
}

/// First affiliation recorded in actionby for the action
pub fn affiliation_for_action(store: &Store, action_id: i64) -> StoreResult<Option<AffiliationRow>> {
    let sql = format!(
        "{} JOIN actionby ab ON ab.affiliationid = af.affiliationid
         WHERE ab.actionid = ?
         ORDER BY af.affiliationid LIMIT 1",
        AFFILIATION_SELECT
    );
    first(store, &sql, Value::Integer(action_id), read_affiliation)
}

/// First affiliation with the organization
pub fn affiliation_for_organization(
    store: &Store,
    organization_id: i64,
) -> StoreResult<Option<AffiliationRow>> {
    let sql = format!(
        "{} WHERE af.organizationid = ? ORDER BY af.affiliationid LIMIT 1",
        AFFILIATION_SELECT
    );
    first(store, &sql, Value::Integer(organization_id), read_affiliation)
}
