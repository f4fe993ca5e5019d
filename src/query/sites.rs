//! Site queries
//!
//! Listing queries only return sites with at least one measurement result
//! (sites → featureactions → measurementresults). Lookup by code does not
//! apply that filter.

use crate::store::rows::{SiteRow, SpatialReferenceRow};
use crate::store::{Store, StoreResult};
use rusqlite::{params, OptionalExtension, Row};

const SITE_SELECT: &str = "
SELECT s.samplingfeatureid, sf.samplingfeaturecode, sf.samplingfeaturename,
       sf.samplingfeaturedescription, sf.elevation_m, s.latitude, s.longitude,
       s.spatialreferenceid,
       sr.spatialreferenceid, sr.srscode, sr.srsname, sr.srsdescription
FROM sites s
JOIN samplingfeatures sf ON sf.samplingfeatureid = s.samplingfeatureid
LEFT JOIN spatialreferences sr ON sr.spatialreferenceid = s.spatialreferenceid
";

const HAS_MEASUREMENTS: &str = "
EXISTS (
    SELECT 1 FROM featureactions fa
    JOIN results r ON r.featureactionid = fa.featureactionid
    JOIN measurementresults mr ON mr.resultid = r.resultid
    WHERE fa.samplingfeatureid = s.samplingfeatureid
)";

fn read_site_row(row: &Row<'_>) -> rusqlite::Result<SiteRow> {
    let spatial_reference = match row.get::<_, Option<i64>>(8)? {
        Some(id) => Some(SpatialReferenceRow {
            id,
            srs_code: row.get(9)?,
            srs_name: row.get(10)?,
            srs_description: row.get(11)?,
        }),
        None => None,
    };

    Ok(SiteRow {
        sampling_feature_id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        elevation_m: row.get(4)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        spatial_reference_id: row.get(7)?,
        spatial_reference,
    })
}

/// Every site with at least one measurement result
pub fn all_sites(store: &Store) -> StoreResult<Vec<SiteRow>> {
    let sql = format!(
        "{} WHERE {} ORDER BY sf.samplingfeaturecode",
        SITE_SELECT, HAS_MEASUREMENTS
    );
    let mut stmt = store.conn().prepare_cached(&sql)?;
    let rows = stmt
        .query_map([], read_site_row)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = rows.len(), "Queried all sites");
    Ok(rows)
}

pub fn site_by_code(store: &Store, code: &str) -> StoreResult<Option<SiteRow>> {
    let sql = format!("{} WHERE sf.samplingfeaturecode = ?1", SITE_SELECT);
    let mut stmt = store.conn().prepare_cached(&sql)?;
    let row = stmt.query_row(params![code], read_site_row).optional()?;
    Ok(row)
}

/// Sites with measurements inside an inclusive lat/lon box
pub fn sites_in_box(
    store: &Store,
    west: f64,
    south: f64,
    east: f64,
    north: f64,
) -> StoreResult<Vec<SiteRow>> {
    let sql = format!(
        "{} WHERE {}
           AND s.latitude >= ?1 AND s.latitude <= ?2
           AND s.longitude >= ?3 AND s.longitude <= ?4
         ORDER BY sf.samplingfeaturecode",
        SITE_SELECT, HAS_MEASUREMENTS
    );
    let mut stmt = store.conn().prepare_cached(&sql)?;
    let rows = stmt
        .query_map(params![south, north, west, east], read_site_row)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(west, south, east, north, count = rows.len(), "Queried sites in box");
    Ok(rows)
}
