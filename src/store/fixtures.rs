//! Seed helpers for in-memory ODM2 stores used by unit tests

use super::Store;
use rusqlite::params;

pub(crate) const T1: &str = "2020-01-01 00:00:00";
pub(crate) const T2: &str = "2020-01-01 01:00:00";
pub(crate) const T3: &str = "2020-01-01 02:00:00";

/// Schema plus the shared reference rows every fixture relies on:
/// spatial reference 1, organization 1 (government agency), person 1,
/// affiliation 1, method 1, processing level 1, units 1 (m), 2 (ft), 10 (min)
pub(crate) fn base() -> Store {
    let store = Store::open_in_memory().unwrap();
    store.install_schema().unwrap();
    store
        .execute_batch(
            "
            INSERT INTO spatialreferences VALUES (1, 'EPSG:4326', 'WGS84', 'World Geodetic System 1984');
            INSERT INTO organizations VALUES (1, 'Government agency', 'USGS', 'US Geological Survey', 'Federal science agency', 'https://www.usgs.gov');
            INSERT INTO organizations VALUES (2, 'University', 'USU', 'Utah State University', NULL, NULL);
            INSERT INTO people VALUES (1, 'Jane', 'Hydro');
            INSERT INTO affiliations VALUES (1, 1, 1, '555-0100', 'jane@usgs.gov', '1 Gauge Rd');
            INSERT INTO affiliations VALUES (2, 1, 2, NULL, 'jane@usu.edu', NULL);
            INSERT INTO methods VALUES (1, 'Instrument deployment', 'PT', 'Pressure transducer', 'Submersible pressure transducer', 'https://example.org/pt', 1);
            INSERT INTO processinglevels VALUES (1, 'Raw', 'Raw data', 'Unchecked sensor output');
            INSERT INTO units VALUES (1, 'Length', 'm', 'meter');
            INSERT INTO units VALUES (2, 'Length', 'ft', 'international foot');
            INSERT INTO units VALUES (10, 'Time', 'min', 'minute');
            ",
        )
        .unwrap();
    store
}

pub(crate) fn add_site(store: &Store, id: i64, code: &str, latitude: f64, longitude: f64) {
    store
        .conn()
        .execute(
            "INSERT INTO samplingfeatures VALUES (?1, 'Site', ?2, ?3, 'test site', 1350.0)",
            params![id, code, format!("{} name", code)],
        )
        .unwrap();
    store
        .conn()
        .execute(
            "INSERT INTO sites VALUES (?1, 'Stream', ?2, ?3, 1)",
            params![id, latitude, longitude],
        )
        .unwrap();
}

pub(crate) fn add_variable(store: &Store, id: i64, code: &str) {
    store
        .conn()
        .execute(
            "INSERT INTO variables VALUES (?1, 'Hydrology', ?2, 'Gage height', 'Water level above datum', 'Not Applicable', -9999.0)",
            params![id, code],
        )
        .unwrap();
}

/// Adds action, feature action, action-by and the measurement result, all
/// keyed by `result_id`, performed at `feature_id`
pub(crate) fn add_result(
    store: &Store,
    result_id: i64,
    feature_id: i64,
    variable_id: i64,
    units_id: i64,
    medium: &str,
) {
    let conn = store.conn();
    conn.execute(
        "INSERT INTO actions VALUES (?1, 'Instrument deployment', 1, '2019-12-31 00:00:00', 0, '2020-01-02 00:00:00', 0)",
        params![result_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO actionby (actionid, affiliationid, isactionlead) VALUES (?1, 1, 1)",
        params![result_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO featureactions VALUES (?1, ?2, ?1)",
        params![result_id, feature_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO results VALUES (?1, ?1, 'Time series coverage', ?2, ?3, 1, ?4, 3)",
        params![result_id, variable_id, units_id, medium],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO measurementresults VALUES (?1, 'Not censored', 'Good', 'Average', 15.0, 10)",
        params![result_id],
    )
    .unwrap();
}

pub(crate) fn add_value(store: &Store, value_id: i64, result_id: i64, value: f64, timestamp: &str) {
    store
        .conn()
        .execute(
            "INSERT INTO measurementresultvalues VALUES (?1, ?2, ?3, ?4, -7)",
            params![value_id, result_id, value, timestamp],
        )
        .unwrap();
}

/// One site `S1`, one variable `V1` measured in unit 1 in `water`, and three
/// values at T1 < T2 < T3 (inserted out of order)
pub(crate) fn standard() -> Store {
    let store = base();
    add_site(&store, 1, "S1", 41.7, -111.8);
    add_variable(&store, 1, "V1");
    add_result(&store, 100, 1, 1, 1, "water");
    add_value(&store, 1000, 100, 2.5, T2);
    add_value(&store, 1001, 100, 1.5, T1);
    add_value(&store, 1002, 100, 3.5, T3);
    store
}

/// Site `SP` with a specimen feature (id 20) related to it, and results on
/// the specimen for variable `NO3` in two units
pub(crate) fn with_specimens() -> Store {
    let store = base();
    add_site(&store, 10, "SP", 40.0, -110.0);
    add_variable(&store, 5, "NO3");
    store
        .execute_batch(
            "
            INSERT INTO samplingfeatures VALUES (20, 'Specimen', 'SP-SPEC-1', 'Grab sample', NULL, NULL);
            INSERT INTO specimens VALUES (20, 'Grab', 'liquidAqueous', 1);
            INSERT INTO relatedfeatures VALUES (1, 20, 'wasCollectedAt', 10);
            ",
        )
        .unwrap();
    add_result(&store, 200, 20, 5, 1, "liquidAqueous");
    add_result(&store, 201, 20, 5, 2, "liquidAqueous");
    store
        .execute_batch(
            "
            UPDATE actions SET begindatetime = '2018-05-01 08:00:00', enddatetime = '2018-05-01 09:00:00' WHERE actionid = 200;
            UPDATE actions SET begindatetime = '2018-06-01 08:00:00', enddatetime = '2018-06-03 10:00:00' WHERE actionid = 201;
            ",
        )
        .unwrap();
    add_value(&store, 2000, 200, 0.4, "2018-05-01 08:30:00");
    add_value(&store, 2001, 201, 1.3, "2018-06-02 08:30:00");
    store
}
