//! Per-result value time bounds
//!
//! Two grouped aggregates (MIN and MAX of `valuedatetime` per result, as
//! instants) restricted to an id set, merged by result id. Results with no values are
//! absent from the map.

use super::{instant_extreme, placeholders};
use crate::store::{Store, StoreResult};
use chrono::NaiveDateTime;
use rusqlite::params_from_iter;
use std::collections::HashMap;

pub type DateBounds = HashMap<i64, (NaiveDateTime, NaiveDateTime)>;

/// Earliest and latest value timestamp for each result id
pub fn compute_date_bounds(store: &Store, result_ids: &[i64]) -> StoreResult<DateBounds> {
    if result_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let starts = grouped_extreme(store, "MIN", result_ids)?;
    let ends = grouped_extreme(store, "MAX", result_ids)?;

    let bounds: DateBounds = starts
        .into_iter()
        .filter_map(|(id, start)| ends.get(&id).map(|end| (id, (start, *end))))
        .collect();

    tracing::debug!(
        requested = result_ids.len(),
        resolved = bounds.len(),
        "Computed value date bounds"
    );

    Ok(bounds)
}

fn grouped_extreme(
    store: &Store,
    func: &str,
    result_ids: &[i64],
) -> StoreResult<HashMap<i64, NaiveDateTime>> {
    let sql = format!(
        "SELECT resultid, {} FROM measurementresultvalues
         WHERE resultid IN ({})
         GROUP BY resultid",
        instant_extreme(func, "valuedatetime"),
        placeholders(result_ids.len())
    );
    let mut stmt = store.conn().prepare(&sql)?;
    let map = stmt
        .query_map(params_from_iter(result_ids.iter()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, NaiveDateTime>(1)?))
        })?
        .collect::<Result<HashMap<_, _>, _>>()?;
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{self, add_result, add_value, T1, T3};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_true_min_and_max_per_result() {
        let store = fixtures::standard();
        let bounds = compute_date_bounds(&store, &[100]).unwrap();

        assert_eq!(bounds.len(), 1);
        let (start, end) = bounds[&100];
        assert_eq!(start.to_string(), T1);
        assert_eq!(end.to_string(), T3);
    }

    #[test]
    fn test_empty_ids_return_empty_map() {
        // no schema: would fail if the store were touched
        let store = Store::open_in_memory().unwrap();
        assert!(compute_date_bounds(&store, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_result_without_values_is_absent() {
        let store = fixtures::standard();
        add_result(&store, 101, 1, 1, 2, "water");

        let bounds = compute_date_bounds(&store, &[100, 101, 999]).unwrap();
        assert!(bounds.contains_key(&100));
        assert!(!bounds.contains_key(&101));
        assert!(!bounds.contains_key(&999));
    }

    #[test]
    fn test_several_results() {
        let store = fixtures::standard();
        add_result(&store, 101, 1, 1, 2, "water");
        add_value(&store, 1100, 101, 9.0, "2021-03-04 05:00:00");
        add_value(&store, 1101, 101, 9.5, "2021-03-01 05:00:00");
        add_value(&store, 1102, 101, 9.9, "2021-03-09 05:00:00");

        let bounds = compute_date_bounds(&store, &[100, 101]).unwrap();
        assert_eq!(bounds.len(), 2);
        assert_eq!(bounds[&101], (at(2021, 3, 1, 5), at(2021, 3, 9, 5)));
    }

    #[test]
    fn test_mixed_separators_compare_as_instants() {
        let store = fixtures::standard();
        add_result(&store, 101, 1, 1, 2, "water");
        add_value(&store, 1100, 101, 1.0, "2021-03-01T02:00:00");
        add_value(&store, 1101, 101, 2.0, "2021-03-01 05:00:00");
        add_value(&store, 1102, 101, 3.0, "2021-03-01T04:00:00");

        let bounds = compute_date_bounds(&store, &[101]).unwrap();
        let (begin, end) = bounds[&101];
        assert_eq!(begin, at(2021, 3, 1, 2));
        assert_eq!(end, at(2021, 3, 1, 5));
        assert!(begin <= end);
    }
}
