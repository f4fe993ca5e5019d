//! ODM2 data access facade
//!
//! [`Odm2Dao`] holds the CV mapping and the failure policy and nothing else.
//! Callers open a [`Store`] per request and borrow a [`DaoSession`] over it:
//!
//! ```rust,no_run
//! use wof_odm2::{Odm2Dao, Store};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dao = Odm2Dao::with_bundled_cvmap()?;
//! let store = Store::open(Path::new("odm2.sqlite"), true)?;
//!
//! let session = dao.session(&store);
//! if let Some(site) = session.get_site_by_code("USU-LBR-Mendon")? {
//!     println!("{} at {}, {}", site.code, site.latitude, site.longitude);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Each operation sequences query → date bounds → mapping inside a tracing
//! span tagged with a fresh request id.

mod context;
pub mod dates;
mod error;
mod policy;

pub use dates::parse_datetime;
pub use error::{DaoError, DaoResult};
pub use policy::FailurePolicy;

use crate::config::Config;
use crate::cvmap::CvMapper;
use crate::model::{
    mapper, variable_key, DataValue, DataValues, MappingError, Method, QualityControlLevel,
    Series, Site, Source, Variable,
};
use crate::query::values::TimeRange;
use crate::query::{self, catalog, series, sites, values, variables};
use crate::store::rows::{MeasurementResultRow, ValueRow};
use crate::store::Store;
use context::RequestContext;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info_span, Span};
use uuid::Uuid;

/// WaterOneFlow DAO over an ODM2 store
#[derive(Debug, Clone)]
pub struct Odm2Dao {
    cvmap: CvMapper,
    policy: FailurePolicy,
}

impl Odm2Dao {
    pub fn new(cvmap: CvMapper, policy: FailurePolicy) -> Self {
        Self { cvmap, policy }
    }

    /// Bundled CV mapping, best-effort policy
    pub fn with_bundled_cvmap() -> DaoResult<Self> {
        Ok(Self::new(CvMapper::bundled()?, FailurePolicy::default()))
    }

    /// CV mapping from `[cvmap].path` (bundled when unset) and the
    /// configured policy
    pub fn from_config(config: &Config) -> DaoResult<Self> {
        let cvmap = match &config.cvmap.path {
            Some(path) => CvMapper::from_path(Path::new(path))?,
            None => CvMapper::bundled()?,
        };
        Ok(Self::new(cvmap, config.dao.failure_policy))
    }

    /// Borrow a session over an open store
    pub fn session<'a>(&'a self, store: &'a Store) -> DaoSession<'a> {
        DaoSession { dao: self, store }
    }
}

/// DAO operations bound to one open store
pub struct DaoSession<'a> {
    dao: &'a Odm2Dao,
    store: &'a Store,
}

fn request_span(operation: &'static str) -> Span {
    info_span!("dao", operation, request_id = %Uuid::new_v4())
}

impl<'a> DaoSession<'a> {
    /// Run `body` in a request span and settle store faults per policy
    fn run<T>(
        &self,
        operation: &'static str,
        fallback: impl FnOnce() -> T,
        body: impl FnOnce(&mut RequestContext) -> DaoResult<T>,
    ) -> DaoResult<T> {
        let span = request_span(operation);
        let _guard = span.enter();
        let mut ctx = RequestContext::default();
        let outcome = body(&mut ctx);
        self.dao.policy.settle(operation, outcome, fallback)
    }

    /// Liveness probe: false (or an error under the strict policy) when the
    /// store cannot answer a trivial query
    pub fn db_check(&self) -> DaoResult<bool> {
        self.run(
            "db_check",
            || false,
            |_| {
                self.store.ping()?;
                Ok(true)
            },
        )
    }

    // ---- sites ----

    /// Sites with at least one measurement result
    pub fn get_all_sites(&self) -> DaoResult<Vec<Site>> {
        self.run("get_all_sites", Vec::new, |_| {
            let rows = sites::all_sites(self.store)?;
            Ok(rows
                .iter()
                .map(|row| mapper::map_site(row, None))
                .collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// `None` when no site has the code
    pub fn get_site_by_code(&self, site_code: &str) -> DaoResult<Option<Site>> {
        self.run("get_site_by_code", || None, |ctx| {
            self.site_with_agency(ctx, site_code)
        })
    }

    /// Sites for each known code, in request order; unknown codes are skipped
    pub fn get_sites_by_codes<S: AsRef<str>>(&self, site_codes: &[S]) -> DaoResult<Vec<Site>> {
        self.run("get_sites_by_codes", Vec::new, |ctx| {
            let mut out = Vec::with_capacity(site_codes.len());
            for code in site_codes {
                if let Some(site) = self.site_with_agency(ctx, code.as_ref())? {
                    out.push(site);
                }
            }
            Ok(out)
        })
    }

    /// Sites with measurements inside an inclusive box
    pub fn get_sites_by_box(
        &self,
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    ) -> DaoResult<Vec<Site>> {
        self.run("get_sites_by_box", Vec::new, |_| {
            let rows = sites::sites_in_box(self.store, west, south, east, north)?;
            Ok(rows
                .iter()
                .map(|row| mapper::map_site(row, None))
                .collect::<Result<Vec<_>, _>>()?)
        })
    }

    fn site_with_agency(
        &self,
        ctx: &mut RequestContext,
        site_code: &str,
    ) -> DaoResult<Option<Site>> {
        let Some(row) = ctx.site(self.store, site_code)? else {
            debug!(site_code = %site_code, "Site not found");
            return Ok(None);
        };
        let affiliation = ctx.site_affiliation(self.store, site_code)?;
        Ok(Some(mapper::map_site(&row, affiliation.as_ref())?))
    }

    // ---- variables ----

    /// One variable per distinct (variable, units, medium) in use
    pub fn get_all_variables(&self) -> DaoResult<Vec<Variable>> {
        self.run("get_all_variables", Vec::new, |_| {
            let rows = variables::distinct_variable_results(self.store)?;
            self.map_variables(&rows)
        })
    }

    /// The last variable matching the code token
    pub fn get_variable_by_code(&self, var_code: &str) -> DaoResult<Option<Variable>> {
        self.run("get_variable_by_code", || None, |ctx| {
            let token = ctx.token(var_code);
            let rows = variables::variable_results_for_token(self.store, &token)?;
            Ok(self.map_variables(&rows)?.pop())
        })
    }

    /// Variables matching any of the code tokens, grouped by token in
    /// request order
    pub fn get_variables_by_codes<S: AsRef<str>>(
        &self,
        var_codes: &[S],
    ) -> DaoResult<Vec<Variable>> {
        self.run("get_variables_by_codes", Vec::new, |ctx| {
            let mut out = Vec::new();
            for code in var_codes {
                let token = ctx.token(code.as_ref());
                let rows = variables::variable_results_for_token(self.store, &token)?;
                out.extend(self.map_variables(&rows)?);
            }
            Ok(out)
        })
    }

    fn map_variables(&self, rows: &[MeasurementResultRow]) -> DaoResult<Vec<Variable>> {
        Ok(rows
            .iter()
            .map(|row| mapper::map_variable(row, &self.dao.cvmap))
            .collect::<Result<Vec<_>, _>>()?)
    }

    // ---- series ----

    /// Series for every result at the site that has values, dated by its
    /// earliest and latest value
    pub fn get_series_by_sitecode(&self, site_code: &str) -> DaoResult<Vec<Series>> {
        self.run("get_series_by_sitecode", Vec::new, |ctx| {
            let rows = series::results_for_site(self.store, site_code)?;
            let ids: Vec<i64> = rows.iter().map(|r| r.result_id).collect();
            let bounds = query::compute_date_bounds(self.store, &ids)?;

            let mut out = Vec::with_capacity(rows.len());
            for row in &rows {
                let Some(&(begin, end)) = bounds.get(&row.result_id) else {
                    debug!(result_id = row.result_id, "Skipping result without values");
                    continue;
                };
                let affiliation = match &row.action {
                    Some(action) => ctx.action_affiliation(self.store, action.id)?,
                    None => None,
                };
                out.push(mapper::map_series(
                    row,
                    affiliation.as_ref(),
                    begin,
                    end,
                    &self.dao.cvmap,
                )?);
            }
            debug!(site_code = %site_code, count = out.len(), "Resolved site series");
            Ok(out)
        })
    }

    /// Series for specimens related to the site, dated by the specimen
    /// action range; `None` when the site does not exist
    pub fn get_series_by_sitecode_and_varcode(
        &self,
        site_code: &str,
        var_code: &str,
    ) -> DaoResult<Option<Vec<Series>>> {
        self.run("get_series_by_sitecode_and_varcode", || None, |ctx| {
            let Some(site) = ctx.site(self.store, site_code)? else {
                return Ok(None);
            };
            let token = ctx.token(var_code);
            let ranges = series::specimen_action_ranges(self.store, site.sampling_feature_id, &token)?;
            let rows = series::specimen_results(self.store, site.sampling_feature_id, &token)?;

            let mut out = Vec::new();
            for row in &rows {
                let matching = ranges.iter().filter(|range| {
                    Some(range.variable_id) == row.variable_id
                        && Some(range.units_id) == row.units_id
                });
                for range in matching {
                    let Some(begin) = range.begin else { continue };
                    let end = range.end.unwrap_or(begin);
                    let organization_id = row
                        .action
                        .as_ref()
                        .and_then(|a| a.method.as_ref())
                        .and_then(|m| m.organization_id);
                    let affiliation = match organization_id {
                        Some(id) => ctx.organization_affiliation(self.store, id)?,
                        None => None,
                    };
                    out.push(mapper::map_series(
                        row,
                        affiliation.as_ref(),
                        begin,
                        end,
                        &self.dao.cvmap,
                    )?);
                }
            }
            Ok(Some(out))
        })
    }

    // ---- data values ----

    /// Values for a site and composite variable code, oldest first
    ///
    /// A range applies only when both `begin` and `end` are given. Returns
    /// `None` when the site does not exist; grouped by composite variable key
    /// when the code named neither unit nor medium, flat otherwise.
    pub fn get_datavalues(
        &self,
        site_code: &str,
        var_code: &str,
        begin: Option<&str>,
        end: Option<&str>,
    ) -> DaoResult<Option<DataValues>> {
        let range = match (non_blank(begin), non_blank(end)) {
            (Some(b), Some(e)) => Some(TimeRange {
                begin: parse_datetime(b)?,
                end: parse_datetime(e)?,
            }),
            _ => None,
        };

        self.run("get_datavalues", || None, |ctx| {
            if ctx.site(self.store, site_code)?.is_none() {
                return Ok(None);
            }
            let token = ctx.token(var_code);
            let rows = values::values_for_site_variable(self.store, site_code, &token, range)?;

            if token.is_unfiltered() {
                let mut groups: BTreeMap<String, Vec<DataValue>> = BTreeMap::new();
                for row in &rows {
                    let units_id = row
                        .units_id
                        .ok_or_else(|| MappingError::incomplete("value", row.value_id, "units"))?;
                    let key = variable_key(&row.variable_code, units_id, &row.sampled_medium);
                    let value = self.map_value(ctx, row)?;
                    groups.entry(key).or_default().push(value);
                }
                Ok(Some(DataValues::Grouped(groups)))
            } else {
                let values = rows
                    .iter()
                    .map(|row| self.map_value(ctx, row))
                    .collect::<DaoResult<Vec<_>>>()?;
                Ok(Some(DataValues::Flat(values)))
            }
        })
    }

    fn map_value(
        &self,
        ctx: &mut RequestContext,
        row: &ValueRow,
    ) -> DaoResult<DataValue> {
        let affiliation = match row.organization_id {
            Some(id) => ctx.organization_affiliation(self.store, id)?,
            None => None,
        };
        Ok(mapper::map_data_value(row, affiliation.as_ref())?)
    }

    // ---- catalog ----

    pub fn get_method_by_id(&self, method_id: i64) -> DaoResult<Option<Method>> {
        self.run("get_method_by_id", || None, |_| {
            Ok(catalog::method_by_id(self.store, method_id)?
                .as_ref()
                .map(mapper::map_method))
        })
    }

    pub fn get_methods_by_ids(&self, method_ids: &[i64]) -> DaoResult<Vec<Method>> {
        self.run("get_methods_by_ids", Vec::new, |_| {
            Ok(catalog::methods_by_ids(self.store, method_ids)?
                .iter()
                .map(mapper::map_method)
                .collect())
        })
    }

    /// Source for an affiliation id
    pub fn get_source_by_id(&self, source_id: i64) -> DaoResult<Option<Source>> {
        self.run("get_source_by_id", || None, |_| {
            match catalog::affiliation_by_id(self.store, source_id)? {
                Some(row) => Ok(Some(mapper::map_source(&row)?)),
                None => Ok(None),
            }
        })
    }

    pub fn get_sources_by_ids(&self, source_ids: &[i64]) -> DaoResult<Vec<Source>> {
        self.run("get_sources_by_ids", Vec::new, |_| {
            Ok(catalog::affiliations_by_ids(self.store, source_ids)?
                .iter()
                .map(mapper::map_source)
                .collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn get_qualcontrollvl_by_id(&self, level_id: i64) -> DaoResult<Option<QualityControlLevel>> {
        self.run("get_qualcontrollvl_by_id", || None, |_| {
            Ok(catalog::processing_level_by_id(self.store, level_id)?
                .as_ref()
                .map(mapper::map_quality_control_level))
        })
    }

    pub fn get_qualcontrollvls_by_ids(
        &self,
        level_ids: &[i64],
    ) -> DaoResult<Vec<QualityControlLevel>> {
        self.run("get_qualcontrollvls_by_ids", Vec::new, |_| {
            Ok(catalog::processing_levels_by_ids(self.store, level_ids)?
                .iter()
                .map(mapper::map_quality_control_level)
                .collect())
        })
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
