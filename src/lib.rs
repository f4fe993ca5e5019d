//! # wof-odm2
//!
//! WaterOneFlow data access over an ODM2 relational store. Translates
//! observation requests (site code, variable code, time range) into ODM2
//! queries and maps the rows into WaterML-oriented domain objects ready for a
//! web layer to serialize.
//!
//! ## Modules
//!
//! - [`cvmap`]: ODM2 → WaterML controlled vocabulary mapping
//! - [`store`]: SQLite connection handle, ODM2 schema and raw row types
//! - [`query`]: ODM2 query builders and per-result date bounds
//! - [`model`]: domain objects and the row mapper
//! - [`dao`]: the public facade
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wof_odm2::{Odm2Dao, Store};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dao = Odm2Dao::with_bundled_cvmap()?;
//!     let store = Store::open(Path::new("odm2.sqlite"), true)?;
//!     let session = dao.session(&store);
//!
//!     for series in session.get_series_by_sitecode("USU-LBR-Mendon")? {
//!         println!(
//!             "{} {} .. {}",
//!             series.variable.code, series.begin_date_time, series.end_date_time
//!         );
//!     }
//!
//!     if let Some(values) =
//!         session.get_datavalues("USU-LBR-Mendon", "USU36::96-liquidAqueous", None, None)?
//!     {
//!         println!("{} values", values.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cvmap;
pub mod dao;
pub mod model;
pub mod query;
pub mod store;

pub use config::Config;
pub use cvmap::{CvMapError, CvMapper};
pub use dao::{DaoError, DaoResult, DaoSession, FailurePolicy, Odm2Dao};
pub use model::{
    DataValue, DataValues, MappingError, Method, NoDataValue, QualityControlLevel, Series, Site,
    Source, SpatialReference, Unit, Variable,
};
pub use store::{Store, StoreError, StoreResult};
