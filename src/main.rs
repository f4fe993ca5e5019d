//! wof-odm2 CLI
//!
//! Command-line front end for the ODM2 data access layer:
//! - Create and seed an ODM2 SQLite database
//! - Check database health
//! - Run any DAO operation and print the result as a table or JSON

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wof_odm2::config::{generate_default_config, LoggingConfig};
use wof_odm2::store::ODM2_TABLES;
use wof_odm2::{
    Config, DataValue, DataValues, Method, Odm2Dao, QualityControlLevel, Series, Site, Source,
    Store, Variable,
};

#[derive(Parser)]
#[command(name = "wof-odm2")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "WaterOneFlow data access over an ODM2 database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ODM2 tables in the configured database
    Init,

    /// Run a SQL script against the configured database
    Load {
        /// Path to the SQL file
        script: PathBuf,
    },

    /// Check that the database answers queries
    Check,

    /// List sites with measurements, optionally inside a bounding box
    Sites {
        #[arg(long, allow_negative_numbers = true, requires_all = ["south", "east", "north"])]
        west: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        south: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        east: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        north: Option<f64>,
    },

    /// Show sites by code
    Site {
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// List variables in use, or those matching the given codes
    Variables {
        /// Variable codes: CODE, CODE::UNITID or CODE::UNITID-MEDIUM
        codes: Vec<String>,
    },

    /// List series at a site
    Series {
        site: String,
        /// Restrict to specimens of this variable code
        #[arg(short, long)]
        variable: Option<String>,
    },

    /// Show data values for a site and variable code
    Values {
        site: String,
        variable: String,
        /// Range start (both ends are needed for a range)
        #[arg(short, long)]
        begin: Option<String>,
        /// Range end
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Show methods by id
    Methods {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show sources by affiliation id
    Sources {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show quality control levels by processing level id
    Qcls {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, config)
                    .with_context(|| format!("writing config to {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging)?;

    tracing::debug!(
        db = %config.database.path,
        policy = %config.dao.failure_policy,
        "wof-odm2 v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_path = Path::new(&config.database.path);

    match cli.command {
        Commands::Init => {
            let store = Store::open(db_path, false)?;
            store.install_schema()?;
            tracing::info!(path = %db_path.display(), "Installed ODM2 schema");
            println!("ODM2 schema installed in {}", db_path.display());
        }

        Commands::Load { script } => {
            let store = Store::open(db_path, false)?;
            store
                .execute_script(&script)
                .with_context(|| format!("loading {:?}", script))?;
            tracing::info!(script = %script.display(), "Loaded SQL script");
            println!("Loaded {}", script.display());
        }

        Commands::Check => {
            let store = Store::open(db_path, true)?;
            let dao = Odm2Dao::from_config(&config)?;
            let healthy = dao.session(&store).db_check()?;

            println!("Database: {}", db_path.display());
            println!("Status:   {}", if healthy { "ok" } else { "unreachable" });
            if healthy {
                for table in ODM2_TABLES {
                    match store.table_count(table) {
                        Ok(count) => println!("  {:<26} {:>10}", table, count),
                        Err(e) => println!("  {:<26} {:>10}", table, format!("error: {}", e)),
                    }
                }
            } else {
                bail!("database at {} is not answering queries", db_path.display());
            }
        }

        Commands::Sites {
            west,
            south,
            east,
            north,
        } => {
            let (store, dao) = open_dao(&config)?;
            let session = dao.session(&store);
            let sites = match (west, south, east, north) {
                (Some(w), Some(s), Some(e), Some(n)) => session.get_sites_by_box(w, s, e, n)?,
                _ => session.get_all_sites()?,
            };
            output(cli.format, sites.as_slice(), print_sites)?;
        }

        Commands::Site { codes } => {
            let (store, dao) = open_dao(&config)?;
            let sites = dao.session(&store).get_sites_by_codes(&codes)?;
            output(cli.format, sites.as_slice(), print_sites)?;
        }

        Commands::Variables { codes } => {
            let (store, dao) = open_dao(&config)?;
            let session = dao.session(&store);
            let variables = if codes.is_empty() {
                session.get_all_variables()?
            } else {
                session.get_variables_by_codes(&codes)?
            };
            output(cli.format, variables.as_slice(), print_variables)?;
        }

        Commands::Series { site, variable } => {
            let (store, dao) = open_dao(&config)?;
            let session = dao.session(&store);
            let series = match variable {
                Some(var) => match session.get_series_by_sitecode_and_varcode(&site, &var)? {
                    Some(series) => series,
                    None => bail!("site not found: {}", site),
                },
                None => session.get_series_by_sitecode(&site)?,
            };
            output(cli.format, series.as_slice(), print_series)?;
        }

        Commands::Values {
            site,
            variable,
            begin,
            end,
        } => {
            let (store, dao) = open_dao(&config)?;
            let Some(values) = dao.session(&store).get_datavalues(
                &site,
                &variable,
                begin.as_deref(),
                end.as_deref(),
            )?
            else {
                bail!("site not found: {}", site);
            };
            output(cli.format, &values, print_values)?;
        }

        Commands::Methods { ids } => {
            let (store, dao) = open_dao(&config)?;
            let methods = dao.session(&store).get_methods_by_ids(&ids)?;
            output(cli.format, methods.as_slice(), print_methods)?;
        }

        Commands::Sources { ids } => {
            let (store, dao) = open_dao(&config)?;
            let sources = dao.session(&store).get_sources_by_ids(&ids)?;
            output(cli.format, sources.as_slice(), print_sources)?;
        }

        Commands::Qcls { ids } => {
            let (store, dao) = open_dao(&config)?;
            let levels = dao.session(&store).get_qualcontrollvls_by_ids(&ids)?;
            output(cli.format, levels.as_slice(), print_qcls)?;
        }

        // written before the config was loaded
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn open_dao(config: &Config) -> anyhow::Result<(Store, Odm2Dao)> {
    let store = Store::open(Path::new(&config.database.path), config.database.read_only)
        .with_context(|| format!("opening {}", config.database.path))?;
    let dao = Odm2Dao::from_config(config)?;
    Ok((store, dao))
}

/// Registry with an env filter (RUST_LOG wins over the configured level) and
/// one fmt layer on stderr or the configured file
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match &logging.file {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {:?}", path))?;
            Some(Mutex::new(f))
        }
        None => None,
    };
    let json = logging.format.eq_ignore_ascii_case("json");

    let registry = tracing_subscriber::registry().with(filter);
    match (json, file) {
        (true, Some(f)) => registry.with(fmt::layer().json().with_writer(f)).init(),
        (true, None) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        (false, Some(f)) => registry
            .with(fmt::layer().with_ansi(false).with_writer(f))
            .init(),
        (false, None) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

fn output<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
    table: fn(&T),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Table => table(data),
    }
    Ok(())
}

fn opt(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("-")
}

fn print_sites(sites: &[Site]) {
    if sites.is_empty() {
        println!("No sites");
        return;
    }
    println!(
        "{:<20} {:<32} {:>10} {:>11} {:<10}",
        "Code", "Name", "Latitude", "Longitude", "Agency"
    );
    println!("{}", "-".repeat(87));
    for site in sites {
        println!(
            "{:<20} {:<32} {:>10.5} {:>11.5} {:<10}",
            site.code,
            opt(&site.name),
            site.latitude,
            site.longitude,
            opt(&site.agency_code)
        );
    }
}

fn print_variables(variables: &[Variable]) {
    if variables.is_empty() {
        println!("No variables");
        return;
    }
    println!(
        "{:<28} {:<24} {:<16} {:<10} {:<8}",
        "Code", "Name", "Medium", "Data type", "Units"
    );
    println!("{}", "-".repeat(90));
    for v in variables {
        println!(
            "{:<28} {:<24} {:<16} {:<10} {:<8}",
            v.code,
            v.name,
            v.sample_medium,
            opt(&v.data_type),
            v.units.abbreviation
        );
    }
}

fn print_series(series: &[Series]) {
    if series.is_empty() {
        println!("No series");
        return;
    }
    println!(
        "{:>8} {:<28} {:<20} {:<20} {:>8}",
        "Id", "Variable", "Begin", "End", "Count"
    );
    println!("{}", "-".repeat(88));
    for s in series {
        println!(
            "{:>8} {:<28} {:<20} {:<20} {:>8}",
            s.series_id,
            s.variable.code,
            s.begin_date_time.format("%Y-%m-%d %H:%M:%S"),
            s.end_date_time.format("%Y-%m-%d %H:%M:%S"),
            s.value_count
        );
    }
}

fn print_value_rows(values: &[DataValue]) {
    for v in values {
        println!(
            "  {:<26} {:>12} {:<14} {:<6}",
            v.date_time_iso(),
            v.value,
            v.censor_code,
            v.quality_control_level_code
        );
    }
}

fn print_values(values: &DataValues) {
    if values.is_empty() {
        println!("No data values");
        return;
    }
    match values {
        DataValues::Flat(values) => print_value_rows(values),
        DataValues::Grouped(groups) => {
            for (key, values) in groups {
                println!("{} ({} values)", key, values.len());
                print_value_rows(values);
            }
        }
    }
}

fn print_methods(methods: &[Method]) {
    for m in methods {
        println!("{:>6} {:<16} {}", m.id, m.code, opt(&m.description));
    }
}

fn print_sources(sources: &[Source]) {
    for s in sources {
        println!(
            "{:>6} {:<32} {:<24} {}",
            s.source_id,
            opt(&s.organization),
            s.contact_name,
            s.email
        );
    }
}

fn print_qcls(levels: &[QualityControlLevel]) {
    for l in levels {
        println!("{:>6} {:<10} {}", l.id, l.code, opt(&l.definition));
    }
}
