use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use surfsup_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_API_PORT, DEFAULT_DATABASE_PATH,
    DEFAULT_REFERENCE_STATION,
};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::{LeapDayPolicy, UnknownLeapDayPolicy};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "SurfsUp - Read-only climate API over Hawaii weather station observations"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $SURFSUP_CONFIG, ./surfsup.toml,
    /// $XDG_CONFIG_HOME/surfsup/surfsup.toml, /etc/surfsup/surfsup.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "SURFSUP_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "SURFSUP_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SURFSUP_PORT")]
    pub port: Option<String>,

    /// Public URL used for links on the home page
    #[arg(short, long, env = "SURFSUP_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// SQLite file holding the `measurement` and `station` tables
    #[arg(long, env = "SURFSUP_DATABASE")]
    #[serde(alias = "database_path")]
    pub database: Option<String>,

    /// Station reported by /api/v1.0/tobs when no station is requested
    #[arg(short = 's', long, env = "SURFSUP_REFERENCE_STATION")]
    pub reference_station: Option<String>,

    /// What to do when the latest date is Feb 29: reject or clamp
    #[arg(long, env = "SURFSUP_LEAP_DAY")]
    pub leap_day: Option<String>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn remote_url(&self) -> String {
        self.remote_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host(), self.port()))
    }

    pub fn database(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
    }

    pub fn reference_station(&self) -> String {
        self.reference_station
            .clone()
            .unwrap_or_else(|| DEFAULT_REFERENCE_STATION.to_string())
    }

    pub fn leap_day(&self) -> Result<LeapDayPolicy, UnknownLeapDayPolicy> {
        self.leap_day
            .as_deref()
            .map_or(Ok(LeapDayPolicy::default()), str::parse)
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(fallback.level),
            domain: self.domain.or(fallback.domain),
            port: self.port.or(fallback.port),
            remote_url: self.remote_url.or(fallback.remote_url),
            database: self.database.or(fallback.database),
            reference_station: self.reference_station.or(fallback.reference_station),
            leap_day: self.leap_day.or(fallback.leap_day),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> anyhow::Result<(Cli, ConfigSource)> {
    resolve_config(Cli::parse())
}

/// Fill unset CLI values from the config file named by `--config`, or the first one
/// discovered. A file that cannot be read or parsed is an error.
pub fn resolve_config(cli_args: Cli) -> anyhow::Result<(Cli, ConfigSource)> {
    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("SURFSUP_CONFIG", "surfsup.toml")
    };

    let file_config: Cli = load_config(&source)?;

    // env vars are handled by clap
    Ok((cli_args.or(file_config), source))
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
