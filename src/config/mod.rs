//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::blog::NotifyFailurePolicy;
use crate::cache::DEFAULT_TTL;
use crate::infra::records::RetryPolicy;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const ENV_PREFIX: &str = "FOGLIO";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_RECORDS_ENDPOINT: &str = "https://records.example.com";
const DEFAULT_RECORDS_TIMEOUT_SECS: u64 = 10;

/// Command-line arguments for the Foglio binary.
#[derive(Debug, Parser, Default)]
#[command(name = "foglio", version, about = "Foglio blog API server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOGLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the cache entry lifetime in milliseconds.
    #[arg(long = "cache-ttl-ms", value_name = "MILLISECONDS")]
    pub cache_ttl_ms: Option<u64>,

    /// Override the records endpoint URL.
    #[arg(long = "records-endpoint", value_name = "URL")]
    pub records_endpoint: Option<String>,

    /// Override the per-request records timeout in seconds.
    #[arg(long = "records-timeout-seconds", value_name = "SECONDS")]
    pub records_timeout_seconds: Option<u64>,

    /// Override the records retry budget.
    #[arg(long = "records-max-retries", value_name = "COUNT")]
    pub records_max_retries: Option<u32>,

    /// Override the notify failure policy (log|propagate).
    #[arg(long = "records-failure-policy", value_name = "POLICY")]
    pub records_failure_policy: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(long = "log-json", value_name = "BOOL")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub listen: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct RecordsSettings {
    pub endpoint: Url,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub failure_policy: NotifyFailurePolicy,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub records: RecordsSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    server: RawServer,
    database: RawDatabase,
    cache: RawCache,
    records: RawRecords,
    logging: RawLogging,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServer {
    host: String,
    port: u16,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawDatabase {
    url: Option<String>,
    max_connections: u32,
}

impl Default for RawDatabase {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawCache {
    ttl_ms: u64,
}

impl Default for RawCache {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawRecords {
    endpoint: String,
    timeout_seconds: u64,
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
    backoff_multiplier: f64,
    backoff_jitter_ms: u64,
    failure_policy: String,
}

impl Default for RawRecords {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            endpoint: DEFAULT_RECORDS_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_RECORDS_TIMEOUT_SECS,
            max_retries: retry.max_retries,
            initial_backoff_ms: retry.initial_backoff_ms,
            max_backoff_ms: retry.max_backoff_ms,
            backoff_multiplier: retry.multiplier,
            backoff_jitter_ms: retry.jitter_ms,
            failure_policy: "log".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawLogging {
    level: String,
    json: bool,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Parse CLI arguments and load settings with file → env → CLI precedence.
pub fn load_with_cli() -> Result<Settings, ConfigError> {
    let args = CliArgs::parse();
    load(&args)
}

pub fn load(args: &CliArgs) -> Result<Settings, ConfigError> {
    let mut builder =
        Config::builder().add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false));

    if let Some(path) = &args.config_file {
        builder = builder.add_source(File::from(path.clone()));
    }

    let raw: RawSettings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()?;

    build_settings(raw, args)
}

fn build_settings(mut raw: RawSettings, args: &CliArgs) -> Result<Settings, ConfigError> {
    if let Some(host) = &args.server_host {
        raw.server.host = host.clone();
    }
    if let Some(port) = args.server_port {
        raw.server.port = port;
    }
    if let Some(url) = &args.database_url {
        raw.database.url = Some(url.clone());
    }
    if let Some(count) = args.database_max_connections {
        raw.database.max_connections = count;
    }
    if let Some(ttl) = args.cache_ttl_ms {
        raw.cache.ttl_ms = ttl;
    }
    if let Some(endpoint) = &args.records_endpoint {
        raw.records.endpoint = endpoint.clone();
    }
    if let Some(timeout) = args.records_timeout_seconds {
        raw.records.timeout_seconds = timeout;
    }
    if let Some(retries) = args.records_max_retries {
        raw.records.max_retries = retries;
    }
    if let Some(policy) = &args.records_failure_policy {
        raw.records.failure_policy = policy.clone();
    }
    if let Some(level) = &args.log_level {
        raw.logging.level = level.clone();
    }
    if let Some(json) = args.log_json {
        raw.logging.json = json;
    }

    let listen: SocketAddr = format!("{}:{}", raw.server.host, raw.server.port)
        .parse()
        .map_err(|_| {
            ConfigError::invalid(format!(
                "server.host `{}` and server.port `{}` do not form a socket address",
                raw.server.host, raw.server.port
            ))
        })?;

    let database_url = raw
        .database
        .url
        .ok_or_else(|| ConfigError::invalid("database.url is required"))?;

    if raw.database.max_connections == 0 {
        return Err(ConfigError::invalid(
            "database.max_connections must be at least 1",
        ));
    }
    if raw.cache.ttl_ms == 0 {
        return Err(ConfigError::invalid("cache.ttl_ms must be positive"));
    }

    let endpoint = Url::parse(&raw.records.endpoint).map_err(|err| {
        ConfigError::invalid(format!(
            "records.endpoint `{}` is not a valid URL: {err}",
            raw.records.endpoint
        ))
    })?;

    let failure_policy = raw
        .records
        .failure_policy
        .parse::<NotifyFailurePolicy>()
        .map_err(ConfigError::invalid)?;

    let level = parse_level(&raw.logging.level)?;

    Ok(Settings {
        server: ServerSettings { listen },
        database: DatabaseSettings {
            url: database_url,
            max_connections: raw.database.max_connections,
        },
        cache: CacheSettings {
            ttl: Duration::from_millis(raw.cache.ttl_ms),
        },
        records: RecordsSettings {
            endpoint,
            timeout: Duration::from_secs(raw.records.timeout_seconds),
            retry: RetryPolicy {
                max_retries: raw.records.max_retries,
                initial_backoff_ms: raw.records.initial_backoff_ms,
                max_backoff_ms: raw.records.max_backoff_ms,
                multiplier: raw.records.backoff_multiplier,
                jitter_ms: raw.records.backoff_jitter_ms,
            },
            failure_policy,
        },
        logging: LoggingSettings {
            level,
            format: if raw.logging.json {
                LogFormat::Json
            } else {
                LogFormat::Compact
            },
        },
    })
}

fn parse_level(value: &str) -> Result<LevelFilter, ConfigError> {
    value
        .parse::<LevelFilter>()
        .map_err(|_| ConfigError::invalid(format!("unknown log level `{value}`")))
}
