//! # Configuration
//!
//! Settings resolve with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.carsharing/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CarSharingConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub database_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DATABASE_DIR: &str = "db";
pub const DEFAULT_DATABASE_NAME: &str = "carsharing";
pub const DEFAULT_LOG_FILE: &str = "carsharing.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub database_path: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.carsharing/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".carsharing").join("config.toml"))
}

/// Load config from `~/.carsharing/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CarSharingConfig::default()`.
pub fn load_config() -> Result<CarSharingConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(CarSharingConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(CarSharingConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path. A missing file is an error here.
pub fn load_config_from(path: &Path) -> Result<CarSharingConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: CarSharingConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Car Sharing Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [storage]
# database_file = "db/carsharing.json"   # Or set CARSHARING_DATABASE env var

# [logging]
# level = "debug"                        # "off", "error", "warn", "info", "debug", "trace"
# file = "carsharing.log"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// `db/<name>.json` for a bare database name given on the command line.
pub fn database_path_for(name: &str) -> PathBuf {
    let file = if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.json")
    };
    Path::new(DEFAULT_DATABASE_DIR).join(file)
}

pub const DATABASE_ENV: &str = "CARSHARING_DATABASE";
pub const LOG_LEVEL_ENV: &str = "CARSHARING_LOG_LEVEL";

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_database` is the `--database-file-name` flag (None = not specified).
pub fn resolve(config: &CarSharingConfig, cli_database: Option<&str>) -> ResolvedConfig {
    resolve_with(config, cli_database, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with(
    config: &CarSharingConfig,
    cli_database: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Database: CLI → env → config → default
    let database_path = cli_database
        .map(database_path_for)
        .or_else(|| env(DATABASE_ENV).map(PathBuf::from))
        .or_else(|| config.storage.database_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| database_path_for(DEFAULT_DATABASE_NAME));

    // Log level: env → config → default
    let log_level = env(LOG_LEVEL_ENV)
        .or_else(|| config.logging.level.clone())
        .map(|level| parse_level(&level))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let log_file = config
        .logging
        .file
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    ResolvedConfig {
        database_path,
        log_file,
        log_level,
    }
}

fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or_else(|_| {
        warn!("Unknown log level {level:?}, using {DEFAULT_LOG_LEVEL}");
        DEFAULT_LOG_LEVEL
    })
}
