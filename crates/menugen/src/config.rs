//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default structure file path when `MENU_FILE` is unset.
const DEFAULT_MENU_FILE: &str = "./gen_menu.yml";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Path to the menu structure file (default: ./gen_menu.yml).
    pub menu_file: PathBuf,

    /// Whether link attributes from the structure file are written to the
    /// link options bag (default: true).
    pub link_attributes: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let menu_file = menu_file_from_env();

        let link_attributes = link_attributes_from_env();

        Ok(Self {
            database_url,
            database_max_connections,
            menu_file,
            link_attributes,
        })
    }
}

/// Resolve the structure file path from `MENU_FILE`, independent of the
/// rest of the configuration. Used by dry runs, which never touch the
/// database and must not require `DATABASE_URL`.
pub fn menu_file_from_env() -> PathBuf {
    env::var("MENU_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MENU_FILE))
}

/// Resolve the attribute capability flag from `MENU_LINK_ATTRIBUTES`,
/// independent of the rest of the configuration. Dry runs apply the same
/// flag as real runs so both report the same link options.
pub fn link_attributes_from_env() -> bool {
    parse_enabled_flag(env::var("MENU_LINK_ATTRIBUTES").ok().as_deref())
}

/// An unset flag is enabled; `0` and any casing of `false` disable it.
fn parse_enabled_flag(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v != "0" && !v.eq_ignore_ascii_case("false"),
    }
}
