//! Database connection pool management and schema bootstrap.

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Table definitions for the menu store.
const SCHEMA: &str = include_str!("../../../schema/menugen.sql");

/// Create a PostgreSQL connection pool.
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    Ok(pool)
}

/// Create the `menu` and `menu_link` tables if they don't exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("failed to apply schema statement: {statement}"))?;
    }

    Ok(())
}
