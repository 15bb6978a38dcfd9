//! Menu model.
//!
//! A menu is a named grouping of links (e.g., "main", "footer"). Its id is
//! a slug derived from the structure file's menu key; the generator creates
//! each menu at most once and reuses it on later runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Menu record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Menu {
    /// Slug identifier (e.g., "main-menu"). Unique across the store.
    pub id: String,

    /// Display label.
    pub label: String,

    /// Optional free-form description (empty string when absent).
    pub description: String,

    /// Language code (e.g., "en").
    pub langcode: String,
}

/// Input for creating a menu.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMenu {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub langcode: Option<String>,
}

impl Menu {
    /// Create a new menu.
    pub async fn create(pool: &PgPool, input: CreateMenu) -> Result<Self> {
        let description = input.description.unwrap_or_default();
        let langcode = input.langcode.unwrap_or_else(|| "en".to_string());

        let menu = sqlx::query_as::<_, Menu>(
            r#"
            INSERT INTO menu (id, label, description, langcode)
            VALUES ($1, $2, $3, $4)
            RETURNING id, label, description, langcode
            "#,
        )
        .bind(&input.id)
        .bind(&input.label)
        .bind(&description)
        .bind(&langcode)
        .fetch_one(pool)
        .await
        .context("failed to create menu")?;

        Ok(menu)
    }

    /// Find a menu by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>> {
        let menu = sqlx::query_as::<_, Menu>(
            "SELECT id, label, description, langcode FROM menu WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch menu by id")?;

        Ok(menu)
    }

    /// Check whether a menu with this ID exists.
    pub async fn exists(pool: &PgPool, id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM menu WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
            .context("failed to check menu existence")?;

        Ok(exists)
    }
}
