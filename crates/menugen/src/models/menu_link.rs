//! Menu link model.
//!
//! Represents navigational links organized into named menus. Each link
//! belongs to a menu and may reference a parent link for hierarchical
//! structures. The `options` column is a JSON bag of renderer hints
//! (e.g., CSS classes) populated from link attributes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Menu link record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuLink {
    /// Unique identifier (UUIDv7), assigned at creation.
    pub id: Uuid,

    /// Menu this link belongs to (foreign key to menu.id).
    pub menu_name: String,

    /// Display title.
    pub title: String,

    /// Link destination: internal path, route, or external URL.
    pub uri: String,

    /// Optional parent link for hierarchy.
    pub parent_id: Option<Uuid>,

    /// Sort weight (lower = higher priority).
    pub weight: i32,

    /// Renderer options (JSON object of string values).
    pub options: serde_json::Value,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub changed: i64,
}

/// Input for creating a menu link.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMenuLink {
    pub menu_name: String,
    pub title: String,
    pub uri: String,
    pub parent_id: Option<Uuid>,
    pub weight: Option<i32>,
    pub options: Option<serde_json::Value>,
}

impl MenuLink {
    /// Create a new menu link.
    pub async fn create(pool: &PgPool, input: CreateMenuLink) -> Result<Self> {
        let id = Uuid::now_v7();
        let now = chrono::Utc::now().timestamp();
        let weight = input.weight.unwrap_or(0);
        let options = input.options.unwrap_or_else(|| serde_json::json!({}));

        let link = sqlx::query_as::<_, MenuLink>(
            r#"
            INSERT INTO menu_link (id, menu_name, title, uri, parent_id, weight, options, created, changed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, menu_name, title, uri, parent_id, weight, options, created, changed
            "#,
        )
        .bind(id)
        .bind(&input.menu_name)
        .bind(&input.title)
        .bind(&input.uri)
        .bind(input.parent_id)
        .bind(weight)
        .bind(&options)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .context("failed to create menu link")?;

        Ok(link)
    }

    /// Check whether any link already claims this menu name.
    ///
    /// This queries a broader namespace than the menu table alone: links can
    /// reference a menu name that has no menu record (an orphaned
    /// reservation left behind by external deletion).
    pub async fn menu_name_in_use(pool: &PgPool, menu_name: &str) -> Result<bool> {
        let in_use: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM menu_link WHERE menu_name = $1)")
                .bind(menu_name)
                .fetch_one(pool)
                .await
                .context("failed to check menu name usage")?;

        Ok(in_use)
    }
}
