//! PostgreSQL implementations of the storage traits.
//!
//! Thin delegations to the sqlx models; all SQL lives in `crate::models`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::{MenuLinkStorage, MenuStorage};
use crate::models::{CreateMenu, CreateMenuLink, Menu, MenuLink};

/// Menu storage backed by the `menu` table.
#[derive(Clone)]
pub struct PgMenuStorage {
    pool: PgPool,
}

impl PgMenuStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuStorage for PgMenuStorage {
    async fn exists(&self, id: &str) -> Result<bool> {
        Menu::exists(&self.pool, id).await
    }

    async fn load(&self, id: &str) -> Result<Option<Menu>> {
        Menu::find_by_id(&self.pool, id).await
    }

    async fn create(&self, input: CreateMenu) -> Result<Menu> {
        Menu::create(&self.pool, input).await
    }
}

/// Menu link storage backed by the `menu_link` table.
#[derive(Clone)]
pub struct PgMenuLinkStorage {
    pool: PgPool,
}

impl PgMenuLinkStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuLinkStorage for PgMenuLinkStorage {
    async fn create(&self, input: CreateMenuLink) -> Result<MenuLink> {
        MenuLink::create(&self.pool, input).await
    }

    async fn menu_name_in_use(&self, menu_name: &str) -> Result<bool> {
        MenuLink::menu_name_in_use(&self.pool, menu_name).await
    }
}
