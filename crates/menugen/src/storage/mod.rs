//! Storage abstraction for menus and menu links.
//!
//! The generator never talks to a database directly; it goes through these
//! traits, injected at construction time. This keeps the reconciliation
//! algorithm testable against the in-memory backend and leaves room for a
//! decorating implementation (caching, staging) without touching call sites.

mod memory;
mod postgres;

use anyhow::Result;
use async_trait::async_trait;

pub use memory::{MemoryMenuLinkStorage, MemoryMenuStorage};
pub use postgres::{PgMenuLinkStorage, PgMenuStorage};

use crate::models::{CreateMenu, CreateMenuLink, Menu, MenuLink};

/// Storage for menu records.
#[async_trait]
pub trait MenuStorage: Send + Sync {
    /// Check whether a menu with this ID exists.
    async fn exists(&self, id: &str) -> Result<bool>;

    /// Load a menu by ID. Returns `None` if it doesn't exist.
    async fn load(&self, id: &str) -> Result<Option<Menu>>;

    /// Create a new menu.
    async fn create(&self, input: CreateMenu) -> Result<Menu>;
}

/// Storage for menu link records.
#[async_trait]
pub trait MenuLinkStorage: Send + Sync {
    /// Create a new link; the backend assigns its ID.
    async fn create(&self, input: CreateMenuLink) -> Result<MenuLink>;

    /// Check whether any existing link claims this menu name.
    ///
    /// Covers orphaned name reservations: links can reference a menu name
    /// for which no menu record exists.
    async fn menu_name_in_use(&self, menu_name: &str) -> Result<bool>;
}
