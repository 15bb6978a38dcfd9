//! In-memory implementations of the storage traits.
//!
//! Used by the test suite and by the CLI's `--dry-run` mode, which walks
//! the full structure without touching the database.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use super::{MenuLinkStorage, MenuStorage};
use crate::models::{CreateMenu, CreateMenuLink, Menu, MenuLink};

/// Menu storage backed by a process-local map.
#[derive(Default)]
pub struct MemoryMenuStorage {
    menus: Mutex<HashMap<String, Menu>>,
    creates: Mutex<usize>,
}

impl MemoryMenuStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored menus, in unspecified order.
    pub fn menus(&self) -> Vec<Menu> {
        self.menus.lock().values().cloned().collect()
    }

    /// Number of create calls that reached this backend.
    pub fn create_count(&self) -> usize {
        *self.creates.lock()
    }
}

#[async_trait]
impl MenuStorage for MemoryMenuStorage {
    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.menus.lock().contains_key(id))
    }

    async fn load(&self, id: &str) -> Result<Option<Menu>> {
        Ok(self.menus.lock().get(id).cloned())
    }

    async fn create(&self, input: CreateMenu) -> Result<Menu> {
        let menu = Menu {
            id: input.id,
            label: input.label,
            description: input.description.unwrap_or_default(),
            langcode: input.langcode.unwrap_or_else(|| "en".to_string()),
        };

        let mut menus = self.menus.lock();
        if menus.contains_key(&menu.id) {
            anyhow::bail!("menu '{}' already exists", menu.id);
        }
        menus.insert(menu.id.clone(), menu.clone());
        *self.creates.lock() += 1;

        Ok(menu)
    }
}

/// Menu link storage backed by a process-local list.
#[derive(Default)]
pub struct MemoryMenuLinkStorage {
    links: Mutex<Vec<MenuLink>>,
}

impl MemoryMenuLinkStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored links, in creation order.
    pub fn links(&self) -> Vec<MenuLink> {
        self.links.lock().clone()
    }
}

#[async_trait]
impl MenuLinkStorage for MemoryMenuLinkStorage {
    async fn create(&self, input: CreateMenuLink) -> Result<MenuLink> {
        let now = chrono::Utc::now().timestamp();
        let link = MenuLink {
            id: Uuid::now_v7(),
            menu_name: input.menu_name,
            title: input.title,
            uri: input.uri,
            parent_id: input.parent_id,
            weight: input.weight.unwrap_or(0),
            options: input.options.unwrap_or_else(|| serde_json::json!({})),
            created: now,
            changed: now,
        };

        self.links.lock().push(link.clone());
        Ok(link)
    }

    async fn menu_name_in_use(&self, menu_name: &str) -> Result<bool> {
        Ok(self.links.lock().iter().any(|l| l.menu_name == menu_name))
    }
}
