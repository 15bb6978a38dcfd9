//! Parsed menu structure description.
//!
//! The structure file is a YAML mapping from menu key to menu definition,
//! with arbitrarily nested link definitions below each menu. Shape is
//! validated once here, at parse time; the generator walks typed data.
//!
//! YAML mappings are deserialized into `Vec<(String, T)>` rather than a
//! `BTreeMap` so that links are realized in the order they appear in the
//! source file. `weight` is a separate display-order hint consumed by the
//! host renderer, not by the generator.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Language code assumed when a menu definition omits `lang`.
pub const DEFAULT_LANGCODE: &str = "en";

/// An ordered set of top-level menu definitions, keyed by raw menu key.
#[derive(Debug, Clone, Default)]
pub struct MenuStructure(pub Vec<(String, MenuDefinition)>);

impl MenuStructure {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, MenuDefinition)> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for MenuStructure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self(ordered_entries(deserializer)?))
    }
}

/// A top-level menu definition.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuDefinition {
    /// Human-readable menu label. Required, must be non-empty.
    pub label: String,

    /// Optional menu description.
    #[serde(default)]
    pub summary: Option<String>,

    /// Optional language code used for transliteration and stored on the
    /// menu record.
    #[serde(default)]
    pub lang: Option<String>,

    /// Links directly under this menu, in source order.
    #[serde(default, deserialize_with = "ordered_entries")]
    pub items: Vec<(String, LinkDefinition)>,
}

impl MenuDefinition {
    /// The effective language code for this menu.
    pub fn langcode(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANGCODE)
    }
}

/// A link definition, possibly carrying nested child links.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkDefinition {
    /// Opaque target reference: internal path, route, or external URL.
    pub path: String,

    /// Sort weight (lower = higher priority). Defaults to 0.
    #[serde(default)]
    pub weight: i32,

    /// Extra link options merged over the host defaults when the attribute
    /// capability is enabled.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Child links, in source order.
    #[serde(default, deserialize_with = "ordered_entries")]
    pub items: Vec<(String, LinkDefinition)>,
}

/// Deserialize a YAML mapping into a `Vec` of entries, preserving the
/// order in which keys appear in the source document.
fn ordered_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for EntriesVisitor<T>
    where
        T: Deserialize<'de>,
    {
        type Value = Vec<(String, T)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping of string keys to definitions")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, T>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}
