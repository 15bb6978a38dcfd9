//! Menugen — declarative menu structure generator.
//!
//! Reads a YAML description of a navigation-menu hierarchy and
//! materializes it as persisted menus and nested menu links. Menu creation
//! is idempotent (existence-checked, slug-derived ids); links are wired to
//! their parents recursively, to any nesting depth.
//!
//! The main entry point for running a generation pass is the `menugen`
//! binary; this library exposes the internals for integration testing and
//! for embedding the generator in a host application.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod structure;

pub use error::{GeneratorError, GeneratorResult};
pub use services::generator::{GenerationSummary, MenuOutcome, StructureGenerator};
