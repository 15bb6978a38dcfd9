//! Generator error types.

use thiserror::Error;

/// Errors raised while generating a menu structure.
///
/// A missing structure file is not represented here: `load_structure`
/// treats it as an empty structure. Unsupported link attributes are also
/// not an error; they are dropped when the capability is disabled.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The structure file exists but could not be read.
    #[error("failed to read menu structure file")]
    Io(#[from] std::io::Error),

    /// The structure file exists but is not valid YAML for the schema.
    #[error("failed to parse menu structure file")]
    Parse(#[from] serde_yml::Error),

    /// A menu definition failed validation (empty key, empty label, or a
    /// key that reduces to an unusable slug).
    #[error("invalid menu definition: {0}")]
    InvalidInput(String),

    /// The derived menu id is reserved by existing links without a
    /// corresponding menu record. Creating a menu under this id would
    /// collide with the orphaned reservation.
    #[error("menu name '{0}' is already in use by existing links")]
    NameConflict(String),

    /// A persistence call failed. Propagated as-is; no retry.
    #[error("storage error")]
    Storage(#[source] anyhow::Error),
}

/// Result type alias using GeneratorError.
pub type GeneratorResult<T> = Result<T, GeneratorError>;
