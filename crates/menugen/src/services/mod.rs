//! Generator services.
//!
//! The structure generator implements the reconciliation logic; the
//! transliteration service folds human labels into ASCII before slugging.

pub mod generator;
pub mod transliterate;
