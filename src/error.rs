//! @acp:module "Errors"
//! @acp:summary "Crate-wide error type and Result alias"
//! @acp:domain scoring
//! @acp:layer model

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EvmapError>;

/// Errors surfaced by the evidence map engine
#[derive(Debug, Error)]
pub enum EvmapError {
    #[error("record store error: {0}")]
    Store(String),

    #[error("snapshot file not found: {}", .0.display())]
    SnapshotNotFound(PathBuf),

    #[error("unknown taxonomy entry: {kind} {name:?}")]
    UnknownTaxonomy { kind: &'static str, name: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("synthesis cache error: {0}")]
    SynthesisCache(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
