//! crates/sp_io/src/lib.rs
//! I/O boundary of the seat projection engine.
//!
//! - Baseline table ingestion (semicolon CSV, optional BOM) via `polars` (`table`)
//! - Scenario configuration (JSON, camelCase keys) and its resolution against the roster (`config`)
//! - District result table writer (CSV with BOM) (`writer`)
//! - Canonical JSON and atomic file writes (`canonical_json`)
//! - SHA-256 digests for run records (`hasher`)
//!
//! Everything here is a boundary concern; the math lives in `sp_algo`.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for sp_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync, ...).
    #[error("io/path error: {0}")]
    Path(String),

    /// CSV parse or write failure reported by the dataframe layer.
    #[error("csv error: {0}")]
    Csv(String),

    /// JSON serialization/deserialization errors with a JSON Pointer-ish location.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Input table shape errors (missing required column, bad cell, duplicates).
    #[error("schema error: {0}")]
    Schema(String),

    /// Configuration invariants.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json reports line/column, not a pointer.
        IoError::Json {
            pointer: format!("line {} column {}", e.line(), e.column()),
            msg: e.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for IoError {
    fn from(e: polars::prelude::PolarsError) -> Self {
        IoError::Csv(e.to_string())
    }
}

pub mod canonical_json;
pub mod config;
pub mod hasher;
pub mod table;
pub mod writer;
