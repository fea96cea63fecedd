//! Canonical JSON normalization for diff-stable catalog files.
//!
//! This crate provides the normalization layer: a pure total order over JSON
//! values (`order::compare`), recursive array sorting with key-order
//! preservation (`normalize_value`), deterministic 4-space serialization
//! (`to_canonical_bytes`), crash-safe in-place rewrites (`StagedFile`), and
//! the fail-soft batch driver (`run_batch`) that expands glob patterns and
//! aggregates per-file outcomes into a `BatchReport`.

pub mod atomic;
pub mod batch;
pub mod config;
pub mod document;
pub mod normalize;
pub mod order;
pub mod signal;

pub use atomic::{write_atomic, StagedFile};
pub use batch::{expand_inputs, run_batch, BatchReport, FailureKind, FileOutcome, FileStatus, Mode};
pub use config::{Config, DEFAULT_CONFIG_FILE, DEFAULT_PATTERN};
pub use document::{check_file, normalize_file, DocumentOutcome};
pub use normalize::{normalize_document, normalize_value, sort_object_keys, to_canonical_bytes};
pub use order::compare;
pub use signal::{install_signal_handler, shutdown_requested};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanonError {
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("config error: {0}")]
    Config(String),
}

impl CanonError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
