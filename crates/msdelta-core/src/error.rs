//! Error types for IR loading.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or validating an IR document.
///
/// Only contract violations by the upstream IR producer surface here.
/// Partial data (unresolvable calls, missing annotations) is tolerated
/// further down the pipeline.
#[derive(Error, Debug)]
pub enum IrError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid IR JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed IR at `{location}`: {reason}")]
    MalformedInput { location: String, reason: String },
}

impl IrError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// True for structural contract violations.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, IrError>;
