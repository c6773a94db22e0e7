// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for seobot
//!
//! Data-shape problems in audited documents are never errors: they become
//! [`Issue`](crate::issue::Issue)s. Only I/O and configuration failures
//! surface here, and those that touch the filesystem name the failed path.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeobotError>;

#[derive(Error, Debug)]
pub enum SeobotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot walk directory {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SeobotError {
    /// Path the failure is attached to, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            SeobotError::Read { path, .. }
            | SeobotError::Write { path, .. }
            | SeobotError::Walk { path, .. } => Some(path),
            _ => None,
        }
    }
}
