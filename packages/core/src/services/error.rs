//! Service Layer Error Types
//!
//! This module defines error types for loading an address space from
//! declarative node tables and configuration files.

use crate::db::AddressSpaceError;
use std::path::PathBuf;
use thiserror::Error;

/// Bootstrap and bulk-load errors
///
/// Loading fails fast: the first error stops the load. Nodes added before the
/// failure remain in the store.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Table or configuration JSON could not be parsed
    #[error("Failed to parse: {0}")]
    Parse(#[from] serde_json::Error),

    /// Table or configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store rejected a node
    #[error("Store operation failed: {0}")]
    Store(#[from] AddressSpaceError),

    /// A node table is structurally invalid
    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BootstrapError {
    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid declaration error
    pub fn invalid_declaration(msg: impl Into<String>) -> Self {
        Self::InvalidDeclaration(msg.into())
    }
}
