//! Error types
//!
//! Dispatch has a single user-facing failure, [`DispatchError::NotFound`]. It is
//! returned for a missing target, an attempt to leave the docroot and an unreadable
//! directory index alike, so a client cannot probe the layout of the filesystem
//! behind the docroot. Everything else a handler returns passes through untouched.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type returned by route handlers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`crate::handler::Dispatcher::dispatch`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Nothing can answer this path.
    #[error("not found: {0}")]
    NotFound(String),

    /// A route handler failed; the original error is kept as the source.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    /// A filesystem failure that is not one of the expected "missing" causes.
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DispatchError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Map a read failure: missing, forbidden and not-a-file become `NotFound`,
    /// anything else is reported as an I/O error.
    pub(crate) fn from_read(request: &str, path: PathBuf, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound
            | io::ErrorKind::PermissionDenied
            | io::ErrorKind::InvalidInput => Self::not_found(request),
            _ => Self::Io { path, source: err },
        }
    }
}

/// Errors raised while assembling a [`crate::site::ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("docroot '{}' is not accessible: {}", .path.display(), .source)]
    Docroot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("docroot '{}' is not a directory", .0.display())]
    DocrootNotDirectory(PathBuf),

    #[error("directory '{0}' uses a named index without a filename")]
    MissingIndexFilename(String),
}
