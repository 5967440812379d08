//! Error types for cinf

use thiserror::Error;

use crate::{HierarchyId, ProcessId};

/// cinf error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A process, namespace link or file vanished or could not be read
    #[error("{resource} not found")]
    NotFound {
        /// What was looked up
        resource: String,
    },

    /// The process has no cgroup line for the requested hierarchy
    #[error("no control files found for cgroup {hierarchy} of process {pid}")]
    NoControlFiles {
        /// Requested hierarchy id
        hierarchy: HierarchyId,
        /// Process the lookup was made for
        pid: ProcessId,
    },

    /// A lookup, monitor or metrics specifier has the wrong shape
    #[error("{message}\n{usage}")]
    MalformedInput {
        /// What was wrong with the input
        message: String,
        /// Expected format with an example
        usage: &'static str,
    },

    /// The host cannot be inspected (not Linux, no procfs)
    #[error("Unsupported platform: {message}")]
    Unsupported {
        /// Error message
        message: String,
    },

    /// System error from nix
    #[error("System error: {0}")]
    System(#[from] nix::Error),

    /// JSON encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Whether this error only means "this item is absent"
    ///
    /// Such errors are recovered at the smallest granularity (one process,
    /// one namespace link, one control file) by the caller.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NoControlFiles { .. })
    }

    /// Whether this error must terminate the invocation
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Result type alias for cinf operations
pub type Result<T> = std::result::Result<T, Error>;
