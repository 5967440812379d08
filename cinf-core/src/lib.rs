//! cinf core - shared types for namespace and cgroup inspection
//!
//! This crate provides the value types every other cinf crate works with:
//! process snapshots, namespace identities, cgroup hierarchy ids, the host
//! path configuration and the error type.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod namespace;
pub mod process;
pub mod types;

pub use config::HostPaths;
pub use error::{Error, Result};
pub use namespace::{Namespace, NamespaceId, NamespaceKind};
pub use process::{Process, truncate_command};
pub use types::{HierarchyId, ProcessId};
