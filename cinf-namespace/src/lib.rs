//! Namespace resolution and process/namespace correlation
//!
//! This crate walks the process table and relates processes to the
//! namespaces they belong to:
//! - [`resolve`] - read one `/proc/<pid>/ns/<kind>` link
//! - [`read_process`] - snapshot status, cgroup membership and command line
//! - [`gather`] - build a [`CorrelationIndex`] from every process
//! - lookups and the namespace listing on [`CorrelationIndex`]

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod index;
pub mod platform;
pub mod procfs;
pub mod query;
pub mod resolver;

pub use index::{CorrelationIndex, gather};
pub use platform::ensure_supported_platform;
pub use procfs::read_process;
pub use query::NamespaceSummary;
pub use resolver::resolve;
