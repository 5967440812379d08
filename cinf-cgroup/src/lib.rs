//! Cgroup control files, live monitoring and metrics export
//!
//! This crate reads what a process's cgroups expose and drives the two
//! continuous modes:
//! - [`CgroupReader`] - control files of one cgroup, by hierarchy id
//! - [`lookup_cgroup`] - the same, for a `PID:HIERARCHY` specifier
//! - [`ProcessMonitor`] - repaint one process and selected control files
//! - [`MetricsExporter`] - periodic JSON snapshots of the whole index
//!
//! Both loops are driven by a [`Schedule`] that a [`StopHandle`] can end.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod descriptor;
pub mod lookup;
pub mod metrics;
pub mod monitor;
pub mod reader;
pub mod schedule;
pub mod screen;
pub mod subsystems;

pub use descriptor::CgroupDescriptor;
pub use lookup::{CGROUP_USAGE, CgroupSpec, lookup_cgroup};
pub use metrics::{
    METRICS_USAGE, MemorySink, MetricsExporter, MetricsSink, MetricsSnapshot, MetricsSpec,
    OutputMode, WriterSink,
};
pub use monitor::{ControlFileRow, MONITOR_USAGE, MonitorFrame, MonitorSpec, ProcessMonitor};
pub use reader::{CgroupReader, ControlFiles, flatten_value};
pub use schedule::{Schedule, StopHandle};
pub use subsystems::SubsystemTable;
