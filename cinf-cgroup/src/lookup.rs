//! Cgroup lookups for a process in the correlation index

use std::fmt;
use std::str::FromStr;

use cinf_core::{Error, HierarchyId, ProcessId, Result};
use cinf_namespace::CorrelationIndex;

use crate::reader::{CgroupReader, ControlFiles};

/// Expected shape of a cgroup specifier
pub const CGROUP_USAGE: &str = "It should be PID:CGROUP_HIERARCHY.\n\
    For example: 1000:2 lists details of cgroup with hierarchy ID 2 the process with PID 1000 belongs to.";

/// A `PID:HIERARCHY` cgroup specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CgroupSpec {
    /// Process whose cgroup is inspected
    pub pid: ProcessId,
    /// Hierarchy to inspect
    pub hierarchy: HierarchyId,
}

impl FromStr for CgroupSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedInput {
            message: format!("Provided argument '{s}' is not in expected format."),
            usage: CGROUP_USAGE,
        };

        let (pid, hierarchy) = s.trim().split_once(':').ok_or_else(malformed)?;
        Ok(Self {
            pid: pid.parse().map_err(|_| malformed())?,
            hierarchy: hierarchy.parse().map_err(|_| malformed())?,
        })
    }
}

impl fmt::Display for CgroupSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pid, self.hierarchy)
    }
}

/// Control files of the cgroup `spec.pid` belongs to in `spec.hierarchy`
///
/// The process snapshot comes from `index`; control-file values are read
/// live.
///
/// # Errors
/// Returns [`Error::NotFound`] if the pid is not in the index and
/// [`Error::NoControlFiles`] if it has no cgroup in that hierarchy.
pub async fn lookup_cgroup(
    index: &CorrelationIndex,
    reader: &CgroupReader,
    spec: CgroupSpec,
) -> Result<ControlFiles> {
    tracing::debug!(pid = %spec.pid, hierarchy = %spec.hierarchy, "Looking up cgroup");

    let process = index
        .process(spec.pid)
        .ok_or_else(|| Error::not_found(format!("process {}", spec.pid)))?;

    reader.read_control_files(process, spec.hierarchy).await
}
