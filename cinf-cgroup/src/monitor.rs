//! Live monitoring of one process and selected cgroup control files
//!
//! The namespace list shown for the process is taken from the index the
//! monitor was created with and stays fixed; status fields and control-file
//! values are re-read on every tick.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use cinf_core::{Error, HierarchyId, HostPaths, Namespace, Process, ProcessId, Result};
use cinf_namespace::{CorrelationIndex, read_process};

use crate::reader::{CgroupReader, ControlFiles, flatten_value};
use crate::schedule::Schedule;
use crate::screen;
use crate::subsystems::SubsystemTable;

/// Expected shape of a monitor specifier
pub const MONITOR_USAGE: &str = "It should be PID:CONTROLFILE1,CONTROLFILE2,...\n\
    For example: 1000:memory.usage_in_bytes lists details of memory.usage_in_bytes control file the process with PID 1000 belongs to.";

/// A `PID:CF1,CF2,...` monitor specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSpec {
    /// Process to monitor
    pub pid: ProcessId,
    /// Control files to show, in display order
    pub control_files: Vec<String>,
}

impl FromStr for MonitorSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = |message: String| Error::MalformedInput {
            message,
            usage: MONITOR_USAGE,
        };

        let (pid, files) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| {
                malformed(format!("Provided argument '{s}' is not in expected format."))
            })?;

        let pid = pid
            .parse()
            .map_err(|_| malformed(format!("'{pid}' is not a process id.")))?;

        let mut control_files = Vec::new();
        for name in files.split(',').map(str::trim) {
            let valid = name
                .split_once('.')
                .is_some_and(|(subsystem, file)| !subsystem.is_empty() && !file.is_empty());
            if !valid {
                return Err(malformed(format!(
                    "'{name}' is not a control file name of the form SUBSYSTEM.FILE."
                )));
            }
            control_files.push(name.to_string());
        }

        Ok(Self { pid, control_files })
    }
}

impl fmt::Display for MonitorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pid, self.control_files.join(","))
    }
}

/// One control file on the monitor screen; `None` when it could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFileRow {
    /// Control file name
    pub name: String,
    /// Current value on one line
    pub value: Option<String>,
}

/// Everything one monitor tick displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorFrame {
    /// Latest process snapshot
    pub process: Process,
    /// Namespaces of the process as of the initial scan
    pub namespaces: Vec<Namespace>,
    /// Requested control files
    pub rows: Vec<ControlFileRow>,
}

/// Repeatedly samples a process and repaints the monitor screen
#[derive(Debug)]
pub struct ProcessMonitor<'a> {
    paths: HostPaths,
    index: &'a CorrelationIndex,
    reader: CgroupReader,
    subsystems: SubsystemTable,
    spec: MonitorSpec,
}

impl<'a> ProcessMonitor<'a> {
    /// Create a monitor for `spec` over a scanned index
    ///
    /// `subsystems` maps control-file prefixes to hierarchies; it is loaded
    /// once and not refreshed while monitoring.
    #[must_use]
    pub fn new(
        paths: &HostPaths,
        index: &'a CorrelationIndex,
        subsystems: SubsystemTable,
        spec: MonitorSpec,
    ) -> Self {
        Self {
            paths: paths.clone(),
            index,
            reader: CgroupReader::new(paths),
            subsystems,
            spec,
        }
    }

    /// The specifier being monitored
    #[must_use]
    pub const fn spec(&self) -> &MonitorSpec {
        &self.spec
    }

    /// Snapshot to start from: the indexed one, else a fresh read
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the process is neither indexed nor alive.
    pub fn initial_snapshot(&self) -> Result<Process> {
        match self.index.process(self.spec.pid) {
            Some(process) => Ok(process.clone()),
            None => read_process(&self.paths, self.spec.pid),
        }
    }

    /// Take one sample
    ///
    /// If the process can no longer be read, `previous` is shown again.
    pub async fn sample(&self, previous: &Process) -> MonitorFrame {
        let process = match read_process(&self.paths, self.spec.pid) {
            Ok(process) => process,
            Err(e) => {
                tracing::warn!(pid = %self.spec.pid, error = %e, "Keeping last snapshot");
                previous.clone()
            }
        };

        let mut by_hierarchy: HashMap<HierarchyId, Option<ControlFiles>> = HashMap::new();
        let mut rows = Vec::with_capacity(self.spec.control_files.len());

        for name in &self.spec.control_files {
            let value = match self.subsystems.hierarchy_for_control_file(name) {
                Some(hierarchy) => {
                    if !by_hierarchy.contains_key(&hierarchy) {
                        let files = self.reader.read_control_files(&process, hierarchy).await;
                        if let Err(ref e) = files {
                            tracing::debug!(file = %name, error = %e, "Control file unavailable");
                        }
                        by_hierarchy.insert(hierarchy, files.ok());
                    }
                    by_hierarchy
                        .get(&hierarchy)
                        .and_then(Option::as_ref)
                        .and_then(|files| files.get(name))
                        .map(|raw| flatten_value(raw))
                }
                None => {
                    tracing::debug!(file = %name, "Subsystem not enabled");
                    None
                }
            };

            rows.push(ControlFileRow {
                name: name.clone(),
                value,
            });
        }

        MonitorFrame {
            process,
            namespaces: self.index.namespaces_of(self.spec.pid).to_vec(),
            rows,
        }
    }

    /// Sample and repaint on every tick of `schedule`
    ///
    /// Returns the number of ticks rendered once the schedule ends.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the process cannot be found before the
    /// first tick, and [`Error::Io`] if writing to `out` fails.
    pub async fn run<W: Write>(&self, mut schedule: Schedule, out: &mut W) -> Result<u64> {
        let mut current = self.initial_snapshot()?;

        tracing::info!(
            pid = %self.spec.pid,
            control_files = ?self.spec.control_files,
            period_ms = schedule.period().as_millis(),
            "Monitoring process"
        );

        while schedule.tick().await {
            let frame = self.sample(&current).await;
            screen::render(out, &frame)?;
            current = frame.process;
        }

        tracing::info!(pid = %self.spec.pid, ticks = schedule.ticks(), "Monitoring stopped");
        Ok(schedule.ticks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec() {
        let spec: MonitorSpec = "1000:memory.usage_in_bytes, memory.max_usage_in_bytes"
            .parse()
            .unwrap();

        assert_eq!(spec.pid, ProcessId::from_raw(1000));
        assert_eq!(
            spec.control_files,
            ["memory.usage_in_bytes", "memory.max_usage_in_bytes"]
        );
        assert_eq!(
            spec.to_string(),
            "1000:memory.usage_in_bytes,memory.max_usage_in_bytes"
        );
    }

    #[test]
    fn test_parse_spec_malformed() {
        for bad in [
            "",
            "1000",
            "abc:memory.stat",
            "1000:",
            "1000:memory",
            "1000:memory.stat,",
            "1000:.stat",
            "1000:memory.",
        ] {
            let err = bad.parse::<MonitorSpec>().unwrap_err();
            assert!(
                matches!(err, Error::MalformedInput { .. }),
                "{bad} should be rejected"
            );
            assert!(err.to_string().contains("PID:CONTROLFILE1"));
        }
    }

    #[test]
    fn test_initial_snapshot_unknown_process() {
        let dir = tempfile::tempdir().unwrap();
        let paths = HostPaths::new().with_proc_root(dir.path());
        let index = CorrelationIndex::new();
        let spec: MonitorSpec = "4242:memory.stat".parse().unwrap();

        let monitor = ProcessMonitor::new(&paths, &index, SubsystemTable::default(), spec);
        assert!(monitor.initial_snapshot().unwrap_err().is_not_found());
    }
}
