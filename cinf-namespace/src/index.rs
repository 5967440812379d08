//! The process/namespace correlation index

use std::collections::BTreeMap;
use std::fs;

use cinf_core::{Error, HostPaths, Namespace, NamespaceKind, Process, ProcessId, Result};

use crate::platform::ensure_supported_platform;
use crate::procfs::read_process;
use crate::resolver::resolve;

/// Point-in-time relation between processes and namespaces
///
/// The relation is materialized twice: namespace to member processes, and
/// process to namespaces. Both sides are only ever written together by
/// [`CorrelationIndex::record`], so they always describe the same set of
/// pairs. An index is never refreshed in place; a new scan builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationIndex {
    /// One snapshot per process, shared by every namespace it belongs to
    pub(crate) processes: BTreeMap<ProcessId, Process>,

    /// Namespace -> member pids, in scan order
    pub(crate) by_namespace: BTreeMap<Namespace, Vec<ProcessId>>,

    /// Pid -> namespaces, in scan order
    pub(crate) by_process: BTreeMap<ProcessId, Vec<Namespace>>,
}

impl CorrelationIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from explicit (namespace, process) pairs
    ///
    /// Useful for inspecting saved data or constructing indices in tests.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Namespace, Process)>) -> Self {
        let mut index = Self::new();
        for (namespace, process) in pairs {
            index.record(namespace, process);
        }
        index
    }

    /// Record that `process` belongs to `namespace`
    ///
    /// The first snapshot recorded for a pid is kept. Recording the same pair
    /// twice has no effect.
    pub fn record(&mut self, namespace: Namespace, process: Process) {
        let pid = process.pid;

        let namespaces = self.by_process.entry(pid).or_default();
        if namespaces.contains(&namespace) {
            return;
        }
        namespaces.push(namespace);
        self.by_namespace.entry(namespace).or_default().push(pid);
        self.processes.entry(pid).or_insert(process);
    }

    /// Number of distinct processes
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Number of distinct namespaces
    #[must_use]
    pub fn namespace_count(&self) -> usize {
        self.by_namespace.len()
    }

    /// Whether the scan found nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Every process snapshot, ordered by pid
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    /// Every namespace, ordered by id then kind
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.by_namespace.keys()
    }

    /// Check that both maps describe the same relation
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let forward = self.by_namespace.iter().all(|(ns, pids)| {
            pids.iter().all(|pid| {
                self.processes.contains_key(pid)
                    && self.by_process.get(pid).is_some_and(|list| list.contains(ns))
            })
        });
        let backward = self.by_process.iter().all(|(pid, namespaces)| {
            namespaces.iter().all(|ns| {
                self.by_namespace
                    .get(ns)
                    .is_some_and(|pids| pids.contains(pid))
            })
        });

        forward && backward
    }
}

/// Scan the process table rooted at `paths` and build a fresh index
///
/// Every numeric `/proc` entry is resolved for each kind in
/// [`NamespaceKind::ALL`]. A process that vanishes mid-scan, or a kind the
/// kernel does not expose, only drops the affected pairs.
///
/// # Errors
/// Returns [`Error::Unsupported`] if the host is not Linux or has no
/// process table, and [`Error::Io`] if the process table cannot be listed.
pub fn gather(paths: &HostPaths) -> Result<CorrelationIndex> {
    ensure_supported_platform(paths)?;

    let pids = list_pids(paths)?;
    tracing::debug!(candidates = pids.len(), root = %paths.proc_root.display(), "Scanning processes");

    let mut index = CorrelationIndex::new();
    let mut skipped = 0usize;

    for pid in pids {
        let mut snapshot: Option<Process> = None;
        let mut vanished = false;

        for kind in NamespaceKind::ALL {
            let namespace = match resolve(paths, kind, pid) {
                Ok(namespace) => namespace,
                Err(e) => {
                    tracing::trace!(pid = %pid, kind = %kind, error = %e, "Skipping pair");
                    continue;
                }
            };

            if snapshot.is_none() && !vanished {
                match read_process(paths, pid) {
                    Ok(process) => snapshot = Some(process),
                    Err(e) => {
                        tracing::debug!(pid = %pid, error = %e, "Process vanished during scan");
                        vanished = true;
                    }
                }
            }

            if let Some(process) = &snapshot {
                index.record(namespace, process.clone());
            }
        }

        if snapshot.is_none() {
            skipped += 1;
        }
    }

    tracing::info!(
        processes = index.process_count(),
        namespaces = index.namespace_count(),
        skipped,
        "Scan complete"
    );

    Ok(index)
}

/// Numeric entries of the process table, ascending
fn list_pids(paths: &HostPaths) -> Result<Vec<ProcessId>> {
    let entries = fs::read_dir(&paths.proc_root).map_err(|e| {
        tracing::error!(root = %paths.proc_root.display(), error = %e, "Cannot list process table");
        Error::Io(e)
    })?;

    let mut pids: Vec<ProcessId> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| ProcessId::from_proc_entry(&entry.file_name().to_string_lossy()))
        .collect();
    pids.sort_unstable();

    Ok(pids)
}
