//! Point lookups and the namespace listing over a [`CorrelationIndex`]

use serde::Serialize;

use cinf_core::{Namespace, NamespaceId, NamespaceKind, Process, ProcessId};

use crate::index::CorrelationIndex;

/// One row of the namespace listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceSummary {
    /// The namespace
    #[serde(flatten)]
    pub namespace: Namespace,
    /// Number of member processes
    #[serde(rename = "nprocs")]
    pub processes: usize,
    /// Distinct effective UIDs of the members, ascending
    pub users: Vec<u32>,
    /// Command line of the first scanned member, truncated for display
    #[serde(rename = "cmd")]
    pub command: String,
}

impl NamespaceSummary {
    /// Users as a comma separated list, e.g. `0,1000`
    #[must_use]
    pub fn users_label(&self) -> String {
        self.users
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl CorrelationIndex {
    /// Snapshot of process `pid`, if it was resolved during the scan
    #[must_use]
    pub fn process(&self, pid: ProcessId) -> Option<&Process> {
        self.processes.get(&pid)
    }

    /// Members of one namespace in scan order
    #[must_use]
    pub fn members(&self, namespace: &Namespace) -> Vec<&Process> {
        self.by_namespace
            .get(namespace)
            .map(|pids| pids.iter().filter_map(|pid| self.processes.get(pid)).collect())
            .unwrap_or_default()
    }

    /// Processes in any namespace with this id
    ///
    /// Members are concatenated kind by kind in [`NamespaceKind::ALL`] order.
    /// An unknown id yields an empty list.
    #[must_use]
    pub fn processes_in(&self, id: NamespaceId) -> Vec<&Process> {
        NamespaceKind::ALL
            .into_iter()
            .flat_map(|kind| self.members(&Namespace::new(kind, id)))
            .collect()
    }

    /// Namespaces process `pid` belongs to, in scan order
    ///
    /// Empty if the pid was never resolved.
    #[must_use]
    pub fn namespaces_of(&self, pid: ProcessId) -> &[Namespace] {
        self.by_process
            .get(&pid)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Summarize every namespace, ordered by namespace id
    ///
    /// `max_command_len` bounds the sample command of each row in characters.
    #[must_use]
    pub fn summaries(&self, max_command_len: usize) -> Vec<NamespaceSummary> {
        self.by_namespace
            .iter()
            .map(|(namespace, pids)| {
                let members: Vec<&Process> =
                    pids.iter().filter_map(|pid| self.processes.get(pid)).collect();

                let mut users: Vec<u32> =
                    members.iter().filter_map(|p| p.effective_uid()).collect();
                users.sort_unstable();
                users.dedup();

                let command = members
                    .first()
                    .map(|p| p.display_command(max_command_len).to_string())
                    .unwrap_or_default();

                NamespaceSummary {
                    namespace: *namespace,
                    processes: members.len(),
                    users,
                    command,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(pid: i32, uids: &str, command: &str) -> Process {
        Process {
            pid: ProcessId::from_raw(pid),
            uids: uids.to_string(),
            command: command.to_string(),
            ..Default::default()
        }
    }

    fn ns(kind: NamespaceKind, id: u64) -> Namespace {
        Namespace::new(kind, NamespaceId::from_raw(id))
    }

    fn sample() -> CorrelationIndex {
        CorrelationIndex::from_pairs([
            (
                ns(NamespaceKind::Net, 300),
                process(10, "1000 1000 1000 1000", "nginx -g daemon off;"),
            ),
            (ns(NamespaceKind::Net, 300), process(11, "0 0 0 0", "nginx: worker")),
            (ns(NamespaceKind::Net, 300), process(12, "1000 1000 1000 1000", "sleep 5")),
            (ns(NamespaceKind::Pid, 100), process(10, "1000 1000 1000 1000", "")),
            (ns(NamespaceKind::User, 300), process(13, "", "unknown-uid")),
            (ns(NamespaceKind::Mount, 200), process(11, "0 0 0 0", "")),
        ])
    }

    #[test]
    fn test_users_sorted_and_distinct() {
        let summaries = sample().summaries(80);
        let net = summaries
            .iter()
            .find(|s| s.namespace == ns(NamespaceKind::Net, 300))
            .unwrap();

        assert_eq!(net.processes, 3);
        assert_eq!(net.users, [0, 1000]);
        assert_eq!(net.users_label(), "0,1000");
        assert_eq!(net.command, "nginx -g daemon off;");
    }

    #[test]
    fn test_unknown_uid_is_skipped() {
        let summaries = sample().summaries(80);
        let user = summaries
            .iter()
            .find(|s| s.namespace.kind == NamespaceKind::User)
            .unwrap();

        assert_eq!(user.processes, 1);
        assert!(user.users.is_empty());
        assert_eq!(user.users_label(), "");
    }

    #[test]
    fn test_summaries_ordered_by_id() {
        let summaries = sample().summaries(80);
        let ids: Vec<u64> = summaries.iter().map(|s| s.namespace.id.as_raw()).collect();

        assert_eq!(ids, [100, 200, 300, 300]);
        assert!(ids.windows(2).all(|w| w[0] <= w[1]));
        // same id: fixed kind order
        assert_eq!(summaries[2].namespace.kind, NamespaceKind::Net);
        assert_eq!(summaries[3].namespace.kind, NamespaceKind::User);
    }

    #[test]
    fn test_summary_command_truncated() {
        let summaries = sample().summaries(5);
        let net = summaries
            .iter()
            .find(|s| s.namespace.kind == NamespaceKind::Net)
            .unwrap();
        assert_eq!(net.command, "nginx");
    }

    #[test]
    fn test_processes_in_concatenates_kinds() {
        let index = sample();
        let pids: Vec<i32> = index
            .processes_in(NamespaceId::from_raw(300))
            .iter()
            .map(|p| p.pid.as_raw())
            .collect();

        // net members in scan order, then user members
        assert_eq!(pids, [10, 11, 12, 13]);
        assert!(index.processes_in(NamespaceId::from_raw(999)).is_empty());
    }

    #[test]
    fn test_namespaces_of() {
        let index = sample();

        assert_eq!(
            index.namespaces_of(ProcessId::from_raw(10)),
            [ns(NamespaceKind::Net, 300), ns(NamespaceKind::Pid, 100)]
        );
        assert!(index.namespaces_of(ProcessId::from_raw(77)).is_empty());
    }

    #[test]
    fn test_summary_serialization() {
        let summaries = sample().summaries(80);
        let value = serde_json::to_value(&summaries[0]).unwrap();

        assert_eq!(value["id"], 100);
        assert_eq!(value["type"], "pid");
        assert_eq!(value["nprocs"], 1);
        assert_eq!(value["users"], serde_json::json!([1000]));
    }
}
