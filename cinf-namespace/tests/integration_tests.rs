use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

use cinf_core::{HostPaths, Namespace, NamespaceId, NamespaceKind, ProcessId};
use cinf_namespace::*;

const HOST_MNT: u64 = 4_026_531_841;
const HOST_UTS: u64 = 4_026_531_838;
const HOST_IPC: u64 = 4_026_531_839;
const HOST_PID: u64 = 4_026_531_836;
const HOST_NET: u64 = 4_026_531_840;
const HOST_USER: u64 = 4_026_531_837;
const CONTAINER_NET: u64 = 4_026_532_300;
const CONTAINER_PID: u64 = 4_026_532_299;

/// Write a fake `/proc/<pid>` with namespace links and optional status
fn add_process(
    root: &Path,
    pid: u32,
    links: &[(&str, u64)],
    status: Option<&str>,
    cmdline: &[u8],
) {
    let dir = root.join(pid.to_string());
    fs::create_dir_all(dir.join("ns")).unwrap();

    for (kind, id) in links {
        symlink(format!("{kind}:[{id}]"), dir.join("ns").join(kind)).unwrap();
    }
    if let Some(status) = status {
        fs::write(dir.join("status"), status).unwrap();
    }
    fs::write(dir.join("cmdline"), cmdline).unwrap();
    fs::write(dir.join("cgroup"), "0::/init.scope\n").unwrap();
}

fn status(pid: u32, name: &str, uid: u32) -> String {
    format!("Name:\t{name}\nState:\tS (sleeping)\nPid:\t{pid}\nPPid:\t1\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\nThreads:\t1\n")
}

fn host_links() -> Vec<(&'static str, u64)> {
    vec![
        ("mnt", HOST_MNT),
        ("uts", HOST_UTS),
        ("ipc", HOST_IPC),
        ("pid", HOST_PID),
        ("net", HOST_NET),
        ("user", HOST_USER),
    ]
}

/// A small host: init, a shell, a containerised nginx, a vanished process
/// and a few non-process entries
fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    add_process(root, 1, &host_links(), Some(&status(1, "systemd", 0)), b"/sbin/init\0");
    add_process(root, 731, &host_links(), Some(&status(731, "bash", 1000)), b"-bash\0");

    let mut container = host_links();
    container.retain(|(kind, _)| *kind != "net" && *kind != "pid");
    container.push(("net", CONTAINER_NET));
    container.push(("pid", CONTAINER_PID));
    add_process(
        root,
        2001,
        &container,
        Some(&status(2001, "nginx", 101)),
        b"nginx\0-g\0daemon off;\0",
    );

    // links readable but status gone: the process exited mid-scan
    add_process(root, 3000, &host_links(), None, b"");

    // kernel thread without a user namespace link
    let mut kthread = host_links();
    kthread.retain(|(kind, _)| *kind != "user");
    add_process(root, 2, &kthread, Some(&status(2, "kthreadd", 0)), b"");

    fs::create_dir_all(root.join("sys")).unwrap();
    fs::write(root.join("uptime"), "1.0 1.0\n").unwrap();
    symlink("731", root.join("self")).unwrap();

    dir
}

fn ns(kind: NamespaceKind, id: u64) -> Namespace {
    Namespace::new(kind, NamespaceId::from_raw(id))
}

#[test]
fn test_gather_fixture() {
    let dir = fixture();
    let paths = HostPaths::new().with_proc_root(dir.path());

    let index = gather(&paths).unwrap();

    // 1, 2, 731, 2001; 3000 vanished; self/sys/uptime are not processes
    assert_eq!(index.process_count(), 4);
    assert!(index.process(ProcessId::from_raw(3000)).is_none());
    assert!(index.is_consistent());
}

#[test]
fn test_gather_keeps_non_utf8_process_name() {
    let dir = tempfile::tempdir().unwrap();
    let pid_dir = dir.path().join("77");
    fs::create_dir_all(pid_dir.join("ns")).unwrap();
    symlink("net:[4026531840]", pid_dir.join("ns/net")).unwrap();
    // renamed through prctl(PR_SET_NAME) with a stray byte
    fs::write(
        pid_dir.join("status"),
        b"Name:\tbad\xffname\nPid:\t77\nPPid:\t1\nUid:\t0\t0\t0\t0\n",
    )
    .unwrap();

    let paths = HostPaths::new().with_proc_root(dir.path());
    let index = gather(&paths).unwrap();

    assert_eq!(index.process_count(), 1);
    let members = index.processes_in(NamespaceId::from_raw(HOST_NET));
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].pid, ProcessId::from_raw(77));
    assert!(members[0].name.starts_with("bad"));
}

#[test]
fn test_bidirectional_consistency() {
    let dir = fixture();
    let paths = HostPaths::new().with_proc_root(dir.path());
    let index = gather(&paths).unwrap();

    for process in index.processes() {
        for kind in NamespaceKind::ALL {
            if let Ok(namespace) = resolve(&paths, kind, process.pid) {
                assert!(index.members(&namespace).iter().any(|p| p.pid == process.pid));
                assert!(index.namespaces_of(process.pid).contains(&namespace));
            }
        }
    }
}

#[test]
fn test_gather_is_deterministic() {
    let dir = fixture();
    let paths = HostPaths::new().with_proc_root(dir.path());

    let first = gather(&paths).unwrap();
    let second = gather(&paths).unwrap();

    assert_eq!(first, second);
    assert!(first.namespaces().eq(second.namespaces()));
}

#[test]
fn test_container_namespace_lookup() {
    let dir = fixture();
    let paths = HostPaths::new().with_proc_root(dir.path());
    let index = gather(&paths).unwrap();

    let members = index.processes_in(NamespaceId::from_raw(CONTAINER_NET));
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "nginx");
    assert_eq!(members[0].command, "nginx -g daemon off;");

    let host_net = index.members(&ns(NamespaceKind::Net, HOST_NET));
    let pids: Vec<i32> = host_net.iter().map(|p| p.pid.as_raw()).collect();
    assert_eq!(pids, [1, 2, 731]);
}

#[test]
fn test_pid_lookup_in_scan_order() {
    let dir = fixture();
    let paths = HostPaths::new().with_proc_root(dir.path());
    let index = gather(&paths).unwrap();

    let kinds: Vec<NamespaceKind> = index
        .namespaces_of(ProcessId::from_raw(2))
        .iter()
        .map(|n| n.kind)
        .collect();
    assert_eq!(
        kinds,
        [
            NamespaceKind::Mount,
            NamespaceKind::Uts,
            NamespaceKind::Ipc,
            NamespaceKind::Pid,
            NamespaceKind::Net
        ]
    );

    assert!(index.namespaces_of(ProcessId::from_raw(3000)).is_empty());
}

#[test]
fn test_listing_over_fixture() {
    let dir = fixture();
    let paths = HostPaths::new().with_proc_root(dir.path());
    let index = gather(&paths).unwrap();

    let rows = index.summaries(20);
    assert!(rows.windows(2).all(|w| w[0].namespace.id <= w[1].namespace.id));

    let host_user = rows
        .iter()
        .find(|r| r.namespace == ns(NamespaceKind::User, HOST_USER))
        .unwrap();
    // 1, 731 and 2001 share the host user namespace; kthreadd has no link
    assert_eq!(host_user.processes, 3);
    assert_eq!(host_user.users, [0, 101, 1000]);
    assert_eq!(host_user.command, "/sbin/init");

    let container_pid = rows
        .iter()
        .find(|r| r.namespace.id.as_raw() == CONTAINER_PID)
        .unwrap();
    assert_eq!(container_pid.command, "nginx -g daemon off;");
}

#[test]
fn test_missing_proc_root_is_precondition_failure() {
    let paths = HostPaths::new().with_proc_root("/nonexistent/proc");
    let err = gather(&paths).unwrap_err();
    assert!(err.is_precondition());
}
