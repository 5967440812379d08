//! Namespace link resolution

use std::fs;
use std::path::Path;

use cinf_core::{Error, HostPaths, Namespace, NamespaceId, NamespaceKind, ProcessId, Result};

/// Resolve the namespace of `kind` that process `pid` belongs to
///
/// Reads the `/proc/<pid>/ns/<kind>` link, whose target looks like
/// `net:[4026531837]`, and extracts the bracketed id.
///
/// # Errors
/// Returns [`Error::NotFound`] when the link cannot be read (the process is
/// gone, the kernel lacks this kind, or access is denied) or its target has
/// no bracketed id. Callers treat this as "skip this pair".
pub fn resolve(paths: &HostPaths, kind: NamespaceKind, pid: ProcessId) -> Result<Namespace> {
    let link = paths.process_file(pid, Path::new("ns").join(kind.label()));

    let target = fs::read_link(&link).map_err(|e| {
        tracing::trace!(pid = %pid, kind = %kind, error = %e, "Namespace link unreadable");
        Error::not_found(format!("{kind} namespace of process {pid}"))
    })?;

    let target = target.to_string_lossy();
    let id = NamespaceId::from_link_target(&target).ok_or_else(|| {
        tracing::debug!(pid = %pid, kind = %kind, target = %target, "Unexpected namespace link target");
        Error::not_found(format!("{kind} namespace id in '{target}'"))
    })?;

    Ok(Namespace::new(kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;

    fn proc_with_link(pid: &str, kind: &str, target: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let ns_dir = dir.path().join(pid).join("ns");
        fs::create_dir_all(&ns_dir).unwrap();
        symlink(target, ns_dir.join(kind)).unwrap();
        dir
    }

    #[test]
    fn test_resolve_link() {
        let dir = proc_with_link("42", "net", "net:[4026531993]");
        let paths = HostPaths::new().with_proc_root(dir.path());

        let ns = resolve(&paths, NamespaceKind::Net, ProcessId::from_raw(42)).unwrap();
        assert_eq!(ns.kind, NamespaceKind::Net);
        assert_eq!(ns.id.as_raw(), 4_026_531_993);
    }

    #[test]
    fn test_resolve_missing_kind() {
        let dir = proc_with_link("42", "net", "net:[4026531993]");
        let paths = HostPaths::new().with_proc_root(dir.path());

        let err = resolve(&paths, NamespaceKind::User, ProcessId::from_raw(42)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_resolve_vanished_process() {
        let dir = tempfile::tempdir().unwrap();
        let paths = HostPaths::new().with_proc_root(dir.path());

        let err = resolve(&paths, NamespaceKind::Pid, ProcessId::from_raw(7)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_resolve_garbage_target() {
        let dir = proc_with_link("1", "ipc", "ipc-no-brackets");
        let paths = HostPaths::new().with_proc_root(dir.path());

        let err = resolve(&paths, NamespaceKind::Ipc, ProcessId::from_raw(1)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_resolve_own_process() {
        let ns = resolve(&HostPaths::new(), NamespaceKind::Pid, ProcessId::current());
        assert!(ns.is_ok());
    }
}
