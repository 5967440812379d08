//! Cgroup membership lines
//!
//! Each line of `/proc/<pid>/cgroup` has the form
//! `hierarchy-id:subsystem-list:cgroup-path`, for example
//! `4:memory:/docker/abc` on cgroup v1 or `0::/user.slice` on cgroup v2.

use std::path::{Component, Path, PathBuf};

use cinf_core::{HierarchyId, Process};

/// One parsed cgroup membership line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgroupDescriptor {
    /// Hierarchy id
    pub hierarchy: HierarchyId,
    /// Comma separated subsystem names; empty on the v2 unified hierarchy
    pub subsystems: String,
    /// Cgroup path relative to the hierarchy root
    pub path: String,
}

impl CgroupDescriptor {
    /// Parse one membership line, `None` if it is malformed
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.trim().splitn(3, ':');
        let hierarchy = fields.next()?.parse().ok()?;
        let subsystems = fields.next()?.to_string();
        let path = fields.next()?.to_string();

        Some(Self {
            hierarchy,
            subsystems,
            path,
        })
    }

    /// The membership line of `process` for `hierarchy`, if any
    #[must_use]
    pub fn find(process: &Process, hierarchy: HierarchyId) -> Option<Self> {
        process
            .cgroup_lines()
            .filter_map(Self::parse)
            .find(|d| d.hierarchy == hierarchy)
    }

    /// Directory holding this cgroup's control files under `root`
    ///
    /// Named v1 hierarchies (`name=systemd`) are mounted without the `name=`
    /// prefix; the v2 unified hierarchy is mounted at `root` itself. `.` and
    /// `..` components are dropped, so the result never leaves `root`.
    #[must_use]
    pub fn directory(&self, root: &Path) -> PathBuf {
        let mount = self.subsystems.strip_prefix("name=").unwrap_or(&self.subsystems);
        let base = if mount.is_empty() {
            root.to_path_buf()
        } else {
            root.join(mount)
        };

        // paths seen from another cgroup namespace start with `/..`
        let relative: PathBuf = Path::new(&self.path)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();

        if relative.as_os_str().is_empty() {
            base
        } else {
            base.join(relative)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_v1_line() {
        let d = CgroupDescriptor::parse("2:memory:/docker/abc").unwrap();
        assert_eq!(d.hierarchy, HierarchyId::from_raw(2));
        assert_eq!(d.subsystems, "memory");
        assert_eq!(d.path, "/docker/abc");
    }

    #[test]
    fn test_parse_keeps_colons_in_path() {
        let d = CgroupDescriptor::parse("0::/system.slice/weird:name.service").unwrap();
        assert_eq!(d.subsystems, "");
        assert_eq!(d.path, "/system.slice/weird:name.service");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CgroupDescriptor::parse("").is_none());
        assert!(CgroupDescriptor::parse("memory:/docker").is_none());
        assert!(CgroupDescriptor::parse("x:memory:/docker").is_none());
    }

    #[test]
    fn test_directory() {
        let root = Path::new("/sys/fs/cgroup");

        let v1 = CgroupDescriptor::parse("2:memory:/docker/abc").unwrap();
        assert_eq!(v1.directory(root), Path::new("/sys/fs/cgroup/memory/docker/abc"));

        let joined = CgroupDescriptor::parse("3:cpu,cpuacct:/").unwrap();
        assert_eq!(joined.directory(root), Path::new("/sys/fs/cgroup/cpu,cpuacct"));

        let named = CgroupDescriptor::parse("1:name=systemd:/user.slice").unwrap();
        assert_eq!(named.directory(root), Path::new("/sys/fs/cgroup/systemd/user.slice"));

        let unified = CgroupDescriptor::parse("0::/user.slice/session-2.scope").unwrap();
        assert_eq!(
            unified.directory(root),
            Path::new("/sys/fs/cgroup/user.slice/session-2.scope")
        );
    }

    #[test]
    fn test_directory_stays_under_root() {
        let root = Path::new("/sys/fs/cgroup");

        let foreign = CgroupDescriptor::parse("0::/../../user.slice").unwrap();
        assert_eq!(foreign.directory(root), Path::new("/sys/fs/cgroup/user.slice"));

        let sneaky = CgroupDescriptor::parse("2:memory:/docker/../../../etc").unwrap();
        let dir = sneaky.directory(root);
        assert!(dir.starts_with("/sys/fs/cgroup/memory"));
        assert_eq!(dir, Path::new("/sys/fs/cgroup/memory/docker/etc"));

        let only_dots = CgroupDescriptor::parse("0::/..").unwrap();
        assert_eq!(only_dots.directory(root), root);
    }

    #[test]
    fn test_find() {
        let process = Process {
            cgroups: "4:pids:/user.slice\n2:memory:/docker/abc\n".to_string(),
            ..Default::default()
        };

        let found = CgroupDescriptor::find(&process, HierarchyId::from_raw(2)).unwrap();
        assert_eq!(found.path, "/docker/abc");
        assert!(CgroupDescriptor::find(&process, HierarchyId::from_raw(9)).is_none());
    }
}
