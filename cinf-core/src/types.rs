//! Core identifier types with strong typing and validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Process identifier
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ProcessId(i32);

impl ProcessId {
    /// Create from raw PID
    #[must_use]
    pub const fn from_raw(pid: i32) -> Self {
        Self(pid)
    }

    /// Get the current process ID
    #[must_use]
    pub fn current() -> Self {
        #[allow(clippy::cast_possible_wrap)]
        Self(std::process::id() as i32)
    }

    /// Get raw PID value
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }

    /// Parse a `/proc` directory entry name, `None` for non-process entries
    ///
    /// Only all-digit names are processes; `self`, `sys` and friends are not.
    #[must_use]
    pub fn from_proc_entry(name: &str) -> Option<Self> {
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        name.parse().ok().map(Self)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProcessId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_proc_entry(s.trim()).ok_or_else(|| Error::MalformedInput {
            message: format!("'{s}' is not a process id"),
            usage: "A process id is a non-negative decimal number, for example 1000.",
        })
    }
}

/// Cgroup hierarchy identifier, the first field of a `/proc/<pid>/cgroup` line
///
/// On a cgroup v2 only host every line uses hierarchy `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct HierarchyId(u32);

impl HierarchyId {
    /// Create from a raw hierarchy number
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get raw hierarchy number
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for HierarchyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HierarchyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedInput {
                message: format!("'{s}' is not a cgroup hierarchy id"),
                usage: "A hierarchy id is a small decimal number as listed in /proc/cgroups.",
            });
        }
        s.parse().map(Self).map_err(|_| Error::MalformedInput {
            message: format!("cgroup hierarchy id '{s}' is out of range"),
            usage: "A hierarchy id is a small decimal number as listed in /proc/cgroups.",
        })
    }
}
