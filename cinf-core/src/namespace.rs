//! Namespace identities as exposed under `/proc/<pid>/ns`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// The namespace kinds cinf scans
///
/// The cgroup namespace is deliberately not part of the scanned set; cgroup
/// control data is read through `/proc/<pid>/cgroup` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NamespaceKind {
    /// Mount points (`CLONE_NEWNS`)
    #[serde(rename = "mnt")]
    Mount,
    /// Hostname and NIS domain name (`CLONE_NEWUTS`)
    #[serde(rename = "uts")]
    Uts,
    /// System V IPC and POSIX message queues (`CLONE_NEWIPC`)
    #[serde(rename = "ipc")]
    Ipc,
    /// Process id number space (`CLONE_NEWPID`)
    #[serde(rename = "pid")]
    Pid,
    /// Network devices, stacks and ports (`CLONE_NEWNET`)
    #[serde(rename = "net")]
    Net,
    /// User and group id number space (`CLONE_NEWUSER`)
    #[serde(rename = "user")]
    User,
}

impl NamespaceKind {
    /// Every scanned kind, in the fixed order used for scans and lookups
    pub const ALL: [Self; 6] = [
        Self::Mount,
        Self::Uts,
        Self::Ipc,
        Self::Pid,
        Self::Net,
        Self::User,
    ];

    /// Short kernel label, also the link name under `/proc/<pid>/ns`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mount => "mnt",
            Self::Uts => "uts",
            Self::Ipc => "ipc",
            Self::Pid => "pid",
            Self::Net => "net",
            Self::User => "user",
        }
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NamespaceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mnt" | "mount" => Ok(Self::Mount),
            "uts" => Ok(Self::Uts),
            "ipc" => Ok(Self::Ipc),
            "pid" => Ok(Self::Pid),
            "net" | "network" => Ok(Self::Net),
            "user" => Ok(Self::User),
            other => Err(Error::MalformedInput {
                message: format!("'{other}' is not a namespace kind"),
                usage: "Supported kinds are mnt, uts, ipc, pid, net and user.",
            }),
        }
    }
}

/// Kernel-assigned namespace identifier (the namespace inode number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct NamespaceId(u64);

impl NamespaceId {
    /// Create from a raw inode number
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw inode number
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }

    /// Extract the id from a namespace link target such as `net:[4026531837]`
    ///
    /// Only the digit run between the brackets matters; the kind prefix is
    /// not checked so kernels that spell it differently still resolve.
    #[must_use]
    pub fn from_link_target(target: &str) -> Option<Self> {
        let open = target.find('[')?;
        let rest = &target[open + 1..];
        let close = rest.find(']')?;
        let digits = &rest[..close];

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self)
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NamespaceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(id) = Self::from_link_target(s) {
            return Ok(id);
        }
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = s.parse() {
                return Ok(Self(id));
            }
        }
        Err(Error::MalformedInput {
            message: format!("'{s}' is not a namespace id"),
            usage: "A namespace id is the number shown in /proc/<pid>/ns links, for example 4026531837.",
        })
    }
}

/// A namespace identity, compared by value
///
/// Ordering is by id first and kind second, which is the order namespace
/// listings are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Kernel-assigned id
    pub id: NamespaceId,
    /// Namespace kind
    #[serde(rename = "type")]
    pub kind: NamespaceKind,
}

impl Namespace {
    /// Create a namespace identity
    #[must_use]
    pub const fn new(kind: NamespaceKind, id: NamespaceId) -> Self {
        Self { id, kind }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{}]", self.kind, self.id)
    }
}
