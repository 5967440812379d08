//! Host precondition checks

use cinf_core::{Error, HostPaths, Result};

/// Fail fast unless the host can be scanned
///
/// Scanning needs a Linux kernel and a procfs tree at `paths.proc_root`.
///
/// # Errors
/// Returns [`Error::Unsupported`] when either precondition does not hold.
pub fn ensure_supported_platform(paths: &HostPaths) -> Result<()> {
    if !cfg!(target_os = "linux") {
        return Err(Error::Unsupported {
            message: "Sorry, this is a Linux-specific tool.".to_string(),
        });
    }

    let uts = nix::sys::utsname::uname()?;
    if uts.sysname() != "Linux" {
        return Err(Error::Unsupported {
            message: format!(
                "Sorry, this is a Linux-specific tool (kernel reports {}).",
                uts.sysname().to_string_lossy()
            ),
        });
    }

    if !paths.proc_root.is_dir() {
        return Err(Error::Unsupported {
            message: format!("no process table at {}", paths.proc_root.display()),
        });
    }

    Ok(())
}
