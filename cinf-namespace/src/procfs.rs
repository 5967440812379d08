//! Process snapshots from `/proc/<pid>`
//!
//! A snapshot combines three files:
//! - `status` - required; `Key:\tvalue` lines
//! - `cgroup` - optional; kept verbatim
//! - `cmdline` - optional; NUL separated arguments

use std::fs;

use cinf_core::{Error, HostPaths, Process, ProcessId, Result};

/// Read a snapshot of process `pid`
///
/// Missing `cgroup` or `cmdline` files leave the matching field empty.
///
/// # Errors
/// Returns [`Error::NotFound`] if the status file cannot be read.
pub fn read_process(paths: &HostPaths, pid: ProcessId) -> Result<Process> {
    // Name is raw bytes from the kernel, so a valid status may not be UTF-8
    let status = fs::read(paths.process_file(pid, "status")).map_err(|e| {
        tracing::debug!(pid = %pid, error = %e, "Status unreadable");
        Error::not_found(format!("process {pid}"))
    })?;

    let mut process = Process {
        pid,
        ..Process::default()
    };
    apply_status(&mut process, &String::from_utf8_lossy(&status));

    match fs::read(paths.process_file(pid, "cgroup")) {
        Ok(cgroups) => process.cgroups = String::from_utf8_lossy(&cgroups).into_owned(),
        Err(e) => tracing::trace!(pid = %pid, error = %e, "No cgroup membership"),
    }

    match fs::read(paths.process_file(pid, "cmdline")) {
        Ok(raw) => process.command = render_cmdline(&raw),
        Err(e) => tracing::trace!(pid = %pid, error = %e, "No command line"),
    }

    Ok(process)
}

/// Fill the status-derived fields of `process` from a status file body
///
/// Unknown keys are ignored. Lines without a colon are skipped.
pub fn apply_status(process: &mut Process, status: &str) {
    for line in status.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "Pid" => {
                if let Ok(pid) = value.parse() {
                    process.pid = pid;
                }
            }
            "PPid" => {
                if let Ok(ppid) = value.parse() {
                    process.ppid = ppid;
                }
            }
            "Name" => process.name = value.to_string(),
            "State" => process.state = value.to_string(),
            "Threads" => process.threads = value.parse().unwrap_or(0),
            // real, effective, saved set, filesystem
            "Uid" => process.uids = value.split_whitespace().collect::<Vec<_>>().join(" "),
            _ => {}
        }
    }
}

/// Render raw `cmdline` bytes as text, arguments separated by spaces
///
/// Kernel threads have an empty command line, which renders as `""`.
#[must_use]
pub fn render_cmdline(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    text.trim_end_matches('\0')
        .replace('\0', " ")
        .trim()
        .to_string()
}
