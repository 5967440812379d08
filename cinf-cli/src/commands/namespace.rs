//! Namespace command implementation

use anyhow::Result;
use cinf_core::NamespaceId;

use super::Invocation;
use crate::cli::OutputFormat;
use crate::output::{Table, print_json};

pub fn execute(invocation: &Invocation, id: &str) -> Result<()> {
    let id: NamespaceId = id.parse()?;
    let index = invocation.scan()?;
    let members = index.processes_in(id);

    if invocation.output == OutputFormat::Json {
        return print_json(&members);
    }

    if members.is_empty() {
        println!("No processes found in namespace {id}");
        return Ok(());
    }

    let mut table = Table::new(&["PID", "PPID", "NAME", "CMD", "NTHREADS", "CGROUPS", "STATE"]);
    for process in members {
        table.row(vec![
            process.pid.to_string(),
            process.ppid.to_string(),
            process.name.clone(),
            process.display_command(invocation.max_command_len).to_string(),
            process.threads.to_string(),
            process.cgroup_lines().collect::<Vec<_>>().join(" "),
            process.state.clone(),
        ]);
    }
    table.print();

    Ok(())
}
