//! Pid command implementation

use anyhow::Result;
use cinf_core::ProcessId;

use super::Invocation;
use crate::cli::OutputFormat;
use crate::output::{Table, print_json};

pub fn execute(invocation: &Invocation, pid: &str) -> Result<()> {
    let pid: ProcessId = pid.parse()?;
    let index = invocation.scan()?;
    let namespaces = index.namespaces_of(pid);

    if invocation.output == OutputFormat::Json {
        return print_json(namespaces);
    }

    if namespaces.is_empty() {
        println!("No namespaces found for process {pid}");
        return Ok(());
    }

    let mut table = Table::new(&["NAMESPACE", "TYPE"]);
    for namespace in namespaces {
        table.row(vec![namespace.id.to_string(), namespace.kind.to_string()]);
    }
    table.print();

    Ok(())
}
