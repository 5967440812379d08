//! List command implementation

use anyhow::Result;
use cinf_core::NamespaceKind;

use super::Invocation;
use crate::cli::OutputFormat;
use crate::output::{Table, print_json};

pub fn execute(invocation: &Invocation, kind: Option<NamespaceKind>) -> Result<()> {
    let index = invocation.scan()?;

    let summaries: Vec<_> = index
        .summaries(invocation.max_command_len)
        .into_iter()
        .filter(|summary| kind.is_none_or(|kind| summary.namespace.kind == kind))
        .collect();

    tracing::debug!(namespaces = summaries.len(), "Listing namespaces");

    if invocation.output == OutputFormat::Json {
        return print_json(&summaries);
    }

    let mut table = Table::new(&["NAMESPACE", "TYPE", "NPROCS", "USERS", "CMD"]);
    for summary in &summaries {
        table.row(vec![
            summary.namespace.id.to_string(),
            summary.namespace.kind.to_string(),
            summary.processes.to_string(),
            summary.users_label(),
            summary.command.clone(),
        ]);
    }
    table.print();

    Ok(())
}
