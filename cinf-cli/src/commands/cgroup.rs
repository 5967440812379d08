//! Cgroup command implementation

use anyhow::{Context, Result};
use cinf_cgroup::{CgroupReader, CgroupSpec, flatten_value, lookup_cgroup};

use super::Invocation;
use crate::cli::OutputFormat;
use crate::output::{Table, print_json};

pub async fn execute(invocation: &Invocation, spec: &str) -> Result<()> {
    let spec: CgroupSpec = spec.parse()?;
    let index = invocation.scan()?;
    let reader = CgroupReader::new(&invocation.paths);

    let files = match lookup_cgroup(&index, &reader, spec).await {
        Ok(files) => files,
        Err(e) if e.is_not_found() => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to read control files"),
    };

    if invocation.output == OutputFormat::Json {
        return print_json(&files);
    }

    let mut table = Table::new(&["CONTROLFILE", "VALUE"]);
    for (name, value) in &files {
        table.row(vec![name.clone(), flatten_value(value)]);
    }
    table.print();

    Ok(())
}
