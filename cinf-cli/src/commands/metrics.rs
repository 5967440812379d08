//! Metrics command implementation

use std::io;

use anyhow::{Context, Result};
use cinf_cgroup::{MetricsExporter, MetricsSpec, Schedule, WriterSink};

use super::{Invocation, stop_on_ctrl_c};

pub async fn execute(invocation: &Invocation, spec: &str, rescan: bool) -> Result<()> {
    let spec: MetricsSpec = spec.parse()?;
    let index = invocation.scan()?;

    tracing::info!(output = %spec.output, "Starting metrics export");

    let (schedule, stop) = Schedule::every(spec.interval);
    stop_on_ctrl_c(stop);

    let mut sink = WriterSink::new(io::stdout());
    MetricsExporter::new(&invocation.paths)
        .with_rescan(rescan)
        .run(index, schedule, &mut sink)
        .await
        .context("Metrics export failed")?;

    Ok(())
}
