//! Monitor command implementation

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use cinf_cgroup::{MonitorSpec, ProcessMonitor, Schedule, SubsystemTable};

use super::{Invocation, stop_on_ctrl_c};

const REFRESH: Duration = Duration::from_secs(1);

pub async fn execute(invocation: &Invocation, spec: &str) -> Result<()> {
    let spec: MonitorSpec = spec.parse()?;
    let index = invocation.scan()?;
    let subsystems = SubsystemTable::load(&invocation.paths).await;

    let monitor = ProcessMonitor::new(&invocation.paths, &index, subsystems, spec);
    let (schedule, stop) = Schedule::every(REFRESH);
    stop_on_ctrl_c(stop);

    let mut stdout = io::stdout();
    match monitor.run(schedule, &mut stdout).await {
        Ok(_) => {
            println!();
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{e}");
            Ok(())
        }
        Err(e) => Err(e).context("Monitoring failed"),
    }
}
