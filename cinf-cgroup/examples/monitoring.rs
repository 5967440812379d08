//! Monitor this process's memory cgroup for a few seconds
//!
//! Run with: cargo run --example monitoring

use std::time::Duration;

use cinf_cgroup::{MonitorSpec, ProcessMonitor, Schedule, SubsystemTable};
use cinf_core::{HostPaths, ProcessId};
use cinf_namespace::gather;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let paths = HostPaths::new();
    let index = gather(&paths)?;
    let subsystems = SubsystemTable::load(&paths).await;

    let spec: MonitorSpec = format!(
        "{}:memory.usage_in_bytes,memory.limit_in_bytes,memory.current",
        ProcessId::current()
    )
    .parse()?;

    let monitor = ProcessMonitor::new(&paths, &index, subsystems, spec);
    let (schedule, stop) = Schedule::every(Duration::from_secs(1));

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    let ticks = monitor
        .run(schedule.with_max_ticks(5), &mut std::io::stdout())
        .await?;

    println!("\nRendered {ticks} frames");
    Ok(())
}
