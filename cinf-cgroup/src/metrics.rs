//! Periodic export of every indexed process
//!
//! Each tick emits one [`MetricsSnapshot`] through a [`MetricsSink`]. The
//! sink is a trait so tests can capture snapshots in memory while the CLI
//! writes pretty JSON to stdout.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use cinf_core::{Error, HostPaths, Process, Result};
use cinf_namespace::{CorrelationIndex, gather};

use crate::schedule::Schedule;

/// Expected shape of a metrics specifier
pub const METRICS_USAGE: &str = "It should be OUTPUT_DEF:INTERVAL.\n\
    For example: RAW:1000 will output all namespace and cgroups metrics to stdout, every second.";

/// Where metrics go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pretty JSON on standard output
    Raw,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("RAW"),
        }
    }
}

/// An `OUTPUT_DEF:INTERVAL` metrics specifier, interval in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSpec {
    /// Output mode
    pub output: OutputMode,
    /// Time between snapshots
    pub interval: Duration,
}

impl FromStr for MetricsSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = |message: String| Error::MalformedInput {
            message,
            usage: METRICS_USAGE,
        };

        let (output, interval) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| {
                malformed(format!("Provided argument '{s}' is not in expected format."))
            })?;

        let output = if output.eq_ignore_ascii_case("raw") {
            OutputMode::Raw
        } else {
            return Err(malformed(format!("Output mode '{output}' is not supported.")));
        };

        let millis = interval
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| {
                malformed(format!("'{interval}' is not a positive interval in milliseconds."))
            })?;

        Ok(Self {
            output,
            interval: Duration::from_millis(millis),
        })
    }
}

impl fmt::Display for MetricsSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.output, self.interval.as_millis())
    }
}

/// One exported snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot<'a> {
    /// 1-based tick number
    pub tick: u64,
    /// Wall clock at sampling time
    pub timestamp_ms: u64,
    /// Every indexed process, ordered by pid
    pub processes: Vec<&'a Process>,
}

impl<'a> MetricsSnapshot<'a> {
    fn capture(tick: u64, index: &'a CorrelationIndex) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

        Self {
            tick,
            timestamp_ms,
            processes: index.processes().collect(),
        }
    }
}

/// Destination for metrics snapshots
#[async_trait]
pub trait MetricsSink: Send {
    /// Emit one snapshot
    ///
    /// # Errors
    /// Returns error if the snapshot cannot be serialized or written
    async fn emit(&mut self, snapshot: &MetricsSnapshot<'_>) -> Result<()>;
}

/// Writes each snapshot as pretty JSON followed by a newline
#[derive(Debug)]
pub struct WriterSink<W> {
    out: W,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wrap a writer
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Give the writer back
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: Write + Send> MetricsSink for WriterSink<W> {
    async fn emit(&mut self, snapshot: &MetricsSnapshot<'_>) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, snapshot)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Sink that keeps snapshots in memory (for testing)
///
/// Clones share the same buffer.
///
/// # Example
/// ```
/// use cinf_cgroup::{MemorySink, MetricsExporter, Schedule};
/// use cinf_core::HostPaths;
/// use cinf_namespace::CorrelationIndex;
/// use std::time::Duration;
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let (schedule, _stop) = Schedule::every(Duration::from_millis(1));
/// let mut sink = MemorySink::new();
///
/// let exporter = MetricsExporter::new(&HostPaths::new());
/// exporter
///     .run(CorrelationIndex::new(), schedule.with_max_ticks(2), &mut sink)
///     .await
///     .unwrap();
///
/// assert_eq!(sink.snapshots().await.len(), 2);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    snapshots: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots emitted so far, as JSON values
    pub async fn snapshots(&self) -> Vec<serde_json::Value> {
        self.snapshots.lock().await.clone()
    }
}

#[async_trait]
impl MetricsSink for MemorySink {
    async fn emit(&mut self, snapshot: &MetricsSnapshot<'_>) -> Result<()> {
        let value = serde_json::to_value(snapshot)?;
        self.snapshots.lock().await.push(value);
        Ok(())
    }
}

/// Drives the metrics loop
#[derive(Debug, Clone)]
pub struct MetricsExporter {
    paths: HostPaths,
    rescan: bool,
}

impl MetricsExporter {
    /// Exporter that reuses the startup index on every tick
    #[must_use]
    pub fn new(paths: &HostPaths) -> Self {
        Self {
            paths: paths.clone(),
            rescan: false,
        }
    }

    /// Re-run a full gather before every tick after the first
    #[must_use]
    pub const fn with_rescan(mut self, rescan: bool) -> Self {
        self.rescan = rescan;
        self
    }

    /// Emit a snapshot of `index` on every tick of `schedule`
    ///
    /// A failed rescan keeps the previous index. Returns the number of
    /// snapshots emitted.
    ///
    /// # Errors
    /// Returns error if the sink fails.
    pub async fn run(
        &self,
        mut index: CorrelationIndex,
        mut schedule: Schedule,
        sink: &mut dyn MetricsSink,
    ) -> Result<u64> {
        tracing::info!(
            interval_ms = schedule.period().as_millis(),
            rescan = self.rescan,
            "Exporting metrics"
        );

        while schedule.tick().await {
            let tick = schedule.ticks();

            if self.rescan && tick > 1 {
                match gather(&self.paths) {
                    Ok(fresh) => index = fresh,
                    Err(e) => tracing::warn!(error = %e, "Rescan failed, reusing previous index"),
                }
            }

            let snapshot = MetricsSnapshot::capture(tick, &index);
            tracing::debug!(tick, processes = snapshot.processes.len(), "Emitting snapshot");
            sink.emit(&snapshot).await?;
        }

        Ok(schedule.ticks())
    }
}
