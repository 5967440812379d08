//! Cancellable fixed-period schedule for the continuous modes

use tokio::sync::watch;
use tokio::time::{Duration, sleep};

/// Drives a periodic loop one tick at a time
///
/// Each call to [`Schedule::tick`] after the first sleeps for the period,
/// so the sleep always starts after the previous tick's work finished and
/// ticks never overlap. The loop ends when the [`StopHandle`] fires or the
/// optional tick cap is reached.
///
/// # Example
/// ```
/// use cinf_cgroup::Schedule;
/// use std::time::Duration;
///
/// # tokio_test_block_on(async {
/// let (schedule, _stop) = Schedule::every(Duration::from_millis(1));
/// let mut schedule = schedule.with_max_ticks(2);
///
/// let mut runs = 0;
/// while schedule.tick().await {
///     runs += 1;
/// }
/// assert_eq!(runs, 2);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug)]
pub struct Schedule {
    period: Duration,
    max_ticks: Option<u64>,
    ticks: u64,
    stop: watch::Receiver<bool>,
}

/// Stops the [`Schedule`] it was created with
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Ask the schedule to stop at the next tick boundary
    ///
    /// A pending inter-tick sleep is cut short.
    pub fn stop(&self) {
        self.tx.send_replace(true);
        tracing::debug!("Stop requested");
    }
}

impl Schedule {
    /// Create a schedule with the given period and its stop handle
    #[must_use]
    pub fn every(period: Duration) -> (Self, StopHandle) {
        let (tx, rx) = watch::channel(false);
        let schedule = Self {
            period,
            max_ticks: None,
            ticks: 0,
            stop: rx,
        };

        (schedule, StopHandle { tx })
    }

    /// End the loop after `max` ticks
    #[must_use]
    pub fn with_max_ticks(mut self, max: u64) -> Self {
        self.max_ticks = Some(max);
        self
    }

    /// Period between ticks
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Ticks started so far
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether a stop was requested
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }

    /// Wait for the next tick; `false` means the loop must end
    pub async fn tick(&mut self) -> bool {
        if self.is_stopped() || self.max_ticks.is_some_and(|max| self.ticks >= max) {
            return false;
        }

        if self.ticks > 0 {
            tokio::select! {
                () = sleep(self.period) => {}
                Ok(()) = self.stop.changed() => {}
            }

            if self.is_stopped() {
                return false;
            }
        }

        self.ticks += 1;
        true
    }
}
