//! Periodic tick source that exists only while some timer is running.
//!
//! The driver owns at most one `tokio::time::Interval`. It is created when
//! the running count goes from zero to non-zero and dropped when it returns
//! to zero, so a fully paused session has no pending wakeups.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
pub struct TickDriver {
    period: Duration,
    interval: Option<Interval>,
}

impl TickDriver {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Acquires or releases the interval to match `any_running`.
    ///
    /// Returns `true` when the driver changed state.
    pub fn sync(&mut self, any_running: bool) -> bool {
        match (any_running, self.interval.is_some()) {
            (true, false) => {
                // First tick one full period after start, not immediately.
                let mut interval = interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.interval = Some(interval);
                tracing::debug!(period_ms = self.period.as_millis() as u64, "tick driver started");
                true
            }
            (false, true) => {
                self.interval = None;
                tracing::debug!("tick driver stopped");
                true
            }
            _ => false,
        }
    }

    /// Waits for the next tick. Never resolves while inactive.
    ///
    /// Cancel safe, intended for use inside `tokio::select!`.
    pub async fn next(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
