use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::session::SessionPhase;
use crate::timer::Timer;

/// Every state change in a session produces an Event.
/// The CLI prints them as JSON lines in `--json` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        id: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        id: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A running timer hit zero and was stopped by the tick.
    TimerAutoStopped {
        id: u32,
        at: DateTime<Utc>,
    },
    EarningsComputed {
        total_elapsed_secs: u64,
        amount: Decimal,
        at: DateTime<Utc>,
    },
    ProjectionComputed {
        principal: Decimal,
        years: u32,
        daily_rate_pct: Decimal,
        periods: u64,
        /// Exact digits; may exceed any machine integer.
        value: String,
        at: DateTime<Utc>,
    },
    ProjectionFailed {
        reason: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: SessionPhase,
        timers: Vec<Timer>,
        total_earnings: Option<Decimal>,
        projected_value: Option<String>,
        at: DateTime<Utc>,
    },
}
