//! One interactive session: the timer set plus the computed outputs.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> EarningsComputed -> ProjectionComputed
//!   ^            |                    |
//!   +------------+--------------------+   (any successful toggle)
//! ```
//!
//! Toggling only invalidates the computed outputs; elapsed time on the
//! timers is kept for the whole session.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EarningsError, ProjectionError, Result};
use crate::events::Event;
use crate::projection::{project_future_value, ProjectedValue, ProjectionParams};
use crate::storage::{Config, TaskDef};
use crate::timer::{TickOutcome, TimerSet};

const SECS_PER_MINUTE: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    EarningsComputed,
    ProjectionComputed,
}

/// A projection together with the inputs it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRecord {
    pub principal: Decimal,
    pub params: ProjectionParams,
    pub outcome: Result<ProjectedValue, ProjectionError>,
}

#[derive(Debug, Clone)]
pub struct Session {
    timers: TimerSet,
    rate_per_minute: Decimal,
    params: ProjectionParams,
    total_earnings: Option<Decimal>,
    projection: Option<ProjectionRecord>,
}

impl Session {
    pub fn new(tasks: &[TaskDef], initial_secs: u64, rate_per_minute: Decimal) -> Self {
        Self {
            timers: TimerSet::new(tasks, initial_secs),
            rate_per_minute,
            params: ProjectionParams::default(),
            total_earnings: None,
            projection: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::new(
            &config.tasks,
            config.timer.initial_duration_secs,
            config.earnings.rate_per_minute,
        );
        session.params = config.projection_params();
        session
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn rate_per_minute(&self) -> Decimal {
        self.rate_per_minute
    }

    pub fn params(&self) -> &ProjectionParams {
        &self.params
    }

    pub fn total_earnings(&self) -> Option<Decimal> {
        self.total_earnings
    }

    pub fn projection(&self) -> Option<&ProjectionRecord> {
        self.projection.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.total_earnings, &self.projection) {
            (_, Some(_)) => SessionPhase::ProjectionComputed,
            (Some(_), None) => SessionPhase::EarningsComputed,
            (None, None) => SessionPhase::Idle,
        }
    }

    /// "Stop all" is offered while something runs or a total is showing.
    pub fn can_stop_all(&self) -> bool {
        self.timers.any_running() || self.total_earnings.is_some()
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase(),
            timers: self.timers.timers().to_vec(),
            total_earnings: self.total_earnings,
            projected_value: self.projection.as_ref().and_then(|p| match &p.outcome {
                Ok(value) => Some(value.digits()),
                Err(_) => None,
            }),
            at: Utc::now(),
        }
    }

    /// Event describing the current earnings total, if one is set.
    pub fn earnings_event(&self) -> Option<Event> {
        Some(Event::EarningsComputed {
            total_elapsed_secs: self.timers.total_elapsed_secs(),
            amount: self.total_earnings?,
            at: Utc::now(),
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Starts or pauses one timer and clears earnings and projection.
    ///
    /// Unknown ids change nothing and return `None`.
    pub fn toggle(&mut self, id: u32) -> Option<Event> {
        let running = self.timers.toggle(id)?;
        self.invalidate();
        let remaining_secs = self.timers.get(id).map(|t| t.remaining_secs()).unwrap_or(0);
        tracing::debug!(id, running, remaining_secs, "timer toggled");
        let at = Utc::now();
        Some(if running {
            Event::TimerStarted {
                id,
                remaining_secs,
                at,
            }
        } else {
            Event::TimerPaused {
                id,
                remaining_secs,
                at,
            }
        })
    }

    /// One period of the countdown. Returns auto-stop events.
    pub fn tick(&mut self) -> Vec<Event> {
        self.timers
            .tick()
            .into_iter()
            .filter_map(|outcome| match outcome {
                TickOutcome::AutoStopped { id } => {
                    tracing::info!(id, "timer reached zero");
                    Some(Event::TimerAutoStopped { id, at: Utc::now() })
                }
                TickOutcome::Decremented { .. } => None,
            })
            .collect()
    }

    /// Stops every timer and converts total elapsed time into money.
    ///
    /// Any previous projection is discarded. On overflow the timers stay
    /// stopped and no total is shown.
    pub fn stop_all_and_compute_earnings(&mut self) -> Result<Decimal> {
        self.timers.stop_all();
        self.invalidate();
        let elapsed_secs = self.timers.total_elapsed_secs();
        let amount = earnings_for(elapsed_secs, self.rate_per_minute)?;
        self.total_earnings = Some(amount);
        tracing::info!(elapsed_secs, %amount, "earnings computed");
        Ok(amount)
    }

    /// Overrides one timer's elapsed time, e.g. from an external log.
    ///
    /// Clears computed outputs like a toggle does. Unknown ids return `false`.
    pub fn record_elapsed(&mut self, id: u32, elapsed_secs: u64) -> bool {
        if !self.timers.set_elapsed(id, elapsed_secs) {
            return false;
        }
        self.invalidate();
        true
    }

    pub fn set_years(&mut self, years: u32) {
        self.params.years = years;
    }

    pub fn set_daily_rate_pct(&mut self, pct: Decimal) {
        self.params.daily_rate_pct = pct;
    }

    /// Projects the current earnings with the current inputs.
    ///
    /// Returns `None` without touching state when there is no positive
    /// earnings total. A failed computation is stored and reported as
    /// `ProjectionFailed`.
    pub fn project(&mut self) -> Option<Event> {
        let principal = self.total_earnings.filter(|p| *p > Decimal::ZERO)?;
        let params = self.params;
        let outcome = project_future_value(principal, &params);
        let at = Utc::now();

        let event = match &outcome {
            Ok(value) => {
                tracing::info!(
                    %principal,
                    years = params.years,
                    rate = %params.daily_rate_pct,
                    digits = value.digits().len(),
                    "projection computed"
                );
                Event::ProjectionComputed {
                    principal,
                    years: params.years,
                    daily_rate_pct: params.daily_rate_pct,
                    periods: value.periods,
                    value: value.digits(),
                    at,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "projection failed");
                Event::ProjectionFailed {
                    reason: e.to_string(),
                    at,
                }
            }
        };

        self.projection = Some(ProjectionRecord {
            principal,
            params,
            outcome,
        });
        Some(event)
    }

    fn invalidate(&mut self) {
        self.total_earnings = None;
        self.projection = None;
    }
}

/// `elapsed_secs / 60 * rate`, multiplied out before dividing.
pub fn earnings_for(
    elapsed_secs: u64,
    rate_per_minute: Decimal,
) -> Result<Decimal, EarningsError> {
    Decimal::from(elapsed_secs)
        .checked_mul(rate_per_minute)
        .and_then(|v| v.checked_div(Decimal::from(SECS_PER_MINUTE)))
        .ok_or(EarningsError::Overflow {
            elapsed_secs,
            rate_per_minute,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn session() -> Session {
        Session::from_config(&Config::default())
    }

    fn run_ticks(session: &mut Session, n: u64) {
        for _ in 0..n {
            session.tick();
        }
    }

    #[test]
    fn new_session_is_idle() {
        let s = session();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(!s.can_stop_all());
        assert_eq!(s.params().years, 15);
    }

    #[test]
    fn untouched_timers_earn_zero() {
        let mut s = session();
        assert_eq!(s.stop_all_and_compute_earnings().unwrap(), Decimal::ZERO);
        assert_eq!(s.phase(), SessionPhase::EarningsComputed);
        assert!(s.project().is_none(), "zero principal must be skipped");
        assert_eq!(s.phase(), SessionPhase::EarningsComputed);
    }

    #[test]
    fn six_hundred_seconds_earn_one_hundred_thousand() {
        let mut s = session();
        s.toggle(1);
        run_ticks(&mut s, 600);
        let amount = s.stop_all_and_compute_earnings().unwrap();
        assert_eq!(amount, Decimal::from(100_000));
        assert!(!s.timers().any_running());
        assert_eq!(s.timers().get(1).unwrap().remaining_secs(), 1200);
    }

    #[test]
    fn partial_minutes_are_exact() {
        assert_eq!(earnings_for(90, Decimal::from(10_000)), Ok(Decimal::from(15_000)));
        assert_eq!(earnings_for(1, Decimal::from(60)), Ok(Decimal::ONE));
        assert_eq!(
            earnings_for(30, Decimal::from_str("0.5").unwrap()),
            Ok(Decimal::from_str("0.25").unwrap())
        );
    }

    #[test]
    fn toggle_resets_outputs_but_not_elapsed_time() {
        let mut s = session();
        s.toggle(2);
        run_ticks(&mut s, 60);
        s.stop_all_and_compute_earnings().unwrap();
        assert!(matches!(s.project(), Some(Event::ProjectionComputed { .. })));
        assert_eq!(s.phase(), SessionPhase::ProjectionComputed);

        let event = s.toggle(3);
        assert!(matches!(event, Some(Event::TimerStarted { id: 3, .. })));
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.total_earnings().is_none());
        assert!(s.projection().is_none());
        assert_eq!(s.timers().total_elapsed_secs(), 60);
    }

    #[test]
    fn unknown_toggle_keeps_outputs() {
        let mut s = session();
        s.toggle(1);
        run_ticks(&mut s, 6);
        s.stop_all_and_compute_earnings().unwrap();
        assert!(s.toggle(42).is_none());
        assert_eq!(s.total_earnings(), Some(Decimal::from(1000)));
    }

    #[test]
    fn recomputing_earnings_drops_projection() {
        let mut s = session();
        s.toggle(1);
        run_ticks(&mut s, 60);
        s.stop_all_and_compute_earnings().unwrap();
        s.project();
        s.stop_all_and_compute_earnings().unwrap();
        assert_eq!(s.phase(), SessionPhase::EarningsComputed);
    }

    #[test]
    fn projection_uses_current_inputs() {
        let mut s = session();
        s.toggle(1);
        run_ticks(&mut s, 600);
        s.stop_all_and_compute_earnings().unwrap();
        s.set_years(1);
        s.set_daily_rate_pct(Decimal::from_str("0.5").unwrap());

        match s.project() {
            Some(Event::ProjectionComputed { value, periods, .. }) => {
                assert_eq!(periods, 365);
                assert_eq!(value, "103493055");
            }
            other => panic!("Expected ProjectionComputed, got {other:?}"),
        }
        let record = s.projection().unwrap();
        assert_eq!(record.params.years, 1);
        assert_eq!(record.principal, Decimal::from(100_000));
    }

    #[test]
    fn projection_is_idempotent() {
        let mut s = session();
        s.toggle(4);
        run_ticks(&mut s, 123);
        s.stop_all_and_compute_earnings().unwrap();
        let first = s.project();
        let second = s.project();
        match (first, second) {
            (
                Some(Event::ProjectionComputed { value: a, .. }),
                Some(Event::ProjectionComputed { value: b, .. }),
            ) => assert_eq!(a, b),
            other => panic!("Expected two projections, got {other:?}"),
        }
    }

    #[test]
    fn failed_projection_is_recorded() {
        let mut s = session();
        s.toggle(1);
        run_ticks(&mut s, 60);
        s.stop_all_and_compute_earnings().unwrap();
        s.set_years(20_000);
        assert!(matches!(s.project(), Some(Event::ProjectionFailed { .. })));
        assert_eq!(s.phase(), SessionPhase::ProjectionComputed);
        assert!(s.projection().unwrap().outcome.is_err());
        match s.snapshot() {
            Event::StateSnapshot { projected_value, .. } => assert!(projected_value.is_none()),
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn auto_stop_is_reported_by_tick() {
        let tasks = vec![TaskDef {
            id: 9,
            title: "Short".into(),
            description: String::new(),
        }];
        let mut s = Session::new(&tasks, 1, Decimal::from(60));
        s.toggle(9);
        assert!(s.tick().is_empty());
        let events = s.tick();
        assert!(matches!(events.as_slice(), [Event::TimerAutoStopped { id: 9, .. }]));
        assert!(!s.timers().any_running());
    }

    #[test]
    fn can_stop_all_follows_running_and_totals() {
        let mut s = session();
        s.toggle(1);
        assert!(s.can_stop_all());
        s.stop_all_and_compute_earnings().unwrap();
        assert!(s.can_stop_all());
        s.toggle(1);
        s.toggle(1);
        assert!(!s.can_stop_all());
    }

    #[test]
    fn record_elapsed_feeds_earnings() {
        let mut s = session();
        assert!(s.record_elapsed(1, 600));
        assert!(s.record_elapsed(2, 5000));
        assert!(!s.record_elapsed(99, 1));
        // Second timer is capped at its 1800 s duration.
        assert_eq!(s.stop_all_and_compute_earnings().unwrap(), Decimal::from(400_000));
    }

    #[test]
    fn earnings_overflow_is_an_error() {
        assert_eq!(
            earnings_for(u64::MAX, Decimal::MAX),
            Err(EarningsError::Overflow {
                elapsed_secs: u64::MAX,
                rate_per_minute: Decimal::MAX,
            })
        );

        let mut s = Session::new(&Config::default().tasks, u64::MAX, Decimal::MAX);
        assert!(s.record_elapsed(1, u64::MAX));
        assert!(s.record_elapsed(2, u64::MAX));
        let err = s.stop_all_and_compute_earnings().unwrap_err();
        assert!(matches!(err, crate::CoreError::Earnings(EarningsError::Overflow { .. })));
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.total_earnings().is_none());
    }

    #[test]
    fn huge_durations_do_not_wrap_the_elapsed_sum() {
        let mut s = Session::new(&Config::default().tasks, u64::MAX, Decimal::ONE);
        assert!(s.record_elapsed(1, u64::MAX));
        assert!(s.record_elapsed(2, u64::MAX));
        assert_eq!(s.timers().total_elapsed_secs(), u64::MAX);
        let amount = s.stop_all_and_compute_earnings().unwrap();
        assert_eq!(amount, Decimal::from(u64::MAX) / Decimal::from(60));
    }

    #[test]
    fn earnings_event_carries_total() {
        let mut s = session();
        assert!(s.earnings_event().is_none());
        s.toggle(1);
        run_ticks(&mut s, 120);
        s.stop_all_and_compute_earnings().unwrap();
        match s.earnings_event() {
            Some(Event::EarningsComputed {
                total_elapsed_secs,
                amount,
                ..
            }) => {
                assert_eq!(total_elapsed_secs, 120);
                assert_eq!(amount, Decimal::from(20_000));
            }
            other => panic!("Expected EarningsComputed, got {other:?}"),
        }
    }
}
