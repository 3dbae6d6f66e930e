//! Fixed set of countdown timers, one per configured task.
//!
//! Like the rest of the core this holds no thread: the owner calls `tick()`
//! once per period (see [`super::TickDriver`]).

use serde::{Deserialize, Serialize};

use crate::storage::TaskDef;

/// Countdown state for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id: u32,
    pub title: String,
    pub description: String,
    is_running: bool,
    /// Remaining seconds, `0..=initial_secs`.
    remaining_secs: u64,
    initial_secs: u64,
}

impl Timer {
    pub fn new(def: &TaskDef, initial_secs: u64) -> Self {
        Self {
            id: def.id,
            title: def.title.clone(),
            description: def.description.clone(),
            is_running: false,
            remaining_secs: initial_secs,
            initial_secs,
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn initial_secs(&self) -> u64 {
        self.initial_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.initial_secs - self.remaining_secs
    }

    /// 0.0 .. 100.0 of the countdown consumed.
    pub fn progress_pct(&self) -> f64 {
        if self.initial_secs == 0 {
            return 0.0;
        }
        self.elapsed_secs() as f64 / self.initial_secs as f64 * 100.0
    }
}

/// What a single tick did to one timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Decremented { id: u32, remaining_secs: u64 },
    AutoStopped { id: u32 },
}

/// Ordered, fixed-size collection of timers with stable ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSet {
    timers: Vec<Timer>,
    initial_secs: u64,
}

impl TimerSet {
    pub fn new(tasks: &[TaskDef], initial_secs: u64) -> Self {
        Self {
            timers: tasks.iter().map(|t| Timer::new(t, initial_secs)).collect(),
            initial_secs,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, id: u32) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn initial_secs(&self) -> u64 {
        self.initial_secs
    }

    pub fn running_count(&self) -> usize {
        self.timers.iter().filter(|t| t.is_running).count()
    }

    pub fn any_running(&self) -> bool {
        self.timers.iter().any(|t| t.is_running)
    }

    /// Sum of `initial - remaining` over every timer, saturating at `u64::MAX`.
    pub fn total_elapsed_secs(&self) -> u64 {
        self.timers
            .iter()
            .map(Timer::elapsed_secs)
            .fold(0, u64::saturating_add)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Flips the running flag. Returns the new flag, or `None` for an unknown id.
    pub fn toggle(&mut self, id: u32) -> Option<bool> {
        let timer = self.timers.iter_mut().find(|t| t.id == id)?;
        timer.is_running = !timer.is_running;
        Some(timer.is_running)
    }

    /// Advances every running timer by one second.
    ///
    /// A running timer already at zero is stopped instead of decremented, so
    /// a timer reaching zero stays "running" until the following tick.
    pub fn tick(&mut self) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        for timer in self.timers.iter_mut().filter(|t| t.is_running) {
            if timer.remaining_secs > 0 {
                timer.remaining_secs -= 1;
                outcomes.push(TickOutcome::Decremented {
                    id: timer.id,
                    remaining_secs: timer.remaining_secs,
                });
            } else {
                timer.is_running = false;
                outcomes.push(TickOutcome::AutoStopped { id: timer.id });
            }
        }
        outcomes
    }

    /// Clears every running flag. Remaining time is kept.
    pub fn stop_all(&mut self) {
        for timer in &mut self.timers {
            timer.is_running = false;
        }
    }

    /// Sets a timer's remaining time directly, clamped to the initial duration.
    ///
    /// Used to rebuild a set from externally tracked elapsed time.
    pub fn set_elapsed(&mut self, id: u32, elapsed_secs: u64) -> bool {
        match self.timers.iter_mut().find(|t| t.id == id) {
            Some(timer) => {
                timer.remaining_secs = timer.initial_secs.saturating_sub(elapsed_secs);
                true
            }
            None => false,
        }
    }
}
