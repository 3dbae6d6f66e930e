//! # Taskmeter Core Library
//!
//! Business logic for Taskmeter, a task-timer that turns focused minutes
//! into an earnings figure and projects it forward with daily compounding.
//! The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Set**: fixed list of per-task countdowns; the caller invokes
//!   `tick()` once per period
//! - **Tick Driver**: the single periodic source, alive only while a timer runs
//! - **Session**: timers plus the computed earnings and projection
//! - **Projection**: exact big-integer compound growth
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Session`]: session state machine
//! - [`TimerSet`]: timer collection
//! - [`TickDriver`]: owned periodic tick
//! - [`project_future_value`]: the compounding calculation
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod format;
pub mod projection;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, EarningsError, ProjectionError};
pub use events::Event;
pub use projection::{project_future_value, ProjectedValue, ProjectionParams};
pub use session::{earnings_for, ProjectionRecord, Session, SessionPhase};
pub use storage::{Config, CurrencyConfig, TaskDef};
pub use timer::{TickDriver, TickOutcome, Timer, TimerSet};
