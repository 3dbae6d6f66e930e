mod driver;
mod set;

pub use driver::TickDriver;
pub use set::{TickOutcome, Timer, TimerSet};
