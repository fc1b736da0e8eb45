//! Consecutive-day journaling streaks.
//!
//! [`StreakState`] is the per-user record kept in storage; [`StreakEngine`]
//! holds the pure update and recomputation logic. Nothing in this module
//! reads the clock: "today" is always supplied by the caller.

mod date;
mod engine;
mod source;
mod state;

pub use date::{format_date, parse_date, DATE_FORMAT};
pub use engine::{HistoricalStreak, StreakCheck, StreakEngine};
pub use source::StreakSource;
pub use state::StreakState;
