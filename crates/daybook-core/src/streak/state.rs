//! Persisted per-user streak counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Streak counters stored for one user.
///
/// Created zeroed alongside the user account and only ever replaced by
/// [`StreakEngine::on_entry_created`](super::StreakEngine::on_entry_created).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Date of the most recent entry the engine has seen
    pub last_date: Option<NaiveDate>,
    /// Consecutive days ending at `last_date`
    pub current_streak: u32,
    /// Largest `current_streak` ever observed
    pub longest_streak: u32,
}

impl StreakState {
    /// Zeroed state for a freshly created account.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no entry has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.last_date.is_none()
    }

    /// Checks the invariants that hold for every state the engine produces:
    /// `longest >= current`, and `current == 0` exactly when `last_date` is unset.
    pub fn is_consistent(&self) -> bool {
        self.longest_streak >= self.current_streak
            && (self.current_streak == 0) == self.last_date.is_none()
    }

    /// Current streak as it should be shown on `today`.
    ///
    /// The stored counter is only refreshed on entry creation, so it keeps
    /// its value after the user stops writing. It only counts while
    /// `last_date` is today or yesterday.
    pub fn displayed_current(&self, today: NaiveDate) -> u32 {
        match self.last_date {
            Some(last) if last == today || Some(last) == today.pred_opt() => {
                self.current_streak
            }
            _ => 0,
        }
    }
}
