//! Streak update and recomputation.
//!
//! Two independent ways to arrive at a user's streaks:
//! - [`StreakEngine::on_entry_created`] advances the persisted
//!   [`StreakState`] by one entry, in O(1).
//! - [`StreakEngine::recompute_from_history`] derives the streaks from the
//!   full set of entry dates and is never written back.
//!
//! Both agree for any history written in non-decreasing date order. Backdated
//! entries are where they part ways: the incremental path treats the older
//! date as a reset, while the history scan sees the true calendar.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::StreakState;

/// Streaks derived from a user's entry history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalStreak {
    /// Run ending at the most recent entry, if that entry is today or yesterday
    pub current_streak: u32,
    /// Longest run anywhere in the history
    pub longest_streak: u32,
    /// Last day of the most recent run of `longest_streak` days
    pub longest_streak_end: Option<NaiveDate>,
}

/// Outcome of comparing stored counters against the entry history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StreakCheck {
    Consistent,
    Diverged {
        /// Stored current streak as displayed on the evaluation date
        stored_current: u32,
        stored_longest: u32,
        recomputed_current: u32,
        recomputed_longest: u32,
    },
}

impl StreakCheck {
    pub fn is_consistent(&self) -> bool {
        matches!(self, StreakCheck::Consistent)
    }
}

/// Stateless streak logic. Every operation is a pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakEngine;

impl StreakEngine {
    /// Advance `state` for a newly created entry dated `today`.
    ///
    /// - no previous entry: the streak starts at 1
    /// - previous entry yesterday: the streak grows by one
    /// - previous entry today: nothing changes, so repeated calls are idempotent
    /// - anything else (a gap, or `last_date` after `today`): reset to 1
    pub fn on_entry_created(state: &StreakState, today: NaiveDate) -> StreakState {
        let current_streak = match state.last_date {
            None => 1,
            Some(last) if Some(last) == today.pred_opt() => state.current_streak + 1,
            Some(last) if last == today => state.current_streak,
            Some(_) => 1,
        };

        StreakState {
            last_date: Some(today),
            current_streak,
            longest_streak: state.longest_streak.max(current_streak),
        }
    }

    /// Fold [`on_entry_created`](Self::on_entry_created) over `dates` in the
    /// order given, starting from a zeroed state.
    pub fn replay<I>(dates: I) -> StreakState
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates
            .into_iter()
            .fold(StreakState::new(), |state, date| {
                Self::on_entry_created(&state, date)
            })
    }

    /// Derive current and longest streak from a user's entry dates.
    ///
    /// Duplicates and ordering of `dates` do not matter. The current streak
    /// is 0 unless the most recent date is `today` or the day before.
    pub fn recompute_from_history<I>(dates: I, today: NaiveDate) -> HistoricalStreak
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let days: BTreeSet<NaiveDate> = dates.into_iter().collect();

        let mut longest_streak = 0u32;
        let mut longest_streak_end = None;
        let mut run = 0u32;
        let mut run_end: Option<NaiveDate> = None;
        let mut prev: Option<NaiveDate> = None;

        // Newest first; strict `>` keeps the most recent of equally long runs.
        for &day in days.iter().rev() {
            match prev {
                Some(p) if p.pred_opt() == Some(day) => run += 1,
                _ => {
                    run = 1;
                    run_end = Some(day);
                }
            }
            if run > longest_streak {
                longest_streak = run;
                longest_streak_end = run_end;
            }
            prev = Some(day);
        }

        let mut current_streak = 0u32;
        if let Some(&latest) = days.iter().next_back() {
            if latest == today || Some(latest) == today.pred_opt() {
                let mut day = Some(latest);
                while let Some(present) = day.filter(|d| days.contains(d)) {
                    current_streak += 1;
                    day = present.pred_opt();
                }
            }
        }

        HistoricalStreak {
            current_streak,
            longest_streak,
            longest_streak_end,
        }
    }

    /// Compare the stored counters with the ones recomputed from `dates`.
    ///
    /// The stored current streak is aged with
    /// [`StreakState::displayed_current`] first, so a state that simply went
    /// stale is not reported as divergent.
    pub fn check_consistency(
        state: &StreakState,
        dates: &[NaiveDate],
        today: NaiveDate,
    ) -> StreakCheck {
        let recomputed = Self::recompute_from_history(dates.iter().copied(), today);
        let stored_current = state.displayed_current(today);

        if stored_current == recomputed.current_streak
            && state.longest_streak == recomputed.longest_streak
        {
            StreakCheck::Consistent
        } else {
            StreakCheck::Diverged {
                stored_current,
                stored_longest: state.longest_streak,
                recomputed_current: recomputed.current_streak,
                recomputed_longest: recomputed.longest_streak,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state(last: &str, current: u32, longest: u32) -> StreakState {
        StreakState {
            last_date: Some(d(last)),
            current_streak: current,
            longest_streak: longest,
        }
    }

    // ── on_entry_created ──────────────────────────────────────────────

    #[test]
    fn first_entry_starts_streak_at_one() {
        let next = StreakEngine::on_entry_created(&StreakState::new(), d("2024-05-10"));
        assert_eq!(next, state("2024-05-10", 1, 1));
    }

    #[test]
    fn entry_the_day_after_extends_streak() {
        let next = StreakEngine::on_entry_created(&state("2024-05-10", 3, 5), d("2024-05-11"));
        assert_eq!(next, state("2024-05-11", 4, 5));
    }

    #[test]
    fn extending_past_longest_raises_longest() {
        let next = StreakEngine::on_entry_created(&state("2024-05-10", 5, 5), d("2024-05-11"));
        assert_eq!(next, state("2024-05-11", 6, 6));
    }

    #[test]
    fn gap_resets_streak_but_keeps_longest() {
        let next = StreakEngine::on_entry_created(&state("2024-05-10", 4, 4), d("2024-05-12"));
        assert_eq!(next, state("2024-05-12", 1, 4));
    }

    #[test]
    fn same_day_is_a_no_op() {
        let before = state("2024-05-10", 2, 7);
        let next = StreakEngine::on_entry_created(&before, d("2024-05-10"));
        assert_eq!(next, before);
    }

    #[test]
    fn future_last_date_resets() {
        let next = StreakEngine::on_entry_created(&state("2024-05-20", 4, 4), d("2024-05-10"));
        assert_eq!(next, state("2024-05-10", 1, 4));
    }

    #[test]
    fn extends_across_month_and_year_boundaries() {
        let next = StreakEngine::on_entry_created(&state("2023-12-31", 2, 2), d("2024-01-01"));
        assert_eq!(next.current_streak, 3);
        let next = StreakEngine::on_entry_created(&state("2024-02-29", 1, 1), d("2024-03-01"));
        assert_eq!(next.current_streak, 2);
    }

    #[test]
    fn in_order_trace_with_a_skipped_day() {
        let s1 = StreakEngine::on_entry_created(&StreakState::new(), d("2024-03-01"));
        assert_eq!((s1.current_streak, s1.longest_streak), (1, 1));
        let s2 = StreakEngine::on_entry_created(&s1, d("2024-03-02"));
        assert_eq!((s2.current_streak, s2.longest_streak), (2, 2));
        let s4 = StreakEngine::on_entry_created(&s2, d("2024-03-04"));
        assert_eq!((s4.current_streak, s4.longest_streak), (1, 2));
        assert_eq!(s4.last_date, Some(d("2024-03-04")));
    }

    #[test]
    fn replay_matches_manual_application() {
        let replayed = StreakEngine::replay([d("2024-03-01"), d("2024-03-02"), d("2024-03-04")]);
        assert_eq!(replayed, state("2024-03-04", 1, 2));
        assert_eq!(StreakEngine::replay(Vec::new()), StreakState::new());
    }

    // ── recompute_from_history ────────────────────────────────────────

    #[test]
    fn empty_history_is_zero() {
        let h = StreakEngine::recompute_from_history(Vec::new(), d("2024-01-03"));
        assert_eq!(h, HistoricalStreak::default());
    }

    #[test]
    fn three_consecutive_days_ending_today() {
        let h = StreakEngine::recompute_from_history(
            [d("2024-01-01"), d("2024-01-02"), d("2024-01-03")],
            d("2024-01-03"),
        );
        assert_eq!((h.current_streak, h.longest_streak), (3, 3));
        assert_eq!(h.longest_streak_end, Some(d("2024-01-03")));
    }

    #[test]
    fn gap_splits_runs() {
        let h = StreakEngine::recompute_from_history(
            [d("2024-01-01"), d("2024-01-03")],
            d("2024-01-03"),
        );
        assert_eq!((h.current_streak, h.longest_streak), (1, 1));
    }

    #[test]
    fn current_counts_when_latest_entry_was_yesterday() {
        let h = StreakEngine::recompute_from_history(
            [d("2024-01-01"), d("2024-01-02")],
            d("2024-01-03"),
        );
        assert_eq!(h.current_streak, 2);
    }

    #[test]
    fn current_is_zero_once_two_days_pass() {
        let h = StreakEngine::recompute_from_history(
            [d("2024-01-01"), d("2024-01-02")],
            d("2024-01-04"),
        );
        assert_eq!((h.current_streak, h.longest_streak), (0, 2));
    }

    #[test]
    fn future_entries_do_not_count_as_current() {
        let h = StreakEngine::recompute_from_history([d("2024-01-09")], d("2024-01-03"));
        assert_eq!((h.current_streak, h.longest_streak), (0, 1));
    }

    #[test]
    fn duplicates_and_order_are_ignored() {
        let h = StreakEngine::recompute_from_history(
            [
                d("2024-01-02"),
                d("2024-01-01"),
                d("2024-01-02"),
                d("2024-01-03"),
                d("2024-01-01"),
            ],
            d("2024-01-03"),
        );
        assert_eq!((h.current_streak, h.longest_streak), (3, 3));
    }

    #[test]
    fn longest_run_can_be_in_the_past() {
        let dates = [
            "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-10", "2024-01-11",
        ]
        .map(d);
        let h = StreakEngine::recompute_from_history(dates, d("2024-01-11"));
        assert_eq!((h.current_streak, h.longest_streak), (2, 4));
        assert_eq!(h.longest_streak_end, Some(d("2024-01-04")));
    }

    #[test]
    fn longest_end_prefers_most_recent_of_equal_runs() {
        let dates = ["2024-01-01", "2024-01-02", "2024-01-05", "2024-01-06"].map(d);
        let h = StreakEngine::recompute_from_history(dates, d("2024-02-01"));
        assert_eq!(h.longest_streak, 2);
        assert_eq!(h.longest_streak_end, Some(d("2024-01-06")));
    }

    #[test]
    fn history_at_the_calendar_floor_is_total() {
        let h = StreakEngine::recompute_from_history([NaiveDate::MIN], NaiveDate::MIN);
        assert_eq!((h.current_streak, h.longest_streak), (1, 1));
    }

    #[test]
    fn recompute_does_not_consume_caller_slice() {
        let dates = vec![d("2024-01-01"), d("2024-01-02")];
        let _ = StreakEngine::recompute_from_history(dates.iter().copied(), d("2024-01-02"));
        assert_eq!(dates.len(), 2);
    }

    // ── check_consistency ─────────────────────────────────────────────

    #[test]
    fn in_order_history_is_consistent() {
        let dates = ["2024-03-01", "2024-03-02", "2024-03-04"].map(d);
        let state = StreakEngine::replay(dates);
        let check = StreakEngine::check_consistency(&state, &dates, d("2024-03-04"));
        assert!(check.is_consistent());
    }

    #[test]
    fn stale_state_is_still_consistent() {
        let dates = ["2024-03-01", "2024-03-02"].map(d);
        let state = StreakEngine::replay(dates);
        let check = StreakEngine::check_consistency(&state, &dates, d("2024-03-20"));
        assert!(check.is_consistent());
    }

    #[test]
    fn backdated_entry_is_reported_as_divergence() {
        // Writes on the 1st and 3rd, then backfills the 2nd.
        let written = ["2024-03-01", "2024-03-03", "2024-03-02"].map(d);
        let state = StreakEngine::replay(written);
        assert_eq!(state.current_streak, 1);

        let check = StreakEngine::check_consistency(&state, &written, d("2024-03-03"));
        assert_eq!(
            check,
            StreakCheck::Diverged {
                stored_current: 1,
                stored_longest: 1,
                recomputed_current: 3,
                recomputed_longest: 3,
            }
        );
    }
}
