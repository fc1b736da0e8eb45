//! Profile page statistics.
//!
//! Entry counts plus the streak figures, and how far the current streak is
//! towards a target length (30 days unless configured otherwise).

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::streak::{StreakEngine, StreakSource, StreakState};

/// Streak length that counts as 100% on the profile progress bar.
pub const DEFAULT_STREAK_TARGET_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfileStats {
    /// Days with an entry, all time
    pub entry_count: u64,
    pub entries_this_month: u64,
    pub entries_today: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Last day of the most recent longest run, when known
    pub longest_streak_date: Option<NaiveDate>,
    /// Progress of `current_streak` towards the target, capped at 100
    pub streak_percentage: f64,
    pub source: StreakSource,
}

impl ProfileStats {
    /// Compute profile statistics from a user's entry dates as of `today`.
    ///
    /// Streaks come from [`StreakEngine::recompute_from_history`].
    pub fn compute(dates: &[NaiveDate], today: NaiveDate, target_days: u32) -> Self {
        let days: BTreeSet<NaiveDate> = dates.iter().copied().collect();
        let history = StreakEngine::recompute_from_history(days.iter().copied(), today);

        let entries_this_month = days
            .iter()
            .filter(|d| d.year() == today.year() && d.month() == today.month())
            .count() as u64;

        Self {
            entry_count: days.len() as u64,
            entries_this_month,
            entries_today: u64::from(days.contains(&today)),
            current_streak: history.current_streak,
            longest_streak: history.longest_streak,
            longest_streak_date: history.longest_streak_end,
            streak_percentage: streak_percentage(history.current_streak, target_days),
            source: StreakSource::History,
        }
    }

    /// Like [`compute`](Self::compute), but the streak figures follow `source`.
    ///
    /// With [`StreakSource::Incremental`] the stored counters are shown,
    /// aged for `today`; the longest-streak date is only kept when both
    /// sources agree on the longest length.
    pub fn compute_with_source(
        dates: &[NaiveDate],
        state: &StreakState,
        today: NaiveDate,
        target_days: u32,
        source: StreakSource,
    ) -> Self {
        let mut stats = Self::compute(dates, today, target_days);
        if source == StreakSource::Incremental {
            if stats.longest_streak != state.longest_streak {
                stats.longest_streak_date = None;
            }
            stats.current_streak = state.displayed_current(today);
            stats.longest_streak = state.longest_streak;
            stats.streak_percentage = streak_percentage(stats.current_streak, target_days);
            stats.source = StreakSource::Incremental;
        }
        stats
    }
}

fn streak_percentage(current: u32, target_days: u32) -> f64 {
    if target_days == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    (f64::from(current) / f64::from(target_days) * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_profile() {
        let stats = ProfileStats::compute(&[], d("2024-06-15"), DEFAULT_STREAK_TARGET_DAYS);
        assert_eq!(stats, ProfileStats::default());
    }

    #[test]
    fn counts_month_and_today() {
        let dates = ["2024-05-31", "2024-06-01", "2024-06-14", "2024-06-15", "2023-06-15"].map(d);
        let stats = ProfileStats::compute(&dates, d("2024-06-15"), DEFAULT_STREAK_TARGET_DAYS);
        assert_eq!(stats.entry_count, 5);
        assert_eq!(stats.entries_this_month, 3);
        assert_eq!(stats.entries_today, 1);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.longest_streak_date, Some(d("2024-06-15")));
    }

    #[test]
    fn duplicate_dates_count_once() {
        let dates = ["2024-06-15", "2024-06-15"].map(d);
        let stats = ProfileStats::compute(&dates, d("2024-06-15"), DEFAULT_STREAK_TARGET_DAYS);
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.entries_today, 1);
    }

    #[test]
    fn percentage_is_relative_to_target_and_capped() {
        assert!((streak_percentage(3, 30) - 10.0).abs() < f64::EPSILON);
        assert!((streak_percentage(15, 30) - 50.0).abs() < f64::EPSILON);
        assert_eq!(streak_percentage(45, 30), 100.0);
        assert_eq!(streak_percentage(0, 30), 0.0);
        assert_eq!(streak_percentage(1, 0), 100.0);
        assert_eq!(streak_percentage(0, 0), 0.0);
    }

    #[test]
    fn incremental_source_uses_aged_stored_counters() {
        // Backfilled 2024-06-13 after writing 06-12 and 06-14.
        let dates = ["2024-06-12", "2024-06-14", "2024-06-13"].map(d);
        let state = StreakEngine::replay(dates);
        let today = d("2024-06-14");

        let history = ProfileStats::compute(&dates, today, 10);
        assert_eq!((history.current_streak, history.longest_streak), (3, 3));
        assert_eq!(history.source, StreakSource::History);

        let stored = ProfileStats::compute_with_source(
            &dates,
            &state,
            today,
            10,
            StreakSource::Incremental,
        );
        assert_eq!((stored.current_streak, stored.longest_streak), (1, 1));
        assert_eq!(stored.longest_streak_date, None);
        assert!((stored.streak_percentage - 10.0).abs() < f64::EPSILON);
        assert_eq!(stored.entry_count, 3);
    }

    #[test]
    fn history_source_ignores_stored_state() {
        let dates = ["2024-06-14"].map(d);
        let bogus = StreakState {
            last_date: Some(d("2024-06-14")),
            current_streak: 9,
            longest_streak: 9,
        };
        let stats = ProfileStats::compute_with_source(
            &dates,
            &bogus,
            d("2024-06-14"),
            30,
            StreakSource::History,
        );
        assert_eq!((stats.current_streak, stats.longest_streak), (1, 1));
    }
}
