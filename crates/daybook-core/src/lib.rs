//! # Daybook Core Library
//!
//! This library provides the core logic for Daybook, a personal journal
//! where each user writes at most one entry per day. The CLI is a thin layer
//! over the same library.
//!
//! ## Architecture
//!
//! - **Streaks**: pure consecutive-day logic. Stored counters are advanced
//!   incrementally on every new entry, and display figures are recomputed
//!   from the full entry history
//! - **Stats**: profile page figures derived from entry dates
//! - **Storage**: SQLite entry/streak persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`StreakEngine`]: streak update and recomputation
//! - [`StreakState`]: per-user persisted counters
//! - [`Database`]: users, entries and streak persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod stats;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use stats::ProfileStats;
pub use storage::{Config, Database, Entry, NewEntry, User, UserId};
pub use streak::{HistoricalStreak, StreakCheck, StreakEngine, StreakSource, StreakState};
