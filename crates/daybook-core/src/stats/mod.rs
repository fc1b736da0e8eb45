//! Statistics module for Daybook
//!
//! Read-side figures shown on a user's profile page. Everything here is
//! derived from entry dates on demand and never persisted.

mod profile;

pub use profile::{ProfileStats, DEFAULT_STREAK_TARGET_DAYS};
