pub mod config;
pub mod entry;
pub mod profile;
pub mod streak;
pub mod user;

use chrono::{Local, NaiveDate};
use daybook_core::streak::parse_date;

/// Resolve the evaluation date: an explicit `--today`, or the local calendar date.
pub(crate) fn resolve_today(today: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match today {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(Local::now().date_naive()),
    }
}
