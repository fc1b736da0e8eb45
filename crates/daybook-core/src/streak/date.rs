//! Calendar-date validation at the engine boundary.

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Storage and CLI date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` date.
///
/// # Errors
/// Returns [`ValidationError::InvalidDate`] for anything that is not a real
/// calendar day in that exact format.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    // chrono accepts unpadded fields and signed years; the format here is fixed-width
    let well_formed = trimmed.len() == 10
        && trimmed
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

    if !well_formed {
        return Err(ValidationError::InvalidDate {
            value: value.to_string(),
        });
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}

/// Format a date the way it is stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            parse_date(" 2024-01-05 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
    }

    #[test]
    fn rejects_impossible_days() {
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("2024-04-31").is_err());
    }

    #[test]
    fn rejects_loose_formats() {
        for bad in ["2024-1-5", "20240105", "05/01/2024", "", "+2024-01-05", "2024-01-05T00:00"] {
            assert!(
                matches!(parse_date(bad), Err(ValidationError::InvalidDate { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn format_round_trips_through_parse() {
        let date = NaiveDate::from_ymd_opt(2031, 12, 31).unwrap();
        assert_eq!(parse_date(&format_date(date)).unwrap(), date);
    }
}
