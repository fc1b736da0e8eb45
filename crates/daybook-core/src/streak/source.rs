use serde::{Deserialize, Serialize};

/// Which streak figures the profile view trusts.
///
/// `History` recomputes from the entry dates on every read and is immune to
/// backdated entries. `Incremental` shows the persisted counters, aged for
/// the viewing date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakSource {
    #[default]
    History,
    Incremental,
}

impl std::str::FromStr for StreakSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "history" => Ok(Self::History),
            "incremental" => Ok(Self::Incremental),
            other => Err(format!("unknown streak source: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("History".parse::<StreakSource>().unwrap(), StreakSource::History);
        assert_eq!(" incremental".parse::<StreakSource>().unwrap(), StreakSource::Incremental);
        assert!("ledger".parse::<StreakSource>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&StreakSource::Incremental).unwrap(),
            "\"incremental\""
        );
    }
}
