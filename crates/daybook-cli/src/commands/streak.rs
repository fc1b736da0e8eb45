use clap::Subcommand;
use daybook_core::Database;

use super::resolve_today;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Stored counters next to the recomputed streaks
    Show {
        user: String,
        /// Evaluation date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
    },
    /// Exit non-zero when stored counters disagree with the entry history
    Check {
        user: String,
        #[arg(long)]
        today: Option<String>,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StreakAction::Show { user, today } => {
            let user = db.user(&user)?;
            let report = db.streak_report(user.id, resolve_today(today.as_deref())?)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StreakAction::Check { user, today } => {
            let user = db.user(&user)?;
            let report = db.streak_report(user.id, resolve_today(today.as_deref())?)?;
            println!("{}", serde_json::to_string_pretty(&report.check)?);
            if !report.check.is_consistent() {
                return Err(format!("streak counters for '{}' diverge from history", user.name).into());
            }
        }
    }
    Ok(())
}
