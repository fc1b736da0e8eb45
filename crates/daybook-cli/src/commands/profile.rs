use clap::Args;
use daybook_core::{Config, Database};

use super::resolve_today;

#[derive(Args)]
pub struct ProfileArgs {
    /// User name
    user: String,
    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    today: Option<String>,
}

pub fn run(args: ProfileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;

    let user = db.user(&args.user)?;
    let today = resolve_today(args.today.as_deref())?;
    let stats = db.profile_stats(user.id, today, &config.streak)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
