use clap::Subcommand;
use daybook_core::streak::parse_date;
use daybook_core::{Database, NewEntry};
use serde_json::json;

use super::resolve_today;

#[derive(Subcommand)]
pub enum EntryAction {
    /// Write an entry and update the streak
    Add {
        /// User name
        user: String,
        /// Entry text
        content: String,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Entry title
        #[arg(long)]
        title: Option<String>,
    },
    /// List entries, newest first
    List {
        user: String,
        /// Print dates only
        #[arg(long)]
        dates: bool,
    },
    /// Delete the entry for a date
    Delete {
        user: String,
        /// Entry date (YYYY-MM-DD)
        date: String,
    },
}

pub fn run(action: EntryAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        EntryAction::Add {
            user,
            content,
            date,
            title,
        } => {
            let user = db.user(&user)?;
            let date = resolve_today(date.as_deref())?;
            let mut entry = NewEntry::new(date, content);
            if let Some(title) = title {
                entry = entry.with_title(title);
            }
            let (entry, streak) = db.create_entry(user.id, entry)?;
            let out = json!({ "entry": entry, "streak": streak });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        EntryAction::List { user, dates } => {
            let user = db.user(&user)?;
            let entries = db.entries(user.id)?;
            if dates {
                for entry in entries {
                    println!("{}", entry.date);
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }
        EntryAction::Delete { user, date } => {
            let user = db.user(&user)?;
            let date = parse_date(&date)?;
            db.delete_entry(user.id, date)?;
            println!("deleted {date}");
        }
    }
    Ok(())
}
