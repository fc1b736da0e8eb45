use clap::Subcommand;
use daybook_core::Database;

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user (with an empty streak)
    Add {
        /// Unique user name
        name: String,
    },
    /// Show a user
    Show {
        name: String,
    },
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        UserAction::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err("user name must not be empty".into());
            }
            let user = db.create_user(name)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        UserAction::Show { name } => {
            let user = db.user(&name)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
    }
    Ok(())
}
