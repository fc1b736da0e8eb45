use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "daybook", version, about = "Daybook journal CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User accounts
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Journal entries
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Streak inspection
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Profile statistics
    Profile(commands::profile::ProfileArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::User { action } => commands::user::run(action),
        Commands::Entry { action } => commands::entry::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Profile(args) => commands::profile::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
