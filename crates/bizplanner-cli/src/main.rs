use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "bizplanner-cli", version, about = "BizPlanner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Project management
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Reaction mini-game
    Game {
        #[command(subcommand)]
        action: commands::game::GameAction,
    },
    /// Preference management
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Delete all data and reset preferences
    Reset {
        /// Confirm the irreversible wipe
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Project { action } => commands::project::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Game { action } => commands::game::run(action),
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::Reset { yes } => commands::reset::run(yes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
