//! Statistics commands for CLI.

use bizplanner_core::stats::{self, COIN_HISTORY_DAYS, TASK_HISTORY_DAYS};
use bizplanner_core::storage::PlannerDb;
use bizplanner_core::Snapshot;
use chrono::Utc;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Full stats snapshot
    Summary,
    /// Tasks completed per day, oldest first
    Tasks {
        /// Lookback window in days
        #[arg(long, default_value_t = TASK_HISTORY_DAYS)]
        days: usize,
    },
    /// Approximate daily coin balances, oldest first
    Coins {
        /// Lookback window in days
        #[arg(long, default_value_t = COIN_HISTORY_DAYS)]
        days: usize,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    let now = Utc::now();

    match action {
        StatsAction::Summary => {
            let snapshot = Snapshot::collect(&db, now)?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            println!(
                "Average tasks/day: {:.2}, coins from tasks: {}",
                snapshot.average_tasks_per_day(),
                snapshot.coins_from_tasks()
            );
        }
        StatsAction::Tasks { days } => {
            let counts = stats::tasks_completed_per_day(&db, now, days)?;
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        StatsAction::Coins { days } => {
            let history = stats::coin_history(&db, now, days)?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
    }
    Ok(())
}
