//! Mini-game commands: headless plays and personal bests.

use std::time::{SystemTime, UNIX_EPOCH};

use bizplanner_core::game;
use bizplanner_core::storage::PlannerDb;
use bizplanner_core::{Ledger, Prefs};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum GameAction {
    /// Play one simulated session
    Play {
        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
        /// Coins staked on this play
        #[arg(long, default_value = "0")]
        stake: i64,
    },
    /// Show personal bests
    Best,
}

pub fn run(action: GameAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        GameAction::Play { seed, stake } => {
            let db = PlannerDb::open()?;
            let mut prefs = Prefs::load_or_default();

            let seed = seed.unwrap_or_else(|| {
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.subsec_nanos().into())
                    .unwrap_or(0)
            });
            let outcome = game::simulate(seed);
            let coins = game::coins_for_score(outcome.score, prefs.best_game_score);

            let mut ledger = Ledger::new(&db);
            let session = ledger
                .record_game_session(stake, i64::from(coins))?
                .ok_or(format!("Not enough coins to stake {stake}"))?;

            if outcome.score > prefs.best_game_score {
                prefs.best_game_score = outcome.score;
            }
            if let Some(reaction_ms) = outcome.best_reaction_ms {
                if reaction_ms < prefs.best_reaction_ms {
                    prefs.best_reaction_ms = reaction_ms;
                }
            }
            prefs.save()?;

            println!("Session recorded: {}", session.id);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            println!("Coins earned: {coins}, balance: {}", ledger.balance()?);
        }
        GameAction::Best => {
            let prefs = Prefs::load_or_default();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "best_game_score": prefs.best_game_score,
                    "best_reaction_ms": prefs.best_reaction_ms,
                }))?
            );
        }
    }
    Ok(())
}
