pub mod migrations;
pub mod planner_db;
mod prefs;

pub use planner_db::{PlannerDb, ResetSummary};
pub use prefs::Prefs;

use std::path::PathBuf;

/// Returns `~/.config/bizplanner[-dev]/` based on BIZPLANNER_ENV.
///
/// Set BIZPLANNER_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BIZPLANNER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("bizplanner-dev")
    } else {
        base_dir.join("bizplanner")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
