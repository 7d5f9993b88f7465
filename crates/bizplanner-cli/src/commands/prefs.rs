//! Preference commands for CLI.

use bizplanner_core::Prefs;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show all preferences
    Show,
    /// Set a preference by key
    Set {
        /// Preference key (e.g. notifications_enabled)
        key: String,
        /// New value
        value: String,
    },
    /// Restore default preferences
    Reset,
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PrefsAction::Show => {
            let prefs = Prefs::load_or_default();
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        PrefsAction::Set { key, value } => {
            let mut prefs = Prefs::load_or_default();
            prefs.set(&key, &value)?;
            prefs.save()?;
            println!("{key} = {}", prefs.get(&key).unwrap_or_default());
        }
        PrefsAction::Reset => {
            let mut prefs = Prefs::load_or_default();
            prefs.reset();
            prefs.save()?;
            println!("Preferences reset");
        }
    }
    Ok(())
}
