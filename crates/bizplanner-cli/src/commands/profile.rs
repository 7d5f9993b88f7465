//! Profile commands: onboarding and profile edits.

use std::path::PathBuf;

use bizplanner_core::notify;
use bizplanner_core::storage::PlannerDb;
use bizplanner_core::Prefs;
use chrono::Utc;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create the profile (runs onboarding)
    Create {
        /// Display name
        name: String,
        /// Personal goal text
        #[arg(long)]
        goal: Option<String>,
        /// Path to an avatar image
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
    /// Show the profile
    Show,
    /// Update the profile
    Update {
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New goal text
        #[arg(long)]
        goal: Option<String>,
        /// Path to a new avatar image
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        ProfileAction::Create { name, goal, avatar } => {
            let avatar = avatar.map(std::fs::read).transpose()?;
            let mut profile = db.create_profile(&name, goal.as_deref(), avatar)?;

            let mut prefs = Prefs::load_or_default();
            prefs.has_onboarded = true;
            prefs.save()?;

            println!("Profile created: {}", profile.id);
            if let Some(bytes) = profile.avatar.take() {
                println!("Avatar: {} bytes", bytes.len());
            }
            println!("{}", serde_json::to_string_pretty(&profile)?);

            if prefs.notifications_enabled {
                let reminder = notify::daily_reminder(Utc::now());
                println!("Daily reminder planned:");
                println!("{}", serde_json::to_string_pretty(&reminder)?);
            }
        }
        ProfileAction::Show => {
            let mut profile = db.require_profile()?;
            if let Some(bytes) = profile.avatar.take() {
                println!("Avatar: {} bytes", bytes.len());
            }
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Update { name, goal, avatar } => {
            let mut profile = db.require_profile()?;
            if let Some(n) = name {
                profile.name = n;
            }
            if let Some(g) = goal {
                profile.goal = Some(g);
            }
            if let Some(path) = avatar {
                profile.avatar = Some(std::fs::read(path)?);
            }
            db.update_profile(&profile)?;

            println!("Profile updated:");
            profile.avatar = None;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }
    Ok(())
}
