//! # BizPlanner Core Library
//!
//! This library provides the core business logic for the BizPlanner gamified
//! project planner. It implements a CLI-first philosophy where all operations
//! are available via a standalone CLI binary, with any GUI shell being a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Entity store**: SQLite-based storage for the profile, projects, tasks,
//!   and game sessions, plus a TOML-based preference store
//! - **Ledger**: coin balance bookkeeping and the daily streak rules; every
//!   mutation emits an [`Event`] that consumers drain with
//!   [`Ledger::take_events`]
//! - **Stats**: day-bucketed task-completion and coin-balance history
//! - **Notify**: deadline/daily reminder planning (delivery is the shell's job)
//! - **Game**: scoring rules and a deterministic headless simulation of the
//!   reaction mini-game
//!
//! ## Key Components
//!
//! - [`PlannerDb`]: entity persistence
//! - [`Ledger`]: coin and streak bookkeeping
//! - [`Prefs`]: onboarding/notification flags and game bests
//! - [`Snapshot`]: the stats surface

pub mod error;
pub mod events;
pub mod game;
pub mod ledger;
pub mod notify;
pub mod planner;
pub mod stats;
pub mod storage;

pub use error::{CoreError, DatabaseError, PrefsError};
pub use events::Event;
pub use ledger::{Ledger, TASK_REWARD_COINS};
pub use notify::{Reminder, ReminderBook, ReminderScheduler};
pub use planner::{GameSession, Profile, Project, Task};
pub use stats::Snapshot;
pub use storage::{PlannerDb, Prefs, ResetSummary};
