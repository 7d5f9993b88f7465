//! Daily streak continuity rules.
//!
//! The streak is a single counter keyed by the UTC calendar day of the last
//! qualifying completion. Completing a task on consecutive days extends it;
//! a same-day repeat is a no-op; a gap of two or more days resets it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The streak counter plus the day it was last advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub count: u32,
    pub last_at: Option<DateTime<Utc>>,
}

impl StreakState {
    pub fn new(count: u32, last_at: Option<DateTime<Utc>>) -> Self {
        Self { count, last_at }
    }
}

/// What a single evaluation did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// First qualifying completion ever.
    Started,
    /// Already counted today; nothing changed.
    SameDay,
    /// Yesterday was counted; the streak grew by one.
    Extended,
    /// A gap of two or more days; back to one.
    Reset,
}

/// Evaluate the streak at `now`.
///
/// `last_at` is set to `now` on every path except the same-day no-op.
pub fn advance(state: StreakState, now: DateTime<Utc>) -> (StreakState, Outcome) {
    let today = now.date_naive();
    match state.last_at {
        None => (StreakState::new(1, Some(now)), Outcome::Started),
        Some(last) => {
            let last_day = last.date_naive();
            if last_day == today {
                (state, Outcome::SameDay)
            } else if last_day.succ_opt() == Some(today) {
                (StreakState::new(state.count + 1, Some(now)), Outcome::Extended)
            } else {
                (StreakState::new(1, Some(now)), Outcome::Reset)
            }
        }
    }
}
