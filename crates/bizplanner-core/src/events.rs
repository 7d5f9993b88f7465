use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::streak::Outcome;

/// Every ledger mutation produces an Event.
/// Consumers (the CLI, a GUI shell) poll for events instead of observing
/// store fields directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CoinsAwarded {
        amount: i64,
        balance: i64,
        at: DateTime<Utc>,
    },
    CoinsSpent {
        amount: i64,
        balance: i64,
        at: DateTime<Utc>,
    },
    /// A spend was rejected because the balance could not cover it.
    SpendRejected {
        amount: i64,
        balance: i64,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: String,
        reward: i64,
        at: DateTime<Utc>,
    },
    /// A completed task was re-opened (no coin clawback).
    TaskReopened {
        task_id: String,
        at: DateTime<Utc>,
    },
    /// The streak counter moved (same-day re-entries emit nothing).
    StreakChanged {
        count: u32,
        outcome: Outcome,
        at: DateTime<Utc>,
    },
    GameRecorded {
        session_id: String,
        coins_spent: i64,
        coins_earned: i64,
        at: DateTime<Utc>,
    },
}
