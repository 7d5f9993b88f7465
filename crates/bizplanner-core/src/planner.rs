//! Entity types for the planner: profile, projects, tasks, game sessions.
//!
//! Tasks are stored unordered; [`sort_tasks`] applies the read-time ordering
//! used everywhere a project's task list is shown.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The single user profile. Exactly one row exists per installation;
/// creation through the store enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub goal: Option<String>,
    /// Raw avatar image bytes, if one was picked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Vec<u8>>,
    pub coin_balance: i64,
    pub streak_count: u32,
    pub streak_last_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A project that groups related tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub deadline: Option<DateTime<Utc>>,
    pub budget: f64,
    pub notes: Option<String>,
    /// Loaded separately; empty unless fetched with tasks.
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub profile_id: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Fraction of this project's tasks that are completed, 0.0 when empty.
    pub fn progress(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        completed as f64 / self.tasks.len() as f64
    }
}

/// A single task belonging to a project.
///
/// Invariant: `completed_at` is `Some` if and only if `completed` is true.
/// The ledger is the only writer that flips the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub deadline: Option<DateTime<Utc>>,
    pub estimated_hours: i32,
    pub notes: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub project_id: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Deadline is within the next three days (and not already past).
    pub fn is_deadline_approaching(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => {
                let days = (deadline - now).num_days();
                (0..=3).contains(&days) && deadline >= now
            }
            None => false,
        }
    }

    /// Deadline has passed.
    pub fn is_deadline_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(self.deadline, Some(deadline) if deadline < now)
    }
}

/// An immutable audit record of one mini-game play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: String,
    pub coins_spent: i64,
    pub coins_earned: i64,
    pub profile_id: String,
    pub created_at: DateTime<Utc>,
}

impl GameSession {
    /// Net coin movement of this play (earned minus spent).
    pub fn net_coins(&self) -> i64 {
        self.coins_earned - self.coins_spent
    }
}

/// Read-time task ordering: incomplete before complete, then nearest
/// deadline first with deadline-bearing tasks before deadline-free ones,
/// then newest-first.
pub fn task_order(a: &Task, b: &Task) -> Ordering {
    match (a.completed, b.completed) {
        (false, true) => return Ordering::Less,
        (true, false) => return Ordering::Greater,
        _ => {}
    }
    match (a.deadline, b.deadline) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| b.created_at.cmp(&a.created_at)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}

/// Sort a task list in place with [`task_order`].
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(task_order);
}

/// Start of the UTC calendar day containing `t`.
pub fn day_start(t: DateTime<Utc>) -> DateTime<Utc> {
    t.date_naive().and_time(chrono::NaiveTime::MIN).and_utc()
}

/// End of the UTC calendar day containing `t` (start of the next day).
pub fn day_end(t: DateTime<Utc>) -> DateTime<Utc> {
    day_start(t) + Duration::days(1)
}
