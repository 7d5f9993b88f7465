//! Statistics for the planner.
//!
//! Provides the aggregate snapshot backing the stats surface and the
//! day-bucketed history series (task completions, coin balance).

mod history;

pub use history::{coin_history, tasks_completed_per_day, COIN_HISTORY_DAYS, TASK_HISTORY_DAYS};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::TASK_REWARD_COINS;
use crate::storage::PlannerDb;

/// Aggregate statistics over the whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub total_projects: u32,
    pub completed_tasks: u32,
    pub coin_balance: i64,
    pub streak_count: u32,
    /// Tasks completed per day over the last week, oldest first.
    pub tasks_per_day: Vec<u32>,
    /// Approximate end-of-day balances over the last two weeks, oldest first.
    pub coin_history: Vec<i64>,
}

impl Snapshot {
    /// Collect the full snapshot at `now`.
    ///
    /// # Errors
    /// Returns an error if any of the underlying queries fail. A store
    /// without a profile yields zero balance and streak.
    pub fn collect(db: &PlannerDb, now: DateTime<Utc>) -> Result<Self, rusqlite::Error> {
        let profile = db.profile()?;
        let (coin_balance, streak_count) = profile
            .map(|p| (p.coin_balance, p.streak_count))
            .unwrap_or((0, 0));

        Ok(Self {
            total_projects: db.project_count()?,
            completed_tasks: db.completed_task_count()?,
            coin_balance,
            streak_count,
            tasks_per_day: tasks_completed_per_day(db, now, TASK_HISTORY_DAYS)?,
            coin_history: coin_history(db, now, COIN_HISTORY_DAYS)?,
        })
    }

    /// Mean completed tasks per day over the tracked window.
    pub fn average_tasks_per_day(&self) -> f64 {
        if self.tasks_per_day.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.tasks_per_day.iter().sum();
        f64::from(sum) / self.tasks_per_day.len() as f64
    }

    /// Lifetime coins earned from task completions.
    pub fn coins_from_tasks(&self) -> i64 {
        i64::from(self.completed_tasks) * TASK_REWARD_COINS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::planner::{Project, Task};
    use uuid::Uuid;

    fn seed(db: &PlannerDb) -> String {
        let profile = db.create_profile("Igor", None, None).unwrap();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: "P".to_string(),
            deadline: None,
            budget: 0.0,
            notes: None,
            tasks: Vec::new(),
            profile_id: profile.id,
            created_at: Utc::now(),
        };
        db.create_project(&project).unwrap();
        project.id
    }

    #[test]
    fn snapshot_tracks_totals() {
        let db = PlannerDb::open_memory().unwrap();
        let project_id = seed(&db);

        for name in ["a", "b"] {
            let task = Task {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                deadline: None,
                estimated_hours: 0,
                notes: None,
                completed: false,
                completed_at: None,
                project_id: project_id.clone(),
                created_at: Utc::now(),
            };
            db.create_task(&task).unwrap();
        }

        let tasks = db.tasks_for_project(&project_id).unwrap();
        let mut ledger = Ledger::new(&db);
        ledger.toggle_task_completion(&tasks[0].id).unwrap();

        let now = Utc::now();
        let snapshot = Snapshot::collect(&db, now).unwrap();
        assert_eq!(snapshot.total_projects, 1);
        assert_eq!(snapshot.completed_tasks, 1);
        assert_eq!(snapshot.streak_count, 1);
        assert_eq!(snapshot.coins_from_tasks(), TASK_REWARD_COINS);
        assert_eq!(snapshot.tasks_per_day.len(), TASK_HISTORY_DAYS);
        assert_eq!(snapshot.coin_history.len(), COIN_HISTORY_DAYS);
        assert_eq!(snapshot.tasks_per_day.iter().sum::<u32>(), 1);

        let avg = snapshot.average_tasks_per_day();
        assert!((avg - 1.0 / TASK_HISTORY_DAYS as f64).abs() < 1e-9);
    }

    #[test]
    fn snapshot_of_an_empty_store_is_zeroed() {
        let db = PlannerDb::open_memory().unwrap();
        let snapshot = Snapshot::collect(&db, Utc::now()).unwrap();
        assert_eq!(snapshot.total_projects, 0);
        assert_eq!(snapshot.completed_tasks, 0);
        assert_eq!(snapshot.coin_balance, 0);
        assert_eq!(snapshot.average_tasks_per_day(), 0.0);
    }
}
