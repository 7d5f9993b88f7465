//! Reminder planning for task deadlines and the daily nudge.
//!
//! This module only computes *what* should fire and *when*; delivering a
//! reminder through a platform notification center is the shell's job, behind
//! the [`ReminderScheduler`] seam. Identifiers are stable so a reminder can be
//! cancelled when its task completes or is deleted.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::planner::Task;

/// Identifier of the recurring daily reminder.
pub const DAILY_REMINDER_ID: &str = "daily_reminder";

/// Hour of day (UTC) the daily reminder fires.
pub const DAILY_REMINDER_HOUR: u32 = 9;

/// Lead time before a task deadline.
pub const DEADLINE_LEAD_HOURS: i64 = 1;

/// One planned local notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Utc>,
    pub repeats: bool,
}

/// Stable reminder identifier for a task.
pub fn task_reminder_id(task_id: &str) -> String {
    format!("task_deadline_{task_id}")
}

/// Plan the deadline reminder for a task: one hour before the deadline.
///
/// Returns `None` when the task has no deadline or the fire time has already
/// passed.
pub fn task_deadline_reminder(task: &Task, now: DateTime<Utc>) -> Option<Reminder> {
    let deadline = task.deadline?;
    let fire_at = deadline - Duration::hours(DEADLINE_LEAD_HOURS);
    if fire_at <= now {
        return None;
    }
    Some(Reminder {
        id: task_reminder_id(&task.id),
        title: "Task Deadline Reminder".to_string(),
        body: format!("Don't forget to complete: {}", task.name),
        fire_at,
        repeats: false,
    })
}

/// Plan the recurring daily nudge: the next 09:00 UTC occurrence.
pub fn daily_reminder(now: DateTime<Utc>) -> Reminder {
    let nine = NaiveTime::from_hms_opt(DAILY_REMINDER_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    let today_at_nine = now.date_naive().and_time(nine).and_utc();
    let fire_at = if today_at_nine > now {
        today_at_nine
    } else {
        today_at_nine + Duration::days(1)
    };
    Reminder {
        id: DAILY_REMINDER_ID.to_string(),
        title: "BizPlanner".to_string(),
        body: "Time to check your tasks and make progress on your goals!".to_string(),
        fire_at,
        repeats: true,
    }
}

/// Delivery seam for planned reminders.
///
/// Scheduling a reminder with an id that is already pending replaces it.
pub trait ReminderScheduler {
    fn schedule(&mut self, reminder: Reminder);
    fn cancel(&mut self, id: &str);
}

/// In-memory scheduler used by the CLI and tests.
#[derive(Debug, Default)]
pub struct ReminderBook {
    pending: Vec<Reminder>,
}

impl ReminderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending reminders, soonest first.
    pub fn pending(&self) -> &[Reminder] {
        &self.pending
    }
}

impl ReminderScheduler for ReminderBook {
    fn schedule(&mut self, reminder: Reminder) {
        self.pending.retain(|r| r.id != reminder.id);
        self.pending.push(reminder);
        self.pending.sort_by_key(|r| r.fire_at);
    }

    fn cancel(&mut self, id: &str) {
        self.pending.retain(|r| r.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_deadline(deadline: Option<DateTime<Utc>>) -> Task {
        Task {
            id: "t-1".to_string(),
            name: "Write report".to_string(),
            deadline,
            estimated_hours: 1,
            notes: None,
            completed: false,
            completed_at: None,
            project_id: "p-1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn deadline_reminder_fires_one_hour_early() {
        let now = Utc::now();
        let deadline = now + Duration::hours(5);
        let task = task_with_deadline(Some(deadline));

        let reminder = task_deadline_reminder(&task, now).unwrap();
        assert_eq!(reminder.id, "task_deadline_t-1");
        assert_eq!(reminder.fire_at, deadline - Duration::hours(1));
        assert!(reminder.body.contains("Write report"));
        assert!(!reminder.repeats);
    }

    #[test]
    fn no_reminder_without_a_deadline_or_in_the_past() {
        let now = Utc::now();
        assert!(task_deadline_reminder(&task_with_deadline(None), now).is_none());

        // Deadline in 30 minutes: the one-hour lead is already behind us.
        let soon = task_with_deadline(Some(now + Duration::minutes(30)));
        assert!(task_deadline_reminder(&soon, now).is_none());
    }

    #[test]
    fn daily_reminder_targets_the_next_nine_oclock() {
        let now = Utc::now();
        let reminder = daily_reminder(now);
        assert_eq!(reminder.id, DAILY_REMINDER_ID);
        assert!(reminder.repeats);
        assert!(reminder.fire_at > now);
        assert!(reminder.fire_at - now <= Duration::days(1));
        assert_eq!(reminder.fire_at.time().format("%H:%M").to_string(), "09:00");
    }

    #[test]
    fn book_replaces_by_id_and_cancels() {
        let now = Utc::now();
        let mut book = ReminderBook::new();

        let task = task_with_deadline(Some(now + Duration::hours(4)));
        book.schedule(task_deadline_reminder(&task, now).unwrap());
        book.schedule(daily_reminder(now));
        assert_eq!(book.pending().len(), 2);

        // Rescheduling the same task replaces, not duplicates.
        let task = task_with_deadline(Some(now + Duration::hours(8)));
        book.schedule(task_deadline_reminder(&task, now).unwrap());
        assert_eq!(book.pending().len(), 2);

        book.cancel(&task_reminder_id("t-1"));
        assert_eq!(book.pending().len(), 1);
        assert_eq!(book.pending()[0].id, DAILY_REMINDER_ID);

        book.cancel("not_there");
        assert_eq!(book.pending().len(), 1);
    }

    #[test]
    fn pending_is_sorted_by_fire_time() {
        let now = Utc::now();
        let mut book = ReminderBook::new();
        let far = task_with_deadline(Some(now + Duration::hours(40)));
        let mut far = task_deadline_reminder(&far, now).unwrap();
        far.id = "task_deadline_far".to_string();
        book.schedule(far);
        book.schedule(daily_reminder(now));

        let times: Vec<_> = book.pending().iter().map(|r| r.fire_at).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }
}
