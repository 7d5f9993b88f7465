//! End-to-end integration test: onboarding through data reset.

use bizplanner_core::game;
use bizplanner_core::notify::{self, ReminderScheduler};
use bizplanner_core::planner::{Project, Task};
use bizplanner_core::stats::{COIN_HISTORY_DAYS, TASK_HISTORY_DAYS};
use bizplanner_core::{
    CoreError, Ledger, PlannerDb, Prefs, ReminderBook, Snapshot, TASK_REWARD_COINS,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

fn new_project(db: &PlannerDb, name: &str) -> Project {
    let profile = db.require_profile().unwrap();
    let project = Project {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        deadline: None,
        budget: 0.0,
        notes: None,
        tasks: Vec::new(),
        profile_id: profile.id,
        created_at: Utc::now(),
    };
    db.create_project(&project).unwrap();
    project
}

fn new_task(db: &PlannerDb, project_id: &str, name: &str) -> Task {
    let task = Task {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        deadline: None,
        estimated_hours: 1,
        notes: None,
        completed: false,
        completed_at: None,
        project_id: project_id.to_string(),
        created_at: Utc::now(),
    };
    db.create_task(&task).unwrap();
    task
}

#[test]
fn full_planner_lifecycle() {
    let db = PlannerDb::open_memory().unwrap();

    // Onboarding: one profile, once.
    let profile = db.create_profile("Igor", Some("Grow the shop"), None).unwrap();
    assert_eq!(profile.coin_balance, 100);
    assert!(matches!(
        db.create_profile("Twin", None, None),
        Err(CoreError::ProfileExists)
    ));

    // Plan some work.
    let launch = new_project(&db, "Launch");
    let marketing = new_project(&db, "Marketing");
    let write_copy = new_task(&db, &marketing.id, "Write copy");
    let ship = new_task(&db, &launch.id, "Ship build");

    // Complete both tasks; each pays the fixed reward, the streak counts the
    // day once.
    let mut ledger = Ledger::new(&db);
    ledger.toggle_task_completion(&write_copy.id).unwrap();
    ledger.toggle_task_completion(&ship.id).unwrap();
    assert_eq!(ledger.balance().unwrap(), 100 + 2 * TASK_REWARD_COINS);
    assert_eq!(ledger.streak().unwrap(), 1);
    assert!(!ledger.take_events().is_empty());

    // Play the mini-game on the winnings.
    let outcome = game::simulate(99);
    let coins = game::coins_for_score(outcome.score, 0);
    let session = ledger
        .record_game_session(10, i64::from(coins))
        .unwrap()
        .expect("stake was covered");
    assert_eq!(session.coins_spent, 10);

    // The stats surface sees everything.
    let snapshot = Snapshot::collect(&db, Utc::now()).unwrap();
    assert_eq!(snapshot.total_projects, 2);
    assert_eq!(snapshot.completed_tasks, 2);
    assert_eq!(snapshot.coin_balance, ledger.balance().unwrap());
    assert_eq!(snapshot.tasks_per_day.len(), TASK_HISTORY_DAYS);
    assert_eq!(snapshot.coin_history.len(), COIN_HISTORY_DAYS);
    assert_eq!(*snapshot.coin_history.last().unwrap(), snapshot.coin_balance);

    // Full reset leaves nothing behind.
    let summary = db.reset_all().unwrap();
    assert_eq!(summary.deleted_projects, 2);
    assert_eq!(summary.deleted_tasks, 2);
    assert!(db.profile().unwrap().is_none());
    assert!(db.list_projects().unwrap().is_empty());
    assert!(db.list_tasks().unwrap().is_empty());
    assert!(db.list_game_sessions().unwrap().is_empty());
}

#[test]
fn reminder_wiring_follows_the_task_lifecycle() {
    let db = PlannerDb::open_memory().unwrap();
    db.create_profile("Igor", None, None).unwrap();
    let project = new_project(&db, "P");

    let now = Utc::now();
    let mut task = new_task(&db, &project.id, "With deadline");
    task.deadline = Some(now + Duration::hours(6));
    db.update_task(&task).unwrap();

    let mut book = ReminderBook::new();
    let reminder = notify::task_deadline_reminder(&task, now).unwrap();
    book.schedule(reminder);
    book.schedule(notify::daily_reminder(now));
    assert_eq!(book.pending().len(), 2);

    // Completing the task cancels its deadline reminder.
    let mut ledger = Ledger::new(&db);
    ledger.toggle_task_completion(&task.id).unwrap();
    book.cancel(&notify::task_reminder_id(&task.id));
    assert_eq!(book.pending().len(), 1);
    assert_eq!(book.pending()[0].id, notify::DAILY_REMINDER_ID);
}

#[test]
fn prefs_survive_a_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.toml");

    let mut prefs = Prefs::load_from(&path).unwrap();
    assert!(!prefs.has_onboarded);

    prefs.has_onboarded = true;
    prefs.notifications_enabled = true;
    prefs.best_game_score = 41;
    prefs.save_to(&path).unwrap();

    let reloaded = Prefs::load_from(&path).unwrap();
    assert!(reloaded.has_onboarded);
    assert!(reloaded.notifications_enabled);
    assert_eq!(reloaded.best_game_score, 41);
}
