//! SQLite-based storage for the profile, projects, tasks, and game sessions.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::data_dir;
use super::migrations;
use crate::error::CoreError;
use crate::planner::{self, GameSession, Profile, Project, Task};

/// Coins granted to a freshly created profile.
pub const STARTING_COINS: i64 = 100;

// === Helper Functions ===

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse an optional RFC3339 column; unparseable values become None
fn parse_optional_datetime(dt_str: Option<String>) -> Option<DateTime<Utc>> {
    dt_str
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Build a Profile from a database row
fn row_to_profile(row: &rusqlite::Row) -> Result<Profile, rusqlite::Error> {
    let created_at_str: String = row.get(4)?;
    let streak_last_at: Option<String> = row.get(7)?;
    Ok(Profile {
        id: row.get(0)?,
        name: row.get(1)?,
        goal: row.get(2)?,
        avatar: row.get(3)?,
        created_at: parse_datetime_fallback(&created_at_str),
        coin_balance: row.get(5)?,
        streak_count: row.get(6)?,
        streak_last_at: parse_optional_datetime(streak_last_at),
    })
}

/// Build a Project from a database row (tasks loaded separately)
fn row_to_project(row: &rusqlite::Row) -> Result<Project, rusqlite::Error> {
    let deadline: Option<String> = row.get(2)?;
    let created_at_str: String = row.get(6)?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        deadline: parse_optional_datetime(deadline),
        budget: row.get(3)?,
        notes: row.get(4)?,
        tasks: Vec::new(),
        profile_id: row.get(5)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// Build a Task from a database row
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let deadline: Option<String> = row.get(2)?;
    let created_at_str: String = row.get(7)?;
    let completed_at: Option<String> = row.get(8)?;
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        deadline: parse_optional_datetime(deadline),
        estimated_hours: row.get(3)?,
        notes: row.get(4)?,
        completed: row.get(5)?,
        project_id: row.get(6)?,
        created_at: parse_datetime_fallback(&created_at_str),
        completed_at: parse_optional_datetime(completed_at),
    })
}

/// Build a GameSession from a database row
fn row_to_session(row: &rusqlite::Row) -> Result<GameSession, rusqlite::Error> {
    let created_at_str: String = row.get(4)?;
    Ok(GameSession {
        id: row.get(0)?,
        coins_spent: row.get(1)?,
        coins_earned: row.get(2)?,
        profile_id: row.get(3)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

const TASK_COLUMNS: &str = "id, name, deadline, estimated_hours, notes, completed, project_id, created_at, completed_at";
const PROJECT_COLUMNS: &str = "id, name, deadline, budget, notes, profile_id, created_at";
const PROFILE_COLUMNS: &str =
    "id, name, goal, avatar, created_at, coin_balance, streak_count, streak_last_at";

/// SQLite database for planner storage.
///
/// Stores the profile, projects, tasks, and game sessions.
pub struct PlannerDb {
    conn: Connection,
}

/// Per-entity row counts removed by [`PlannerDb::reset_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ResetSummary {
    pub deleted_profiles: usize,
    pub deleted_projects: usize,
    pub deleted_tasks: usize,
    pub deleted_game_sessions: usize,
}

impl PlannerDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/bizplanner/bizplanner.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("bizplanner.db");
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and ephemeral sessions).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        // Create base tables (v1 schema) first
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS profiles (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                goal       TEXT,
                avatar     BLOB,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS projects (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                deadline   TEXT,
                budget     REAL NOT NULL DEFAULT 0,
                notes      TEXT,
                profile_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                deadline        TEXT,
                estimated_hours INTEGER NOT NULL DEFAULT 0,
                notes           TEXT,
                completed       INTEGER NOT NULL DEFAULT 0,
                project_id      TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS game_sessions (
                id           TEXT PRIMARY KEY,
                coins_spent  INTEGER NOT NULL,
                coins_earned INTEGER NOT NULL,
                profile_id   TEXT NOT NULL,
                created_at   TEXT NOT NULL
            );",
        )?;

        // Run incremental migrations (v1 -> v2 -> v3)
        migrations::migrate(&self.conn)?;

        // Create indexes for common query patterns (idempotent, runs after
        // migrations add the columns)
        self.conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
             CREATE INDEX IF NOT EXISTS idx_tasks_completed_at ON tasks(completed_at);
             CREATE INDEX IF NOT EXISTS idx_game_sessions_created_at ON game_sessions(created_at);",
        )?;

        Ok(())
    }

    // === Profile ===

    /// Create the single profile with its starting coin grant.
    ///
    /// # Errors
    /// Returns [`CoreError::ProfileExists`] if a profile is already present.
    pub fn create_profile(
        &self,
        name: &str,
        goal: Option<&str>,
        avatar: Option<Vec<u8>>,
    ) -> Result<Profile, CoreError> {
        if self.profile()?.is_some() {
            return Err(CoreError::ProfileExists);
        }

        let profile = Profile {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            goal: goal.map(str::to_string),
            avatar,
            coin_balance: STARTING_COINS,
            streak_count: 0,
            streak_last_at: None,
            created_at: Utc::now(),
        };

        self.conn.execute(
            "INSERT INTO profiles (id, name, goal, avatar, created_at, coin_balance, streak_count, streak_last_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                profile.id,
                profile.name,
                profile.goal,
                profile.avatar,
                profile.created_at.to_rfc3339(),
                profile.coin_balance,
                profile.streak_count,
                profile.streak_last_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(profile)
    }

    /// Get the profile, if onboarding has created one.
    pub fn profile(&self) -> Result<Option<Profile>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PROFILE_COLUMNS} FROM profiles LIMIT 1"))?;
        stmt.query_row([], row_to_profile).optional()
    }

    /// Get the profile or fail with [`CoreError::ProfileMissing`].
    pub fn require_profile(&self) -> Result<Profile, CoreError> {
        self.profile()?.ok_or(CoreError::ProfileMissing)
    }

    /// Update the profile (name, goal, avatar, and the ledger-owned fields).
    pub fn update_profile(&self, profile: &Profile) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE profiles
             SET name = ?1, goal = ?2, avatar = ?3, coin_balance = ?4,
                 streak_count = ?5, streak_last_at = ?6
             WHERE id = ?7",
            params![
                profile.name,
                profile.goal,
                profile.avatar,
                profile.coin_balance,
                profile.streak_count,
                profile.streak_last_at.map(|dt| dt.to_rfc3339()),
                profile.id,
            ],
        )?;
        Ok(())
    }

    // === Project CRUD ===

    /// Create a new project.
    pub fn create_project(&self, project: &Project) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO projects (id, name, deadline, budget, notes, profile_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                project.id,
                project.name,
                project.deadline.map(|d| d.to_rfc3339()),
                project.budget,
                project.notes,
                project.profile_id,
                project.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a project by ID (without tasks).
    pub fn get_project(&self, id: &str) -> Result<Option<Project>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
        ))?;
        stmt.query_row(params![id], row_to_project).optional()
    }

    /// Get a project by ID with its tasks loaded and sorted.
    pub fn get_project_with_tasks(&self, id: &str) -> Result<Option<Project>, rusqlite::Error> {
        match self.get_project(id)? {
            Some(mut project) => {
                project.tasks = self.tasks_for_project(&project.id)?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    /// List all projects, newest first.
    pub fn list_projects(&self) -> Result<Vec<Project>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
        ))?;
        let projects = stmt.query_map([], row_to_project)?;
        projects.collect()
    }

    /// Update a project.
    pub fn update_project(&self, project: &Project) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE projects SET name = ?1, deadline = ?2, budget = ?3, notes = ?4 WHERE id = ?5",
            params![
                project.name,
                project.deadline.map(|d| d.to_rfc3339()),
                project.budget,
                project.notes,
                project.id,
            ],
        )?;
        Ok(())
    }

    /// Delete a project and its tasks in a single transaction.
    pub fn delete_project(&self, id: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<(), rusqlite::Error> = (|| {
            self.conn
                .execute("DELETE FROM tasks WHERE project_id = ?1", params![id])?;
            self.conn
                .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
            Ok(())
        })();
        match result {
            Ok(()) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(())
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }

    /// Number of projects.
    pub fn project_count(&self) -> Result<u32, rusqlite::Error> {
        self.conn
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
    }

    // === Task CRUD ===

    /// Create a new task.
    pub fn create_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO tasks (id, name, deadline, estimated_hours, notes, completed, project_id, created_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                task.id,
                task.name,
                task.deadline.map(|d| d.to_rfc3339()),
                task.estimated_hours,
                task.notes,
                task.completed,
                task.project_id,
                task.created_at.to_rfc3339(),
                task.completed_at.map(|d| d.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;
        stmt.query_row(params![id], row_to_task).optional()
    }

    /// List all tasks.
    pub fn list_tasks(&self) -> Result<Vec<Task>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks"))?;
        let tasks = stmt.query_map([], row_to_task)?;
        tasks.collect()
    }

    /// Tasks of one project in display order: incomplete first, then nearest
    /// deadline, then newest.
    pub fn tasks_for_project(&self, project_id: &str) -> Result<Vec<Task>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ?1"
        ))?;
        let tasks = stmt.query_map(params![project_id], row_to_task)?;
        let mut tasks: Vec<Task> = tasks.collect::<Result<_, _>>()?;
        planner::sort_tasks(&mut tasks);
        Ok(tasks)
    }

    /// Update a task.
    pub fn update_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE tasks
             SET name = ?1, deadline = ?2, estimated_hours = ?3, notes = ?4,
                 completed = ?5, completed_at = ?6
             WHERE id = ?7",
            params![
                task.name,
                task.deadline.map(|d| d.to_rfc3339()),
                task.estimated_hours,
                task.notes,
                task.completed,
                task.completed_at.map(|d| d.to_rfc3339()),
                task.id,
            ],
        )?;
        Ok(())
    }

    /// Delete a task.
    pub fn delete_task(&self, id: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Total number of completed tasks.
    pub fn completed_task_count(&self) -> Result<u32, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE completed = 1",
            [],
            |row| row.get(0),
        )
    }

    /// (completed, total) task counts for one project.
    pub fn project_task_counts(&self, project_id: &str) -> Result<(u32, u32), rusqlite::Error> {
        self.conn.query_row(
            "SELECT COALESCE(SUM(CASE WHEN completed = 1 THEN 1 ELSE 0 END), 0), COUNT(*)
             FROM tasks WHERE project_id = ?1",
            params![project_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
    }

    /// Count of tasks completed within `[start, end)`.
    pub fn completed_tasks_in(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u32, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM tasks
             WHERE completed = 1 AND completed_at >= ?1 AND completed_at < ?2",
            params![start.to_rfc3339(), end.to_rfc3339()],
            |row| row.get(0),
        )
    }

    // === GameSession ===

    /// Record a game session.
    pub fn create_game_session(&self, session: &GameSession) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO game_sessions (id, coins_spent, coins_earned, profile_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.id,
                session.coins_spent,
                session.coins_earned,
                session.profile_id,
                session.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List all game sessions, newest first.
    pub fn list_game_sessions(&self) -> Result<Vec<GameSession>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, coins_spent, coins_earned, profile_id, created_at
             FROM game_sessions ORDER BY created_at DESC",
        )?;
        let sessions = stmt.query_map([], row_to_session)?;
        sessions.collect()
    }

    /// Net coin movement (earned - spent) of game sessions within `[start, end)`.
    pub fn game_net_coins_in(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COALESCE(SUM(coins_earned - coins_spent), 0) FROM game_sessions
             WHERE created_at >= ?1 AND created_at < ?2",
            params![start.to_rfc3339(), end.to_rfc3339()],
            |row| row.get(0),
        )
    }

    // === Full reset ===

    /// Delete every row of all four entity tables in one transaction.
    pub fn reset_all(&self) -> Result<ResetSummary, rusqlite::Error> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<ResetSummary, rusqlite::Error> = (|| {
            let deleted_tasks = self.conn.execute("DELETE FROM tasks", [])?;
            let deleted_projects = self.conn.execute("DELETE FROM projects", [])?;
            let deleted_game_sessions = self.conn.execute("DELETE FROM game_sessions", [])?;
            let deleted_profiles = self.conn.execute("DELETE FROM profiles", [])?;
            Ok(ResetSummary {
                deleted_profiles,
                deleted_projects,
                deleted_tasks,
                deleted_game_sessions,
            })
        })();
        match result {
            Ok(summary) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(summary)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }
}
