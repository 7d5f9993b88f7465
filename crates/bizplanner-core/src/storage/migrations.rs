//! Database schema migrations for bizplanner.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current schema
/// version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: Initial schema (baseline).
///
/// The base tables are created by `PlannerDb::migrate()` directly; this
/// migration only records the baseline version.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    set_schema_version(conn, 1)?;
    Ok(())
}

/// Migration v2: Add the task completion timestamp.
///
/// Adds `completed_at` to the tasks table and backfills completed tasks with
/// their creation timestamp, preserving the completed_at-iff-completed
/// invariant for pre-existing rows.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch("ALTER TABLE tasks ADD COLUMN completed_at TEXT;")?;

    tx.execute(
        "UPDATE tasks SET completed_at = created_at WHERE completed = 1 AND completed_at IS NULL",
        [],
    )?;

    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [2])?;

    tx.commit()?;
    Ok(())
}

/// Migration v3: Add the gamification columns to profiles.
///
/// Adds:
/// - coin_balance: current coin total
/// - streak_count: consecutive-day completion counter
/// - streak_last_at: day the streak was last advanced
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "ALTER TABLE profiles ADD COLUMN coin_balance INTEGER NOT NULL DEFAULT 0;
         ALTER TABLE profiles ADD COLUMN streak_count INTEGER NOT NULL DEFAULT 0;
         ALTER TABLE profiles ADD COLUMN streak_last_at TEXT;",
    )?;

    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [3])?;

    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_v1_tables(conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE profiles (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                goal       TEXT,
                avatar     BLOB,
                created_at TEXT NOT NULL
            );

            CREATE TABLE tasks (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                deadline        TEXT,
                estimated_hours INTEGER NOT NULL DEFAULT 0,
                notes           TEXT,
                completed       INTEGER NOT NULL DEFAULT 0,
                project_id      TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );",
        )
        .unwrap();
    }

    #[test]
    fn migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        create_v1_tables(&conn);

        conn.execute(
            "INSERT INTO tasks (id, name, completed, project_id, created_at)
             VALUES ('done', 'Done task', 1, 'p1', '2024-01-01T12:00:00+00:00')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tasks (id, name, completed, project_id, created_at)
             VALUES ('open', 'Open task', 0, 'p1', '2024-01-01T12:00:00+00:00')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO profiles (id, name, created_at)
             VALUES ('u1', 'Someone', '2024-01-01T12:00:00+00:00')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 3);

        // Completed tasks got a backfilled timestamp, open tasks did not.
        let completed_at: Option<String> = conn
            .query_row("SELECT completed_at FROM tasks WHERE id = 'done'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(completed_at.as_deref(), Some("2024-01-01T12:00:00+00:00"));

        let completed_at: Option<String> = conn
            .query_row("SELECT completed_at FROM tasks WHERE id = 'open'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert!(completed_at.is_none());

        // Pre-existing profiles start from zero coins.
        let (balance, streak): (i64, u32) = conn
            .query_row(
                "SELECT coin_balance, streak_count FROM profiles WHERE id = 'u1'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(balance, 0);
        assert_eq!(streak, 0);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_v1_tables(&conn);

        migrate(&conn).unwrap();
        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), 3);
    }

    #[test]
    fn incremental_migration_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        create_v1_tables(&conn);
        conn.execute(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY)",
            [],
        )
        .unwrap();
        conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])
            .unwrap();

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 3);

        // New columns exist and are queryable.
        conn.prepare("SELECT completed_at FROM tasks").unwrap();
        conn.prepare("SELECT coin_balance, streak_count, streak_last_at FROM profiles")
            .unwrap();
    }
}
