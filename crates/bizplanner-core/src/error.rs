//! Core error types for bizplanner-core.
//!
//! This module defines the error hierarchy using thiserror. Storage-layer
//! methods return `rusqlite::Error` directly; the engine layer wraps them
//! into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bizplanner-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Preference-store errors
    #[error("Preferences error: {0}")]
    Prefs(#[from] PrefsError),

    /// No profile row exists yet (onboarding has not run, or data was reset)
    #[error("No profile exists; complete onboarding first")]
    ProfileMissing,

    /// A profile row already exists; the store holds exactly one
    #[error("A profile already exists")]
    ProfileExists,

    /// A referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Preference-store errors.
#[derive(Error, Debug)]
pub enum PrefsError {
    /// Failed to load preferences
    #[error("Failed to load preferences from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save preferences
    #[error("Failed to save preferences to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse the preferences file
    #[error("Failed to parse preferences: {0}")]
    ParseFailed(String),

    /// Unknown preference key
    #[error("Unknown preference key: {0}")]
    UnknownKey(String),

    /// Invalid preference value
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
