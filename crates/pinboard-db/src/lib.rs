//! Database layer for the Pinboard application.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! an idempotent schema bootstrap, and repository methods for the chat log,
//! the post board, comments, and user accounts. Every operation is a single
//! parameterized statement executed on one pooled connection; there is no
//! in-process caching, so every read hits the database.

pub mod config;
mod error;
mod migrations;
pub mod models;
mod queries;

pub use config::{Config, ConfigError};
pub use error::DbError;
pub use queries::{CHAT_LOG_LIMIT, RECENT_POSTS_LIMIT};

use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

/// Idle connections kept warm by the pool.
const MIN_IDLE_CONNECTIONS: u32 = 1;

pub struct Database {
    pool: r2d2::Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens the database file and builds the connection pool.
    ///
    /// The pool is constructed explicitly and owned by the returned value;
    /// dropping the `Database` closes every pooled connection. Each
    /// connection gets WAL mode and foreign-key enforcement before it is
    /// handed out.
    pub fn open(config: &Config) -> Result<Self, DbError> {
        let manager = SqliteConnectionManager::file(&config.database_path).with_init(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        });

        let pool = r2d2::Pool::builder()
            .min_idle(Some(MIN_IDLE_CONNECTIONS))
            .max_size(config.max_connections)
            .build(manager)?;

        migrations::run(&*pool.get()?)?;

        info!(
            "Database opened at {} ({} connections max)",
            config.database_path.display(),
            config.max_connections
        );
        Ok(Self { pool })
    }

    /// Runs a parameterized SELECT and maps every row through `map`.
    ///
    /// The pooled connection is checked out for the duration of this call
    /// and returned when the guard drops, on the error paths included.
    pub fn read<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, DbError>
    where
        P: rusqlite::Params,
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(rows)
    }

    /// Runs a parameterized INSERT/UPDATE/DELETE and returns the number of
    /// affected rows. Single statements autocommit; failures propagate to
    /// the caller unchanged, with no retry.
    pub fn write<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<usize, DbError> {
        let conn = self.pool.get()?;
        let affected = conn.execute(sql, params)?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_db(dir: &tempfile::TempDir, max_connections: u32) -> Database {
        let config = Config {
            database_path: dir.path().join("test.db"),
            max_connections,
        };
        Database::open(&config).unwrap()
    }

    #[test]
    fn read_and_write_roundtrip() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir, 2);

        let affected = db
            .write(
                "INSERT INTO messages (username, message) VALUES (?1, ?2)",
                ["alice", "hello"],
            )
            .unwrap();
        assert_eq!(affected, 1);

        let names = db
            .read("SELECT username FROM messages", [], |row| {
                row.get::<_, String>(0)
            })
            .unwrap();
        assert_eq!(names, vec!["alice".to_string()]);
    }

    #[test]
    fn failing_statement_still_releases_the_connection() {
        let dir = tempdir().unwrap();
        // Pool of one: a leaked checkout would make the next call wait on
        // an empty pool instead of succeeding.
        let db = open_db(&dir, 1);

        for _ in 0..3 {
            let err = db.write("INSERT INTO no_such_table (x) VALUES (?1)", [1]);
            assert!(matches!(err, Err(DbError::Sqlite(_))));
        }
        for _ in 0..3 {
            let err = db.read("SELECT x FROM no_such_table", [], |row| {
                row.get::<_, i64>(0)
            });
            assert!(matches!(err, Err(DbError::Sqlite(_))));
        }

        db.write(
            "INSERT INTO messages (username, message) VALUES (?1, ?2)",
            ["bob", "still here"],
        )
        .unwrap();
    }

    #[test]
    fn statement_failures_propagate_as_sqlite_errors() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir, 2);

        db.write(
            "INSERT INTO users (email, name, pw_hash) VALUES (?1, ?2, ?3)",
            ["a@example.com", "A", "hash"],
        )
        .unwrap();

        // Second insert trips the UNIQUE constraint on email.
        let err = db.write(
            "INSERT INTO users (email, name, pw_hash) VALUES (?1, ?2, ?3)",
            ["a@example.com", "B", "hash"],
        );
        assert!(matches!(err, Err(DbError::Sqlite(_))));
    }
}
