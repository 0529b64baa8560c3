use thiserror::Error;

/// Errors surfaced by the database layer.
///
/// Pool trouble and statement failure stay distinct so callers can tell a
/// starved pool apart from a bad query or a tripped constraint.
#[derive(Debug, Error)]
pub enum DbError {
    /// The pool gave up waiting for a free connection, or could not
    /// establish one.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// The statement itself failed: constraint violation, malformed SQL,
    /// dropped connection.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
