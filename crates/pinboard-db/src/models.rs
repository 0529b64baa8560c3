//! Entity row types — these map directly to SQLite rows.
//! Every row crosses the crate boundary as named fields, never as a
//! positional tuple.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: i64,
    pub username: String,
    pub message: String,
}

/// Full account row, including the stored password hash. Kept off the
/// serialization surface; the render-facing types below are what the web
/// layer sees.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub pw_hash: String,
    pub admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub post_id: i64,
    pub username: String,
    pub title: String,
    pub content: String,
}

/// Title/id pair for the "latest posts" sidebar.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub post_id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub comment_id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub comment: String,
}

// -- Write payloads --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPost {
    pub username: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewComment {
    pub post_id: i64,
    pub user_id: i64,
    pub comment: String,
}
