//! Repository methods — one parameterized statement per operation.
//!
//! All variable data binds through `?n` placeholders; SQL text is never
//! assembled from user input.

use rusqlite::params;
use tracing::debug;

use crate::models::{ChatMessage, Comment, NewComment, NewPost, Post, PostSummary, User};
use crate::{Database, DbError};

/// The chat widget shows a fixed window of recent history.
pub const CHAT_LOG_LIMIT: u32 = 8;
/// Entries in the "latest posts" sidebar.
pub const RECENT_POSTS_LIMIT: u32 = 2;

impl Database {
    // -- Chat log --

    pub fn log_message(&self, username: &str, message: &str) -> Result<(), DbError> {
        self.write(
            "INSERT INTO messages (username, message) VALUES (?1, ?2)",
            params![username, message],
        )?;
        Ok(())
    }

    /// The most recent chat messages, newest first.
    pub fn chat_log(&self) -> Result<Vec<ChatMessage>, DbError> {
        self.read(
            "SELECT id, username, message FROM messages ORDER BY id DESC LIMIT ?1",
            [CHAT_LOG_LIMIT],
            |row| {
                Ok(ChatMessage {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    message: row.get(2)?,
                })
            },
        )
    }

    pub fn clear_chat(&self) -> Result<(), DbError> {
        self.write("DELETE FROM messages", [])?;
        Ok(())
    }

    // -- Users --

    /// Inserts an account row. The UNIQUE constraint on email is the only
    /// duplicate check; a violation propagates to the caller.
    pub fn create_user(&self, email: &str, name: &str, pw_hash: &str) -> Result<(), DbError> {
        self.write(
            "INSERT INTO users (email, name, pw_hash) VALUES (?1, ?2, ?3)",
            params![email, name, pw_hash],
        )?;
        Ok(())
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let users = self.read(
            "SELECT id, email, name, pw_hash, admin FROM users WHERE email = ?1",
            [email],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    name: row.get(2)?,
                    pw_hash: row.get(3)?,
                    admin: row.get(4)?,
                })
            },
        )?;
        Ok(users.into_iter().next())
    }

    /// Display name for a user id, if the account exists.
    pub fn get_user(&self, user_id: i64) -> Result<Option<String>, DbError> {
        let names = self.read(
            "SELECT name FROM users WHERE id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(names.into_iter().next())
    }

    // -- Posts --

    pub fn log_post(&self, post: &NewPost) -> Result<(), DbError> {
        self.write(
            "INSERT INTO posts (username, title, content) VALUES (?1, ?2, ?3)",
            params![post.username, post.title, post.content],
        )?;
        debug!("logged a new post from {}", post.username);
        Ok(())
    }

    pub fn get_posts(&self) -> Result<Vec<Post>, DbError> {
        self.read(
            "SELECT post_id, username, title, content FROM posts ORDER BY post_id DESC",
            [],
            post_from_row,
        )
    }

    pub fn get_post(&self, post_id: i64) -> Result<Option<Post>, DbError> {
        let posts = self.read(
            "SELECT post_id, username, title, content FROM posts WHERE post_id = ?1",
            [post_id],
            post_from_row,
        )?;
        Ok(posts.into_iter().next())
    }

    /// Newest post summaries for the sidebar, descending id.
    pub fn get_recent_posts(&self) -> Result<Vec<PostSummary>, DbError> {
        self.read(
            "SELECT post_id, title FROM posts ORDER BY post_id DESC LIMIT ?1",
            [RECENT_POSTS_LIMIT],
            |row| {
                Ok(PostSummary {
                    post_id: row.get(0)?,
                    title: row.get(1)?,
                })
            },
        )
    }

    pub fn delete_post(&self, post_id: i64) -> Result<(), DbError> {
        self.write("DELETE FROM posts WHERE post_id = ?1", [post_id])?;
        debug!("deleted post {}", post_id);
        Ok(())
    }

    // -- Comments --

    pub fn log_comment(&self, comment: &NewComment) -> Result<(), DbError> {
        self.write(
            "INSERT INTO comments (post_id, user_id, comment) VALUES (?1, ?2, ?3)",
            params![comment.post_id, comment.user_id, comment.comment],
        )?;
        debug!(
            "new comment from user {} on post {}",
            comment.user_id, comment.post_id
        );
        Ok(())
    }

    pub fn get_comments(&self, post_id: i64) -> Result<Vec<Comment>, DbError> {
        self.read(
            "SELECT comment_id, post_id, user_id, comment FROM comments WHERE post_id = ?1",
            [post_id],
            |row| {
                Ok(Comment {
                    comment_id: row.get(0)?,
                    post_id: row.get(1)?,
                    user_id: row.get(2)?,
                    comment: row.get(3)?,
                })
            },
        )
    }
}

fn post_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        post_id: row.get(0)?,
        username: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
    })
}
