//! Credential verification for Pinboard: password-based signup and login.
//!
//! Passwords are hashed with Argon2id using a per-call random salt and
//! verified with the algorithm's constant-time comparison. This is a
//! single-shot check — sessions, cookies, and tokens belong to the web
//! layer.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use pinboard_db::Database;

/// Failures of the machinery, not of the credentials. A wrong password or
/// an unknown email is `Ok(None)` from [`check_login`], never an error, so
/// callers cannot mistake a rejected login for a crashed database call.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("database error: {0}")]
    Db(#[from] pinboard_db::DbError),

    /// Hashing failed, or a stored hash could not be parsed.
    #[error("password hash error: {0}")]
    Hash(argon2::password_hash::Error),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::Hash(err)
    }
}

/// The authenticated identity handed to the session layer.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub admin: bool,
}

/// Creates an account if the two password inputs match.
///
/// Returns `Ok(false)` without touching the database when they differ.
/// Email uniqueness is left to the schema's UNIQUE constraint; a duplicate
/// surfaces as [`AuthError::Db`].
pub fn signup(
    db: &Database,
    email: &str,
    name: &str,
    password: &str,
    confirm_password: &str,
) -> Result<bool, AuthError> {
    if password != confirm_password {
        debug!("signup rejected for {email}: passwords do not match");
        return Ok(false);
    }

    let salt = SaltString::generate(&mut OsRng);
    let pw_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();

    db.create_user(email, name, &pw_hash)?;
    Ok(true)
}

/// Verifies a password against the stored hash for `email`.
///
/// `Ok(None)` covers both "no such user" and "wrong password"; the two are
/// deliberately indistinguishable to the caller and only told apart in the
/// diagnostic log.
pub fn check_login(
    db: &Database,
    email: &str,
    password: &str,
) -> Result<Option<Identity>, AuthError> {
    let Some(user) = db.user_by_email(email)? else {
        debug!("login rejected for {email}: unknown email");
        return Ok(None);
    };

    let parsed_hash = PasswordHash::new(&user.pw_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(Some(Identity {
            user_id: user.id,
            email: user.email,
            admin: user.admin,
        })),
        Err(argon2::password_hash::Error::Password) => {
            debug!("login rejected for {email}: wrong password");
            Ok(None)
        }
        Err(err) => Err(AuthError::Hash(err)),
    }
}
