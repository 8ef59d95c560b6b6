use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Failures surfaced by the RSVP core. Every variant leaves stored state untouched.
#[derive(Debug, Error)]
pub enum RsvpError {
    /// The email or the normalized name already holds a reservation.
    #[error("this email or name has already been used to RSVP")]
    DuplicateSubmission,

    /// The store is unreachable, misconfigured, or failed mid-operation.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Unknown, wrong, expired, or already redeemed token. Deliberately not split further.
    #[error("invalid or expired verification token")]
    TokenInvalidOrExpired,

    /// The request itself is unusable, such as a missing or malformed token or a blank
    /// name or email. Nothing is looked up.
    #[error("{0}")]
    InvalidArgument(&'static str),
}

impl From<DbErr> for RsvpError {
    fn from(e: DbErr) -> Self {
        RsvpError::BackendUnavailable(e.to_string())
    }
}

impl From<getrandom::Error> for RsvpError {
    fn from(e: getrandom::Error) -> Self {
        RsvpError::BackendUnavailable(format!("randomness source failed: {e}"))
    }
}

/// Maps a store error to `DuplicateSubmission` when the store reports a key conflict.
pub(crate) fn conflict_or_backend(e: DbErr) -> RsvpError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RsvpError::DuplicateSubmission,
        _ => RsvpError::from(e),
    }
}
