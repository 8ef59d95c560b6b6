//! Registration of a new guest response.
//!
//! The email key and the name key are claimed with create-if-absent inserts inside one
//! transaction. The first statement is a write, so a concurrent submission touching either
//! key waits on the store's write lock and then finds the key occupied; it ends in
//! `DuplicateSubmission` with nothing written.

use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};

use entity::{rsvp, rsvp_name, RsvpStatus};

use crate::config::EventConfig;
use crate::error::{conflict_or_backend, RsvpError};
use crate::ledger::{self, Reservation};
use crate::normalize::{normalize_email, normalize_name};
use crate::notify;
use crate::token::{generate_verification_token, TOKEN_TTL_SECS};

/// A validated submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRsvp {
    pub name: String,
    pub email: String,
    pub attending: bool,
    pub guest_count: Option<i32>,
    pub arrival_time: Option<String>,
    pub message: Option<String>,
}

/// Create the RSVP row and its name reservation atomically, queueing the verification mail
/// in the same transaction.
///
/// Returns the normalized email, which identifies the submission.
#[instrument(skip_all)]
pub async fn submit_rsvp(
    db: &DatabaseConnection,
    config: &EventConfig,
    new: NewRsvp,
    now: i64,
) -> Result<String, RsvpError> {
    let email = normalize_email(&new.email);
    let name_key = normalize_name(&new.name);
    if email.is_empty() || name_key.is_empty() {
        return Err(RsvpError::InvalidArgument("name and email are required"));
    }

    let token = generate_verification_token()?;

    let record = rsvp::Model {
        email: email.clone(),
        name: new.name.trim().to_string(),
        attending: new.attending,
        guest_count: new.guest_count.filter(|_| new.attending),
        arrival_time: new.arrival_time.filter(|_| new.attending),
        message: new.message,
        status: RsvpStatus::Pending,
        verification_token: Some(token),
        verification_token_expiry: now + TOKEN_TTL_SECS,
        submitted_at: now,
        verified_at: None,
    };
    let reservation = rsvp_name::Model {
        name_key,
        email: email.clone(),
        name: record.name.clone(),
        created_at: now,
    };

    // Dropping `txn` without commit rolls back, including a reservation already written.
    let txn = db.begin().await?;

    if ledger::reserve_email(&txn, &record)
        .await
        .map_err(conflict_or_backend)?
        == Reservation::Occupied
    {
        return Err(RsvpError::DuplicateSubmission);
    }
    if ledger::reserve_name(&txn, &reservation)
        .await
        .map_err(conflict_or_backend)?
        == Reservation::Occupied
    {
        return Err(RsvpError::DuplicateSubmission);
    }

    notify::on_rsvp_created(&txn, config, &record, now).await?;

    txn.commit().await.map_err(conflict_or_backend)?;

    info!(attending = record.attending, "rsvp submitted, awaiting verification");
    Ok(email)
}
