//! Token redemption: `pending -> verified`, exactly once per row.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{info, instrument};

use entity::{rsvp, RsvpStatus};

use crate::config::EventConfig;
use crate::error::RsvpError;
use crate::notify;
use crate::token::parse_token;

/// Redeem a verification token presented by a guest.
///
/// Missing, wrong, expired, and already redeemed tokens all yield `TokenInvalidOrExpired`.
/// The status change and the host notification commit together.
#[instrument(skip_all)]
pub async fn redeem_token(
    db: &DatabaseConnection,
    config: &EventConfig,
    raw_token: &str,
    now: i64,
) -> Result<rsvp::Model, RsvpError> {
    let token =
        parse_token(raw_token).ok_or(RsvpError::InvalidArgument("A verification token is required."))?;

    let txn = db.begin().await?;

    // The guarded update is the first statement so the transaction takes the write lock
    // up front. A racing redemption waits for it and then matches no pending row.
    let claimed = rsvp::Entity::update_many()
        .set(rsvp::ActiveModel {
            status: Set(RsvpStatus::Verified),
            verified_at: Set(Some(now)),
            ..Default::default()
        })
        .filter(rsvp::Column::Status.eq(RsvpStatus::Pending))
        .filter(rsvp::Column::VerificationToken.eq(&token))
        .filter(rsvp::Column::VerificationTokenExpiry.gt(now))
        .exec(&txn)
        .await?;
    if claimed.rows_affected == 0 {
        return Err(RsvpError::TokenInvalidOrExpired);
    }

    let Some(found) = rsvp::Entity::find()
        .filter(rsvp::Column::Status.eq(RsvpStatus::Verified))
        .filter(rsvp::Column::VerificationToken.eq(&token))
        .one(&txn)
        .await?
    else {
        return Err(RsvpError::TokenInvalidOrExpired);
    };

    rsvp::Entity::update_many()
        .set(rsvp::ActiveModel {
            verification_token: Set(None),
            ..Default::default()
        })
        .filter(rsvp::Column::Email.eq(&found.email))
        .exec(&txn)
        .await?;

    let verified = rsvp::Model {
        verification_token: None,
        ..found
    };

    notify::enqueue_host_notification(&txn, config, &verified, now).await?;

    txn.commit().await?;

    info!("rsvp verified");
    Ok(verified)
}
