//! Uniqueness ledger: the `rsvps` row keyed by email and the `rsvp_names` row keyed by
//! normalized name.
//!
//! Every function takes a `DatabaseTransaction`, so reservations only ever run inside an
//! open transaction. The presence check is fused into the insert (`ON CONFLICT DO NOTHING`);
//! there is no standalone check-then-write.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, Set, TryInsertResult,
};

use entity::{rsvp, rsvp_name, RsvpStatus};

use crate::normalize::normalize_name;

/// Outcome of a create-if-absent on one ledger key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reservation {
    Created,
    Occupied,
}

impl<T> From<TryInsertResult<T>> for Reservation {
    fn from(result: TryInsertResult<T>) -> Self {
        match result {
            TryInsertResult::Inserted(_) => Reservation::Created,
            TryInsertResult::Conflicted | TryInsertResult::Empty => Reservation::Occupied,
        }
    }
}

/// Insert the RSVP row unless its email key is taken.
pub async fn reserve_email(
    txn: &DatabaseTransaction,
    model: &rsvp::Model,
) -> Result<Reservation, DbErr> {
    let active = rsvp::ActiveModel {
        email: Set(model.email.clone()),
        name: Set(model.name.clone()),
        attending: Set(model.attending),
        guest_count: Set(model.guest_count),
        arrival_time: Set(model.arrival_time.clone()),
        message: Set(model.message.clone()),
        status: Set(model.status),
        verification_token: Set(model.verification_token.clone()),
        verification_token_expiry: Set(model.verification_token_expiry),
        submitted_at: Set(model.submitted_at),
        verified_at: Set(model.verified_at),
    };

    let result = rsvp::Entity::insert(active)
        .on_conflict(OnConflict::column(rsvp::Column::Email).do_nothing().to_owned())
        .do_nothing()
        .exec(txn)
        .await?;

    Ok(result.into())
}

/// Insert the name reservation unless its name key is taken.
pub async fn reserve_name(
    txn: &DatabaseTransaction,
    model: &rsvp_name::Model,
) -> Result<Reservation, DbErr> {
    let active = rsvp_name::ActiveModel {
        name_key: Set(model.name_key.clone()),
        email: Set(model.email.clone()),
        name: Set(model.name.clone()),
        created_at: Set(model.created_at),
    };

    let result = rsvp_name::Entity::insert(active)
        .on_conflict(OnConflict::column(rsvp_name::Column::NameKey).do_nothing().to_owned())
        .do_nothing()
        .exec(txn)
        .await?;

    Ok(result.into())
}

/// Delete an expired pending RSVP together with its name reservation.
///
/// Both deletes are conditioned on the state observed by the caller still holding, so a row
/// verified in the meantime is left alone. Returns `false` when nothing was deleted.
pub async fn release_expired(
    txn: &DatabaseTransaction,
    row: &rsvp::Model,
    now: i64,
) -> Result<bool, DbErr> {
    let deleted = rsvp::Entity::delete_many()
        .filter(rsvp::Column::Email.eq(&row.email))
        .filter(rsvp::Column::Status.eq(RsvpStatus::Pending))
        .filter(rsvp::Column::VerificationTokenExpiry.lt(now))
        .exec(txn)
        .await?;

    if deleted.rows_affected == 0 {
        return Ok(false);
    }

    rsvp_name::Entity::delete_many()
        .filter(rsvp_name::Column::NameKey.eq(normalize_name(&row.name)))
        .filter(rsvp_name::Column::Email.eq(&row.email))
        .exec(txn)
        .await?;

    Ok(true)
}
