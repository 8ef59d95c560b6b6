//! Row counts for the admin status endpoint.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use entity::{mail, rsvp, rsvp_name, RsvpStatus};

use crate::error::RsvpError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    pub pending: u64,
    pub verified: u64,
    /// Name reservations; equals `pending + verified` when the ledger is consistent.
    pub names: u64,
    pub queued_mail: u64,
}

impl LedgerStats {
    pub fn is_consistent(&self) -> bool {
        self.names == self.pending + self.verified
    }
}

pub async fn ledger_stats<C: ConnectionTrait>(db: &C) -> Result<LedgerStats, RsvpError> {
    let by_status = |status: RsvpStatus| {
        rsvp::Entity::find().filter(rsvp::Column::Status.eq(status))
    };

    Ok(LedgerStats {
        pending: by_status(RsvpStatus::Pending).count(db).await?,
        verified: by_status(RsvpStatus::Verified).count(db).await?,
        names: rsvp_name::Entity::find().count(db).await?,
        queued_mail: mail::Entity::find().count(db).await?,
    })
}
