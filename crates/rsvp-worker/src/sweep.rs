//! Expiry sweep: reclaims pending RSVPs whose token expired before `now`.
//!
//! Each pair is deleted in its own transaction so one failure does not keep the rest of
//! the sweep from making progress. Verified rows are never selected or deleted.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::{info, instrument, warn};

use entity::{rsvp, RsvpStatus};

use crate::error::RsvpError;
use crate::ledger;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Pending rows past expiry at query time.
    pub expired: usize,
    /// Pairs deleted.
    pub deleted: usize,
    /// Rows that changed state before their delete ran (verified meanwhile).
    pub skipped: usize,
    /// Pairs whose delete failed; retried on the next tick.
    pub failed: usize,
}

#[instrument(skip(db))]
pub async fn sweep_expired(db: &DatabaseConnection, now: i64) -> Result<SweepReport, RsvpError> {
    let expired = rsvp::Entity::find()
        .filter(rsvp::Column::Status.eq(RsvpStatus::Pending))
        .filter(rsvp::Column::VerificationTokenExpiry.lt(now))
        .all(db)
        .await?;

    let mut report = SweepReport {
        expired: expired.len(),
        ..SweepReport::default()
    };
    if expired.is_empty() {
        return Ok(report);
    }

    for row in &expired {
        match release_pair(db, row, now).await {
            Ok(true) => report.deleted += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                warn!(error = %e, "failed to delete expired rsvp");
                report.failed += 1;
            }
        }
    }

    info!(
        expired = report.expired,
        deleted = report.deleted,
        skipped = report.skipped,
        failed = report.failed,
        "expiry sweep finished"
    );
    Ok(report)
}

async fn release_pair(
    db: &DatabaseConnection,
    row: &rsvp::Model,
    now: i64,
) -> Result<bool, RsvpError> {
    let txn = db.begin().await?;
    if !ledger::release_expired(&txn, row, now).await? {
        return Ok(false);
    }
    txn.commit().await?;
    Ok(true)
}
