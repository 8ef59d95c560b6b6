mod common;

use entity::RsvpStatus;
use rsvp_worker::{ledger, redeem_token, submit_rsvp, sweep_expired, RsvpError, SweepReport};
use sea_orm::{ConnectionTrait, TransactionTrait};

use common::{config, counts, guest, name_row, rsvp_row, setup_db, token_for, DAY, NOW};

#[tokio::test]
async fn sweep_deletes_expired_pending_pairs_only() {
    let db = setup_db().await;

    // Verified earlier; must survive.
    submit_rsvp(&db, &config(), guest("Jane Roe", "jane@example.com"), NOW - 10)
        .await
        .unwrap();
    let token = token_for(&db, "jane@example.com").await;
    redeem_token(&db, &config(), &token, NOW).await.unwrap();

    submit_rsvp(&db, &config(), guest("John Doe", "John@Example.com"), NOW)
        .await
        .unwrap();

    let report = sweep_expired(&db, NOW + DAY + 1).await.unwrap();
    assert_eq!(
        report,
        SweepReport {
            expired: 1,
            deleted: 1,
            skipped: 0,
            failed: 0
        }
    );

    assert!(rsvp_row(&db, "john@example.com").await.is_none());
    assert!(name_row(&db, "john doe").await.is_none());

    let jane = rsvp_row(&db, "jane@example.com").await.unwrap();
    assert_eq!(jane.status, RsvpStatus::Verified);
    assert!(name_row(&db, "jane roe").await.is_some());
}

#[tokio::test]
async fn second_sweep_is_a_no_op() {
    let db = setup_db().await;
    submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW)
        .await
        .unwrap();

    let later = NOW + 2 * DAY;
    assert_eq!(sweep_expired(&db, later).await.unwrap().deleted, 1);
    let before = counts(&db).await;

    assert_eq!(sweep_expired(&db, later).await.unwrap(), SweepReport::default());
    assert_eq!(counts(&db).await, before);
}

#[tokio::test]
async fn unexpired_pending_rows_are_kept() {
    let db = setup_db().await;
    submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW)
        .await
        .unwrap();

    // Expiry equal to now is not yet past.
    for now in [NOW + 1, NOW + DAY] {
        assert_eq!(sweep_expired(&db, now).await.unwrap(), SweepReport::default());
    }
    assert!(rsvp_row(&db, "john@example.com").await.is_some());
    assert!(name_row(&db, "john doe").await.is_some());
}

#[tokio::test]
async fn swept_identity_can_register_again() {
    let db = setup_db().await;
    submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW)
        .await
        .unwrap();
    let stale_token = token_for(&db, "john@example.com").await;

    let later = NOW + DAY + 60;
    sweep_expired(&db, later).await.unwrap();

    let err = redeem_token(&db, &config(), &stale_token, later).await.unwrap_err();
    assert!(matches!(err, RsvpError::TokenInvalidOrExpired));

    submit_rsvp(&db, &config(), guest("john doe", "JOHN@example.com"), later)
        .await
        .unwrap();
    let fresh = rsvp_row(&db, "john@example.com").await.unwrap();
    assert_eq!(fresh.status, RsvpStatus::Pending);
    assert_ne!(fresh.verification_token.as_deref(), Some(stale_token.as_str()));
}

#[tokio::test]
async fn row_verified_after_selection_is_not_released() {
    let db = setup_db().await;
    submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW)
        .await
        .unwrap();

    // Snapshot as the sweep would have selected it, then verify before the delete runs.
    let selected = rsvp_row(&db, "john@example.com").await.unwrap();
    let token = selected.verification_token.clone().unwrap();
    redeem_token(&db, &config(), &token, NOW + 60).await.unwrap();

    let txn = db.begin().await.unwrap();
    let released = ledger::release_expired(&txn, &selected, NOW + DAY + 1)
        .await
        .unwrap();
    txn.commit().await.unwrap();

    assert!(!released);
    let row = rsvp_row(&db, "john@example.com").await.unwrap();
    assert_eq!(row.status, RsvpStatus::Verified);
    assert_eq!(name_row(&db, "john doe").await.unwrap().email, "john@example.com");
}

#[tokio::test]
async fn failed_pair_does_not_stop_the_others() {
    let db = setup_db().await;
    submit_rsvp(&db, &config(), guest("Stuck Guest", "stuck@example.com"), NOW)
        .await
        .unwrap();
    submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW)
        .await
        .unwrap();

    db.execute_unprepared(
        "CREATE TRIGGER block_stuck_delete BEFORE DELETE ON rsvps \
         WHEN old.email = 'stuck@example.com' \
         BEGIN SELECT RAISE(ABORT, 'delete blocked'); END",
    )
    .await
    .unwrap();

    let report = sweep_expired(&db, NOW + DAY + 1).await.unwrap();
    assert_eq!(
        report,
        SweepReport {
            expired: 2,
            deleted: 1,
            skipped: 0,
            failed: 1
        }
    );

    assert!(rsvp_row(&db, "john@example.com").await.is_none());
    assert!(name_row(&db, "john doe").await.is_none());
    assert!(rsvp_row(&db, "stuck@example.com").await.is_some());
    assert!(name_row(&db, "stuck guest").await.is_some());
}
