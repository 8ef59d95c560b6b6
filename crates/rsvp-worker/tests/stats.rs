mod common;

use rsvp_worker::stats::{ledger_stats, LedgerStats};
use rsvp_worker::{redeem_token, submit_rsvp, sweep_expired};

use common::{config, guest, setup_db, token_for, DAY, NOW};

#[tokio::test]
async fn stats_track_the_ledger_through_its_lifecycle() {
    let db = setup_db().await;
    assert_eq!(ledger_stats(&db).await.unwrap(), LedgerStats::default());

    submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW)
        .await
        .unwrap();
    submit_rsvp(&db, &config(), guest("Jane Roe", "jane@example.com"), NOW)
        .await
        .unwrap();
    let token = token_for(&db, "jane@example.com").await;
    redeem_token(&db, &config(), &token, NOW + 60).await.unwrap();

    let stats = ledger_stats(&db).await.unwrap();
    assert_eq!(
        stats,
        LedgerStats {
            pending: 1,
            verified: 1,
            names: 2,
            queued_mail: 3,
        }
    );
    assert!(stats.is_consistent());

    sweep_expired(&db, NOW + DAY + 1).await.unwrap();
    let stats = ledger_stats(&db).await.unwrap();
    assert_eq!((stats.pending, stats.verified, stats.names), (0, 1, 1));
    assert!(stats.is_consistent());
}
