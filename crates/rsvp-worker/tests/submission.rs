mod common;

use entity::RsvpStatus;
use rsvp_worker::{submit_rsvp, RsvpError};

use common::{
    config, counts, guest, mail_to, name_row, rsvp_row, setup_db, setup_shared_db, DAY, NOW,
};

#[tokio::test]
async fn submission_creates_pending_pair_and_queues_verification_mail() {
    let db = setup_db().await;

    let id = submit_rsvp(&db, &config(), guest("John Doe", "John@Example.com"), NOW)
        .await
        .unwrap();
    assert_eq!(id, "john@example.com");

    let row = rsvp_row(&db, "john@example.com").await.unwrap();
    assert_eq!(row.name, "John Doe");
    assert_eq!(row.status, RsvpStatus::Pending);
    assert_eq!(row.guest_count, Some(2));
    assert_eq!(row.arrival_time.as_deref(), Some("18:00-19:00"));
    assert_eq!(row.submitted_at, NOW);
    assert_eq!(row.verification_token_expiry, NOW + DAY);
    assert_eq!(row.verified_at, None);

    let token = row.verification_token.unwrap();
    assert_eq!(token.len(), 64);
    assert!(token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));

    let reservation = name_row(&db, "john doe").await.unwrap();
    assert_eq!(reservation.email, "john@example.com");
    assert_eq!(reservation.name, "John Doe");

    let mail = mail_to(&db, "john@example.com").await;
    assert_eq!(mail.len(), 1);
    assert_eq!(mail[0].subject, "Confirm your RSVP for Garden Party");
    assert!(mail[0]
        .html
        .contains(&format!("https://party.example/verify?token={token}")));
}

#[tokio::test]
async fn declining_guest_stores_no_attendance_details() {
    let db = setup_db().await;
    let mut new = guest("Ann Lee", "ann@example.com");
    new.attending = false;

    submit_rsvp(&db, &config(), new, NOW).await.unwrap();

    let row = rsvp_row(&db, "ann@example.com").await.unwrap();
    assert!(!row.attending);
    assert_eq!(row.guest_count, None);
    assert_eq!(row.arrival_time, None);
}

#[tokio::test]
async fn same_email_in_any_casing_is_rejected_without_writes() {
    let db = setup_db().await;
    submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW)
        .await
        .unwrap();
    let before = counts(&db).await;

    let err = submit_rsvp(&db, &config(), guest("Someone Else", "  JOHN@example.COM "), NOW + 5)
        .await
        .unwrap_err();

    assert!(matches!(err, RsvpError::DuplicateSubmission));
    assert_eq!(counts(&db).await, before);
    assert!(name_row(&db, "someone else").await.is_none());
}

#[tokio::test]
async fn same_normalized_name_under_other_email_is_rejected() {
    let db = setup_db().await;
    submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW)
        .await
        .unwrap();

    let err = submit_rsvp(&db, &config(), guest("  john   DOE ", "other@example.com"), NOW)
        .await
        .unwrap_err();

    assert!(matches!(err, RsvpError::DuplicateSubmission));
    assert!(rsvp_row(&db, "other@example.com").await.is_none());
    assert_eq!(counts(&db).await, (1, 1, 1));
}

#[tokio::test]
async fn verified_guest_still_blocks_resubmission() {
    let db = setup_db().await;
    submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW)
        .await
        .unwrap();
    let token = common::token_for(&db, "john@example.com").await;
    rsvp_worker::redeem_token(&db, &config(), &token, NOW + 60)
        .await
        .unwrap();

    let err = submit_rsvp(&db, &config(), guest("John Doe", "john@example.com"), NOW + 120)
        .await
        .unwrap_err();
    assert!(matches!(err, RsvpError::DuplicateSubmission));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_distinct_guests_both_succeed() {
    let (_dir, db) = setup_shared_db().await;

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                let new = guest(&format!("Guest {i}"), &format!("guest{i}@example.com"));
                submit_rsvp(&db, &config(), new, NOW).await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(counts(&db).await, (6, 6, 6));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_name_commits_exactly_once() {
    let (_dir, db) = setup_shared_db().await;
    let spellings = ["John Doe", "JOHN  doe", "john doe", " John   DOE", "jOhN dOe", "John\tDoe"];

    let handles: Vec<_> = spellings
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let db = db.clone();
            let new = guest(name, &format!("john{i}@example.com"));
            tokio::spawn(async move { submit_rsvp(&db, &config(), new, NOW).await })
        })
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(RsvpError::DuplicateSubmission))));

    let reservation = name_row(&db, "john doe").await.unwrap();
    assert!(rsvp_row(&db, &reservation.email).await.is_some());
    assert_eq!(counts(&db).await, (1, 1, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_email_commits_exactly_once() {
    let (_dir, db) = setup_shared_db().await;

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let db = db.clone();
            let new = guest(&format!("Person {i}"), " Shared@Example.com");
            tokio::spawn(async move { submit_rsvp(&db, &config(), new, NOW).await })
        })
        .collect();

    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(id) => {
                assert_eq!(id, "shared@example.com");
                ok += 1;
            }
            Err(err) => assert!(matches!(err, RsvpError::DuplicateSubmission), "{err}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(counts(&db).await, (1, 1, 1));
}

#[tokio::test]
async fn blank_identity_is_an_invalid_argument() {
    let db = setup_db().await;

    let err = submit_rsvp(&db, &config(), guest("   ", "x@example.com"), NOW)
        .await
        .unwrap_err();

    assert!(matches!(err, RsvpError::InvalidArgument(_)));
    assert_eq!(counts(&db).await, (0, 0, 0));
}
