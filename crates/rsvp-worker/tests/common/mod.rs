#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use tempfile::TempDir;

use entity::{mail, rsvp, rsvp_name};
use rsvp_worker::{EventConfig, NewRsvp};

pub const NOW: i64 = 1_760_000_000;
pub const DAY: i64 = 24 * 60 * 60;

/// In-memory SQLite with all migrations applied. One pooled connection keeps every query on
/// the same database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("open sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

/// File-backed SQLite behind a pool of several connections, so transactions from
/// concurrent tasks really overlap. Keep the `TempDir` alive for the test's duration.
pub async fn setup_shared_db() -> (TempDir, DatabaseConnection) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("rsvp.db").display());

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(8)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("open sqlite file");
    Migrator::up(&db, None).await.expect("apply migrations");
    (dir, db)
}

pub fn config() -> EventConfig {
    EventConfig {
        title: "Garden Party".to_string(),
        date: "June 1".to_string(),
        location: "The Park".to_string(),
        host_email: "host@party.example".to_string(),
        app_base_url: "https://party.example".to_string(),
    }
}

pub fn guest(name: &str, email: &str) -> NewRsvp {
    NewRsvp {
        name: name.to_string(),
        email: email.to_string(),
        attending: true,
        guest_count: Some(2),
        arrival_time: Some("18:00-19:00".to_string()),
        message: None,
    }
}

pub async fn rsvp_row(db: &DatabaseConnection, email: &str) -> Option<rsvp::Model> {
    rsvp::Entity::find_by_id(email.to_string())
        .one(db)
        .await
        .expect("query rsvps")
}

pub async fn name_row(db: &DatabaseConnection, key: &str) -> Option<rsvp_name::Model> {
    rsvp_name::Entity::find_by_id(key.to_string())
        .one(db)
        .await
        .expect("query rsvp_names")
}

pub async fn token_for(db: &DatabaseConnection, email: &str) -> String {
    rsvp_row(db, email)
        .await
        .and_then(|r| r.verification_token)
        .expect("pending row with token")
}

pub async fn counts(db: &DatabaseConnection) -> (u64, u64, u64) {
    (
        rsvp::Entity::find().count(db).await.expect("count rsvps"),
        rsvp_name::Entity::find().count(db).await.expect("count rsvp_names"),
        mail::Entity::find().count(db).await.expect("count mail"),
    )
}

pub async fn mail_to(db: &DatabaseConnection, to: &str) -> Vec<mail::Model> {
    mail::Entity::find()
        .all(db)
        .await
        .expect("query mail")
        .into_iter()
        .filter(|m| m.to_email == to)
        .collect()
}
