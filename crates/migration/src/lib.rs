pub use sea_orm_migration::prelude::*;

mod m20261016_000001_rsvps;
mod m20261016_000002_rsvp_names;
mod m20261016_000003_mail;
mod m20261016_000004_event_config;

pub struct Migrator;

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_rsvps::Migration),
            Box::new(m20261016_000002_rsvp_names::Migration),
            Box::new(m20261016_000003_mail::Migration),
            Box::new(m20261016_000004_event_config::Migration),
        ]
    }
}
