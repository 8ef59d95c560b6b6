use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Name reservation paired with exactly one row in `rsvps`.
///
/// Keying on the normalized name turns "is this name taken" into a primary-key
/// presence check that can share a transaction with the `rsvps` insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rsvp_names")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Trimmed, lower-cased, whitespace-collapsed name.
    #[sea_orm(primary_key, auto_increment = false)]
    pub name_key: String,

    /// Normalized email of the owning `rsvps` row.
    pub email: String,

    /// Original-cased display copy.
    pub name: String,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
