use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Verification state of a guest response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "verified")]
    Verified,
}

/// The authoritative guest response, keyed by normalized email.
///
/// `verification_token` is set while the row is pending and cleared when it is verified.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rsvps")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Trimmed, lower-cased email.
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,

    /// Display name as entered by the guest (trimmed only).
    pub name: String,

    pub attending: bool,

    /// 1..=10, only when attending.
    pub guest_count: Option<i32>,

    /// Time-range token such as `18:00-19:00`, only when attending.
    pub arrival_time: Option<String>,

    pub message: Option<String>,

    pub status: RsvpStatus,

    /// 64 lowercase hex characters.
    pub verification_token: Option<String>,

    /// Unix timestamp (seconds).
    pub verification_token_expiry: i64,

    /// Unix timestamp (seconds).
    pub submitted_at: i64,

    /// Unix timestamp (seconds).
    pub verified_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
