use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outbound mail queue. Rows are consumed by an external delivery service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mail")]
pub struct Model {
    /// UUIDv4 string.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub to_email: String,

    pub subject: String,

    #[sea_orm(column_type = "Text")]
    pub html: String,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
