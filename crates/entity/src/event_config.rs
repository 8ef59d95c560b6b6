use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event settings stored alongside the data. The row with `id = "event"` wins over
/// environment variables.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    pub date: String,

    pub location: String,

    pub host_email: String,

    pub app_base_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
