use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventConfig::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventConfig::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(EventConfig::Title).string().not_null())
                    .col(ColumnDef::new(EventConfig::Date).string().not_null().default(""))
                    .col(ColumnDef::new(EventConfig::Location).string().not_null().default(""))
                    .col(ColumnDef::new(EventConfig::HostEmail).string().not_null().default(""))
                    .col(ColumnDef::new(EventConfig::AppBaseUrl).string().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventConfig::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EventConfig {
    Table,
    Id,
    Title,
    Date,
    Location,
    HostEmail,
    AppBaseUrl,
}
