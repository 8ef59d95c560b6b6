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
                    .table(Mail::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Mail::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Mail::ToEmail).string().not_null())
                    .col(ColumnDef::new(Mail::Subject).string().not_null())
                    .col(ColumnDef::new(Mail::Html).text().not_null())
                    .col(ColumnDef::new(Mail::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mail_created_at")
                    .table(Mail::Table)
                    .col(Mail::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let _ = manager
            .drop_index(Index::drop().name("idx_mail_created_at").to_owned())
            .await;

        manager
            .drop_table(Table::drop().table(Mail::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Mail {
    Table,
    Id,
    ToEmail,
    Subject,
    Html,
    CreatedAt,
}
