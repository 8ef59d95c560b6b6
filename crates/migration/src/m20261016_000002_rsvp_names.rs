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
                    .table(RsvpNames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RsvpNames::NameKey)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RsvpNames::Email).string().not_null())
                    .col(ColumnDef::new(RsvpNames::Name).string().not_null())
                    .col(ColumnDef::new(RsvpNames::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rsvp_names_email")
                    .table(RsvpNames::Table)
                    .col(RsvpNames::Email)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let _ = manager
            .drop_index(Index::drop().name("idx_rsvp_names_email").to_owned())
            .await;

        manager
            .drop_table(Table::drop().table(RsvpNames::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RsvpNames {
    Table,
    NameKey,
    Email,
    Name,
    CreatedAt,
}
