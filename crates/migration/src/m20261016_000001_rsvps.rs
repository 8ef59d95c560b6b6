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
                    .table(Rsvps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rsvps::Email).string().not_null().primary_key())
                    .col(ColumnDef::new(Rsvps::Name).string().not_null())
                    .col(ColumnDef::new(Rsvps::Attending).boolean().not_null())
                    .col(ColumnDef::new(Rsvps::GuestCount).integer())
                    .col(ColumnDef::new(Rsvps::ArrivalTime).string())
                    .col(ColumnDef::new(Rsvps::Message).text())
                    .col(
                        ColumnDef::new(Rsvps::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Rsvps::VerificationToken).string())
                    .col(
                        ColumnDef::new(Rsvps::VerificationTokenExpiry)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rsvps::SubmittedAt).big_integer().not_null())
                    .col(ColumnDef::new(Rsvps::VerifiedAt).big_integer())
                    .to_owned(),
            )
            .await?;

        // Redemption looks rows up by token.
        manager
            .create_index(
                Index::create()
                    .name("idx_rsvps_verification_token")
                    .table(Rsvps::Table)
                    .col(Rsvps::VerificationToken)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // The sweep scans pending rows by expiry.
        manager
            .create_index(
                Index::create()
                    .name("idx_rsvps_status_expiry")
                    .table(Rsvps::Table)
                    .col(Rsvps::Status)
                    .col(Rsvps::VerificationTokenExpiry)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let _ = manager
            .drop_index(Index::drop().name("idx_rsvps_status_expiry").to_owned())
            .await;
        let _ = manager
            .drop_index(Index::drop().name("idx_rsvps_verification_token").to_owned())
            .await;

        manager
            .drop_table(Table::drop().table(Rsvps::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rsvps {
    Table,
    Email,
    Name,
    Attending,
    GuestCount,
    ArrivalTime,
    Message,
    Status,
    VerificationToken,
    VerificationTokenExpiry,
    SubmittedAt,
    VerifiedAt,
}
