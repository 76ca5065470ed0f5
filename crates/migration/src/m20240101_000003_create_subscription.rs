//! Create `subscription` table with FK to `user`.
//!
//! Deleting a user cascades to its subscriptions at the storage level.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(uuid(Subscription::Id).primary_key())
                    .col(uuid(Subscription::UserId).not_null())
                    .col(string_len(Subscription::Name, 255).not_null())
                    .col(double(Subscription::Price).not_null())
                    .col(timestamp_with_time_zone(Subscription::BillingDate).not_null())
                    .col(ColumnDef::new(Subscription::Description).text().null())
                    .col(timestamp_with_time_zone(Subscription::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Subscription::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_user")
                            .from(Subscription::Table, Subscription::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subscription {
    Table,
    Id,
    UserId,
    Name,
    Price,
    BillingDate,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
