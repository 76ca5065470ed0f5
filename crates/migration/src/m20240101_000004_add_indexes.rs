use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Subscription: composite index backing the per-owner ordered listing
        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_user_billing_date")
                    .table(Subscription::Table)
                    .col(Subscription::UserId)
                    .col(Subscription::BillingDate)
                    .to_owned(),
            )
            .await?;

        // UserCredentials: lookup by user_id during login
        manager
            .create_index(
                Index::create()
                    .name("idx_user_credentials_user")
                    .table(UserCredentials::Table)
                    .col(UserCredentials::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_subscription_user_billing_date")
                    .table(Subscription::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_credentials_user")
                    .table(UserCredentials::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Subscription { Table, UserId, BillingDate }

#[derive(DeriveIden)]
enum UserCredentials { Table, UserId }
