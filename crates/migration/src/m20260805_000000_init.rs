//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: one row per known Telegram account, keyed by the
//!   platform-assigned id
//! - `membership_events`: append-only join/leave audit trail

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    TelegramId,
    Username,
    FirstName,
    LastName,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
    LeftAt,
}

#[derive(Iden)]
enum MembershipEvents {
    Table,
    Id,
    TelegramId,
    ChatId,
    ChatTitle,
    Username,
    Event,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::TelegramId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string())
                    .col(ColumnDef::new(Users::FirstName).string())
                    .col(ColumnDef::new(Users::LastName).string())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::LeftAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-created_at")
                    .table(Users::Table)
                    .col(Users::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MembershipEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MembershipEvents::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MembershipEvents::TelegramId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MembershipEvents::ChatId).string().not_null())
                    .col(ColumnDef::new(MembershipEvents::ChatTitle).string())
                    .col(ColumnDef::new(MembershipEvents::Username).string())
                    .col(ColumnDef::new(MembershipEvents::Event).string().not_null())
                    .col(
                        ColumnDef::new(MembershipEvents::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-membership_events-telegram_id")
                    .table(MembershipEvents::Table)
                    .col(MembershipEvents::TelegramId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MembershipEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
