//! Create common_tag table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommonTag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommonTag::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommonTag::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(CommonTag::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(CommonTag::Count)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CommonTag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CommonTag::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_common_tag_user")
                            .from(CommonTag::Table, CommonTag::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, name)
        manager
            .create_index(
                Index::create()
                    .name("idx_common_tag_user_id_name")
                    .table(CommonTag::Table)
                    .col(CommonTag::UserId)
                    .col(CommonTag::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, count) - listing is always count-descending
        manager
            .create_index(
                Index::create()
                    .name("idx_common_tag_user_id_count")
                    .table(CommonTag::Table)
                    .col(CommonTag::UserId)
                    .col(CommonTag::Count)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommonTag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CommonTag {
    Table,
    Id,
    UserId,
    Name,
    Count,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
