//! Create entry table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entry::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Entry::Date).date().not_null())
                    .col(ColumnDef::new(Entry::Seed).big_integer().not_null())
                    .col(ColumnDef::new(Entry::Prompt).text().not_null())
                    .col(ColumnDef::new(Entry::NegativePrompt).text().not_null())
                    .col(
                        ColumnDef::new(Entry::GenerationParams)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Entry::RawMetadata).text().not_null())
                    .col(
                        ColumnDef::new(Entry::Visibility)
                            .string_len(16)
                            .not_null()
                            .default("free"),
                    )
                    .col(ColumnDef::new(Entry::ImagePath).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(Entry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_user")
                            .from(Entry::Table, Entry::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, date) - the directory filter
        manager
            .create_index(
                Index::create()
                    .name("idx_entry_user_id_date")
                    .table(Entry::Table)
                    .col(Entry::UserId)
                    .col(Entry::Date)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, seed) - the grouping key
        manager
            .create_index(
                Index::create()
                    .name("idx_entry_user_id_seed")
                    .table(Entry::Table)
                    .col(Entry::UserId)
                    .col(Entry::Seed)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Entry {
    Table,
    Id,
    UserId,
    Date,
    Seed,
    Prompt,
    NegativePrompt,
    GenerationParams,
    RawMetadata,
    Visibility,
    ImagePath,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
