//! Migration: Create the todos table with soft-delete columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Todos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Todos::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Todos::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Todos::Description).string_len(500).null())
                    .col(
                        ColumnDef::new(Todos::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Todos::Priority)
                            .string_len(10)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Todos::DueDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Todos::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Todos::EditedBy).uuid().null())
                    .col(ColumnDef::new(Todos::DeletedBy).uuid().null())
                    .col(
                        ColumnDef::new(Todos::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Todos::AssignedTo).json_binary().not_null())
                    .col(
                        ColumnDef::new(Todos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Todos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Soft-delete filtering hits every read path
        manager
            .create_index(
                Index::create()
                    .name("idx_todos_deleted_at")
                    .table(Todos::Table)
                    .col(Todos::DeletedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_todos_created_at")
                    .table(Todos::Table)
                    .col(Todos::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_todos_completed_priority")
                    .table(Todos::Table)
                    .col(Todos::Completed)
                    .col(Todos::Priority)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Todos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Todos {
    Table,
    Id,
    Title,
    Description,
    Completed,
    Priority,
    DueDate,
    CreatedBy,
    EditedBy,
    DeletedBy,
    DeletedAt,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}
