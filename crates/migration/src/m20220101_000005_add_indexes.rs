use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Notes: every query is scoped by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_notes_user")
                    .table(Notes::Table)
                    .col(Notes::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_notes_user").table(Notes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notes { Table, UserId }
