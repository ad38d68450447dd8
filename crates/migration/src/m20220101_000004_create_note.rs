//! Create `notes` table.
//! Every note belongs to exactly one user and disappears with it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notes::Table)
                    .if_not_exists()
                    .col(pk_auto(Notes::Id))
                    .col(integer(Notes::UserId).not_null())
                    .col(string_len(Notes::Title, 255).not_null())
                    .col(text(Notes::Content).not_null())
                    .col(timestamp_with_time_zone(Notes::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Notes::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notes_user")
                            .from(Notes::Table, Notes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Notes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Notes { Table, Id, UserId, Title, Content, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
