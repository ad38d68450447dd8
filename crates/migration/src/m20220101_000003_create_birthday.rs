//! Create `birthdays` table (one birth date per user, written at signup).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Birthdays::Table)
                    .if_not_exists()
                    .col(pk_auto(Birthdays::Id))
                    .col(integer(Birthdays::UserId).unique_key().not_null())
                    .col(date(Birthdays::Birth).not_null())
                    .col(timestamp_with_time_zone(Birthdays::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Birthdays::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_birthdays_user")
                            .from(Birthdays::Table, Birthdays::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Birthdays::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Birthdays { Table, Id, UserId, Birth, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
