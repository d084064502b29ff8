//! Create rate_plans table
//!
//! Only the codes are read by the availability service; they key the
//! entries sent to the external inventory system.

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_rooms::Rooms;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RatePlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RatePlans::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RatePlans::RoomId).integer().not_null())
                    .col(ColumnDef::new(RatePlans::Code).string().not_null())
                    .col(ColumnDef::new(RatePlans::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rate_plans_room")
                            .from(RatePlans::Table, RatePlans::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rate_plans_room_code")
                    .table(RatePlans::Table)
                    .col(RatePlans::RoomId)
                    .col(RatePlans::Code)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RatePlans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RatePlans {
    Table,
    Id,
    RoomId,
    Code,
    Name,
}
