//! Create blocked_ranges table
//!
//! Closed date intervals during which a room cannot be booked.

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
                    .table(BlockedRanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlockedRanges::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlockedRanges::RoomId).integer().not_null())
                    .col(ColumnDef::new(BlockedRanges::StartDate).date().not_null())
                    .col(ColumnDef::new(BlockedRanges::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(BlockedRanges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blocked_ranges_room")
                            .from(BlockedRanges::Table, BlockedRanges::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blocked_ranges_room_start")
                    .table(BlockedRanges::Table)
                    .col(BlockedRanges::RoomId)
                    .col(BlockedRanges::StartDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlockedRanges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BlockedRanges {
    Table,
    Id,
    RoomId,
    StartDate,
    EndDate,
    CreatedAt,
}
