//! Inventory audit trail, one row per sample operation

use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261019_000006_create_inventory_samples::InventorySamples;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryScanLogs::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryScanLogs::Id))
                    .col(integer(InventoryScanLogs::SampleId))
                    .col(string_len(InventoryScanLogs::Action, 30))
                    .col(string_null(InventoryScanLogs::ScannedBy))
                    .col(json_null(InventoryScanLogs::Details))
                    .col(timestamp_with_time_zone(InventoryScanLogs::Timestamp).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_scan_logs_sample_id")
                            .from(InventoryScanLogs::Table, InventoryScanLogs::SampleId)
                            .to(InventorySamples::Table, InventorySamples::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_scan_logs_sample_id")
                    .table(InventoryScanLogs::Table)
                    .col(InventoryScanLogs::SampleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_scan_logs_action")
                    .table(InventoryScanLogs::Table)
                    .col(InventoryScanLogs::Action)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryScanLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InventoryScanLogs {
    Table,
    Id,
    SampleId,
    Action,
    ScannedBy,
    Details,
    Timestamp,
}
