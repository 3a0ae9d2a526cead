//! Individually barcoded samples within a batch

use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261019_000002_create_orders::Orders;
use crate::m20261019_000005_create_inventory_batches::InventoryBatches;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventorySamples::Table)
                    .if_not_exists()
                    .col(pk_auto(InventorySamples::Id))
                    .col(integer(InventorySamples::BatchId))
                    .col(string_len(InventorySamples::SampleNumber, 50))
                    .col(string_uniq(InventorySamples::Barcode))
                    .col(string_len(InventorySamples::Status, 20).default("in_stock"))
                    .col(integer_null(InventorySamples::OrderId))
                    .col(boolean(InventorySamples::QualityChecked).default(false))
                    .col(string_null(InventorySamples::QualityCheckedBy))
                    .col(timestamp_with_time_zone_null(InventorySamples::QualityCheckDate))
                    .col(text_null(InventorySamples::QualityNotes))
                    .col(timestamp_with_time_zone(InventorySamples::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(InventorySamples::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_samples_batch_id")
                            .from(InventorySamples::Table, InventorySamples::BatchId)
                            .to(InventoryBatches::Table, InventoryBatches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_samples_order_id")
                            .from(InventorySamples::Table, InventorySamples::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Sample numbers are unique within their batch
        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_samples_batch_sample_number")
                    .table(InventorySamples::Table)
                    .col(InventorySamples::BatchId)
                    .col(InventorySamples::SampleNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_samples_status")
                    .table(InventorySamples::Table)
                    .col(InventorySamples::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventorySamples::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum InventorySamples {
    Table,
    Id,
    BatchId,
    SampleNumber,
    Barcode,
    Status,
    OrderId,
    QualityChecked,
    QualityCheckedBy,
    QualityCheckDate,
    QualityNotes,
    CreatedAt,
    UpdatedAt,
}
