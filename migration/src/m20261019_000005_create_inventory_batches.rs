//! Supplier/customer inventory batches

use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261019_000001_create_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryBatches::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryBatches::Id))
                    .col(string_len_uniq(InventoryBatches::BatchId, 100))
                    .col(string_len(InventoryBatches::BatchType, 20))
                    .col(integer(InventoryBatches::ProductId))
                    .col(integer(InventoryBatches::Quantity))
                    .col(string_null(InventoryBatches::SupplierName))
                    .col(string_null(InventoryBatches::CustomerName))
                    .col(string_len_null(InventoryBatches::ReferenceNumber, 100))
                    .col(text_null(InventoryBatches::Notes))
                    .col(string_len(InventoryBatches::Status, 20).default("pending"))
                    .col(string_null(InventoryBatches::CreatedBy))
                    .col(timestamp_with_time_zone(InventoryBatches::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(InventoryBatches::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(InventoryBatches::ReceivedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_batches_product_id")
                            .from(InventoryBatches::Table, InventoryBatches::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_batches_batch_type")
                    .table(InventoryBatches::Table)
                    .col(InventoryBatches::BatchType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_batches_status")
                    .table(InventoryBatches::Table)
                    .col(InventoryBatches::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryBatches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum InventoryBatches {
    Table,
    Id,
    BatchId,
    BatchType,
    ProductId,
    Quantity,
    SupplierName,
    CustomerName,
    ReferenceNumber,
    Notes,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    ReceivedAt,
}
