//! Customer orders. Deleting a product removes its orders.

use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261019_000001_create_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Foreign keys are declared inline: SQLite cannot add them to an existing table.
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(pk_auto(Orders::Id))
                    .col(string(Orders::Customer))
                    .col(integer(Orders::ProductId))
                    .col(integer(Orders::Quantity))
                    .col(string_len(Orders::Status, 20).default("new"))
                    .col(string_uniq(Orders::Barcode))
                    .col(text_null(Orders::Notes))
                    .col(string(Orders::CreatedBy))
                    .col(timestamp_with_time_zone(Orders::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Orders::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_product_id")
                            .from(Orders::Table, Orders::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_status")
                    .table(Orders::Table)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_created_at")
                    .table(Orders::Table)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Used by the warehouse_staff "own orders" views
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_created_by")
                    .table(Orders::Table)
                    .col(Orders::CreatedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Orders {
    Table,
    Id,
    Customer,
    ProductId,
    Quantity,
    Status,
    Barcode,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
