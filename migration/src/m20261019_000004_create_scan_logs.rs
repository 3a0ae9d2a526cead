//! Order audit trail (scans, status changes, uploads, notes, creation)

use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261019_000002_create_orders::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScanLogs::Table)
                    .if_not_exists()
                    .col(pk_auto(ScanLogs::Id))
                    .col(integer(ScanLogs::OrderId))
                    .col(string(ScanLogs::BarcodeData))
                    .col(string_null(ScanLogs::ScannedBy))
                    .col(string_len(ScanLogs::Action, 20))
                    .col(timestamp_with_time_zone(ScanLogs::ScannedAt).default(Expr::current_timestamp()))
                    .col(json_null(ScanLogs::Details))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scan_logs_order_id")
                            .from(ScanLogs::Table, ScanLogs::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scan_logs_order_id")
                    .table(ScanLogs::Table)
                    .col(ScanLogs::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scan_logs_action")
                    .table(ScanLogs::Table)
                    .col(ScanLogs::Action)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scan_logs_scanned_at")
                    .table(ScanLogs::Table)
                    .col(ScanLogs::ScannedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScanLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScanLogs {
    Table,
    Id,
    OrderId,
    BarcodeData,
    ScannedBy,
    Action,
    ScannedAt,
    Details,
}
