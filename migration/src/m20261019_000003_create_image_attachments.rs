//! Image references attached to orders

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
                    .table(ImageAttachments::Table)
                    .if_not_exists()
                    .col(pk_auto(ImageAttachments::Id))
                    .col(integer(ImageAttachments::OrderId))
                    .col(string(ImageAttachments::Image))
                    .col(string_null(ImageAttachments::UploadedBy))
                    .col(timestamp_with_time_zone(ImageAttachments::UploadedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_image_attachments_order_id")
                            .from(ImageAttachments::Table, ImageAttachments::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_image_attachments_order_id")
                    .table(ImageAttachments::Table)
                    .col(ImageAttachments::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ImageAttachments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ImageAttachments {
    Table,
    Id,
    OrderId,
    Image,
    UploadedBy,
    UploadedAt,
}
