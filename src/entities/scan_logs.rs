//! SeaORM Entity for the order audit trail
//!
//! Rows are write-once: the model hooks refuse updates and deletes, and the
//! schema carries a trigger rejecting UPDATE statements. Rows only disappear
//! through the cascade when their order is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ScanAction {
    #[sea_orm(string_value = "scan")]
    Scan,
    #[sea_orm(string_value = "status_change")]
    StatusChange,
    #[sea_orm(string_value = "image_upload")]
    ImageUpload,
    #[sea_orm(string_value = "note_added")]
    NoteAdded,
    #[sea_orm(string_value = "order_created")]
    OrderCreated,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "scan_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: i32,
    /// Raw barcode string involved in the action
    pub barcode_data: String,
    pub scanned_by: Option<String>,
    pub action: ScanAction,
    pub scanned_at: DateTimeWithTimeZone,
    /// Free-form payload, e.g. `{"new_status": "shipped"}`
    pub details: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_delete = "Cascade"
    )]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            Ok(self)
        } else {
            Err(DbErr::Custom("scan_logs rows are immutable".to_string()))
        }
    }

    async fn before_delete<C>(self, _db: &C) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        Err(DbErr::Custom("scan_logs rows cannot be deleted".to_string()))
    }
}
