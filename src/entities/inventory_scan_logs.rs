//! SeaORM Entity for the inventory audit trail. Write-once, like `scan_logs`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
#[serde(rename_all = "snake_case")]
pub enum InventoryAction {
    #[sea_orm(string_value = "batch_received")]
    BatchReceived,
    #[sea_orm(string_value = "sample_scan")]
    SampleScan,
    #[sea_orm(string_value = "quality_check")]
    QualityCheck,
    #[sea_orm(string_value = "allocated_to_order")]
    AllocatedToOrder,
    #[sea_orm(string_value = "damage_report")]
    DamageReport,
    #[sea_orm(string_value = "sample_shipped")]
    SampleShipped,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_scan_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sample_id: i32,
    pub action: InventoryAction,
    pub scanned_by: Option<String>,
    /// Additional data like location or condition
    pub details: Option<Json>,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_samples::Entity",
        from = "Column::SampleId",
        to = "super::inventory_samples::Column::Id",
        on_delete = "Cascade"
    )]
    InventorySamples,
}

impl Related<super::inventory_samples::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventorySamples.def()
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
            Err(DbErr::Custom(
                "inventory_scan_logs rows are immutable".to_string(),
            ))
        }
    }

    async fn before_delete<C>(self, _db: &C) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        Err(DbErr::Custom(
            "inventory_scan_logs rows cannot be deleted".to_string(),
        ))
    }
}
