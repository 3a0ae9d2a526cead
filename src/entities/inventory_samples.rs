//! SeaORM Entity for individually barcoded inventory samples

use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum SampleStatus {
    #[sea_orm(string_value = "in_stock")]
    InStock,
    #[sea_orm(string_value = "allocated")]
    Allocated,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "damaged")]
    Damaged,
    #[sea_orm(string_value = "lost")]
    Lost,
}

impl SampleStatus {
    /// Whether a sample in this status may move to `next`.
    ///
    /// `in_stock <-> allocated <-> shipped` along the chain, any live status
    /// may be written off as damaged or lost, a damaged sample may later be
    /// declared lost, and lost is final.
    pub fn can_transition_to(self, next: SampleStatus) -> bool {
        use SampleStatus::*;

        matches!(
            (self, next),
            (InStock, Allocated)
                | (Allocated, InStock)
                | (Allocated, Shipped)
                | (Shipped, Allocated)
                | (InStock | Allocated | Shipped, Damaged)
                | (InStock | Allocated | Shipped | Damaged, Lost)
        )
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

impl FromStr for SampleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|status| status.to_value() == s)
            .ok_or_else(|| format!("Unknown sample status '{}'", s))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_samples")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub batch_id: i32,
    /// Unique within the batch, e.g. "001"
    pub sample_number: String,
    /// Defaults to `{batch.batch_id}-{sample_number}`
    #[sea_orm(unique)]
    pub barcode: String,
    pub status: SampleStatus,
    /// Set when the sample is allocated to an outgoing order
    pub order_id: Option<i32>,
    pub quality_checked: bool,
    pub quality_checked_by: Option<String>,
    pub quality_check_date: Option<DateTimeWithTimeZone>,
    pub quality_notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_batches::Entity",
        from = "Column::BatchId",
        to = "super::inventory_batches::Column::Id",
        on_delete = "Cascade"
    )]
    InventoryBatches,
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_delete = "SetNull"
    )]
    Orders,
    #[sea_orm(has_many = "super::inventory_scan_logs::Entity")]
    InventoryScanLogs,
}

impl Related<super::inventory_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryBatches.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::inventory_scan_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryScanLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
