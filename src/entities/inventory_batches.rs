//! SeaORM Entity for inventory batches (incoming from suppliers, outgoing to customers)

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
pub enum BatchType {
    #[sea_orm(string_value = "incoming")]
    Incoming,
    #[sea_orm(string_value = "outgoing")]
    Outgoing,
}

/// Batch progression, declared in order. Batches only move forward.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "received")]
    Received,
    #[sea_orm(string_value = "verified")]
    Verified,
    #[sea_orm(string_value = "stored")]
    Stored,
    #[sea_orm(string_value = "shipped")]
    Shipped,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

impl FromStr for BatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|status| status.to_value() == s)
            .ok_or_else(|| format!("Unknown batch status '{}'", s))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_batches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// External batch identifier, e.g. "B100"
    #[sea_orm(unique)]
    pub batch_id: String,
    pub batch_type: BatchType,
    pub product_id: i32,
    /// Total quantity in batch
    pub quantity: i32,
    /// For incoming batches
    pub supplier_name: Option<String>,
    /// For outgoing batches
    pub customer_name: Option<String>,
    /// PO/Invoice number
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub status: BatchStatus,
    pub created_by: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub received_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Cascade"
    )]
    Products,
    #[sea_orm(has_many = "super::inventory_samples::Entity")]
    InventorySamples,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::inventory_samples::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventorySamples.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
