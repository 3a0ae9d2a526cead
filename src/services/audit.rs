//! Audit trail recorder
//!
//! Append-only logs for orders (`scan_logs`) and inventory samples
//! (`inventory_scan_logs`). Entries are only ever inserted; this module offers
//! no update or delete path, and the entities themselves reject both.
//!
//! Order and sample writes go through [`commit_order_change`] and
//! [`commit_sample_change`], which apply the entity change and append its log
//! entry in a single transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Order,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::entities::inventory_scan_logs::{self, InventoryAction};
use crate::entities::scan_logs::{self, ScanAction};
use crate::entities::{image_attachments, inventory_batches, inventory_samples, orders, prelude::*};
use crate::error::ServiceError;

/// An order-affecting action and the identity that performed it
#[derive(Clone, Debug)]
pub struct OrderEvent {
    pub action: ScanAction,
    pub actor: Option<String>,
    /// Raw barcode involved; defaults to the order's own barcode
    pub barcode: Option<String>,
    pub details: Option<Value>,
}

impl OrderEvent {
    pub fn new(action: ScanAction, actor: Option<&str>) -> Self {
        Self {
            action,
            actor: actor.map(str::to_string),
            barcode: None,
            details: None,
        }
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// An inventory action on a sample and the identity that performed it
#[derive(Clone, Debug)]
pub struct SampleEvent {
    pub action: InventoryAction,
    pub actor: Option<String>,
    pub details: Option<Value>,
}

impl SampleEvent {
    pub fn new(action: InventoryAction, actor: Option<&str>) -> Self {
        Self {
            action,
            actor: actor.map(str::to_string),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Entity change that is persisted together with its audit entry
pub enum OrderChange {
    Create(orders::ActiveModel),
    Update(orders::ActiveModel),
    Attach {
        order: orders::Model,
        image: image_attachments::ActiveModel,
    },
}

#[derive(Debug)]
pub struct OrderCommit {
    pub order: orders::Model,
    pub attachment: Option<image_attachments::Model>,
    pub entry: scan_logs::Model,
}

pub enum SampleChange {
    Create(inventory_samples::ActiveModel),
    Update(inventory_samples::ActiveModel),
}

/// Apply an order change and append its log entry atomically.
///
/// If either write fails the transaction is dropped uncommitted, so no order
/// change is ever visible without its entry.
pub async fn commit_order_change(
    db: &DatabaseConnection,
    change: OrderChange,
    mut event: OrderEvent,
) -> Result<OrderCommit, ServiceError> {
    let txn = db.begin().await?;

    let (order, attachment) = match change {
        OrderChange::Create(active) => (active.insert(&txn).await?, None),
        OrderChange::Update(active) => (active.update(&txn).await?, None),
        OrderChange::Attach { order, image } => {
            let attachment = image.insert(&txn).await?;
            let mut details = event.details.take().unwrap_or_else(|| json!({}));
            if let Some(map) = details.as_object_mut() {
                map.insert("attachment_id".to_string(), json!(attachment.id));
            }
            event.details = Some(details);
            (order, Some(attachment))
        }
    };

    let entry = append_order_entry(&txn, &order, event).await?;
    txn.commit().await?;

    debug!(
        order_id = order.id,
        entry_id = entry.id,
        action = ?entry.action,
        "Order change committed"
    );

    Ok(OrderCommit {
        order,
        attachment,
        entry,
    })
}

/// Append an entry for an existing order without changing the order itself
pub async fn record_order_event(
    db: &DatabaseConnection,
    order_id: i32,
    event: OrderEvent,
) -> Result<scan_logs::Model, ServiceError> {
    let order = Orders::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

    Ok(append_order_entry(db, &order, event).await?)
}

async fn append_order_entry<C>(
    conn: &C,
    order: &orders::Model,
    event: OrderEvent,
) -> Result<scan_logs::Model, DbErr>
where
    C: ConnectionTrait,
{
    scan_logs::ActiveModel {
        order_id: Set(order.id),
        barcode_data: Set(event.barcode.unwrap_or_else(|| order.barcode.clone())),
        scanned_by: Set(event.actor),
        action: Set(event.action),
        scanned_at: Set(Utc::now().into()),
        details: Set(event.details),
        ..Default::default()
    }
    .insert(conn)
    .await
}

/// Apply a sample change and append its inventory log entry atomically
pub async fn commit_sample_change(
    db: &DatabaseConnection,
    change: SampleChange,
    event: SampleEvent,
) -> Result<(inventory_samples::Model, inventory_scan_logs::Model), ServiceError> {
    let txn = db.begin().await?;

    let sample = match change {
        SampleChange::Create(active) => active.insert(&txn).await?,
        SampleChange::Update(active) => active.update(&txn).await?,
    };

    let entry = append_sample_entry(&txn, sample.id, event).await?;
    txn.commit().await?;

    debug!(
        sample_id = sample.id,
        entry_id = entry.id,
        action = ?entry.action,
        "Sample change committed"
    );

    Ok((sample, entry))
}

/// Update a batch; when `fan_out` is given, every sample of the batch gets
/// that entry in the same transaction.
pub async fn commit_batch_change(
    db: &DatabaseConnection,
    batch: inventory_batches::ActiveModel,
    fan_out: Option<SampleEvent>,
) -> Result<(inventory_batches::Model, Vec<inventory_scan_logs::Model>), ServiceError> {
    let txn = db.begin().await?;

    let batch = batch.update(&txn).await?;

    let mut entries = Vec::new();
    if let Some(event) = fan_out {
        let samples = InventorySamples::find()
            .filter(inventory_samples::Column::BatchId.eq(batch.id))
            .order_by_asc(inventory_samples::Column::SampleNumber)
            .all(&txn)
            .await?;

        for sample in samples {
            entries.push(append_sample_entry(&txn, sample.id, event.clone()).await?);
        }
    }

    txn.commit().await?;

    debug!(
        batch_id = %batch.batch_id,
        status = %batch.status,
        entries = entries.len(),
        "Batch change committed"
    );

    Ok((batch, entries))
}

/// Append an entry for an existing sample without changing the sample itself
pub async fn record_sample_event(
    db: &DatabaseConnection,
    sample_id: i32,
    event: SampleEvent,
) -> Result<inventory_scan_logs::Model, ServiceError> {
    InventorySamples::find_by_id(sample_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Sample {} not found", sample_id)))?;

    Ok(append_sample_entry(db, sample_id, event).await?)
}

async fn append_sample_entry<C>(
    conn: &C,
    sample_id: i32,
    event: SampleEvent,
) -> Result<inventory_scan_logs::Model, DbErr>
where
    C: ConnectionTrait,
{
    inventory_scan_logs::ActiveModel {
        sample_id: Set(sample_id),
        action: Set(event.action),
        scanned_by: Set(event.actor),
        details: Set(event.details),
        timestamp: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

/// Entries for an order, newest first
pub async fn order_history(
    db: &DatabaseConnection,
    order_id: i32,
) -> Result<Vec<scan_logs::Model>, DbErr> {
    ScanLogs::find()
        .filter(scan_logs::Column::OrderId.eq(order_id))
        .order_by(scan_logs::Column::ScannedAt, Order::Desc)
        .order_by(scan_logs::Column::Id, Order::Desc)
        .all(db)
        .await
}

/// Entries for a sample, newest first
pub async fn sample_history(
    db: &DatabaseConnection,
    sample_id: i32,
) -> Result<Vec<inventory_scan_logs::Model>, DbErr> {
    InventoryScanLogs::find()
        .filter(inventory_scan_logs::Column::SampleId.eq(sample_id))
        .order_by(inventory_scan_logs::Column::Timestamp, Order::Desc)
        .order_by(inventory_scan_logs::Column::Id, Order::Desc)
        .all(db)
        .await
}
