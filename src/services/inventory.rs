//! Inventory batches and individually barcoded samples
//!
//! Every sample mutation is committed together with its
//! `inventory_scan_logs` entry through the audit recorder.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, Order,
    QueryFilter, QueryOrder, Set,
};
use serde_json::json;
use tracing::info;

use crate::access::{Operation, Viewer};
use crate::entities::inventory_batches::{self, BatchStatus};
use crate::entities::inventory_samples::{self, SampleStatus};
use crate::entities::inventory_scan_logs::InventoryAction;
use crate::entities::prelude::*;
use crate::error::ServiceError;
use crate::models::inventory::{
    BatchDetailResponse, BatchListQuery, BatchStatusResponse, CreateBatchRequest,
    CreateSampleRequest, SampleDetailResponse,
};
use crate::services::audit::{self, SampleChange, SampleEvent};

fn batch_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Batch {} not found", id))
}

fn sample_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Sample {} not found", id))
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

async fn find_batch(
    db: &DatabaseConnection,
    id: i32,
) -> Result<inventory_batches::Model, ServiceError> {
    InventoryBatches::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| batch_not_found(id))
}

async fn find_sample(
    db: &DatabaseConnection,
    id: i32,
) -> Result<inventory_samples::Model, ServiceError> {
    InventorySamples::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| sample_not_found(id))
}

/// Log action recorded when a sample enters `status`
pub fn action_for_status(status: SampleStatus) -> InventoryAction {
    match status {
        SampleStatus::Allocated => InventoryAction::AllocatedToOrder,
        SampleStatus::Shipped => InventoryAction::SampleShipped,
        SampleStatus::Damaged | SampleStatus::Lost => InventoryAction::DamageReport,
        SampleStatus::InStock => InventoryAction::SampleScan,
    }
}

fn check_transition(
    sample: &inventory_samples::Model,
    next: SampleStatus,
) -> Result<(), ServiceError> {
    if sample.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(ServiceError::InvalidArgument(format!(
            "Sample {} cannot move from {} to {}",
            sample.barcode, sample.status, next
        )))
    }
}

pub async fn create_batch(
    db: &DatabaseConnection,
    viewer: &Viewer,
    request: &CreateBatchRequest,
) -> Result<inventory_batches::Model, ServiceError> {
    viewer.authorize(Operation::ManageInventory)?;

    let batch_id = request.batch_id.trim();
    if batch_id.is_empty() {
        return Err(ServiceError::InvalidArgument("Batch ID is required".to_string()));
    }
    if request.quantity <= 0 {
        return Err(ServiceError::InvalidArgument(format!(
            "Quantity must be positive, got {}",
            request.quantity
        )));
    }

    Products::find_by_id(request.product_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Product {} not found", request.product_id))
        })?;

    let existing = InventoryBatches::find()
        .filter(inventory_batches::Column::BatchId.eq(batch_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Batch {} already exists",
            batch_id
        )));
    }

    let now = Utc::now();
    let batch = inventory_batches::ActiveModel {
        batch_id: Set(batch_id.to_string()),
        batch_type: Set(request.batch_type),
        product_id: Set(request.product_id),
        quantity: Set(request.quantity),
        supplier_name: Set(trimmed(request.supplier_name.as_deref())),
        customer_name: Set(trimmed(request.customer_name.as_deref())),
        reference_number: Set(trimmed(request.reference_number.as_deref())),
        notes: Set(trimmed(request.notes.as_deref())),
        status: Set(BatchStatus::Pending),
        created_by: Set(viewer.actor().map(str::to_string)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        received_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        batch_id = %batch.batch_id,
        batch_type = ?batch.batch_type,
        quantity = batch.quantity,
        actor = ?viewer.actor(),
        "Inventory batch created"
    );

    Ok(batch)
}

/// Batches newest first, optionally filtered by type and status
pub async fn list_batches(
    db: &DatabaseConnection,
    viewer: &Viewer,
    query: &BatchListQuery,
) -> Result<Vec<inventory_batches::Model>, ServiceError> {
    viewer.authorize(Operation::ViewInventory)?;

    let mut select = InventoryBatches::find();
    if let Some(batch_type) = query.batch_type {
        select = select.filter(inventory_batches::Column::BatchType.eq(batch_type));
    }
    if let Some(status) = query.status {
        select = select.filter(inventory_batches::Column::Status.eq(status));
    }

    Ok(select
        .order_by(inventory_batches::Column::CreatedAt, Order::Desc)
        .order_by(inventory_batches::Column::Id, Order::Desc)
        .all(db)
        .await?)
}

pub async fn batch_detail(
    db: &DatabaseConnection,
    viewer: &Viewer,
    id: i32,
) -> Result<BatchDetailResponse, ServiceError> {
    viewer.authorize(Operation::ViewInventory)?;

    let batch = find_batch(db, id).await?;
    let product = batch.find_related(Products).one(db).await?;
    let samples = batch
        .find_related(InventorySamples)
        .order_by(inventory_samples::Column::SampleNumber, Order::Asc)
        .all(db)
        .await?;

    Ok(BatchDetailResponse {
        batch,
        product,
        samples,
    })
}

/// Move a batch forward. Entering `received` stamps the reception time and
/// logs `batch_received` for every sample in the batch.
pub async fn update_batch_status(
    db: &DatabaseConnection,
    viewer: &Viewer,
    id: i32,
    new_status: &str,
) -> Result<BatchStatusResponse, ServiceError> {
    viewer.authorize(Operation::ManageInventory)?;
    let status: BatchStatus = new_status.parse().map_err(ServiceError::InvalidArgument)?;

    let batch = find_batch(db, id).await?;
    if status <= batch.status {
        return Err(ServiceError::InvalidArgument(format!(
            "Batch {} cannot move from {} to {}",
            batch.batch_id, batch.status, status
        )));
    }

    let previous = batch.status;
    let now = Utc::now();
    // Reaching or skipping past `received` counts as reception
    let receives = previous < BatchStatus::Received && status >= BatchStatus::Received;
    let fan_out = receives.then(|| {
        SampleEvent::new(InventoryAction::BatchReceived, viewer.actor())
            .with_details(json!({ "batch_id": batch.batch_id }))
    });

    let mut active: inventory_batches::ActiveModel = batch.into();
    active.status = Set(status);
    active.updated_at = Set(now.into());
    if receives {
        active.received_at = Set(Some(now.into()));
    }

    let (batch, entries) = audit::commit_batch_change(db, active, fan_out).await?;

    info!(
        batch_id = %batch.batch_id,
        from = %previous,
        to = %status,
        logged_samples = entries.len(),
        "Batch status updated"
    );

    Ok(BatchStatusResponse {
        batch,
        logged_samples: entries.len(),
    })
}

/// Register a sample in a batch; barcode defaults to `{batch}-{number}`
pub async fn create_sample(
    db: &DatabaseConnection,
    viewer: &Viewer,
    batch_id: i32,
    request: &CreateSampleRequest,
) -> Result<inventory_samples::Model, ServiceError> {
    viewer.authorize(Operation::ManageInventory)?;

    let sample_number = request.sample_number.trim();
    if sample_number.is_empty() {
        return Err(ServiceError::InvalidArgument("Sample number is required".to_string()));
    }

    let batch = find_batch(db, batch_id).await?;
    let barcode = trimmed(request.barcode.as_deref())
        .unwrap_or_else(|| format!("{}-{}", batch.batch_id, sample_number));

    let numbered = InventorySamples::find()
        .filter(inventory_samples::Column::BatchId.eq(batch.id))
        .filter(inventory_samples::Column::SampleNumber.eq(sample_number))
        .one(db)
        .await?;
    if numbered.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Sample {} already exists in batch {}",
            sample_number, batch.batch_id
        )));
    }

    let barcoded = InventorySamples::find()
        .filter(inventory_samples::Column::Barcode.eq(barcode.as_str()))
        .one(db)
        .await?;
    if barcoded.is_some() {
        return Err(ServiceError::Conflict(format!(
            "A sample with barcode {} already exists",
            barcode
        )));
    }

    let now = Utc::now();
    let sample = inventory_samples::ActiveModel {
        batch_id: Set(batch.id),
        sample_number: Set(sample_number.to_string()),
        barcode: Set(barcode),
        status: Set(SampleStatus::InStock),
        order_id: Set(None),
        quality_checked: Set(false),
        quality_checked_by: Set(None),
        quality_check_date: Set(None),
        quality_notes: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let (sample, _) = audit::commit_sample_change(
        db,
        SampleChange::Create(sample),
        SampleEvent::new(InventoryAction::SampleScan, viewer.actor())
            .with_details(json!({ "event": "registered" })),
    )
    .await?;

    info!(
        sample_id = sample.id,
        barcode = %sample.barcode,
        batch_id = %batch.batch_id,
        "Sample registered"
    );

    Ok(sample)
}

pub async fn update_sample_status(
    db: &DatabaseConnection,
    viewer: &Viewer,
    id: i32,
    new_status: &str,
) -> Result<inventory_samples::Model, ServiceError> {
    viewer.authorize(Operation::ManageInventory)?;
    let status: SampleStatus = new_status.parse().map_err(ServiceError::InvalidArgument)?;

    let sample = find_sample(db, id).await?;
    check_transition(&sample, status)?;

    let previous = sample.status;
    let mut active: inventory_samples::ActiveModel = sample.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    // Back on the shelf means no longer reserved for an order
    if status == SampleStatus::InStock {
        active.order_id = Set(None);
    }

    let (sample, _) = audit::commit_sample_change(
        db,
        SampleChange::Update(active),
        SampleEvent::new(action_for_status(status), viewer.actor())
            .with_details(json!({ "from": previous.to_string(), "to": status.to_string() })),
    )
    .await?;

    info!(sample_id = id, from = %previous, to = %status, "Sample status updated");

    Ok(sample)
}

/// Reserve an in-stock sample for an order
pub async fn allocate_sample(
    db: &DatabaseConnection,
    viewer: &Viewer,
    id: i32,
    order_id: i32,
) -> Result<inventory_samples::Model, ServiceError> {
    viewer.authorize(Operation::ManageInventory)?;

    let sample = find_sample(db, id).await?;
    let order = Orders::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;
    check_transition(&sample, SampleStatus::Allocated)?;

    let mut active: inventory_samples::ActiveModel = sample.into();
    active.status = Set(SampleStatus::Allocated);
    active.order_id = Set(Some(order.id));
    active.updated_at = Set(Utc::now().into());

    let (sample, _) = audit::commit_sample_change(
        db,
        SampleChange::Update(active),
        SampleEvent::new(InventoryAction::AllocatedToOrder, viewer.actor())
            .with_details(json!({ "order_id": order.id, "order_barcode": order.barcode })),
    )
    .await?;

    info!(sample_id = id, order_id = order.id, "Sample allocated to order");

    Ok(sample)
}

pub async fn quality_check(
    db: &DatabaseConnection,
    viewer: &Viewer,
    id: i32,
    notes: Option<&str>,
) -> Result<inventory_samples::Model, ServiceError> {
    viewer.authorize(Operation::ManageInventory)?;

    let sample = find_sample(db, id).await?;
    let notes = trimmed(notes);

    let mut active: inventory_samples::ActiveModel = sample.into();
    active.quality_checked = Set(true);
    active.quality_checked_by = Set(viewer.actor().map(str::to_string));
    active.quality_check_date = Set(Some(Utc::now().into()));
    active.quality_notes = Set(notes.clone());
    active.updated_at = Set(Utc::now().into());

    let (sample, _) = audit::commit_sample_change(
        db,
        SampleChange::Update(active),
        SampleEvent::new(InventoryAction::QualityCheck, viewer.actor())
            .with_details(json!({ "notes": notes })),
    )
    .await?;

    info!(sample_id = id, actor = ?viewer.actor(), "Sample quality checked");

    Ok(sample)
}

/// Exact barcode lookup, ignoring surrounding whitespace; the scan is logged
pub async fn scan_sample(
    db: &DatabaseConnection,
    viewer: &Viewer,
    barcode: &str,
) -> Result<inventory_samples::Model, ServiceError> {
    viewer.authorize(Operation::ScanSample)?;
    let barcode = barcode.trim();

    let sample = InventorySamples::find()
        .filter(inventory_samples::Column::Barcode.eq(barcode))
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Sample with barcode {} not found", barcode))
        })?;

    audit::record_sample_event(
        db,
        sample.id,
        SampleEvent::new(InventoryAction::SampleScan, viewer.actor())
            .with_details(json!({ "barcode": barcode })),
    )
    .await?;

    Ok(sample)
}

/// Sample with its log, newest first
pub async fn sample_detail(
    db: &DatabaseConnection,
    viewer: &Viewer,
    id: i32,
) -> Result<SampleDetailResponse, ServiceError> {
    viewer.authorize(Operation::ViewInventory)?;

    let sample = find_sample(db, id).await?;
    let history = audit::sample_history(db, sample.id).await?;

    Ok(SampleDetailResponse { sample, history })
}
