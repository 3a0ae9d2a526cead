//! Inventory batch and sample request/response models

use serde::{Deserialize, Serialize};

use crate::entities::inventory_batches::{self, BatchStatus, BatchType};
use crate::entities::{inventory_samples, inventory_scan_logs, products};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBatchRequest {
    pub batch_id: String,
    pub batch_type: BatchType,
    pub product_id: i32,
    pub quantity: i32,
    pub supplier_name: Option<String>,
    pub customer_name: Option<String>,
    /// PO/Invoice number
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchListQuery {
    pub batch_type: Option<BatchType>,
    pub status: Option<BatchStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchListResponse {
    pub batches: Vec<inventory_batches::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatusResponse {
    pub batch: inventory_batches::Model,
    /// Sample log entries written by this change
    pub logged_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDetailResponse {
    pub batch: inventory_batches::Model,
    pub product: Option<products::Model>,
    /// Ordered by sample number
    pub samples: Vec<inventory_samples::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSampleRequest {
    pub sample_number: String,
    /// Derived as `{batch_id}-{sample_number}` when absent or blank
    pub barcode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityCheckRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateSampleRequest {
    pub order_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleDetailResponse {
    pub sample: inventory_samples::Model,
    /// Newest first
    pub history: Vec<inventory_scan_logs::Model>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleScanQuery {
    pub barcode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleScanResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<inventory_samples::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
