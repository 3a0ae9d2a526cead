//! Order request/response models

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entities::{image_attachments, orders, products, scan_logs};

fn default_quantity() -> i32 {
    1
}

/// Body of POST /orders/create/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer: String,
    pub product_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Generated as `ORD-<unix timestamp>` when absent or blank
    pub barcode: Option<String>,
    pub notes: Option<String>,
}

/// Body of POST /orders/{id}/update-status/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// Kept as a string so unknown values reach the service and fail there
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddNoteRequest {
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachImageRequest {
    /// Stored image reference (path or URL)
    pub image: String,
}

/// Query parameters for GET /orders/
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    /// Exact status match; blank means no filter
    pub status: Option<String>,
    /// Case-insensitive substring of customer, barcode or product name
    pub search: Option<String>,
    /// Created on or after this date (UTC)
    pub from: Option<NaiveDate>,
    /// Created on or before this date (UTC)
    pub to: Option<NaiveDate>,
}

impl OrderListQuery {
    /// Validate query parameters
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err("from must not be after to".to_string());
            }
        }
        Ok(())
    }

    pub fn status_filter(&self) -> Option<&str> {
        self.status.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn search_filter(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Single row in order listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i32,
    pub customer: String,
    pub product_id: i32,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub status: orders::OrderStatus,
    pub barcode: String,
    pub created_by: String,
    pub created_at: DateTime<FixedOffset>,
}

impl OrderSummary {
    pub fn new(order: orders::Model, product: Option<products::Model>) -> Self {
        Self {
            id: order.id,
            customer: order.customer,
            product_id: order.product_id,
            product_name: product.map(|p| p.name),
            quantity: order.quantity,
            status: order.status,
            barcode: order.barcode,
            created_by: order.created_by,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderSummary>,
    pub selected_status: Option<String>,
}

/// Products offered by GET /orders/create/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderFormResponse {
    pub products: Vec<products::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetailResponse {
    pub order: orders::Model,
    pub product: Option<products::Model>,
    /// Newest first
    pub images: Vec<image_attachments::Model>,
    /// Newest first
    pub scans: Vec<scan_logs::Model>,
}

/// Barcode scan input, from the query string (GET) or the body (POST)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanRequest {
    pub barcode: Option<String>,
}

/// Scan outcome. A miss is reported in `error` rather than as an HTTP error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<orders::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_validation_valid() {
        let query = OrderListQuery {
            status: Some("new".to_string()),
            search: Some("acme".to_string()),
            from: NaiveDate::from_ymd_opt(2026, 1, 1),
            to: NaiveDate::from_ymd_opt(2026, 1, 31),
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_validation_inverted_range() {
        let query = OrderListQuery {
            from: NaiveDate::from_ymd_opt(2026, 2, 1),
            to: NaiveDate::from_ymd_opt(2026, 1, 1),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = OrderListQuery {
            status: Some("".to_string()),
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.status_filter(), None);
        assert_eq!(query.search_filter(), None);
    }

    #[test]
    fn test_create_request_defaults_quantity() {
        let req: CreateOrderRequest =
            serde_json::from_str(r#"{"customer":"Acme","product_id":3}"#).unwrap();
        assert_eq!(req.quantity, 1);
        assert!(req.barcode.is_none());
    }
}
