use serde::{Deserialize, Serialize};

use crate::entities::products;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub barcode: String,
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    /// Case-insensitive substring of name, SKU or barcode
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<products::Model>,
}
