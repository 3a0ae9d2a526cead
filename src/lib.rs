// src/lib.rs

use axum::{
    routing::{delete, get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
}

pub mod entities {
    pub mod prelude;
    pub mod image_attachments;
    pub mod inventory_batches;
    pub mod inventory_samples;
    pub mod inventory_scan_logs;
    pub mod orders;
    pub mod products;
    pub mod scan_logs;
}

pub mod services {
    pub mod audit;
    pub mod dashboard;
    pub mod inventory;
    pub mod orders;
    pub mod products;
    pub mod search;
}

pub mod access;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

/// All routes, with request tracing and CORS applied
pub fn build_router(state: AppState) -> Router {
    use handlers::{dashboard, inventory, orders, products, scan};

    Router::new()
        .route("/", get(dashboard::get_dashboard))
        // Orders
        .route("/orders/", get(orders::list_orders))
        .route(
            "/orders/create/",
            get(orders::create_order_form).post(orders::create_order),
        )
        .route(
            "/orders/{id}/",
            get(orders::get_order).delete(orders::delete_order),
        )
        .route("/orders/{id}/update-status/", post(orders::update_status))
        .route("/orders/{id}/notes/", post(orders::add_note))
        .route("/orders/{id}/images/", post(orders::attach_image))
        .route("/scan/", get(scan::scan_get).post(scan::scan_post))
        // Products
        .route(
            "/products/",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/{id}/", delete(products::delete_product))
        // Inventory
        .route(
            "/inventory/batches/",
            get(inventory::list_batches).post(inventory::create_batch),
        )
        .route("/inventory/batches/{id}/", get(inventory::get_batch))
        .route(
            "/inventory/batches/{id}/status/",
            post(inventory::update_batch_status),
        )
        .route(
            "/inventory/batches/{id}/samples/",
            post(inventory::create_sample),
        )
        .route("/inventory/samples/{id}/", get(inventory::get_sample))
        .route(
            "/inventory/samples/{id}/status/",
            post(inventory::update_sample_status),
        )
        .route(
            "/inventory/samples/{id}/quality-check/",
            post(inventory::quality_check),
        )
        .route(
            "/inventory/samples/{id}/allocate/",
            post(inventory::allocate_sample),
        )
        .route("/inventory/scan/", get(inventory::scan_sample))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
