//! Shared fixtures for unit tests: a migrated in-memory SQLite database and
//! a few seed helpers that write rows directly.

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use crate::access::{Identity, Viewer};
use crate::entities::inventory_batches::{self, BatchStatus, BatchType};
use crate::entities::inventory_samples::{self, SampleStatus};
use crate::entities::{orders, products};

pub async fn setup_db() -> DatabaseConnection {
    // One connection: every connection to sqlite::memory: is a separate database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn seed_product(db: &DatabaseConnection, sku: &str) -> products::Model {
    let now = Utc::now();
    products::ActiveModel {
        name: Set(format!("Product {}", sku)),
        sku: Set(sku.to_string()),
        barcode: Set(format!("BC-{}", sku)),
        description: Set(None),
        quantity: Set(10),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed product")
}

pub async fn seed_order(
    db: &DatabaseConnection,
    product: &products::Model,
    barcode: &str,
    created_by: &str,
) -> orders::Model {
    let now = Utc::now();
    orders::ActiveModel {
        customer: Set("Acme Labs".to_string()),
        product_id: Set(product.id),
        quantity: Set(1),
        status: Set(orders::OrderStatus::New),
        barcode: Set(barcode.to_string()),
        notes: Set(None),
        created_by: Set(created_by.to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed order")
}

/// A pending incoming batch of `product` holding one in-stock sample
pub async fn seed_sample(
    db: &DatabaseConnection,
    product: &products::Model,
    barcode: &str,
) -> inventory_samples::Model {
    let now = Utc::now();
    let batch = inventory_batches::ActiveModel {
        batch_id: Set(format!("BATCH-{}", barcode)),
        batch_type: Set(BatchType::Incoming),
        product_id: Set(product.id),
        quantity: Set(1),
        status: Set(BatchStatus::Pending),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed batch");

    inventory_samples::ActiveModel {
        batch_id: Set(batch.id),
        sample_number: Set("S-1".to_string()),
        barcode: Set(barcode.to_string()),
        status: Set(SampleStatus::InStock),
        quality_checked: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed sample")
}

pub fn admin() -> Viewer {
    Viewer::new(Identity::superuser("admin"))
}

pub fn viewer(username: &str, group: &str) -> Viewer {
    Viewer::new(Identity::user(username, &[group]))
}
