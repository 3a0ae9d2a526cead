pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_products;
mod m20261019_000002_create_orders;
mod m20261019_000003_create_image_attachments;
mod m20261019_000004_create_scan_logs;
mod m20261019_000005_create_inventory_batches;
mod m20261019_000006_create_inventory_samples;
mod m20261019_000007_create_inventory_scan_logs;
mod m20261019_000008_audit_logs_immutable;
mod m20261019_000009_audit_logs_delete_guard;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_products::Migration),
            Box::new(m20261019_000002_create_orders::Migration),
            Box::new(m20261019_000003_create_image_attachments::Migration),
            Box::new(m20261019_000004_create_scan_logs::Migration),
            Box::new(m20261019_000005_create_inventory_batches::Migration),
            Box::new(m20261019_000006_create_inventory_samples::Migration),
            Box::new(m20261019_000007_create_inventory_scan_logs::Migration),
            Box::new(m20261019_000008_audit_logs_immutable::Migration),
            Box::new(m20261019_000009_audit_logs_delete_guard::Migration),
        ]
    }
}
