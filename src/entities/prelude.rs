pub use super::image_attachments::Entity as ImageAttachments;
pub use super::inventory_batches::Entity as InventoryBatches;
pub use super::inventory_samples::Entity as InventorySamples;
pub use super::inventory_scan_logs::Entity as InventoryScanLogs;
pub use super::orders::Entity as Orders;
pub use super::products::Entity as Products;
pub use super::scan_logs::Entity as ScanLogs;
