//! Order lifecycle service
//!
//! Creation, status changes, notes, image attachments and barcode scans. Every
//! write goes through the audit recorder so it lands together with its
//! `scan_logs` entry.

use chrono::{Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde_json::json;
use tracing::info;

use crate::access::{Access, Operation, Viewer};
use crate::entities::orders::{self, OrderStatus};
use crate::entities::scan_logs::ScanAction;
use crate::entities::{image_attachments, prelude::*, products};
use crate::error::ServiceError;
use crate::models::order::{
    CreateOrderFormResponse, CreateOrderRequest, OrderDetailResponse, OrderListQuery,
    OrderSummary,
};
use crate::services::audit::{self, OrderChange, OrderEvent};
use crate::services::search::icontains;

/// Barcode for orders created without one
pub fn generate_barcode() -> String {
    format!("ORD-{}", Utc::now().timestamp())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn barcode_not_found(barcode: &str) -> ServiceError {
    ServiceError::NotFound(format!("Order with barcode {} not found", barcode))
}

fn order_not_found(order_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Order {} not found", order_id))
}

/// Midnight UTC at the start of `date`
fn start_of_day(date: NaiveDate) -> chrono::DateTime<chrono::FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

/// Load an order the viewer is allowed to see.
///
/// Orders outside an own-only grant are reported exactly like missing ones,
/// so their existence is not revealed.
async fn find_visible_order(
    db: &DatabaseConnection,
    viewer: &Viewer,
    access: Access,
    order_id: i32,
) -> Result<orders::Model, ServiceError> {
    let order = Orders::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;

    if !viewer.can_see(access, &order.created_by) {
        return Err(order_not_found(order_id));
    }

    Ok(order)
}

async fn ensure_barcode_free(db: &DatabaseConnection, barcode: &str) -> Result<(), ServiceError> {
    let existing = Orders::find()
        .filter(orders::Column::Barcode.eq(barcode))
        .one(db)
        .await?;

    match existing {
        Some(_) => Err(ServiceError::Conflict(format!(
            "An order with barcode {} already exists",
            barcode
        ))),
        None => Ok(()),
    }
}

/// `generate_barcode`, suffixed `-2`, `-3`, ... while earlier orders in the
/// same second hold the plain value
async fn free_generated_barcode(db: &DatabaseConnection) -> Result<String, ServiceError> {
    let base = generate_barcode();
    let taken: Vec<String> = Orders::find()
        .select_only()
        .column(orders::Column::Barcode)
        .filter(orders::Column::Barcode.starts_with(&base))
        .into_tuple()
        .all(db)
        .await?;

    let mut candidate = base.clone();
    let mut suffix = 1;
    while taken.contains(&candidate) {
        suffix += 1;
        candidate = format!("{}-{}", base, suffix);
    }
    Ok(candidate)
}

/// Products offered when creating an order, by name
pub async fn create_order_form(
    db: &DatabaseConnection,
    viewer: &Viewer,
) -> Result<CreateOrderFormResponse, ServiceError> {
    viewer.authorize(Operation::CreateOrder)?;

    let products = Products::find()
        .order_by(products::Column::Name, Order::Asc)
        .all(db)
        .await?;

    Ok(CreateOrderFormResponse { products })
}

/// Create an order in status `new` together with its `order_created` entry
pub async fn create_order(
    db: &DatabaseConnection,
    viewer: &Viewer,
    request: &CreateOrderRequest,
) -> Result<orders::Model, ServiceError> {
    viewer.authorize(Operation::CreateOrder)?;

    let customer = request.customer.trim();
    if customer.is_empty() {
        return Err(ServiceError::InvalidArgument("Customer is required".to_string()));
    }
    if request.quantity <= 0 {
        return Err(ServiceError::InvalidArgument(format!(
            "Quantity must be positive, got {}",
            request.quantity
        )));
    }

    let product = Products::find_by_id(request.product_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Product {} not found", request.product_id))
        })?;

    let barcode = match non_blank(request.barcode.as_deref()) {
        Some(barcode) => {
            ensure_barcode_free(db, &barcode).await?;
            barcode
        }
        None => free_generated_barcode(db).await?,
    };

    let now = Utc::now();
    let order = orders::ActiveModel {
        customer: Set(customer.to_string()),
        product_id: Set(product.id),
        quantity: Set(request.quantity),
        status: Set(OrderStatus::New),
        barcode: Set(barcode),
        notes: Set(non_blank(request.notes.as_deref())),
        created_by: Set(viewer.creator()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let commit = audit::commit_order_change(
        db,
        OrderChange::Create(order),
        OrderEvent::new(ScanAction::OrderCreated, viewer.actor()),
    )
    .await?;

    info!(
        order_id = commit.order.id,
        barcode = %commit.order.barcode,
        product = %product.sku,
        created_by = %commit.order.created_by,
        "Order created"
    );

    Ok(commit.order)
}

/// Set an order's status. Any status may follow any other.
pub async fn update_status(
    db: &DatabaseConnection,
    viewer: &Viewer,
    order_id: i32,
    new_status: &str,
) -> Result<orders::Model, ServiceError> {
    let access = viewer.authorize(Operation::UpdateOrderStatus)?;
    let status: OrderStatus = new_status.parse().map_err(ServiceError::InvalidArgument)?;

    let order = find_visible_order(db, viewer, access, order_id).await?;
    let previous = order.status;

    let mut active: orders::ActiveModel = order.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());

    let commit = audit::commit_order_change(
        db,
        OrderChange::Update(active),
        OrderEvent::new(ScanAction::StatusChange, viewer.actor())
            .with_details(json!({ "new_status": status.to_string() })),
    )
    .await?;

    info!(
        order_id,
        from = %previous,
        to = %status,
        actor = ?viewer.actor(),
        "Order status updated"
    );

    Ok(commit.order)
}

/// Exact barcode lookup, ignoring surrounding whitespace
pub async fn lookup_by_barcode(
    db: &DatabaseConnection,
    barcode: &str,
) -> Result<orders::Model, ServiceError> {
    let barcode = barcode.trim();

    Orders::find()
        .filter(orders::Column::Barcode.eq(barcode))
        .one(db)
        .await?
        .ok_or_else(|| barcode_not_found(barcode))
}

/// Look up a scanned barcode and record the scan against the order
pub async fn scan_barcode(
    db: &DatabaseConnection,
    viewer: &Viewer,
    barcode: &str,
) -> Result<orders::Model, ServiceError> {
    let access = viewer.authorize(Operation::ScanBarcode)?;
    let barcode = barcode.trim();

    let order = lookup_by_barcode(db, barcode).await?;
    if !viewer.can_see(access, &order.created_by) {
        return Err(barcode_not_found(barcode));
    }

    audit::record_order_event(
        db,
        order.id,
        OrderEvent::new(ScanAction::Scan, viewer.actor()).with_barcode(barcode),
    )
    .await?;

    info!(order_id = order.id, barcode = %barcode, actor = ?viewer.actor(), "Barcode scanned");

    Ok(order)
}

/// Filtered order listing, newest first
pub async fn list_orders(
    db: &DatabaseConnection,
    viewer: &Viewer,
    query: &OrderListQuery,
    limit: u64,
) -> Result<Vec<OrderSummary>, ServiceError> {
    let access = viewer.authorize(Operation::ListOrders)?;
    query.validate().map_err(ServiceError::InvalidArgument)?;

    let mut select = Orders::find().find_also_related(Products);

    if let Some(status) = query.status_filter() {
        let status: OrderStatus = status.parse().map_err(ServiceError::InvalidArgument)?;
        select = select.filter(orders::Column::Status.eq(status));
    }

    if let Some(search) = query.search_filter() {
        select = select.filter(
            Condition::any()
                .add(icontains((Orders, orders::Column::Customer), search))
                .add(icontains((Orders, orders::Column::Barcode), search))
                .add(icontains((Products, products::Column::Name), search)),
        );
    }

    if let Some(from) = query.from {
        select = select.filter(orders::Column::CreatedAt.gte(start_of_day(from)));
    }
    if let Some(next_day) = query.to.and_then(|to| to.checked_add_days(Days::new(1))) {
        select = select.filter(orders::Column::CreatedAt.lt(start_of_day(next_day)));
    }

    if access == Access::OwnOnly {
        select = select.filter(orders::Column::CreatedBy.eq(viewer.creator()));
    }

    let rows = select
        .order_by(orders::Column::CreatedAt, Order::Desc)
        .order_by(orders::Column::Id, Order::Desc)
        .limit(limit)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(order, product)| OrderSummary::new(order, product))
        .collect())
}

/// Order with its product, attachments and audit history
pub async fn order_detail(
    db: &DatabaseConnection,
    viewer: &Viewer,
    order_id: i32,
) -> Result<OrderDetailResponse, ServiceError> {
    let access = viewer.authorize(Operation::ViewOrder)?;
    let order = find_visible_order(db, viewer, access, order_id).await?;

    let product = order.find_related(Products).one(db).await?;
    let images = order
        .find_related(ImageAttachments)
        .order_by(image_attachments::Column::UploadedAt, Order::Desc)
        .order_by(image_attachments::Column::Id, Order::Desc)
        .all(db)
        .await?;
    let scans = audit::order_history(db, order.id).await?;

    Ok(OrderDetailResponse {
        order,
        product,
        images,
        scans,
    })
}

/// Append a note to the order's notes
pub async fn add_note(
    db: &DatabaseConnection,
    viewer: &Viewer,
    order_id: i32,
    note: &str,
) -> Result<orders::Model, ServiceError> {
    let access = viewer.authorize(Operation::AddNote)?;
    let note = note.trim();
    if note.is_empty() {
        return Err(ServiceError::InvalidArgument("Note cannot be empty".to_string()));
    }

    let order = find_visible_order(db, viewer, access, order_id).await?;
    let notes = match order.notes.as_deref() {
        Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, note),
        _ => note.to_string(),
    };

    let mut active: orders::ActiveModel = order.into();
    active.notes = Set(Some(notes));
    active.updated_at = Set(Utc::now().into());

    let commit = audit::commit_order_change(
        db,
        OrderChange::Update(active),
        OrderEvent::new(ScanAction::NoteAdded, viewer.actor()).with_details(json!({ "note": note })),
    )
    .await?;

    info!(order_id, actor = ?viewer.actor(), "Note added to order");

    Ok(commit.order)
}

/// Attach an image reference to an order
pub async fn attach_image(
    db: &DatabaseConnection,
    viewer: &Viewer,
    order_id: i32,
    image: &str,
) -> Result<image_attachments::Model, ServiceError> {
    let access = viewer.authorize(Operation::UploadImage)?;
    let image = image.trim();
    if image.is_empty() {
        return Err(ServiceError::InvalidArgument("Image reference is required".to_string()));
    }

    let order = find_visible_order(db, viewer, access, order_id).await?;

    let attachment = image_attachments::ActiveModel {
        order_id: Set(order.id),
        image: Set(image.to_string()),
        uploaded_by: Set(viewer.actor().map(str::to_string)),
        uploaded_at: Set(Utc::now().into()),
        ..Default::default()
    };

    let commit = audit::commit_order_change(
        db,
        OrderChange::Attach {
            order,
            image: attachment,
        },
        OrderEvent::new(ScanAction::ImageUpload, viewer.actor())
            .with_details(json!({ "image": image })),
    )
    .await?;

    let attachment = commit
        .attachment
        .ok_or_else(|| ServiceError::Database(sea_orm::DbErr::RecordNotInserted))?;

    info!(order_id, attachment_id = attachment.id, "Image attached to order");

    Ok(attachment)
}

/// Delete an order; its attachments and log entries go with it
pub async fn delete_order(
    db: &DatabaseConnection,
    viewer: &Viewer,
    order_id: i32,
) -> Result<(), ServiceError> {
    viewer.authorize(Operation::DeleteOrder)?;

    let result = Orders::delete_by_id(order_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(order_not_found(order_id));
    }

    info!(order_id, actor = ?viewer.actor(), "Order deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::scan_logs;
    use crate::test_support::{admin, seed_order, seed_product, setup_db, viewer};
    use sea_orm::{ActiveModelTrait, PaginatorTrait};

    fn order_request(product_id: i32, barcode: Option<&str>) -> CreateOrderRequest {
        CreateOrderRequest {
            customer: "Acme Labs".to_string(),
            product_id,
            quantity: 2,
            barcode: barcode.map(str::to_string),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_order_logs_order_created() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let operator = viewer("ola", "operators");

        let order = create_order(&db, &operator, &order_request(product.id, None))
            .await
            .unwrap();

        assert!(order.barcode.starts_with("ORD-"));
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.created_by, "ola");

        let history = audit::order_history(&db, order.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, ScanAction::OrderCreated);
        assert_eq!(history[0].barcode_data, order.barcode);
        assert_eq!(history[0].scanned_by.as_deref(), Some("ola"));
    }

    #[tokio::test]
    async fn test_create_order_form_lists_products() {
        let db = setup_db().await;
        seed_product(&db, "SKU-B").await;
        seed_product(&db, "SKU-A").await;

        let form = create_order_form(&db, &viewer("ola", "operators")).await.unwrap();
        let skus: Vec<&str> = form.products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["SKU-A", "SKU-B"]);

        let err = create_order_form(&db, &viewer("wes", "warehouse_staff"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_create_order_unknown_product() {
        let db = setup_db().await;

        let err = create_order(&db, &admin(), &order_request(42, Some("X-1")))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(Orders::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_generated_barcodes_do_not_collide() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;

        let mut barcodes = Vec::new();
        for _ in 0..3 {
            let order = create_order(&db, &admin(), &order_request(product.id, None))
                .await
                .unwrap();
            assert!(order.barcode.starts_with("ORD-"));
            barcodes.push(order.barcode);
        }

        barcodes.sort();
        barcodes.dedup();
        assert_eq!(barcodes.len(), 3);
        assert_eq!(Orders::find().count(&db).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_create_order_rejects_bad_quantity() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let mut request = order_request(product.id, Some("X-1"));
        request.quantity = 0;

        let err = create_order(&db, &admin(), &request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_duplicate_barcode_conflicts() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;

        create_order(&db, &admin(), &order_request(product.id, Some("ABC123")))
            .await
            .unwrap();
        let err = create_order(&db, &admin(), &order_request(product.id, Some("ABC123")))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(Orders::find().count(&db).await.unwrap(), 1);
        assert_eq!(ScanLogs::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_warehouse_staff_cannot_create() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;

        let err = create_order(&db, &viewer("wes", "warehouse_staff"), &order_request(product.id, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_every_status_is_reachable_and_logged() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let order = seed_order(&db, &product, "ORD-1", "ola").await;
        let manager = viewer("max", "managers");

        // Walk the whole enum, including going backwards from delivered
        let statuses = ["delivered", "new", "processing", "packed", "shipped", "cancelled", "new"];
        for (i, status) in statuses.iter().enumerate() {
            let updated = update_status(&db, &manager, order.id, status).await.unwrap();
            assert_eq!(updated.status.to_string(), *status);

            let history = audit::order_history(&db, order.id).await.unwrap();
            assert_eq!(history.len(), i + 1);
            assert_eq!(history[0].action, ScanAction::StatusChange);
            assert_eq!(history[0].details, Some(json!({ "new_status": status })));
        }
    }

    #[tokio::test]
    async fn test_unknown_status_leaves_order_unchanged() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let order = seed_order(&db, &product, "ORD-1", "ola").await;

        let err = update_status(&db, &admin(), order.id, "teleported").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let stored = Orders::find_by_id(order.id).one(&db).await.unwrap().unwrap();
        assert_eq!(stored, order);
        assert!(audit::order_history(&db, order.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_warehouse_staff_cannot_update_own_order() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let order = seed_order(&db, &product, "ORD-1", "wes").await;

        let err = update_status(&db, &viewer("wes", "warehouse_staff"), order.id, "packed")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_lookup_ignores_surrounding_whitespace() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let order = seed_order(&db, &product, "ABC123", "ola").await;

        let padded = lookup_by_barcode(&db, "  ABC123  ").await.unwrap();
        let exact = lookup_by_barcode(&db, "ABC123").await.unwrap();
        assert_eq!(padded.id, order.id);
        assert_eq!(exact.id, order.id);

        let err = lookup_by_barcode(&db, "ABC12").await.unwrap_err();
        assert_eq!(err.to_string(), "Order with barcode ABC12 not found");
    }

    #[tokio::test]
    async fn test_list_orders_filters_and_scopes() {
        let db = setup_db().await;
        let widget = seed_product(&db, "SKU-W").await;
        let gadget = seed_product(&db, "SKU-G").await;
        let mine = seed_order(&db, &widget, "ORD-WES-1", "wes").await;
        let theirs = seed_order(&db, &gadget, "ORD-OLA-1", "ola").await;
        update_status(&db, &admin(), theirs.id, "packed").await.unwrap();

        let all = list_orders(&db, &admin(), &OrderListQuery::default(), 100)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, theirs.id, "newest first");

        let packed = OrderListQuery {
            status: Some("packed".to_string()),
            ..Default::default()
        };
        let rows = list_orders(&db, &admin(), &packed, 100).await.unwrap();
        assert_eq!(rows.iter().map(|o| o.id).collect::<Vec<_>>(), vec![theirs.id]);

        // Product name match, case-insensitive
        let by_product = OrderListQuery {
            search: Some("product sku-w".to_string()),
            ..Default::default()
        };
        let rows = list_orders(&db, &admin(), &by_product, 100).await.unwrap();
        assert_eq!(rows.iter().map(|o| o.id).collect::<Vec<_>>(), vec![mine.id]);
        assert_eq!(rows[0].product_name.as_deref(), Some("Product SKU-W"));

        let by_barcode = OrderListQuery {
            search: Some("ola-1".to_string()),
            ..Default::default()
        };
        let rows = list_orders(&db, &admin(), &by_barcode, 100).await.unwrap();
        assert_eq!(rows.iter().map(|o| o.id).collect::<Vec<_>>(), vec![theirs.id]);

        let staff = viewer("wes", "warehouse_staff");
        let rows = list_orders(&db, &staff, &OrderListQuery::default(), 100)
            .await
            .unwrap();
        assert!(rows.iter().all(|o| o.created_by == "wes"));
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_search_matches_wildcards_literally() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let mut ids = Vec::new();
        for (i, customer) in ["Acme_1", "AcmeX1", "Plain"].iter().enumerate() {
            let order = seed_order(&db, &product, &format!("ORD-{}", i), "ola").await;
            let mut active: orders::ActiveModel = order.into();
            active.customer = Set(customer.to_string());
            ids.push(active.update(&db).await.unwrap().id);
        }

        let underscore = OrderListQuery {
            search: Some("acme_1".to_string()),
            ..Default::default()
        };
        let rows = list_orders(&db, &admin(), &underscore, 100).await.unwrap();
        assert_eq!(rows.iter().map(|o| o.id).collect::<Vec<_>>(), vec![ids[0]]);

        for search in ["%", "\\"] {
            let query = OrderListQuery {
                search: Some(search.to_string()),
                ..Default::default()
            };
            let rows = list_orders(&db, &admin(), &query, 100).await.unwrap();
            assert!(rows.is_empty(), "{} matched {:?}", search, rows);
        }
    }

    #[tokio::test]
    async fn test_list_orders_date_range_and_bad_status() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        seed_order(&db, &product, "ORD-1", "ola").await;

        let today = Utc::now().date_naive();
        let in_range = OrderListQuery {
            from: Some(today),
            to: Some(today),
            ..Default::default()
        };
        assert_eq!(list_orders(&db, &admin(), &in_range, 100).await.unwrap().len(), 1);

        let before = OrderListQuery {
            to: today.checked_sub_days(Days::new(1)),
            ..Default::default()
        };
        assert!(list_orders(&db, &admin(), &before, 100).await.unwrap().is_empty());

        let bad = OrderListQuery {
            status: Some("misplaced".to_string()),
            ..Default::default()
        };
        let err = list_orders(&db, &admin(), &bad, 100).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_detail_hides_other_staff_orders() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let mine = seed_order(&db, &product, "ORD-1", "wes").await;
        let theirs = seed_order(&db, &product, "ORD-2", "ola").await;
        let staff = viewer("wes", "warehouse_staff");

        let detail = order_detail(&db, &staff, mine.id).await.unwrap();
        assert_eq!(detail.order.id, mine.id);
        assert_eq!(detail.product.map(|p| p.id), Some(product.id));

        let hidden = order_detail(&db, &staff, theirs.id).await.unwrap_err();
        let missing = order_detail(&db, &staff, 9999).await.unwrap_err();
        assert!(matches!(hidden, ServiceError::NotFound(_)));
        assert!(matches!(missing, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_scan_records_entry_and_respects_ownership() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let mine = seed_order(&db, &product, "ORD-1", "wes").await;
        seed_order(&db, &product, "ORD-2", "ola").await;
        let staff = viewer("wes", "warehouse_staff");

        let scanned = scan_barcode(&db, &staff, " ORD-1\n").await.unwrap();
        assert_eq!(scanned.id, mine.id);

        let history = audit::order_history(&db, mine.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, ScanAction::Scan);
        assert_eq!(history[0].barcode_data, "ORD-1");

        let err = scan_barcode(&db, &staff, "ORD-2").await.unwrap_err();
        assert_eq!(err.to_string(), "Order with barcode ORD-2 not found");
    }

    #[tokio::test]
    async fn test_notes_and_images_are_logged() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let order = seed_order(&db, &product, "ORD-1", "ola").await;
        let manager = viewer("max", "managers");

        add_note(&db, &manager, order.id, "fragile").await.unwrap();
        let updated = add_note(&db, &manager, order.id, "leave at dock 4").await.unwrap();
        assert_eq!(updated.notes.as_deref(), Some("fragile\nleave at dock 4"));

        let attachment = attach_image(&db, &manager, order.id, "order_images/2026/10/19/box.jpg")
            .await
            .unwrap();
        assert_eq!(attachment.uploaded_by.as_deref(), Some("max"));

        let history = audit::order_history(&db, order.id).await.unwrap();
        let actions: Vec<ScanAction> = history.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![ScanAction::ImageUpload, ScanAction::NoteAdded, ScanAction::NoteAdded]
        );
        assert_eq!(
            history[0].details,
            Some(json!({ "image": "order_images/2026/10/19/box.jpg", "attachment_id": attachment.id }))
        );
    }

    #[tokio::test]
    async fn test_operator_cannot_add_notes() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let order = seed_order(&db, &product, "ORD-1", "ola").await;

        let err = add_note(&db, &viewer("ola", "operators"), order.id, "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_delete_order_cascades() {
        let db = setup_db().await;
        let product = seed_product(&db, "SKU-1").await;
        let order = create_order(&db, &admin(), &order_request(product.id, Some("ORD-1")))
            .await
            .unwrap();
        attach_image(&db, &admin(), order.id, "a.jpg").await.unwrap();

        let err = delete_order(&db, &viewer("max", "managers"), order.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));

        delete_order(&db, &admin(), order.id).await.unwrap();
        assert_eq!(Orders::find().count(&db).await.unwrap(), 0);
        assert_eq!(ImageAttachments::find().count(&db).await.unwrap(), 0);
        assert_eq!(
            ScanLogs::find()
                .filter(scan_logs::Column::OrderId.eq(order.id))
                .count(&db)
                .await
                .unwrap(),
            0
        );

        let err = delete_order(&db, &admin(), order.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
