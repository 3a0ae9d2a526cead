mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{build_test_router, send, Caller, ADMIN, MANAGER, OPERATOR, STAFF};

async fn create_product(app: &axum::Router, sku: &str) -> i64 {
    let (status, product) = send(
        app,
        ADMIN,
        "POST",
        "/products/",
        Some(json!({
            "name": format!("Widget {}", sku),
            "sku": sku,
            "barcode": format!("P-{}", sku),
            "quantity": 10
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", product);
    product["id"].as_i64().unwrap()
}

async fn create_order(app: &axum::Router, caller: Caller, product_id: i64, barcode: &str) -> Value {
    let (status, order) = send(
        app,
        caller,
        "POST",
        "/orders/create/",
        Some(json!({
            "customer": "Acme Labs",
            "product_id": product_id,
            "quantity": 2,
            "barcode": barcode
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", order);
    order
}

#[tokio::test]
async fn test_order_lifecycle_end_to_end() {
    let app = build_test_router().await;
    let product_id = create_product(&app, "SKU-1").await;

    let order = create_order(&app, OPERATOR, product_id, "ABC123").await;
    assert_eq!(order["status"], "new");
    assert_eq!(order["created_by"], "ola");
    let id = order["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        MANAGER,
        "POST",
        &format!("/orders/{}/update-status/", id),
        Some(json!({ "status": "packed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "packed");

    let (status, scan) = send(&app, OPERATOR, "POST", "/scan/", Some(json!({ "barcode": "  ABC123 " }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scan["order"]["id"], id);
    assert!(scan.get("error").is_none());

    let (status, detail) = send(&app, ADMIN, "GET", &format!("/orders/{}/", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["product"]["sku"], "SKU-1");

    let actions: Vec<&str> = detail["scans"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["scan", "status_change", "order_created"]);
    assert_eq!(detail["scans"][1]["details"], json!({ "new_status": "packed" }));
}

#[tokio::test]
async fn test_scan_miss_is_rendered_not_raised() {
    let app = build_test_router().await;

    let (status, body) = send(&app, OPERATOR, "GET", "/scan/?barcode=NOPE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Order with barcode NOPE not found");
    assert!(body.get("order").is_none());

    // Empty scan form
    let (status, body) = send(&app, OPERATOR, "GET", "/scan/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_status_update_errors() {
    let app = build_test_router().await;
    let product_id = create_product(&app, "SKU-1").await;
    let order = create_order(&app, OPERATOR, product_id, "ORD-9").await;
    let uri = format!("/orders/{}/update-status/", order["id"]);

    let (status, body) = send(&app, STAFF, "POST", &uri, Some(json!({ "status": "packed" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PERMISSION_DENIED");

    let (status, body) = send(&app, MANAGER, "POST", &uri, Some(json!({ "status": "lost" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, _) = send(
        &app,
        MANAGER,
        "POST",
        "/orders/4242/update-status/",
        Some(json!({ "status": "packed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_barcode_is_conflict() {
    let app = build_test_router().await;
    let product_id = create_product(&app, "SKU-1").await;
    create_order(&app, OPERATOR, product_id, "DUP-1").await;

    let (status, body) = send(
        &app,
        OPERATOR,
        "POST",
        "/orders/create/",
        Some(json!({ "customer": "Other", "product_id": product_id, "barcode": "DUP-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_warehouse_staff_sees_only_own_orders() {
    let app = build_test_router().await;
    let product_id = create_product(&app, "SKU-1").await;
    let theirs = create_order(&app, OPERATOR, product_id, "ORD-OLA").await;

    let (status, body) = send(&app, STAFF, "GET", "/orders/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["orders"].as_array().unwrap().is_empty());

    // Someone else's order looks exactly like a missing one
    let (status, body) = send(&app, STAFF, "GET", &format!("/orders/{}/", theirs["id"]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = send(&app, STAFF, "GET", "/scan/?barcode=ORD-OLA", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Order with barcode ORD-OLA not found");

    let (status, body) = send(&app, MANAGER, "GET", "/orders/?status=new&search=ola", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);
    assert_eq!(body["selected_status"], "new");
}

#[tokio::test]
async fn test_guest_is_forbidden() {
    let app = build_test_router().await;

    for uri in ["/", "/orders/", "/products/", "/inventory/batches/"] {
        let (status, _) = send(&app, Caller::Anonymous, "GET", uri, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
    }

    // Authenticated but in no known group
    let (status, _) = send(&app, Caller::Member("sal", "sales"), "GET", "/", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_notes_images_and_delete() {
    let app = build_test_router().await;
    let product_id = create_product(&app, "SKU-1").await;
    let order = create_order(&app, OPERATOR, product_id, "ORD-1").await;
    let id = order["id"].as_i64().unwrap();

    let (status, _) = send(&app, OPERATOR, "POST", &format!("/orders/{}/notes/", id), Some(json!({ "note": "x" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(&app, MANAGER, "POST", &format!("/orders/{}/notes/", id), Some(json!({ "note": "fragile" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "fragile");

    let (status, image) = send(
        &app,
        OPERATOR,
        "POST",
        &format!("/orders/{}/images/", id),
        Some(json!({ "image": "order_images/box.jpg" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(image["order_id"], id);

    let (status, _) = send(&app, MANAGER, "DELETE", &format!("/orders/{}/", id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, ADMIN, "DELETE", &format!("/orders/{}/", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, ADMIN, "GET", &format!("/orders/{}/", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_reports_counts() {
    let app = build_test_router().await;
    let product_id = create_product(&app, "SKU-1").await;
    create_order(&app, OPERATOR, product_id, "ORD-1").await;
    create_order(&app, OPERATOR, product_id, "ORD-2").await;

    let (status, body) = send(&app, STAFF, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "warehouse_staff");
    assert_eq!(
        body["stats"],
        json!({ "total_orders": 2, "orders_today": 2, "pending_orders": 2, "products": 1 })
    );
    assert!(body["orders"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_requests_are_invalid_arguments() {
    let app = build_test_router().await;
    let product_id = create_product(&app, "SKU-1").await;

    let (status, body) = send(
        &app,
        OPERATOR,
        "POST",
        "/orders/create/",
        Some(json!({
            "customer": "Acme Labs",
            "product_id": product_id,
            "quantity": "two"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    // No body at all
    let (status, body) = send(&app, OPERATOR, "POST", "/orders/create/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, body) = send(&app, ADMIN, "GET", "/orders/?from=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, list) = send(&app, ADMIN, "GET", "/orders/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["orders"], json!([]));
}
