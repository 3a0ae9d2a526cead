#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use migration::{Migrator, MigratorTrait};
use order_tracker::{build_router, config::AppConfig, AppState};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use serde_json::Value;
use tower::ServiceExt;

const TEST_DATABASE_URL: &str = "sqlite::memory:";

/// Fresh, migrated in-memory database.
/// A single pooled connection, since each SQLite memory connection is its own database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(TEST_DATABASE_URL);
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn build_test_router() -> Router {
    let db = setup_test_db().await.expect("Failed to set up test DB");
    build_router(AppState {
        db,
        config: AppConfig::with_database_url(TEST_DATABASE_URL),
    })
}

/// Who a request is sent as
#[derive(Clone, Copy)]
pub enum Caller {
    Anonymous,
    Member(&'static str, &'static str),
    Superuser(&'static str),
}

pub const ADMIN: Caller = Caller::Superuser("admin");
pub const MANAGER: Caller = Caller::Member("max", "managers");
pub const OPERATOR: Caller = Caller::Member("ola", "operators");
pub const STAFF: Caller = Caller::Member("wes", "warehouse_staff");

/// Send one request and return the status with the decoded JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(
    app: &Router,
    caller: Caller,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    match caller {
        Caller::Anonymous => {}
        Caller::Member(user, groups) => {
            builder = builder.header("X-User", user).header("X-User-Groups", groups);
        }
        Caller::Superuser(user) => {
            builder = builder.header("X-User", user).header("X-User-Superuser", "true");
        }
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
