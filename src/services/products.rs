//! Product catalogue

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::access::{Operation, Viewer};
use crate::entities::{prelude::*, products};
use crate::error::ServiceError;
use crate::models::product::{CreateProductRequest, ProductListQuery};
use crate::services::search::icontains;

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::InvalidArgument(format!("{} is required", field)));
    }
    Ok(value)
}

pub async fn create_product(
    db: &DatabaseConnection,
    viewer: &Viewer,
    request: &CreateProductRequest,
) -> Result<products::Model, ServiceError> {
    viewer.authorize(Operation::ManageProducts)?;

    let name = required("Name", &request.name)?;
    let sku = required("SKU", &request.sku)?;
    let barcode = required("Barcode", &request.barcode)?;
    if request.quantity < 0 {
        return Err(ServiceError::InvalidArgument(format!(
            "Quantity cannot be negative, got {}",
            request.quantity
        )));
    }

    let clash = Products::find()
        .filter(
            Condition::any()
                .add(products::Column::Sku.eq(sku))
                .add(products::Column::Barcode.eq(barcode)),
        )
        .one(db)
        .await?;
    if let Some(existing) = clash {
        let field = if existing.sku == sku { "SKU" } else { "barcode" };
        return Err(ServiceError::Conflict(format!(
            "A product with this {} already exists",
            field
        )));
    }

    let now = Utc::now();
    let product = products::ActiveModel {
        name: Set(name.to_string()),
        sku: Set(sku.to_string()),
        barcode: Set(barcode.to_string()),
        description: Set(request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)),
        quantity: Set(request.quantity),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(product_id = product.id, sku = %product.sku, actor = ?viewer.actor(), "Product created");

    Ok(product)
}

/// Products newest first, optionally filtered by a case-insensitive search
pub async fn list_products(
    db: &DatabaseConnection,
    viewer: &Viewer,
    query: &ProductListQuery,
) -> Result<Vec<products::Model>, ServiceError> {
    viewer.authorize(Operation::ViewProducts)?;

    let mut select = Products::find();

    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    if let Some(search) = search {
        select = select.filter(
            Condition::any()
                .add(icontains(products::Column::Name, search))
                .add(icontains(products::Column::Sku, search))
                .add(icontains(products::Column::Barcode, search)),
        );
    }

    Ok(select
        .order_by(products::Column::CreatedAt, Order::Desc)
        .order_by(products::Column::Id, Order::Desc)
        .all(db)
        .await?)
}

/// Delete a product. Its orders and batches are removed with it.
pub async fn delete_product(
    db: &DatabaseConnection,
    viewer: &Viewer,
    product_id: i32,
) -> Result<(), ServiceError> {
    viewer.authorize(Operation::DeleteProduct)?;

    let result = Products::delete_by_id(product_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "Product {} not found",
            product_id
        )));
    }

    info!(product_id, actor = ?viewer.actor(), "Product deleted");
    Ok(())
}
