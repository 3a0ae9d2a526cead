use chrono::{NaiveTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::access::{Access, Operation, Viewer};
use crate::entities::orders::{self, OrderStatus};
use crate::entities::prelude::*;
use crate::error::ServiceError;
use crate::models::dashboard::{DashboardResponse, DashboardStats};
use crate::models::order::OrderSummary;

const TODAY_ORDER_LIMIT: u64 = 20;

/// Headline counts plus today's orders.
///
/// Counts cover every order. The order list honours the viewer's listing
/// scope, so warehouse staff only see their own.
pub async fn dashboard(
    db: &DatabaseConnection,
    viewer: &Viewer,
) -> Result<DashboardResponse, ServiceError> {
    viewer.authorize(Operation::ViewDashboard)?;

    let start_of_today = Utc::now()
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
        .fixed_offset();

    let total_orders = Orders::find().count(db).await?;
    let orders_today = Orders::find()
        .filter(orders::Column::CreatedAt.gte(start_of_today))
        .count(db)
        .await?;
    let pending_orders = Orders::find()
        .filter(orders::Column::Status.is_in(OrderStatus::PENDING))
        .count(db)
        .await?;
    let products = Products::find().count(db).await?;

    let mut today = Orders::find()
        .find_also_related(Products)
        .filter(orders::Column::CreatedAt.gte(start_of_today));
    if viewer.authorize(Operation::ListOrders)? == Access::OwnOnly {
        today = today.filter(orders::Column::CreatedBy.eq(viewer.creator()));
    }

    let orders = today
        .order_by(orders::Column::CreatedAt, Order::Desc)
        .order_by(orders::Column::Id, Order::Desc)
        .limit(TODAY_ORDER_LIMIT)
        .all(db)
        .await?
        .into_iter()
        .map(|(order, product)| OrderSummary::new(order, product))
        .collect();

    Ok(DashboardResponse {
        role: viewer.role(),
        stats: DashboardStats {
            total_orders,
            orders_today,
            pending_orders,
            products,
        },
        orders,
    })
}
