use serde::{Deserialize, Serialize};

use crate::access::Role;
use crate::models::order::OrderSummary;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub orders_today: u64,
    /// Orders still `new` or `processing`
    pub pending_orders: u64,
    pub products: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub role: Role,
    pub stats: DashboardStats,
    /// Up to 20 of today's orders, newest first
    pub orders: Vec<OrderSummary>,
}
