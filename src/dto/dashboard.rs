use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::MovementType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_product_types: i64,
    pub low_stock_products: i64,
    pub today_purchases: i64,
    pub today_sales: i64,
    pub today_balance: i64,
    #[schema(value_type = f64)]
    pub today_purchases_value: Decimal,
    #[schema(value_type = f64)]
    pub today_sales_value: Decimal,
    #[schema(value_type = f64)]
    pub today_profit: Decimal,
    #[schema(value_type = f64)]
    pub today_profit_margin: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentMovementProduct {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentMovement {
    pub id: Uuid,
    pub product: RecentMovementProduct,
    #[serde(rename = "type")]
    pub kind: MovementType,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockTrendPoint {
    /// Day label, `dd/MM`.
    pub date: String,
    pub entries: i64,
    pub exits: i64,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TypeDistribution {
    pub id: Uuid,
    pub name: String,
    pub value: i64,
    pub percentage: i64,
}
