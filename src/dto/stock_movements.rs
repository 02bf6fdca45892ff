use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{MovementType, StockMovement};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockMovementRequest {
    #[serde(rename = "type")]
    pub kind: MovementType,
    pub quantity: i32,
    pub product_id: Uuid,
    pub notes: Option<String>,
}

/// Amendment of a recorded movement. The product cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockMovementRequest {
    #[serde(rename = "type")]
    pub kind: Option<MovementType>,
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementSummary {
    pub entries: i64,
    pub exits: i64,
    pub balance: i64,
    /// Entries valued at cost price.
    #[schema(value_type = f64)]
    pub entries_value: Decimal,
    /// Exits valued at sale price.
    #[schema(value_type = f64)]
    pub exits_value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockMovementHistory {
    pub movements: Vec<StockMovement>,
    pub summary: MovementSummary,
}
