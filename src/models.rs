use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    product_types::Model as ProductTypeModel, products::Model as ProductModel,
    stock_movements::Model as MovementModel,
};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Entry,
    Exit,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entry => "entry",
            MovementType::Exit => "exit",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown movement type `{0}`")]
pub struct UnknownMovementType(pub String);

impl FromStr for MovementType {
    type Err = UnknownMovementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(MovementType::Entry),
            "exit" => Ok(MovementType::Exit),
            other => Err(UnknownMovementType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<ProductTypeModel> for ProductType {
    fn from(model: ProductTypeModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub cost_price: Decimal,
    #[schema(value_type = f64)]
    pub sale_price: Decimal,
    pub quantity: i32,
    pub expiration_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub product_type_id: Option<Uuid>,
    pub product_type: Option<ProductType>,
    #[schema(value_type = f64)]
    pub profit_value: Decimal,
    /// Percentage of the cost price; zero when the cost price is zero.
    #[schema(value_type = f64)]
    pub profit_margin: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn from_entity(model: ProductModel, product_type: Option<ProductTypeModel>) -> Self {
        let (profit_value, profit_margin) = profit(model.cost_price, model.sale_price);
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            cost_price: model.cost_price,
            sale_price: model.sale_price,
            quantity: model.quantity,
            expiration_date: model.expiration_date,
            supplier: model.supplier,
            product_type_id: model.product_type_id,
            product_type: product_type.map(ProductType::from),
            profit_value,
            profit_margin,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

pub fn profit(cost_price: Decimal, sale_price: Decimal) -> (Decimal, Decimal) {
    let value = sale_price - cost_price;
    let margin = if cost_price > Decimal::ZERO {
        (value / cost_price * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    };
    (value, margin)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementProductType {
    pub id: Uuid,
    pub name: String,
}

/// Product fields attached to a movement for display.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementProduct {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = f64)]
    pub cost_price: Decimal,
    #[schema(value_type = f64)]
    pub sale_price: Decimal,
    pub product_type: Option<MovementProductType>,
}

impl MovementProduct {
    pub fn from_entity(model: &ProductModel, product_type: Option<&ProductTypeModel>) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            cost_price: model.cost_price,
            sale_price: model.sale_price,
            product_type: product_type.map(|t| MovementProductType {
                id: t.id,
                name: t.name.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MovementType,
    pub quantity: i32,
    pub product_id: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product: Option<MovementProduct>,
}

impl StockMovement {
    pub fn from_entity(
        model: MovementModel,
        product: Option<MovementProduct>,
    ) -> Result<Self, UnknownMovementType> {
        Ok(Self {
            id: model.id,
            kind: model.kind.parse()?,
            quantity: model.quantity,
            product_id: model.product_id,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
            product,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profit_margin_is_relative_to_cost() {
        let (value, margin) = profit(Decimal::new(800, 2), Decimal::new(1000, 2));
        assert_eq!(value, Decimal::new(200, 2));
        assert_eq!(margin, Decimal::new(25, 0));
    }

    #[test]
    fn zero_cost_has_zero_margin() {
        let (value, margin) = profit(Decimal::ZERO, Decimal::new(500, 2));
        assert_eq!(value, Decimal::new(500, 2));
        assert_eq!(margin, Decimal::ZERO);
    }

    #[test]
    fn movement_type_round_trips_through_storage_names() {
        assert_eq!("entry".parse::<MovementType>(), Ok(MovementType::Entry));
        assert_eq!("exit".parse::<MovementType>(), Ok(MovementType::Exit));
        assert!("transfer".parse::<MovementType>().is_err());
        assert_eq!(MovementType::Exit.as_str(), "exit");
    }
}
