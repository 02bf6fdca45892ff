use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{non_negative_price, nullable, optional_text, required_name},
    error::{AppError, AppResult},
    models::Product,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub cost_price: Decimal,
    #[schema(value_type = f64)]
    pub sale_price: Decimal,
    /// Initial stock; later changes go through stock movements.
    #[serde(default)]
    pub quantity: i32,
    pub expiration_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub product_type_id: Option<Uuid>,
}

impl CreateProductRequest {
    pub fn validated(self) -> AppResult<Self> {
        if self.quantity < 0 {
            return Err(AppError::BadRequest("quantity must not be negative".into()));
        }
        Ok(Self {
            name: required_name(&self.name, "name")?,
            description: optional_text(self.description),
            cost_price: non_negative_price(self.cost_price, "costPrice")?,
            sale_price: non_negative_price(self.sale_price, "salePrice")?,
            supplier: optional_text(self.supplier),
            ..self
        })
    }
}

/// Partial product update. Stock is not editable here.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub cost_price: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub sale_price: Option<Decimal>,
    /// `null` clears the date.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<NaiveDate>, nullable)]
    pub expiration_date: Option<Option<NaiveDate>>,
    pub supplier: Option<String>,
    /// `null` detaches the product from its type.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub product_type_id: Option<Option<Uuid>>,
}

impl UpdateProductRequest {
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            name: self
                .name
                .as_deref()
                .map(|n| required_name(n, "name"))
                .transpose()?,
            cost_price: self
                .cost_price
                .map(|p| non_negative_price(p, "costPrice"))
                .transpose()?,
            sale_price: self
                .sale_price
                .map(|p| non_negative_price(p, "salePrice"))
                .transpose()?,
            ..self
        })
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
