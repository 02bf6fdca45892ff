use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::{optional_text, required_name},
    error::AppResult,
    models::ProductType,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductTypeRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CreateProductTypeRequest {
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            name: required_name(&self.name, "name")?,
            description: optional_text(self.description),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateProductTypeRequest {
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            name: self
                .name
                .as_deref()
                .map(|n| required_name(n, "name"))
                .transpose()?,
            description: self.description.map(|d| d.trim().to_string()),
        })
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductTypeList {
    #[schema(value_type = Vec<ProductType>)]
    pub items: Vec<ProductType>,
}
