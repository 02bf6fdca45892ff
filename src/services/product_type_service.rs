use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::optional_text,
    dto::product_types::{CreateProductTypeRequest, ProductTypeList, UpdateProductTypeRequest},
    entity::product_types::{ActiveModel, Column, Entity as ProductTypes},
    error::{AppError, AppResult},
    models::ProductType,
    response::{ApiResponse, Meta},
    routes::params::{ProductTypeQuery, search_pattern},
    state::AppState,
};

const DUPLICATE_NAME: &str = "A product type with this name already exists";

pub async fn list_product_types(
    state: &AppState,
    query: ProductTypeQuery,
) -> AppResult<ApiResponse<ProductTypeList>> {
    let mut condition = Condition::all();
    if let Some(pattern) = search_pattern(query.search.as_deref()) {
        condition = condition.add(Expr::col(Column::Name).ilike(pattern));
    }

    let finder = ProductTypes::find()
        .filter(condition)
        .order_by_asc(Column::Name);

    let (items, meta) = match query.pagination().normalize() {
        Some((page, limit, offset)) => {
            let total = finder.clone().count(&state.orm).await? as i64;
            let items = finder
                .limit(limit as u64)
                .offset(offset as u64)
                .all(&state.orm)
                .await?;
            (items, Meta::new(page, limit, total))
        }
        None => {
            let items = finder.all(&state.orm).await?;
            let total = items.len() as i64;
            (items, Meta::total(total))
        }
    };

    let data = ProductTypeList {
        items: items.into_iter().map(ProductType::from).collect(),
    };
    Ok(ApiResponse::success("Product types", data, Some(meta)))
}

pub async fn create_product_type(
    state: &AppState,
    payload: CreateProductTypeRequest,
) -> AppResult<ApiResponse<ProductType>> {
    let payload = payload.validated()?;
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        created_at: NotSet,
    };
    let product_type = active
        .insert(&state.orm)
        .await
        .map_err(|err| AppError::from_constraint(err, DUPLICATE_NAME, DUPLICATE_NAME))?;

    tracing::info!(product_type_id = %product_type.id, "product type created");
    Ok(ApiResponse::success(
        "Product type created",
        ProductType::from(product_type),
        Some(Meta::empty()),
    ))
}

pub async fn update_product_type(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductTypeRequest,
) -> AppResult<ApiResponse<ProductType>> {
    let payload = payload.validated()?;
    let existing = ProductTypes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Product type"))?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(optional_text(Some(description)));
    }

    let product_type = if active.is_changed() {
        active
            .update(&state.orm)
            .await
            .map_err(|err| AppError::from_constraint(err, DUPLICATE_NAME, DUPLICATE_NAME))?
    } else {
        existing
    };

    Ok(ApiResponse::success(
        "Updated",
        ProductType::from(product_type),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product_type(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = ProductTypes::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|err| {
            AppError::from_delete_constraint(
                err,
                "This product type cannot be deleted while products reference it",
            )
        })?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Product type"));
    }

    tracing::info!(product_type_id = %id, "product type deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
