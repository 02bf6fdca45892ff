use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::product_types::{CreateProductTypeRequest, ProductTypeList, UpdateProductTypeRequest},
    error::AppResult,
    models::ProductType,
    response::ApiResponse,
    routes::params::ProductTypeQuery,
    services::product_type_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_product_types).post(create_product_type))
        .route(
            "/{id}",
            patch(update_product_type).delete(delete_product_type),
        )
}

#[utoipa::path(
    get,
    path = "/api/product-types",
    params(ProductTypeQuery),
    responses(
        (status = 200, description = "List product types", body = ApiResponse<ProductTypeList>)
    ),
    tag = "Product types"
)]
pub async fn list_product_types(
    State(state): State<AppState>,
    Query(query): Query<ProductTypeQuery>,
) -> AppResult<Json<ApiResponse<ProductTypeList>>> {
    let resp = product_type_service::list_product_types(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/product-types",
    request_body = CreateProductTypeRequest,
    responses(
        (status = 201, description = "Create product type", body = ApiResponse<ProductType>),
        (status = 409, description = "Duplicate name"),
    ),
    tag = "Product types"
)]
pub async fn create_product_type(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductTypeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductType>>)> {
    let resp = product_type_service::create_product_type(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/product-types/{id}",
    params(
        ("id" = Uuid, Path, description = "Product type ID")
    ),
    request_body = UpdateProductTypeRequest,
    responses(
        (status = 200, description = "Updated product type", body = ApiResponse<ProductType>),
        (status = 404, description = "Product type not found"),
        (status = 409, description = "Duplicate name"),
    ),
    tag = "Product types"
)]
pub async fn update_product_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductTypeRequest>,
) -> AppResult<Json<ApiResponse<ProductType>>> {
    let resp = product_type_service::update_product_type(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/product-types/{id}",
    params(
        ("id" = Uuid, Path, description = "Product type ID")
    ),
    responses(
        (status = 200, description = "Deleted product type"),
        (status = 404, description = "Product type not found"),
        (status = 409, description = "Products still reference the type"),
    ),
    tag = "Product types"
)]
pub async fn delete_product_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_type_service::delete_product_type(&state, id).await?;
    Ok(Json(resp))
}
