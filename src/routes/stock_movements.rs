use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::stock_movements::{
        CreateStockMovementRequest, StockMovementHistory, UpdateStockMovementRequest,
    },
    error::AppResult,
    models::StockMovement,
    response::ApiResponse,
    routes::params::MovementQuery,
    services::stock_movement_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movements).post(record_movement))
        .route("/{id}", patch(amend_movement).delete(remove_movement))
}

#[utoipa::path(
    get,
    path = "/api/stock-movements",
    params(MovementQuery),
    responses(
        (status = 200, description = "Movements, newest first, with totals", body = ApiResponse<StockMovementHistory>),
        (status = 400, description = "Invalid date range"),
    ),
    tag = "Stock movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<ApiResponse<StockMovementHistory>>> {
    let resp = stock_movement_service::list_movements(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stock-movements",
    request_body = CreateStockMovementRequest,
    responses(
        (status = 201, description = "Movement recorded and stock updated", body = ApiResponse<StockMovement>),
        (status = 400, description = "Quantity must be positive"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Insufficient stock"),
    ),
    tag = "Stock movements"
)]
pub async fn record_movement(
    State(state): State<AppState>,
    Json(payload): Json<CreateStockMovementRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<StockMovement>>)> {
    let resp = stock_movement_service::record_movement(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/stock-movements/{id}",
    params(
        ("id" = Uuid, Path, description = "Stock movement ID")
    ),
    request_body = UpdateStockMovementRequest,
    responses(
        (status = 200, description = "Movement amended and stock adjusted", body = ApiResponse<StockMovement>),
        (status = 404, description = "Stock movement not found"),
        (status = 422, description = "Would result in negative stock"),
    ),
    tag = "Stock movements"
)]
pub async fn amend_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStockMovementRequest>,
) -> AppResult<Json<ApiResponse<StockMovement>>> {
    let resp = stock_movement_service::amend_movement(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/stock-movements/{id}",
    params(
        ("id" = Uuid, Path, description = "Stock movement ID")
    ),
    responses(
        (status = 200, description = "Movement removed and its effect reversed", body = ApiResponse<StockMovement>),
        (status = 404, description = "Stock movement not found"),
        (status = 422, description = "Would result in negative stock"),
    ),
    tag = "Stock movements"
)]
pub async fn remove_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StockMovement>>> {
    let resp = stock_movement_service::remove_movement(&state, id).await?;
    Ok(Json(resp))
}
