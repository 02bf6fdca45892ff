use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::{DashboardStats, RecentMovement, StockTrendPoint, TypeDistribution},
    error::AppResult,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/recent-movements", get(recent_movements))
        .route("/stock-trend", get(stock_trend))
        .route("/product-type-distribution", get(product_type_distribution))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Catalog counts and today's figures (UTC)", body = ApiResponse<DashboardStats>)
    ),
    tag = "Dashboard"
)]
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    Ok(Json(dashboard_service::stats(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/recent-movements",
    responses(
        (status = 200, description = "Ten most recent movements", body = ApiResponse<Vec<RecentMovement>>)
    ),
    tag = "Dashboard"
)]
pub async fn recent_movements(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<RecentMovement>>>> {
    Ok(Json(dashboard_service::recent_movements(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stock-trend",
    responses(
        (status = 200, description = "Entries and exits per day for the last seven days", body = ApiResponse<Vec<StockTrendPoint>>)
    ),
    tag = "Dashboard"
)]
pub async fn stock_trend(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<StockTrendPoint>>>> {
    Ok(Json(dashboard_service::stock_trend(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/product-type-distribution",
    responses(
        (status = 200, description = "Product count per type", body = ApiResponse<Vec<TypeDistribution>>)
    ),
    tag = "Dashboard"
)]
pub async fn product_type_distribution(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<TypeDistribution>>>> {
    Ok(Json(dashboard_service::product_type_distribution(&state).await?))
}
