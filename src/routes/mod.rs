use axum::Router;

use crate::state::AppState;

pub mod dashboard;
pub mod doc;
pub mod health;
pub mod params;
pub mod product_types;
pub mod products;
pub mod stock_movements;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/product-types", product_types::router())
        .nest("/stock-movements", stock_movements::router())
        .nest("/dashboard", dashboard::router())
}
