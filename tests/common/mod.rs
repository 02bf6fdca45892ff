#![allow(dead_code)]

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use stock_manager_api::{
    db::{create_pool, run_migrations},
    dto::{
        product_types::CreateProductTypeRequest, products::CreateProductRequest,
        stock_movements::CreateStockMovementRequest,
    },
    entity::stock_movements::{Column as MovementCol, Entity as StockMovements},
    models::{MovementType, Product, ProductType, StockMovement},
    services::{product_service, product_type_service, stock_movement_service},
    state::AppState,
};
use uuid::Uuid;

/// Connects to the test database, or returns `None` when none is configured.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run database tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 20).await?;
    run_migrations(&pool).await?;
    Ok(Some(AppState::new(pool)))
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4())
}

pub async fn create_product(
    state: &AppState,
    quantity: i32,
    product_type_id: Option<Uuid>,
) -> anyhow::Result<Product> {
    let resp = product_service::create_product(
        state,
        CreateProductRequest {
            name: unique("Test Widget"),
            description: Some("A product for testing".into()),
            cost_price: Decimal::new(1000, 2),
            sale_price: Decimal::new(1500, 2),
            quantity,
            expiration_date: None,
            supplier: None,
            product_type_id,
        },
    )
    .await?;
    Ok(resp.data.expect("created product"))
}

pub async fn create_type(state: &AppState) -> anyhow::Result<ProductType> {
    let resp = product_type_service::create_product_type(
        state,
        CreateProductTypeRequest {
            name: unique("Test Type"),
            description: None,
        },
    )
    .await?;
    Ok(resp.data.expect("created product type"))
}

pub async fn record(
    state: &AppState,
    product_id: Uuid,
    kind: MovementType,
    quantity: i32,
) -> anyhow::Result<StockMovement> {
    let resp = stock_movement_service::record_movement(
        state,
        CreateStockMovementRequest {
            kind,
            quantity,
            product_id,
            notes: None,
        },
    )
    .await?;
    Ok(resp.data.expect("recorded movement"))
}

pub async fn quantity_of(state: &AppState, product_id: Uuid) -> anyhow::Result<i32> {
    let resp = product_service::get_product(state, product_id).await?;
    Ok(resp.data.expect("product").quantity)
}

/// Signed sum of the movements currently stored for a product.
pub async fn ledger_sum(state: &AppState, product_id: Uuid) -> anyhow::Result<i64> {
    let movements = StockMovements::find()
        .filter(MovementCol::ProductId.eq(product_id))
        .all(&state.orm)
        .await?;
    Ok(movements
        .iter()
        .map(|m| match m.kind.as_str() {
            "entry" => i64::from(m.quantity),
            _ => -i64::from(m.quantity),
        })
        .sum())
}
