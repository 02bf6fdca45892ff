use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use stock_manager_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::product_types::CreateProductTypeRequest,
    dto::products::CreateProductRequest,
    entity::{
        product_types::{Column as TypeCol, Entity as ProductTypes},
        products::{Column as ProdCol, Entity as Products},
    },
    services::{product_service, product_type_service},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    run_migrations(&pool).await?;
    let state = AppState::from_config(pool, &config);

    let beverages = ensure_type(&state, "Beverages", "Coffee, tea and soft drinks").await?;
    let groceries = ensure_type(&state, "Groceries", "Dry goods and staples").await?;

    let products = [
        ("Ground Coffee 500g", "Medium roast", 1890, 2990, 40, beverages),
        ("Green Tea 20 bags", "Sencha", 650, 1190, 25, beverages),
        ("Basmati Rice 1kg", "Long grain", 720, 1250, 60, groceries),
        ("Olive Oil 500ml", "Extra virgin", 2100, 3490, 4, groceries),
    ];

    for (name, description, cost, sale, quantity, product_type_id) in products {
        if Products::find()
            .filter(ProdCol::Name.eq(name))
            .one(&state.orm)
            .await?
            .is_some()
        {
            continue;
        }
        product_service::create_product(
            &state,
            CreateProductRequest {
                name: name.into(),
                description: Some(description.into()),
                cost_price: Decimal::new(cost, 2),
                sale_price: Decimal::new(sale, 2),
                quantity,
                expiration_date: None,
                supplier: None,
                product_type_id: Some(product_type_id),
            },
        )
        .await?;
        println!("Seeded product {name}");
    }

    println!("Seed completed");
    Ok(())
}

async fn ensure_type(state: &AppState, name: &str, description: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = ProductTypes::find()
        .filter(TypeCol::Name.eq(name))
        .one(&state.orm)
        .await?
    {
        return Ok(existing.id);
    }

    let created = product_type_service::create_product_type(
        state,
        CreateProductTypeRequest {
            name: name.into(),
            description: Some(description.into()),
        },
    )
    .await?;

    let id = created
        .data
        .map(|t| t.id)
        .ok_or_else(|| anyhow::anyhow!("product type {name} was not returned"))?;
    println!("Ensured product type {name}");
    Ok(id)
}
