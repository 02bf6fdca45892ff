mod common;

use chrono::{Days, NaiveDate, Utc};
use common::{create_product, create_type, record, setup_state, unique};
use rust_decimal::Decimal;
use stock_manager_api::{
    dto::{
        product_types::{CreateProductTypeRequest, UpdateProductTypeRequest},
        products::{CreateProductRequest, UpdateProductRequest},
    },
    error::AppError,
    models::MovementType,
    routes::params::{MovementQuery, ProductQuery},
    services::{product_service, product_type_service, stock_movement_service},
    state::AppState,
};
use uuid::Uuid;

fn product_named(name: &str, product_type_id: Option<Uuid>) -> CreateProductRequest {
    CreateProductRequest {
        name: name.into(),
        description: None,
        cost_price: Decimal::new(400, 2),
        sale_price: Decimal::new(500, 2),
        quantity: 1,
        expiration_date: None,
        supplier: None,
        product_type_id,
    }
}

async fn create_named(state: &AppState, name: &str) -> anyhow::Result<()> {
    product_service::create_product(state, product_named(name, None)).await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_type_name_conflicts() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let existing = create_type(&state).await?;

    let err = product_type_service::create_product_type(
        &state,
        CreateProductTypeRequest {
            name: existing.name.clone(),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn type_in_use_cannot_be_deleted() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let product_type = create_type(&state).await?;
    let product = create_product(&state, 2, Some(product_type.id)).await?;
    assert_eq!(
        product.product_type.as_ref().map(|t| t.id),
        Some(product_type.id)
    );

    let err = product_type_service::delete_product_type(&state, product_type.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DependencyViolation(_)));

    product_service::delete_product(&state, product.id).await?;
    product_type_service::delete_product_type(&state, product_type.id).await?;
    Ok(())
}

#[tokio::test]
async fn product_with_movements_cannot_be_deleted() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let product = create_product(&state, 0, None).await?;
    record(&state, product.id, MovementType::Entry, 3).await?;

    let err = product_service::delete_product(&state, product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DependencyViolation(_)));
    assert!(product_service::get_product(&state, product.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn unknown_product_type_is_not_found() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let err = product_service::create_product(
        &state,
        product_named(&unique("Orphan"), Some(Uuid::new_v4())),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn renaming_to_an_existing_name_conflicts() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let first = create_product(&state, 0, None).await?;
    let second = create_product(&state, 0, None).await?;

    let err = product_service::update_product(
        &state,
        second.id,
        UpdateProductRequest {
            name: Some(first.name.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn update_keeps_stock_and_recomputes_profit() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let product = create_product(&state, 9, None).await?;

    let updated = product_service::update_product(
        &state,
        product.id,
        UpdateProductRequest {
            sale_price: Some(Decimal::new(2000, 2)),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("updated product");

    assert_eq!(updated.quantity, 9);
    assert_eq!(updated.profit_value, Decimal::new(1000, 2));
    assert_eq!(updated.profit_margin, Decimal::new(10000, 2));
    Ok(())
}

#[tokio::test]
async fn null_fields_clear_type_and_expiration() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let product_type = create_type(&state).await?;
    let mut request = product_named(&unique("Yogurt"), Some(product_type.id));
    request.expiration_date = NaiveDate::from_ymd_opt(2027, 3, 1);
    let product = product_service::create_product(&state, request)
        .await?
        .data
        .expect("created product");
    assert_eq!(product.product_type_id, Some(product_type.id));

    let untouched = product_service::update_product(
        &state,
        product.id,
        serde_json::from_value(serde_json::json!({ "supplier": "Dairy Co" }))?,
    )
    .await?
    .data
    .expect("updated product");
    assert_eq!(untouched.product_type_id, Some(product_type.id));
    assert_eq!(untouched.expiration_date, NaiveDate::from_ymd_opt(2027, 3, 1));

    let cleared = product_service::update_product(
        &state,
        product.id,
        serde_json::from_value(serde_json::json!({
            "productTypeId": null,
            "expirationDate": null
        }))?,
    )
    .await?
    .data
    .expect("updated product");
    assert_eq!(cleared.product_type_id, None);
    assert!(cleared.product_type.is_none());
    assert_eq!(cleared.expiration_date, None);

    product_type_service::delete_product_type(&state, product_type.id).await?;
    Ok(())
}

#[tokio::test]
async fn blank_type_description_is_stored_as_null() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let product_type = create_type(&state).await?;

    let described = product_type_service::update_product_type(
        &state,
        product_type.id,
        UpdateProductTypeRequest {
            name: None,
            description: Some("  Chilled goods ".into()),
        },
    )
    .await?
    .data
    .expect("updated type");
    assert_eq!(described.description.as_deref(), Some("Chilled goods"));

    let blanked = product_type_service::update_product_type(
        &state,
        product_type.id,
        UpdateProductTypeRequest {
            name: None,
            description: Some("   ".into()),
        },
    )
    .await?
    .data
    .expect("updated type");
    assert_eq!(blanked.description, None);
    Ok(())
}

#[tokio::test]
async fn price_beyond_column_range_is_a_bad_request() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let mut request = product_named(&unique("Gold bar"), None);
    request.cost_price = Decimal::new(10_000_000_000, 0);
    let err = product_service::create_product(&state, request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let product = create_product(&state, 0, None).await?;
    let err = product_service::update_product(
        &state,
        product.id,
        UpdateProductRequest {
            sale_price: Some(Decimal::new(10_000_000_000, 0)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn deleting_missing_product_is_not_found() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let err = product_service::delete_product(&state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn paginated_search_reports_page_meta() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let token = Uuid::new_v4().simple().to_string();
    for label in ["Alpha", "Bravo", "Charlie"] {
        create_named(&state, &format!("{label} {token}")).await?;
    }

    let resp = product_service::list_products(
        &state,
        ProductQuery {
            page: Some(1),
            limit: Some(2),
            search: Some(token.to_uppercase()),
            product_type_id: None,
        },
    )
    .await?;
    let meta = resp.meta.expect("meta");
    let names: Vec<_> = resp
        .data
        .expect("products")
        .items
        .into_iter()
        .map(|p| p.name)
        .collect();

    assert_eq!(names, vec![format!("Alpha {token}"), format!("Bravo {token}")]);
    assert_eq!(meta.total, Some(3));
    assert_eq!(meta.total_pages, Some(2));
    assert_eq!(meta.has_next, Some(true));
    assert_eq!(meta.has_prev, Some(false));

    let resp = product_service::list_products(
        &state,
        ProductQuery {
            search: Some(token.clone()),
            ..Default::default()
        },
    )
    .await?;
    let meta = resp.meta.expect("meta");
    assert_eq!(resp.data.expect("products").items.len(), 3);
    assert_eq!(meta.page, None);
    assert_eq!(meta.total, Some(3));
    Ok(())
}

#[tokio::test]
async fn history_respects_the_date_range() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let product = create_product(&state, 0, None).await?;
    let movement = record(&state, product.id, MovementType::Entry, 2).await?;
    let today = movement.created_at.date_naive();

    let history = stock_movement_service::list_movements(
        &state,
        MovementQuery {
            start_date: Some(today),
            end_date: Some(today),
        },
    )
    .await?
    .data
    .expect("history");
    assert!(history.movements.iter().any(|m| m.id == movement.id));
    assert!(history.summary.entries >= 2);

    let last_week = today - Days::new(7);
    let history = stock_movement_service::list_movements(
        &state,
        MovementQuery {
            start_date: Some(last_week),
            end_date: Some(last_week),
        },
    )
    .await?
    .data
    .expect("history");
    assert!(history.movements.iter().all(|m| m.id != movement.id));

    let err = stock_movement_service::list_movements(
        &state,
        MovementQuery {
            start_date: Some(Utc::now().date_naive()),
            end_date: Some(last_week),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}
