//! Stock movements and the product quantity they maintain.
//!
//! Every mutating operation runs in one transaction and takes row locks
//! before reading stock: the movement first (amend, remove), then the
//! product. Concurrent operations on the same product therefore run their
//! read-check-write sequences one after another, and a rejected or failed
//! step drops the transaction without writing anything.

use std::collections::HashMap;

use chrono::Days;
use rust_decimal::Decimal;
use sea_orm::sea_query::LockType;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::optional_text,
    dto::stock_movements::{
        CreateStockMovementRequest, MovementSummary, StockMovementHistory,
        UpdateStockMovementRequest,
    },
    entity::{
        product_types::{Column as TypeCol, Entity as ProductTypes, Model as ProductTypeModel},
        products::{ActiveModel as ProductActive, Entity as Products, Model as ProductModel},
        stock_movements::{
            ActiveModel as MovementActive, Column as MovementCol, Entity as StockMovements,
            Model as MovementModel,
        },
    },
    error::{AppError, AppResult},
    models::{MovementProduct, MovementType, StockMovement},
    response::{ApiResponse, Meta},
    routes::params::MovementQuery,
    services::{
        ledger::{self, Effect},
        utc_day_start,
    },
    state::AppState,
};

pub async fn list_movements(
    state: &AppState,
    query: MovementQuery,
) -> AppResult<ApiResponse<StockMovementHistory>> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(AppError::BadRequest(
                "startDate must not be after endDate".into(),
            ));
        }
    }

    let mut finder = StockMovements::find().order_by_desc(MovementCol::CreatedAt);
    if let Some(start) = query.start_date {
        finder = finder.filter(MovementCol::CreatedAt.gte(utc_day_start(start)));
    }
    if let Some(end) = query.end_date {
        let next_day = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::BadRequest("endDate is out of range".into()))?;
        finder = finder.filter(MovementCol::CreatedAt.lt(utc_day_start(next_day)));
    }

    let rows = finder.find_also_related(Products).all(&state.orm).await?;
    let movements = attach_products(&state.orm, rows).await?;
    let summary = summarize(&movements);
    let total = movements.len() as i64;

    Ok(ApiResponse::success(
        "Stock movements",
        StockMovementHistory { movements, summary },
        Some(Meta::total(total)),
    ))
}

/// Records a new movement and applies its effect to the product.
pub async fn record_movement(
    state: &AppState,
    payload: CreateStockMovementRequest,
) -> AppResult<ApiResponse<StockMovement>> {
    let effect = Effect::new(payload.kind, payload.quantity)?;

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(payload.product_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    let quantity = ledger::record(product.quantity, effect).inspect_err(|err| {
        tracing::warn!(product_id = %product.id, error = %err, "movement rejected");
    })?;

    let movement = MovementActive {
        id: Set(Uuid::new_v4()),
        kind: Set(effect.kind.as_str().to_string()),
        quantity: Set(effect.quantity),
        product_id: Set(product.id),
        notes: Set(optional_text(payload.notes)),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let product = set_quantity(&txn, product, quantity).await?;
    let view = movement_view(&txn, movement, &product).await?;
    txn.commit().await?;

    tracing::info!(
        movement_id = %view.id,
        product_id = %product.id,
        kind = %effect.kind,
        quantity = product.quantity,
        "movement recorded"
    );
    Ok(ApiResponse::success(
        "Stock movement created",
        view,
        Some(Meta::empty()),
    ))
}

/// Changes the type, quantity or notes of a movement, moving the product's
/// stock by the difference between the old and new effects.
pub async fn amend_movement(
    state: &AppState,
    id: Uuid,
    payload: UpdateStockMovementRequest,
) -> AppResult<ApiResponse<StockMovement>> {
    let txn = state.orm.begin().await?;
    let (movement, product) = lock_movement(&txn, id).await?;

    let old = Effect::new(movement.kind.parse()?, movement.quantity)?;
    let new = Effect::new(
        payload.kind.unwrap_or(old.kind),
        payload.quantity.unwrap_or(old.quantity),
    )?;

    let product = if new != old {
        let quantity = ledger::amend(product.quantity, old, new).inspect_err(|err| {
            tracing::warn!(movement_id = %id, error = %err, "amendment rejected");
        })?;
        set_quantity(&txn, product, quantity).await?
    } else {
        product
    };

    let mut active: MovementActive = movement.into();
    active.kind = Set(new.kind.as_str().to_string());
    active.quantity = Set(new.quantity);
    if let Some(notes) = payload.notes {
        active.notes = Set(optional_text(Some(notes)));
    }
    let movement = active.update(&txn).await?;

    let view = movement_view(&txn, movement, &product).await?;
    txn.commit().await?;

    tracing::info!(
        movement_id = %id,
        product_id = %product.id,
        quantity = product.quantity,
        "movement amended"
    );
    Ok(ApiResponse::success(
        "Stock movement updated",
        view,
        Some(Meta::empty()),
    ))
}

/// Deletes a movement after reversing its effect on the product.
pub async fn remove_movement(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<StockMovement>> {
    let txn = state.orm.begin().await?;
    let (movement, product) = lock_movement(&txn, id).await?;

    let effect = Effect::new(movement.kind.parse()?, movement.quantity)?;
    let quantity = ledger::remove(product.quantity, effect).inspect_err(|err| {
        tracing::warn!(movement_id = %id, error = %err, "removal rejected");
    })?;

    let product = set_quantity(&txn, product, quantity).await?;
    StockMovements::delete_by_id(id).exec(&txn).await?;

    let view = movement_view(&txn, movement, &product).await?;
    txn.commit().await?;

    tracing::info!(
        movement_id = %id,
        product_id = %product.id,
        quantity = product.quantity,
        "movement removed"
    );
    Ok(ApiResponse::success(
        "Stock movement deleted",
        view,
        Some(Meta::empty()),
    ))
}

async fn lock_movement<C: ConnectionTrait>(
    txn: &C,
    id: Uuid,
) -> AppResult<(MovementModel, ProductModel)> {
    let movement = StockMovements::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("Stock movement"))?;

    let product = Products::find_by_id(movement.product_id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    Ok((movement, product))
}

async fn set_quantity<C: ConnectionTrait>(
    txn: &C,
    product: ProductModel,
    quantity: i32,
) -> AppResult<ProductModel> {
    let mut active: ProductActive = product.into();
    active.quantity = Set(quantity);
    Ok(active.update(txn).await?)
}

async fn movement_view<C: ConnectionTrait>(
    conn: &C,
    movement: MovementModel,
    product: &ProductModel,
) -> AppResult<StockMovement> {
    let product_type = match product.product_type_id {
        Some(type_id) => ProductTypes::find_by_id(type_id).one(conn).await?,
        None => None,
    };
    let summary = MovementProduct::from_entity(product, product_type.as_ref());
    Ok(StockMovement::from_entity(movement, Some(summary))?)
}

async fn attach_products<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<(MovementModel, Option<ProductModel>)>,
) -> AppResult<Vec<StockMovement>> {
    let mut type_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|(_, product)| product.as_ref().and_then(|p| p.product_type_id))
        .collect();
    type_ids.sort_unstable();
    type_ids.dedup();

    let types: HashMap<Uuid, ProductTypeModel> = if type_ids.is_empty() {
        HashMap::new()
    } else {
        ProductTypes::find()
            .filter(TypeCol::Id.is_in(type_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect()
    };

    rows.into_iter()
        .map(|(movement, product)| -> AppResult<StockMovement> {
            let summary = product.as_ref().map(|p| {
                let product_type = p.product_type_id.and_then(|id| types.get(&id));
                MovementProduct::from_entity(p, product_type)
            });
            Ok(StockMovement::from_entity(movement, summary)?)
        })
        .collect()
}

/// Totals over a list of movements. Entries are valued at cost price and
/// exits at sale price; movements without product data count as zero value.
pub fn summarize(movements: &[StockMovement]) -> MovementSummary {
    let mut summary = MovementSummary::default();
    for movement in movements {
        let quantity = Decimal::from(movement.quantity);
        match movement.kind {
            MovementType::Entry => {
                summary.entries += i64::from(movement.quantity);
                if let Some(product) = &movement.product {
                    summary.entries_value += quantity * product.cost_price;
                }
            }
            MovementType::Exit => {
                summary.exits += i64::from(movement.quantity);
                if let Some(product) = &movement.product {
                    summary.exits_value += quantity * product.sale_price;
                }
            }
        }
    }
    summary.balance = summary.entries - summary.exits;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn movement(kind: MovementType, quantity: i32, cost: i64, sale: i64) -> StockMovement {
        StockMovement {
            id: Uuid::new_v4(),
            kind,
            quantity,
            product_id: Uuid::nil(),
            notes: None,
            created_at: Utc::now(),
            product: Some(MovementProduct {
                id: Uuid::nil(),
                name: "Beans".into(),
                cost_price: Decimal::from(cost),
                sale_price: Decimal::from(sale),
                product_type: None,
            }),
        }
    }

    #[test]
    fn summary_values_entries_at_cost_and_exits_at_sale() {
        let movements = vec![
            movement(MovementType::Entry, 10, 2, 5),
            movement(MovementType::Exit, 3, 2, 5),
            movement(MovementType::Entry, 1, 7, 9),
        ];
        let summary = summarize(&movements);
        assert_eq!(summary.entries, 11);
        assert_eq!(summary.exits, 3);
        assert_eq!(summary.balance, 8);
        assert_eq!(summary.entries_value, Decimal::from(27));
        assert_eq!(summary.exits_value, Decimal::from(15));
    }

    #[test]
    fn movements_without_product_add_quantity_only() {
        let mut orphan = movement(MovementType::Exit, 4, 1, 1);
        orphan.product = None;
        let summary = summarize(&[orphan]);
        assert_eq!(summary.exits, 4);
        assert_eq!(summary.balance, -4);
        assert_eq!(summary.exits_value, Decimal::ZERO);
    }

    #[test]
    fn empty_history_has_empty_summary() {
        assert_eq!(summarize(&[]), MovementSummary::default());
    }
}
