use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::dashboard::{
        DashboardStats, RecentMovement, RecentMovementProduct, StockTrendPoint, TypeDistribution,
    },
    entity::{
        product_types::Entity as ProductTypes,
        products::{Column as ProdCol, Entity as Products},
        stock_movements::{Column as MovementCol, Entity as StockMovements},
    },
    error::{AppError, AppResult},
    models::MovementType,
    response::{ApiResponse, Meta},
    services::utc_day_start,
    state::AppState,
};

const RECENT_LIMIT: u64 = 10;
const TREND_DAYS: u64 = 7;

#[derive(Debug, sqlx::FromRow)]
struct PricedMovementRow {
    kind: String,
    quantity: i32,
    cost_price: Decimal,
    sale_price: Decimal,
}

/// A movement with the prices of its product, as used for daily figures.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedMovement {
    pub kind: MovementType,
    pub quantity: i32,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct DatedMovementRow {
    kind: String,
    quantity: i32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatedMovement {
    pub kind: MovementType,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TypeCount {
    pub id: Uuid,
    pub name: String,
    pub count: i64,
}

pub async fn stats(state: &AppState) -> AppResult<ApiResponse<DashboardStats>> {
    let total_products = Products::find().count(&state.orm).await? as i64;
    let total_product_types = ProductTypes::find().count(&state.orm).await? as i64;
    let low_stock_products = Products::find()
        .filter(ProdCol::Quantity.lte(state.low_stock_threshold))
        .count(&state.orm)
        .await? as i64;

    let (start, end) = utc_day_bounds(Utc::now().date_naive())?;
    let rows = sqlx::query_as::<_, PricedMovementRow>(
        r#"
        SELECT m.type AS kind, m.quantity, p.cost_price, p.sale_price
        FROM stock_movements m
        JOIN products p ON p.id = m.product_id
        WHERE m.created_at >= $1 AND m.created_at < $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let today = rows
        .into_iter()
        .map(|row| -> AppResult<PricedMovement> {
            Ok(PricedMovement {
                kind: row.kind.parse()?,
                quantity: row.quantity,
                cost_price: row.cost_price,
                sale_price: row.sale_price,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let data = DashboardStats {
        total_products,
        total_product_types,
        low_stock_products,
        ..daily_figures(&today)
    };
    Ok(ApiResponse::success("Dashboard stats", data, Some(Meta::empty())))
}

pub async fn recent_movements(state: &AppState) -> AppResult<ApiResponse<Vec<RecentMovement>>> {
    let rows = StockMovements::find()
        .order_by_desc(MovementCol::CreatedAt)
        .limit(RECENT_LIMIT)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|(movement, product)| -> AppResult<RecentMovement> {
            Ok(RecentMovement {
                id: movement.id,
                product: RecentMovementProduct {
                    name: product.map(|p| p.name),
                },
                kind: movement.kind.parse()?,
                quantity: movement.quantity,
                created_at: movement.created_at.with_timezone(&Utc),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success("Recent movements", items, Some(Meta::empty())))
}

pub async fn stock_trend(state: &AppState) -> AppResult<ApiResponse<Vec<StockTrendPoint>>> {
    let today = Utc::now().date_naive();
    let first_day = today
        .checked_sub_days(Days::new(TREND_DAYS - 1))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("trend window out of range")))?;

    let rows = sqlx::query_as::<_, DatedMovementRow>(
        r#"
        SELECT type AS kind, quantity, created_at
        FROM stock_movements
        WHERE created_at >= $1
        ORDER BY created_at
        "#,
    )
    .bind(utc_day_start(first_day))
    .fetch_all(&state.pool)
    .await?;

    let movements = rows
        .into_iter()
        .map(|row| -> AppResult<DatedMovement> {
            Ok(DatedMovement {
                kind: row.kind.parse()?,
                quantity: row.quantity,
                created_at: row.created_at,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Stock trend",
        trend(today, &movements),
        Some(Meta::empty()),
    ))
}

pub async fn product_type_distribution(
    state: &AppState,
) -> AppResult<ApiResponse<Vec<TypeDistribution>>> {
    let total_products = Products::find().count(&state.orm).await? as i64;
    let counts = sqlx::query_as::<_, TypeCount>(
        r#"
        SELECT pt.id, pt.name, COUNT(p.id) AS count
        FROM product_types pt
        JOIN products p ON p.product_type_id = pt.id
        GROUP BY pt.id, pt.name
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Product type distribution",
        distribution(counts, total_products),
        Some(Meta::empty()),
    ))
}

fn utc_day_bounds(day: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let next = day
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("day out of range")))?;
    Ok((utc_day_start(day), utc_day_start(next)))
}

/// Today's purchase, sale and profit figures. Profit is sales value minus
/// the cost of what was sold; the margin is relative to sales value.
pub fn daily_figures(movements: &[PricedMovement]) -> DashboardStats {
    let mut stats = DashboardStats::default();
    let mut cost_of_sales = Decimal::ZERO;

    for m in movements {
        let quantity = Decimal::from(m.quantity);
        match m.kind {
            MovementType::Entry => {
                stats.today_purchases += i64::from(m.quantity);
                stats.today_purchases_value += quantity * m.cost_price;
            }
            MovementType::Exit => {
                stats.today_sales += i64::from(m.quantity);
                stats.today_sales_value += quantity * m.sale_price;
                cost_of_sales += quantity * m.cost_price;
            }
        }
    }

    stats.today_balance = stats.today_purchases - stats.today_sales;
    stats.today_profit = stats.today_sales_value - cost_of_sales;
    stats.today_profit_margin = if stats.today_sales_value > Decimal::ZERO {
        (stats.today_profit / stats.today_sales_value * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    };
    stats
}

/// One point per UTC day for the seven days ending with `today`, oldest first.
pub fn trend(today: NaiveDate, movements: &[DatedMovement]) -> Vec<StockTrendPoint> {
    (0..TREND_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|day| {
            let (entries, exits) = movements
                .iter()
                .filter(|m| m.created_at.date_naive() == day)
                .fold((0i64, 0i64), |(entries, exits), m| match m.kind {
                    MovementType::Entry => (entries + i64::from(m.quantity), exits),
                    MovementType::Exit => (entries, exits + i64::from(m.quantity)),
                });
            StockTrendPoint {
                date: day.format("%d/%m").to_string(),
                entries,
                exits,
                balance: entries - exits,
            }
        })
        .collect()
}

/// Share of products per type, largest first. Percentages are rounded to
/// whole numbers against all products, typed or not.
pub fn distribution(counts: Vec<TypeCount>, total_products: i64) -> Vec<TypeDistribution> {
    if total_products <= 0 {
        return Vec::new();
    }
    let mut items: Vec<TypeDistribution> = counts
        .into_iter()
        .filter(|c| c.count > 0)
        .map(|c| TypeDistribution {
            id: c.id,
            name: c.name,
            value: c.count,
            percentage: (c.count as f64 / total_products as f64 * 100.0).round() as i64,
        })
        .collect();
    items.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn priced(kind: MovementType, quantity: i32, cost: i64, sale: i64) -> PricedMovement {
        PricedMovement {
            kind,
            quantity,
            cost_price: Decimal::from(cost),
            sale_price: Decimal::from(sale),
        }
    }

    #[test]
    fn daily_profit_uses_cost_of_goods_sold() {
        let stats = daily_figures(&[
            priced(MovementType::Entry, 10, 4, 6),
            priced(MovementType::Exit, 5, 4, 6),
        ]);
        assert_eq!(stats.today_purchases, 10);
        assert_eq!(stats.today_sales, 5);
        assert_eq!(stats.today_balance, 5);
        assert_eq!(stats.today_purchases_value, Decimal::from(40));
        assert_eq!(stats.today_sales_value, Decimal::from(30));
        assert_eq!(stats.today_profit, Decimal::from(10));
        assert_eq!(stats.today_profit_margin, Decimal::new(3333, 2));
    }

    #[test]
    fn no_sales_means_no_margin() {
        let stats = daily_figures(&[priced(MovementType::Entry, 3, 2, 5)]);
        assert_eq!(stats.today_profit, Decimal::ZERO);
        assert_eq!(stats.today_profit_margin, Decimal::ZERO);
    }

    #[test]
    fn trend_covers_seven_days_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap();
        let movements = vec![
            DatedMovement {
                kind: MovementType::Entry,
                quantity: 8,
                created_at: at(2, 1),
            },
            DatedMovement {
                kind: MovementType::Exit,
                quantity: 3,
                created_at: at(2, 23),
            },
            DatedMovement {
                kind: MovementType::Exit,
                quantity: 2,
                created_at: at(1, 12),
            },
        ];

        let points = trend(today, &movements);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, "24/02");
        assert_eq!(points[5].date, "01/03");
        assert_eq!(points[5].exits, 2);
        assert_eq!(points[5].balance, -2);
        assert_eq!(
            points[6],
            StockTrendPoint {
                date: "02/03".into(),
                entries: 8,
                exits: 3,
                balance: 5,
            }
        );
    }

    #[test]
    fn distribution_sorts_by_count_and_rounds() {
        let counts = vec![
            TypeCount {
                id: Uuid::new_v4(),
                name: "Grains".into(),
                count: 1,
            },
            TypeCount {
                id: Uuid::new_v4(),
                name: "Drinks".into(),
                count: 2,
            },
        ];
        let items = distribution(counts, 3);
        assert_eq!(items[0].name, "Drinks");
        assert_eq!(items[0].percentage, 67);
        assert_eq!(items[1].percentage, 33);
    }

    #[test]
    fn distribution_without_products_is_empty() {
        assert!(distribution(Vec::new(), 0).is_empty());
    }

    #[test]
    fn day_bounds_span_one_utc_day() {
        let day = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let (start, end) = utc_day_bounds(day).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
    }
}
