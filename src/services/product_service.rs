use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    dto::optional_text,
    entity::{
        product_types::Entity as ProductTypes,
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, search_pattern},
    state::AppState,
};

const DUPLICATE_NAME: &str = "A product with this name already exists";
const UNKNOWN_TYPE: &str = "Product type not found";

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all();

    if let Some(pattern) = search_pattern(query.search.as_deref()) {
        condition = condition.add(Expr::col((Products, Column::Name)).ilike(pattern));
    }

    if let Some(product_type_id) = query.product_type_id {
        condition = condition.add(Column::ProductTypeId.eq(product_type_id));
    }

    let finder = Products::find().filter(condition).order_by_asc(Column::Name);

    let (rows, meta) = match query.pagination().normalize() {
        Some((page, limit, offset)) => {
            let total = finder.clone().count(&state.orm).await? as i64;
            let rows = finder
                .find_also_related(ProductTypes)
                .limit(limit as u64)
                .offset(offset as u64)
                .all(&state.orm)
                .await?;
            (rows, Meta::new(page, limit, total))
        }
        None => {
            let rows = finder.find_also_related(ProductTypes).all(&state.orm).await?;
            let total = rows.len() as i64;
            (rows, Meta::total(total))
        }
    };

    let items = rows
        .into_iter()
        .map(|(product, product_type)| Product::from_entity(product, product_type))
        .collect();

    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let (product, product_type) = Products::find_by_id(id)
        .find_also_related(ProductTypes)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success(
        "Product",
        Product::from_entity(product, product_type),
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let payload = payload.validated()?;
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        cost_price: Set(payload.cost_price),
        sale_price: Set(payload.sale_price),
        quantity: Set(payload.quantity),
        expiration_date: Set(payload.expiration_date),
        supplier: Set(payload.supplier),
        product_type_id: Set(payload.product_type_id),
        created_at: NotSet,
    };
    let product = active
        .insert(&state.orm)
        .await
        .map_err(|err| AppError::from_constraint(err, DUPLICATE_NAME, UNKNOWN_TYPE))?;

    tracing::info!(product_id = %product.id, quantity = product.quantity, "product created");
    Ok(ApiResponse::success(
        "Product created",
        with_type(&state.orm, product).await?,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let payload = payload.validated()?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(optional_text(Some(description)));
    }
    if let Some(cost_price) = payload.cost_price {
        active.cost_price = Set(cost_price);
    }
    if let Some(sale_price) = payload.sale_price {
        active.sale_price = Set(sale_price);
    }
    if let Some(expiration_date) = payload.expiration_date {
        active.expiration_date = Set(expiration_date);
    }
    if let Some(supplier) = payload.supplier {
        active.supplier = Set(optional_text(Some(supplier)));
    }
    if let Some(product_type_id) = payload.product_type_id {
        active.product_type_id = Set(product_type_id);
    }

    let product = if active.is_changed() {
        active
            .update(&state.orm)
            .await
            .map_err(|err| AppError::from_constraint(err, DUPLICATE_NAME, UNKNOWN_TYPE))?
    } else {
        existing
    };

    Ok(ApiResponse::success(
        "Updated",
        with_type(&state.orm, product).await?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|err| {
            AppError::from_delete_constraint(
                err,
                "This product cannot be deleted while it has stock movements",
            )
        })?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Product"));
    }

    tracing::info!(product_id = %id, "product deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn with_type<C: ConnectionTrait>(conn: &C, product: ProductModel) -> AppResult<Product> {
    let product_type = match product.product_type_id {
        Some(type_id) => ProductTypes::find_by_id(type_id).one(conn).await?,
        None => None,
    };
    Ok(Product::from_entity(product, product_type))
}
