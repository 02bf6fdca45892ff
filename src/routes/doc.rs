use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        dashboard::{
            DashboardStats, RecentMovement, RecentMovementProduct, StockTrendPoint,
            TypeDistribution,
        },
        product_types::{CreateProductTypeRequest, ProductTypeList, UpdateProductTypeRequest},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        stock_movements::{
            CreateStockMovementRequest, MovementSummary, StockMovementHistory,
            UpdateStockMovementRequest,
        },
    },
    models::{
        MovementProduct, MovementProductType, MovementType, Product, ProductType, StockMovement,
    },
    response::{ApiResponse, Meta},
    routes::{dashboard, health, product_types, products, stock_movements},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        product_types::list_product_types,
        product_types::create_product_type,
        product_types::update_product_type,
        product_types::delete_product_type,
        stock_movements::list_movements,
        stock_movements::record_movement,
        stock_movements::amend_movement,
        stock_movements::remove_movement,
        dashboard::stats,
        dashboard::recent_movements,
        dashboard::stock_trend,
        dashboard::product_type_distribution
    ),
    components(
        schemas(
            Product,
            ProductType,
            MovementType,
            MovementProduct,
            MovementProductType,
            StockMovement,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateProductTypeRequest,
            UpdateProductTypeRequest,
            ProductTypeList,
            CreateStockMovementRequest,
            UpdateStockMovementRequest,
            MovementSummary,
            StockMovementHistory,
            DashboardStats,
            RecentMovement,
            RecentMovementProduct,
            StockTrendPoint,
            TypeDistribution,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<ProductType>,
            ApiResponse<ProductTypeList>,
            ApiResponse<StockMovement>,
            ApiResponse<StockMovementHistory>,
            ApiResponse<DashboardStats>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog"),
        (name = "Product types", description = "Product categories"),
        (name = "Stock movements", description = "Entries and exits that keep product stock"),
        (name = "Dashboard", description = "Aggregated inventory figures"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/products",
            "/api/products/{id}",
            "/api/product-types",
            "/api/product-types/{id}",
            "/api/stock-movements",
            "/api/stock-movements/{id}",
            "/api/dashboard/stats",
            "/api/dashboard/stock-trend",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
