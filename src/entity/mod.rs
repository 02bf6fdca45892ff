pub mod product_types;
pub mod products;
pub mod stock_movements;

pub use product_types::Entity as ProductTypes;
pub use products::Entity as Products;
pub use stock_movements::Entity as StockMovements;
