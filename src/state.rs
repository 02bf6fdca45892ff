use crate::{
    config::{AppConfig, DEFAULT_LOW_STOCK_THRESHOLD},
    db::{DbPool, OrmConn, create_orm_conn},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub low_stock_threshold: i32,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        let orm = create_orm_conn(&pool);
        Self {
            pool,
            orm,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    pub fn from_config(pool: DbPool, config: &AppConfig) -> Self {
        Self {
            low_stock_threshold: config.low_stock_threshold,
            ..Self::new(pool)
        }
    }
}
