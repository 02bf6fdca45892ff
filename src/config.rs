use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub cors_allowed_origins: Vec<String>,
    pub low_stock_threshold: i32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3001);
        let max_connections = parse_or("DB_MAX_CONNECTIONS", 10);
        let low_stock_threshold = parse_or("LOW_STOCK_THRESHOLD", DEFAULT_LOW_STOCK_THRESHOLD);
        let cors_allowed_origins = split_origins(
            &env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );
        Ok(Self {
            port,
            database_url,
            host,
            max_connections,
            cors_allowed_origins,
            low_stock_threshold,
        })
    }
}

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
