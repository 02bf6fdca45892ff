pub mod dashboard_service;
pub mod ledger;
pub mod product_service;
pub mod product_type_service;
pub mod stock_movement_service;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Midnight UTC at the start of `date`.
pub(crate) fn utc_day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
