use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Page selection. Lists are paginated only when both fields are present.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Returns `(page, limit, offset)` when pagination was requested.
    pub fn normalize(&self) -> Option<(i64, i64, i64)> {
        let (page, limit) = (self.page?, self.limit?);
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = (page - 1).saturating_mul(limit);
        Some((page, limit, offset))
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Items per page, 1 to 100
    pub limit: Option<i64>,
    /// Case-insensitive match on the product name
    pub search: Option<String>,
    pub product_type_id: Option<Uuid>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductTypeQuery {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Items per page, 1 to 100
    pub limit: Option<i64>,
    /// Case-insensitive match on the type name
    pub search: Option<String>,
}

impl ProductTypeQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MovementQuery {
    /// First day included, `YYYY-MM-DD` (UTC)
    pub start_date: Option<NaiveDate>,
    /// Last day included, `YYYY-MM-DD` (UTC)
    pub end_date: Option<NaiveDate>,
}

pub(crate) fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_needs_both_fields() {
        assert_eq!(Pagination::default().normalize(), None);
        let only_page = Pagination {
            page: Some(2),
            limit: None,
        };
        assert_eq!(only_page.normalize(), None);
    }

    #[test]
    fn pagination_is_clamped() {
        assert_eq!(Pagination::new(0, 500).normalize(), Some((1, 100, 0)));
        assert_eq!(Pagination::new(3, 0).normalize(), Some((3, 1, 2)));
        assert_eq!(Pagination::new(2, 20).normalize(), Some((2, 20, 20)));
    }

    #[test]
    fn huge_page_saturates_the_offset() {
        assert_eq!(
            Pagination::new(i64::MAX, 100).normalize(),
            Some((i64::MAX, 100, i64::MAX))
        );
        assert_eq!(
            Pagination::new(i64::MIN, 100).normalize(),
            Some((1, 100, 0))
        );
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("  ")), None);
        assert_eq!(search_pattern(Some(" cafe ")), Some("%cafe%".into()));
    }
}
