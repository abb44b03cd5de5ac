//! Typed query parameters for the list/search endpoints.
//!
//! `page`/`per_page` are repeated in every query struct instead of a flattened
//! `Pagination`, since flattening breaks non-string fields in urlencoded queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::orders::OrderStatus;

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page number, default 1
    pub page: Option<i64>,
    /// Items per page, default 20, max 100
    pub per_page: Option<i64>,
    pub category_id: Option<Uuid>,
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub is_active: Option<bool>,
    #[param(inline)]
    pub sort_by: Option<ProductSortBy>,
    #[param(inline)]
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Ignored for non-admin callers, who only ever see their own orders
    pub user_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub total_min: Option<Decimal>,
    pub total_max: Option<Decimal>,
    /// RFC 3339 timestamp
    pub created_after: Option<DateTime<Utc>>,
    /// RFC 3339 timestamp
    pub created_before: Option<DateTime<Utc>>,
    #[param(inline)]
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CartListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub user_id: Option<Uuid>,
    pub total_min: Option<Decimal>,
    pub total_max: Option<Decimal>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub name: Option<String>,
    pub parent_id: Option<Uuid>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

macro_rules! impl_pagination {
    ($($ty:ty),*) => {
        $(impl $ty {
            pub fn pagination(&self) -> Pagination {
                Pagination {
                    page: self.page,
                    per_page: self.per_page,
                }
            }
        })*
    };
}

impl_pagination!(ProductQuery, OrderListQuery, CartListQuery, CategoryQuery, UserQuery);

/// Turns an optional free-text filter into a lowercase `LIKE` pattern,
/// ignoring blank input.
pub fn like_pattern(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| format!("%{}%", v.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::Uri};
    use rust_decimal_macros::dec;

    fn parse<T: serde::de::DeserializeOwned>(uri: &str) -> Result<T, String> {
        let uri: Uri = uri.parse().map_err(|e| format!("{e}"))?;
        Query::<T>::try_from_uri(&uri)
            .map(|Query(q)| q)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        let p = Pagination {
            page: Some(3),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (3, 100, 200));
        let p = Pagination {
            page: Some(-4),
            per_page: Some(0),
        };
        assert_eq!(p.normalize(), (1, 1, 0));
    }

    #[test]
    fn order_query_parses_typed_values() {
        let q: OrderListQuery = parse(
            "/orders?status=PAID&total_min=10.50&created_after=2025-01-01T00:00:00Z&page=2",
        )
        .unwrap();
        assert_eq!(q.status, Some(OrderStatus::Paid));
        assert_eq!(q.total_min, Some(dec!(10.50)));
        assert!(q.created_after.is_some());
        assert_eq!(q.pagination().normalize(), (2, 20, 20));
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert!(parse::<OrderListQuery>("/orders?status=LOST").is_err());
        assert!(parse::<OrderListQuery>("/orders?total_min=cheap").is_err());
        assert!(parse::<ProductQuery>("/products?is_active=maybe").is_err());
        assert!(parse::<CartListQuery>("/cart/search?user_id=42").is_err());
    }

    #[test]
    fn product_query_parses_sort_and_flags() {
        let q: ProductQuery =
            parse("/products?is_active=true&sort_by=price&sort_order=asc&price_max=99.99").unwrap();
        assert_eq!(q.is_active, Some(true));
        assert!(matches!(q.sort_by, Some(ProductSortBy::Price)));
        assert!(matches!(q.sort_order, Some(SortOrder::Asc)));
        assert_eq!(q.price_max, Some(dec!(99.99)));
    }

    #[test]
    fn like_pattern_lowercases_and_skips_blank() {
        assert_eq!(like_pattern(Some("  Mug ")), Some("%mug%".into()));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }
}
