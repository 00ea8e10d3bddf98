//! Pagination query parameters and paged responses.

use axum::{
    Json,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::Role;
use crate::domain::page::{Page, PageRequest};
use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 25;

const TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");
const PAGE: HeaderName = HeaderName::from_static("x-page");
const PAGE_SIZE: HeaderName = HeaderName::from_static("x-page-size");
const TOTAL_PAGES: HeaderName = HeaderName::from_static("x-total-pages");
const PAGINATION_CAPPED: HeaderName = HeaderName::from_static("x-pagination-capped");

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
/// `pageSize` is accepted as an alias of `page_size`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<u32>,
}

/// A page request after validation and role capping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub request: PageRequest,
    /// The requested page size exceeded the caller's cap and was clamped.
    pub capped: bool,
}

impl PaginationParams {
    /// Validates the parameters and clamps the page size to the role cap.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` or `page_size` is zero.
    pub fn resolve(&self, role: Role) -> Result<Pagination, AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::validation("page", "page must be at least 1"));
        }
        if page_size == 0 {
            return Err(AppError::validation(
                "page_size",
                "page_size must be at least 1",
            ));
        }

        let cap = role.page_size_cap();
        Ok(Pagination {
            request: PageRequest::new(page, page_size.min(cap)),
            capped: page_size > cap,
        })
    }
}

/// Date range filtering parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DateFilterParams {
    #[serde(default, with = "optional_rfc3339")]
    pub from: Option<DateTime<Utc>>,

    #[serde(default, with = "optional_rfc3339")]
    pub to: Option<DateTime<Utc>>,
}

/// Custom Serde deserializer for RFC3339 datetime strings.
mod optional_rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt {
            None => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Body of every paginated response.
#[derive(Debug, Serialize)]
pub struct PagedBody<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

/// One page of DTOs, rendered as [`PagedBody`] plus the pagination headers
/// `X-Total-Count`, `X-Page`, `X-Page-Size`, `X-Total-Pages` and
/// `X-Pagination-Capped`.
#[derive(Debug)]
pub struct Paged<T> {
    body: PagedBody<T>,
    capped: bool,
}

impl<T> Paged<T> {
    pub fn new(page: Page<T>, pagination: Pagination) -> Self {
        let request = pagination.request;
        Self {
            body: PagedBody {
                items: page.items,
                page: request.page,
                page_size: request.page_size,
                total_count: page.total,
                total_pages: request.total_pages(page.total),
            },
            capped: pagination.capped,
        }
    }
}

impl<T: Serialize> IntoResponse for Paged<T> {
    fn into_response(self) -> Response {
        let headers = [
            (TOTAL_COUNT, HeaderValue::from(self.body.total_count)),
            (PAGE, HeaderValue::from(self.body.page)),
            (PAGE_SIZE, HeaderValue::from(self.body.page_size)),
            (TOTAL_PAGES, HeaderValue::from(self.body.total_pages)),
            (
                PAGINATION_CAPPED,
                HeaderValue::from_static(if self.capped { "true" } else { "false" }),
            ),
        ];
        (headers, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let p = params(None, None).resolve(Role::Staff).unwrap();
        assert_eq!(p.request, PageRequest::new(1, 25));
        assert!(!p.capped);
    }

    #[test]
    fn test_zero_values_are_rejected() {
        assert!(params(Some(0), None).resolve(Role::Staff).is_err());
        assert!(params(None, Some(0)).resolve(Role::Staff).is_err());
    }

    #[test]
    fn test_page_size_clamped_to_role_cap() {
        let staff = params(None, Some(150)).resolve(Role::Staff).unwrap();
        assert_eq!(staff.request.page_size, 100);
        assert!(staff.capped);

        let admin = params(None, Some(150)).resolve(Role::TenantAdmin).unwrap();
        assert_eq!(admin.request.page_size, 150);
        assert!(!admin.capped);
    }

    #[test]
    fn test_page_size_at_cap_is_not_capped() {
        let p = params(None, Some(1000)).resolve(Role::SuperAdmin).unwrap();
        assert_eq!(p.request.page_size, 1000);
        assert!(!p.capped);
    }

    #[test]
    fn test_page_size_alias() {
        let p: PaginationParams = serde_json::from_str(r#"{"pageSize": "40"}"#).unwrap();
        assert_eq!(p.page_size, Some(40));
    }

    #[test]
    fn test_paged_body_totals() {
        let pagination = params(Some(2), Some(10)).resolve(Role::Staff).unwrap();
        let paged = Paged::new(Page::new(vec![1, 2, 3], 23), pagination);
        assert_eq!(paged.body.total_pages, 3);
        assert_eq!(paged.body.page, 2);
        assert_eq!(paged.body.total_count, 23);
    }

    #[test]
    fn test_optional_rfc3339_invalid_format_is_error() {
        let json = r#"{"from": "not-a-date"}"#;
        assert!(serde_json::from_str::<DateFilterParams>(json).is_err());
    }
}
