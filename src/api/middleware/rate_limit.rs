//! Rate limiting middleware using token bucket algorithm.
//!
//! Two tiers exist: a generous one for the public branding lookup and a
//! stricter one for the authenticated API. Both key on the client IP; behind a
//! trusted reverse proxy use [`SmartIpKeyExtractor`] so forwarded headers are
//! honored. Rejections are rendered as problem documents like every other
//! error.

use anyhow::{Context, Result};
use axum::response::{IntoResponse, Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor,
};

use crate::error::AppError;

pub use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};

/// Token bucket parameters of one tier.
///
/// One token is restored every `period`; at most `burst_size` are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub period: Duration,
    pub burst_size: u32,
}

impl RateLimit {
    /// Sustained rate in requests per second.
    pub fn requests_per_second(&self) -> f64 {
        1.0 / self.period.as_secs_f64()
    }
}

/// 20 requests per second, bursts of 100.
pub const PUBLIC: RateLimit = RateLimit {
    period: Duration::from_millis(50),
    burst_size: 100,
};

/// 5 requests per second, bursts of 50.
pub const API: RateLimit = RateLimit {
    period: Duration::from_millis(200),
    burst_size: 50,
};

pub type RateLimitLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter with the given limits and client key.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Errors
///
/// Returns an error if `limits` has a zero period or burst.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/branding/public/{slug}", get(public_branding_handler))
///     .layer(rate_limit::layer(PeerIpKeyExtractor, rate_limit::PUBLIC)?);
/// ```
pub fn layer<K>(key_extractor: K, limits: RateLimit) -> Result<RateLimitLayer<K>>
where
    K: KeyExtractor,
{
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(key_extractor)
        .period(limits.period)
        .burst_size(limits.burst_size)
        .finish()
        .with_context(|| format!("Invalid rate limit: {limits:?}"))?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)).error_handler(rejection_response))
}

fn rejection_response(error: GovernorError) -> Response {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            let mut response = AppError::too_many_requests(
                "Too many requests",
                json!({ "retry_after_secs": wait_time }),
            )
            .into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => {
            AppError::internal("Unable to determine client address", json!({})).into_response()
        }
        GovernorError::Other { msg, .. } => AppError::internal(
            msg.unwrap_or_else(|| "Rate limiter failure".to_string()),
            json!({}),
        )
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::request_context::{self, RequestContext};
    use axum::http::{HeaderMap, header};
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;
    use tower_governor::key_extractor::GlobalKeyExtractor;

    #[test]
    fn test_builds_both_tiers() {
        assert!(layer(PeerIpKeyExtractor, PUBLIC).is_ok());
        assert!(layer(SmartIpKeyExtractor, API).is_ok());
    }

    #[test]
    fn test_tier_rates() {
        assert_eq!(API.requests_per_second(), 5.0);
        assert_eq!(PUBLIC.requests_per_second(), 20.0);
        assert!(PUBLIC.burst_size > API.burst_size);
    }

    #[test]
    fn test_zero_burst_is_rejected() {
        let limits = RateLimit {
            period: Duration::from_millis(100),
            burst_size: 0,
        };
        assert!(layer(PeerIpKeyExtractor, limits).is_err());
    }

    #[tokio::test]
    async fn test_rejection_is_a_problem_document() {
        let ctx = RequestContext {
            correlation_id: "corr-429".to_string(),
            instance: "/api/events".to_string(),
            expose_error_details: false,
        };
        let mut headers = HeaderMap::new();
        headers.insert(header::RETRY_AFTER, 3.into());

        let response = request_context::scope(ctx, async {
            rejection_response(GovernorError::TooManyRequests {
                wait_time: 3,
                headers: Some(headers),
            })
        })
        .await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "3");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let problem: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(problem["status"], 429);
        assert_eq!(problem["title"], "Too Many Requests");
        assert_eq!(problem["instance"], "/api/events");
        assert_eq!(problem["correlationId"], "corr-429");
        assert_eq!(problem["details"]["retry_after_secs"], 3);
    }

    #[tokio::test]
    async fn test_token_is_restored_after_one_period() {
        let limits = RateLimit {
            period: Duration::from_millis(200),
            burst_size: 1,
        };
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(layer(GlobalKeyExtractor, limits).unwrap());
        let request = || Request::get("/").body(Body::empty()).unwrap();

        let first = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let third = app.oneshot(request()).await.unwrap();
        assert_eq!(third.status(), StatusCode::OK);
    }
}
