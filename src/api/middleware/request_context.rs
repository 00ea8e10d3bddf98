//! Per-request context used by error rendering.
//!
//! The middleware resolves a correlation id for every request and scopes a
//! [`RequestContext`] over the rest of the stack, so that [`crate::error::AppError`]
//! can fill `instance` and `correlationId` without threading them through
//! every handler.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::state::AppState;

pub const CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

const MAX_CORRELATION_ID_LEN: usize = 128;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: String,
    /// Request path, rendered as the problem `instance`.
    pub instance: String,
    pub expose_error_details: bool,
}

tokio::task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Runs `fut` with `ctx` as the current request context.
pub async fn scope<F: Future>(ctx: RequestContext, fut: F) -> F::Output {
    REQUEST_CONTEXT.scope(ctx, fut).await
}

/// Context of the request being handled, if any.
pub fn current() -> Option<RequestContext> {
    REQUEST_CONTEXT.try_with(Clone::clone).ok()
}

/// Resolves the correlation id, scopes the request context and echoes the id
/// on the response as `X-Correlation-Id`.
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let correlation_id = req
        .headers()
        .get(&CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|id| is_valid_correlation_id(id))
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let ctx = RequestContext {
        correlation_id: correlation_id.clone(),
        instance: req.uri().path().to_string(),
        expose_error_details: st.expose_error_details,
    };

    let span = tracing::info_span!("request_context", correlation_id = %correlation_id);
    let mut response = scope(ctx, next.run(req)).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

fn is_valid_correlation_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_CORRELATION_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic())
}
