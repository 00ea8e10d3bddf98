//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use uuid::Uuid;

use crate::domain::tenant_context::TenantContext;
use crate::{error::AppError, state::AppState};

/// Header through which super admins pick the tenant to act on.
pub const TENANT_ID_HEADER: HeaderName = HeaderName::from_static("x-tenant-id");

/// Authenticates requests and attaches the caller's [`TenantContext`].
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// X-Tenant-Id: <uuid>          (optional)
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Validate the token hash and the owning user (and their tenant)
/// 3. Resolve the tenant context, honoring `X-Tenant-Id` for super admins
/// 4. Store the context in request extensions for handlers
///
/// # Errors
///
/// - `401 Unauthorized` if the header is missing or the token is invalid or revoked
/// - `403 Forbidden` for inactive users or tenants and cross-tenant requests
/// - `400 Bad Request` if `X-Tenant-Id` is not a UUID
/// - `404 Not Found` if a super admin impersonates an unknown tenant
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/api/events", get(list_events_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            metrics::counter!("auth_failures_total", "reason" => "missing_header").increment(1);
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let user = st.auth_service.authenticate(&token).await?;
    let ctx = TenantContext::resolve(&user, requested_tenant(&parts.headers)?)?;

    if ctx.impersonating {
        // Impersonating a tenant that does not exist is reported before any handler runs.
        let tenant = st.tenant_service.get_tenant(&ctx, ctx.require_tenant()?).await?;
        tracing::info!(user_id = %ctx.user_id, tenant_id = %tenant.id, "Impersonating tenant");
    }

    parts.extensions.insert(ctx);
    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

fn requested_tenant(headers: &HeaderMap) -> Result<Option<Uuid>, AppError> {
    let Some(value) = headers.get(&TENANT_ID_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .map(Some)
        .ok_or_else(|| AppError::validation("X-Tenant-Id", "X-Tenant-Id must be a UUID"))
}
