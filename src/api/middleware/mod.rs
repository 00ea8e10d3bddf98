//! HTTP middleware for request processing and protection.
//!
//! Provides request context, authentication, rate limiting, and observability middleware.

pub mod auth;
pub mod rate_limit;
pub mod request_context;
pub mod tracing;
