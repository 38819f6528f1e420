//! Per-client rate limiting middleware.
//!
//! Counters live in process memory; in a multi-instance deployment each
//! instance enforces its own window.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::AppState;
use crate::infra::RateLimiter;

/// 429 response carrying the standard rate limit headers
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.retry_after.to_string()) {
            headers.insert("Retry-After", value);
        }
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            "Too many requests. Please try again later.",
        )
            .into_response()
    }
}

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise uses connection IP.
fn get_client_identifier(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        // First IP in the chain is the original client
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

fn enforce(
    limiter: &Arc<RateLimiter>,
    scope: &str,
    request: &Request,
) -> Result<u64, RateLimitError> {
    let client_id = get_client_identifier(request);
    let key = format!("{}:{}", scope, client_id);

    let (count, allowed) = limiter.check(&key);

    if !allowed {
        tracing::warn!(client = %client_id, scope = scope, count = count, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: limiter.window_seconds(),
        });
    }

    Ok(count)
}

fn stamp_headers(response: &mut Response, limiter: &Arc<RateLimiter>, count: u64) {
    let remaining = limiter.max_requests().saturating_sub(count);
    if let Ok(value) = HeaderValue::from_str(&limiter.max_requests().to_string()) {
        response.headers_mut().insert("X-RateLimit-Limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
        response.headers_mut().insert("X-RateLimit-Remaining", value);
    }
}

/// General rate limiting middleware for authenticated routes.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let count = enforce(&state.rate_limiter, "general", &request)?;

    let mut response = next.run(request).await;
    stamp_headers(&mut response, &state.rate_limiter, count);

    Ok(response)
}

/// Stricter rate limiting for the authentication endpoints.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let count = enforce(&state.auth_rate_limiter, "auth", &request)?;

    let mut response = next.run(request).await;
    stamp_headers(&mut response, &state.auth_rate_limiter, count);

    Ok(response)
}
