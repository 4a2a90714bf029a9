//! Middleware for the REST API server.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Bearer-token settings for [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub api_key: String,
}

impl AuthConfig {
    /// Read `MYNAH_REQUIRE_AUTH` / `MYNAH_API_KEY`.
    ///
    /// Returns `None` when auth is not required or no key is set.
    pub fn from_env() -> Option<Self> {
        std::env::var("MYNAH_REQUIRE_AUTH").ok()?;
        let api_key = std::env::var("MYNAH_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            warn!("MYNAH_REQUIRE_AUTH is set but MYNAH_API_KEY is empty; auth disabled");
            return None;
        }
        Some(Self { api_key })
    }
}

/// Create CORS middleware.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Request logging middleware.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

/// API key authentication middleware.
///
/// Accepts `Authorization: Bearer <key>` or `Authorization: Token <key>`.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| {
            header
                .strip_prefix("Bearer ")
                .or_else(|| header.strip_prefix("Token "))
        });

    match token {
        Some(token) if token == auth.api_key => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
