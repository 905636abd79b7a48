//! Defines routes for the gateway and probe endpoints.
//!
//! ## Structure
//! - **Gateways** (POST only, OPTIONS answered for CORS, anything else 405)
//!   - `POST /api/transcribe-video`: multipart upload with a `video` field
//!   - `POST /api/generate-content`: JSON `{ transcript, preferences }`
//!
//! - **Probes**
//!   - `GET /healthz`: liveness
//!   - `GET /readyz`: provider credential present

use crate::{
    handlers::{
        gateway_handlers::{generate_content, method_not_allowed, preflight, transcribe_video},
        health_handlers::{healthz, readyz},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build and return the router for all endpoints.
///
/// `max_request_bytes` bounds the whole request body accepted by the gateways.
pub fn routes(max_request_bytes: usize) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let gateways = Router::new()
        .route(
            "/api/transcribe-video",
            post(transcribe_video)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/generate-content",
            post(generate_content)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .layer(cors);

    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(gateways)
}
