//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks the AI provider credential

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;

/// `GET /healthz`
///
/// Liveness probe. Always returns 200 OK and never performs I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// HTTP 200 when the provider credential is configured, HTTP 503 otherwise.
/// No outbound call is made.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let credential_ok = state.provider.is_configured();

    let mut checks = HashMap::new();
    checks.insert(
        "provider_credential",
        CheckStatus {
            ok: credential_ok,
            error: (!credential_ok).then(|| "OPENAI_API_KEY is not set".to_string()),
        },
    );

    let body = ReadyResponse {
        status: if credential_ok {
            "ok".into()
        } else {
            "error".into()
        },
        checks,
    };

    let status = if credential_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}
