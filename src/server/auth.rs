//! The access guard for the analytics report endpoint.
//!
//! A static shared secret, compared byte for byte against the bearer token
//! of the Authorization header. No identities, no rotation; the guarded
//! endpoint is an internal operator read, not the mutating path.

use super::state::ServerState;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{debug, error};

const AUTHORIZATION_HEADER: &str = "Authorization";
const BEARER_PREFIX: &str = "Bearer ";

/// Extractor proving the request carried the configured report secret.
pub struct ReportAccess;

pub enum ReportAccessError {
    Unauthorized,
    SecretUnconfigured,
}

impl IntoResponse for ReportAccessError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ReportAccessError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized."})),
            )
                .into_response(),
            ReportAccessError::SecretUnconfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Server configuration error."})),
            )
                .into_response(),
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION_HEADER)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

impl FromRequestParts<ServerState> for ReportAccess {
    type Rejection = ReportAccessError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = ctx.config.report_secret.as_deref() else {
            error!("Report secret is not configured, refusing report access.");
            return Err(ReportAccessError::SecretUnconfigured);
        };

        match bearer_token(parts) {
            Some(token) if token == expected => Ok(ReportAccess),
            Some(_) => {
                debug!("Report access rejected: token mismatch.");
                Err(ReportAccessError::Unauthorized)
            }
            None => {
                debug!("Report access rejected: no bearer token.");
                Err(ReportAccessError::Unauthorized)
            }
        }
    }
}
