//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::types::AskRequest;
use crate::api::types::AskResponse;
use crate::api::types::ErrorBody;
use crate::api::types::HealthResponse;
use crate::errors::WebRagError;
use crate::rag::AskService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ask_service: Arc<AskService>,
}

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Ask handler (POST /api/ask)
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, Json<ErrorBody>)> {
    info!("POST /api/ask: {}", req.question);

    match state.ask_service.ask(&req.question).await {
        Ok(outcome) => Ok(Json(AskResponse::from(&outcome))),
        Err(e) => {
            error!("Error processing ask request: {}", e);
            Err((
                status_for(&e),
                Json(ErrorBody {
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                }),
            ))
        }
    }
}

/// Map an error kind to its HTTP status.
fn status_for(err: &WebRagError) -> StatusCode {
    match err {
        WebRagError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        WebRagError::Upstream(_) | WebRagError::Embedding(_) | WebRagError::Generation(_) => {
            StatusCode::BAD_GATEWAY
        }
        WebRagError::Validation(_) => StatusCode::BAD_REQUEST,
        WebRagError::Serialization(_) | WebRagError::TomlParsing(_) | WebRagError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&WebRagError::Configuration("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&WebRagError::Upstream("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&WebRagError::Embedding("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&WebRagError::Generation("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&WebRagError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let Json(response) = health().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
