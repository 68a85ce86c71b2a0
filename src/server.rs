//! HTTP boundary.
//!
//! | Route                 | Body            | Success                 |
//! |-----------------------|-----------------|-------------------------|
//! | `POST /convert`       | raw `.docx`     | `200` [`PagesResponse`] |
//! | `POST /convert/text`  | raw `.docx`     | `200` [`TextResponse`]  |
//! | `GET  /health`        | –               | `200 {status, version}` |
//!
//! A document that cannot be parsed answers `400 {"error": ...}`; anything
//! else that goes wrong answers `500 {"error": ...}`. Requests share one
//! [`Converter`] (and so one loaded font) through `Arc`.

use crate::convert::Converter;
use crate::error::DocPagesError;
use crate::output::{ErrorResponse, PagesResponse, TextResponse};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Largest accepted upload.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl IntoResponse for DocPagesError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            warn!("Rejected document: {}", self);
            StatusCode::BAD_REQUEST
        } else {
            error!("Conversion failed: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn convert_pages(
    State(converter): State<Arc<Converter>>,
    body: Bytes,
) -> Result<Json<PagesResponse>, DocPagesError> {
    let output = converter.convert_pages(body.to_vec()).await?;
    Ok(Json(output.into_pages_response()))
}

async fn convert_text(
    State(converter): State<Arc<Converter>>,
    body: Bytes,
) -> Result<Json<TextResponse>, DocPagesError> {
    let text = converter.convert_text(body.to_vec()).await?;
    Ok(Json(TextResponse::new(text)))
}

/// Build the application router.
pub fn router(converter: Arc<Converter>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/convert", post(convert_pages))
        .route("/convert/text", post(convert_text))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(converter)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, converter: Arc<Converter>) -> Result<(), DocPagesError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DocPagesError::ResourceInit {
            resource: format!("listener on {}", addr),
            detail: e.to_string(),
        })?;

    info!("Listening on {}", addr);
    axum::serve(listener, router(converter))
        .await
        .map_err(|e| DocPagesError::Internal(format!("Server error: {}", e)))
}
