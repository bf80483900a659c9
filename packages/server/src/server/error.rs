use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::common::PipelineError;

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Conflict { .. } => StatusCode::CONFLICT,
            PipelineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PipelineError::ListFetch { .. } => StatusCode::BAD_GATEWAY,
            PipelineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (
            status,
            Json(json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
