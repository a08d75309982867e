//! HTTP error responses
//!
//! Every failure leaves the API as `{"error": {"code": <status>, "message": <text>}}`
//! with the message localised for the caller. Internal details are only logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, TaskError};
use crate::i18n::{MessageKey, Translator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, translator: &Translator, language: &str, key: MessageKey) -> Self {
        Self {
            status,
            message: translator.translate(language, key),
        }
    }

    /// Map a domain error to a response. `fallback` names the message used
    /// for internal failures, which are logged here and never echoed.
    pub fn from_task_error(
        err: &TaskError,
        translator: &Translator,
        language: &str,
        fallback: MessageKey,
    ) -> Self {
        let (status, key) = match err.kind() {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, MessageKey::TaskNotFound),
            ErrorKind::CategoryNotFound => (StatusCode::NOT_FOUND, MessageKey::CategoryNotFound),
            ErrorKind::HierarchyCycle => (StatusCode::BAD_REQUEST, MessageKey::InvalidTaskHierarchy),
            ErrorKind::InvalidPayload => (StatusCode::BAD_REQUEST, MessageKey::InvalidTaskPayload),
            ErrorKind::Internal => {
                tracing::error!(error = %err, code = err.to_error_code(), "{}", fallback.as_str());
                (StatusCode::INTERNAL_SERVER_ERROR, fallback)
            },
        };

        Self::new(status, translator, language, key)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            error: ErrorBody {
                code: self.status.as_u16(),
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}
