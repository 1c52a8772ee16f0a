use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error taxonomy shared by all domain services. The HTTP layer maps each
/// variant to a transport status; everything below the handlers speaks in
/// these terms.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Payment {
        message: String,
        gateway_code: Option<String>,
        gateway_message: Option<String>,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Payment { .. } => "PAYMENT_ERROR",
            Self::Storage(_) => "INTERNAL_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Payment { .. } => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            Self::Payment {
                gateway_code,
                gateway_message,
                ..
            } => match (gateway_code, gateway_message) {
                (Some(code), Some(msg)) => Some(format!("{code}: {msg}")),
                (Some(code), None) => Some(code.clone()),
                (None, Some(msg)) => Some(msg.clone()),
                (None, None) => None,
            },
            _ => None,
        };
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {self:#}");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorEnvelope {
            error: ErrorPayload {
                code: self.code().to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
