use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    response::{ApiResponse, Meta},
    shopify::ShopifyError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Shopify request timed out: {0}")]
    Timeout(String),

    #[error("Shopify error: {0}")]
    Upstream(String),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Validation failure naming every required field that was absent.
    pub fn missing_fields(fields: &[&str]) -> Self {
        AppError::Validation(format!("missing required fields: {}", fields.join(", ")))
    }

    /// Message suitable for a batch error entry. Storage errors carry
    /// their driver detail so an operator can act on them.
    pub fn reason(&self) -> String {
        match self {
            AppError::OrmError(err) => format!("database error: {err}"),
            AppError::Internal(err) => format!("internal error: {err}"),
            other => other.to_string(),
        }
    }
}

impl From<ShopifyError> for AppError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::Timeout(_) => AppError::Timeout(err.to_string()),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) | AppError::ProductNotFound(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.reason(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
