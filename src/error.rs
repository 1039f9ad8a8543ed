use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use compute::ReportError;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::helpers::password::PasswordError;
use crate::schemas::ErrorResponse;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Text of an internal error, attached to 500 responses as an extension.
/// It only reaches the body through [`expose_internal_details`].
#[derive(Debug, Clone)]
pub struct InternalDetails(pub String);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error: {message}")]
    InvalidFields {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::InvalidFields { message, details } => (
                StatusCode::BAD_REQUEST,
                message.clone(),
                serde_json::to_value(details).ok(),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            ApiError::Database(_) | ApiError::Internal(_) => {
                error!("{}", self);
                let mut response = internal_response(None);
                response
                    .extensions_mut()
                    .insert(InternalDetails(self.to_string()));
                return response;
            }
        };

        let body = ErrorResponse {
            success: false,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

fn internal_response(details: Option<String>) -> Response {
    let body = ErrorResponse {
        success: false,
        message: INTERNAL_MESSAGE.to_string(),
        details: details.map(serde_json::Value::String),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Development-mode middleware: rebuilds 500 responses so `details` carries
/// the internal error text.
pub async fn expose_internal_details(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    match response.extensions().get::<InternalDetails>() {
        Some(InternalDetails(details)) => internal_response(Some(details.clone())),
        None => response,
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ApiError::Conflict("Resource already exists".into())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                ApiError::NotFound("Referenced resource not found".into())
            }
            _ => ApiError::Database(err),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Validation(msg) => ApiError::Validation(msg),
            ReportError::Database(db_err) => ApiError::from(db_err),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            format!("{}: {}", details[0].field, details[0].message)
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::InvalidFields { message, details }
    }
}
