use crate::error::ApiError;
use crate::extractors::ValidJson;
use crate::handlers::users::UserResponse;
use crate::helpers::password::{generate_reset_token, hash_password, sha256_hex, verify_password};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, response::Json};
use chrono::{DateTime, Duration, Utc};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Lifetime of a password-reset token.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "invalid email"))]
    pub email: String,
}

/// Outcome of a reset request. The token is returned to the caller, who is
/// responsible for delivering it.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ForgotPasswordResponse {
    /// Raw reset token, absent when no active account matches the email
    pub reset_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
    #[validate(length(min = 8, max = 128, message = "password must have at least 8 characters"))]
    pub new_password: String,
}

async fn find_by_email(state: &AppState, email: &str) -> Result<Option<user::Model>, ApiError> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(&state.db)
        .await?)
}

/// Verify credentials
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials are valid", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let rejected = || ApiError::Unauthorized("Invalid email or password".to_string());

    let Some(user_model) = find_by_email(&state, &request.email).await? else {
        warn!("Login attempt for unknown email");
        return Err(rejected());
    };
    if !user_model.ativo {
        warn!("Login attempt for inactive user {}", user_model.id);
        return Err(rejected());
    }
    if !verify_password(&request.password, &user_model.password_hash)? {
        warn!("Wrong password for user {}", user_model.id);
        return Err(rejected());
    }

    info!("User {} logged in", user_model.id);
    Ok(Json(ApiResponse::ok(
        UserResponse::from(user_model),
        "Login successful",
    )))
}

/// Issue a password-reset token
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset requested", body = ApiResponse<ForgotPasswordResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<ForgotPasswordResponse>>, ApiError> {
    let message = "If the email is registered, a reset token was issued";

    let user_model = match find_by_email(&state, &request.email).await? {
        Some(model) if model.ativo => model,
        _ => {
            debug!("No active account for reset request");
            return Ok(Json(ApiResponse::ok(
                ForgotPasswordResponse {
                    reset_token: None,
                    expires_at: None,
                },
                message,
            )));
        }
    };

    let token = generate_reset_token();
    let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
    let user_id = user_model.id;

    let mut active: user::ActiveModel = user_model.into();
    active.reset_token_hash = Set(Some(sha256_hex(&token)));
    active.reset_token_expires_at = Set(Some(expires_at));
    active.update(&state.db).await?;

    info!("Reset token issued for user {}", user_id);
    Ok(Json(ApiResponse::ok(
        ForgotPasswordResponse {
            reset_token: Some(token),
            expires_at: Some(expires_at),
        },
        message,
    )))
}

/// Set a new password using a reset token
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<String>),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let invalid = || ApiError::Validation("Invalid or expired reset token".to_string());

    let Some(user_model) = user::Entity::find()
        .filter(user::Column::ResetTokenHash.eq(sha256_hex(&request.token)))
        .one(&state.db)
        .await?
    else {
        warn!("Reset attempted with unknown token");
        return Err(invalid());
    };

    let expired = user_model
        .reset_token_expires_at
        .is_none_or(|expires_at| expires_at <= Utc::now());
    if expired {
        warn!("Reset token of user {} expired", user_model.id);
        return Err(invalid());
    }

    let user_id = user_model.id;
    let mut active: user::ActiveModel = user_model.into();
    active.password_hash = Set(hash_password(&request.new_password)?);
    active.reset_token_hash = Set(None);
    active.reset_token_expires_at = Set(None);
    active.update(&state.db).await?;

    info!("Password reset for user {}", user_id);
    Ok(Json(ApiResponse::ok(
        format!("Password of user {} changed", user_id),
        "Password reset successfully",
    )))
}
