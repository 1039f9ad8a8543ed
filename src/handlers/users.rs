use crate::error::ApiError;
use crate::extractors::ValidJson;
use crate::helpers::password::hash_password;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::user::{self, UserRole};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub(crate) fn validate_role(role: &str) -> Result<(), ValidationError> {
    match UserRole::parse(role) {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("role");
            err.message = Some("role must be 'user' or 'admin'".into());
            Err(err)
        }
    }
}

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "nome is required"))]
    pub nome: String,
    /// Email (must be unique)
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must have at least 8 characters"))]
    pub password: String,
    /// `user` (default) or `admin`
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

/// Request body for updating a user
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "nome must not be empty"))]
    pub nome: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128, message = "password must have at least 8 characters"))]
    pub password: Option<String>,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
    pub ativo: Option<bool>,
}

/// User response model. Password and reset-token hashes are never included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub role: String,
    pub ativo: bool,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            nome: model.nome,
            email: model.email,
            role: model.role.as_str().to_string(),
            ativo: model.ativo,
        }
    }
}

fn email_conflict(err: ApiError, email: &str) -> ApiError {
    match err {
        ApiError::Conflict(_) => ApiError::Conflict(format!("Email '{}' already registered", email)),
        other => other,
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering create_user function");
    debug!("Creating user with email: {}", request.email);

    let role = request
        .role
        .as_deref()
        .and_then(UserRole::parse)
        .unwrap_or(UserRole::User);
    let password_hash = hash_password(&request.password)?;

    let new_user = user::ActiveModel {
        nome: Set(request.nome),
        email: Set(request.email.clone()),
        role: Set(role),
        password_hash: Set(password_hash),
        reset_token_hash: Set(None),
        reset_token_expires_at: Set(None),
        ativo: Set(true),
        ..Default::default()
    };

    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!("User created successfully with ID: {}", user_model.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(
                    UserResponse::from(user_model),
                    "User created successfully",
                )),
            ))
        }
        Err(db_error) => {
            error!("Failed to create user '{}': {}", request.email, db_error);
            Err(email_conflict(db_error.into(), &request.email))
        }
    }
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    trace!("Entering get_users function");

    match user::Entity::find()
        .order_by_asc(user::Column::Nome)
        .all(&state.db)
        .await
    {
        Ok(users) => {
            info!("Successfully retrieved {} users", users.len());
            let data = users.into_iter().map(UserResponse::from).collect();
            Ok(Json(ApiResponse::ok(data, "Users retrieved successfully")))
        }
        Err(db_error) => {
            error!("Failed to retrieve users from database: {}", db_error);
            Err(db_error.into())
        }
    }
}

async fn find_user(state: &AppState, user_id: i32) -> Result<user::Model, ApiError> {
    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            Err(ApiError::NotFound(format!("User {} not found", user_id)))
        }
        Err(db_error) => {
            error!("Failed to retrieve user with ID {}: {}", user_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user_model = find_user(&state, user_id).await?;
    info!("Successfully retrieved user with ID: {}", user_model.id);
    Ok(Json(ApiResponse::ok(
        UserResponse::from(user_model),
        "User retrieved successfully",
    )))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering update_user function for user_id: {}", user_id);

    let existing_user = find_user(&state, user_id).await?;
    let mut user_active: user::ActiveModel = existing_user.into();
    let mut updated_fields = Vec::new();

    if let Some(nome) = request.nome {
        user_active.nome = Set(nome);
        updated_fields.push("nome");
    }
    let new_email = request.email.clone();
    if let Some(email) = request.email {
        user_active.email = Set(email);
        updated_fields.push("email");
    }
    if let Some(password) = request.password {
        user_active.password_hash = Set(hash_password(&password)?);
        updated_fields.push("password");
    }
    if let Some(role) = request.role.as_deref().and_then(UserRole::parse) {
        user_active.role = Set(role);
        updated_fields.push("role");
    }
    if let Some(ativo) = request.ativo {
        user_active.ativo = Set(ativo);
        updated_fields.push("ativo");
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for user ID: {}", user_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    match user_active.update(&state.db).await {
        Ok(updated_user) => {
            info!("User with ID {} updated successfully", user_id);
            Ok(Json(ApiResponse::ok(
                UserResponse::from(updated_user),
                "User updated successfully",
            )))
        }
        Err(db_error) => {
            error!("Failed to update user with ID {}: {}", user_id, db_error);
            Err(email_conflict(
                db_error.into(),
                new_email.as_deref().unwrap_or_default(),
            ))
        }
    }
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    match user::Entity::delete_by_id(user_id).exec(&state.db).await {
        Ok(delete_result) => {
            debug!("Delete operation completed. Rows affected: {}", delete_result.rows_affected);
            if delete_result.rows_affected > 0 {
                info!("User with ID {} deleted successfully", user_id);
                Ok(Json(ApiResponse::ok(
                    format!("User {} deleted", user_id),
                    "User deleted successfully",
                )))
            } else {
                warn!("User with ID {} not found for deletion (no rows affected)", user_id);
                Err(ApiError::NotFound(format!("User {} not found", user_id)))
            }
        }
        Err(db_error) => {
            error!("Failed to delete user with ID {}: {}", user_id, db_error);
            Err(db_error.into())
        }
    }
}
