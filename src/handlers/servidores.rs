use crate::error::ApiError;
use crate::extractors::{ValidJson, ValidQuery};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use model::entities::servidor;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating an employee
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateServidorRequest {
    #[validate(length(min = 1, max = 255, message = "nome is required"))]
    pub nome: String,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub telefone: Option<String>,
    /// Free text, defaults to `ativo`
    pub status: Option<String>,
    pub setor: Option<String>,
    pub cargo: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub data_admissao: Option<NaiveDate>,
    pub data_demissao: Option<NaiveDate>,
}

/// Request body for updating an employee. Only provided fields change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateServidorRequest {
    #[validate(length(min = 1, max = 255, message = "nome must not be empty"))]
    pub nome: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub status: Option<String>,
    pub setor: Option<String>,
    pub cargo: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub data_admissao: Option<NaiveDate>,
    pub data_demissao: Option<NaiveDate>,
}

/// Path of an already stored photo
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct FotoRequest {
    #[validate(length(min = 1, max = 1024, message = "foto must not be empty"))]
    pub foto: String,
}

/// Filters for listing employees
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ServidorQuery {
    pub status: Option<String>,
    pub setor: Option<String>,
}

/// Employee response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServidorResponse {
    pub id: i32,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub status: String,
    pub setor: Option<String>,
    pub cargo: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub data_admissao: Option<NaiveDate>,
    pub data_demissao: Option<NaiveDate>,
    pub foto: Option<String>,
}

impl From<servidor::Model> for ServidorResponse {
    fn from(model: servidor::Model) -> Self {
        Self {
            id: model.id,
            nome: model.nome,
            email: model.email,
            telefone: model.telefone,
            status: model.status,
            setor: model.setor,
            cargo: model.cargo,
            data_nascimento: model.data_nascimento,
            data_admissao: model.data_admissao,
            data_demissao: model.data_demissao,
            foto: model.foto,
        }
    }
}

pub(crate) async fn find_servidor(state: &AppState, servidor_id: i32) -> Result<servidor::Model, ApiError> {
    match servidor::Entity::find_by_id(servidor_id).one(&state.db).await {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            warn!("Servidor with ID {} not found", servidor_id);
            Err(ApiError::NotFound(format!("Servidor {} not found", servidor_id)))
        }
        Err(db_error) => {
            error!("Failed to lookup servidor with ID {}: {}", servidor_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Create a new employee
#[utoipa::path(
    post,
    path = "/api/v1/servidores",
    tag = "servidores",
    request_body = CreateServidorRequest,
    responses(
        (status = 201, description = "Servidor created successfully", body = ApiResponse<ServidorResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_servidor(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateServidorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServidorResponse>>), ApiError> {
    trace!("Entering create_servidor function");
    debug!("Creating servidor: {}", request.nome);

    let new_servidor = servidor::ActiveModel {
        nome: Set(request.nome),
        email: Set(request.email),
        telefone: Set(request.telefone),
        status: Set(request
            .status
            .unwrap_or_else(|| servidor::STATUS_ATIVO.to_string())),
        setor: Set(request.setor),
        cargo: Set(request.cargo),
        data_nascimento: Set(request.data_nascimento),
        data_admissao: Set(request.data_admissao),
        data_demissao: Set(request.data_demissao),
        foto: Set(None),
        ..Default::default()
    };

    match new_servidor.insert(&state.db).await {
        Ok(model) => {
            info!("Servidor created successfully with ID: {}", model.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(
                    ServidorResponse::from(model),
                    "Servidor created successfully",
                )),
            ))
        }
        Err(db_error) => {
            error!("Failed to create servidor: {}", db_error);
            Err(db_error.into())
        }
    }
}

/// List employees, optionally filtered by status and sector
#[utoipa::path(
    get,
    path = "/api/v1/servidores",
    tag = "servidores",
    params(ServidorQuery),
    responses(
        (status = 200, description = "Servidores retrieved successfully", body = ApiResponse<Vec<ServidorResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_servidores(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ServidorQuery>,
) -> Result<Json<ApiResponse<Vec<ServidorResponse>>>, ApiError> {
    trace!("Entering list_servidores function");

    let mut select = servidor::Entity::find();
    if let Some(status) = &query.status {
        debug!("Filtering by status: {}", status);
        select = select.filter(servidor::Column::Status.eq(status.as_str()));
    }
    if let Some(setor) = &query.setor {
        debug!("Filtering by setor: {}", setor);
        select = select.filter(servidor::Column::Setor.eq(setor.as_str()));
    }

    match select.order_by_asc(servidor::Column::Nome).all(&state.db).await {
        Ok(servidores) => {
            info!("Successfully retrieved {} servidores", servidores.len());
            let data = servidores.into_iter().map(ServidorResponse::from).collect();
            Ok(Json(ApiResponse::ok(data, "Servidores retrieved successfully")))
        }
        Err(db_error) => {
            error!("Failed to retrieve servidores: {}", db_error);
            Err(db_error.into())
        }
    }
}

/// Get a specific employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/servidores/{servidor_id}",
    tag = "servidores",
    params(
        ("servidor_id" = i32, Path, description = "Servidor ID"),
    ),
    responses(
        (status = 200, description = "Servidor retrieved successfully", body = ApiResponse<ServidorResponse>),
        (status = 404, description = "Servidor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_servidor(
    Path(servidor_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ServidorResponse>>, ApiError> {
    trace!("Entering get_servidor function for servidor_id: {}", servidor_id);

    let model = find_servidor(&state, servidor_id).await?;
    info!("Successfully retrieved servidor with ID: {}", model.id);
    Ok(Json(ApiResponse::ok(
        ServidorResponse::from(model),
        "Servidor retrieved successfully",
    )))
}

/// Update an employee
#[utoipa::path(
    put,
    path = "/api/v1/servidores/{servidor_id}",
    tag = "servidores",
    params(
        ("servidor_id" = i32, Path, description = "Servidor ID"),
    ),
    request_body = UpdateServidorRequest,
    responses(
        (status = 200, description = "Servidor updated successfully", body = ApiResponse<ServidorResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Servidor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_servidor(
    Path(servidor_id): Path<i32>,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<UpdateServidorRequest>,
) -> Result<Json<ApiResponse<ServidorResponse>>, ApiError> {
    trace!("Entering update_servidor function for servidor_id: {}", servidor_id);

    let existing = find_servidor(&state, servidor_id).await?;
    let mut active: servidor::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(nome) = request.nome {
        active.nome = Set(nome);
        updated_fields.push("nome");
    }
    if let Some(email) = request.email {
        active.email = Set(Some(email));
        updated_fields.push("email");
    }
    if let Some(telefone) = request.telefone {
        active.telefone = Set(Some(telefone));
        updated_fields.push("telefone");
    }
    if let Some(status) = request.status {
        active.status = Set(status);
        updated_fields.push("status");
    }
    if let Some(setor) = request.setor {
        active.setor = Set(Some(setor));
        updated_fields.push("setor");
    }
    if let Some(cargo) = request.cargo {
        active.cargo = Set(Some(cargo));
        updated_fields.push("cargo");
    }
    if let Some(data) = request.data_nascimento {
        active.data_nascimento = Set(Some(data));
        updated_fields.push("data_nascimento");
    }
    if let Some(data) = request.data_admissao {
        active.data_admissao = Set(Some(data));
        updated_fields.push("data_admissao");
    }
    if let Some(data) = request.data_demissao {
        active.data_demissao = Set(Some(data));
        updated_fields.push("data_demissao");
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for servidor ID: {}", servidor_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    match active.update(&state.db).await {
        Ok(model) => {
            info!("Servidor with ID {} updated successfully", servidor_id);
            Ok(Json(ApiResponse::ok(
                ServidorResponse::from(model),
                "Servidor updated successfully",
            )))
        }
        Err(db_error) => {
            error!("Failed to update servidor with ID {}: {}", servidor_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Delete an employee together with its address and vacations
#[utoipa::path(
    delete,
    path = "/api/v1/servidores/{servidor_id}",
    tag = "servidores",
    params(
        ("servidor_id" = i32, Path, description = "Servidor ID"),
    ),
    responses(
        (status = 200, description = "Servidor deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Servidor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_servidor(
    Path(servidor_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_servidor function for servidor_id: {}", servidor_id);

    match servidor::Entity::delete_by_id(servidor_id).exec(&state.db).await {
        Ok(result) if result.rows_affected > 0 => {
            info!("Servidor with ID {} deleted successfully", servidor_id);
            Ok(Json(ApiResponse::ok(
                format!("Servidor {} deleted", servidor_id),
                "Servidor deleted successfully",
            )))
        }
        Ok(_) => {
            warn!("Servidor with ID {} not found for deletion", servidor_id);
            Err(ApiError::NotFound(format!("Servidor {} not found", servidor_id)))
        }
        Err(db_error) => {
            error!("Failed to delete servidor with ID {}: {}", servidor_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Set the stored photo path of an employee
#[utoipa::path(
    put,
    path = "/api/v1/servidores/{servidor_id}/foto",
    tag = "servidores",
    params(
        ("servidor_id" = i32, Path, description = "Servidor ID"),
    ),
    request_body = FotoRequest,
    responses(
        (status = 200, description = "Photo updated successfully", body = ApiResponse<ServidorResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Servidor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn set_foto(
    Path(servidor_id): Path<i32>,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<FotoRequest>,
) -> Result<Json<ApiResponse<ServidorResponse>>, ApiError> {
    let existing = find_servidor(&state, servidor_id).await?;
    let mut active: servidor::ActiveModel = existing.into();
    active.foto = Set(Some(request.foto));

    let model = active.update(&state.db).await.map_err(|db_error| {
        error!("Failed to set foto for servidor {}: {}", servidor_id, db_error);
        ApiError::from(db_error)
    })?;
    info!("Foto updated for servidor {}", servidor_id);
    Ok(Json(ApiResponse::ok(
        ServidorResponse::from(model),
        "Foto updated successfully",
    )))
}
