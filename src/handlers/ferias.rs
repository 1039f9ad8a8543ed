use crate::error::ApiError;
use crate::extractors::{ValidJson, ValidQuery};
use crate::handlers::servidores::find_servidor;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Datelike, NaiveDate};
use compute::window::filter_overlapping;
use compute::{DateWindow, DbRecordStore, RecordStore, VacationQuery};
use model::entities::ferias;
use model::records::VacationRecord;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for registering a vacation
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateFeriasRequest {
    pub servidor_id: i32,
    pub data_inicio: NaiveDate,
    /// Must not be before `data_inicio`
    pub data_fim: NaiveDate,
    /// Defaults to the inclusive day count of the period
    #[validate(range(min = 1, message = "dias must be positive"))]
    pub dias: Option<i32>,
    /// Defaults to the year of `data_inicio`
    #[validate(range(min = 1000, max = 9999, message = "ano_referencia must have four digits"))]
    pub ano_referencia: Option<i32>,
    /// Free text, defaults to `programadas`
    pub status: Option<String>,
    pub observacoes: Option<String>,
}

/// Request body for updating a vacation. Only provided fields change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateFeriasRequest {
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    #[validate(range(min = 1, message = "dias must be positive"))]
    pub dias: Option<i32>,
    #[validate(range(min = 1000, max = 9999, message = "ano_referencia must have four digits"))]
    pub ano_referencia: Option<i32>,
    pub status: Option<String>,
    pub observacoes: Option<String>,
}

/// Filters for listing vacations
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
pub struct FeriasQuery {
    pub servidor_id: Option<i32>,
    pub status: Option<String>,
    /// Start of an overlap window; requires `data_fim`
    pub data_inicio: Option<NaiveDate>,
    /// End of an overlap window; requires `data_inicio`
    pub data_fim: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeriasResponse {
    pub id: i32,
    pub servidor_id: i32,
    /// Owner's name, present in listings
    pub servidor_nome: Option<String>,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub dias: i32,
    pub ano_referencia: i32,
    pub status: String,
    pub observacoes: Option<String>,
}

impl From<ferias::Model> for FeriasResponse {
    fn from(model: ferias::Model) -> Self {
        Self {
            id: model.id,
            servidor_id: model.servidor_id,
            servidor_nome: None,
            data_inicio: model.data_inicio,
            data_fim: model.data_fim,
            dias: model.dias,
            ano_referencia: model.ano_referencia,
            status: model.status,
            observacoes: model.observacoes,
        }
    }
}

impl From<VacationRecord> for FeriasResponse {
    fn from(record: VacationRecord) -> Self {
        Self {
            id: record.id,
            servidor_id: record.servidor_id,
            servidor_nome: record.servidor_nome,
            data_inicio: record.data_inicio,
            data_fim: record.data_fim,
            dias: record.dias,
            ano_referencia: record.ano_referencia,
            status: record.status,
            observacoes: record.observacoes,
        }
    }
}

fn check_period(data_inicio: NaiveDate, data_fim: NaiveDate) -> Result<(), ApiError> {
    if data_fim < data_inicio {
        return Err(ApiError::Validation(format!(
            "data_fim ({}) must not be before data_inicio ({})",
            data_fim, data_inicio
        )));
    }
    Ok(())
}

/// Inclusive number of days in the period.
fn period_days(data_inicio: NaiveDate, data_fim: NaiveDate) -> i32 {
    let days = (data_fim - data_inicio).num_days() + 1;
    i32::try_from(days).unwrap_or(i32::MAX)
}

async fn find_ferias(state: &AppState, ferias_id: i32) -> Result<ferias::Model, ApiError> {
    match ferias::Entity::find_by_id(ferias_id).one(&state.db).await {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            warn!("Ferias with ID {} not found", ferias_id);
            Err(ApiError::NotFound(format!("Ferias {} not found", ferias_id)))
        }
        Err(db_error) => {
            error!("Failed to lookup ferias with ID {}: {}", ferias_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Register a vacation for an employee
#[utoipa::path(
    post,
    path = "/api/v1/ferias",
    tag = "ferias",
    request_body = CreateFeriasRequest,
    responses(
        (status = 201, description = "Ferias created successfully", body = ApiResponse<FeriasResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Servidor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_ferias(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateFeriasRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FeriasResponse>>), ApiError> {
    trace!("Entering create_ferias function");
    check_period(request.data_inicio, request.data_fim)?;
    find_servidor(&state, request.servidor_id).await?;

    let dias = request
        .dias
        .unwrap_or_else(|| period_days(request.data_inicio, request.data_fim));
    let ano_referencia = request
        .ano_referencia
        .unwrap_or_else(|| request.data_inicio.year());
    debug!(
        "Creating ferias for servidor {}: {} to {} ({} dias)",
        request.servidor_id, request.data_inicio, request.data_fim, dias
    );

    let new_ferias = ferias::ActiveModel {
        servidor_id: Set(request.servidor_id),
        data_inicio: Set(request.data_inicio),
        data_fim: Set(request.data_fim),
        dias: Set(dias),
        ano_referencia: Set(ano_referencia),
        status: Set(request
            .status
            .unwrap_or_else(|| ferias::STATUS_PROGRAMADAS.to_string())),
        observacoes: Set(request.observacoes),
        ..Default::default()
    };

    match new_ferias.insert(&state.db).await {
        Ok(model) => {
            info!("Ferias created successfully with ID: {}", model.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(
                    FeriasResponse::from(model),
                    "Ferias created successfully",
                )),
            ))
        }
        Err(db_error) => {
            error!("Failed to create ferias: {}", db_error);
            Err(db_error.into())
        }
    }
}

/// List vacations, optionally filtered by employee, status and overlap window
#[utoipa::path(
    get,
    path = "/api/v1/ferias",
    tag = "ferias",
    params(FeriasQuery),
    responses(
        (status = 200, description = "Ferias retrieved successfully", body = ApiResponse<Vec<FeriasResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_ferias(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<FeriasQuery>,
) -> Result<Json<ApiResponse<Vec<FeriasResponse>>>, ApiError> {
    trace!("Entering list_ferias function");

    let window = match (query.data_inicio, query.data_fim) {
        (Some(start), Some(end)) => Some(DateWindow::new(start, end)?),
        (None, None) => None,
        _ => {
            return Err(ApiError::Validation(
                "data_inicio and data_fim must be provided together".to_string(),
            ));
        }
    };

    let store = DbRecordStore::new(state.db.clone());
    let vacations = store
        .find_vacations(&VacationQuery {
            servidor_id: query.servidor_id,
            status: query.status,
        })
        .await?;

    let data: Vec<FeriasResponse> = match window {
        Some(window) => {
            debug!("Filtering ferias overlapping {} to {}", window.start(), window.end());
            filter_overlapping(&vacations, &window, |v| Some(v.span()))
                .into_iter()
                .cloned()
                .map(FeriasResponse::from)
                .collect()
        }
        None => vacations.into_iter().map(FeriasResponse::from).collect(),
    };

    info!("Successfully retrieved {} ferias", data.len());
    Ok(Json(ApiResponse::ok(data, "Ferias retrieved successfully")))
}

/// Get a specific vacation by ID
#[utoipa::path(
    get,
    path = "/api/v1/ferias/{ferias_id}",
    tag = "ferias",
    params(
        ("ferias_id" = i32, Path, description = "Ferias ID"),
    ),
    responses(
        (status = 200, description = "Ferias retrieved successfully", body = ApiResponse<FeriasResponse>),
        (status = 404, description = "Ferias not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_ferias(
    Path(ferias_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FeriasResponse>>, ApiError> {
    let model = find_ferias(&state, ferias_id).await?;
    info!("Successfully retrieved ferias with ID: {}", model.id);
    Ok(Json(ApiResponse::ok(
        FeriasResponse::from(model),
        "Ferias retrieved successfully",
    )))
}

/// Update a vacation
#[utoipa::path(
    put,
    path = "/api/v1/ferias/{ferias_id}",
    tag = "ferias",
    params(
        ("ferias_id" = i32, Path, description = "Ferias ID"),
    ),
    request_body = UpdateFeriasRequest,
    responses(
        (status = 200, description = "Ferias updated successfully", body = ApiResponse<FeriasResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Ferias not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_ferias(
    Path(ferias_id): Path<i32>,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<UpdateFeriasRequest>,
) -> Result<Json<ApiResponse<FeriasResponse>>, ApiError> {
    trace!("Entering update_ferias function for ferias_id: {}", ferias_id);

    let existing = find_ferias(&state, ferias_id).await?;
    let data_inicio = request.data_inicio.unwrap_or(existing.data_inicio);
    let data_fim = request.data_fim.unwrap_or(existing.data_fim);
    check_period(data_inicio, data_fim)?;

    let period_changed = data_inicio != existing.data_inicio || data_fim != existing.data_fim;
    let mut active: ferias::ActiveModel = existing.into();
    active.data_inicio = Set(data_inicio);
    active.data_fim = Set(data_fim);

    match request.dias {
        Some(dias) => active.dias = Set(dias),
        None if period_changed => {
            debug!("Recomputing dias for the new period");
            active.dias = Set(period_days(data_inicio, data_fim));
        }
        None => {}
    }
    if let Some(ano) = request.ano_referencia {
        active.ano_referencia = Set(ano);
    }
    if let Some(status) = request.status {
        active.status = Set(status);
    }
    if let Some(observacoes) = request.observacoes {
        active.observacoes = Set(Some(observacoes));
    }

    match active.update(&state.db).await {
        Ok(model) => {
            info!("Ferias with ID {} updated successfully", ferias_id);
            Ok(Json(ApiResponse::ok(
                FeriasResponse::from(model),
                "Ferias updated successfully",
            )))
        }
        Err(db_error) => {
            error!("Failed to update ferias with ID {}: {}", ferias_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Delete a vacation
#[utoipa::path(
    delete,
    path = "/api/v1/ferias/{ferias_id}",
    tag = "ferias",
    params(
        ("ferias_id" = i32, Path, description = "Ferias ID"),
    ),
    responses(
        (status = 200, description = "Ferias deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Ferias not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_ferias(
    Path(ferias_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match ferias::Entity::delete_by_id(ferias_id).exec(&state.db).await {
        Ok(result) if result.rows_affected > 0 => {
            info!("Ferias with ID {} deleted successfully", ferias_id);
            Ok(Json(ApiResponse::ok(
                format!("Ferias {} deleted", ferias_id),
                "Ferias deleted successfully",
            )))
        }
        Ok(_) => {
            warn!("Ferias with ID {} not found for deletion", ferias_id);
            Err(ApiError::NotFound(format!("Ferias {} not found", ferias_id)))
        }
        Err(db_error) => {
            error!("Failed to delete ferias with ID {}: {}", ferias_id, db_error);
            Err(db_error.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_days_is_inclusive() {
        assert_eq!(period_days(date(2024, 6, 1), date(2024, 6, 30)), 30);
        assert_eq!(period_days(date(2024, 6, 1), date(2024, 6, 1)), 1);
    }

    #[test]
    fn test_check_period_rejects_reversed_dates() {
        assert!(check_period(date(2024, 6, 1), date(2024, 6, 1)).is_ok());
        assert!(matches!(
            check_period(date(2024, 6, 2), date(2024, 6, 1)),
            Err(ApiError::Validation(_))
        ));
    }
}
