use crate::error::ApiError;
use crate::extractors::ValidJson;
use crate::handlers::servidores::find_servidor;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    response::Json,
};
use model::entities::endereco;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TryIntoModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Address of an employee. Missing fields are stored as empty.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct EnderecoRequest {
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    #[validate(length(max = 2, message = "estado must be a two-letter code"))]
    pub estado: Option<String>,
    #[validate(length(max = 9, message = "cep must have at most 9 characters"))]
    pub cep: Option<String>,
    /// Defaults to "Brasil"
    pub pais: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnderecoResponse {
    pub id: i32,
    pub servidor_id: i32,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub pais: String,
}

impl From<endereco::Model> for EnderecoResponse {
    fn from(model: endereco::Model) -> Self {
        Self {
            id: model.id,
            servidor_id: model.servidor_id,
            logradouro: model.logradouro,
            numero: model.numero,
            complemento: model.complemento,
            bairro: model.bairro,
            cidade: model.cidade,
            estado: model.estado,
            cep: model.cep,
            pais: model.pais,
        }
    }
}

fn pais_or_default(pais: Option<String>) -> String {
    pais.filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| endereco::PAIS_PADRAO.to_string())
}

async fn find_endereco(state: &AppState, servidor_id: i32) -> Result<Option<endereco::Model>, ApiError> {
    endereco::Entity::find()
        .filter(endereco::Column::ServidorId.eq(servidor_id))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to lookup endereco for servidor {}: {}", servidor_id, db_error);
            ApiError::from(db_error)
        })
}

/// Get the address of an employee
#[utoipa::path(
    get,
    path = "/api/v1/servidores/{servidor_id}/endereco",
    tag = "enderecos",
    params(
        ("servidor_id" = i32, Path, description = "Servidor ID"),
    ),
    responses(
        (status = 200, description = "Endereco retrieved successfully", body = ApiResponse<EnderecoResponse>),
        (status = 404, description = "Servidor or endereco not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_endereco(
    Path(servidor_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EnderecoResponse>>, ApiError> {
    trace!("Entering get_endereco function for servidor_id: {}", servidor_id);
    find_servidor(&state, servidor_id).await?;

    match find_endereco(&state, servidor_id).await? {
        Some(model) => Ok(Json(ApiResponse::ok(
            EnderecoResponse::from(model),
            "Endereco retrieved successfully",
        ))),
        None => {
            warn!("Servidor {} has no endereco", servidor_id);
            Err(ApiError::NotFound(format!(
                "Servidor {} has no endereco",
                servidor_id
            )))
        }
    }
}

/// Create or replace the address of an employee
#[utoipa::path(
    put,
    path = "/api/v1/servidores/{servidor_id}/endereco",
    tag = "enderecos",
    params(
        ("servidor_id" = i32, Path, description = "Servidor ID"),
    ),
    request_body = EnderecoRequest,
    responses(
        (status = 200, description = "Endereco saved successfully", body = ApiResponse<EnderecoResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Servidor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn upsert_endereco(
    Path(servidor_id): Path<i32>,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<EnderecoRequest>,
) -> Result<Json<ApiResponse<EnderecoResponse>>, ApiError> {
    trace!("Entering upsert_endereco function for servidor_id: {}", servidor_id);
    find_servidor(&state, servidor_id).await?;

    let mut active = match find_endereco(&state, servidor_id).await? {
        Some(existing) => {
            debug!("Replacing endereco {} of servidor {}", existing.id, servidor_id);
            existing.into()
        }
        None => {
            debug!("Creating endereco for servidor {}", servidor_id);
            endereco::ActiveModel {
                servidor_id: Set(servidor_id),
                ..Default::default()
            }
        }
    };

    active.logradouro = Set(request.logradouro);
    active.numero = Set(request.numero);
    active.complemento = Set(request.complemento);
    active.bairro = Set(request.bairro);
    active.cidade = Set(request.cidade);
    active.estado = Set(request.estado);
    active.cep = Set(request.cep);
    active.pais = Set(pais_or_default(request.pais));

    match active.save(&state.db).await {
        Ok(saved) => {
            let model = saved.try_into_model()?;
            info!("Endereco saved for servidor {}", servidor_id);
            Ok(Json(ApiResponse::ok(
                EnderecoResponse::from(model),
                "Endereco saved successfully",
            )))
        }
        Err(db_error) => {
            error!("Failed to save endereco for servidor {}: {}", servidor_id, db_error);
            Err(db_error.into())
        }
    }
}

/// Delete the address of an employee
#[utoipa::path(
    delete,
    path = "/api/v1/servidores/{servidor_id}/endereco",
    tag = "enderecos",
    params(
        ("servidor_id" = i32, Path, description = "Servidor ID"),
    ),
    responses(
        (status = 200, description = "Endereco deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Endereco not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_endereco(
    Path(servidor_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_endereco function for servidor_id: {}", servidor_id);

    let result = endereco::Entity::delete_many()
        .filter(endereco::Column::ServidorId.eq(servidor_id))
        .exec(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to delete endereco of servidor {}: {}", servidor_id, db_error);
            ApiError::from(db_error)
        })?;

    if result.rows_affected == 0 {
        warn!("No endereco to delete for servidor {}", servidor_id);
        return Err(ApiError::NotFound(format!(
            "Servidor {} has no endereco",
            servidor_id
        )));
    }

    info!("Endereco of servidor {} deleted", servidor_id);
    Ok(Json(ApiResponse::ok(
        format!("Endereco of servidor {} deleted", servidor_id),
        "Endereco deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pais_defaults_to_brasil() {
        assert_eq!(pais_or_default(None), "Brasil");
        assert_eq!(pais_or_default(Some("  ".into())), "Brasil");
        assert_eq!(pais_or_default(Some("Portugal".into())), "Portugal");
    }
}
