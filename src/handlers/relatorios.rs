use crate::error::ApiError;
use crate::extractors::ValidQuery;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::{Local, NaiveDate};
use common::{ReportResult, ReportTypeInfo};
use compute::{DbRecordStore, Report, ReportAssembler, ReportParams, ReportType};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Report parameters. Which ones apply depends on the report type.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
pub struct RelatorioQuery {
    /// Month (1-12), defaults to the current month
    #[validate(range(min = 1, max = 12, message = "mes must be between 1 and 12"))]
    pub mes: Option<u32>,
    /// Four-digit year, defaults to the current year
    #[validate(range(min = 1000, max = 9999, message = "ano must have four digits"))]
    pub ano: Option<i32>,
    /// Window start (YYYY-MM-DD); requires `data_fim`
    pub data_inicio: Option<NaiveDate>,
    /// Window end (YYYY-MM-DD); requires `data_inicio`
    pub data_fim: Option<NaiveDate>,
}

impl From<RelatorioQuery> for ReportParams {
    fn from(query: RelatorioQuery) -> Self {
        Self {
            mes: query.mes,
            ano: query.ano,
            data_inicio: query.data_inicio,
            data_fim: query.data_fim,
        }
    }
}

/// List the available reports
#[utoipa::path(
    get,
    path = "/api/v1/relatorios",
    tag = "relatorios",
    responses(
        (status = 200, description = "Report catalogue", body = ApiResponse<Vec<ReportTypeInfo>>)
    )
)]
#[instrument]
pub async fn list_relatorios() -> Json<ApiResponse<Vec<ReportTypeInfo>>> {
    Json(ApiResponse::ok(
        ReportType::catalogue(),
        "Reports retrieved successfully",
    ))
}

/// Generate a report
#[utoipa::path(
    get,
    path = "/api/v1/relatorios/{tipo}",
    tag = "relatorios",
    params(
        ("tipo" = String, Path, description = "Report type identifier, e.g. funcionarios_por_setor"),
        RelatorioQuery,
    ),
    responses(
        (status = 200, description = "Report generated successfully", body = ApiResponse<ReportResult>),
        (status = 400, description = "Unknown report type or invalid parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_relatorio(
    Path(tipo): Path<String>,
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<RelatorioQuery>,
) -> Result<Json<ApiResponse<ReportResult>>, ApiError> {
    let tipo: ReportType = tipo.parse().map_err(|e| {
        warn!("Rejected report request: {}", e);
        ApiError::from(e)
    })?;

    let today = Local::now().date_naive();
    let report = Report::from_request(tipo, &ReportParams::from(query), today)?;
    debug!("Resolved report: {:?}", report);

    let store = DbRecordStore::new(state.db.clone());
    let result = ReportAssembler::new(&store, today)
        .with_tenure_basis(state.tenure_basis)
        .generate(report)
        .await?;

    info!("Report {} served with {} entries", tipo, result.total);
    Ok(Json(ApiResponse::ok(result, "Report generated successfully")))
}
