use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, response::Json};
use chrono::Local;
use common::DashboardSummary;
use compute::{dashboard, DbRecordStore};
use tracing::{info, instrument};

/// Headcount and activity summary
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummary>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ApiError> {
    let store = DbRecordStore::new(state.db.clone());
    let summary = dashboard::summary(&store, Local::now().date_naive()).await?;

    info!(
        "Dashboard served: {} servidores, {} on vacation today",
        summary.total_servidores, summary.em_ferias_hoje
    );
    Ok(Json(ApiResponse::ok(summary, "Dashboard retrieved successfully")))
}
