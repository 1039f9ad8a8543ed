use std::time::Duration;

use common::{
    AdmissionsTerminations, AggregationRow, Birthday, DashboardSummary, EmployeeSummary,
    MonthlyCount, ReportData, ReportResult, ReportTypeInfo,
};
use compute::TenureBasis;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::{
    auth::{ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, ResetPasswordRequest},
    enderecos::{EnderecoRequest, EnderecoResponse},
    ferias::{CreateFeriasRequest, FeriasResponse, UpdateFeriasRequest},
    servidores::{CreateServidorRequest, FotoRequest, ServidorResponse, UpdateServidorRequest},
    users::{CreateUserRequest, UpdateUserRequest, UserResponse},
};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// How tenure reports measure years of service
    pub tenure_basis: TenureBasis,
    /// Per-request timeout applied by the router
    pub request_timeout: Duration,
    /// Whether 500 responses carry the internal error text
    pub expose_error_details: bool,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Success status (always false for errors)
    pub success: bool,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation errors, or internal details in development mode
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::servidores::create_servidor,
        crate::handlers::servidores::list_servidores,
        crate::handlers::servidores::get_servidor,
        crate::handlers::servidores::update_servidor,
        crate::handlers::servidores::delete_servidor,
        crate::handlers::servidores::set_foto,
        crate::handlers::enderecos::get_endereco,
        crate::handlers::enderecos::upsert_endereco,
        crate::handlers::enderecos::delete_endereco,
        crate::handlers::ferias::create_ferias,
        crate::handlers::ferias::list_ferias,
        crate::handlers::ferias::get_ferias,
        crate::handlers::ferias::update_ferias,
        crate::handlers::ferias::delete_ferias,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::auth::login,
        crate::handlers::auth::forgot_password,
        crate::handlers::auth::reset_password,
        crate::handlers::dashboard::get_dashboard,
        crate::handlers::relatorios::list_relatorios,
        crate::handlers::relatorios::get_relatorio,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            CreateServidorRequest,
            UpdateServidorRequest,
            FotoRequest,
            ServidorResponse,
            EnderecoRequest,
            EnderecoResponse,
            CreateFeriasRequest,
            UpdateFeriasRequest,
            FeriasResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            LoginRequest,
            ForgotPasswordRequest,
            ForgotPasswordResponse,
            ResetPasswordRequest,
            DashboardSummary,
            ReportResult,
            ReportData,
            ReportTypeInfo,
            AggregationRow,
            MonthlyCount,
            EmployeeSummary,
            Birthday,
            AdmissionsTerminations,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "servidores", description = "Employee management"),
        (name = "enderecos", description = "Employee addresses"),
        (name = "ferias", description = "Vacation records"),
        (name = "users", description = "User accounts"),
        (name = "auth", description = "Login and password reset"),
        (name = "dashboard", description = "Dashboard summary"),
        (name = "relatorios", description = "Reports"),
    ),
    info(
        title = "RH API",
        description = "Human-resources administration API: employees, addresses, vacations, users and reports",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
