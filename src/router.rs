use crate::handlers::{
    auth::{forgot_password, login, reset_password},
    dashboard::get_dashboard,
    enderecos::{delete_endereco, get_endereco, upsert_endereco},
    ferias::{create_ferias, delete_ferias, get_ferias, list_ferias, update_ferias},
    health::health_check,
    relatorios::{get_relatorio, list_relatorios},
    servidores::{
        create_servidor, delete_servidor, get_servidor, list_servidores, set_foto, update_servidor,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::error::expose_internal_details;
use crate::schemas::{ApiDoc, AppState};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Servidor CRUD routes
        .route("/api/v1/servidores", post(create_servidor).get(list_servidores))
        .route(
            "/api/v1/servidores/:servidor_id",
            get(get_servidor).put(update_servidor).delete(delete_servidor),
        )
        .route("/api/v1/servidores/:servidor_id/foto", put(set_foto))
        // One address per servidor
        .route(
            "/api/v1/servidores/:servidor_id/endereco",
            get(get_endereco).put(upsert_endereco).delete(delete_endereco),
        )
        // Ferias CRUD routes
        .route("/api/v1/ferias", post(create_ferias).get(list_ferias))
        .route(
            "/api/v1/ferias/:ferias_id",
            get(get_ferias).put(update_ferias).delete(delete_ferias),
        )
        // User CRUD routes
        .route("/api/v1/users", post(create_user).get(get_users))
        .route(
            "/api/v1/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Auth
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/forgot-password", post(forgot_password))
        .route("/api/v1/auth/reset-password", post(reset_password))
        // Dashboard and reports
        .route("/api/v1/dashboard", get(get_dashboard))
        .route("/api/v1/relatorios", get(list_relatorios))
        .route("/api/v1/relatorios/:tipo", get(get_relatorio))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Development mode: internal error text in 500 bodies
    let router = if state.expose_error_details {
        router.layer(middleware::from_fn(expose_internal_details))
    } else {
        router
    };

    router
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
