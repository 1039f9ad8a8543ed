//! `axum_valid` extractors whose rejections use the API error envelope.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use axum_valid::{Valid, ValidRejection};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use crate::error::ApiError;

impl<E: std::fmt::Display> From<ValidRejection<E>> for ApiError {
    fn from(rejection: ValidRejection<E>) -> Self {
        match rejection {
            ValidRejection::Valid(errors) => ApiError::from(errors),
            ValidRejection::Inner(inner) => {
                debug!("Rejected request input: {}", inner);
                ApiError::Validation(inner.to_string())
            }
        }
    }
}

/// `Valid<Json<T>>` rejecting with [`ApiError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Valid(Json(value)) = Valid::<Json<T>>::from_request(req, state).await?;
        Ok(ValidJson(value))
    }
}

/// `Valid<Query<T>>` rejecting with [`ApiError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Valid(Query(value)) = Valid::<Query<T>>::from_request_parts(parts, state).await?;
        Ok(ValidQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Paging {
        #[validate(range(min = 1, max = 12, message = "mes must be between 1 and 12"))]
        mes: u32,
    }

    fn app() -> Router {
        Router::new().route(
            "/paging",
            get(|ValidQuery(paging): ValidQuery<Paging>| async move { paging.mes.to_string() }),
        )
    }

    #[tokio::test]
    async fn test_valid_query_passes_through() {
        let server = TestServer::new(app()).unwrap();

        let response = server.get("/paging?mes=3").await;

        response.assert_status(StatusCode::OK);
        response.assert_text("3");
    }

    #[tokio::test]
    async fn test_rejections_use_error_envelope() {
        let server = TestServer::new(app()).unwrap();

        let out_of_range = server.get("/paging?mes=13").await;
        out_of_range.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = out_of_range.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["details"][0]["field"], "mes");

        let malformed = server.get("/paging?mes=marco").await;
        malformed.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = malformed.json();
        assert_eq!(body["success"], false);
        assert!(body.get("details").is_none());
    }
}
