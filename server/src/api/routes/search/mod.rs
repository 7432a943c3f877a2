//! Search API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use types::{SearchRequest, SearchResponse};

use crate::api::types::ApiError;
use crate::data::PostgresService;
use crate::domain::search::{ICONOGRAPHY, compile_and_execute, sanitize};

/// Shared state for Search API endpoints
#[derive(Clone)]
pub struct SearchApiState {
    pub database: Arc<PostgresService>,
}

/// Build Search API routes
pub fn routes(database: Arc<PostgresService>) -> Router<()> {
    let state = SearchApiState { database };

    Router::new()
        .route("/iconography", post(search_iconography))
        .with_state(state)
}

/// Advanced search over the iconography collection
#[utoipa::path(
    post,
    path = "/api/v1/search/iconography",
    tag = "search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching resources, ordered by id", body = SearchResponse),
        (status = 400, description = "Invalid search parameters"),
        (status = 500, description = "Database error"),
        (status = 503, description = "Database temporarily unavailable")
    )
)]
pub async fn search_iconography(
    State(state): State<SearchApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(body) = body?;
    let Value::Object(raw) = body else {
        return Err(ApiError::bad_request(
            "INVALID_PARAMETER_SHAPE",
            "Search parameters must be a JSON object",
        ));
    };

    let params = sanitize(&raw)?;
    let rows = compile_and_execute(&state.database, &ICONOGRAPHY, &params)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(SearchResponse::new(rows)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::core::config::PostgresConfig;

    fn app() -> Router {
        let config = PostgresConfig {
            url: "postgres://richelieu@127.0.0.1:1/richelieu".to_string(),
            ..Default::default()
        };
        let database = Arc::new(PostgresService::connect_lazy(&config).unwrap());
        routes(database)
    }

    async fn post_json(body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/iconography")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_parameter_is_rejected() {
        let (status, body) = post_json(r#"{"title": ["bourse"], "foo": ["bar"]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PARAMETER_NAME");
    }

    #[tokio::test]
    async fn test_invalid_operator_is_rejected() {
        let (status, body) = post_json(r#"{"title": ["bourse"], "title_boolean_op": "xor"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_BOOLEAN_OPERATOR");
    }

    #[tokio::test]
    async fn test_bad_date_arity_is_rejected() {
        let (status, body) =
            post_json(r#"{"date": [{"filter": "dateRange", "data": [1815]}]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_DATE_ARITY");
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let (status, body) = post_json(r#"["bourse"]"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PARAMETER_SHAPE");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (status, body) = post_json(r#"{"title": "#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");
    }
}
