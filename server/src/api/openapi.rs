//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, search};
use crate::core::constants::APP_NAME;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Richelieu API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Advanced search over the Richelieu iconography collection"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "search", description = "Boolean advanced search")
    ),
    paths(
        health::health,
        search::search_iconography,
    ),
    components(schemas(
        health::HealthResponse,
        search::types::SearchRequest,
        search::types::DateFilterRequest,
        search::types::SearchResponse,
        search::types::IconographyItem,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<String> {
    Html(SWAGGER_UI_HTML.replace("{title}", APP_NAME))
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title} API</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({ url: "/api/openapi.json", dom_id: '#swagger-ui' });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_search_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/search/iconography"));
        assert!(doc.paths.paths.contains_key("/api/v1/health"));
    }

    #[tokio::test]
    async fn test_swagger_title() {
        let Html(html) = swagger_ui_html().await;
        assert!(html.contains("<title>Richelieu API</title>"));
    }
}
