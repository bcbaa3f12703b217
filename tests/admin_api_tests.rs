//! HTTP-level tests for the endpoints that do not touch the database.

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;

use portfolio_cms::{
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};

fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio CMS Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "postgres://localhost/portfolio_cms_test".to_string(),
        cors_allowed_origins: vec!["*".to_string()],
        media_root: "media".to_string(),
        public_base_url: "http://localhost:8080/media".to_string(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// App state over a lazy pool: no connection is made until a query runs,
/// which the endpoints under test never do.
fn test_state() -> web::Data<AppState> {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    web::Data::new(AppState::new(&config, pool))
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(test_state())
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_rt::test]
async fn home_returns_api_banner() {
    let app = test_app!();

    let request = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["message"], "Portfolio CMS API");
    assert_eq!(body["status"], "Ok");
}

#[actix_rt::test]
async fn navigation_resolve_returns_view_and_canonical_path() {
    let app = test_app!();

    let request = test::TestRequest::get()
        .uri("/api/v1/admin/navigation/resolve?path=/admin/blog/categories")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["view"]["view"], "categories");
    assert_eq!(body["canonical_path"], "/admin/blog/categories");
}

#[actix_rt::test]
async fn navigation_resolve_rejects_foreign_paths() {
    let app = test_app!();

    let request = test::TestRequest::get()
        .uri("/api/v1/admin/navigation/resolve?path=/somewhere/else")
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn navigation_resolve_requires_path_parameter() {
    let app = test_app!();

    let request = test::TestRequest::get()
        .uri("/api/v1/admin/navigation/resolve")
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn convert_endpoint_turns_html_into_markdown() {
    let app = test_app!();

    let request = test::TestRequest::post()
        .uri("/api/v1/admin/convert/markdown")
        .set_json(json!({
            "html": "<h1>Title</h1><p>Hello <strong>world</strong>.</p>"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["markdown"], "# Title\n\nHello **world**.");
}

#[actix_rt::test]
async fn convert_endpoint_strips_script_tags() {
    let app = test_app!();

    let request = test::TestRequest::post()
        .uri("/api/v1/admin/convert/markdown")
        .set_json(json!({ "html": "<p>keep</p><script>alert(1)</script>" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    let markdown = body["markdown"].as_str().unwrap();
    assert!(markdown.contains("keep"));
    assert!(!markdown.contains("alert"));
}

#[actix_rt::test]
async fn malformed_json_yields_a_structured_error() {
    let app = test_app!();

    let request = test::TestRequest::post()
        .uri("/api/v1/admin/convert/markdown")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert!(body["error"].is_string());
}
