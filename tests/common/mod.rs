// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Query,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use http_body_util::BodyExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;
use url::Url;

use link_preview_card::{
    handlers,
    i18n::Strings,
    metadata::HttpMetadataClient,
    refresh::LoadingPolicy,
    registry::{register_components, ComponentRegistry},
    state::AppState,
    store::CardStore,
};

pub const METADATA_PATH: &str = "/api/services/website/metadata";

/// Links the mock metadata service knows about.
pub const OK_LINK: &str = "https://ok.test/article";
pub const NO_IMAGE_LINK: &str = "https://noimage.test/";
pub const LOGO_LINK: &str = "https://logo.test/";
pub const FAILING_LINK: &str = "https://fail.test/";
pub const SLOW_LINK: &str = "https://slow.test/";
pub const FAST_LINK: &str = "https://fast.test/";
pub const NO_DATA_LINK: &str = "https://nodata.test/";
pub const HTML_LINK: &str = "https://html.test/";
pub const HANGING_LINK: &str = "https://hang.test/";

pub const SLOW_DELAY: Duration = Duration::from_millis(400);
pub const HANG_DELAY: Duration = Duration::from_secs(3);

// ── Mock metadata service ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MetadataQuery {
    q: String,
}

async fn mock_metadata(Query(params): Query<MetadataQuery>) -> Response {
    match params.q.as_str() {
        OK_LINK => Json(json!({
            "data": {
                "og:title": "OK Title",
                "og:description": "OK description",
                "og:image": "https://ok.test/og.png",
                "title": "ignored"
            }
        }))
        .into_response(),
        NO_IMAGE_LINK => Json(json!({
            "data": { "title": "No Image", "description": "Nothing to show" }
        }))
        .into_response(),
        LOGO_LINK => Json(json!({
            "data": {
                "title": "Logo",
                "ld+json": { "publisher": { "logo": "https://logo.test/logo.png" } }
            }
        }))
        .into_response(),
        FAILING_LINK => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        SLOW_LINK => {
            tokio::time::sleep(SLOW_DELAY).await;
            Json(json!({ "data": { "og:title": "Slow" } })).into_response()
        }
        FAST_LINK => Json(json!({ "data": { "og:title": "Fast" } })).into_response(),
        NO_DATA_LINK => Json(json!({ "other": 1 })).into_response(),
        HTML_LINK => (
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body>not json</body></html>",
        )
            .into_response(),
        HANGING_LINK => {
            tokio::time::sleep(HANG_DELAY).await;
            Json(json!({ "data": { "og:title": "Too late" } })).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the mock metadata service on an ephemeral port and return its
/// endpoint URL.
pub async fn spawn_metadata_service() -> Url {
    let app = Router::new().route(METADATA_PATH, get(mock_metadata));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock metadata service");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}{METADATA_PATH}")).unwrap()
}

// ── App construction ─────────────────────────────────────────────────────────

/// Build the full API router wired to the given metadata endpoint.
pub fn create_test_app(endpoint: Url) -> Router {
    create_test_app_with(endpoint, LoadingPolicy::OnCompletion, "")
}

pub fn create_test_app_with(endpoint: Url, policy: LoadingPolicy, default_link: &str) -> Router {
    build_app(
        endpoint,
        policy,
        default_link,
        Strings::default(),
        Duration::from_secs(5),
    )
}

/// Router with a short client timeout, for exercising timed-out fetches.
pub fn create_test_app_with_timeout(endpoint: Url, fetch_timeout: Duration) -> Router {
    build_app(
        endpoint,
        LoadingPolicy::OnCompletion,
        "",
        Strings::default(),
        fetch_timeout,
    )
}

/// Router whose cards use the given strings table.
pub fn create_test_app_with_strings(endpoint: Url, strings: Strings) -> Router {
    build_app(
        endpoint,
        LoadingPolicy::OnCompletion,
        "",
        strings,
        Duration::from_secs(5),
    )
}

fn build_app(
    endpoint: Url,
    policy: LoadingPolicy,
    default_link: &str,
    strings: Strings,
    fetch_timeout: Duration,
) -> Router {
    let registry = ComponentRegistry::new();
    register_components(&registry).unwrap();

    let metadata = HttpMetadataClient::new(endpoint, None, fetch_timeout).unwrap();

    let state = AppState {
        cards: CardStore::new(),
        registry: Arc::new(registry),
        metadata: Arc::new(metadata),
        strings: Arc::new(strings),
        loading_policy: policy,
        default_web_link: Arc::from(default_link),
    };
    handlers::routes().with_state(state)
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn delete(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// GET returning the raw body text and content type.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String, String) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ── Scenario helpers ─────────────────────────────────────────────────────────

/// Create a card and return the full response body.
pub async fn create_card(app: Router, body: Value) -> Value {
    let (status, body) = post_json(app, "/cards", body).await;
    assert_eq!(status, StatusCode::CREATED, "setup create_card failed: {body}");
    body
}

/// Create a card with no attributes and return its ID.
pub async fn create_blank_card(app: Router) -> String {
    let body = create_card(app, json!({})).await;
    body["id"].as_str().unwrap().to_owned()
}

pub async fn search(app: Router, id: &str, value: &str, trigger: &str) -> (StatusCode, Value) {
    post_json(
        app,
        &format!("/cards/{id}/search"),
        json!({ "value": value, "trigger": trigger }),
    )
    .await
}

/// Poll the card until `loading` is false and return the final body.
pub async fn wait_until_settled(app: Router, id: &str) -> Value {
    let uri = format!("/cards/{id}");
    for _ in 0..100 {
        let (status, body) = get_json(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK, "card disappeared: {body}");
        if body["state"]["loading"] == false {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("card {id} never finished loading");
}
