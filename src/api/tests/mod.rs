use super::*;
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use std::time::Duration;
use tower::ServiceExt;


const BOUNDARY: &str = "guest-toolhub-test-boundary";

/// Helper to create a test ToolHub instance wrapped in Arc
fn create_test_hub(ban_check_endpoint: Option<String>) -> (Arc<ToolHub>, tempfile::TempDir) {
    let (hub, temp_dir) = crate::test_helpers::create_test_hub(ban_check_endpoint);
    (Arc::new(hub), temp_dir)
}

/// Router over a fresh hub using the hub's own configuration
fn test_router(ban_check_endpoint: Option<String>) -> (Router, Arc<ToolHub>, tempfile::TempDir) {
    let (hub, temp_dir) = create_test_hub(ban_check_endpoint);
    let config = hub.config().clone();
    (create_router(hub.clone(), config), hub, temp_dir)
}

/// One multipart part: (field name, optional filename, content)
type Part<'a> = (&'a str, Option<&'a str>, &'a str);

/// Build a multipart/form-data body
fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = String::new();
    for (field, filename, content) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{field}\"\r\n\r\n"
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body.into_bytes()
}

fn combine_request(parts: &[Part<'_>]) -> Request {
    Request::builder()
        .method("POST")
        .uri("/api/combine")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let (hub, _temp_dir) = create_test_hub(None);

    let mut config = (**hub.config()).clone();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let hub = hub.clone();
        let config = config.clone();
        async move { start_api_server(hub, config).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    api_handle.abort();
}

#[tokio::test]
async fn test_server_starts_and_responds_to_health() {
    let (hub, _temp_dir) = create_test_hub(None);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_config = hub.config().clone();
    let server_handle = tokio::spawn(async move {
        let app = create_router(hub, server_config);
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    server_handle.abort();
}

#[tokio::test]
async fn test_cors_enabled() {
    let (hub, _temp_dir) = create_test_hub(None);

    let mut config = (**hub.config()).clone();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let app = create_router(hub, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_specific_origin() {
    let (hub, _temp_dir) = create_test_hub(None);

    let mut config = (**hub.config()).clone();
    config.server.api.cors_origins = vec!["http://allowed.example".to_string()];
    let app = create_router(hub, Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://allowed.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://allowed.example"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let (hub, _temp_dir) = create_test_hub(None);

    let mut config = (**hub.config()).clone();
    config.server.api.cors_enabled = false;
    let app = create_router(hub, Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_spawn_api_server_method() {
    let (hub, _temp_dir) = create_test_hub(None);

    // Default bind address may be taken; the task is aborted either way
    let api_handle = hub.spawn_api_server();
    tokio::time::sleep(Duration::from_millis(100)).await;
    api_handle.abort();
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _hub, _temp_dir) = test_router(None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
