//! 测试客户端集成测试
//!
//! 构建一个带命名路由的演示应用，验证按 handler 名反解 URL、
//! JSON/multipart 请求派发和状态断言。

use axum::Json;
use axum::extract::{Multipart, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use cloud_testbed::fixtures::FileFixture;
use cloud_testbed::{AppFactory, Result, TestApp, TestEnvironment, assertions};
use serde_json::{Value, json};

async fn index() -> &'static str {
    "home"
}

async fn show_user(Path(user_id): Path<String>) -> Json<Value> {
    Json(json!({ "user_id": user_id }))
}

async fn echo(Json(payload): Json<Value>) -> Json<Value> {
    Json(payload)
}

async fn upload(mut multipart: Multipart) -> Json<Value> {
    let mut received = json!(null);
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.unwrap();
        received = json!({
            "field": name,
            "filename": filename,
            "size": data.len(),
        });
    }
    Json(received)
}

async fn host_echo(headers: HeaderMap) -> String {
    headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

async fn rejected() -> StatusCode {
    StatusCode::BAD_REQUEST
}

async fn gone() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn demo_app() -> TestApp {
    TestApp::new()
        .route_named("index", "/", get(index))
        .route_named("show_user", "/users/{user_id}", get(show_user))
        .route_named("echo", "/echo", post(echo))
        .route_named("upload", "/upload", post(upload))
        .route_named("host_echo", "/host", get(host_echo))
        .route_named("rejected", "/rejected", post(rejected))
        .route_named("gone", "/gone", get(gone))
}

struct DemoFactory;

impl AppFactory for DemoFactory {
    fn create_app(&mut self) -> Result<TestApp> {
        Ok(demo_app())
    }
}

struct NamedHostFactory;

impl AppFactory for NamedHostFactory {
    fn create_app(&mut self) -> Result<TestApp> {
        Ok(demo_app().with_server_name("api.example.com"))
    }
}

#[tokio::test]
async fn get_resolves_handler_name() {
    let mut env = TestEnvironment::setup(DemoFactory).unwrap();
    let response = env.client().get("index", &[]).await.unwrap();

    env.client().assert_success(&response);
    assert_eq!(response.text(), "home");
    env.teardown();
}

#[tokio::test]
async fn path_params_fill_pattern() {
    let mut env = TestEnvironment::setup(DemoFactory).unwrap();
    let response = env
        .client()
        .get("show_user", &[("user_id", "u-42")])
        .await
        .unwrap();

    let body: Value = response.json().unwrap();
    assert_eq!(body["user_id"], "u-42");
    env.teardown();
}

#[tokio::test]
async fn post_json_round_trips() -> anyhow::Result<()> {
    let mut env = TestEnvironment::setup(DemoFactory)?;
    let payload = json!({ "plan": "gold", "count": 3 });
    let response = env.client().post_json("echo", &[], &payload).await?;

    env.client().assert_success(&response);
    let body: Value = response.json()?;
    assert_eq!(body, payload);
    env.teardown();
    Ok(())
}

#[tokio::test]
async fn post_raw_sends_body() {
    let mut env = TestEnvironment::setup(DemoFactory).unwrap();
    let response = env
        .client()
        .post_raw("echo", &[], br#"{"n":1}"#.to_vec(), Some("application/json"))
        .await
        .unwrap();

    let body: Value = response.json().unwrap();
    assert_eq!(body["n"], 1);
    env.teardown();
}

#[tokio::test]
async fn post_file_builds_multipart() {
    let mut env = TestEnvironment::setup(DemoFactory).unwrap();
    let file = FileFixture::from_bytes("hello upload", Some("report.txt"));
    let response = env
        .client()
        .post_file("upload", &[], &file, None)
        .await
        .unwrap();

    env.client().assert_success(&response);
    let body: Value = response.json().unwrap();
    assert_eq!(body["field"], "files[]");
    assert_eq!(body["filename"], "report.txt");
    assert_eq!(body["size"], file.size);
    env.teardown();
}

#[tokio::test]
async fn server_name_carried_as_host() {
    let mut env = TestEnvironment::setup(NamedHostFactory).unwrap();

    let resolved = env.client().url_for("host_echo", &[]).unwrap();
    assert_eq!(resolved.base_url.as_deref(), Some("http://api.example.com"));

    let response = env.client().get("host_echo", &[]).await.unwrap();
    assert_eq!(response.text(), "api.example.com");
    env.teardown();
}

#[tokio::test]
async fn assert_error_defaults_to_400() {
    let mut env = TestEnvironment::setup(DemoFactory).unwrap();
    let response = env
        .client()
        .post_raw("rejected", &[], Vec::new(), None)
        .await
        .unwrap();

    env.client().assert_error(&response, None);
    env.teardown();
}

#[tokio::test]
async fn status_helpers_match_exact_code() {
    let mut env = TestEnvironment::setup(DemoFactory).unwrap();

    let ok = env.client().get("index", &[]).await.unwrap();
    assertions::assert_200(Some(&ok));
    assertions::assert_status(Some(&ok), 200);

    let missing = env.client().get("gone", &[]).await.unwrap();
    assertions::assert_404(Some(&missing));

    // 404 的响应不能通过 200 断言
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        assertions::assert_status(Some(&missing), 200);
    }));
    assert!(result.is_err());
    env.teardown();
}

#[test]
fn assert_status_none_has_distinct_message() {
    let result = std::panic::catch_unwind(|| {
        assertions::assert_status(None, 404);
    });
    let payload = result.unwrap_err();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap();
    assert!(message.contains("响应为 None"));
}

#[tokio::test]
async fn unknown_handler_is_an_error() {
    let mut env = TestEnvironment::setup(DemoFactory).unwrap();
    let err = env.client().get("nope", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        cloud_testbed::TestbedError::HandlerNotFound { .. }
    ));
    env.teardown();
}
