//! 测试客户端
//!
//! 绑定一个被测应用，按 handler 名反解 URL 后把请求直接派发进
//! Router（oneshot，不经过网络）。提供 POST 原始体、JSON 和
//! multipart 文件上传的便捷方法，以及响应状态断言。

use crate::assertions;
use crate::error::{Result, TestbedError};
use crate::fixtures::FileFixture;
use crate::harness::app::{ResolvedUrl, TestApp};
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use uuid::Uuid;

/// 上传字段的默认名称
pub const DEFAULT_UPLOAD_FIELD: &str = "files[]";

/// 进程内请求的响应
#[derive(Debug, Clone)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    /// 状态码数值
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// 响应体原始字节
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// 响应体文本
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// 反序列化 JSON 响应体
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// 测试客户端
#[derive(Clone)]
pub struct TestClient {
    app: TestApp,
}

impl TestClient {
    pub fn new(app: TestApp) -> Self {
        Self { app }
    }

    /// 按 handler 名反解 URL
    pub fn url_for(&self, handler: &str, params: &[(&str, &str)]) -> Result<ResolvedUrl> {
        self.app.url_for(handler, params)
    }

    /// GET 请求
    pub async fn get(&self, handler: &str, params: &[(&str, &str)]) -> Result<TestResponse> {
        let resolved = self.url_for(handler, params)?;
        self.dispatch(Method::GET, &resolved, None, Vec::new())
            .await
    }

    /// POST 原始请求体
    pub async fn post_raw(
        &self,
        handler: &str,
        params: &[(&str, &str)],
        body: impl Into<Vec<u8>>,
        content_type: Option<&str>,
    ) -> Result<TestResponse> {
        let resolved = self.url_for(handler, params)?;
        self.dispatch(Method::POST, &resolved, content_type, body.into())
            .await
    }

    /// POST JSON 请求体
    pub async fn post_json<T: Serialize>(
        &self,
        handler: &str,
        params: &[(&str, &str)],
        payload: &T,
    ) -> Result<TestResponse> {
        let body = serde_json::to_vec(payload)?;
        self.post_raw(handler, params, body, Some("application/json"))
            .await
    }

    /// POST 文件上传
    ///
    /// 由 fixture 的（内容、文件名、长度）构造 multipart 请求体，
    /// 字段名缺省为 [`DEFAULT_UPLOAD_FIELD`]。
    pub async fn post_file(
        &self,
        handler: &str,
        params: &[(&str, &str)],
        file: &FileFixture,
        field: Option<&str>,
    ) -> Result<TestResponse> {
        let boundary = format!("testbed-{}", Uuid::new_v4().simple());
        let body = multipart_body(field.unwrap_or(DEFAULT_UPLOAD_FIELD), file, &boundary);
        let content_type = format!("multipart/form-data; boundary={}", boundary);
        self.post_raw(handler, params, body, Some(content_type.as_str()))
            .await
    }

    /// 断言响应成功（200）
    pub fn assert_success(&self, response: &TestResponse) {
        assertions::assert_status(Some(response), 200);
    }

    /// 断言响应为错误状态，缺省 400
    pub fn assert_error(&self, response: &TestResponse, error_code: Option<u16>) {
        assertions::assert_status(Some(response), error_code.unwrap_or(400));
    }

    async fn dispatch(
        &self,
        method: Method,
        resolved: &ResolvedUrl,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Result<TestResponse> {
        tracing::debug!(%method, path = %resolved.path, "派发进程内请求");

        let mut builder = Request::builder().method(method).uri(resolved.path.clone());
        if let Some(base_url) = &resolved.base_url {
            let host = base_url
                .trim_start_matches("http://")
                .trim_start_matches("https://");
            builder = builder.header("host", host);
        }
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body))?;

        let response = match self.app.router().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| TestbedError::Body(e.to_string()))?;

        Ok(TestResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

/// 构造单文件的 multipart/form-data 请求体
fn multipart_body(field: &str, file: &FileFixture, boundary: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(file.size + 256);
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            boundary, field, file.filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(&file.content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
