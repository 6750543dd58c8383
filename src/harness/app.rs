//! 被测应用
//!
//! 应用工厂产出的实例：axum Router、命名路由表和可选的 server name。
//! 命名路由表支撑按 handler 名反解 URL，测试不必硬编码路径。

use crate::error::{Result, TestbedError};
use axum::Router;
use axum::routing::MethodRouter;

/// 命名路由
#[derive(Debug, Clone)]
struct NamedRoute {
    name: String,
    pattern: String,
}

/// 反解出的 URL
///
/// 配置了 server name 的应用会拆分为 base URL 和路径，
/// 请求按 base URL 指定的 origin 发出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub base_url: Option<String>,
    pub path: String,
}

/// 被测应用实例
#[derive(Clone, Default)]
pub struct TestApp {
    router: Router,
    routes: Vec<NamedRoute>,
    server_name: Option<String>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一条命名路由
    ///
    /// pattern 使用 axum 的 `{param}` 语法。
    pub fn route_named(mut self, name: &str, pattern: &str, handler: MethodRouter) -> Self {
        self.routes.push(NamedRoute {
            name: name.to_string(),
            pattern: pattern.to_string(),
        });
        self.router = self.router.route(pattern, handler);
        self
    }

    /// 合并一个外部构建的 Router（其中的路由不参与命名反解）
    pub fn mount(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// 配置 server name
    pub fn with_server_name(mut self, host: &str) -> Self {
        self.server_name = Some(host.to_string());
        self
    }

    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Router 的克隆，供 oneshot 派发
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 按 handler 名反解 URL
    ///
    /// 路径参数填充 `{param}` 段，剩余参数拼为查询串。
    /// 未注册的 handler 或缺失的路径参数返回错误。
    pub fn url_for(&self, handler: &str, params: &[(&str, &str)]) -> Result<ResolvedUrl> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name == handler)
            .ok_or_else(|| TestbedError::HandlerNotFound {
                name: handler.to_string(),
            })?;

        let mut used = Vec::new();
        let mut segments = Vec::new();
        for segment in route.pattern.split('/') {
            if let Some(param) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                let param = param.trim_start_matches('*');
                let value = params
                    .iter()
                    .find(|(name, _)| *name == param)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| TestbedError::MissingPathParam {
                        param: param.to_string(),
                        pattern: route.pattern.clone(),
                    })?;
                used.push(param.to_string());
                segments.push(value.to_string());
            } else {
                segments.push(segment.to_string());
            }
        }
        let mut path = segments.join("/");

        let query: Vec<String> = params
            .iter()
            .filter(|(name, _)| !used.iter().any(|u| u == name))
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }

        let base_url = self
            .server_name
            .as_ref()
            .map(|host| format!("http://{}", host));
        Ok(ResolvedUrl { base_url, path })
    }
}

/// 应用工厂
///
/// 唯一必须实现的扩展点是 [`create_app`](AppFactory::create_app)。
/// 四个钩子按名字指示的时机运行在桩生命周期窗口之外，默认空实现。
pub trait AppFactory {
    /// 构建被测应用，带上所需配置
    fn create_app(&mut self) -> Result<TestApp> {
        Err(TestbedError::NotImplemented("create_app"))
    }

    /// 桩激活之前
    fn pre_setup(&mut self) {}

    /// setup 完成之后
    fn post_setup(&mut self) {}

    /// 桩停用之前
    fn pre_teardown(&mut self) {}

    /// teardown 完成之后
    fn post_teardown(&mut self) {}
}
