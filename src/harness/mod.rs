//! 测试环境骨架
//!
//! 环境生命周期、被测应用与工厂、请求上下文和测试客户端。

mod app;
mod client;
mod context;
mod environment;

pub use app::{AppFactory, ResolvedUrl, TestApp};
pub use client::{DEFAULT_UPLOAD_FIELD, TestClient, TestResponse};
pub use context::{RequestContext, current_app, current_task_client};
pub use environment::{TestEnvironment, TestbedConfig};
