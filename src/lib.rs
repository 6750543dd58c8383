//! cloud-testbed
//!
//! axum 应用的功能测试骨架：在每个测试前装配一组进程内云服务模拟器
//! （mail、memcache、任务队列、blobstore、datastore 等），测试后
//! 保证全部释放，并提供桩状态断言和随机测试数据生成。
//!
//! # 主要模块
//!
//! - `harness`: 测试环境生命周期、应用工厂、请求上下文和测试客户端
//! - `stubs`: 服务桩注册表和各个服务模拟器
//! - `assertions`: 桩状态与 HTTP 响应的断言辅助
//! - `fixtures`: 随机实体/词/邮箱生成和文件上传 fixture
//! - `model`: fixture 生成器反射遍历的声明式模型表层
//!
//! # 使用示例
//!
//! ```rust
//! use cloud_testbed::fixtures::{self, FixturePolicy};
//! use cloud_testbed::model::{ModelSchema, Property};
//! use std::collections::BTreeMap;
//!
//! let schema = ModelSchema::new("Post")
//!     .property(Property::text("title"))
//!     .property(Property::text("tags").repeated());
//!
//! let entity = fixtures::random_entity(&schema, &BTreeMap::new(), &FixturePolicy::default());
//! assert!(entity.get("title").is_some());
//! println!("{}", fixtures::pretty_print(&entity, 1));
//! ```

pub mod assertions;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod model;
pub mod store;
pub mod stubs;

pub use error::{Result, TestbedError};
pub use harness::{
    AppFactory, RequestContext, TestApp, TestClient, TestEnvironment, TestResponse, TestbedConfig,
    current_app, current_task_client,
};

/// 初始化测试日志
///
/// 按 `RUST_LOG` 过滤输出，重复调用是空操作。
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
