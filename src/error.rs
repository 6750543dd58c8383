//! 统一错误处理模块
//!
//! 定义测试环境中所有共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 测试环境错误类型
#[derive(Debug, Error)]
pub enum TestbedError {
    // ==================== 配置错误 ====================
    #[error("应用工厂未实现: {0}")]
    NotImplemented(&'static str),

    #[error("请求上下文已激活，每个测试只允许一个")]
    ContextAlreadyActive,

    // ==================== 路由错误 ====================
    #[error("路由未注册: {name}")]
    HandlerNotFound { name: String },

    #[error("路径参数缺失: {param} (pattern: {pattern})")]
    MissingPathParam { param: String, pattern: String },

    // ==================== 服务桩错误 ====================
    #[error("队列未声明: {queue}")]
    UnknownQueue { queue: String },

    #[error("服务桩不可用: {service}")]
    StubNotSupported { service: &'static str },

    #[error("文件未打开: {filename}")]
    FileNotOpen { filename: String },

    // ==================== 请求错误 ====================
    #[error("HTTP 错误: {0}")]
    Http(#[from] axum::http::Error),

    #[error("读取响应体失败: {0}")]
    Body(String),

    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    // ==================== 通用错误 ====================
    #[error("{0}")]
    Custom(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, TestbedError>;
