//! 轻量服务桩
//!
//! 消息、文件写入、channel、网络抓取、capability、日志和应用身份。
//! 这些服务只需记录调用或提供固定应答，不值得单独成模块。

use crate::error::{Result, TestbedError};
use crate::store::{MemoryStore, RecordLog};
use crate::stubs::ServiceStub;
use dashmap::DashSet;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

// ==================== XMPP（消息） ====================

/// 已发送的即时消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmppMessage {
    pub to: String,
    pub body: String,
}

/// XMPP 服务桩
#[derive(Debug, Default)]
pub struct XmppStub {
    messages: RecordLog<XmppMessage>,
}

impl XmppStub {
    pub fn send_message(&self, to: &str, body: &str) {
        self.messages.push(XmppMessage {
            to: to.to_string(),
            body: body.to_string(),
        });
    }

    pub fn sent_messages(&self) -> Vec<XmppMessage> {
        self.messages.snapshot()
    }
}

impl ServiceStub for XmppStub {
    fn service_name(&self) -> &'static str {
        super::service::XMPP
    }

    fn reset(&self) {
        self.messages.clear();
    }
}

// ==================== 文件写入 ====================

/// 文件写入服务桩
///
/// create → append → finalize 的写入流程；finalize 之后内容可读回。
#[derive(Debug, Default)]
pub struct FilesStub {
    open: Mutex<HashMap<String, Vec<u8>>>,
    finalized: MemoryStore<Vec<u8>>,
}

impl FilesStub {
    /// 打开一个新文件
    pub fn create(&self, filename: &str) {
        self.open.lock().insert(filename.to_string(), Vec::new());
    }

    /// 向打开的文件追加内容
    pub fn append(&self, filename: &str, data: &[u8]) -> Result<()> {
        let mut open = self.open.lock();
        let buffer = open
            .get_mut(filename)
            .ok_or_else(|| TestbedError::FileNotOpen {
                filename: filename.to_string(),
            })?;
        buffer.extend_from_slice(data);
        Ok(())
    }

    /// 关闭文件并使其可读
    pub fn finalize(&self, filename: &str) -> Result<()> {
        let content = self
            .open
            .lock()
            .remove(filename)
            .ok_or_else(|| TestbedError::FileNotOpen {
                filename: filename.to_string(),
            })?;
        self.finalized.insert(filename, content);
        Ok(())
    }

    /// 读取已关闭文件的内容
    pub fn read(&self, filename: &str) -> Option<Vec<u8>> {
        self.finalized.get(filename)
    }
}

impl ServiceStub for FilesStub {
    fn service_name(&self) -> &'static str {
        super::service::FILES
    }

    fn reset(&self) {
        self.open.lock().clear();
        self.finalized.clear();
    }
}

// ==================== Channel ====================

/// Channel 服务桩
///
/// 按 client id 建立通道并记录推送的消息。
#[derive(Debug, Default)]
pub struct ChannelStub {
    tokens: MemoryStore<String>,
    messages: MemoryStore<Vec<Value>>,
}

impl ChannelStub {
    /// 为客户端创建通道，返回 token
    pub fn create_channel(&self, client_id: &str) -> String {
        let token = format!("channel-{}", Uuid::new_v4().simple());
        self.tokens.insert(client_id, token.clone());
        self.messages.insert(client_id, Vec::new());
        token
    }

    /// 向客户端通道推送消息
    pub fn send_message(&self, client_id: &str, payload: Value) {
        let mut queued = self.messages.get(client_id).unwrap_or_default();
        queued.push(payload);
        self.messages.insert(client_id, queued);
    }

    /// 读取推送给客户端的全部消息
    pub fn messages(&self, client_id: &str) -> Vec<Value> {
        self.messages.get(client_id).unwrap_or_default()
    }
}

impl ServiceStub for ChannelStub {
    fn service_name(&self) -> &'static str {
        super::service::CHANNEL
    }

    fn reset(&self) {
        self.tokens.clear();
        self.messages.clear();
    }
}

// ==================== URL Fetch ====================

/// 预置的抓取应答
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

/// 网络抓取服务桩
///
/// 按 URL 返回预置应答并记录每次抓取；未注册的 URL 返回 404。
#[derive(Debug, Default)]
pub struct UrlFetchStub {
    canned: MemoryStore<CannedResponse>,
    calls: RecordLog<String>,
}

impl UrlFetchStub {
    /// 注册一个 URL 的应答
    pub fn register(&self, url: &str, status: u16, body: &str) {
        self.canned.insert(
            url,
            CannedResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    /// 抓取 URL
    pub fn fetch(&self, url: &str) -> CannedResponse {
        self.calls.push(url.to_string());
        self.canned.get(url).unwrap_or(CannedResponse {
            status: 404,
            body: String::new(),
        })
    }

    /// 已抓取过的 URL 列表
    pub fn fetched_urls(&self) -> Vec<String> {
        self.calls.snapshot()
    }
}

impl ServiceStub for UrlFetchStub {
    fn service_name(&self) -> &'static str {
        super::service::URLFETCH
    }

    fn reset(&self) {
        self.canned.clear();
        self.calls.clear();
    }
}

// ==================== Capability ====================

/// Capability 服务桩
///
/// 服务默认可用，测试可以按名关停。
#[derive(Debug, Default)]
pub struct CapabilityStub {
    disabled: DashSet<String>,
}

impl CapabilityStub {
    pub fn is_enabled(&self, service: &str) -> bool {
        !self.disabled.contains(service)
    }

    pub fn set_enabled(&self, service: &str, enabled: bool) {
        if enabled {
            self.disabled.remove(service);
        } else {
            self.disabled.insert(service.to_string());
        }
    }
}

impl ServiceStub for CapabilityStub {
    fn service_name(&self) -> &'static str {
        super::service::CAPABILITY
    }

    fn reset(&self) {
        self.disabled.clear();
    }
}

// ==================== 日志服务 ====================

/// 记录的日志行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLine {
    pub level: String,
    pub message: String,
}

/// 日志服务桩
#[derive(Debug, Default)]
pub struct LogServiceStub {
    lines: RecordLog<LogLine>,
}

impl LogServiceStub {
    pub fn log(&self, level: &str, message: &str) {
        self.lines.push(LogLine {
            level: level.to_string(),
            message: message.to_string(),
        });
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.snapshot()
    }
}

impl ServiceStub for LogServiceStub {
    fn service_name(&self) -> &'static str {
        super::service::LOGSERVICE
    }

    fn reset(&self) {
        self.lines.clear();
    }
}

// ==================== 应用身份 ====================

/// 应用身份服务桩
#[derive(Debug)]
pub struct AppIdentityStub {
    app_id: String,
}

impl Default for AppIdentityStub {
    fn default() -> Self {
        Self {
            app_id: "testbed-app".to_string(),
        }
    }
}

impl AppIdentityStub {
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn default_hostname(&self) -> String {
        format!("{}.example.com", self.app_id)
    }
}

impl ServiceStub for AppIdentityStub {
    fn service_name(&self) -> &'static str {
        super::service::APP_IDENTITY
    }

    fn reset(&self) {}
}
