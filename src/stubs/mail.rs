//! Mail 服务桩
//!
//! 记录通过 Mail API 发送的邮件，供断言按条件查询。
//! 收件人和发件人按精确匹配，主题/正文/HTML 按子串匹配。

use crate::store::RecordLog;
use crate::stubs::ServiceStub;
use serde::{Deserialize, Serialize};

/// 已发送的邮件记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: Vec<String>,
    pub sender: String,
    pub subject: String,
    pub body: String,
    pub html: Option<String>,
}

impl MailMessage {
    pub fn new(sender: &str) -> Self {
        Self {
            sender: sender.to_string(),
            ..Default::default()
        }
    }

    /// 追加一个收件人
    pub fn to(mut self, recipient: &str) -> Self {
        self.to.push(recipient.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = Some(html.to_string());
        self
    }
}

/// 邮件查询条件
///
/// 未设置的条件不参与过滤。
#[derive(Debug, Clone, Default)]
pub struct MailFilter {
    pub to: Option<String>,
    pub sender: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub html: Option<String>,
}

impl MailFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(mut self, recipient: &str) -> Self {
        self.to = Some(recipient.to_string());
        self
    }

    pub fn sender(mut self, sender: &str) -> Self {
        self.sender = Some(sender.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = Some(html.to_string());
        self
    }

    /// 判断一封邮件是否满足全部已设置的条件
    pub fn matches(&self, message: &MailMessage) -> bool {
        if let Some(to) = &self.to {
            if !message.to.iter().any(|r| r == to) {
                return false;
            }
        }
        if let Some(sender) = &self.sender {
            if &message.sender != sender {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            if !message.subject.contains(subject.as_str()) {
                return false;
            }
        }
        if let Some(body) = &self.body {
            if !message.body.contains(body.as_str()) {
                return false;
            }
        }
        if let Some(html) = &self.html {
            match &message.html {
                Some(h) if h.contains(html.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Mail 服务桩
#[derive(Debug, Default)]
pub struct MailStub {
    sent: RecordLog<MailMessage>,
}

impl MailStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发送一封邮件（仅记录）
    pub fn send(&self, message: MailMessage) {
        tracing::debug!(sender = %message.sender, subject = %message.subject, "记录发送邮件");
        self.sent.push(message);
    }

    /// 按条件查询已发送邮件
    pub fn sent_messages(&self, filter: &MailFilter) -> Vec<MailMessage> {
        self.sent.filter(|m| filter.matches(m))
    }

    /// 已发送邮件总数
    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }
}

impl ServiceStub for MailStub {
    fn service_name(&self) -> &'static str {
        super::service::MAIL
    }

    fn reset(&self) {
        self.sent.clear();
    }
}
