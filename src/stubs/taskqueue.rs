//! Task Queue 服务桩
//!
//! 记录入队的任务并按 URL/名称/队列名过滤查询。入队时校验队列名
//! 必须在声明的队列列表中。

use crate::error::{Result, TestbedError};
use crate::store::RecordLog;
use crate::stubs::ServiceStub;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 默认队列名
pub const DEFAULT_QUEUE: &str = "default";

/// 已入队的任务记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub url: String,
    pub name: Option<String>,
    pub queue: String,
    pub method: String,
    pub payload: Option<Value>,
}

impl TaskRecord {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            name: None,
            queue: DEFAULT_QUEUE.to_string(),
            method: "POST".to_string(),
            payload: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn queue(mut self, queue: &str) -> Self {
        self.queue = queue.to_string();
        self
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// 任务查询条件
///
/// 未设置的条件匹配所有任务。
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub url: Option<String>,
    pub name: Option<String>,
    pub queue_names: Option<Vec<String>>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn queue_names(mut self, names: &[&str]) -> Self {
        self.queue_names = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    fn matches(&self, task: &TaskRecord) -> bool {
        if let Some(url) = &self.url {
            if &task.url != url {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if task.name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        if let Some(queues) = &self.queue_names {
            if !queues.iter().any(|q| q == &task.queue) {
                return false;
            }
        }
        true
    }
}

/// Task Queue 服务桩
#[derive(Debug)]
pub struct TaskQueueStub {
    queues: Vec<String>,
    tasks: RecordLog<TaskRecord>,
}

impl Default for TaskQueueStub {
    fn default() -> Self {
        Self::new(&[DEFAULT_QUEUE.to_string()])
    }
}

impl TaskQueueStub {
    /// 用声明的队列列表创建
    pub fn new(queues: &[String]) -> Self {
        Self {
            queues: queues.to_vec(),
            tasks: RecordLog::new(),
        }
    }

    /// 声明的队列名
    pub fn queues(&self) -> &[String] {
        &self.queues
    }

    /// 任务入队
    ///
    /// 队列名不在声明列表中时返回错误。
    pub fn enqueue(&self, task: TaskRecord) -> Result<()> {
        if !self.queues.iter().any(|q| q == &task.queue) {
            return Err(TestbedError::UnknownQueue {
                queue: task.queue.clone(),
            });
        }
        tracing::debug!(url = %task.url, queue = %task.queue, "任务入队");
        self.tasks.push(task);
        Ok(())
    }

    /// 按条件查询已入队任务
    pub fn filtered_tasks(&self, filter: &TaskFilter) -> Vec<TaskRecord> {
        self.tasks.filter(|t| filter.matches(t))
    }

    /// 已入队任务总数
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl ServiceStub for TaskQueueStub {
    fn service_name(&self) -> &'static str {
        super::service::TASKQUEUE
    }

    fn reset(&self) {
        self.tasks.clear();
    }
}
