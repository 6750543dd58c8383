//! 内存存储
//!
//! 服务桩共用的内存数据结构：按 key 存取的 `MemoryStore` 和
//! 只追加的 `RecordLog`。克隆共享底层数据，适合在桩与测试代码之间传递。

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// 通用内存存储
///
/// 基于 DashMap 实现，存放服务桩的临时数据（缓存条目、blob、实体等）。
#[derive(Debug)]
pub struct MemoryStore<T> {
    data: Arc<DashMap<String, T>>,
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryStore<T> {
    /// 创建新的内存存储实例
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// 插入或更新数据
    ///
    /// 如果 key 已存在则覆盖原有数据
    pub fn insert(&self, id: &str, value: T) {
        self.data.insert(id.to_string(), value);
    }

    /// 获取数据
    ///
    /// 返回数据的克隆，不持有锁
    pub fn get(&self, id: &str) -> Option<T> {
        self.data.get(id).map(|v| v.clone())
    }

    /// 删除数据
    ///
    /// 返回被删除的数据
    pub fn remove(&self, id: &str) -> Option<T> {
        self.data.remove(id).map(|(_, v)| v)
    }

    /// 列出所有数据
    pub fn list(&self) -> Vec<T> {
        self.data
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// 按条件筛选数据
    pub fn list_by<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.data
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// 列出所有 key
    pub fn keys(&self) -> Vec<String> {
        self.data.iter().map(|entry| entry.key().clone()).collect()
    }

    /// 获取数据总数
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// 清空所有数据
    pub fn clear(&self) {
        self.data.clear();
    }

    /// 检查是否存在指定 key
    pub fn contains(&self, id: &str) -> bool {
        self.data.contains_key(id)
    }
}

impl<T: Clone> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

/// 只追加的记录日志
///
/// 记录服务桩收到的调用（已发送邮件、已入队任务等），保留插入顺序，
/// 供断言按条件查询。
#[derive(Debug)]
pub struct RecordLog<T> {
    records: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Default for RecordLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> RecordLog<T> {
    /// 创建空日志
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 追加一条记录
    pub fn push(&self, record: T) {
        self.records.lock().push(record);
    }

    /// 返回全部记录的快照
    pub fn snapshot(&self) -> Vec<T> {
        self.records.lock().clone()
    }

    /// 按条件筛选记录
    pub fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records
            .lock()
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// 记录总数
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// 清空所有记录
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl<T: Clone> Clone for RecordLog<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}
