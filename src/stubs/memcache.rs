//! Memcache 服务桩
//!
//! 内存键值缓存，维护累计命中/未命中计数和当前条目数，供断言读取。

use crate::store::MemoryStore;
use crate::stubs::ServiceStub;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// 缓存统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// 累计命中次数
    pub hits: u64,
    /// 累计未命中次数
    pub misses: u64,
    /// 当前键值对数量
    pub items: usize,
}

/// Memcache 服务桩
#[derive(Debug, Default)]
pub struct MemcacheStub {
    data: MemoryStore<Value>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemcacheStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入缓存
    pub fn set(&self, key: &str, value: Value) {
        self.data.insert(key, value);
    }

    /// 读取缓存，并计入命中/未命中
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.data.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::SeqCst);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::SeqCst);
                None
            }
        }
    }

    /// 删除缓存项，返回是否存在
    pub fn delete(&self, key: &str) -> bool {
        self.data.remove(key).is_some()
    }

    /// 清空全部缓存项（不重置计数器）
    pub fn flush(&self) {
        self.data.clear();
    }

    /// 当前统计
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::SeqCst),
            misses: self.misses.load(Ordering::SeqCst),
            items: self.data.count(),
        }
    }
}

impl ServiceStub for MemcacheStub {
    fn service_name(&self) -> &'static str {
        super::service::MEMCACHE
    }

    fn reset(&self) {
        self.data.clear();
        self.hits.store(0, Ordering::SeqCst);
        self.misses.store(0, Ordering::SeqCst);
    }
}
