//! Blobstore 服务桩
//!
//! 按 blob key 存储二进制内容和元数据（大小、创建时间）。

use crate::store::MemoryStore;
use crate::stubs::ServiceStub;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blob 元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobRecord {
    pub key: String,
    pub size: usize,
    pub creation: DateTime<Utc>,
}

/// Blobstore 服务桩
#[derive(Debug, Default)]
pub struct BlobstoreStub {
    content: MemoryStore<Vec<u8>>,
    info: MemoryStore<BlobRecord>,
}

impl BlobstoreStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建并存储一个 blob，返回其元数据
    pub fn create_blob(&self, key: &str, content: impl Into<Vec<u8>>) -> BlobRecord {
        let content = content.into();
        let record = BlobRecord {
            key: key.to_string(),
            size: content.len(),
            creation: Utc::now(),
        };
        tracing::debug!(key, size = record.size, "创建 blob");
        self.content.insert(key, content);
        self.info.insert(key, record.clone());
        record
    }

    /// 读取 blob 内容
    pub fn get_blob(&self, key: &str) -> Option<Vec<u8>> {
        self.content.get(key)
    }

    /// 读取 blob 元数据
    pub fn blob_info(&self, key: &str) -> Option<BlobRecord> {
        self.info.get(key)
    }

    /// 当前 blob 数量
    pub fn blob_count(&self) -> usize {
        self.info.count()
    }
}

impl ServiceStub for BlobstoreStub {
    fn service_name(&self) -> &'static str {
        super::service::BLOBSTORE
    }

    fn reset(&self) {
        self.content.clear();
        self.info.clear();
    }
}
