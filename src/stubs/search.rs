//! Search 服务桩（可选）
//!
//! 按索引存放文档并提供朴素的子串检索。只在启用 `search` feature
//! 时编译，feature 缺失即"环境不支持"，注册表静默跳过激活。

use crate::store::MemoryStore;
use crate::stubs::ServiceStub;
use serde::{Deserialize, Serialize};

/// 索引中的文档
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub index: String,
    pub id: String,
    pub text: String,
}

/// Search 服务桩
#[derive(Debug, Default)]
pub struct SearchStub {
    documents: MemoryStore<Document>,
}

impl SearchStub {
    /// 写入文档
    pub fn put_document(&self, index: &str, id: &str, text: &str) {
        let doc = Document {
            index: index.to_string(),
            id: id.to_string(),
            text: text.to_string(),
        };
        self.documents.insert(&format!("{}/{}", index, id), doc);
    }

    /// 在索引中按子串检索，返回命中的文档 id
    pub fn search(&self, index: &str, term: &str) -> Vec<String> {
        self.documents
            .list_by(|d| d.index == index && d.text.contains(term))
            .into_iter()
            .map(|d| d.id)
            .collect()
    }
}

impl ServiceStub for SearchStub {
    fn service_name(&self) -> &'static str {
        super::service::SEARCH
    }

    fn reset(&self) {
        self.documents.clear();
    }
}
