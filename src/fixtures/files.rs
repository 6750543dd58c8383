//! 文件上传 fixture
//!
//! 以（内容、文件名、字节长度）三元组表示一次模拟上传，
//! 供测试客户端构造 multipart 请求体。

use crate::error::Result;
use crate::fixtures::words::{WordSource, random_word};
use std::fs;
use std::path::Path;

/// 模拟上传的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFixture {
    pub content: Vec<u8>,
    pub filename: String,
    pub size: usize,
}

impl FileFixture {
    /// 由内存数据创建
    ///
    /// 未指定文件名时随机生成一个。
    pub fn from_bytes(data: impl Into<Vec<u8>>, filename: Option<&str>) -> Self {
        let content = data.into();
        let size = content.len();
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| random_word(WordSource::Unique));
        Self {
            content,
            filename,
            size,
        }
    }

    /// 读取磁盘文件创建
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| random_word(WordSource::Unique));
        let size = content.len();
        Ok(Self {
            content,
            filename,
            size,
        })
    }
}
