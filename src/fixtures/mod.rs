//! 测试数据 fixture
//!
//! 随机实体生成、随机词/邮箱和文件上传三元组。生成行为由
//! [`FixturePolicy`] 控制：词源、email 子串规则和按字段的显式规则表。

mod files;
mod generate;
mod words;

pub use files::FileFixture;
pub use generate::{pretty_print, random_entity};
pub use words::{WordSource, random_email, random_word};

use serde_json::Value;
use std::collections::HashMap;

/// 按字段的生成规则
///
/// 显式规则优先于 email 子串规则和类别查找表。
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// 生成随机邮箱
    Email,
    /// 生成随机词
    Word,
    /// 固定值
    Fixed(Value),
    /// 保持未赋值
    Unset,
}

/// Fixture 生成策略
#[derive(Debug, Clone)]
pub struct FixturePolicy {
    /// 随机词来源
    pub word_source: WordSource,
    /// 字段名包含 "email" 时生成随机邮箱（兼容默认行为，可关闭）
    pub email_substring_rule: bool,
    /// 按字段名的显式规则表
    pub field_rules: HashMap<String, FieldRule>,
}

impl Default for FixturePolicy {
    fn default() -> Self {
        Self {
            word_source: WordSource::Unique,
            email_substring_rule: true,
            field_rules: HashMap::new(),
        }
    }
}

impl FixturePolicy {
    /// 指定词源
    pub fn with_word_source(mut self, source: WordSource) -> Self {
        self.word_source = source;
        self
    }

    /// 关闭 email 子串规则
    pub fn without_email_rule(mut self) -> Self {
        self.email_substring_rule = false;
        self
    }

    /// 为字段设置显式规则
    pub fn with_field_rule(mut self, field: &str, rule: FieldRule) -> Self {
        self.field_rules.insert(field.to_string(), rule);
        self
    }
}
