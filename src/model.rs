//! 声明式数据模型
//!
//! Fixture 生成器反射遍历的模型表层：模型 schema、属性声明和生成出的
//! 实体实例。实体只是内存中的键值对，除非调用方显式写入 datastore 桩，
//! 否则不会被持久化。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 属性类别
///
/// 生成器按类别查表决定随机值的产生方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// 文本类（字符串）
    Text,
    /// 引用类（指向其他实体的 key）
    Reference,
    /// 布尔类
    Boolean,
    /// 数值类（整数、浮点）
    Numeric,
    /// 时间类（日期、时间、时间戳）
    Temporal,
    /// 二进制类（blob、blob key）
    Binary,
}

/// 属性声明
///
/// 描述模型上一个字段：类别、静态默认值、可选枚举值、是否多值，
/// 以及引用类属性指向的目标 kind。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub kind: PropertyKind,
    pub default: Option<Value>,
    pub choices: Vec<Value>,
    pub repeated: bool,
    /// 引用类属性的目标 kind 名，缺省时生成器随机取名
    pub reference_kind: Option<String>,
}

impl Property {
    fn new(name: &str, kind: PropertyKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default: None,
            choices: Vec::new(),
            repeated: false,
            reference_kind: None,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, PropertyKind::Text)
    }

    pub fn reference(name: &str) -> Self {
        Self::new(name, PropertyKind::Reference)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, PropertyKind::Boolean)
    }

    pub fn numeric(name: &str) -> Self {
        Self::new(name, PropertyKind::Numeric)
    }

    pub fn temporal(name: &str) -> Self {
        Self::new(name, PropertyKind::Temporal)
    }

    pub fn binary(name: &str) -> Self {
        Self::new(name, PropertyKind::Binary)
    }

    /// 设置静态默认值
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// 限定取值为枚举集合
    pub fn with_choices(mut self, choices: Vec<Value>) -> Self {
        self.choices = choices;
        self
    }

    /// 标记为多值属性
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// 设置引用目标 kind
    pub fn target_kind(mut self, kind: &str) -> Self {
        self.reference_kind = Some(kind.to_string());
        self
    }
}

/// 模型 schema
///
/// 一个 kind 名加上按声明顺序排列的属性列表。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSchema {
    kind: String,
    properties: Vec<Property>,
}

impl ModelSchema {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            properties: Vec::new(),
        }
    }

    /// 追加一个属性声明
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// 按名称查找属性声明
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// 实体 key
///
/// kind 名加名称，引用类属性的合成 key 也用同一结构。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityKey {
    pub kind: String,
    pub name: String,
}

impl EntityKey {
    pub fn new(kind: &str, name: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    /// 转为 JSON 值，作为属性值存入实体
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "kind": self.kind, "name": self.name })
    }

    /// datastore 桩使用的存储 key
    pub fn storage_key(&self) -> String {
        format!("{}/{}", self.kind, self.name)
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.name)
    }
}

/// 模型实例
///
/// 生成器产出的实体：kind 名加字段映射。未赋值的字段不出现在映射中。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    kind: String,
    values: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            values: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// 设置单个字段
    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// 批量填充字段，入参覆盖已有值
    pub fn populate(&mut self, values: BTreeMap<String, Value>) {
        for (name, value) in values {
            self.values.insert(name, value);
        }
    }

    /// 读取字段，未赋值返回 None
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// 字段名→值 映射
    pub fn to_map(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}
