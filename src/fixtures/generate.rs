//! 随机实体生成
//!
//! 按模型 schema 逐属性产生随机值：默认值优先，其次枚举集合随机取值，
//! 再按字段规则（显式规则表和 email 子串规则），最后按属性类别查表。
//! 生成出的实体不会被持久化。

use crate::fixtures::words::{random_email, random_word};
use crate::fixtures::{FieldRule, FixturePolicy};
use crate::model::{Entity, EntityKey, ModelSchema, Property, PropertyKind};
use rand::Rng;
use serde_json::Value;
use std::collections::BTreeMap;

type KindGenerator = fn(&Property, &FixturePolicy) -> Option<Value>;

/// 类别→生成函数 查找表
static KIND_GENERATORS: &[(PropertyKind, KindGenerator)] = &[
    (PropertyKind::Text, generate_text),
    (PropertyKind::Reference, generate_reference),
    (PropertyKind::Boolean, generate_unset),
    (PropertyKind::Numeric, generate_unset),
    (PropertyKind::Temporal, generate_unset),
    (PropertyKind::Binary, generate_unset),
];

fn generate_text(_prop: &Property, policy: &FixturePolicy) -> Option<Value> {
    Some(Value::String(random_word(policy.word_source)))
}

fn generate_reference(prop: &Property, policy: &FixturePolicy) -> Option<Value> {
    let kind = prop
        .reference_kind
        .clone()
        .unwrap_or_else(|| random_word(policy.word_source));
    let key = EntityKey::new(&kind, &random_word(policy.word_source));
    Some(key.to_value())
}

fn generate_unset(_prop: &Property, _policy: &FixturePolicy) -> Option<Value> {
    None
}

fn kind_generator(kind: PropertyKind) -> KindGenerator {
    KIND_GENERATORS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, g)| *g)
        .unwrap_or(generate_unset)
}

fn apply_field_rule(rule: &FieldRule, policy: &FixturePolicy) -> Option<Value> {
    match rule {
        FieldRule::Email => Some(Value::String(random_email(None, policy.word_source))),
        FieldRule::Word => Some(Value::String(random_word(policy.word_source))),
        FieldRule::Fixed(value) => Some(value.clone()),
        FieldRule::Unset => None,
    }
}

/// 为单个属性生成值，未赋值返回 None
fn generate_value(prop: &Property, policy: &FixturePolicy) -> Option<Value> {
    if let Some(default) = &prop.default {
        return Some(default.clone());
    }
    if !prop.choices.is_empty() {
        let idx = rand::thread_rng().gen_range(0..prop.choices.len());
        return Some(prop.choices[idx].clone());
    }
    if let Some(rule) = policy.field_rules.get(&prop.name) {
        return apply_field_rule(rule, policy);
    }
    if policy.email_substring_rule && prop.name.contains("email") {
        return Some(Value::String(random_email(None, policy.word_source)));
    }
    kind_generator(prop.kind)(prop, policy)
}

/// 生成一个随机实体
///
/// `overrides` 中给出的字段原样采用，其余字段按声明逐个生成。
/// 多值属性把非空值包成单元素数组，生成为空则完全省略该字段。
pub fn random_entity(
    schema: &ModelSchema,
    overrides: &BTreeMap<String, Value>,
    policy: &FixturePolicy,
) -> Entity {
    let mut values = BTreeMap::new();

    for prop in schema.properties() {
        if let Some(value) = overrides.get(&prop.name) {
            values.insert(prop.name.clone(), value.clone());
            continue;
        }

        let generated = generate_value(prop, policy);
        match (prop.repeated, generated) {
            (true, Some(value)) => {
                values.insert(prop.name.clone(), Value::Array(vec![value]));
            }
            (false, Some(value)) => {
                values.insert(prop.name.clone(), value);
            }
            // 未赋值的字段不写入实体
            (_, None) => {}
        }
    }

    let mut entity = Entity::new(schema.kind());
    entity.populate(values);
    entity
}

/// 诊断用的实体渲染
///
/// 输出 kind 名和每个非空字段，按 `indent` 级缩进。不要求能解析回来。
pub fn pretty_print(entity: &Entity, indent: usize) -> String {
    let pad = "  ".repeat(indent.max(1));
    let mut body = format!("<{}:", entity.kind());
    for (name, value) in entity.to_map() {
        if value.is_null() {
            continue;
        }
        body.push_str(&format!("\n{}{}: {}", pad, name, value));
    }
    body.push('>');
    body
}
