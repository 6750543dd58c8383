//! Fixture 生成集成测试

use cloud_testbed::fixtures::{
    FieldRule, FileFixture, FixturePolicy, WordSource, pretty_print, random_email, random_entity,
    random_word,
};
use cloud_testbed::model::{ModelSchema, Property};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::io::Write;

fn no_overrides() -> BTreeMap<String, Value> {
    BTreeMap::new()
}

#[test]
fn repeated_text_property_yields_single_element_array() {
    let schema = ModelSchema::new("Post").property(Property::text("tags").repeated());
    let entity = random_entity(&schema, &no_overrides(), &FixturePolicy::default());

    let tags = entity.get("tags").unwrap().as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert!(!tags[0].as_str().unwrap().is_empty());
}

#[test]
fn repeated_property_with_null_generator_omits_key() {
    let schema = ModelSchema::new("Post").property(Property::temporal("timestamps").repeated());
    let entity = random_entity(&schema, &no_overrides(), &FixturePolicy::default());

    assert!(entity.get("timestamps").is_none());
}

#[test]
fn overrides_win_over_everything() {
    let schema = ModelSchema::new("Post")
        .property(Property::text("title").with_default(json!("default-title")))
        .property(Property::text("body"));

    let mut overrides = BTreeMap::new();
    overrides.insert("title".to_string(), json!("explicit"));
    let entity = random_entity(&schema, &overrides, &FixturePolicy::default());

    assert_eq!(entity.get("title"), Some(&json!("explicit")));
    assert!(entity.get("body").is_some());
}

#[test]
fn defaults_beat_choices_and_kind_table() {
    let schema = ModelSchema::new("Cfg").property(
        Property::text("mode")
            .with_default(json!("fast"))
            .with_choices(vec![json!("slow"), json!("medium")]),
    );
    let entity = random_entity(&schema, &no_overrides(), &FixturePolicy::default());
    assert_eq!(entity.get("mode"), Some(&json!("fast")));
}

#[test]
fn choices_draw_uniformly_from_set() {
    let choices = vec![json!("red"), json!("green"), json!("blue")];
    let schema =
        ModelSchema::new("Cfg").property(Property::text("color").with_choices(choices.clone()));

    for _ in 0..10 {
        let entity = random_entity(&schema, &no_overrides(), &FixturePolicy::default());
        assert!(choices.contains(entity.get("color").unwrap()));
    }
}

#[test]
fn reference_property_builds_synthetic_key() {
    let schema = ModelSchema::new("Post")
        .property(Property::reference("author").target_kind("User"))
        .property(Property::reference("anything"));
    let entity = random_entity(&schema, &no_overrides(), &FixturePolicy::default());

    assert_eq!(entity.get("author").unwrap()["kind"], "User");
    // 未声明目标 kind 时随机取名
    let anything = entity.get("anything").unwrap();
    assert!(!anything["kind"].as_str().unwrap().is_empty());
    assert!(!anything["name"].as_str().unwrap().is_empty());
}

#[test]
fn email_substring_generates_address_regardless_of_kind() {
    let schema = ModelSchema::new("User")
        .property(Property::numeric("primary_email"))
        .property(Property::numeric("count"));
    let entity = random_entity(&schema, &no_overrides(), &FixturePolicy::default());

    let email = entity.get("primary_email").unwrap().as_str().unwrap();
    assert!(email.contains('@'));
    assert!(entity.get("count").is_none());
}

#[test]
fn explicit_field_rules_replace_substring_matching() {
    let schema = ModelSchema::new("User")
        .property(Property::text("email"))
        .property(Property::text("nickname"));
    let policy = FixturePolicy::default()
        .with_field_rule("email", FieldRule::Fixed(json!("pinned@example.com")))
        .with_field_rule("nickname", FieldRule::Unset);
    let entity = random_entity(&schema, &no_overrides(), &policy);

    assert_eq!(entity.get("email"), Some(&json!("pinned@example.com")));
    assert!(entity.get("nickname").is_none());
}

#[test]
fn pretty_print_lists_kind_and_non_null_fields() {
    let schema = ModelSchema::new("Post")
        .property(Property::text("title"))
        .property(Property::text("tags").repeated())
        .property(Property::numeric("views"));
    let entity = random_entity(&schema, &no_overrides(), &FixturePolicy::default());

    let printed = pretty_print(&entity, 1);
    assert!(printed.starts_with("<Post:"));
    assert!(printed.ends_with('>'));
    assert!(printed.contains("title"));
    assert!(printed.contains("tags"));
    // 未赋值的字段不出现
    assert!(!printed.contains("views"));

    for (name, value) in entity.to_map() {
        assert!(printed.contains(name.as_str()));
        assert!(printed.contains(&value.to_string()));
    }
}

#[test]
fn random_email_draws_parts_independently() {
    let first = random_email(None, WordSource::Unique);
    let second = random_email(None, WordSource::Unique);

    for email in [&first, &second] {
        let (local, rest) = email.split_once('@').unwrap();
        assert!(!local.is_empty());
        let domain = rest.strip_suffix(".com").unwrap();
        assert!(!domain.is_empty());
        assert_ne!(local, domain);
    }
    assert_ne!(first, second);
}

#[test]
fn lexicon_word_source_uses_seed_list() {
    let word = random_word(WordSource::Lexicon);
    assert!(!word.is_empty());
    // 词表取词不保证唯一，只验证格式
    assert!(word.chars().all(|c| c.is_ascii_alphabetic()));
}

#[test]
fn file_fixture_triple_from_bytes() {
    let file = FileFixture::from_bytes("testing", Some("data.bin"));
    assert_eq!(file.content, b"testing");
    assert_eq!(file.filename, "data.bin");
    assert_eq!(file.size, 7);
}

#[test]
fn file_fixture_from_disk() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(b"on disk content").unwrap();

    let file = FileFixture::from_path(tmp.path()).unwrap();
    assert_eq!(file.content, b"on disk content");
    assert_eq!(file.size, 15);
    assert!(!file.filename.is_empty());
}

#[test]
fn file_fixture_missing_path_errors() {
    let err = FileFixture::from_path("/definitely/not/here.txt").unwrap_err();
    assert!(matches!(err, cloud_testbed::TestbedError::Io(_)));
}
