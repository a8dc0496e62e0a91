// crates/serverlessrepo/tests/template_parser.rs
// ============================================================================
// Module: Template Parser Tests
// Description: JSON/YAML parsing, intrinsic tags, ordering, and dumping.
// Purpose: Pin tag expansion rules and round-trip fidelity.
// ============================================================================

//! Template parser integration tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::missing_docs_in_private_items,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::fs;

use serde_json::Value;
use serde_json::json;
use serverlessrepo::TemplateConfig;
use serverlessrepo::TemplateError;
use serverlessrepo::TemplateParser;
use serverlessrepo::dump_template;
use serverlessrepo::parse_template;
use serverlessrepo::read_template_file;
use tempfile::tempdir;

/// YAML template using short-form intrinsic tags.
const YAML_WITH_TAGS: &str = "
Resource:
    Key1: !Ref Something
    Key2: !GetAtt Another.Arn
    Key3: !FooBar [!Baz YetAnother, \"hello\"]
    Key4: !SomeTag {\"a\": \"1\"}
    Key5: !GetAtt OneMore.Outputs.Arn
    Key6: !Condition OtherCondition
";

/// Returns object keys in document order.
fn keys(value: &Value) -> Vec<&str> {
    value.as_object().unwrap().keys().map(String::as_str).collect()
}

// ============================================================================
// SECTION: Intrinsic Tags
// ============================================================================

#[test]
fn yaml_tags_expand_to_intrinsic_mappings() {
    let parsed = parse_template(YAML_WITH_TAGS).unwrap();
    let expected = json!({
        "Resource": {
            "Key1": {"Ref": "Something"},
            "Key2": {"Fn::GetAtt": ["Another", "Arn"]},
            "Key3": {"Fn::FooBar": [{"Fn::Baz": "YetAnother"}, "hello"]},
            "Key4": {"Fn::SomeTag": {"a": "1"}},
            "Key5": {"Fn::GetAtt": ["OneMore", "Outputs.Arn"]},
            "Key6": {"Condition": "OtherCondition"}
        }
    });
    assert_eq!(parsed, expected);
}

#[test]
fn dumped_tags_parse_back_to_the_same_document() {
    let parsed = parse_template(YAML_WITH_TAGS).unwrap();
    let dumped = dump_template(&parsed).unwrap();
    let reparsed = parse_template(&dumped).unwrap();
    assert_eq!(serde_json::to_string(&reparsed).unwrap(), serde_json::to_string(&parsed).unwrap());
}

#[test]
fn get_att_array_form_is_left_alone() {
    let parsed = parse_template("Resource:\n  Key: !GetAtt [\"a\", \"b\"]\n").unwrap();
    assert_eq!(parsed, json!({"Resource": {"Key": {"Fn::GetAtt": ["a", "b"]}}}));
}

#[test]
fn get_att_shorthand_splits_on_first_dot() {
    let parsed = parse_template("Value: !GetAtt Foo.Bar.Baz\n").unwrap();
    assert_eq!(parsed, json!({"Value": {"Fn::GetAtt": ["Foo", "Bar.Baz"]}}));
}

#[test]
fn get_att_shorthand_is_normalized_on_dump() {
    let parsed = parse_template("Value: !GetAtt Foo.Bar\n").unwrap();
    let dumped = dump_template(&parsed).unwrap();
    assert!(!dumped.contains("!GetAtt"));
    assert_eq!(parse_template(&dumped).unwrap(), json!({"Value": {"Fn::GetAtt": ["Foo", "Bar"]}}));
}

#[test]
fn sub_with_mapping_argument_is_expanded() {
    let text = "Value: !Sub\n  - '${Name}-suffix'\n  - Name: !Ref Prefix\n";
    let parsed = parse_template(text).unwrap();
    assert_eq!(
        parsed,
        json!({"Value": {"Fn::Sub": ["${Name}-suffix", {"Name": {"Ref": "Prefix"}}]}})
    );
}

// ============================================================================
// SECTION: JSON and Ordering
// ============================================================================

#[test]
fn json_with_tabs_is_parsed_as_json() {
    let parsed = parse_template("{\n\t\"foo\": \"bar\"\n}").unwrap();
    assert_eq!(parsed, json!({"foo": "bar"}));
}

#[test]
fn json_key_order_is_preserved() {
    let parsed = parse_template(r#"{"Zeta": 1, "Alpha": 2, "Mid": {"b": 1, "a": 2}}"#).unwrap();
    assert_eq!(keys(&parsed), ["Zeta", "Alpha", "Mid"]);
    assert_eq!(keys(&parsed["Mid"]), ["b", "a"]);
}

#[test]
fn yaml_key_order_survives_dump() {
    let text = "
B_Resource:
    Key2:
        Name: name2
    Key1:
        Name: name1
A_Resource:
    Key2:
        Name: name2
    Key1:
        Name: name1
";
    let parsed = parse_template(text).unwrap();
    assert_eq!(keys(&parsed), ["B_Resource", "A_Resource"]);
    assert_eq!(keys(&parsed["B_Resource"]), ["Key2", "Key1"]);

    let dumped = dump_template(&parsed).unwrap();
    let squash = |text: &str| text.chars().filter(|ch| !ch.is_whitespace()).collect::<String>();
    assert_eq!(squash(&dumped), squash(text));
}

#[test]
fn dump_uses_block_style() {
    let parsed = json!({"Outer": {"List": ["a", "b"], "Inner": {"k": "v"}}});
    let dumped = dump_template(&parsed).unwrap();
    assert!(dumped.contains("- a"));
    assert!(!dumped.contains('{'));
    assert!(!dumped.contains('['));
}

// ============================================================================
// SECTION: Failures and Limits
// ============================================================================

#[test]
fn unparseable_text_is_rejected() {
    let err = parse_template("key: [unclosed").unwrap_err();
    assert!(matches!(err, TemplateError::Parse(_)));
}

#[test]
fn oversized_template_is_rejected() {
    let parser = TemplateParser::new(TemplateConfig {
        max_bytes: 8,
        allow_yaml: true,
    });
    let err = parser.parse(r#"{"key": "value"}"#).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::TooLarge {
            max_bytes: 8,
            ..
        }
    ));
}

#[test]
fn yaml_fallback_can_be_disabled() {
    let parser = TemplateParser::new(TemplateConfig {
        allow_yaml: false,
        ..TemplateConfig::default()
    });
    assert!(parser.parse(r#"{"ok": true}"#).is_ok());
    let err = parser.parse("ok: true\n").unwrap_err();
    assert!(matches!(err, TemplateError::YamlDisabled(_)));
}

#[test]
fn structured_mapping_keys_are_rejected() {
    let err = parse_template("? [a, b]\n: value\n").unwrap_err();
    assert!(matches!(err, TemplateError::UnsupportedKey("sequence")));
}

// ============================================================================
// SECTION: Template Files
// ============================================================================

#[test]
fn read_template_file_returns_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("template.yaml");
    fs::write(&path, "Resources: {}\n").unwrap();
    assert_eq!(read_template_file(&path, 1024).unwrap(), "Resources: {}\n");
}

#[test]
fn read_template_file_enforces_limit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("template.yaml");
    fs::write(&path, "x".repeat(64)).unwrap();
    let err = read_template_file(&path, 16).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::TooLarge {
            max_bytes: 16,
            actual_bytes: 17
        }
    ));
}

#[test]
fn read_template_file_reports_missing_file() {
    let dir = tempdir().unwrap();
    let err = read_template_file(&dir.path().join("missing.yaml"), 1024).unwrap_err();
    assert!(matches!(err, TemplateError::Io(_)));
}
