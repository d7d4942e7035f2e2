use cac_diff::{DiffOptions, Error, diff};
use cac_patch::Tree;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn tree(value: Value) -> Tree {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn plain() -> DiffOptions {
    DiffOptions::default()
}

#[test]
fn present_at_source_prunes_unmanaged_keys() {
    let source = tree(json!({"a": 1, "b": 2}));
    let target = tree(json!({"a": 1, "b": 3, "c": 9}));
    let opts = DiffOptions {
        present_at_source: true,
        ..plain()
    };

    assert_eq!(diff(&source, &target, &opts).unwrap(), "b:\n- 2\n+ 3\n");
}

#[test]
fn without_pruning_extra_target_keys_are_added() {
    let source = tree(json!({"a": 1, "b": 2}));
    let target = tree(json!({"a": 1, "b": 3, "c": 9}));

    assert_eq!(
        diff(&source, &target, &plain()).unwrap(),
        "b:\n- 2\n+ 3\nc:\n+ 9\n"
    );
}

#[test]
fn present_at_source_prunes_entries_of_sections() {
    let source = tree(json!({"clients": {"a": {"name": "A"}}}));
    let target = tree(json!({"clients": {"a": {"name": "A"}, "b": {"name": "B"}}}));
    let opts = DiffOptions {
        present_at_source: true,
        ..plain()
    };

    assert_eq!(diff(&source, &target, &opts).unwrap(), "");
}

#[test]
fn identity_fields_are_ignored() {
    let source = tree(json!({"id": "one", "tenant_id": "t1", "name": "demo"}));
    let target = tree(json!({"id": "two", "tenant_id": "t2", "name": "demo"}));

    assert_eq!(diff(&source, &target, &plain()).unwrap(), "");
}

#[test]
fn equivalent_representations_are_equal() {
    let source = tree(json!({"ttl": 60.0, "created_at": "2024-01-01T02:00:00+02:00"}));
    let target = tree(json!({"ttl": 60, "created_at": "2024-01-01T00:00:00Z"}));

    assert_eq!(diff(&source, &target, &plain()).unwrap(), "");
}

#[test]
fn arrays_compare_order_insensitively() {
    let source = tree(json!({"scopes": ["openid", "email", "profile"]}));
    let target = tree(json!({"scopes": ["profile", "openid", "email"]}));

    assert_eq!(diff(&source, &target, &plain()).unwrap(), "");
}

#[test]
fn array_element_changes_are_reported() {
    let source = tree(json!({"scopes": ["openid", "email"]}));
    let target = tree(json!({"scopes": ["openid", "phone"]}));

    assert_eq!(
        diff(&source, &target, &plain()).unwrap(),
        "scopes[*]:\n- \"email\"\nscopes[*]:\n+ \"phone\"\n"
    );
}

#[rstest]
#[case::rotated(json!({"clients": {"c": {"rotated_secrets": ["x"]}}}), json!({"clients": {"c": {"rotated_secrets": ["y"]}}}))]
#[case::jwks(json!({"jwks": {"keys": [1]}}), json!({"jwks": {"keys": [2]}}))]
#[case::webhook_key(json!({"webhooks": {"w": {"api_key": "a"}}}), json!({"webhooks": {"w": {"api_key": "b"}}}))]
#[case::mfa_auth(json!({"mfa_methods": {"sms": {"auth": {"token": "a"}}}}), json!({"mfa_methods": {"sms": {"auth": {"token": "b"}}}}))]
fn secret_fields_are_redacted_by_default(#[case] source: Value, #[case] target: Value) {
    let (source, target) = (tree(source), tree(target));

    assert_eq!(diff(&source, &target, &plain()).unwrap(), "");

    let opts = DiffOptions {
        secrets: true,
        ..plain()
    };
    assert_ne!(diff(&source, &target, &opts).unwrap(), "");
}

#[test]
fn redacted_fields_are_stripped_from_reported_values() {
    let source = tree(json!({}));
    let target = tree(json!({"clients": {"c": {"name": "C", "rotated_secrets": ["s"]}}}));

    assert_eq!(
        diff(&source, &target, &plain()).unwrap(),
        "clients:\n+ {\n+   \"c\": {\n+     \"name\": \"C\"\n+   }\n+ }\n"
    );
}

#[test]
fn volatile_fields_are_skipped_on_request() {
    let source = tree(json!({"pools": {"p": {"name": "P", "updated_at": "2024-01-01T00:00:00Z"}}}));
    let target = tree(json!({"pools": {"p": {"name": "P", "updated_at": "2024-02-01T00:00:00Z"}}}));

    assert_eq!(
        diff(&source, &target, &plain()).unwrap(),
        "pools.p.updated_at:\n- \"2024-01-01T00:00:00Z\"\n+ \"2024-02-01T00:00:00Z\"\n"
    );

    let opts = DiffOptions {
        filter_volatile: true,
        ..plain()
    };
    assert_eq!(diff(&source, &target, &opts).unwrap(), "");
}

#[test]
fn filters_limit_the_compared_sections() {
    let source = tree(json!({"name": "a", "scopes_without_service": {"x": 1}}));
    let target = tree(json!({"name": "b", "scopes_without_service": {"x": 2}}));
    let opts = DiffOptions {
        filters: vec!["scopes".to_string()],
        ..plain()
    };

    assert_eq!(
        diff(&source, &target, &opts).unwrap(),
        "scopes_without_service.x:\n- 1\n+ 2\n"
    );
}

#[test]
fn custom_ignore_patterns_skip_fields() {
    let source = tree(json!({"name": "a", "description": "old"}));
    let target = tree(json!({"name": "a", "description": "new"}));
    let opts = DiffOptions {
        ignore_fields: vec![r#"^\["description"\]$"#.to_string()],
        ..plain()
    };

    assert_eq!(diff(&source, &target, &opts).unwrap(), "");
}

#[test]
fn invalid_ignore_pattern_is_an_error() {
    let opts = DiffOptions {
        ignore_fields: vec!["[unclosed".to_string()],
        ..plain()
    };

    let err = diff(&Tree::new(), &Tree::new(), &opts).unwrap_err();
    assert!(matches!(err, Error::InvalidPattern { pattern, .. } if pattern == "[unclosed"));
}

#[test]
fn multi_line_strings_render_as_line_diff() {
    let source = tree(json!({"scripts": {"s": {"body": "let a = 1;\nlet b = 2;\n"}}}));
    let target = tree(json!({"scripts": {"s": {"body": "let a = 1;\nlet b = 3;\n"}}}));

    assert_eq!(
        diff(&source, &target, &plain()).unwrap(),
        "scripts.s.body:\n  let a = 1;\n- let b = 2;\n+ let b = 3;\n"
    );
}

#[test]
fn colored_output_wraps_signed_lines() {
    let source = tree(json!({"b": 2}));
    let target = tree(json!({"b": 3}));
    let opts = DiffOptions {
        color: true,
        ..plain()
    };

    assert_eq!(
        diff(&source, &target, &opts).unwrap(),
        "b:\n\x1b[31m- 2\x1b[0m\n\x1b[32m+ 3\x1b[0m\n"
    );
}

#[test]
fn colored_output_leaves_signed_keys_plain() {
    let source = tree(json!({"-x": 1}));
    let target = tree(json!({"-x": 2, "+y": true}));
    let opts = DiffOptions {
        color: true,
        ..plain()
    };

    assert_eq!(
        diff(&source, &target, &opts).unwrap(),
        "+y:\n\x1b[32m+ true\x1b[0m\n-x:\n\x1b[31m- 1\x1b[0m\n\x1b[32m+ 2\x1b[0m\n"
    );
}

#[test]
fn colored_output_of_no_changes_is_empty() {
    let source = tree(json!({"b": 2}));
    let opts = DiffOptions {
        color: true,
        ..plain()
    };

    assert_eq!(diff(&source, &source, &opts).unwrap(), "");
}
