use cac_patch::{Tree, filter_patch, resolve_section_alias};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn sample() -> Tree {
    match json!({
        "name": "demo",
        "clients": {"c1": {"name": "one"}},
        "scopes_without_service": {"s1": {}},
        "ciba_authentication_service": {"enabled": true}
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[rstest]
#[case("scopes", "scopes_without_service")]
#[case("ciba", "ciba_authentication_service")]
#[case("clients", "clients")]
#[case("unknown", "unknown")]
fn aliases(#[case] name: &str, #[case] expected: &str) {
    assert_eq!(resolve_section_alias(name), expected);
}

#[rstest]
#[case(&["clients"], json!({"clients": {"c1": {"name": "one"}}}))]
#[case(&["ciba"], json!({"ciba_authentication_service": {"enabled": true}}))]
#[case(&["nothing"], json!({}))]
fn filters_by_section(#[case] names: &[&str], #[case] expected: Value) {
    assert_eq!(Value::Object(filter_patch(&sample(), names)), expected);
}

#[test]
fn filter_by_alias_and_canonical_name_agree() {
    assert_eq!(
        filter_patch(&sample(), &["scopes"]),
        filter_patch(&sample(), &["scopes_without_service"])
    );
}
