//! Tree and renderer constructors for tests.

use std::collections::HashMap;
use std::path::Path;

use cac_patch::Tree;
use cac_template::Renderer;
use serde_json::Value;

/// Unwrap a `json!` object literal into a [`Tree`].
///
/// # Panics
/// Panics if `value` is not an object.
pub fn tree(value: Value) -> Tree {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A renderer with a fixed environment, resolving absolute includes against
/// `working_dir`.
pub fn renderer(working_dir: &Path, env: &[(&str, &str)]) -> Renderer {
    let env: HashMap<String, String> = env
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    Renderer::new(env, working_dir)
}
