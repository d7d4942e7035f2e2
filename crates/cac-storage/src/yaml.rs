//! YAML encoding and strict decoding of configuration documents

use std::path::Path;

use cac_patch::Tree;
use serde_json::{Number, Value};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};

/// Decode a YAML document into a configuration value.
///
/// Blank documents decode to `null`. Mapping keys must be strings and must
/// not repeat; tags are dropped in favour of the tagged value.
pub fn decode(text: &str, path: &Path) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    let document: YamlValue =
        serde_yaml::from_str(text).map_err(|e| Error::decode(path, e.to_string()))?;
    to_json(&document).map_err(|message| Error::decode(path, message))
}

fn to_json(value: &YamlValue) -> std::result::Result<Value, String> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("unsupported number {n}"))?
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => {
            Value::Array(items.iter().map(to_json).collect::<std::result::Result<_, _>>()?)
        }
        YamlValue::Mapping(map) => {
            let mut object = Tree::new();
            for (key, item) in map {
                let key = key
                    .as_str()
                    .ok_or_else(|| format!("mapping keys must be strings, found {key:?}"))?;
                object.insert(key.to_string(), to_json(item)?);
            }
            Value::Object(object)
        }
        YamlValue::Tagged(tagged) => to_json(&tagged.value)?,
    })
}

/// Encode a configuration value as a YAML document.
pub fn encode(value: &Value, path: &Path) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| Error::encode(path, e.to_string()))
}

/// Encode a map entry as `{id, ...fields}` with `id` first.
pub fn encode_record(id: &str, fields: &Tree, path: &Path) -> Result<String> {
    let mut mapping = Mapping::new();
    mapping.insert("id".into(), id.into());

    for (key, value) in fields {
        let value = serde_yaml::to_value(value).map_err(|e| Error::encode(path, e.to_string()))?;
        mapping.insert(key.as_str().into(), value);
    }

    serde_yaml::to_string(&mapping).map_err(|e| Error::encode(path, e.to_string()))
}
