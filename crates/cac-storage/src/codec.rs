//! Projection of a configuration tree onto a directory of YAML files
//!
//! Writing splits the tree by [`Layout`]: keys owned by a section go to the
//! section's file or directory, everything else goes to the root document.
//! Reading reverses the projection, rendering each file through the
//! [`Renderer`] first so `include` and `env` directives are resolved.
//!
//! Large text fields are never stored inline. The field is replaced with an
//! include sentinel before YAML encoding and the sentinel is rewritten into an
//! `include` directive afterwards, so the encoder never escapes the text.
//! Any `{{` the encoded YAML already contains is escaped first, so only the
//! directives written here are evaluated on read.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use cac_fs::{NameRegistry, io, listing};
use cac_patch::{Tree, is_zero};
use cac_template::{Renderer, escape_actions};
use regex::{Captures, Regex};
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::layout::{Cardinality, Layout, SectionSpec};
use crate::yaml;

/// Extensions recognized as YAML documents on read; the first is used on write.
pub const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Indentation of an included large text field inside its record.
const INCLUDE_INDENT: usize = 2;

static INCLUDE_SENTINEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]?cac-include:(\d+):([0-9a-f]+):end['"]?"#)
        .expect("Invalid include sentinel regex")
});

/// Placeholder for a large text field, expanded by [`expand_includes`].
///
/// The file name is hex encoded so the sentinel is a plain YAML scalar
/// whatever the name contains.
pub fn include_sentinel(indent: usize, file: &str) -> String {
    format!("cac-include:{indent}:{}:end", hex::encode(file))
}

/// Rewrite every include sentinel in encoded YAML, together with any quotes
/// the encoder put around it, into `{{ include "<file>" | nindent <indent> }}`.
pub fn expand_includes(text: &str) -> String {
    INCLUDE_SENTINEL
        .replace_all(text, |caps: &Captures<'_>| {
            match hex::decode(&caps[2])
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
            {
                Some(file) => format!(
                    "{{{{ include \"{}\" | nindent {} }}}}",
                    file.replace('\\', "\\\\").replace('"', "\\\""),
                    &caps[1]
                ),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Reads and writes one [`Layout`] rooted at a directory.
#[derive(Debug, Clone, Copy)]
pub struct TreeCodec<'a> {
    layout: &'a Layout,
    renderer: &'a Renderer,
}

impl<'a> TreeCodec<'a> {
    pub fn new(layout: &'a Layout, renderer: &'a Renderer) -> Self {
        Self { layout, renderer }
    }

    /// Write `tree` below `dir`.
    ///
    /// Zero-valued sections and entries produce no files. Files left over
    /// from earlier writes are not removed.
    pub fn write(&self, tree: &Tree, dir: &Path) -> Result<()> {
        let root: Tree = tree
            .iter()
            .filter(|(key, _)| !self.layout.owns(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.write_document(&Value::Object(root), &yaml_path(dir, self.layout.root))?;

        for section in self.layout.sections {
            let Some(value) = tree.get(section.key) else {
                continue;
            };

            match section.cardinality {
                Cardinality::Single => {
                    self.write_document(value, &yaml_path(dir, section.file))?
                }
                Cardinality::Map => self.write_entries(section, value, &dir.join(section.file))?,
                Cardinality::Set => self.write_set(section, value, &yaml_path(dir, section.file))?,
            }
        }

        Ok(())
    }

    /// Read the tree stored below `dir`.
    ///
    /// Missing files and directories leave their keys absent.
    pub fn read(&self, dir: &Path) -> Result<Tree> {
        let mut tree = match self.read_document(dir, self.layout.root)? {
            None | Some((_, Value::Null)) => Tree::new(),
            Some((path, Value::Object(map))) => {
                if let Some(key) = map.keys().find(|key| self.layout.owns(key)) {
                    return Err(Error::decode(
                        &path,
                        format!("unknown field {key:?}, it is stored in its own file"),
                    ));
                }
                map
            }
            Some((path, _)) => return Err(Error::decode(&path, "expected a mapping")),
        };

        for section in self.layout.sections {
            let value = match section.cardinality {
                Cardinality::Single => self.read_single(section, dir)?,
                Cardinality::Map => self.read_entries(section, &dir.join(section.file))?,
                Cardinality::Set => self.read_set(section, dir)?,
            };

            if let Some(value) = value {
                tree.insert(section.key.to_string(), value);
            }
        }

        Ok(tree)
    }

    fn write_document(&self, value: &Value, path: &Path) -> Result<()> {
        if is_zero(value) {
            tracing::debug!(path = %path.display(), "skipping empty file");
            return Ok(());
        }

        let text = escape_actions(&yaml::encode(value, path)?);
        io::write_text(path, &text)?;
        Ok(())
    }

    fn write_entries(&self, section: &SectionSpec, value: &Value, dir: &Path) -> Result<()> {
        let Value::Object(entries) = value else {
            return Err(Error::encode(dir, format!("{} must be a map of entries", section.key)));
        };

        // Names are assigned before anything is written.
        let mut names = NameRegistry::new();
        let mut planned = Vec::with_capacity(entries.len());
        for (id, entry) in entries {
            if is_zero(entry) {
                continue;
            }

            let Value::Object(fields) = entry else {
                return Err(Error::encode(dir, format!("entry {id:?} must be a mapping")));
            };

            let name = names.claim(section.display_name.label(id, entry))?;
            planned.push((id, fields, name));
        }

        for (id, fields, name) in &planned {
            self.write_record(section, dir, id, fields, name)?;
        }

        tracing::debug!(section = section.key, entries = planned.len(), "wrote section entries");
        Ok(())
    }

    fn write_record(
        &self,
        section: &SectionSpec,
        dir: &Path,
        id: &str,
        fields: &Tree,
        name: &str,
    ) -> Result<()> {
        let path = yaml_path(dir, name);
        let mut fields = fields.clone();
        fields.remove("id");

        if let Some(large) = section.large_text.filter(|large| large.applies(&fields)) {
            let text = fields
                .get(large.field)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_owned);

            if let Some(text) = text {
                let file = format!("{name}.{}", large.extension);
                io::write_text(&dir.join(&file), &text)?;
                fields.insert(
                    large.field.to_string(),
                    Value::String(include_sentinel(INCLUDE_INDENT, &file)),
                );
            }
        }

        let text = expand_includes(&escape_actions(&yaml::encode_record(id, &fields, &path)?));
        io::write_text(&path, &text)?;
        Ok(())
    }

    fn write_set(&self, section: &SectionSpec, value: &Value, path: &Path) -> Result<()> {
        let Value::Object(members) = value else {
            return Err(Error::encode(path, format!("{} must be a map of ids", section.key)));
        };

        if members.is_empty() {
            return Ok(());
        }

        let bindings: Vec<&String> = members.keys().collect();
        self.write_document(&json!({ "bindings": bindings }), path)
    }

    fn read_single(&self, section: &SectionSpec, dir: &Path) -> Result<Option<Value>> {
        let Some((path, value)) = self.read_document(dir, section.file)? else {
            return Ok(None);
        };

        if is_blank(&value) {
            return Ok(None);
        }

        if let Some(field) = value.as_object().and_then(|map| section.unknown_field(map)) {
            return Err(Error::decode(&path, format!("unknown field {field:?}")));
        }

        Ok(Some(value))
    }

    fn read_entries(&self, section: &SectionSpec, dir: &Path) -> Result<Option<Value>> {
        let mut entries = Tree::new();

        for path in listing::list_dir_files(dir)? {
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or_default();

            if !YAML_EXTENSIONS.contains(&extension) {
                if section
                    .large_text
                    .is_some_and(|large| large.extension == extension)
                {
                    tracing::trace!(path = %path.display(), "skipping included file");
                } else {
                    tracing::warn!(path = %path.display(), "skipping file with unrecognized extension");
                }
                continue;
            }

            let Some(text) = self.render(&path)? else {
                continue;
            };

            let Value::Object(mut fields) = yaml::decode(&text, &path)? else {
                return Err(Error::decode(&path, "expected a mapping"));
            };

            let id = match fields.remove("id") {
                Some(Value::String(id)) if !id.is_empty() => id,
                _ => return Err(Error::decode(&path, "missing or empty id")),
            };

            if let Some(field) = section.unknown_field(&fields) {
                return Err(Error::decode(&path, format!("unknown field {field:?}")));
            }

            if entries.contains_key(&id) {
                return Err(Error::decode(&path, format!("duplicate id {id:?}")));
            }

            entries.insert(id, Value::Object(fields));
        }

        Ok((!entries.is_empty()).then_some(Value::Object(entries)))
    }

    fn read_set(&self, section: &SectionSpec, dir: &Path) -> Result<Option<Value>> {
        let Some((path, value)) = self.read_document(dir, section.file)? else {
            return Ok(None);
        };

        let map = match value {
            Value::Null => return Ok(None),
            Value::Object(map) => map,
            _ => return Err(Error::decode(&path, "expected a mapping")),
        };

        if let Some(field) = section.unknown_field(&map) {
            return Err(Error::decode(&path, format!("unknown field {field:?}")));
        }

        let items = match map.get("bindings") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(Error::decode(&path, "bindings must be a list")),
        };

        let mut members = Tree::new();
        for item in items {
            let Value::String(id) = item else {
                return Err(Error::decode(&path, "bindings must be strings"));
            };
            members.insert(id.clone(), Value::Bool(true));
        }

        Ok((!members.is_empty()).then_some(Value::Object(members)))
    }

    /// Render and decode `<dir>/<stem>.yaml` (or `.yml`), if present.
    fn read_document(&self, dir: &Path, stem: &str) -> Result<Option<(PathBuf, Value)>> {
        for extension in YAML_EXTENSIONS {
            let path = dir.join(format!("{stem}.{extension}"));
            if let Some(text) = self.render(&path)? {
                let value = yaml::decode(&text, &path)?;
                return Ok(Some((path, value)));
            }
        }

        Ok(None)
    }

    fn render(&self, path: &Path) -> Result<Option<String>> {
        match self.renderer.render_file(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(source) => Err(Error::Render {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

fn yaml_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.{}", YAML_EXTENSIONS[0]))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
