//! Template rendering

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::env::Environment;
use crate::functions::{self, Value};
use crate::parser::{self, Command, Operand, Segment};
use crate::{Error, Result};

/// Escape every `{{` in `text` so rendering reproduces it unchanged.
pub fn escape_actions(text: &str) -> String {
    text.replace("{{", r#"{{ "{{" }}"#)
}

/// Renders configuration files containing `{{ ... }}` actions.
///
/// `include` paths starting with `/` resolve against `working_dir`; other
/// paths resolve against the directory of the file being rendered.
#[derive(Clone)]
pub struct Renderer {
    env: Arc<dyn Environment>,
    working_dir: PathBuf,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("working_dir", &self.working_dir)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    pub fn new(env: impl Environment + 'static, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            env: Arc::new(env),
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Read and render the file at `path`.
    pub fn render_file(&self, path: &Path) -> Result<String> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "rendering template");
        self.render_str(&source, path)
    }

    /// Render `source` as if it had been read from `origin`.
    pub fn render_str(&self, source: &str, origin: &Path) -> Result<String> {
        if !source.contains("{{") {
            return Ok(source.to_string());
        }

        let mut out = String::with_capacity(source.len());
        for segment in parser::parse(source)? {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Action { pipeline, .. } => {
                    let value = self.eval_pipeline(&pipeline, origin)?;
                    out.push_str(&value.to_string());
                }
            }
        }

        Ok(out)
    }

    fn eval_pipeline(&self, pipeline: &[Command], origin: &Path) -> Result<Value> {
        let mut piped: Option<Value> = None;

        for command in pipeline {
            piped = Some(self.eval_command(command, piped.take(), origin)?);
        }

        piped.ok_or_else(|| Error::syntax(0, "empty pipeline"))
    }

    fn eval_command(&self, command: &Command, piped: Option<Value>, origin: &Path) -> Result<Value> {
        let (head, rest) = command
            .operands
            .split_first()
            .ok_or_else(|| Error::syntax(0, "empty command"))?;

        let name = match head {
            Operand::Ident(name) => name,
            literal => {
                if !rest.is_empty() || piped.is_some() {
                    return Err(Error::syntax(0, "a literal cannot take arguments"));
                }
                return Ok(literal_value(literal));
            }
        };

        let mut args = Vec::with_capacity(rest.len() + 1);
        for operand in rest {
            match operand {
                Operand::Ident(ident) => {
                    return Err(Error::arguments(
                        name,
                        format!("unexpected identifier {ident:?}"),
                    ));
                }
                literal => args.push(literal_value(literal)),
            }
        }
        args.extend(piped);

        functions::call(self, origin, name, args)
    }

    pub(crate) fn resolve_include(&self, target: &str, origin: &Path) -> PathBuf {
        match target.strip_prefix('/') {
            Some(from_working_dir) => self.working_dir.join(from_working_dir),
            None => origin
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(target),
        }
    }

    pub(crate) fn lookup_env(&self, name: &str) -> Option<String> {
        self.env.get(name)
    }
}

fn literal_value(operand: &Operand) -> Value {
    match operand {
        Operand::Str(s) => Value::Str(s.clone()),
        Operand::Int(i) => Value::Int(*i),
        Operand::Ident(s) => Value::Str(s.clone()),
    }
}
