//! Built-in template functions

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use data_encoding::{Encoding, Specification};

use crate::renderer::Renderer;
use crate::{Error, Result};

const ZBASE32_ALPHABET: &str = "ybndrfg8ejkmcpqxot1uwisza345h769";

static ZBASE32: LazyLock<Encoding> = LazyLock::new(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str(ZBASE32_ALPHABET);
    spec.encoding().expect("Invalid z-base-32 alphabet")
});

/// A value flowing through a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Str(String),
    Int(i64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
        }
    }
}

/// Invoke the function `name` with already-evaluated arguments.
///
/// For piped stages the previous value is the last argument.
pub(crate) fn call(
    renderer: &Renderer,
    origin: &Path,
    name: &str,
    args: Vec<Value>,
) -> Result<Value> {
    match name {
        "include" => {
            let [Value::Str(target)] = args.as_slice() else {
                return Err(Error::arguments(name, "expected a single path string"));
            };
            let path = renderer.resolve_include(target, origin);
            let text = std::fs::read_to_string(&path)
                .map_err(|source| Error::Include { path: path.clone(), source })?;
            tracing::trace!(path = %path.display(), "included file");
            Ok(Value::Str(text))
        }
        "env" => {
            let [Value::Str(var)] = args.as_slice() else {
                return Err(Error::arguments(name, "expected a single variable name"));
            };
            match renderer.lookup_env(var) {
                Some(value) if !value.is_empty() => Ok(Value::Str(value)),
                _ => Err(Error::EnvNotFound { name: var.clone() }),
            }
        }
        "nindent" => {
            let (spaces, text) = indent_args(name, &args)?;
            Ok(Value::Str(block_scalar(spaces, &text)))
        }
        "indent" => {
            let (spaces, text) = indent_args(name, &args)?;
            let pad = " ".repeat(spaces);
            Ok(Value::Str(format!(
                "{pad}{}",
                text.replace('\n', &format!("\n{pad}"))
            )))
        }
        "zbase32" => {
            let [value] = args.as_slice() else {
                return Err(Error::arguments(name, "expected a single value"));
            };
            Ok(Value::Str(zbase32(&value.to_string())))
        }
        "apiID" => {
            let [service, method, path] = args.as_slice() else {
                return Err(Error::arguments(
                    name,
                    "expected a service id, a method and a path",
                ));
            };
            Ok(Value::Str(api_id(
                &service.to_string(),
                &method.to_string(),
                &path.to_string(),
            )))
        }
        "quote" => {
            let [value] = args.as_slice() else {
                return Err(Error::arguments(name, "expected a single value"));
            };
            Ok(Value::Str(format!("{:?}", value.to_string())))
        }
        _ => Err(Error::UnknownFunction {
            name: name.to_string(),
        }),
    }
}

fn indent_args(name: &str, args: &[Value]) -> Result<(usize, String)> {
    match args {
        [Value::Int(spaces), text] if *spaces >= 0 => Ok((*spaces as usize, text.to_string())),
        _ => Err(Error::arguments(
            name,
            "expected a non-negative indent followed by a value",
        )),
    }
}

/// z-base-32 encoding of `input`, without padding.
pub fn zbase32(input: &str) -> String {
    ZBASE32.encode(input.as_bytes())
}

/// Identifier the service assigns to the API `method path` of `service`.
pub fn api_id(service: &str, method: &str, path: &str) -> String {
    zbase32(&format!("{service}_{method}_{path}"))
}

/// Render `text` as a YAML scalar placed after a mapping key, indented by
/// `spaces` when it spans several lines.
///
/// A literal block scalar is used where it reproduces the text exactly. The
/// header carries an explicit indentation indicator so text starting with
/// spaces survives, and a chomping indicator matching the number of
/// trailing newlines: none -> `-`, one -> clip, more -> `+`.
///
/// Text a block scalar would alter (carriage returns, other control or
/// line-separator characters, or nothing but line breaks) becomes a
/// double-quoted scalar instead.
pub fn block_scalar(spaces: usize, text: &str) -> String {
    if !fits_block(text) {
        return double_quoted(text);
    }

    let (body, chomp) = match text.strip_suffix('\n') {
        Some(rest) if rest.ends_with('\n') => (rest, "+"),
        Some(rest) => (rest, ""),
        None => (text, "-"),
    };

    let indicator = if (1..=9).contains(&spaces) {
        spaces.to_string()
    } else {
        String::new()
    };

    let pad = " ".repeat(spaces);
    format!(
        "|{indicator}{chomp}\n{pad}{}",
        body.replace('\n', &format!("\n{pad}"))
    )
}

fn fits_block(text: &str) -> bool {
    !text.trim_matches('\n').is_empty() && !text.chars().any(needs_escape)
}

fn needs_escape(c: char) -> bool {
    (c.is_control() && c != '\n' && c != '\t') || matches!(c, '\u{feff}' | '\u{2028}' | '\u{2029}')
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_escape(c) => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_scalar_strips_when_no_trailing_newline() {
        assert_eq!(block_scalar(2, "a\nb"), "|2-\n  a\n  b");
    }

    #[test]
    fn block_scalar_clips_single_trailing_newline() {
        assert_eq!(block_scalar(2, "a\nb\n"), "|2\n  a\n  b");
    }

    #[test]
    fn block_scalar_keeps_multiple_trailing_newlines() {
        assert_eq!(block_scalar(2, "a\n\n"), "|2+\n  a\n  ");
    }

    #[test]
    fn block_scalar_omits_indicator_outside_single_digit_range() {
        assert_eq!(block_scalar(0, "x"), "|-\nx");
    }

    #[test]
    fn carriage_returns_fall_back_to_double_quotes() {
        assert_eq!(block_scalar(2, "a\r\nb\r\n"), r#""a\r\nb\r\n""#);
    }

    #[test]
    fn line_breaks_only_fall_back_to_double_quotes() {
        assert_eq!(block_scalar(2, "\n\n"), r#""\n\n""#);
    }

    #[test]
    fn double_quotes_escape_quotes_backslashes_and_controls() {
        assert_eq!(
            block_scalar(2, "say \"hi\"\\\u{0}\r"),
            r#""say \"hi\"\\\u0000\r""#
        );
    }

    #[test]
    fn zbase32_encodes_without_padding() {
        assert_eq!(zbase32("hello"), "pb1sa5dx");
        assert_eq!(zbase32(""), "");
        assert_eq!(zbase32("\u{0}"), "yy");
    }

    #[test]
    fn api_id_encodes_service_method_and_path() {
        assert_eq!(api_id("demo", "GET", "/users"), "ct1s4549e7niez3xqi3skhuu");
    }
}
