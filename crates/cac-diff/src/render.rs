//! Text rendering of changes

use colored::Colorize;
use serde_json::Value;
use similar::{ChangeTag, TextDiff};

use crate::compare::Change;

/// Render `changes` as text: a `path:` header per change followed by `-`
/// lines for the source side and `+` lines for the target side.
///
/// Modified multi-line strings are shown as a line diff. No changes render
/// as an empty string.
pub fn render(changes: &[Change]) -> String {
    render_with(changes, false)
}

/// Like [`render`], with `-` lines in red and `+` lines in green.
///
/// Colors are emitted even when stdout is not a terminal, since the caller
/// asked for them explicitly. Headers and context lines stay plain.
pub fn render_colored(changes: &[Change]) -> String {
    colored::control::set_override(true);
    render_with(changes, true)
}

fn render_with(changes: &[Change], color: bool) -> String {
    let mut out = Output {
        text: String::new(),
        color,
    };

    for change in changes {
        out.text.push_str(&format!("{}:\n", change.path()));

        match change {
            Change::Added { value, .. } => out.value(Sign::Added, value),
            Change::Removed { value, .. } => out.value(Sign::Removed, value),
            Change::Modified {
                old: Value::String(old),
                new: Value::String(new),
                ..
            } if old.contains('\n') || new.contains('\n') => out.text_diff(old, new),
            Change::Modified { old, new, .. } => {
                out.value(Sign::Removed, old);
                out.value(Sign::Added, new);
            }
        }
    }

    out.text
}

#[derive(Debug, Clone, Copy)]
enum Sign {
    Removed,
    Added,
    Context,
}

struct Output {
    text: String,
    color: bool,
}

impl Output {
    fn value(&mut self, sign: Sign, value: &Value) {
        let text = match value {
            Value::String(s) if s.contains('\n') => s.clone(),
            other => format!("{other:#}"),
        };

        for line in text.lines() {
            self.line(sign, line);
        }
    }

    fn text_diff(&mut self, old: &str, new: &str) {
        for change in TextDiff::from_lines(old, new).iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => Sign::Removed,
                ChangeTag::Insert => Sign::Added,
                ChangeTag::Equal => Sign::Context,
            };
            self.line(sign, change.value().trim_end_matches('\n'));
        }
    }

    fn line(&mut self, sign: Sign, line: &str) {
        let plain = match sign {
            Sign::Removed => format!("- {line}"),
            Sign::Added => format!("+ {line}"),
            Sign::Context => format!("  {line}"),
        };

        let painted = match (self.color, sign) {
            (true, Sign::Removed) => plain.red().to_string(),
            (true, Sign::Added) => plain.green().to_string(),
            _ => plain,
        };

        self.text.push_str(&painted);
        self.text.push('\n');
    }
}
