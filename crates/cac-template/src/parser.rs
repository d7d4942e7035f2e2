//! Lexer and parser for `{{ ... }}` actions

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Action {
        position: usize,
        pipeline: Vec<Command>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Ident(String),
    Str(String),
    Int(i64),
}

/// One stage of a pipeline: a function name followed by its arguments, or a
/// single literal.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Command {
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Operand(Operand),
    Pipe,
}

/// Split a template into literal text and actions.
pub(crate) fn parse(source: &str) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    let mut trim_next = false;

    while let Some(offset) = source[cursor..].find("{{") {
        let open = cursor + offset;
        let mut text = &source[cursor..open];
        if trim_next {
            text = text.trim_start();
        }

        let mut body_start = open + 2;
        if has_trim_marker(&source[body_start..]) {
            text = text.trim_end();
            body_start += 1;
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        let close = find_close(source, body_start)?;
        let mut body_end = close;
        trim_next = false;

        let body = &source[body_start..close];
        if body.ends_with('-')
            && body[..body.len() - 1]
                .chars()
                .last()
                .is_some_and(char::is_whitespace)
        {
            body_end -= 1;
            trim_next = true;
        }

        let pipeline = parse_pipeline(&source[body_start..body_end], body_start)?;
        segments.push(Segment::Action {
            position: open,
            pipeline,
        });

        cursor = close + 2;
    }

    let mut tail = &source[cursor..];
    if trim_next {
        tail = tail.trim_start();
    }
    if !tail.is_empty() {
        segments.push(Segment::Text(tail));
    }

    Ok(segments)
}

fn has_trim_marker(body: &str) -> bool {
    let mut chars = body.chars();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

/// Find the `}}` closing an action, skipping over string literals.
fn find_close(source: &str, from: usize) -> Result<usize> {
    let bytes = source.as_bytes();
    let mut i = from;
    let mut quote: Option<u8> = None;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(b'"') if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'`' => quote = Some(b),
            None if b == b'}' && bytes.get(i + 1) == Some(&b'}') => return Ok(i),
            None => {}
        }
        i += 1;
    }

    Err(Error::syntax(from, "unclosed action"))
}

fn parse_pipeline(body: &str, offset: usize) -> Result<Vec<Command>> {
    let tokens = tokenize(body, offset)?;
    if tokens.is_empty() {
        return Err(Error::syntax(offset, "empty action"));
    }

    let mut pipeline = Vec::new();
    let mut current = Vec::new();

    for token in tokens {
        match token {
            Token::Pipe => {
                if current.is_empty() {
                    return Err(Error::syntax(offset, "missing command before '|'"));
                }
                pipeline.push(Command {
                    operands: std::mem::take(&mut current),
                });
            }
            Token::Operand(operand) => current.push(operand),
        }
    }

    if current.is_empty() {
        return Err(Error::syntax(offset, "missing command after '|'"));
    }
    pipeline.push(Command { operands: current });

    Ok(pipeline)
}

fn tokenize(body: &str, offset: usize) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = body.char_indices().peekable();

    while let Some(&(idx, c)) = chars.peek() {
        let position = offset + idx;

        if c.is_whitespace() {
            chars.next();
        } else if c == '|' {
            chars.next();
            tokens.push(Token::Pipe);
        } else if c == '"' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some((_, 'n')) => value.push('\n'),
                        Some((_, 't')) => value.push('\t'),
                        Some((_, '\\')) => value.push('\\'),
                        Some((_, '"')) => value.push('"'),
                        Some((_, other)) => {
                            return Err(Error::syntax(
                                position,
                                format!("unknown escape sequence \\{other}"),
                            ));
                        }
                        None => break,
                    },
                    other => value.push(other),
                }
            }
            if !closed {
                return Err(Error::syntax(position, "unterminated string"));
            }
            tokens.push(Token::Operand(Operand::Str(value)));
        } else if c == '`' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            for (_, c) in chars.by_ref() {
                if c == '`' {
                    closed = true;
                    break;
                }
                value.push(c);
            }
            if !closed {
                return Err(Error::syntax(position, "unterminated raw string"));
            }
            tokens.push(Token::Operand(Operand::Str(value)));
        } else if c.is_ascii_digit() || c == '-' {
            let mut literal = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_digit() || (literal.is_empty() && c == '-') {
                    literal.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let value = literal
                .parse::<i64>()
                .map_err(|_| Error::syntax(position, format!("invalid number {literal:?}")))?;
            tokens.push(Token::Operand(Operand::Int(value)));
        } else if c.is_alphabetic() || c == '_' {
            let mut ident = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_alphanumeric() || c == '_' {
                    ident.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Operand(Operand::Ident(ident)));
        } else {
            return Err(Error::syntax(position, format!("unexpected character {c:?}")));
        }
    }

    Ok(tokens)
}
