//! Guarded rule text: `cond[result],cond[result]` and the pipe-separated
//! multi-return dialect `cond | cond[result] | cond[result]`.
//!
//! The text is cut into `condition[result` pieces at every `]`, each piece
//! after the first opening with its separator. In the multi-return dialect a
//! condition may hold several `|`-joined alternatives sharing one result;
//! they are expanded into one clause each, so the evaluator only ever sees a
//! flat clause list.

use tracing::debug;

use super::parse_expression;
use crate::ast::{Clause, RuleForm, Value};
use crate::error::FormatError;
use crate::lexer::parse_number;
use crate::options::ParseOptions;

/// True when `text` holds a `[` outside string literals.
pub(super) fn is_guarded(text: &str) -> bool {
    let mut in_string = false;
    for c in text.chars() {
        match c {
            '"' => in_string = !in_string,
            '[' if !in_string => return true,
            _ => {}
        }
    }
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Comma,
    Pipe,
}

/// Character ranges (into the full rule text) of one clause piece.
#[derive(Debug)]
struct Piece {
    separator: Option<Separator>,
    condition: (usize, usize),
    result: (usize, usize),
}

pub(super) fn parse_guarded(text: &str, options: &ParseOptions) -> Result<RuleForm, FormatError> {
    let chars: Vec<char> = text.chars().collect();
    let pieces = split_pieces(&chars)?;

    let multi_return = pieces.iter().any(|p| {
        p.separator == Some(Separator::Pipe) || split_alternatives(&chars, p.condition).len() > 1
    });

    let mut clauses = Vec::new();
    for piece in &pieces {
        let result = parse_result(&chars, piece.result)?;
        let conditions = if multi_return {
            split_alternatives(&chars, piece.condition)
        } else {
            vec![piece.condition]
        };
        for (start, end) in conditions {
            let src: String = chars[start..end].iter().collect();
            if src.trim().is_empty() {
                return Err(FormatError::new(start, "missing clause condition"));
            }
            let condition = parse_expression(&src, start, options)?;
            clauses.push(Clause {
                condition,
                result: result.clone(),
            });
        }
    }

    if clauses.is_empty() {
        return Err(FormatError::new(0, "guarded rule has no clauses"));
    }

    debug!(clauses = clauses.len(), multi_return, "parsed guarded rule");
    if multi_return {
        Ok(RuleForm::MultiReturn(clauses))
    } else {
        Ok(RuleForm::Guarded(clauses))
    }
}

fn split_pieces(chars: &[char]) -> Result<Vec<Piece>, FormatError> {
    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut in_string = false;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '"' => in_string = !in_string,
            ']' if !in_string => {
                let piece = split_piece(chars, start, i, pieces.is_empty())?;
                pieces.push(piece);
                start = i + 1;
            }
            _ => {}
        }
    }

    let rest = &chars[start..];
    if let Some(offset) = rest.iter().position(|c| !c.is_whitespace()) {
        let at = start + offset;
        if rest.contains(&'[') {
            return Err(FormatError::new(at, "clause result is missing its closing ']'"));
        }
        return Err(FormatError::new(at, "unexpected text after the last clause"));
    }
    if pieces.is_empty() {
        return Err(FormatError::new(0, "guarded rule has no clauses"));
    }
    Ok(pieces)
}

/// `start..end` spans the text between the previous `]` and this one.
fn split_piece(chars: &[char], start: usize, end: usize, first: bool) -> Result<Piece, FormatError> {
    let mut pos = start;
    while pos < end && chars[pos].is_whitespace() {
        pos += 1;
    }

    let separator = if first {
        None
    } else {
        match (chars.get(pos), chars.get(pos + 1)) {
            (Some(','), _) => {
                pos += 1;
                Some(Separator::Comma)
            }
            (Some('|'), next) if next != Some(&'|') => {
                pos += 1;
                Some(Separator::Pipe)
            }
            _ => {
                return Err(FormatError::new(pos, "expected ',' or '|' between clauses"));
            }
        }
    };

    let mut open = None;
    let mut in_string = false;
    for (i, &c) in chars.iter().enumerate().take(end).skip(pos) {
        match c {
            '"' => in_string = !in_string,
            '[' if !in_string => {
                if open.is_some() {
                    return Err(FormatError::new(i, "unexpected '[' inside clause"));
                }
                open = Some(i);
            }
            _ => {}
        }
    }
    let open = open.ok_or_else(|| FormatError::new(end, "unexpected ']' without matching '['"))?;

    Ok(Piece {
        separator,
        condition: (pos, open),
        result: (open + 1, end),
    })
}

/// Split a condition at every single `|` outside parentheses and strings.
/// `||` never splits.
fn split_alternatives(chars: &[char], (start, end): (usize, usize)) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut from = start;
    let mut i = start;

    while i < end {
        match chars[i] {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            '|' if !in_string => {
                if i + 1 < end && chars[i + 1] == '|' {
                    i += 2;
                    continue;
                }
                if depth == 0 {
                    ranges.push((from, i));
                    from = i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    ranges.push((from, end));
    ranges
}

fn parse_result(chars: &[char], (start, end): (usize, usize)) -> Result<Value, FormatError> {
    let raw: String = chars[start..end].iter().collect();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FormatError::new(start, "empty clause result"));
    }
    Ok(result_literal(trimmed))
}

/// Interpret the (trimmed) text between `[` and `]`.
pub(super) fn result_literal(text: &str) -> Value {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return Value::Str(text[1..text.len() - 1].to_owned());
    }
    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Some(n) = parse_number(text) {
        return Value::Number(n);
    }
    Value::Str(text.to_owned())
}

/// True when `s` can be written between brackets without quotes and still
/// read back as the same string.
pub(crate) fn is_bare_result(s: &str) -> bool {
    !s.is_empty()
        && s.trim() == s
        && !s.contains(&['[', ']', '"'][..])
        && result_literal(s) == Value::Str(s.to_owned())
}
