use std::fmt;

use tracing::debug;

use crate::ast::TagId;
use crate::error::FormatError;
use crate::options::ParseOptions;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Bool(bool),
    /// Double-quoted string literal (content without quotes)
    Str(String),
    /// `#<id>`
    TagRef(TagId),
    /// `$INVALID`
    Invalid,
    // Punctuation
    LParen,
    RParen,
    // Arithmetic operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    // Comparison operators
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    // Logical operators (`&`/`&&`, `|`/`||`)
    Not,
    And,
    Or,
    // End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Bool(b) => write!(f, "'{}'", b),
            Token::Str(s) => write!(f, "string \"{}\"", s),
            Token::TagRef(id) => write!(f, "tag #{}", id),
            Token::Invalid => f.write_str("'$INVALID'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Caret => f.write_str("'^'"),
            Token::Eq => f.write_str("'='"),
            Token::Neq => f.write_str("'!='"),
            Token::Lt => f.write_str("'<'"),
            Token::Lte => f.write_str("'<='"),
            Token::Gt => f.write_str("'>'"),
            Token::Gte => f.write_str("'>='"),
            Token::Not => f.write_str("'!'"),
            Token::And => f.write_str("'&'"),
            Token::Or => f.write_str("'|'"),
            Token::Eof => f.write_str("end of rule"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    /// Character offset in the full rule text.
    pub pos: usize,
}

/// Tokenize `src`. `base` is the character offset of `src` within the full
/// rule text so that positions in errors refer to what the author wrote.
pub fn lex(src: &str, base: usize, options: &ParseOptions) -> Result<Vec<Spanned>, FormatError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;

    while pos < chars.len() {
        let c = chars[pos];
        let at = base + pos;

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        // String literal
        if c == '"' {
            pos += 1;
            let mut s = String::new();
            loop {
                if pos >= chars.len() {
                    return Err(FormatError::new(
                        at,
                        format!("unterminated string \"{}", s),
                    ));
                }
                if chars[pos] == '"' {
                    pos += 1;
                    break;
                }
                s.push(chars[pos]);
                pos += 1;
            }
            tokens.push(Spanned {
                token: Token::Str(s),
                pos: at,
            });
            continue;
        }

        // Number
        if c.is_ascii_digit() || c == '.' {
            let end = scan_number(&chars, pos);
            let text: String = chars[pos..end].iter().collect();
            let n: f64 = text
                .parse()
                .map_err(|_| FormatError::new(at, format!("malformed number '{}'", text)))?;
            if !n.is_finite() {
                return Err(FormatError::new(at, format!("number '{}' is out of range", text)));
            }
            tokens.push(Spanned {
                token: Token::Number(n),
                pos: at,
            });
            pos = end;
            continue;
        }

        // Tag reference
        if c == '#' {
            pos += 1;
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            if start == pos {
                return Err(FormatError::new(at, "expected tag id after '#'"));
            }
            let digits: String = chars[start..pos].iter().collect();
            let id: TagId = digits
                .parse()
                .map_err(|_| FormatError::new(at, format!("tag id #{} is out of range", digits)))?;
            if id == 0 {
                return Err(FormatError::new(at, "tag id must be positive"));
            }
            tokens.push(Spanned {
                token: Token::TagRef(id),
                pos: at,
            });
            continue;
        }

        // $INVALID keyword
        if c == '$' {
            let start = pos;
            pos += 1;
            while pos < chars.len() && chars[pos].is_ascii_alphabetic() {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            if word.eq_ignore_ascii_case("$INVALID") {
                tokens.push(Spanned {
                    token: Token::Invalid,
                    pos: at,
                });
            } else {
                skip_unrecognized(&word, at, options)?;
            }
            continue;
        }

        // Identifier: only true/false carry meaning
        if c.is_ascii_alphabetic() {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            if word.eq_ignore_ascii_case("true") {
                tokens.push(Spanned {
                    token: Token::Bool(true),
                    pos: at,
                });
            } else if word.eq_ignore_ascii_case("false") {
                tokens.push(Spanned {
                    token: Token::Bool(false),
                    pos: at,
                });
            } else {
                skip_unrecognized(&word, at, options)?;
            }
            continue;
        }

        // Operators, two-character forms first
        let next = chars.get(pos + 1).copied();
        let (token, width) = match (c, next) {
            ('<', Some('=')) => (Token::Lte, 2),
            ('>', Some('=')) => (Token::Gte, 2),
            ('!', Some('=')) => (Token::Neq, 2),
            ('&', Some('&')) => (Token::And, 2),
            ('|', Some('|')) => (Token::Or, 2),
            ('<', _) => (Token::Lt, 1),
            ('>', _) => (Token::Gt, 1),
            ('!', _) => (Token::Not, 1),
            ('&', _) => (Token::And, 1),
            ('|', _) => (Token::Or, 1),
            ('=', _) => (Token::Eq, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('^', _) => (Token::Caret, 1),
            _ => {
                skip_unrecognized(&c.to_string(), at, options)?;
                pos += 1;
                continue;
            }
        };
        tokens.push(Spanned { token, pos: at });
        pos += width;
    }

    tokens.push(Spanned {
        token: Token::Eof,
        pos: base + chars.len(),
    });
    Ok(tokens)
}

fn skip_unrecognized(text: &str, at: usize, options: &ParseOptions) -> Result<(), FormatError> {
    if options.strict_lexing {
        return Err(FormatError::new(
            at,
            format!("unknown symbol '{}' in rule expression", text),
        ));
    }
    debug!(position = at, symbol = %text, "skipping unrecognised symbol in rule text");
    Ok(())
}

/// Returns the end offset of the number starting at `start`:
/// `digits [. digits] [e [+-] digits]`, or a leading `.`. The exponent is
/// only consumed when at least one digit follows it.
pub(crate) fn scan_number(chars: &[char], start: usize) -> usize {
    let mut pos = start;
    while pos < chars.len() && chars[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < chars.len() && chars[pos] == '.' {
        pos += 1;
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
        let mut exp = pos + 1;
        if exp < chars.len() && (chars[exp] == '+' || chars[exp] == '-') {
            exp += 1;
        }
        if exp < chars.len() && chars[exp].is_ascii_digit() {
            pos = exp;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }
    pos
}

/// Parses an optionally signed number that must span all of `text`.
/// Values that overflow `f64` are not numbers.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let start = match chars.first() {
        Some('-') | Some('+') => 1,
        Some(_) => 0,
        None => return None,
    };
    match chars.get(start) {
        Some(c) if c.is_ascii_digit() || *c == '.' => {}
        _ => return None,
    }
    if scan_number(&chars, start) != chars.len() {
        return None;
    }
    text.parse().ok().filter(|n: &f64| n.is_finite())
}
