//! Rule text to `RuleForm`.
//!
//! Text holding a `[` outside string literals is a guarded form (see
//! `clauses`); anything else is a single expression parsed by precedence
//! climbing (see `expressions`). The parser carries no state between calls.

use crate::ast::{Expression, RuleForm, Value};
use crate::error::FormatError;
use crate::lexer::{lex, Spanned, Token};
use crate::options::ParseOptions;

mod clauses;
mod expressions;

pub(crate) use clauses::is_bare_result;

/// Read literal text the way a clause result is read: quoted text is a
/// string, `true`/`false` a boolean, a signed number a number, anything
/// else a bare string.
pub fn parse_value(text: &str) -> Value {
    clauses::result_literal(text.trim())
}

/// Parse rule text with the default (lenient) options.
pub fn parse(text: &str) -> Result<RuleForm, FormatError> {
    parse_with(text, &ParseOptions::default())
}

/// Parse rule text.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<RuleForm, FormatError> {
    if clauses::is_guarded(text) {
        clauses::parse_guarded(text, options)
    } else {
        parse_expression(text, 0, options).map(RuleForm::Simple)
    }
}

/// Parse a standalone expression located at character offset `base` of the
/// rule text.
pub(crate) fn parse_expression(
    src: &str,
    base: usize,
    options: &ParseOptions,
) -> Result<Expression, FormatError> {
    let tokens = lex(src, base, options)?;
    let mut parser = Parser::new(&tokens);
    parser.parse_complete()
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

/// Deepest nesting of parentheses, unary operators and `^` chains a rule
/// may use. Deeper text is a `FormatError` rather than a stack overflow.
pub const MAX_NESTING: usize = 256;

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with `Token::Eof`, as produced by `lex`.
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, FormatError>,
    ) -> Result<T, FormatError> {
        if self.depth >= MAX_NESTING {
            return Err(self.err(format!(
                "rule nests too deeply (more than {} levels)",
                MAX_NESTING
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn cur_pos(&self) -> usize {
        self.cur().pos
    }

    fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, msg: impl Into<String>) -> FormatError {
        FormatError::new(self.cur_pos(), msg)
    }

    fn expect_rparen(&mut self, open_pos: usize) -> Result<(), FormatError> {
        match self.peek() {
            Token::RParen => {
                self.advance();
                Ok(())
            }
            Token::Eof => Err(FormatError::new(
                open_pos,
                "unbalanced parentheses: '(' is never closed",
            )),
            other => Err(self.err(format!("expected ')', got {}", other))),
        }
    }

    /// Parse one expression and require that it consumes every token.
    fn parse_complete(&mut self) -> Result<Expression, FormatError> {
        if self.peek() == &Token::Eof {
            return Err(self.err("empty expression"));
        }
        let expr = self.parse_expr()?;
        match self.peek() {
            Token::Eof => Ok(expr),
            Token::RParen => Err(self.err("unbalanced parentheses: unexpected ')'")),
            other => Err(self.err(format!("unexpected {} after end of expression", other))),
        }
    }
}
