use super::Parser;
use crate::ast::{BinaryOp, Expression, UnaryOp, Value};
use crate::error::FormatError;
use crate::lexer::Token;

fn binary_operator(token: &Token) -> Option<BinaryOp> {
    let op = match token {
        Token::Or => BinaryOp::Or,
        Token::And => BinaryOp::And,
        Token::Eq => BinaryOp::Eq,
        Token::Neq => BinaryOp::Ne,
        Token::Lt => BinaryOp::Lt,
        Token::Lte => BinaryOp::Le,
        Token::Gt => BinaryOp::Gt,
        Token::Gte => BinaryOp::Ge,
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::Caret => BinaryOp::Pow,
        _ => return None,
    };
    Some(op)
}

impl<'a> Parser<'a> {
    // -- Expression parsing --------------------------------------

    pub(super) fn parse_expr(&mut self) -> Result<Expression, FormatError> {
        self.parse_binary(1)
    }

    /// Precedence climbing: fold every operator binding at least as tightly
    /// as `min_prec` into `left`.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expression, FormatError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = binary_operator(self.peek()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let next_min = if op.is_right_associative() {
                prec
            } else {
                prec + 1
            };
            let right = self.nested(|p| p.parse_binary(next_min))?;
            left = Expression::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, FormatError> {
        let op = match self.peek() {
            Token::Not => UnaryOp::Not,
            Token::Minus => UnaryOp::Negate,
            _ => return self.parse_atom(),
        };
        self.advance();
        let operand = self.nested(Self::parse_unary)?;
        Ok(Expression::unary(op, operand))
    }

    fn parse_atom(&mut self) -> Result<Expression, FormatError> {
        let open_pos = self.cur_pos();
        match self.peek().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Expression::Literal(Value::Number(n)))
            }
            Token::Bool(b) => {
                self.advance();
                Ok(Expression::Literal(Value::Bool(b)))
            }
            Token::Str(s) => {
                self.advance();
                Ok(Expression::Literal(Value::Str(s)))
            }
            Token::TagRef(id) => {
                self.advance();
                Ok(Expression::TagRef(id))
            }
            Token::Invalid => {
                self.advance();
                Ok(Expression::InvalidMarker)
            }
            Token::LParen => self.nested(|p| {
                p.advance();
                if p.peek() == &Token::RParen {
                    return Err(p.err("empty parentheses"));
                }
                let inner = p.parse_expr()?;
                p.expect_rparen(open_pos)?;
                Ok(inner)
            }),
            Token::RParen => Err(self.err("unbalanced parentheses: unexpected ')'")),
            Token::Eof => Err(self.err("missing operand: unexpected end of rule")),
            other => Err(self.err(format!("missing operand before {}", other))),
        }
    }
}
