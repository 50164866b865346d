//! Pratt parser for the expression sub-language.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{CauseResult, EvalCause};
use crate::token::{tokenize, Token};

const TERNARY_BP: u8 = 1;
const UNARY_BP: u8 = 15;
const POSTFIX_BP: u8 = 19;

/// Parse an expression string into an AST.
pub fn parse(input: &str) -> CauseResult<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalCause::Syntax("empty expression".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(0)?;
    if parser.pos < parser.tokens.len() {
        return Err(EvalCause::Syntax(format!(
            "unexpected trailing token {:?}",
            parser.tokens[parser.pos]
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token, context: &str) -> CauseResult<()> {
        match self.next() {
            Some(ref token) if token == expected => Ok(()),
            Some(token) => Err(EvalCause::Syntax(format!(
                "expected {expected:?} {context}, found {token:?}"
            ))),
            None => Err(EvalCause::Syntax(format!(
                "expected {expected:?} {context}, found end of expression"
            ))),
        }
    }

    fn parse_expr(&mut self, min_bp: u8) -> CauseResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some(token) = self.peek().cloned() else {
                break;
            };
            match token {
                Token::LParen => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    self.pos += 1;
                    let Expr::Ident(callee) = lhs else {
                        return Err(EvalCause::Syntax(
                            "only named functions can be called".to_string(),
                        ));
                    };
                    let mut args = Vec::new();
                    if self.peek() == Some(&Token::RParen) {
                        self.pos += 1;
                    } else {
                        loop {
                            args.push(self.parse_expr(0)?);
                            match self.next() {
                                Some(Token::Comma) => continue,
                                Some(Token::RParen) => break,
                                Some(other) => {
                                    return Err(EvalCause::Syntax(format!(
                                        "expected ',' or ')' in argument list, found {other:?}"
                                    )));
                                }
                                None => {
                                    return Err(EvalCause::Syntax(
                                        "unterminated argument list".to_string(),
                                    ));
                                }
                            }
                        }
                    }
                    lhs = Expr::Call { callee, args };
                }
                Token::LBracket => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    self.pos += 1;
                    let index = self.parse_expr(0)?;
                    self.expect(&Token::RBracket, "after index")?;
                    lhs = Expr::Index {
                        target: Box::new(lhs),
                        index: Box::new(index),
                    };
                }
                Token::Dot => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    self.pos += 1;
                    match self.next() {
                        Some(Token::Ident(key)) => {
                            lhs = Expr::Member {
                                target: Box::new(lhs),
                                key,
                            };
                        }
                        other => {
                            return Err(EvalCause::Syntax(format!(
                                "expected member name after '.', found {other:?}"
                            )));
                        }
                    }
                }
                Token::Question => {
                    if TERNARY_BP < min_bp {
                        break;
                    }
                    self.pos += 1;
                    let then = self.parse_expr(0)?;
                    self.expect(&Token::Colon, "in ternary")?;
                    let otherwise = self.parse_expr(TERNARY_BP)?;
                    lhs = Expr::Ternary {
                        cond: Box::new(lhs),
                        then: Box::new(then),
                        otherwise: Box::new(otherwise),
                    };
                }
                _ => {
                    let Some((op, lbp, rbp)) = infix_binding(&token) else {
                        break;
                    };
                    if lbp < min_bp {
                        break;
                    }
                    self.pos += 1;
                    let rhs = self.parse_expr(rbp)?;
                    lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
                }
            }
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> CauseResult<Expr> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::True) => Ok(Expr::Bool(true)),
            Some(Token::False) => Ok(Expr::Bool(false)),
            Some(Token::Ident(name)) => Ok(Expr::Ident(name)),
            Some(Token::Plus) => Ok(Expr::Unary(
                UnaryOp::Plus,
                Box::new(self.parse_expr(UNARY_BP)?),
            )),
            Some(Token::Minus) => Ok(Expr::Unary(
                UnaryOp::Neg,
                Box::new(self.parse_expr(UNARY_BP)?),
            )),
            Some(Token::Bang) => Ok(Expr::Unary(
                UnaryOp::Not,
                Box::new(self.parse_expr(UNARY_BP)?),
            )),
            Some(Token::LParen) => {
                let expr = self.parse_expr(0)?;
                self.expect(&Token::RParen, "after parenthesized expression")?;
                Ok(expr)
            }
            Some(other) => Err(EvalCause::Syntax(format!("unexpected token {other:?}"))),
            None => Err(EvalCause::Syntax("unexpected end of expression".to_string())),
        }
    }
}

fn infix_binding(token: &Token) -> Option<(BinaryOp, u8, u8)> {
    Some(match token {
        Token::OrOr => (BinaryOp::Or, 3, 4),
        Token::AndAnd => (BinaryOp::And, 5, 6),
        Token::EqEq => (BinaryOp::Eq, 7, 8),
        Token::NotEq => (BinaryOp::Ne, 7, 8),
        Token::Lt => (BinaryOp::Lt, 9, 10),
        Token::Le => (BinaryOp::Le, 9, 10),
        Token::Gt => (BinaryOp::Gt, 9, 10),
        Token::Ge => (BinaryOp::Ge, 9, 10),
        Token::Plus => (BinaryOp::Add, 11, 12),
        Token::Minus => (BinaryOp::Sub, 11, 12),
        Token::Star => (BinaryOp::Mul, 13, 14),
        Token::Slash => (BinaryOp::Div, 13, 14),
        Token::Percent => (BinaryOp::Rem, 13, 14),
        // Right-associative, binds tighter than unary minus on its right.
        Token::StarStar => (BinaryOp::Pow, 18, 17),
        _ => return None,
    })
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
