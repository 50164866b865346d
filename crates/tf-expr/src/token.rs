//! Lexer for the expression sub-language.

use crate::error::{CauseResult, EvalCause};

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// String literal (quotes and escapes resolved)
    Str(String),
    /// Identifier
    Ident(String),
    /// `true`
    True,
    /// `false`
    False,

    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Bang,
    Question,
    Colon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
}

/// Tokenize an expression string.
pub fn tokenize(input: &str) -> CauseResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '0'..='9' => tokens.push(lex_number(&mut chars)?),
            '.' => {
                // A leading dot is member access, not a number.
                chars.next();
                tokens.push(Token::Dot);
            }
            '\'' | '"' => tokens.push(lex_string(&mut chars)?),
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(match ident.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Ident(ident),
                });
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::StarStar);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Le);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '=' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::EqEq);
                } else {
                    return Err(EvalCause::Syntax("unexpected '='".to_string()));
                }
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::NotEq);
                } else {
                    tokens.push(Token::Bang);
                }
            }
            '&' => {
                chars.next();
                if chars.peek() == Some(&'&') {
                    chars.next();
                    tokens.push(Token::AndAnd);
                } else {
                    return Err(EvalCause::Syntax("unexpected '&'".to_string()));
                }
            }
            '|' => {
                chars.next();
                if chars.peek() == Some(&'|') {
                    chars.next();
                    tokens.push(Token::OrOr);
                } else {
                    return Err(EvalCause::Syntax("unexpected '|'".to_string()));
                }
            }
            '?' => {
                chars.next();
                tokens.push(Token::Question);
            }
            ':' => {
                chars.next();
                tokens.push(Token::Colon);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => {
                return Err(EvalCause::Syntax(format!("unexpected character '{other}'")));
            }
        }
    }

    Ok(tokens)
}

fn lex_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> CauseResult<Token> {
    let mut text = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            text.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if chars.peek() == Some(&'.') {
        let mut lookahead = chars.clone();
        lookahead.next();
        // `1.foo` is member access on a number literal, not a fraction.
        if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            chars.next();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
        }
    }
    if matches!(chars.peek(), Some(&'e') | Some(&'E')) {
        let mut lookahead = chars.clone();
        let e = lookahead.next().expect("peeked");
        let mut exp = String::new();
        if matches!(lookahead.peek(), Some(&'+') | Some(&'-')) {
            exp.push(*lookahead.peek().expect("peeked"));
            lookahead.next();
        }
        if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
            // Commit to the exponent.
            chars.next();
            for _ in 0..exp.len() {
                chars.next();
            }
            text.push(e);
            text.push_str(&exp);
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
        }
    }
    text.parse::<f64>()
        .map(Token::Number)
        .map_err(|_| EvalCause::Syntax(format!("invalid number '{text}'")))
}

fn lex_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> CauseResult<Token> {
    let quote = chars.next().expect("peeked");
    let mut text = String::new();
    loop {
        match chars.next() {
            None => return Err(EvalCause::Syntax("unterminated string literal".to_string())),
            Some('\\') => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some(c @ ('\\' | '\'' | '"')) => text.push(c),
                Some(other) => {
                    return Err(EvalCause::Syntax(format!("invalid escape '\\{other}'")));
                }
                None => return Err(EvalCause::Syntax("unterminated string literal".to_string())),
            },
            Some(c) if c == quote => break,
            Some(c) => text.push(c),
        }
    }
    Ok(Token::Str(text))
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
