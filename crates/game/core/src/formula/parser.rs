//! Recursive-descent parser for damage and heal formulas.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := '-' factor | number | var | '(' expr ')'
//! var    := ('a' | 'b') '.' stat
//! ```

use super::{BinaryOp, Expr, FormulaError, FormulaVar, Side};

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    Open,
    Close,
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = offset;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &source[offset..end];
                let value = text.parse().map_err(|_| FormulaError::UnexpectedToken {
                    found: text.to_owned(),
                    offset,
                })?;
                tokens.push((offset, Token::Number(value)));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = offset;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((offset, Token::Ident(source[offset..end].to_owned())));
            }
            '+' | '-' | '*' | '/' => {
                tokens.push((offset, Token::Op(c)));
                chars.next();
            }
            '(' => {
                tokens.push((offset, Token::Open));
                chars.next();
            }
            ')' => {
                tokens.push((offset, Token::Close));
                chars.next();
            }
            other => {
                return Err(FormulaError::UnexpectedToken {
                    found: other.to_string(),
                    offset,
                });
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self) -> Result<(usize, Token), FormulaError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FormulaError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            let op = if *op == '+' { BinaryOp::Add } else { BinaryOp::Sub };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.factor()?;
        while let Some(Token::Op(op @ ('*' | '/'))) = self.peek() {
            let op = if *op == '*' { BinaryOp::Mul } else { BinaryOp::Div };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, FormulaError> {
        let (offset, token) = self.next()?;
        match token {
            Token::Op('-') => Ok(Expr::Neg(Box::new(self.factor()?))),
            Token::Number(value) => Ok(Expr::Const(value)),
            Token::Ident(name) => parse_var(&name).map(Expr::Var),
            Token::Open => {
                let inner = self.expr()?;
                match self.next()? {
                    (_, Token::Close) => Ok(inner),
                    (offset, other) => Err(unexpected(offset, &other)),
                }
            }
            other => Err(unexpected(offset, &other)),
        }
    }
}

fn unexpected(offset: usize, token: &Token) -> FormulaError {
    let found = match token {
        Token::Number(n) => n.to_string(),
        Token::Ident(s) => s.clone(),
        Token::Op(c) => c.to_string(),
        Token::Open => "(".into(),
        Token::Close => ")".into(),
    };
    FormulaError::UnexpectedToken { found, offset }
}

fn parse_var(name: &str) -> Result<(Side, FormulaVar), FormulaError> {
    let unknown = || FormulaError::UnknownVariable(name.to_owned());
    let (side, stat) = name.split_once('.').ok_or_else(unknown)?;
    let side = match side {
        "a" => Side::Subject,
        "b" => Side::Target,
        _ => return Err(unknown()),
    };
    let var = stat.parse::<FormulaVar>().map_err(|_| unknown())?;
    Ok((side, var))
}

pub(super) fn parse(source: &str) -> Result<Expr, FormulaError> {
    let mut parser = Parser {
        tokens: tokenize(source)?,
        pos: 0,
    };
    let expr = parser.expr()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some((offset, _)) => Err(FormulaError::TrailingInput(*offset)),
    }
}
