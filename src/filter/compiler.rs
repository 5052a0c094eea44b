//! Recursive-descent compiler from infix filter expressions to bytecode.
//! Replaces the original boost::spirit x3 grammar
//! (`filter_compiler.h`) with a hand-written parser, since nothing in the
//! pack offers a parser-combinator crate matching this grammar's small
//! scope.

use super::ast::{CmpOp, Expr, Value};
use super::vm::Instr;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    X,
    Op(CmpOp),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '&' if chars.get(i + 1) == Some(&'&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            '<' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Op(CmpOp::Le));
                i += 2;
            }
            '<' => {
                tokens.push(Token::Op(CmpOp::Lt));
                i += 1;
            }
            '>' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Op(CmpOp::Ge));
                i += 2;
            }
            '>' => {
                tokens.push(Token::Op(CmpOp::Gt));
                i += 1;
            }
            '=' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Op(CmpOp::Eq));
                i += 2;
            }
            'x' => {
                tokens.push(Token::X);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' || c == '-' => {
                let start = i;
                i += 1;
                while i < chars.len()
                    && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == 'e')
                {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text.parse::<f64>().map_err(|e| Error::FilterParse {
                    expr: src.to_string(),
                    message: format!("invalid number {text:?}: {e}"),
                })?;
                tokens.push(Token::Number(value));
            }
            other => {
                return Err(Error::FilterParse {
                    expr: src.to_string(),
                    message: format!("unexpected character {other:?}"),
                });
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    src: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        self.pos += 1;
        t
    }

    fn expect(&mut self, want: &Token) -> Result<()> {
        if self.advance() == Some(want) {
            Ok(())
        } else {
            Err(Error::FilterParse {
                expr: self.src.to_string(),
                message: format!("expected {want:?}"),
            })
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_term()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_factor()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Not) => {
                self.advance();
                self.expect(&Token::LParen)?;
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(Expr::Not(Box::new(inner)))
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            _ => self.parse_comparison_chain(),
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Value::Const(*n)),
            Some(Token::X) => Ok(Value::X),
            other => Err(Error::FilterParse {
                expr: self.src.to_string(),
                message: format!("expected a value, got {other:?}"),
            }),
        }
    }

    /// `C := V (OP V)*`, chained left-to-right as conjunctions:
    /// `a < b < c` compiles as `(a < b) && (b < c)`.
    fn parse_comparison_chain(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_value()?;
        let op = match self.peek() {
            Some(Token::Op(op)) => *op,
            _ => {
                return Err(Error::FilterParse {
                    expr: self.src.to_string(),
                    message: "expected a comparison operator".into(),
                });
            }
        };
        self.advance();
        let mut rhs = self.parse_value()?;
        let mut expr = Expr::Cmp(lhs, op, rhs);
        loop {
            match self.peek() {
                Some(Token::Op(next_op)) => {
                    let next_op = *next_op;
                    self.advance();
                    lhs = rhs;
                    rhs = self.parse_value()?;
                    expr = Expr::And(Box::new(expr), Box::new(Expr::Cmp(lhs, next_op, rhs)));
                }
                _ => break,
            }
        }
        Ok(expr)
    }
}

pub fn parse(src: &str) -> Result<Expr> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        src,
    };
    let expr = parser.parse_expr()?;
    if parser.pos != tokens.len() {
        return Err(Error::FilterParse {
            expr: src.to_string(),
            message: "trailing input after a complete expression".into(),
        });
    }
    Ok(expr)
}

fn emit_value(value: Value, out: &mut Vec<Instr>) {
    match value {
        Value::Const(v) => out.push(Instr::PushConst(v)),
        Value::X => out.push(Instr::PushX),
    }
}

pub fn compile_expr(expr: &Expr, out: &mut Vec<Instr>) {
    match expr {
        Expr::Cmp(lhs, op, rhs) => {
            emit_value(*lhs, out);
            emit_value(*rhs, out);
            out.push(match op {
                CmpOp::Lt => Instr::Lt,
                CmpOp::Le => Instr::Le,
                CmpOp::Gt => Instr::Gt,
                CmpOp::Ge => Instr::Ge,
                CmpOp::Eq => Instr::Eq,
            });
        }
        Expr::And(lhs, rhs) => {
            compile_expr(lhs, out);
            compile_expr(rhs, out);
            out.push(Instr::And);
        }
        Expr::Or(lhs, rhs) => {
            compile_expr(lhs, out);
            compile_expr(rhs, out);
            out.push(Instr::Or);
        }
        Expr::Not(inner) => {
            compile_expr(inner, out);
            out.push(Instr::Not);
        }
    }
}

/// Compiles an infix expression directly to bytecode.
pub fn compile(src: &str) -> Result<Vec<Instr>> {
    let expr = parse(src)?;
    let mut code = Vec::new();
    compile_expr(&expr, &mut code);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::vm::execute;

    #[test]
    fn compiles_simple_comparison() {
        let code = compile("x < 5").unwrap();
        assert!(execute(&code, 3.0));
        assert!(!execute(&code, 10.0));
    }

    #[test]
    fn compiles_and_or_not() {
        let code = compile("x > 0 && x < 10").unwrap();
        assert!(execute(&code, 5.0));
        assert!(!execute(&code, -1.0));

        let code = compile("x < 0 || x > 10").unwrap();
        assert!(execute(&code, 20.0));
        assert!(!execute(&code, 5.0));

        let code = compile("!(x < 0)").unwrap();
        assert!(execute(&code, 5.0));
        assert!(!execute(&code, -5.0));
    }

    #[test]
    fn rejects_malformed_expression() {
        assert!(compile("x <").is_err());
        assert!(compile("x < 5 <").is_err());
        assert!(compile("(x < 5").is_err());
    }
}
