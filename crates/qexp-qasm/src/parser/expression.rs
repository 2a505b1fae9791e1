//! Parameter expression parsing and evaluation.

use super::Parser;
use crate::ast::{BinOp, Expression};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse an expression.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_expr(0)
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance();

            // `**` is right-associative.
            let next_min = if op == BinOp::Pow { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_min)?;
            left = Expression::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expression> {
        if self.consume(&Token::Minus) {
            let expr = self.parse_unary_expr()?;
            return Ok(Expression::Neg(Box::new(expr)));
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary_expr();
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expression> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(v) => {
                self.advance();
                Ok(Expression::Int(v))
            }
            Token::FloatLiteral(v) => {
                self.advance();
                Ok(Expression::Float(v))
            }
            Token::Pi => {
                self.advance();
                Ok(Expression::Pi)
            }
            Token::Tau => {
                self.advance();
                Ok(Expression::Tau)
            }
            Token::Euler => {
                self.advance();
                Ok(Expression::Euler)
            }
            Token::Identifier(name) => {
                self.advance();
                if self.consume(&Token::LParen) {
                    let args = self.parse_expression_list()?;
                    self.expect(Token::RParen)?;
                    Ok(Expression::FnCall { name, args })
                } else {
                    Ok(Expression::Identifier(name))
                }
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression", &token)),
        }
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Power | Token::Caret => Some(BinOp::Pow),
            _ => None,
        }
    }

    /// Parse a comma-separated expression list (possibly empty).
    pub(super) fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }
}

fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div => 2,
        BinOp::Pow => 3,
    }
}

/// Evaluate a parameter expression to a real number.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn evaluate(expr: &Expression) -> ParseResult<f64> {
    use std::f64::consts::{E, PI, TAU};

    Ok(match expr {
        Expression::Int(v) => *v as f64,
        Expression::Float(v) => *v,
        Expression::Pi => PI,
        Expression::Tau => TAU,
        Expression::Euler => E,
        Expression::Identifier(name) => {
            return Err(ParseError::UndefinedIdentifier(name.clone()));
        }
        Expression::Neg(inner) => -evaluate(inner)?,
        Expression::BinOp { left, op, right } => {
            let (l, r) = (evaluate(left)?, evaluate(right)?);
            match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => {
                    if r == 0.0 {
                        return Err(ParseError::Generic("division by zero".into()));
                    }
                    l / r
                }
                BinOp::Pow => l.powf(r),
            }
        }
        Expression::FnCall { name, args } => {
            let [arg] = args.as_slice() else {
                return Err(ParseError::Generic(format!(
                    "function '{name}' takes one argument, got {}",
                    args.len()
                )));
            };
            let x = evaluate(arg)?;
            match name.as_str() {
                "sin" => x.sin(),
                "cos" => x.cos(),
                "tan" => x.tan(),
                "arcsin" | "asin" => x.asin(),
                "arccos" | "acos" => x.acos(),
                "arctan" | "atan" => x.atan(),
                "exp" => x.exp(),
                "ln" => x.ln(),
                "sqrt" => x.sqrt(),
                _ => return Err(ParseError::UndefinedIdentifier(name.clone())),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use std::f64::consts::PI;

    fn eval(source: &str) -> f64 {
        let mut parser = Parser::new(source).unwrap();
        let expr = parser.parse_expression().unwrap();
        assert!(parser.is_eof(), "trailing input in {source}");
        evaluate(&expr).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_angles_from_experiments() {
        assert!(close(eval("pi/2"), PI / 2.0));
        assert!(close(eval("-3*pi/5"), -3.0 * PI / 5.0));
        assert!(close(eval("0.9*pi"), 0.9 * PI));
        assert!(close(eval("2*pi/5"), 2.0 * PI / 5.0));
        assert!(close(eval("-1.0995574287564285"), -1.099_557_428_756_428_5));
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert!(close(eval("1 + 2 * 3"), 7.0));
        assert!(close(eval("(1 + 2) * 3"), 9.0));
        assert!(close(eval("2 ** 3 ** 2"), 512.0));
        assert!(close(eval("8 / 4 / 2"), 1.0));
        assert!(close(eval("-2 ^ 2"), 4.0));
    }

    #[test]
    fn test_functions() {
        assert!(close(eval("cos(pi)"), -1.0));
        assert!(close(eval("sqrt(4)"), 2.0));
        assert!(close(eval("tau/2"), PI));
    }

    #[test]
    fn test_errors() {
        let mut parser = Parser::new("theta / 2").unwrap();
        let expr = parser.parse_expression().unwrap();
        assert!(matches!(
            evaluate(&expr),
            Err(ParseError::UndefinedIdentifier(_))
        ));

        let mut parser = Parser::new("1 / 0").unwrap();
        let expr = parser.parse_expression().unwrap();
        assert!(evaluate(&expr).is_err());
    }
}
