//! Recursive-descent parser for the `OpenQASM` subset.

mod expression;
mod lowering;
mod statement;

use qexp_ir::CircuitDescription;

use crate::ast::Program;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse QASM source into a circuit description named `circuit`.
pub fn parse(source: &str) -> ParseResult<CircuitDescription> {
    parse_named("circuit", source)
}

/// Parse QASM source into a circuit description with the given name.
pub fn parse_named(name: &str, source: &str) -> ParseResult<CircuitDescription> {
    let program = parse_ast(source)?;
    lowering::lower_to_circuit(name, &program)
}

/// Parse QASM source into its syntax tree.
pub fn parse_ast(source: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    /// Byte offsets of every newline, for line numbers in diagnostics.
    newlines: Vec<usize>,
}

impl Parser {
    fn new(source: &str) -> ParseResult<Self> {
        let newlines: Vec<usize> = source
            .char_indices()
            .filter(|(_, c)| *c == '\n')
            .map(|(i, _)| i)
            .collect();

        let tokens = tokenize(source).map_err(|bad| ParseError::LexerError {
            line: newlines.partition_point(|&n| n < bad.offset) + 1,
            message: format!("unrecognized input '{}'", bad.text),
        })?;

        Ok(Self {
            tokens,
            pos: 0,
            newlines,
        })
    }

    /// Line of the current token, or of the last token at end of input.
    pub(super) fn line(&self) -> usize {
        let offset = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.span.start);
        self.newlines.partition_point(|&n| n < offset) + 1
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn unexpected(&self, expected: &str, found: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            line: self.line(),
            expected: expected.into(),
            found: found.to_string(),
        }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        if !self.check(&Token::OpenQasm) {
            return Err(ParseError::InvalidVersion(
                "missing OPENQASM header".into(),
            ));
        }
        self.advance();
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    fn parse_version(&mut self) -> ParseResult<u32> {
        let major = match self.advance() {
            Some(Token::FloatLiteral(v)) => v.trunc(),
            #[allow(clippy::cast_precision_loss)]
            Some(Token::IntLiteral(v)) => v as f64,
            Some(other) => return Err(ParseError::InvalidVersion(other.to_string())),
            None => return Err(ParseError::UnexpectedEof("version number".into())),
        };
        if major == 2.0 {
            Ok(2)
        } else if major == 3.0 {
            Ok(3)
        } else {
            Err(ParseError::InvalidVersion(major.to_string()))
        }
    }

    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            Some(other) => {
                self.pos -= 1;
                Err(self.unexpected("identifier", &other))
            }
            None => Err(ParseError::UnexpectedEof("identifier".into())),
        }
    }

    pub(super) fn parse_index(&mut self) -> ParseResult<u32> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => u32::try_from(v)
                .map_err(|_| ParseError::Generic(format!("index {v} is too large"))),
            Some(other) => {
                self.pos -= 1;
                Err(self.unexpected("integer", &other))
            }
            None => Err(ParseError::UnexpectedEof("integer".into())),
        }
    }
}
