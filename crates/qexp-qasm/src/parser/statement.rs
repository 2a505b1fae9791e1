//! Statement parsing.

use super::Parser;
use crate::ast::{BitRef, GateCall, QubitRef, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Include => self.parse_include(),
            Token::Qubit => self.parse_typed_decl(true),
            Token::Bit => self.parse_typed_decl(false),
            Token::Qreg => self.parse_register_decl(true),
            Token::Creg => self.parse_register_decl(false),
            Token::Measure => self.parse_measure(),
            Token::Barrier => self.parse_barrier(),
            Token::Identifier(_) => self.parse_identifier_statement(),
            Token::Reset
            | Token::Gate
            | Token::Opaque
            | Token::Def
            | Token::If
            | Token::For
            | Token::While => Err(ParseError::Unsupported(token.to_string())),
            _ => Err(self.unexpected("statement", &token)),
        }
    }

    fn parse_include(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Include)?;
        let path = match self.advance() {
            Some(Token::StringLiteral(s)) => s,
            Some(other) => {
                self.pos -= 1;
                return Err(self.unexpected("string literal", &other));
            }
            None => return Err(ParseError::UnexpectedEof("include path".into())),
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Include(path))
    }

    /// `qubit[n] q;`, `qubit q;`, `bit[n] c;`, `bit c;`
    fn parse_typed_decl(&mut self, quantum: bool) -> ParseResult<Statement> {
        self.advance();

        let size = if self.consume(&Token::LBracket) {
            let size = self.parse_index()?;
            self.expect(Token::RBracket)?;
            size
        } else {
            1
        };

        let name = self.parse_identifier()?;
        if self.check(&Token::Eq) {
            return Err(ParseError::Unsupported("initialized declaration".into()));
        }
        self.expect(Token::Semicolon)?;

        Ok(declaration(quantum, name, size))
    }

    /// `qreg q[n];`, `creg c[n];`
    fn parse_register_decl(&mut self, quantum: bool) -> ParseResult<Statement> {
        self.advance();
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_index()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;
        Ok(declaration(quantum, name, size))
    }

    /// `measure q -> c;`
    fn parse_measure(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Measure)?;
        let qubits = self.parse_qubit_refs()?;

        let bits = if self.consume(&Token::Arrow) {
            self.parse_bit_refs()?
        } else {
            vec![]
        };

        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { qubits, bits })
    }

    fn parse_barrier(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Barrier)?;
        let qubits = if self.check(&Token::Semicolon) {
            vec![]
        } else {
            self.parse_qubit_refs()?
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Barrier { qubits })
    }

    /// Gate call or measurement assignment.
    fn parse_identifier_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        let name = self.parse_identifier()?;

        if self.check(&Token::Eq) || self.check(&Token::LBracket) {
            return self.parse_assignment(name);
        }

        self.parse_gate_call(name, line)
    }

    /// `c = measure q;` or `c[i] = measure q[j];`
    fn parse_assignment(&mut self, target: String) -> ParseResult<Statement> {
        let bit = if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            BitRef::Indexed {
                register: target,
                index,
            }
        } else {
            BitRef::Register(target)
        };

        self.expect(Token::Eq)?;

        if !self.consume(&Token::Measure) {
            return Err(ParseError::Unsupported("classical assignment".into()));
        }
        let qubits = self.parse_qubit_refs()?;
        self.expect(Token::Semicolon)?;

        Ok(Statement::Measure {
            qubits,
            bits: vec![bit],
        })
    }

    fn parse_gate_call(&mut self, name: String, line: usize) -> ParseResult<Statement> {
        let params = if self.consume(&Token::LParen) {
            let p = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        let qubits = self.parse_qubit_refs()?;
        self.expect(Token::Semicolon)?;

        Ok(Statement::Gate(GateCall {
            name,
            params,
            qubits,
            line,
        }))
    }

    fn parse_qubit_refs(&mut self) -> ParseResult<Vec<QubitRef>> {
        let mut refs = vec![self.parse_qubit_ref()?];
        while self.consume(&Token::Comma) {
            refs.push(self.parse_qubit_ref()?);
        }
        Ok(refs)
    }

    fn parse_qubit_ref(&mut self) -> ParseResult<QubitRef> {
        if let Some(Token::HardwareQubit(n)) = self.peek() {
            let n = *n;
            self.advance();
            return Ok(QubitRef::Physical(n));
        }

        let register = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Ok(QubitRef::Indexed { register, index })
        } else {
            Ok(QubitRef::Register(register))
        }
    }

    fn parse_bit_refs(&mut self) -> ParseResult<Vec<BitRef>> {
        let mut refs = vec![self.parse_bit_ref()?];
        while self.consume(&Token::Comma) {
            refs.push(self.parse_bit_ref()?);
        }
        Ok(refs)
    }

    fn parse_bit_ref(&mut self) -> ParseResult<BitRef> {
        let register = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Ok(BitRef::Indexed { register, index })
        } else {
            Ok(BitRef::Register(register))
        }
    }
}

fn declaration(quantum: bool, name: String, size: u32) -> Statement {
    if quantum {
        Statement::QubitDecl { name, size }
    } else {
        Statement::BitDecl { name, size }
    }
}
