//! Lexer for the `OpenQASM` 2 / 3 subset.

use std::fmt;
use std::ops::Range;

use logos::Logos;

/// Tokens for `OpenQASM` 2 and 3.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\s+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qubit")]
    Qubit,

    #[token("bit")]
    Bit,

    #[token("qreg")]
    Qreg,

    #[token("creg")]
    Creg,

    #[token("measure")]
    Measure,

    #[token("barrier")]
    Barrier,

    // Recognized so they can be rejected with a clear message.
    #[token("reset")]
    Reset,

    #[token("gate")]
    Gate,

    #[token("opaque")]
    Opaque,

    #[token("def")]
    Def,

    #[token("if")]
    If,

    #[token("for")]
    For,

    #[token("while")]
    While,

    // Constants
    #[token("pi")]
    #[token("π")]
    Pi,

    #[token("tau")]
    #[token("τ")]
    Tau,

    #[token("euler")]
    #[token("ℇ")]
    Euler,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r#""[^"]*""#, |lex| lex.slice().trim_matches('"').to_string())]
    StringLiteral(String),

    /// Physical qubit: `$0`, `$12`.
    #[regex(r"\$[0-9]+", |lex| lex.slice()[1..].parse::<u32>().ok())]
    HardwareQubit(u32),

    // Identifiers
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("**")]
    Power,

    #[token("^")]
    Caret,

    #[token("=")]
    Eq,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

impl Token {
    /// Source spelling of tokens that carry no value.
    fn spelling(&self) -> Option<&'static str> {
        let text = match self {
            Token::OpenQasm => "OPENQASM",
            Token::Include => "include",
            Token::Qubit => "qubit",
            Token::Bit => "bit",
            Token::Qreg => "qreg",
            Token::Creg => "creg",
            Token::Measure => "measure",
            Token::Barrier => "barrier",
            Token::Reset => "reset",
            Token::Gate => "gate",
            Token::Opaque => "opaque",
            Token::Def => "def",
            Token::If => "if",
            Token::For => "for",
            Token::While => "while",
            Token::Pi => "pi",
            Token::Tau => "tau",
            Token::Euler => "euler",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Power => "**",
            Token::Caret => "^",
            Token::Eq => "=",
            Token::Arrow => "->",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::FloatLiteral(_)
            | Token::IntLiteral(_)
            | Token::StringLiteral(_)
            | Token::HardwareQubit(_)
            | Token::Identifier(_) => return None,
        };
        Some(text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.spelling() {
            return f.write_str(text);
        }
        match self {
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::HardwareQubit(n) => write!(f, "${n}"),
            Token::Identifier(s) => f.write_str(s),
            _ => Ok(()),
        }
    }
}

/// A token and the byte range it came from.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Range<usize>,
}

/// Input the lexer could not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unrecognized {
    /// Byte offset of the bad input.
    pub offset: usize,
    pub text: String,
}

/// Split `source` into tokens, stopping at the first unrecognized input.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, Unrecognized> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(next) = lexer.next() {
        let span = lexer.span();
        let token = next.map_err(|()| Unrecognized {
            offset: span.start,
            text: lexer.slice().to_string(),
        })?;
        tokens.push(SpannedToken { token, span });
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_tokenize_header() {
        assert_eq!(
            kinds("OPENQASM 3.0;"),
            vec![Token::OpenQasm, Token::FloatLiteral(3.0), Token::Semicolon]
        );
    }

    #[test]
    fn test_tokenize_qasm2_registers() {
        assert_eq!(
            kinds("qreg q[2];"),
            vec![
                Token::Qreg,
                Token::Identifier("q".into()),
                Token::LBracket,
                Token::IntLiteral(2),
                Token::RBracket,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_tokenize_physical_qubit_and_assignment() {
        assert_eq!(
            kinds("c[0] = measure $1;"),
            vec![
                Token::Identifier("c".into()),
                Token::LBracket,
                Token::IntLiteral(0),
                Token::RBracket,
                Token::Eq,
                Token::Measure,
                Token::HardwareQubit(1),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = kinds("// line\nx q; /* block\n comment */ id q;");
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_power_operators() {
        assert_eq!(
            kinds("2**3 ^ 1"),
            vec![
                Token::IntLiteral(2),
                Token::Power,
                Token::IntLiteral(3),
                Token::Caret,
                Token::IntLiteral(1),
            ]
        );
    }

    #[test]
    fn test_unrecognized_input() {
        let err = tokenize("x q;\n#").unwrap_err();
        assert_eq!(err.offset, 5);
        assert_eq!(err.text, "#");
    }
}
