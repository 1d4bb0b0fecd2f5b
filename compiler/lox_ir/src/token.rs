//! Tokens as handed over by the scanner.
//!
//! The runtime core never scans source text itself; it only needs a token's
//! kind, its interned lexeme and where it came from.

use crate::{Name, SourcePosition, Span};

/// Semantic token kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Percent,
    Semicolon,
    Slash,
    Star,
    Question,
    Colon,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Break,
    Class,
    Continue,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenKind {
    /// Source text of fixed-spelling tokens; `None` for identifiers and literals.
    pub const fn as_str(self) -> Option<&'static str> {
        Some(match self {
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Minus => "-",
            TokenKind::Plus => "+",
            TokenKind::Percent => "%",
            TokenKind::Semicolon => ";",
            TokenKind::Slash => "/",
            TokenKind::Star => "*",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::And => "and",
            TokenKind::Break => "break",
            TokenKind::Class => "class",
            TokenKind::Continue => "continue",
            TokenKind::Else => "else",
            TokenKind::False => "false",
            TokenKind::Fun => "fun",
            TokenKind::For => "for",
            TokenKind::If => "if",
            TokenKind::Nil => "nil",
            TokenKind::Or => "or",
            TokenKind::Print => "print",
            TokenKind::Return => "return",
            TokenKind::Super => "super",
            TokenKind::This => "this",
            TokenKind::True => "true",
            TokenKind::Var => "var",
            TokenKind::While => "while",
            TokenKind::Identifier | TokenKind::String | TokenKind::Number | TokenKind::Eof => {
                return None
            }
        })
    }
}

/// A scanned token.
///
/// Copyable so syntax nodes can embed the tokens they report errors at.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Name,
    pub line: u32,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, lexeme: Name, line: u32, span: Span) -> Self {
        Token {
            kind,
            lexeme,
            line,
            span,
        }
    }

    /// Where this token sits, for diagnostics.
    #[inline]
    pub const fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.span)
    }
}
