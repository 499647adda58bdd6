use aria_common::Span;
use std::fmt;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn eof(span: Span) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.lexeme)
    }
}

/// All token kinds in the aria language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    /// Integer literal (decimal or `0x` hex); lexeme is the raw text.
    IntLiteral,
    FloatLiteral,
    /// String literal; lexeme is the unescaped content.
    StringLiteral,
    /// Character literal; lexeme is the single unescaped character.
    CharLiteral,

    // === Identifiers ===
    Identifier,

    // === Keywords ===
    Class,
    External,
    Var,
    Static,
    If,
    Else,
    While,
    Return,
    This,
    Null,
    True,
    False,
    List,
    Function,
    As,

    // === Operators ===
    Plus,             // +
    Minus,            // -
    Star,             // *
    Slash,            // /
    EqualEqual,       // ==
    BangEqual,        // !=
    Less,             // <
    Greater,          // >
    LessEqual,        // <=
    GreaterEqual,     // >=
    LessLess,         // <<
    GreaterGreater,   // >>
    AmpAmp,           // &&
    PipePipe,         // ||
    Amp,              // &
    Pipe,             // |
    Caret,            // ^
    Bang,             // !
    Equal,            // =
    Question,         // ?
    QuestionQuestion, // ??
    QuestionDot,      // ?.
    Dot,              // .

    // === Delimiters ===
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Comma,        // ,

    // === Special ===
    /// Placeholder emitted for characters the lexer could not scan; the
    /// diagnostic has already been reported.
    Error,
    Eof,
}

impl TokenKind {
    /// Try to match an identifier string to a keyword.
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "class" => Some(TokenKind::Class),
            "external" => Some(TokenKind::External),
            "var" => Some(TokenKind::Var),
            "static" => Some(TokenKind::Static),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "return" => Some(TokenKind::Return),
            "this" => Some(TokenKind::This),
            "null" => Some(TokenKind::Null),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "list" => Some(TokenKind::List),
            "function" => Some(TokenKind::Function),
            "as" => Some(TokenKind::As),
            _ => None,
        }
    }
}
