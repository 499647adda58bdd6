mod expressions;
mod statements;

use aria_common::{DiagnosticBag, Span};

use crate::ast::*;
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::Lexer;

/// Lex and parse a complete source file.
///
/// Lexer and parser diagnostics come back merged, in order.
pub fn parse_module(source: &str, file: &str) -> (Module, DiagnosticBag) {
    let (tokens, mut diagnostics) = Lexer::new(source, file).tokenize();
    let (module, parse_diagnostics) = Parser::new(tokens).parse();
    for diagnostic in parse_diagnostics.into_diagnostics() {
        diagnostics.report(diagnostic);
    }
    (module, diagnostics)
}

/// Recursive descent parser for the aria language.
///
/// Uses Pratt parsing for expression precedence. Statements carry no
/// terminator, so statement boundaries fall out of the grammar itself.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: DiagnosticBag,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Parse the entire token stream into a Module.
    pub fn parse(mut self) -> (Module, DiagnosticBag) {
        let start = self.current_span();
        let mut stmts = Vec::new();

        while !self.is_at_end() {
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
        }

        let span = start.to(&self.current_span());
        let module = Module {
            block: Block::new(stmts, span.clone()),
            span,
        };
        (module, self.diagnostics)
    }

    // ========================================================================
    // Token manipulation helpers
    // ========================================================================

    /// Peek at the current token kind.
    pub(super) fn peek(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Peek at a token kind N positions ahead.
    pub(super) fn peek_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Get the current token.
    pub(super) fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().unwrap())
    }

    /// Get the previous token (the one just consumed).
    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Advance past the current token and return it.
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    /// Consume a token of the expected kind, or report an error.
    pub(super) fn expect(&mut self, kind: TokenKind) -> Option<&Token> {
        if self.peek() == kind {
            self.advance();
            Some(self.previous())
        } else {
            let span = self.current_span();
            self.diagnostics.error(
                format!("expected {:?}, found {:?}", kind, self.peek()),
                span,
            );
            None
        }
    }

    /// Consume if the current token matches, otherwise do nothing.
    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Check if the parser has reached EOF.
    pub(super) fn is_at_end(&self) -> bool {
        self.peek() == TokenKind::Eof
    }

    /// Get the span of the current token.
    pub(super) fn current_span(&self) -> Span {
        self.current().span.clone()
    }

    /// Get the span of the previous token.
    pub(super) fn previous_span(&self) -> Span {
        self.previous().span.clone()
    }

    pub(super) fn error_here(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.diagnostics.error(message, span);
    }

    /// Consume the `>` that closes a type-parameter list. A `>>` token
    /// is split in place: the first `>` closes this list and the second
    /// is left behind for the enclosing one.
    pub(super) fn close_type_list(&mut self) -> bool {
        match self.peek() {
            TokenKind::Greater => {
                self.advance();
                true
            }
            TokenKind::GreaterGreater => {
                let token = &mut self.tokens[self.pos];
                token.kind = TokenKind::Greater;
                token.lexeme = ">".into();
                token.span.column += 1;
                token.span.start += 1;
                true
            }
            _ => {
                self.error_here(format!("expected '>', found {:?}", self.peek()));
                false
            }
        }
    }

    /// Error recovery: skip tokens until a likely statement boundary.
    pub(super) fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            match self.peek() {
                TokenKind::External
                | TokenKind::Class
                | TokenKind::Var
                | TokenKind::Static
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::RightBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
