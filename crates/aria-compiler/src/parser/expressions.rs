use aria_common::Span;

use crate::ast::*;
use crate::lexer::token::TokenKind;

use super::Parser;

// ============================================================================
// Binding powers for Pratt parsing
// ============================================================================
//
// Higher values bind tighter. (left_bp, right_bp): left < right = left-assoc.
//
//  =            (2, 1)   right-assoc
//  ??           (3, 4)
//  ||           (5, 6)
//  &&           (7, 8)
//  |            (9, 10)
//  ^            (11, 12)
//  &            (13, 14)
//  == !=        (15, 16)
//  < > <= >=    (17, 18)
//  << >>        (19, 20)
//  + -          (21, 22)
//  * /          (23, 24)
//  as           (25, 26)
//  unary - !    27
//  postfix (), [], ., ?., ?   handled in parse_postfix

fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Equal => Some((2, 1)),
        TokenKind::QuestionQuestion => Some((3, 4)),
        TokenKind::PipePipe => Some((5, 6)),
        TokenKind::AmpAmp => Some((7, 8)),
        TokenKind::Pipe => Some((9, 10)),
        TokenKind::Caret => Some((11, 12)),
        TokenKind::Amp => Some((13, 14)),
        TokenKind::EqualEqual | TokenKind::BangEqual => Some((15, 16)),
        TokenKind::Less | TokenKind::Greater | TokenKind::LessEqual | TokenKind::GreaterEqual => {
            Some((17, 18))
        }
        TokenKind::LessLess | TokenKind::GreaterGreater => Some((19, 20)),
        TokenKind::Plus | TokenKind::Minus => Some((21, 22)),
        TokenKind::Star | TokenKind::Slash => Some((23, 24)),
        TokenKind::As => Some((25, 26)),
        _ => None,
    }
}

fn token_to_binary_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Equal => Some(BinaryOp::Assign),
        TokenKind::QuestionQuestion => Some(BinaryOp::NullDefault),
        TokenKind::PipePipe => Some(BinaryOp::Or),
        TokenKind::AmpAmp => Some(BinaryOp::And),
        TokenKind::Pipe => Some(BinaryOp::BitOr),
        TokenKind::Caret => Some(BinaryOp::BitXor),
        TokenKind::Amp => Some(BinaryOp::BitAnd),
        TokenKind::EqualEqual => Some(BinaryOp::Eq),
        TokenKind::BangEqual => Some(BinaryOp::Neq),
        TokenKind::Less => Some(BinaryOp::Lt),
        TokenKind::Greater => Some(BinaryOp::Gt),
        TokenKind::LessEqual => Some(BinaryOp::Lte),
        TokenKind::GreaterEqual => Some(BinaryOp::Gte),
        TokenKind::LessLess => Some(BinaryOp::Shl),
        TokenKind::GreaterGreater => Some(BinaryOp::Shr),
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        _ => None,
    }
}

/// Binding power of the right-hand side of `as`, also used to parse
/// standalone type expressions (`int x`, argument types): a type is a
/// primary plus its postfix operators, no binary operators.
const TYPE_BP: u8 = 26;

impl Parser {
    /// Parse an expression using Pratt parsing.
    pub(super) fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_expr_bp(0)
    }

    /// Parse a type expression: `int`, `A?`, `A.B`, `list<int>`,
    /// `function<int, string>`. Syntactically a restricted expression;
    /// whether it actually names a type is checked semantically.
    pub(super) fn parse_type_expr(&mut self) -> Option<Expr> {
        self.parse_expr_bp(TYPE_BP)
    }

    /// True if the current token can start an expression; used to tell
    /// `return x` from a bare `return`.
    pub(super) fn can_start_expression(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
                | TokenKind::Identifier
                | TokenKind::This
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::List
                | TokenKind::Function
                | TokenKind::LeftParen
                | TokenKind::LeftBracket
                | TokenKind::Minus
                | TokenKind::Bang
        )
    }

    /// Core Pratt parser: parse an expression with a minimum binding power.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            lhs = self.parse_postfix(lhs)?;

            let op_kind = self.peek();
            let Some((left_bp, right_bp)) = infix_binding_power(op_kind) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }
            self.advance();

            // `value as Type` takes a type expression on the right.
            if op_kind == TokenKind::As {
                let target = self.parse_expr_bp(right_bp)?;
                let span = lhs.span.to(&target.span);
                lhs = Expr::new(
                    ExprKind::Cast {
                        target: Some(Box::new(target)),
                        value: Box::new(lhs),
                    },
                    span,
                );
                continue;
            }

            let op = token_to_binary_op(op_kind).unwrap();
            let rhs = self.parse_expr_bp(right_bp)?;
            let span = lhs.span.to(&rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
                span,
            );
        }

        Some(lhs)
    }

    /// Parse a prefix expression (unary or primary).
    fn parse_prefix(&mut self) -> Option<Expr> {
        let op = match self.peek() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.current_span();
            self.advance();
            let operand = self.parse_expr_bp(27)?;
            let span = start.to(&operand.span);
            return Some(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_primary()
    }

    /// Parse postfix operators: calls, indexing, member access, safe
    /// member access, and the nullable-type suffix `?`.
    fn parse_postfix(&mut self, mut lhs: Expr) -> Option<Expr> {
        loop {
            match self.peek() {
                TokenKind::LeftParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if self.peek() != TokenKind::RightParen {
                        loop {
                            args.push(self.parse_expression()?);
                            if !self.eat(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RightParen)?;
                    let span = lhs.span.to(&self.previous_span());
                    lhs = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(lhs),
                            args,
                            is_ctor: false,
                        },
                        span,
                    );
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RightBracket)?;
                    let span = lhs.span.to(&self.previous_span());
                    lhs = Expr::new(
                        ExprKind::Index {
                            object: Box::new(lhs),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot | TokenKind::QuestionDot => {
                    let safe = self.peek() == TokenKind::QuestionDot;
                    self.advance();
                    let name = self.expect(TokenKind::Identifier)?.lexeme.clone();
                    let span = lhs.span.to(&self.previous_span());
                    lhs = Expr::new(
                        ExprKind::Member {
                            object: Box::new(lhs),
                            name,
                            safe,
                        },
                        span,
                    );
                }
                TokenKind::Question => {
                    self.advance();
                    let span = lhs.span.to(&self.previous_span());
                    lhs = Expr::new(ExprKind::Nullable(Box::new(lhs)), span);
                }
                _ => return Some(lhs),
            }
        }
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let span = self.current_span();
        match self.peek() {
            TokenKind::IntLiteral => {
                let token = self.advance();
                let lexeme = token.lexeme.clone();
                let value = parse_int(&lexeme);
                if value.is_none() {
                    self.diagnostics
                        .error("integer literal is too large", span.clone());
                }
                Some(Expr::new(ExprKind::Int(value.unwrap_or(0)), span))
            }
            TokenKind::FloatLiteral => {
                let token = self.advance();
                let lexeme = token.lexeme.clone();
                let value = lexeme.parse::<f64>();
                if value.is_err() {
                    self.diagnostics
                        .error("invalid float literal", span.clone());
                }
                Some(Expr::new(ExprKind::Float(value.unwrap_or(0.0)), span))
            }
            TokenKind::StringLiteral => {
                let value = self.advance().lexeme.clone();
                Some(Expr::new(ExprKind::Str(value), span))
            }
            TokenKind::CharLiteral => {
                let value = self.advance().lexeme.chars().next().unwrap_or('\0');
                Some(Expr::new(ExprKind::Char(value), span))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::Bool(true), span))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::Bool(false), span))
            }
            TokenKind::Null => {
                self.advance();
                Some(Expr::new(ExprKind::Null, span))
            }
            TokenKind::This => {
                self.advance();
                Some(Expr::new(ExprKind::This, span))
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme.clone();
                Some(Expr::new(ExprKind::Ident(name), span))
            }
            TokenKind::List => self.parse_param_expr(ParamBase::List),
            TokenKind::Function => self.parse_param_expr(ParamBase::Function),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                Some(inner)
            }
            TokenKind::LeftBracket => self.parse_list_literal(span),
            kind => {
                self.error_here(format!("expected an expression, found {:?}", kind));
                None
            }
        }
    }

    /// `list<T>` / `function<R, A...>`. The type-parameter count is
    /// checked semantically, not here.
    fn parse_param_expr(&mut self, base: ParamBase) -> Option<Expr> {
        let start = self.current_span();
        self.advance();
        self.expect(TokenKind::Less)?;
        let mut type_params = Vec::new();
        if self.peek() != TokenKind::Greater && self.peek() != TokenKind::GreaterGreater {
            loop {
                type_params.push(self.parse_type_expr()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        if !self.close_type_list() {
            return None;
        }
        let span = start.to(&self.previous_span());
        Some(Expr::new(ExprKind::Param { base, type_params }, span))
    }

    fn parse_list_literal(&mut self, start: Span) -> Option<Expr> {
        self.advance();
        let mut items = Vec::new();
        if self.peek() != TokenKind::RightBracket {
            loop {
                items.push(self.parse_expression()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightBracket)?;
        let span = start.to(&self.previous_span());
        Some(Expr::new(ExprKind::ListLit(items), span))
    }
}

fn parse_int(lexeme: &str) -> Option<i64> {
    if let Some(hex) = lexeme.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else {
        lexeme.parse::<i64>().ok()
    }
}
