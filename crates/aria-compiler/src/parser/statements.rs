use crate::ast::*;
use crate::lexer::token::TokenKind;

use super::Parser;

impl Parser {
    /// Parse a single statement. Which statements are legal where is a
    /// semantic question; the parser accepts any statement anywhere.
    pub(super) fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.peek() {
            TokenKind::External => self.parse_external(),
            TokenKind::Class => self.parse_class(),
            TokenKind::Var => self.parse_var_inferred(),
            TokenKind::Static => self.parse_typed_def(true),
            TokenKind::If => self.parse_if().map(Stmt::If),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            // `list<...>` / `function<...>` can only open a declaration's
            // type; a bare identifier needs lookahead to tell `A x` from
            // an expression statement.
            TokenKind::List | TokenKind::Function => self.parse_typed_def(false),
            TokenKind::Identifier if self.looks_like_typed_def() => self.parse_typed_def(false),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Lookahead for `Type name ...` declaration heads of the shape
    /// `A name`, `A? name`, `A.B name`, `A.B? name`.
    fn looks_like_typed_def(&self) -> bool {
        let mut i = 1;
        while self.peek_at(i) == TokenKind::Dot && self.peek_at(i + 1) == TokenKind::Identifier {
            i += 2;
        }
        if self.peek_at(i) == TokenKind::Question {
            i += 1;
        }
        self.peek_at(i) == TokenKind::Identifier
    }

    fn parse_external(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let block = self.parse_block()?;
        let span = start.to(&self.previous_span());
        Some(Stmt::External(ExternalStmt { block, span }))
    }

    fn parse_class(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let name = self.expect(TokenKind::Identifier)?.lexeme.clone();
        let body = self.parse_block()?;
        let span = start.to(&self.previous_span());
        Some(Stmt::Class(ClassDef {
            name,
            body,
            symbol: None,
            span,
        }))
    }

    /// `var name = value`, with the type inferred from the initializer.
    fn parse_var_inferred(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let name = self.expect(TokenKind::Identifier)?.lexeme.clone();
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expression()?;
        let span = start.to(&value.span);
        Some(Stmt::Var(VarDef {
            name,
            declared_type: None,
            value: Some(value),
            symbol: None,
            span,
        }))
    }

    /// `[static] Type name ...`: a variable definition or, when a `(`
    /// follows the name, a function definition.
    fn parse_typed_def(&mut self, is_static: bool) -> Option<Stmt> {
        let start = self.current_span();
        if is_static {
            self.advance();
        }
        let ty = self.parse_type_expr()?;
        let name = self.expect(TokenKind::Identifier)?.lexeme.clone();

        if self.peek() == TokenKind::LeftParen {
            self.advance();
            let args = self.parse_args()?;
            let body = if self.peek() == TokenKind::LeftBrace {
                Some(self.parse_block()?)
            } else {
                None
            };
            let span = start.to(&self.previous_span());
            return Some(Stmt::Func(FuncDef {
                name,
                is_static,
                return_type: ty,
                args,
                body,
                symbol: None,
                span,
            }));
        }

        if is_static {
            self.error_here("expected '(' after static function name");
        }
        let value = if self.eat(TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let span = start.to(&self.previous_span());
        Some(Stmt::Var(VarDef {
            name,
            declared_type: Some(ty),
            value,
            symbol: None,
            span,
        }))
    }

    /// Parse the argument list after the opening `(`.
    fn parse_args(&mut self) -> Option<Vec<VarDef>> {
        let mut args = Vec::new();
        if self.eat(TokenKind::RightParen) {
            return Some(args);
        }
        loop {
            let ty = self.parse_type_expr()?;
            let name = self.expect(TokenKind::Identifier)?.lexeme.clone();
            // Defaults parse so the structural pass can reject them with
            // a useful location.
            let value = if self.eat(TokenKind::Equal) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            let span = ty.span.to(&self.previous_span());
            args.push(VarDef {
                name,
                declared_type: Some(ty),
                value,
                symbol: None,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Some(args)
    }

    fn parse_if(&mut self) -> Option<IfStmt> {
        let start = self.current_span();
        self.advance();
        let test = self.parse_expression()?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(TokenKind::Else) {
            if self.peek() == TokenKind::If {
                // `else if` becomes an else block holding the nested if.
                let nested = self.parse_if()?;
                let span = nested.span.clone();
                Some(Block::new(vec![Stmt::If(nested)], span))
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        let span = start.to(&self.previous_span());
        Some(IfStmt {
            test,
            then_block,
            else_block,
            span,
        })
    }

    fn parse_while(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let test = self.parse_expression()?;
        let block = self.parse_block()?;
        let span = start.to(&self.previous_span());
        Some(Stmt::While(WhileStmt { test, block, span }))
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let value = if self.can_start_expression() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let span = start.to(&self.previous_span());
        Some(Stmt::Return(ReturnStmt { value, span }))
    }

    fn parse_expr_stmt(&mut self) -> Option<Stmt> {
        if !self.can_start_expression() {
            self.error_here(format!("expected a statement, found {:?}", self.peek()));
            return None;
        }
        let expr = self.parse_expression()?;
        let span = expr.span.clone();
        Some(Stmt::Expr(ExprStmt { expr, span }))
    }

    pub(super) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(TokenKind::LeftBrace)?;
        let mut stmts = Vec::new();
        while self.peek() != TokenKind::RightBrace && !self.is_at_end() {
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
        }
        self.expect(TokenKind::RightBrace)?;
        let span = start.to(&self.previous_span());
        Some(Block::new(stmts, span))
    }
}
