use std::collections::HashMap;

use aria_common::{DiagnosticBag, Span};

use crate::ast::visitor::{walk_expr, MutVisitor};
use crate::ast::*;

use super::scope::{ScopeTree, SymbolId};
use super::types::Type;

/// Flow-validation pass.
///
/// Operates only inside function bodies: warns about statements that
/// follow a return (once per block), requires every control path of a
/// non-void function to return a value, and reports locals that are
/// read before their definition statement runs.
pub fn run(module: &mut Module, scopes: &ScopeTree, diagnostics: &mut DiagnosticBag) {
    each_function(&mut module.block.stmts, &mut |func| {
        check_function(func, scopes, diagnostics);
    });
}

/// Visit every function definition with a body, including methods and
/// classes nested in external blocks.
fn each_function(stmts: &mut [Stmt], f: &mut impl FnMut(&mut FuncDef)) {
    for stmt in stmts {
        match stmt {
            Stmt::Func(func) => {
                if func.body.is_some() {
                    f(func);
                }
            }
            Stmt::Class(class) => each_function(&mut class.body.stmts, f),
            Stmt::External(external) => each_function(&mut external.block.stmts, f),
            _ => {}
        }
    }
}

/// Reachability state for one block of statements.
#[derive(Debug, Clone, Default)]
struct FlowState {
    did_return: bool,
    warned_dead: bool,
}

fn check_function(func: &mut FuncDef, scopes: &ScopeTree, diagnostics: &mut DiagnosticBag) {
    let mut flow = FlowChecker {
        scopes,
        diagnostics,
        uses: HashMap::new(),
    };

    let mut state = FlowState::default();
    if let Some(ref mut body) = func.body {
        flow.walk_block(body, &mut state);
    }

    let returns_value = func.symbol.is_some_and(|id| {
        matches!(
            &scopes.symbol(id).ty,
            Type::Function { ret, .. } if **ret != Type::Void && !ret.is_error()
        )
    });
    if returns_value && !state.did_return {
        diagnostics.error("not all control paths return a value", func.span.clone());
    }
}

struct FlowChecker<'a> {
    scopes: &'a ScopeTree,
    diagnostics: &'a mut DiagnosticBag,
    /// Identifier reads seen so far, per symbol; a definition statement
    /// turns any accumulated reads of its own symbol into errors.
    uses: HashMap<SymbolId, Vec<Span>>,
}

impl FlowChecker<'_> {
    fn walk_block(&mut self, block: &mut Block, state: &mut FlowState) {
        for stmt in &mut block.stmts {
            if state.did_return && !state.warned_dead {
                self.diagnostics.warning("dead code", stmt_span(stmt));
                state.warned_dead = true;
            }
            self.walk_stmt(stmt, state);
        }
    }

    fn walk_stmt(&mut self, stmt: &mut Stmt, state: &mut FlowState) {
        match stmt {
            Stmt::Var(var) => {
                if let Some(ref mut value) = var.value {
                    self.collect_uses(value);
                }
                if let Some(symbol) = var.symbol {
                    if let Some(sites) = self.uses.remove(&symbol) {
                        let name = self.scopes.symbol(symbol).name.clone();
                        for site in sites {
                            self.diagnostics
                                .error(format!("{} is used before it is defined", name), site);
                        }
                    }
                }
            }
            Stmt::Expr(stmt) => self.collect_uses(&mut stmt.expr),
            Stmt::Return(stmt) => {
                if let Some(ref mut value) = stmt.value {
                    self.collect_uses(value);
                }
                state.did_return = true;
            }
            Stmt::If(stmt) => {
                self.collect_uses(&mut stmt.test);
                let mut then_state = state.clone();
                self.walk_block(&mut stmt.then_block, &mut then_state);
                let mut else_returned = false;
                if let Some(ref mut else_block) = stmt.else_block {
                    let mut else_state = state.clone();
                    self.walk_block(else_block, &mut else_state);
                    else_returned = else_state.did_return;
                }
                // The parent only counts as returned when both branches do.
                state.did_return |= then_state.did_return && else_returned;
            }
            Stmt::While(stmt) => {
                self.collect_uses(&mut stmt.test);
                // The body may run zero times, so its returned-ness
                // never escapes the loop.
                let mut body_state = state.clone();
                self.walk_block(&mut stmt.block, &mut body_state);
            }
            // Structurally invalid inside a function; already reported.
            Stmt::Class(_) | Stmt::Func(_) | Stmt::External(_) => {}
        }
    }

    fn collect_uses(&mut self, expr: &mut Expr) {
        let mut collector = UseCollector {
            uses: &mut self.uses,
        };
        collector.visit_expr(expr);
    }
}

struct UseCollector<'a> {
    uses: &'a mut HashMap<SymbolId, Vec<Span>>,
}

impl MutVisitor for UseCollector<'_> {
    fn visit_expr(&mut self, expr: &mut Expr) {
        if let ExprKind::Ident(_) = expr.kind {
            if let Some(symbol) = expr.symbol {
                self.uses.entry(symbol).or_default().push(expr.span.clone());
            }
        }
        walk_expr(self, expr);
    }
}

fn stmt_span(stmt: &Stmt) -> Span {
    match stmt {
        Stmt::External(s) => s.span.clone(),
        Stmt::Class(s) => s.span.clone(),
        Stmt::Var(s) => s.span.clone(),
        Stmt::Func(s) => s.span.clone(),
        Stmt::If(s) => s.span.clone(),
        Stmt::While(s) => s.span.clone(),
        Stmt::Return(s) => s.span.clone(),
        Stmt::Expr(s) => s.span.clone(),
    }
}
