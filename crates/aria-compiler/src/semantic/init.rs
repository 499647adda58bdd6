use crate::ast::visitor::MutVisitor;
use crate::ast::*;

use super::scope::ScopeTree;
use super::types::Type;

/// Default-initialize pass.
///
/// Fills in an initializer for every variable definition that still has
/// none, so the back-end never sees an undefined variable: `false`,
/// `0`, `0.0`, `""`, and `null` for everything else. External
/// declarations and function arguments are left alone. The synthesized
/// literal sits at the definition's location and carries the declared
/// type.
pub fn run(module: &mut Module, scopes: &ScopeTree) {
    let mut initializer = Initializer { scopes };
    initializer.visit_module(module);
}

struct Initializer<'a> {
    scopes: &'a ScopeTree,
}

impl MutVisitor for Initializer<'_> {
    fn visit_external_stmt(&mut self, _stmt: &mut ExternalStmt) {}

    fn visit_func_def(&mut self, def: &mut FuncDef) {
        // Arguments are bound by the caller; only the body is walked.
        if let Some(ref mut body) = def.body {
            self.visit_block(body);
        }
    }

    fn visit_var_def(&mut self, def: &mut VarDef) {
        if def.value.is_some() {
            return;
        }
        let ty = def
            .symbol
            .map(|id| self.scopes.symbol(id).ty.clone())
            .unwrap_or(Type::Error);
        let kind = match ty {
            Type::Bool => ExprKind::Bool(false),
            Type::Int => ExprKind::Int(0),
            Type::Float => ExprKind::Float(0.0),
            Type::String => ExprKind::Str(String::new()),
            _ => ExprKind::Null,
        };
        let mut value = Expr::new(kind, def.span.clone());
        value.ty = ty;
        def.value = Some(value);
    }
}
