use aria_common::DiagnosticBag;

use crate::ast::*;

use super::check::Checker;
use super::scope::{ScopeId, ScopeTree};
use super::types::Type;

/// Compute-symbol-types pass.
///
/// Evaluates the type expressions of every function signature and every
/// variable definition outside function bodies, and copies the results
/// into the symbols, so that bodies can be checked in any order in the
/// next pass. Function-local variables are deliberately left with the
/// error type: their types come from their declared types or
/// initializers during body checking, which is what makes local `var`
/// inference a single-pass affair.
pub fn run(module: &mut Module, scopes: &mut ScopeTree, diagnostics: &mut DiagnosticBag) {
    let Some(root) = module.block.scope else {
        return;
    };
    let mut checker = Checker::new(scopes, diagnostics);
    resolve_stmts(&mut checker, &mut module.block.stmts, root);
}

fn resolve_stmts(checker: &mut Checker, stmts: &mut [Stmt], scope: ScopeId) {
    for stmt in stmts {
        match stmt {
            Stmt::External(external) => {
                let inner = external.block.scope.unwrap_or(scope);
                resolve_stmts(checker, &mut external.block.stmts, inner);
            }
            Stmt::Class(class) => {
                let body_scope = class.body.scope.unwrap_or(scope);
                resolve_stmts(checker, &mut class.body.stmts, body_scope);
            }
            Stmt::Var(var) => resolve_var(checker, var, scope),
            Stmt::Func(func) => resolve_func(checker, func, scope),
            // Nothing else can define a symbol outside a function body.
            _ => {}
        }
    }
}

fn resolve_var(checker: &mut Checker, var: &mut VarDef, scope: ScopeId) {
    let Some(ref mut type_expr) = var.declared_type else {
        // A `var` definition here has no declared type to resolve; its
        // initializer types it during body checking.
        return;
    };
    let ty = checker.check_type(type_expr, scope, false);
    if let Some(id) = var.symbol {
        checker.set_symbol_type(id, ty);
    }
}

fn resolve_func(checker: &mut Checker, func: &mut FuncDef, scope: ScopeId) {
    let ret = checker.check_type(&mut func.return_type, scope, true);

    let mut params = Vec::with_capacity(func.args.len());
    for arg in &mut func.args {
        let ty = match arg.declared_type {
            Some(ref mut type_expr) => checker.check_type(type_expr, scope, false),
            None => Type::Error,
        };
        if let Some(id) = arg.symbol {
            checker.set_symbol_type(id, ty.clone());
        }
        params.push(ty);
    }

    if let Some(id) = func.symbol {
        checker.set_symbol_type(
            id,
            Type::Function {
                params,
                ret: Box::new(ret),
            },
        );
    }
}
