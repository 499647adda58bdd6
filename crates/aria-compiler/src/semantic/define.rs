use aria_common::{Diagnostic, DiagnosticBag, Span};

use crate::ast::*;

use super::scope::{ScopeId, ScopeKind, ScopeTree, Symbol, SymbolId, SymbolKind};
use super::types::Type;

/// Define-symbols pass.
///
/// Builds the scope tree and the initial symbol table: the module block
/// gets the root scope (seeded with the builtin type names), class
/// bodies get class scopes, function bodies get function scopes with
/// the arguments defined inside, external blocks share their parent's
/// scope, and every other block gets a local scope. Same-named function
/// definitions fold into overload sets; any other collision is a
/// redefinition error.
///
/// Symbols start with the error type except classes, which get their
/// meta type right away so that mutually-referencing signatures resolve
/// in the next pass.
pub fn run(module: &mut Module, scopes: &mut ScopeTree, diagnostics: &mut DiagnosticBag) {
    let root = scopes.add_scope(ScopeKind::Module, None);
    seed_builtin_types(scopes, root);
    module.block.scope = Some(root);

    let mut definer = Definer {
        scopes,
        diagnostics,
    };
    definer.define_stmts(&mut module.block.stmts, root);
}

/// The names every module can see: the primitive type names. They are
/// ordinary (generated) symbols so that lookup, redefinition checking,
/// and renaming treat them like anything else.
fn seed_builtin_types(scopes: &mut ScopeTree, root: ScopeId) {
    let builtins = [
        ("void", Type::Void),
        ("bool", Type::Bool),
        ("int", Type::Int),
        ("float", Type::Float),
        ("string", Type::String),
    ];
    for (name, ty) in builtins {
        let symbol = Symbol::new(name, SymbolKind::Class, Span::generated())
            .with_static(true)
            .with_type(Type::meta(ty));
        let _ = scopes.define(root, symbol);
    }
}

struct Definer<'a> {
    scopes: &'a mut ScopeTree,
    diagnostics: &'a mut DiagnosticBag,
}

impl Definer<'_> {
    fn define_stmts(&mut self, stmts: &mut [Stmt], scope: ScopeId) {
        for stmt in stmts {
            match stmt {
                Stmt::External(external) => {
                    // External blocks do not introduce a scope.
                    external.block.scope = Some(scope);
                    self.define_stmts(&mut external.block.stmts, scope);
                }
                Stmt::Class(class) => self.define_class(class, scope),
                Stmt::Var(var) => {
                    var.symbol =
                        Some(self.define_symbol(scope, Symbol::new(&var.name, SymbolKind::Variable, var.span.clone())));
                }
                Stmt::Func(func) => self.define_func(func, scope),
                Stmt::If(stmt) => {
                    self.define_local_block(&mut stmt.then_block, scope);
                    if let Some(ref mut else_block) = stmt.else_block {
                        self.define_local_block(else_block, scope);
                    }
                }
                Stmt::While(stmt) => self.define_local_block(&mut stmt.block, scope),
                Stmt::Return(_) | Stmt::Expr(_) => {}
            }
        }
    }

    fn define_class(&mut self, class: &mut ClassDef, scope: ScopeId) {
        let body_scope = self.scopes.add_scope(ScopeKind::Class, Some(scope));
        class.body.scope = Some(body_scope);

        let mut symbol = Symbol::new(&class.name, SymbolKind::Class, class.span.clone())
            .with_static(true);
        symbol.scope = Some(body_scope);
        let id = self.define_symbol(scope, symbol);
        self.scopes.symbol_mut(id).ty = Type::meta(Type::Class(id));
        class.symbol = Some(id);

        self.define_stmts(&mut class.body.stmts, body_scope);
    }

    fn define_func(&mut self, func: &mut FuncDef, scope: ScopeId) {
        let symbol = Symbol::new(&func.name, SymbolKind::Function, func.span.clone())
            .with_static(func.is_static);
        func.symbol = Some(self.define_symbol(scope, symbol));

        // Arguments live inside the body scope, not the enclosing one.
        // A bodiless function still gets a throwaway scope so that
        // duplicate arguments are reported.
        let body_scope = self.scopes.add_scope(ScopeKind::Func, Some(scope));
        for arg in &mut func.args {
            arg.symbol = Some(
                self.define_symbol(body_scope, Symbol::new(&arg.name, SymbolKind::Variable, arg.span.clone())),
            );
        }

        if let Some(ref mut body) = func.body {
            body.scope = Some(body_scope);
            self.define_stmts(&mut body.stmts, body_scope);
        }
    }

    fn define_local_block(&mut self, block: &mut Block, scope: ScopeId) {
        let local = self.scopes.add_scope(ScopeKind::Local, Some(scope));
        block.scope = Some(local);
        self.define_stmts(&mut block.stmts, local);
    }

    /// Define a symbol, reporting a redefinition error on clash. The
    /// definition always gets a symbol of its own either way, so later
    /// passes never see an undecorated definition.
    fn define_symbol(&mut self, scope: ScopeId, symbol: Symbol) -> SymbolId {
        let name = symbol.name.clone();
        let span = symbol.span.clone();
        match self.scopes.define(scope, symbol.clone()) {
            Ok(id) => id,
            Err(existing) => {
                let previous = self.scopes.symbol(existing).span.clone();
                self.diagnostics.report(
                    Diagnostic::error(format!("redefinition of {} in the same scope", name))
                        .with_span(span)
                        .with_related(previous, "previous definition is here"),
                );
                self.scopes.add_symbol(symbol)
            }
        }
    }
}
