use aria_common::DiagnosticBag;

use crate::ast::visitor::{walk_block, walk_stmt, MutVisitor};
use crate::ast::*;

/// Structural-check pass.
///
/// Validates which statements may appear in which syntactic context and
/// the external-block rules, before any names or types exist:
///  - module top level: external, class, variable (uninitialized), function
///  - class body: class, variable, function
///  - function body: variable, expression, if, while, return
///  - external block: class, variable (uninitialized), function (bodiless)
///  - arguments never have default values
///
/// All violations are collected; nothing here aborts the walk, so the
/// user sees every structural error at once.
pub fn check(module: &mut Module, diagnostics: &mut DiagnosticBag) {
    let mut checker = StructureChecker {
        diagnostics,
        context: Context::default(),
    };
    checker.visit_module(module);
}

/// Flags describing the innermost enclosing constructs. Entering a
/// class, function body, or external block derives a child context that
/// resets `in_class`/`in_function` and then sets its own flag;
/// `in_external` is never cleared.
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    in_class: bool,
    in_external: bool,
    in_function: bool,
}

impl Context {
    fn enter_class(self) -> Context {
        Context {
            in_class: true,
            in_external: self.in_external,
            in_function: false,
        }
    }

    fn enter_function(self) -> Context {
        Context {
            in_class: false,
            in_external: self.in_external,
            in_function: true,
        }
    }

    fn enter_external(self) -> Context {
        Context {
            in_class: false,
            in_external: true,
            in_function: false,
        }
    }
}

struct StructureChecker<'d> {
    diagnostics: &'d mut DiagnosticBag,
    context: Context,
}

impl StructureChecker<'_> {
    fn check_allowed(&mut self, stmt: &Stmt) {
        let ctx = self.context;
        let (allowed, description) = match stmt {
            // Only the plain module top level may contain external blocks.
            Stmt::External(_) => (
                !ctx.in_class && !ctx.in_function && !ctx.in_external,
                "external block",
            ),
            Stmt::Class(_) => (!ctx.in_function, "class definition"),
            Stmt::Func(_) => (!ctx.in_function, "function definition"),
            Stmt::Var(_) => (true, "variable definition"),
            Stmt::If(_) => (ctx.in_function, "if statement"),
            Stmt::While(_) => (ctx.in_function, "while statement"),
            Stmt::Return(_) => (ctx.in_function, "return statement"),
            Stmt::Expr(_) => (ctx.in_function, "expression statement"),
        };
        if !allowed {
            let span = match stmt {
                Stmt::External(s) => &s.span,
                Stmt::Class(s) => &s.span,
                Stmt::Var(s) => &s.span,
                Stmt::Func(s) => &s.span,
                Stmt::If(s) => &s.span,
                Stmt::While(s) => &s.span,
                Stmt::Return(s) => &s.span,
                Stmt::Expr(s) => &s.span,
            };
            self.diagnostics
                .error(format!("{} is not allowed here", description), span.clone());
        }
    }
}

impl MutVisitor for StructureChecker<'_> {
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        self.check_allowed(stmt);
        walk_stmt(self, stmt);
    }

    fn visit_external_stmt(&mut self, stmt: &mut ExternalStmt) {
        let saved = self.context;
        self.context = saved.enter_external();
        walk_block(self, &mut stmt.block);
        self.context = saved;
    }

    fn visit_class_def(&mut self, def: &mut ClassDef) {
        let saved = self.context;
        self.context = saved.enter_class();
        walk_block(self, &mut def.body);
        self.context = saved;
    }

    fn visit_func_def(&mut self, def: &mut FuncDef) {
        for arg in &def.args {
            if let Some(ref default) = arg.value {
                self.diagnostics
                    .error("arguments cannot have default values", default.span.clone());
            }
        }

        if self.context.in_external {
            if let Some(ref body) = def.body {
                self.diagnostics.error(
                    "functions inside an external block cannot have a body",
                    body.span.clone(),
                );
            }
        } else if def.body.is_none() {
            self.diagnostics.error(
                format!("function {} must have a body", def.name),
                def.span.clone(),
            );
        }

        if let Some(ref mut body) = def.body {
            let saved = self.context;
            self.context = saved.enter_function();
            walk_block(self, body);
            self.context = saved;
        }
    }

    fn visit_var_def(&mut self, def: &mut VarDef) {
        // Initializers are forbidden at module scope and inside external
        // blocks; class fields and locals may have them.
        let ctx = self.context;
        let module_level = !ctx.in_class && !ctx.in_function && !ctx.in_external;
        if def.value.is_some() && (ctx.in_external || module_level) {
            self.diagnostics.error(
                "variables here cannot have an initializer",
                def.span.clone(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_module;

    fn check_source(source: &str) -> DiagnosticBag {
        let (mut module, diags) = parse_module(source, "test.aria");
        assert!(!diags.has_errors(), "parse failed: {:?}", diags.diagnostics());
        let mut bag = DiagnosticBag::new();
        check(&mut module, &mut bag);
        bag
    }

    fn error_messages(source: &str) -> Vec<String> {
        check_source(source)
            .errors()
            .map(|d| d.message.clone())
            .collect()
    }

    #[test]
    fn valid_module_shapes() {
        let bag = check_source(
            "external { void print(int x) int y }\n\
             class A { int x void f() { x = 1 } }\n\
             int g\n\
             void main() { var a = 1 if true { return } while false { } }\n",
        );
        assert!(!bag.has_errors(), "{:?}", bag.diagnostics());
    }

    #[test]
    fn statements_outside_functions() {
        assert_eq!(error_messages("return"), ["return statement is not allowed here"]);
        assert_eq!(
            error_messages("class A { if true { } }"),
            ["if statement is not allowed here"]
        );
        assert_eq!(
            error_messages("void f() { class B { } }"),
            ["class definition is not allowed here"]
        );
    }

    #[test]
    fn external_only_at_module_level() {
        assert_eq!(
            error_messages("class A { external { } }"),
            ["external block is not allowed here"]
        );
        assert_eq!(
            error_messages("external { external { } }"),
            ["external block is not allowed here"]
        );
    }

    #[test]
    fn module_variables_cannot_be_initialized() {
        assert_eq!(
            error_messages("int x = 1"),
            ["variables here cannot have an initializer"]
        );
        assert_eq!(
            error_messages("external { int x = 1 }"),
            ["variables here cannot have an initializer"]
        );
        assert!(error_messages("class A { int x = 1 }").is_empty());
    }

    #[test]
    fn external_functions_must_be_bodiless() {
        assert_eq!(
            error_messages("external { void f() { } }"),
            ["functions inside an external block cannot have a body"]
        );
        assert_eq!(
            error_messages("void f()"),
            ["function f must have a body"]
        );
    }

    #[test]
    fn no_default_arguments() {
        assert_eq!(
            error_messages("void f(int x = 1) { }"),
            ["arguments cannot have default values"]
        );
    }

    #[test]
    fn violations_accumulate() {
        let messages = error_messages("if true { } int x = 1 external { void f() { } }");
        assert_eq!(messages.len(), 3);
    }
}
