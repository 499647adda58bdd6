//! End-to-end tests for the semantic pipeline: literal sources through
//! the real lexer and parser, then `semantic::analyze`.

use aria_common::DiagnosticBag;
use aria_compiler::ast::*;
use aria_compiler::parser::parse_module;
use aria_compiler::semantic::scope::{LookupKind, SymbolKind};
use aria_compiler::semantic::types::Type;
use aria_compiler::semantic::{analyze, Analysis};

fn compile(source: &str) -> (Module, Analysis, DiagnosticBag) {
    let (mut module, mut diagnostics) = parse_module(source, "test.aria");
    assert!(
        !diagnostics.has_errors(),
        "parse failed: {:?}",
        diagnostics.diagnostics()
    );
    let analysis = analyze(&mut module, &mut diagnostics);
    (module, analysis, diagnostics)
}

fn compile_ok(source: &str) -> (Module, Analysis) {
    let (module, analysis, diagnostics) = compile(source);
    assert!(
        analysis.ok,
        "expected success, got: {:?}",
        diagnostics.diagnostics()
    );
    (module, analysis)
}

fn errors(source: &str) -> Vec<String> {
    let (_, _, diagnostics) = compile(source);
    diagnostics.errors().map(|d| d.message.clone()).collect()
}

fn warnings(source: &str) -> Vec<String> {
    let (_, _, diagnostics) = compile(source);
    diagnostics.warnings().map(|d| d.message.clone()).collect()
}

/// The statements of the body of the `index`th top-level function.
fn func_body(module: &Module, index: usize) -> &[Stmt] {
    let Stmt::Func(func) = &module.block.stmts[index] else {
        panic!("statement {} is not a function", index);
    };
    &func.body.as_ref().expect("function has a body").stmts
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn s1_overload_selection_without_casts() {
    let source = "external { void print(int x) void print(float x) }\n\
                  void main() { print(1) print(1.0) }\n";
    let (module, analysis) = compile_ok(source);
    let body = func_body(&module, 1);

    let mut param_types = Vec::new();
    for stmt in body {
        let Stmt::Expr(stmt) = stmt else { panic!() };
        let ExprKind::Call { callee, args, .. } = &stmt.expr.kind else {
            panic!()
        };
        // no cast was inserted at either call site
        assert!(!matches!(args[0].kind, ExprKind::Cast { .. }));
        let symbol = analysis.scopes.symbol(callee.symbol.unwrap());
        assert_eq!(symbol.kind, SymbolKind::Function);
        let Type::Function { params, .. } = &symbol.ty else {
            panic!()
        };
        param_types.push(params[0].clone());
    }
    // the two call sites picked different overloads
    assert_eq!(param_types[0], Type::Int);
    assert_eq!(param_types[1], Type::Float);
}

#[test]
fn s2_implicit_int_to_float_argument_cast() {
    let source = "external { void f(float x) }\nvoid main() { f(3) }\n";
    let (module, _) = compile_ok(source);
    let body = func_body(&module, 1);
    let Stmt::Expr(stmt) = &body[0] else { panic!() };
    let ExprKind::Call { args, .. } = &stmt.expr.kind else {
        panic!()
    };
    assert_eq!(args[0].ty, Type::Float);
    let ExprKind::Cast { target, value } = &args[0].kind else {
        panic!("argument was not wrapped in a cast");
    };
    assert!(target.is_none());
    assert!(matches!(value.kind, ExprKind::Int(3)));
}

#[test]
fn s3_nullable_member_access_is_rejected_without_narrowing() {
    // `if a != null` does not narrow `A?` to `A`.
    let source = "class A { int x }\n\
                  void main() { A? a = null if a != null { int y = a.x } }\n";
    assert_eq!(
        errors(source),
        ["cannot access member x on value of type A?"]
    );
}

#[test]
fn s4_redefinition_halts_after_symbol_definition() {
    let source = "void f() {} int f\n";
    let (_, analysis, diagnostics) = compile(source);
    assert!(!analysis.ok);
    let messages: Vec<_> = diagnostics.errors().map(|d| d.message.clone()).collect();
    assert_eq!(messages, ["redefinition of f in the same scope"]);
}

#[test]
fn s5_dead_code_and_missing_return() {
    let source = "int main() { return 1 int x = 2 }\nint f() {}\n";
    let (_, analysis, diagnostics) = compile(source);
    assert!(!analysis.ok);
    let errs: Vec<_> = diagnostics.errors().map(|d| d.message.clone()).collect();
    let warns: Vec<_> = diagnostics.warnings().map(|d| d.message.clone()).collect();
    assert_eq!(errs, ["not all control paths return a value"]);
    assert_eq!(warns, ["dead code"]);
    // the warning points at the declaration of x
    let warning = diagnostics.warnings().next().unwrap();
    assert_eq!(warning.span.as_ref().unwrap().line, 1);
}

#[test]
fn s6_constructor_call() {
    let source = "class V { int x }\nvoid main() { V v = V() }\n";
    let (module, analysis) = compile_ok(source);
    let body = func_body(&module, 1);
    let Stmt::Var(var) = &body[0] else { panic!() };
    let value = var.value.as_ref().unwrap();
    let ExprKind::Call { is_ctor, .. } = &value.kind else {
        panic!()
    };
    assert!(is_ctor);

    let root = module.block.scope.unwrap();
    let class = analysis
        .scopes
        .lookup(root, "V", LookupKind::Normal)
        .unwrap();
    assert_eq!(value.ty, Type::Class(class));
}

// ============================================================================
// Invariants
// ============================================================================

fn walk_exprs<'a>(stmts: &'a [Stmt], f: &mut impl FnMut(&'a Expr)) {
    fn expr<'a>(e: &'a Expr, f: &mut impl FnMut(&'a Expr)) {
        f(e);
        match &e.kind {
            ExprKind::Member { object, .. } => expr(object, f),
            ExprKind::Index { object, index } => {
                expr(object, f);
                expr(index, f);
            }
            ExprKind::Call { callee, args, .. } => {
                expr(callee, f);
                for a in args {
                    expr(a, f);
                }
            }
            ExprKind::Unary { operand, .. } => expr(operand, f),
            ExprKind::Binary { left, right, .. } => {
                expr(left, f);
                expr(right, f);
            }
            ExprKind::Cast { target, value } => {
                if let Some(t) = target {
                    expr(t, f);
                }
                expr(value, f);
            }
            ExprKind::ListLit(items) => {
                for i in items {
                    expr(i, f);
                }
            }
            ExprKind::Nullable(inner) => expr(inner, f),
            ExprKind::Param { type_params, .. } => {
                for p in type_params {
                    expr(p, f);
                }
            }
            _ => {}
        }
    }
    fn block<'a>(b: &'a Block, f: &mut impl FnMut(&'a Expr)) {
        walk_stmts(&b.stmts, f);
    }
    fn walk_stmts<'a>(list: &'a [Stmt], f: &mut impl FnMut(&'a Expr)) {
        for s in list {
            match s {
                Stmt::External(s) => block(&s.block, f),
                Stmt::Class(s) => block(&s.body, f),
                Stmt::Var(s) => {
                    if let Some(t) = &s.declared_type {
                        expr(t, f);
                    }
                    if let Some(v) = &s.value {
                        expr(v, f);
                    }
                }
                Stmt::Func(s) => {
                    expr(&s.return_type, f);
                    for a in &s.args {
                        if let Some(t) = &a.declared_type {
                            expr(t, f);
                        }
                    }
                    if let Some(b) = &s.body {
                        block(b, f);
                    }
                }
                Stmt::If(s) => {
                    expr(&s.test, f);
                    block(&s.then_block, f);
                    if let Some(e) = &s.else_block {
                        block(e, f);
                    }
                }
                Stmt::While(s) => {
                    expr(&s.test, f);
                    block(&s.block, f);
                }
                Stmt::Return(s) => {
                    if let Some(v) = &s.value {
                        expr(v, f);
                    }
                }
                Stmt::Expr(s) => expr(&s.expr, f),
            }
        }
    }
    walk_stmts(stmts, f)
}

/// One program exercising most of the pipeline, shared by the
/// invariant tests.
const RICH_PROGRAM: &str = "\
external { void print(int x) void print(float x) void log(string s) }\n\
class Point {\n\
    int x\n\
    int y\n\
    int sum() { return this.x + this.y }\n\
    static Point origin() { return Point() }\n\
}\n\
int total\n\
float scale(int value, float factor) { return value * factor }\n\
void main() {\n\
    Point p = Point.origin()\n\
    int s = p.sum()\n\
    print(s)\n\
    print(1.0)\n\
    float f = scale(2, 1.5)\n\
    list<int> xs = [1, 2, 3]\n\
    int first = xs[0]\n\
    float? partial = null\n\
    var inferred = partial ?? 0.0\n\
    if inferred > 1.0 { log(\"big\") }\n\
}\n";

#[test]
fn i1_every_block_has_a_scope_and_every_def_a_symbol() {
    let (module, _) = compile_ok(RICH_PROGRAM);

    fn check_blocks(stmts: &[Stmt]) {
        for s in stmts {
            match s {
                Stmt::External(s) => {
                    assert!(s.block.scope.is_some());
                    check_blocks(&s.block.stmts);
                }
                Stmt::Class(s) => {
                    assert!(s.symbol.is_some());
                    assert!(s.body.scope.is_some());
                    check_blocks(&s.body.stmts);
                }
                Stmt::Var(s) => assert!(s.symbol.is_some()),
                Stmt::Func(s) => {
                    assert!(s.symbol.is_some());
                    for a in &s.args {
                        assert!(a.symbol.is_some());
                    }
                    if let Some(b) = &s.body {
                        assert!(b.scope.is_some());
                        check_blocks(&b.stmts);
                    }
                }
                Stmt::If(s) => {
                    assert!(s.then_block.scope.is_some());
                    check_blocks(&s.then_block.stmts);
                    if let Some(e) = &s.else_block {
                        assert!(e.scope.is_some());
                        check_blocks(&e.stmts);
                    }
                }
                Stmt::While(s) => {
                    assert!(s.block.scope.is_some());
                    check_blocks(&s.block.stmts);
                }
                _ => {}
            }
        }
    }
    assert!(module.block.scope.is_some());
    check_blocks(&module.block.stmts);
}

#[test]
fn i2_signature_symbols_are_typed() {
    let (module, analysis) = compile_ok(RICH_PROGRAM);
    let root = module.block.scope.unwrap();
    for name in ["total", "scale"] {
        let id = analysis
            .scopes
            .lookup(root, name, LookupKind::Normal)
            .unwrap();
        let ty = &analysis.scopes.symbol(id).ty;
        assert!(!ty.is_error(), "{} has error type", name);
        assert!(!ty.is_meta(), "{} has meta type", name);
    }
}

#[test]
fn i3_no_overloaded_types_survive_and_function_refs_are_specific() {
    let (module, analysis) = compile_ok(RICH_PROGRAM);
    walk_exprs(&module.block.stmts, &mut |e| {
        assert!(
            !matches!(e.ty, Type::Overloaded(_)),
            "overloaded type survived at {:?}",
            e.span
        );
        if let Some(id) = e.symbol {
            assert_ne!(
                analysis.scopes.symbol(id).kind,
                SymbolKind::OverloadedFunction,
                "unresolved overload reference at {:?}",
                e.span
            );
        }
    });
}

#[test]
fn i5_all_non_external_variables_are_initialized() {
    let (module, _) = compile_ok(RICH_PROGRAM);

    fn check(stmts: &[Stmt], in_external: bool) {
        for s in stmts {
            match s {
                Stmt::External(s) => check(&s.block.stmts, true),
                Stmt::Class(s) => check(&s.body.stmts, in_external),
                Stmt::Var(s) => {
                    if !in_external {
                        assert!(s.value.is_some(), "{} is uninitialized", s.name);
                    }
                }
                Stmt::Func(s) => {
                    if let Some(b) = &s.body {
                        check(&b.stmts, in_external);
                    }
                }
                Stmt::If(s) => {
                    check(&s.then_block.stmts, in_external);
                    if let Some(e) = &s.else_block {
                        check(&e.stmts, in_external);
                    }
                }
                Stmt::While(s) => check(&s.block.stmts, in_external),
                _ => {}
            }
        }
    }
    check(&module.block.stmts, false);
}

#[test]
fn i6_repeated_compilation_is_deterministic() {
    let (module_a, analysis_a) = compile_ok(RICH_PROGRAM);
    let (module_b, analysis_b) = compile_ok(RICH_PROGRAM);
    assert_eq!(format!("{:?}", module_a), format!("{:?}", module_b));
    assert_eq!(
        format!("{:?}", analysis_a.scopes),
        format!("{:?}", analysis_b.scopes)
    );
}

#[test]
fn i7_errors_are_monotonic() {
    let base = "void main() { missing() }\n";
    let extended = "void main() { missing() bool b = \"s\" }\n";
    let base_errors = errors(base);
    let extended_errors = errors(extended);
    for message in &base_errors {
        assert!(
            extended_errors.contains(message),
            "adding a bad statement hid: {}",
            message
        );
    }
    assert!(extended_errors.len() > base_errors.len());
}

// ============================================================================
// Type checking behavior
// ============================================================================

#[test]
fn return_value_conversion_inserts_cast() {
    let (module, _) = compile_ok("float f() { return 1 }");
    let body = func_body(&module, 0);
    let Stmt::Return(ret) = &body[0] else { panic!() };
    let value = ret.value.as_ref().unwrap();
    assert!(matches!(value.kind, ExprKind::Cast { .. }));
    assert_eq!(value.ty, Type::Float);
}

#[test]
fn variable_initializer_conversion_inserts_cast() {
    let (module, _) = compile_ok("class A { float y = 1 }");
    let Stmt::Class(class) = &module.block.stmts[0] else {
        panic!()
    };
    let Stmt::Var(var) = &class.body.stmts[0] else {
        panic!()
    };
    assert!(matches!(
        var.value.as_ref().unwrap().kind,
        ExprKind::Cast { .. }
    ));
}

#[test]
fn null_assignment_to_nullable_casts_up() {
    let (module, _) = compile_ok("class A { } void f() { A? a = null }");
    let body = func_body(&module, 1);
    let Stmt::Var(var) = &body[0] else { panic!() };
    let value = var.value.as_ref().unwrap();
    assert!(matches!(value.kind, ExprKind::Cast { .. }));
    assert!(matches!(value.ty, Type::Nullable(_)));
}

#[test]
fn char_literal_is_an_int() {
    let (module, _) = compile_ok("void f() { int c = 'a' }");
    let body = func_body(&module, 0);
    let Stmt::Var(var) = &body[0] else { panic!() };
    // already an int: no cast needed
    let value = var.value.as_ref().unwrap();
    assert!(matches!(value.kind, ExprKind::Char('a')));
    assert_eq!(value.ty, Type::Int);
}

#[test]
fn safe_dereference_produces_nullable() {
    let (module, _) = compile_ok(
        "class A { int x } void f(A? a) { int? y = a?.x }",
    );
    let body = func_body(&module, 1);
    let Stmt::Var(var) = &body[0] else { panic!() };
    let value = var.value.as_ref().unwrap();
    assert_eq!(value.ty, Type::nullable(Type::Int));
}

#[test]
fn safe_dereference_requires_nullable() {
    assert_eq!(
        errors("class A { int x } void f(A a) { int x = a?.x }"),
        ["operator '?.' requires a nullable value, found A"]
    );
}

#[test]
fn static_members_are_reached_through_the_class() {
    compile_ok(
        "class A { static int f() { return 1 } } void main() { int x = A.f() }",
    );
    assert_eq!(
        errors("class A { int f() { return 1 } } void main() { int x = A.f() }"),
        ["member f of class A is not static"]
    );
    assert_eq!(
        errors(
            "class A { static int f() { return 1 } } void main() { A a = A() int x = a.f() }"
        ),
        ["member f of class A is static"]
    );
}

#[test]
fn members_are_not_in_lexical_scope() {
    assert_eq!(
        errors("class A { int x int get() { return x } }"),
        ["undefined identifier x"]
    );
}

#[test]
fn this_placement_rules() {
    compile_ok("class A { int x int get() { return this.x } }");
    assert_eq!(
        errors("class A { static int f() { return this.x } }"),
        ["cannot use this inside a static function"]
    );
    assert_eq!(
        errors("void f() { var t = this }"),
        ["cannot use this outside a member function"]
    );
}

#[test]
fn numeric_casts_are_explicit_only() {
    compile_ok("void f() { int x = 3.5 as int }");
    assert_eq!(
        errors("void f() { int x = 3.5 }"),
        ["cannot assign value of type float to int"]
    );
    assert_eq!(
        errors("void f() { int x = \"s\" as int }"),
        ["cannot cast from string to int"]
    );
}

#[test]
fn list_literals_need_a_target_type() {
    compile_ok("void f() { list<float> xs = [1, 2.5] }");
    assert_eq!(
        errors("void f() { var xs = [1, 2, 3] }"),
        ["cannot determine the type of this list literal"]
    );
    assert_eq!(
        errors("void f() { list<int> xs = [1, 2.5] }"),
        ["cannot convert list item from float to int"]
    );
}

#[test]
fn list_literal_items_are_widened() {
    let (module, _) = compile_ok("void f() { list<float> xs = [1, 2.5] }");
    let body = func_body(&module, 0);
    let Stmt::Var(var) = &body[0] else { panic!() };
    let ExprKind::ListLit(items) = &var.value.as_ref().unwrap().kind else {
        panic!()
    };
    assert!(matches!(items[0].kind, ExprKind::Cast { .. }));
    assert!(matches!(items[1].kind, ExprKind::Float(_)));
}

#[test]
fn indexing_rules() {
    compile_ok("void f(list<string> xs) { string s = xs[0] }");
    assert_eq!(
        errors("void f(list<string> xs) { string s = xs[\"k\"] }"),
        ["index must be of type int, found string"]
    );
    assert_eq!(
        errors("void f() { int x = 1 int y = x[0] }"),
        ["cannot index a value of type int"]
    );
}

#[test]
fn conditions_must_be_bool() {
    assert_eq!(
        errors("void f() { if 1 { } }"),
        ["condition of if statement must be bool, found int"]
    );
    assert_eq!(
        errors("void f() { while 1 { } }"),
        ["condition of while statement must be bool, found int"]
    );
}

#[test]
fn meta_expressions_are_not_statements() {
    assert_eq!(
        errors("void f() { int }"),
        ["a type cannot be used as a statement"]
    );
    assert_eq!(
        errors("void f() { int = 3 }"),
        ["cannot assign to a type"]
    );
}

#[test]
fn var_inference_rejects_null_and_void() {
    assert_eq!(
        errors("void f() { var x = null }"),
        ["cannot infer a type from a value of type null"]
    );
    assert_eq!(
        errors("external { void g() } void f() { var x = g() }"),
        ["cannot infer a type from a value of type void"]
    );
}

#[test]
fn null_default_operator() {
    let (module, _) = compile_ok("void f(float? a) { float x = a ?? 1 }");
    let body = func_body(&module, 0);
    let Stmt::Var(var) = &body[0] else { panic!() };
    let ExprKind::Binary { right, .. } = &var.value.as_ref().unwrap().kind else {
        panic!()
    };
    // the int default was widened into the nullable's inner type
    assert!(matches!(right.kind, ExprKind::Cast { .. }));
    assert_eq!(var.value.as_ref().unwrap().ty, Type::Float);

    assert_eq!(
        errors("void f(int a) { int x = a ?? 1 }"),
        ["operator '??' requires a nullable left operand, found int"]
    );
}

#[test]
fn overload_resolution_errors() {
    let decls = "external { void f(int x) void f(float x) }";
    assert_eq!(
        errors(&format!("{} void main() {{ f(\"s\") }}", decls)),
        ["cannot call f with arguments of type (string)"]
    );
    assert_eq!(
        errors(&format!("{} void main() {{ var g = f }}", decls)),
        ["cannot resolve overloaded function without context"]
    );

    let ambiguous =
        "external { void g(float a, int b) void g(int a, float b) } void main() { g(1, 2) }";
    assert_eq!(
        errors(ambiguous),
        ["multiple overloads of g match arguments of type (int, int)"]
    );
}

#[test]
fn constructor_takes_no_arguments() {
    assert_eq!(
        errors("class V { } void f() { var v = V(1) }"),
        ["expected 0 argument(s), found 1"]
    );
}

#[test]
fn call_arity_and_conversion_errors() {
    assert_eq!(
        errors("external { void f(int a, int b) } void main() { f(1) }"),
        ["expected 2 argument(s), found 1"]
    );
    assert_eq!(
        errors("external { void f(int a) } void main() { f(\"s\") }"),
        ["cannot convert argument 1 from string to int"]
    );
    assert_eq!(
        errors("void main() { int x = 1 x() }"),
        ["cannot call value of type int"]
    );
}

#[test]
fn type_parameter_arity() {
    assert_eq!(
        errors("list<int, int> xs"),
        ["list takes exactly 1 type parameter"]
    );
    assert_eq!(
        errors("external { function<> f }"),
        ["function takes at least 1 type parameter"]
    );
}

#[test]
fn function_typed_values_are_callable() {
    compile_ok(
        "external { function<int, string> parse }\n\
         void main() { int n = parse(\"42\") }",
    );
    assert_eq!(
        errors(
            "external { function<int, string> parse }\n\
             void main() { int n = parse(1) }"
        ),
        ["cannot convert argument 1 from int to string"]
    );
}

#[test]
fn operator_type_errors_name_both_sides() {
    assert_eq!(
        errors("void f() { bool b = 1 && true }"),
        ["operator '&&' cannot be applied to int and bool"]
    );
    assert_eq!(
        errors("void f() { string s = \"a\" - \"b\" }"),
        ["operator '-' cannot be applied to string and string"]
    );
    assert_eq!(
        errors("void f() { int x = 1 << 2.0 }"),
        ["operator '<<' cannot be applied to int and float"]
    );
}

#[test]
fn arithmetic_widening_inserts_cast_on_narrow_side() {
    let (module, _) = compile_ok("void f() { float x = 1 + 2.0 }");
    let body = func_body(&module, 0);
    let Stmt::Var(var) = &body[0] else { panic!() };
    let ExprKind::Binary { left, right, .. } = &var.value.as_ref().unwrap().kind else {
        panic!()
    };
    assert!(matches!(left.kind, ExprKind::Cast { .. }));
    assert_eq!(left.ty, Type::Float);
    assert!(matches!(right.kind, ExprKind::Float(_)));
}

#[test]
fn error_types_do_not_cascade() {
    // `missing` is undefined; everything built on top of it stays quiet.
    assert_eq!(
        errors("void f() { var x = missing + 1 missing2(x) }"),
        ["undefined identifier missing", "undefined identifier missing2"]
    );
}

// ============================================================================
// Flow validation behavior
// ============================================================================

#[test]
fn both_branches_returning_satisfies_the_checker() {
    compile_ok("int f(bool b) { if b { return 1 } else { return 2 } }");
    assert_eq!(
        errors("int f(bool b) { if b { return 1 } }"),
        ["not all control paths return a value"]
    );
}

#[test]
fn while_loops_do_not_count_as_returning() {
    assert_eq!(
        errors("int f() { while true { return 1 } }"),
        ["not all control paths return a value"]
    );
}

#[test]
fn dead_code_is_warned_once_per_block() {
    let warns = warnings("int f() { return 1 int a = 2 int b = 3 }");
    assert_eq!(warns, ["dead code"]);
}

#[test]
fn use_before_definition_is_reported_at_the_use() {
    let source = "void f() { x = 1 int x }";
    let (_, _, diagnostics) = compile(source);
    let messages: Vec<_> = diagnostics.errors().map(|d| d.message.clone()).collect();
    assert_eq!(messages, ["x is used before it is defined"]);
    let error = diagnostics.errors().next().unwrap();
    // points at the use site, not the definition
    assert_eq!(error.span.as_ref().unwrap().column, 12);
}

#[test]
fn return_value_mismatches() {
    assert_eq!(
        errors("void f() { return 1 }"),
        ["cannot return a value from a void function"]
    );
    assert_eq!(
        errors("int f() { return }"),
        ["must return a value of type int"]
    );
    assert_eq!(
        errors("int f() { return \"s\" }"),
        ["cannot convert return value from string to int"]
    );
}
