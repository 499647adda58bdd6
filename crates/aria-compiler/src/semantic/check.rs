use aria_common::{DiagnosticBag, Span};

use crate::ast::*;

use super::operators::{check_binary_op, BinaryOutcome, Side};
use super::overloads::{resolve_overload, ResolveError};
use super::scope::{LookupKind, ScopeId, ScopeTree, SymbolId, SymbolKind};
use super::types::Type;

/// Compute-types pass: one bidirectional walk that types every
/// expression, resolves member lookups and overloads, materializes
/// implicit conversions as cast nodes, and detects constructor calls.
pub fn run(module: &mut Module, scopes: &mut ScopeTree, diagnostics: &mut DiagnosticBag) {
    let Some(root) = module.block.scope else {
        return;
    };
    let mut checker = Checker::new(scopes, diagnostics);
    checker.check_stmts(&mut module.block.stmts, root);
}

/// Context threaded top-down through expression checking. It is
/// single-consumer: each expression reads it once and recurses into
/// children with a fresh default, so sibling evaluations can never see
/// each other's context.
#[derive(Debug, Default)]
pub(super) struct ExprCtx {
    /// Expected type of the expression; drives inference into list
    /// literals, cast values, return values, assignments, initializers,
    /// and the arguments of non-overloaded calls.
    target: Option<Type>,
    /// Call-site argument types; drives overload resolution when
    /// checking the callee of a call.
    args: Option<Vec<Type>>,
}

impl ExprCtx {
    fn with_target(target: Type) -> Self {
        Self {
            target: Some(target),
            args: None,
        }
    }

    fn with_args(args: Vec<Type>) -> Self {
        Self {
            target: None,
            args: Some(args),
        }
    }
}

pub(super) struct Checker<'a> {
    scopes: &'a mut ScopeTree,
    diagnostics: &'a mut DiagnosticBag,
    /// Return type of the enclosing function body, if any.
    return_type: Option<Type>,
    /// The enclosing class while walking a class body.
    current_class: Option<SymbolId>,
    in_function: bool,
    in_static: bool,
}

impl<'a> Checker<'a> {
    pub(super) fn new(scopes: &'a mut ScopeTree, diagnostics: &'a mut DiagnosticBag) -> Self {
        Self {
            scopes,
            diagnostics,
            return_type: None,
            current_class: None,
            in_function: false,
            in_static: false,
        }
    }

    fn error(&mut self, span: &Span, message: impl Into<String>) {
        self.diagnostics.error(message, span.clone());
    }

    pub(super) fn set_symbol_type(&mut self, id: SymbolId, ty: Type) {
        self.scopes.symbol_mut(id).ty = ty;
    }

    fn name_of(&self, ty: &Type) -> String {
        ty.display_name(self.scopes)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn check_stmts(&mut self, stmts: &mut [Stmt], scope: ScopeId) {
        for stmt in stmts {
            self.check_stmt(stmt, scope);
        }
    }

    fn check_stmt(&mut self, stmt: &mut Stmt, scope: ScopeId) {
        match stmt {
            Stmt::External(external) => {
                let inner = external.block.scope.unwrap_or(scope);
                self.check_stmts(&mut external.block.stmts, inner);
            }
            Stmt::Class(class) => {
                let saved = self.current_class;
                self.current_class = class.symbol;
                let body_scope = class.body.scope.unwrap_or(scope);
                self.check_stmts(&mut class.body.stmts, body_scope);
                self.current_class = saved;
            }
            Stmt::Func(func) => self.check_func_def(func),
            Stmt::Var(var) => self.check_var_def(var, scope),
            Stmt::If(stmt) => {
                let ty = self.check_expr(&mut stmt.test, scope, ExprCtx::default());
                if !ty.is_error() && ty != Type::Bool {
                    let name = self.name_of(&ty);
                    self.error(
                        &stmt.test.span,
                        format!("condition of if statement must be bool, found {}", name),
                    );
                }
                let then_scope = stmt.then_block.scope.unwrap_or(scope);
                self.check_stmts(&mut stmt.then_block.stmts, then_scope);
                if let Some(ref mut else_block) = stmt.else_block {
                    let else_scope = else_block.scope.unwrap_or(scope);
                    self.check_stmts(&mut else_block.stmts, else_scope);
                }
            }
            Stmt::While(stmt) => {
                let ty = self.check_expr(&mut stmt.test, scope, ExprCtx::default());
                if !ty.is_error() && ty != Type::Bool {
                    let name = self.name_of(&ty);
                    self.error(
                        &stmt.test.span,
                        format!("condition of while statement must be bool, found {}", name),
                    );
                }
                let body_scope = stmt.block.scope.unwrap_or(scope);
                self.check_stmts(&mut stmt.block.stmts, body_scope);
            }
            Stmt::Return(stmt) => self.check_return(stmt, scope),
            Stmt::Expr(stmt) => {
                let ty = self.check_expr(&mut stmt.expr, scope, ExprCtx::default());
                if ty.is_meta() {
                    self.error(&stmt.span, "a type cannot be used as a statement");
                }
            }
        }
    }

    fn check_func_def(&mut self, func: &mut FuncDef) {
        let Some(ref mut body) = func.body else {
            return;
        };
        let Some(body_scope) = body.scope else {
            return;
        };

        let ret = func
            .symbol
            .map(|id| match &self.scopes.symbol(id).ty {
                Type::Function { ret, .. } => (**ret).clone(),
                _ => Type::Error,
            })
            .unwrap_or(Type::Error);

        let saved = (
            self.return_type.take(),
            self.in_function,
            self.in_static,
        );
        self.return_type = Some(ret);
        self.in_function = true;
        self.in_static = func.is_static;

        self.check_stmts(&mut body.stmts, body_scope);

        (self.return_type, self.in_function, self.in_static) = saved;
    }

    fn check_var_def(&mut self, var: &mut VarDef, scope: ScopeId) {
        match var.declared_type {
            Some(ref mut type_expr) => {
                // Signatures of module-level, class-level, and external
                // variables were resolved by the previous pass; locals
                // are resolved here.
                let symbol_ty = var.symbol.map(|id| self.scopes.symbol(id).ty.clone());
                let declared = match symbol_ty {
                    Some(ty) if !ty.is_error() => ty,
                    _ => {
                        let ty = self.check_type(type_expr, scope, false);
                        if let Some(id) = var.symbol {
                            self.scopes.symbol_mut(id).ty = ty.clone();
                        }
                        ty
                    }
                };
                if let Some(ref mut value) = var.value {
                    let value_ty =
                        self.check_expr(value, scope, ExprCtx::with_target(declared.clone()));
                    if value_ty.converts_to(&declared) {
                        self.coerce(value, &declared);
                    } else {
                        let (from, to) = (self.name_of(&value_ty), self.name_of(&declared));
                        self.error(
                            &value.span,
                            format!("cannot assign value of type {} to {}", from, to),
                        );
                    }
                }
            }
            None => {
                // `var x = e` infers from the initializer.
                let Some(ref mut value) = var.value else {
                    return;
                };
                let value_ty = self.check_expr(value, scope, ExprCtx::default());
                let inferred = match value_ty {
                    Type::Error => Type::Error,
                    Type::Null | Type::Void | Type::Meta(_) => {
                        let name = self.name_of(&value_ty);
                        self.error(
                            &value.span,
                            format!("cannot infer a type from a value of type {}", name),
                        );
                        Type::Error
                    }
                    other => other,
                };
                if let Some(id) = var.symbol {
                    self.scopes.symbol_mut(id).ty = inferred;
                }
            }
        }
    }

    fn check_return(&mut self, stmt: &mut ReturnStmt, scope: ScopeId) {
        let Some(ret) = self.return_type.clone() else {
            // Structurally invalid return; already reported.
            if let Some(ref mut value) = stmt.value {
                self.check_expr(value, scope, ExprCtx::default());
            }
            return;
        };

        match stmt.value {
            Some(ref mut value) => {
                let ty = self.check_expr(value, scope, ExprCtx::with_target(ret.clone()));
                if ret == Type::Void {
                    self.error(&stmt.span, "cannot return a value from a void function");
                } else if ty.converts_to(&ret) {
                    self.coerce(value, &ret);
                } else {
                    let (from, to) = (self.name_of(&ty), self.name_of(&ret));
                    self.error(
                        &value.span,
                        format!("cannot convert return value from {} to {}", from, to),
                    );
                }
            }
            None => {
                if !ret.is_error() && ret != Type::Void {
                    let name = self.name_of(&ret);
                    self.error(&stmt.span, format!("must return a value of type {}", name));
                }
            }
        }
    }

    // ========================================================================
    // Type expressions
    // ========================================================================

    /// Evaluate an expression that must denote a complete type, and
    /// return its instance type. `void` passes only where the caller is
    /// checking a return type.
    pub(super) fn check_type(
        &mut self,
        expr: &mut Expr,
        scope: ScopeId,
        allow_void: bool,
    ) -> Type {
        let ty = self.check_expr(expr, scope, ExprCtx::default());
        match ty {
            Type::Error => Type::Error,
            Type::Meta(inner) => {
                if *inner == Type::Void && !allow_void {
                    self.error(&expr.span, "void is only allowed as a return type");
                    Type::Error
                } else {
                    *inner
                }
            }
            other => {
                let name = self.name_of(&other);
                self.error(
                    &expr.span,
                    format!("expected a type, found value of type {}", name),
                );
                Type::Error
            }
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub(super) fn check_expr(&mut self, expr: &mut Expr, scope: ScopeId, ctx: ExprCtx) -> Type {
        let span = expr.span.clone();
        let preset = expr.ty.clone();

        let ty = match expr.kind {
            ExprKind::Bool(_) => Type::Bool,
            ExprKind::Int(_) => Type::Int,
            ExprKind::Float(_) => Type::Float,
            ExprKind::Str(_) => Type::String,
            // A character literal is an integer literal in disguise.
            ExprKind::Char(_) => Type::Int,
            ExprKind::Null => Type::Null,
            ExprKind::This => self.check_this(&span),
            ExprKind::Ident(ref name) => {
                let name = name.clone();
                match self.scopes.lookup(scope, &name, LookupKind::Normal) {
                    None => {
                        self.error(&span, format!("undefined identifier {}", name));
                        Type::Error
                    }
                    Some(id) => {
                        let (chosen, ty) = self.resolve_reference(id, &name, &ctx, &span);
                        expr.symbol = Some(chosen);
                        ty
                    }
                }
            }
            ExprKind::Member {
                ref mut object,
                ref name,
                safe,
            } => {
                let name = name.clone();
                let object_ty = self.check_expr(object, scope, ExprCtx::default());
                let (symbol, ty) = self.check_member(&object_ty, &name, safe, &ctx, &span);
                expr.symbol = symbol;
                ty
            }
            ExprKind::Index {
                ref mut object,
                ref mut index,
            } => {
                let object_ty = self.check_expr(object, scope, ExprCtx::default());
                let index_ty = self.check_expr(index, scope, ExprCtx::default());
                if !index_ty.is_error() && index_ty != Type::Int {
                    let name = self.name_of(&index_ty);
                    self.error(
                        &index.span,
                        format!("index must be of type int, found {}", name),
                    );
                }
                match object_ty {
                    Type::Error => Type::Error,
                    Type::List(item) => *item,
                    other => {
                        let name = self.name_of(&other);
                        self.error(&span, format!("cannot index a value of type {}", name));
                        Type::Error
                    }
                }
            }
            ExprKind::Call {
                ref mut callee,
                ref mut args,
                ref mut is_ctor,
            } => {
                let fty = self.check_callee_and_args(callee, args, scope);
                self.check_call(fty, args, is_ctor, &span)
            }
            ExprKind::Unary {
                op,
                ref mut operand,
            } => {
                let operand_ty = self.check_expr(operand, scope, ExprCtx::default());
                self.check_unary(op, operand_ty, &span)
            }
            ExprKind::Binary {
                op,
                ref mut left,
                ref mut right,
            } => self.check_binary(op, left, right, scope, &span),
            ExprKind::Cast {
                ref mut target,
                ref mut value,
            } => {
                let to = match target {
                    Some(target) => self.check_type(target, scope, false),
                    // Synthesized conversion cast: keeps its assigned type.
                    None => preset.clone(),
                };
                let value_ty = self.check_expr(value, scope, ExprCtx::with_target(to.clone()));
                if to.is_error() || value_ty.is_error() {
                    Type::Error
                } else if value_ty.castable_to(&to) {
                    to
                } else {
                    let (from, to_name) = (self.name_of(&value_ty), self.name_of(&to));
                    self.error(&span, format!("cannot cast from {} to {}", from, to_name));
                    Type::Error
                }
            }
            ExprKind::ListLit(ref mut items) => {
                match ctx.target {
                    Some(Type::List(item)) => {
                        let item = *item;
                        for it in items.iter_mut() {
                            let ty =
                                self.check_expr(it, scope, ExprCtx::with_target(item.clone()));
                            if ty.converts_to(&item) {
                                self.coerce(it, &item);
                            } else {
                                let (from, to) = (self.name_of(&ty), self.name_of(&item));
                                self.error(
                                    &it.span,
                                    format!("cannot convert list item from {} to {}", from, to),
                                );
                            }
                        }
                        Type::List(Box::new(item))
                    }
                    Some(Type::Error) => {
                        for it in items.iter_mut() {
                            self.check_expr(it, scope, ExprCtx::default());
                        }
                        Type::Error
                    }
                    _ => {
                        // No bottom-up element inference: a literal is
                        // only typed by the expected list type.
                        for it in items.iter_mut() {
                            self.check_expr(it, scope, ExprCtx::default());
                        }
                        self.error(&span, "cannot determine the type of this list literal");
                        Type::Error
                    }
                }
            }
            ExprKind::Nullable(ref mut inner) => {
                let inner_ty = self.check_expr(inner, scope, ExprCtx::default());
                match inner_ty {
                    Type::Error => Type::Error,
                    Type::Meta(t) => Type::meta(Type::nullable(*t)),
                    other => {
                        let name = self.name_of(&other);
                        self.error(
                            &inner.span,
                            format!("expected a type, found value of type {}", name),
                        );
                        Type::Error
                    }
                }
            }
            ExprKind::Param {
                base,
                ref mut type_params,
            } => {
                let mut types = Vec::with_capacity(type_params.len());
                let mut failed = false;
                for (index, param) in type_params.iter_mut().enumerate() {
                    let allow_void = base == ParamBase::Function && index == 0;
                    let ty = self.check_type(param, scope, allow_void);
                    failed |= ty.is_error();
                    types.push(ty);
                }
                match base {
                    ParamBase::List => {
                        if types.len() != 1 {
                            self.error(&span, "list takes exactly 1 type parameter");
                            Type::Error
                        } else if failed {
                            Type::Error
                        } else {
                            Type::meta(Type::List(Box::new(types.pop().unwrap())))
                        }
                    }
                    ParamBase::Function => {
                        if types.is_empty() {
                            self.error(&span, "function takes at least 1 type parameter");
                            Type::Error
                        } else if failed {
                            Type::Error
                        } else {
                            let ret = types.remove(0);
                            Type::meta(Type::Function {
                                params: types,
                                ret: Box::new(ret),
                            })
                        }
                    }
                }
            }
        };

        expr.ty = ty.clone();
        ty
    }

    fn check_this(&mut self, span: &Span) -> Type {
        if !self.in_function || self.current_class.is_none() {
            self.error(span, "cannot use this outside a member function");
            return Type::Error;
        }
        if self.in_static {
            self.error(span, "cannot use this inside a static function");
            return Type::Error;
        }
        Type::Class(self.current_class.unwrap())
    }

    /// Turn a looked-up symbol into a reference: plain symbols yield
    /// their type; overload sets resolve against the call-site argument
    /// types, or report that context is missing.
    fn resolve_reference(
        &mut self,
        id: SymbolId,
        name: &str,
        ctx: &ExprCtx,
        span: &Span,
    ) -> (SymbolId, Type) {
        if self.scopes.symbol(id).kind != SymbolKind::OverloadedFunction {
            return (id, self.scopes.symbol(id).ty.clone());
        }

        let Some(ref args) = ctx.args else {
            self.error(span, "cannot resolve overloaded function without context");
            return (id, Type::Error);
        };
        if args.iter().any(Type::is_error) {
            return (id, Type::Error);
        }
        match resolve_overload(self.scopes, id, args) {
            Ok(member) => (member, self.scopes.symbol(member).ty.clone()),
            Err(error) => {
                let arg_names: Vec<String> =
                    args.iter().map(|a| a.display_name(self.scopes)).collect();
                let message = match error {
                    ResolveError::NoMatch => format!(
                        "cannot call {} with arguments of type ({})",
                        name,
                        arg_names.join(", ")
                    ),
                    ResolveError::Ambiguous => format!(
                        "multiple overloads of {} match arguments of type ({})",
                        name,
                        arg_names.join(", ")
                    ),
                };
                self.error(span, message);
                (id, Type::Error)
            }
        }
    }

    fn check_member(
        &mut self,
        object_ty: &Type,
        name: &str,
        safe: bool,
        ctx: &ExprCtx,
        span: &Span,
    ) -> (Option<SymbolId>, Type) {
        if object_ty.is_error() {
            return (None, Type::Error);
        }

        // Work out which class scope to search, with which filter, and
        // whether the result wraps back into a nullable.
        let (class, lookup, wrap_nullable) = match object_ty {
            Type::Nullable(inner) if safe => match **inner {
                Type::Class(class) => (class, LookupKind::InstanceMember, true),
                _ => {
                    let display = self.name_of(object_ty);
                    self.error(
                        span,
                        format!("cannot access member {} on value of type {}", name, display),
                    );
                    return (None, Type::Error);
                }
            },
            _ if safe => {
                let display = self.name_of(object_ty);
                self.error(
                    span,
                    format!("operator '?.' requires a nullable value, found {}", display),
                );
                return (None, Type::Error);
            }
            Type::Class(class) => (*class, LookupKind::InstanceMember, false),
            Type::Meta(inner) => match **inner {
                Type::Class(class) => (class, LookupKind::StaticMember, false),
                _ => {
                    let display = self.name_of(object_ty);
                    self.error(
                        span,
                        format!("cannot access member {} on value of type {}", name, display),
                    );
                    return (None, Type::Error);
                }
            },
            _ => {
                let display = self.name_of(object_ty);
                self.error(
                    span,
                    format!("cannot access member {} on value of type {}", name, display),
                );
                return (None, Type::Error);
            }
        };

        let Some(class_scope) = self.scopes.symbol(class).scope else {
            let display = self.name_of(object_ty);
            self.error(
                span,
                format!("cannot access member {} on value of type {}", name, display),
            );
            return (None, Type::Error);
        };

        match self.scopes.lookup(class_scope, name, lookup) {
            Some(member) => {
                let (chosen, ty) = self.resolve_reference(member, name, ctx, span);
                let ty = if wrap_nullable { Type::nullable(ty) } else { ty };
                (Some(chosen), ty)
            }
            None => {
                let class_name = self.scopes.symbol(class).name.clone();
                let message = match self.scopes.lookup_member_any(class_scope, name) {
                    Some(_) => match lookup {
                        LookupKind::StaticMember => {
                            format!("member {} of class {} is not static", name, class_name)
                        }
                        _ => format!("member {} of class {} is static", name, class_name),
                    },
                    None => format!("no member named {} on type {}", name, class_name),
                };
                self.error(span, message);
                (None, Type::Error)
            }
        }
    }

    fn check_unary(&mut self, op: UnaryOp, operand_ty: Type, span: &Span) -> Type {
        if operand_ty.is_error() {
            return Type::Error;
        }
        match op {
            UnaryOp::Neg => {
                if operand_ty.is_numeric() {
                    operand_ty
                } else {
                    let name = self.name_of(&operand_ty);
                    self.error(
                        span,
                        format!("operator '-' requires a numeric operand, found {}", name),
                    );
                    Type::Error
                }
            }
            UnaryOp::Not => {
                if operand_ty == Type::Bool {
                    Type::Bool
                } else {
                    let name = self.name_of(&operand_ty);
                    self.error(span, format!("operator '!' requires bool, found {}", name));
                    Type::Error
                }
            }
        }
    }

    fn check_binary(
        &mut self,
        op: BinaryOp,
        left: &mut Expr,
        right: &mut Expr,
        scope: ScopeId,
        span: &Span,
    ) -> Type {
        match op {
            BinaryOp::Assign => {
                let left_ty = self.check_expr(left, scope, ExprCtx::default());
                if left_ty.is_meta() {
                    self.check_expr(right, scope, ExprCtx::default());
                    self.error(span, "cannot assign to a type");
                    return Type::Error;
                }
                let right_ty =
                    self.check_expr(right, scope, ExprCtx::with_target(left_ty.clone()));
                if left_ty.is_error() || right_ty.is_error() {
                    return Type::Error;
                }
                if right_ty.converts_to(&left_ty) {
                    self.coerce(right, &left_ty);
                    left_ty
                } else {
                    let (from, to) = (self.name_of(&right_ty), self.name_of(&left_ty));
                    self.error(
                        span,
                        format!("cannot assign value of type {} to {}", from, to),
                    );
                    Type::Error
                }
            }
            BinaryOp::NullDefault => {
                let left_ty = self.check_expr(left, scope, ExprCtx::default());
                let right_ty = self.check_expr(right, scope, ExprCtx::default());
                match left_ty {
                    Type::Error => Type::Error,
                    Type::Nullable(inner) => {
                        let inner = *inner;
                        if right_ty.is_error() {
                            Type::Error
                        } else if right_ty.converts_to(&inner) {
                            self.coerce(right, &inner);
                            inner
                        } else {
                            let (l, r) = (self.name_of(&right_ty), self.name_of(&inner));
                            self.error(
                                span,
                                format!("operator '??' cannot be applied to {} and {}", l, r),
                            );
                            Type::Error
                        }
                    }
                    other => {
                        let name = self.name_of(&other);
                        self.error(
                            span,
                            format!(
                                "operator '??' requires a nullable left operand, found {}",
                                name
                            ),
                        );
                        Type::Error
                    }
                }
            }
            _ => {
                let left_ty = self.check_expr(left, scope, ExprCtx::default());
                let right_ty = self.check_expr(right, scope, ExprCtx::default());
                match check_binary_op(op, &left_ty, &right_ty) {
                    BinaryOutcome::Ok { result, cast } => {
                        if let Some((side, to)) = cast {
                            match side {
                                Side::Left => self.coerce(left, &to),
                                Side::Right => self.coerce(right, &to),
                            }
                        }
                        result
                    }
                    BinaryOutcome::Mismatch => {
                        let (l, r) = (self.name_of(&left_ty), self.name_of(&right_ty));
                        self.error(
                            span,
                            format!(
                                "operator '{}' cannot be applied to {} and {}",
                                op.symbol(),
                                l,
                                r
                            ),
                        );
                        Type::Error
                    }
                }
            }
        }
    }

    /// Evaluate a call's callee and arguments in dependency order.
    ///
    /// The callee is first evaluated in a trial run with diagnostics
    /// suppressed. If it names an overload set, the arguments are
    /// evaluated first and their types re-drive the callee (overload
    /// resolution); otherwise the callee is re-evaluated for real and
    /// its signature drives inference into the arguments.
    fn check_callee_and_args(
        &mut self,
        callee: &mut Expr,
        args: &mut [Expr],
        scope: ScopeId,
    ) -> Type {
        let was = self.diagnostics.set_enabled(false);
        self.check_expr(callee, scope, ExprCtx::default());
        self.diagnostics.set_enabled(was);

        let is_overloaded = callee
            .symbol
            .is_some_and(|id| self.scopes.symbol(id).kind == SymbolKind::OverloadedFunction);

        if is_overloaded {
            let arg_types: Vec<Type> = args
                .iter_mut()
                .map(|arg| self.check_expr(arg, scope, ExprCtx::default()))
                .collect();
            self.check_expr(callee, scope, ExprCtx::with_args(arg_types))
        } else {
            let fty = self.check_expr(callee, scope, ExprCtx::default());
            let params = match &fty {
                Type::Function { params, .. } if params.len() == args.len() => {
                    Some(params.clone())
                }
                _ => None,
            };
            for (index, arg) in args.iter_mut().enumerate() {
                let ctx = match params {
                    Some(ref params) => ExprCtx::with_target(params[index].clone()),
                    None => ExprCtx::default(),
                };
                self.check_expr(arg, scope, ctx);
            }
            fty
        }
    }

    /// Reconcile a call's callee type with its arguments: a class meta
    /// with zero arguments is a constructor call; anything else must be
    /// a function whose parameters accept the arguments exactly or via
    /// implicit conversions.
    fn check_call(
        &mut self,
        callee_ty: Type,
        args: &mut [Expr],
        is_ctor: &mut bool,
        span: &Span,
    ) -> Type {
        match callee_ty {
            Type::Error => Type::Error,
            Type::Meta(inner) => match *inner {
                Type::Class(class) if args.is_empty() => {
                    *is_ctor = true;
                    Type::Class(class)
                }
                Type::Class(_) => {
                    self.error(span, format!("expected 0 argument(s), found {}", args.len()));
                    Type::Error
                }
                other => {
                    let name = self.name_of(&Type::meta(other));
                    self.error(span, format!("cannot call value of type {}", name));
                    Type::Error
                }
            },
            Type::Function { params, ret } => {
                if params.len() != args.len() {
                    self.error(
                        span,
                        format!(
                            "expected {} argument(s), found {}",
                            params.len(),
                            args.len()
                        ),
                    );
                    return Type::Error;
                }
                for (index, (arg, param)) in args.iter_mut().zip(&params).enumerate() {
                    if arg.ty.is_error() || param.is_error() || arg.ty == *param {
                        continue;
                    }
                    if arg.ty.converts_to(param) {
                        self.coerce(arg, param);
                    } else {
                        let (from, to) = (self.name_of(&arg.ty), self.name_of(param));
                        self.error(
                            &arg.span,
                            format!(
                                "cannot convert argument {} from {} to {}",
                                index + 1,
                                from,
                                to
                            ),
                        );
                    }
                }
                *ret
            }
            other => {
                let name = self.name_of(&other);
                self.error(span, format!("cannot call value of type {}", name));
                Type::Error
            }
        }
    }

    /// Wrap `slot` in a synthesized conversion cast to `to`, unless the
    /// types already agree. The original expression survives as the
    /// cast's value.
    fn coerce(&mut self, slot: &mut Expr, to: &Type) {
        if slot.ty.is_error() || to.is_error() || slot.ty == *to {
            return;
        }
        let span = slot.span.clone();
        let inner = std::mem::replace(slot, Expr::new(ExprKind::Null, span.clone()));
        *slot = Expr {
            kind: ExprKind::Cast {
                target: None,
                value: Box::new(inner),
            },
            span,
            ty: to.clone(),
            symbol: None,
        };
    }
}
