use super::nodes::*;

/// Mutable visitor trait for walking the AST.
///
/// Default implementations delegate to the `walk_*` functions, which
/// recurse into children; override specific methods to add behavior at
/// particular node types and call the matching `walk_*` to continue
/// downward. Passes that decorate the tree in place (structure check,
/// flow validation, default initialization) are written against this
/// trait; the type checker threads its own context and recurses by hand.
pub trait MutVisitor: Sized {
    fn visit_module(&mut self, module: &mut Module) {
        self.visit_block(&mut module.block);
    }

    fn visit_block(&mut self, block: &mut Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_external_stmt(&mut self, stmt: &mut ExternalStmt) {
        walk_external_stmt(self, stmt);
    }

    fn visit_class_def(&mut self, def: &mut ClassDef) {
        walk_class_def(self, def);
    }

    fn visit_var_def(&mut self, def: &mut VarDef) {
        walk_var_def(self, def);
    }

    fn visit_func_def(&mut self, def: &mut FuncDef) {
        walk_func_def(self, def);
    }

    fn visit_if_stmt(&mut self, stmt: &mut IfStmt) {
        walk_if_stmt(self, stmt);
    }

    fn visit_while_stmt(&mut self, stmt: &mut WhileStmt) {
        walk_while_stmt(self, stmt);
    }

    fn visit_return_stmt(&mut self, stmt: &mut ReturnStmt) {
        walk_return_stmt(self, stmt);
    }

    fn visit_expr_stmt(&mut self, stmt: &mut ExprStmt) {
        self.visit_expr(&mut stmt.expr);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_block<V: MutVisitor>(v: &mut V, block: &mut Block) {
    for stmt in &mut block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: MutVisitor>(v: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::External(s) => v.visit_external_stmt(s),
        Stmt::Class(s) => v.visit_class_def(s),
        Stmt::Var(s) => v.visit_var_def(s),
        Stmt::Func(s) => v.visit_func_def(s),
        Stmt::If(s) => v.visit_if_stmt(s),
        Stmt::While(s) => v.visit_while_stmt(s),
        Stmt::Return(s) => v.visit_return_stmt(s),
        Stmt::Expr(s) => v.visit_expr_stmt(s),
    }
}

pub fn walk_external_stmt<V: MutVisitor>(v: &mut V, stmt: &mut ExternalStmt) {
    v.visit_block(&mut stmt.block);
}

pub fn walk_class_def<V: MutVisitor>(v: &mut V, def: &mut ClassDef) {
    v.visit_block(&mut def.body);
}

pub fn walk_var_def<V: MutVisitor>(v: &mut V, def: &mut VarDef) {
    if let Some(ref mut ty) = def.declared_type {
        v.visit_expr(ty);
    }
    if let Some(ref mut value) = def.value {
        v.visit_expr(value);
    }
}

pub fn walk_func_def<V: MutVisitor>(v: &mut V, def: &mut FuncDef) {
    v.visit_expr(&mut def.return_type);
    for arg in &mut def.args {
        v.visit_var_def(arg);
    }
    if let Some(ref mut body) = def.body {
        v.visit_block(body);
    }
}

pub fn walk_if_stmt<V: MutVisitor>(v: &mut V, stmt: &mut IfStmt) {
    v.visit_expr(&mut stmt.test);
    v.visit_block(&mut stmt.then_block);
    if let Some(ref mut else_block) = stmt.else_block {
        v.visit_block(else_block);
    }
}

pub fn walk_while_stmt<V: MutVisitor>(v: &mut V, stmt: &mut WhileStmt) {
    v.visit_expr(&mut stmt.test);
    v.visit_block(&mut stmt.block);
}

pub fn walk_return_stmt<V: MutVisitor>(v: &mut V, stmt: &mut ReturnStmt) {
    if let Some(ref mut value) = stmt.value {
        v.visit_expr(value);
    }
}

pub fn walk_expr<V: MutVisitor>(v: &mut V, expr: &mut Expr) {
    match &mut expr.kind {
        ExprKind::Bool(_)
        | ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Str(_)
        | ExprKind::Char(_)
        | ExprKind::Null
        | ExprKind::This
        | ExprKind::Ident(_) => {}
        ExprKind::Member { object, .. } => v.visit_expr(object),
        ExprKind::Index { object, index } => {
            v.visit_expr(object);
            v.visit_expr(index);
        }
        ExprKind::Call { callee, args, .. } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::Unary { operand, .. } => v.visit_expr(operand),
        ExprKind::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::Cast { target, value } => {
            if let Some(target) = target {
                v.visit_expr(target);
            }
            v.visit_expr(value);
        }
        ExprKind::ListLit(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
        ExprKind::Nullable(inner) => v.visit_expr(inner),
        ExprKind::Param { type_params, .. } => {
            for param in type_params {
                v.visit_expr(param);
            }
        }
    }
}
