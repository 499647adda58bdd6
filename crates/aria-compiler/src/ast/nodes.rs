use aria_common::Span;

use crate::semantic::scope::{ScopeId, SymbolId};
use crate::semantic::types::Type;

// ============================================================================
// Module (top-level)
// ============================================================================

/// A complete aria module: one translation unit, one AST.
#[derive(Debug, Clone)]
pub struct Module {
    pub block: Block,
    pub span: Span,
}

// ============================================================================
// Block
// ============================================================================

/// A braced sequence of statements.
///
/// `scope` is filled by the define-symbols pass and stays set for the
/// rest of compilation.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub scope: Option<ScopeId>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self {
            stmts,
            scope: None,
            span,
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// A statement. Which variants are allowed where is validated by the
/// structural-check pass, not the parser.
#[derive(Debug, Clone)]
pub enum Stmt {
    External(ExternalStmt),
    Class(ClassDef),
    Var(VarDef),
    Func(FuncDef),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Expr(ExprStmt),
}

/// `external { ... }`: declarations that exist in the runtime but have
/// no body or initializer in source. The block shares its parent scope.
#[derive(Debug, Clone)]
pub struct ExternalStmt {
    pub block: Block,
    pub span: Span,
}

/// `class Name { ... }`
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub body: Block,
    pub symbol: Option<SymbolId>,
    pub span: Span,
}

/// `Type name [= value]` or `var name = value`.
///
/// Also used for function arguments (`value` then holds a default,
/// which the structural pass rejects).
#[derive(Debug, Clone)]
pub struct VarDef {
    pub name: String,
    /// Declared type expression; `None` for `var` inference.
    pub declared_type: Option<Expr>,
    pub value: Option<Expr>,
    pub symbol: Option<SymbolId>,
    pub span: Span,
}

/// `[static] ReturnType name(args) [body]`
#[derive(Debug, Clone)]
pub struct FuncDef {
    pub name: String,
    pub is_static: bool,
    pub return_type: Expr,
    pub args: Vec<VarDef>,
    /// Absent exactly for declarations inside external blocks.
    pub body: Option<Block>,
    pub symbol: Option<SymbolId>,
    pub span: Span,
}

/// `if test { ... } [else { ... }]`; an `else if` is wrapped by the
/// parser into an else block holding a single nested `if`.
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub test: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// `while test { ... }`
#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub test: Expr,
    pub block: Block,
    pub span: Span,
}

/// `return [value]`
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// An expression used as a statement.
#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression node.
///
/// `ty` starts as [`Type::Error`] and is written by the type-checking
/// passes; `symbol` is resolved for identifiers and member accesses.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: Type,
    pub symbol: Option<SymbolId>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: Type::Error,
            symbol: None,
        }
    }
}

/// All expression variants. Type expressions (`int`, `A?`, `list<int>`)
/// are ordinary expressions whose checked type is a meta type.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// `true` / `false`
    Bool(bool),

    /// Integer literal.
    Int(i64),

    /// Float literal.
    Float(f64),

    /// String literal (content already unescaped).
    Str(String),

    /// Character literal: a single-character integer literal.
    Char(char),

    /// `null`
    Null,

    /// `this`
    This,

    /// A name reference: `x`, `print`, `int`
    Ident(String),

    /// Member access: `obj.name`, or `obj?.name` when `safe`.
    Member {
        object: Box<Expr>,
        name: String,
        safe: bool,
    },

    /// Index access: `xs[i]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },

    /// Call: `f(a, b)`. `is_ctor` is set by the type checker when the
    /// callee turns out to be a class used as a constructor.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        is_ctor: bool,
    },

    /// Unary operation: `-x`, `!flag`
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation, including assignment and `??`.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Cast: `value as Target`. Synthesized casts inserted for implicit
    /// conversions have no target expression; their `ty` is set
    /// directly.
    Cast {
        target: Option<Box<Expr>>,
        value: Box<Expr>,
    },

    /// List literal: `[a, b, c]`
    ListLit(Vec<Expr>),

    /// Nullable type expression: `T?`
    Nullable(Box<Expr>),

    /// Parameterized type expression: `list<T>`, `function<R, A...>`.
    /// The number of type parameters is validated semantically.
    Param {
        base: ParamBase,
        type_params: Vec<Expr>,
    },
}

/// The base of a parameterized type expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamBase {
    List,
    Function,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    // Comparison
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    // Assignment
    Assign,
    // Nullable default: `??`
    NullDefault,
}

impl BinaryOp {
    /// The source-level spelling, for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Assign => "=",
            BinaryOp::NullDefault => "??",
        }
    }
}
