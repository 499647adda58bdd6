use crate::ast::nodes::BinaryOp;

use super::types::Type;

/// Which operand of a binary expression needs a widening cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Outcome of checking a pure binary operator. Assignment and `??` are
/// handled by the checker itself because they thread a target type.
#[derive(Debug, PartialEq)]
pub enum BinaryOutcome {
    /// The operation type-checks; `cast` names the operand to wrap in a
    /// conversion cast, if any.
    Ok {
        result: Type,
        cast: Option<(Side, Type)>,
    },
    /// The operand types don't fit; the caller formats the diagnostic.
    Mismatch,
}

fn ok(result: Type) -> BinaryOutcome {
    BinaryOutcome::Ok { result, cast: None }
}

fn ok_cast(result: Type, side: Side, to: Type) -> BinaryOutcome {
    BinaryOutcome::Ok {
        result,
        cast: Some((side, to)),
    }
}

/// Pick the wider numeric type, casting the narrower side.
/// `None` when either operand is not numeric.
fn numeric_widening(left: &Type, right: &Type) -> Option<(Type, Option<(Side, Type)>)> {
    match (left, right) {
        (Type::Int, Type::Int) => Some((Type::Int, None)),
        (Type::Float, Type::Float) => Some((Type::Float, None)),
        (Type::Int, Type::Float) => Some((Type::Float, Some((Side::Left, Type::Float)))),
        (Type::Float, Type::Int) => Some((Type::Float, Some((Side::Right, Type::Float)))),
        _ => None,
    }
}

/// Check a pure binary operator against its operand types.
///
/// Errors are absorbing: if either operand already failed to check, the
/// result is an error without a fresh diagnostic.
pub fn check_binary_op(op: BinaryOp, left: &Type, right: &Type) -> BinaryOutcome {
    if left.is_error() || right.is_error() {
        return ok(Type::Error);
    }

    match op {
        BinaryOp::Add => {
            if *left == Type::String && *right == Type::String {
                return ok(Type::String);
            }
            match numeric_widening(left, right) {
                Some((result, cast)) => BinaryOutcome::Ok { result, cast },
                None => BinaryOutcome::Mismatch,
            }
        }
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => match numeric_widening(left, right) {
            Some((result, cast)) => BinaryOutcome::Ok { result, cast },
            None => BinaryOutcome::Mismatch,
        },
        BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor
        | BinaryOp::Shl
        | BinaryOp::Shr => {
            if *left == Type::Int && *right == Type::Int {
                ok(Type::Int)
            } else {
                BinaryOutcome::Mismatch
            }
        }
        BinaryOp::And | BinaryOp::Or => {
            if *left == Type::Bool && *right == Type::Bool {
                ok(Type::Bool)
            } else {
                BinaryOutcome::Mismatch
            }
        }
        BinaryOp::Eq | BinaryOp::Neq => {
            if left == right {
                ok(Type::Bool)
            } else if left.converts_to(right) {
                ok_cast(Type::Bool, Side::Left, right.clone())
            } else if right.converts_to(left) {
                ok_cast(Type::Bool, Side::Right, left.clone())
            } else {
                BinaryOutcome::Mismatch
            }
        }
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Lte | BinaryOp::Gte => {
            if *left == Type::String && *right == Type::String {
                return ok(Type::Bool);
            }
            match numeric_widening(left, right) {
                Some((_, cast)) => BinaryOutcome::Ok {
                    result: Type::Bool,
                    cast,
                },
                None => BinaryOutcome::Mismatch,
            }
        }
        // Threaded through the checker, never through this helper.
        BinaryOp::Assign | BinaryOp::NullDefault => BinaryOutcome::Mismatch,
    }
}
