use super::scope::{ScopeTree, SymbolId};
use super::types::Type;

/// Why overload resolution failed; the caller owns the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// No member accepts the argument types.
    NoMatch,
    /// More than one member survived the winning bucket.
    Ambiguous,
}

/// Resolve an overload set against the call-site argument types.
///
/// Members are bucketed into exact matches and implicit-conversion
/// matches. A non-empty exact bucket wins and must be a singleton;
/// otherwise the implicit bucket must be a singleton.
pub fn resolve_overload(
    scopes: &ScopeTree,
    set: SymbolId,
    arg_types: &[Type],
) -> Result<SymbolId, ResolveError> {
    let mut exact = Vec::new();
    let mut implicit = Vec::new();

    for &member in &scopes.symbol(set).overloads {
        let Type::Function { params, .. } = &scopes.symbol(member).ty else {
            continue;
        };
        if params.len() != arg_types.len() {
            continue;
        }
        if params.iter().zip(arg_types).all(|(param, arg)| arg == param) {
            exact.push(member);
        } else if params
            .iter()
            .zip(arg_types)
            .all(|(param, arg)| arg.converts_to(param))
        {
            implicit.push(member);
        }
    }

    if !exact.is_empty() {
        return match exact.len() {
            1 => Ok(exact[0]),
            _ => Err(ResolveError::Ambiguous),
        };
    }
    match implicit.len() {
        1 => Ok(implicit[0]),
        0 => Err(ResolveError::NoMatch),
        _ => Err(ResolveError::Ambiguous),
    }
}
