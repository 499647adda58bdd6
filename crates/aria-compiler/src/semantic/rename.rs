use std::collections::HashSet;

use super::scope::{ScopeId, ScopeTree, SymbolId, SymbolKind};
use super::types::Type;

/// Options for the rename pass.
#[derive(Debug, Default)]
pub struct RenameOptions {
    /// Names the target language does not allow (its keyword set).
    pub reserved: HashSet<String>,
    /// Give each member of an overload set a distinct final name by
    /// appending its argument types.
    pub rename_overloads: bool,
}

impl RenameOptions {
    pub fn with_reserved_words(words: &[&str]) -> Self {
        Self {
            reserved: words.iter().map(|w| w.to_string()).collect(),
            rename_overloads: false,
        }
    }
}

/// Rename-symbols pass. Never emits diagnostics.
///
/// Symbols whose names collide with a reserved word are prefixed with
/// `_` until collision-free against both the reserved set and their own
/// scope. Overload-set members optionally get their argument types
/// appended (`print` with an `int` overload becomes `printInt`). The
/// scope entries are rewritten in place so later lookups stay
/// consistent; sources of truth for emitted names are the symbols'
/// `final_name`s.
pub fn run(scopes: &mut ScopeTree, options: &RenameOptions) {
    let scope_ids: Vec<_> = scopes.scope_ids().collect();
    for scope in scope_ids {
        for index in 0..scopes.scope(scope).entries().len() {
            let (name, id) = scopes.scope(scope).entries()[index].clone();

            let mut final_name = name;
            let mut renamed = false;
            if options.reserved.contains(&final_name) {
                final_name = avoid_collisions(scopes, scope, &options.reserved, &final_name);
                scopes.rename_entry(scope, index, final_name.clone());
                scopes.symbol_mut(id).final_name = final_name.clone();
                renamed = true;
            }

            if scopes.symbol(id).kind != SymbolKind::OverloadedFunction {
                continue;
            }
            let members = scopes.symbol(id).overloads.clone();
            if options.rename_overloads {
                // Display names need the whole tree, so mangle first and
                // write the results after.
                let mangled: Vec<String> = members
                    .iter()
                    .map(|&member| format!("{}{}", final_name, mangle_args(scopes, member)))
                    .collect();
                for (member, mangled_name) in members.into_iter().zip(mangled) {
                    scopes.symbol_mut(member).final_name = mangled_name;
                }
            } else if renamed {
                for member in members {
                    scopes.symbol_mut(member).final_name = final_name.clone();
                }
            }
        }
    }
}

fn avoid_collisions(
    scopes: &ScopeTree,
    scope: ScopeId,
    reserved: &HashSet<String>,
    name: &str,
) -> String {
    let mut candidate = format!("_{}", name);
    while reserved.contains(&candidate) || scopes.is_taken(scope, &candidate) {
        candidate.insert(0, '_');
    }
    candidate
}

/// Mangled representation of a function symbol's argument types: each
/// word of each type's source name, title-cased and concatenated
/// (`list<int>` contributes `ListInt`).
fn mangle_args(scopes: &ScopeTree, member: SymbolId) -> String {
    let Type::Function { params, .. } = &scopes.symbol(member).ty else {
        return String::new();
    };
    params
        .iter()
        .map(|param| title_words(&param.display_name(scopes)))
        .collect()
}

fn title_words(display: &str) -> String {
    display
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
