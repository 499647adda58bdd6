use aria_common::Span;

use super::types::Type;

/// Index of a symbol in the [`ScopeTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

/// Index of a scope in the [`ScopeTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

/// The kind of a declared symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
    /// A set of same-named functions in one scope; resolved to a single
    /// member before anything downstream may use it.
    OverloadedFunction,
}

/// A declared symbol in the module.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Meaningful for functions and classes only.
    pub is_static: bool,
    /// Starts as `Error`; filled by the signature pass (or, for
    /// function-local variables, by the type checker).
    pub ty: Type,
    /// Definition site; dummy for builtins and generated symbols.
    pub span: Span,
    /// The class body scope, for class symbols.
    pub scope: Option<ScopeId>,
    /// Member symbols, for overload sets.
    pub overloads: Vec<SymbolId>,
    /// Output name; the rename pass may change it away from `name`.
    pub final_name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, span: Span) -> Self {
        let name = name.into();
        Self {
            final_name: name.clone(),
            name,
            kind,
            is_static: false,
            ty: Type::Error,
            span,
            scope: None,
            overloads: Vec::new(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = ty;
        self
    }

    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }
}

/// The kind of scope, which affects lookup rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Class,
    Func,
    Local,
}

/// How a name lookup should behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Walk the parent chain, skipping class scopes: members are not in
    /// lexical scope inside methods and must be reached through `this`.
    Normal,
    /// Look only in the given class scope, non-static symbols.
    InstanceMember,
    /// Look only in the given class scope, static symbols.
    StaticMember,
}

/// A lexical scope: a kind, a parent link, and insertion-ordered
/// name/symbol entries. Entry order is what makes repeated runs (and
/// the rename pass) deterministic.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    entries: Vec<(String, SymbolId)>,
}

impl Scope {
    fn find(&self, name: &str) -> Option<SymbolId> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, id)| id)
    }

    pub fn entries(&self) -> &[(String, SymbolId)] {
        &self.entries
    }
}

/// Arena holding every scope and symbol of one module, linked by ids.
///
/// Scopes form a tree rooted at the module scope. Both arenas are flat
/// `Vec`s linked by indices, so AST decorations are plain copyable ids
/// and cross-references never own a piece of the tree.
#[derive(Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent,
            entries: Vec::new(),
        });
        id
    }

    /// Add a symbol to the arena without entering it into any scope.
    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    pub fn scope_ids(&self) -> impl Iterator<Item = ScopeId> {
        (0..self.scopes.len() as u32).map(ScopeId)
    }

    /// Define `symbol` in `scope`.
    ///
    /// Same-named functions fold into an overload set: the scope entry
    /// becomes (or already is) an `OverloadedFunction` symbol carrying
    /// the members, while the returned id is always the newly added
    /// member itself. Any other collision returns `Err` with the
    /// existing symbol for the redefinition diagnostic.
    pub fn define(&mut self, scope: ScopeId, symbol: Symbol) -> Result<SymbolId, SymbolId> {
        let name = symbol.name.clone();
        match self.scopes[scope.0 as usize].find(&name) {
            None => {
                let id = self.add_symbol(symbol);
                self.scopes[scope.0 as usize].entries.push((name, id));
                Ok(id)
            }
            Some(existing) => {
                let existing_sym = self.symbol(existing);
                if existing_sym.kind == SymbolKind::Function && symbol.is_function() {
                    // Second definition: fold both into a fresh set.
                    let is_static = existing_sym.is_static;
                    let id = self.add_symbol(symbol);
                    let mut set = Symbol::new(&name, SymbolKind::OverloadedFunction, Span::generated())
                        .with_static(is_static);
                    set.overloads = vec![existing, id];
                    let set_id = self.add_symbol(set);
                    self.symbols[set_id.0 as usize].ty = Type::Overloaded(set_id);
                    self.replace_entry(scope, &name, set_id);
                    Ok(id)
                } else if existing_sym.kind == SymbolKind::OverloadedFunction
                    && symbol.is_function()
                {
                    let id = self.add_symbol(symbol);
                    self.symbols[existing.0 as usize].overloads.push(id);
                    Ok(id)
                } else {
                    Err(existing)
                }
            }
        }
    }

    fn replace_entry(&mut self, scope: ScopeId, name: &str, id: SymbolId) {
        let entry = self.scopes[scope.0 as usize]
            .entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .expect("entry exists");
        entry.1 = id;
    }

    /// Rename the entry at `index` of `scope` (the rename pass mutates
    /// entries in place so later lookups stay consistent).
    pub fn rename_entry(&mut self, scope: ScopeId, index: usize, new_name: String) {
        self.scopes[scope.0 as usize].entries[index].0 = new_name;
    }

    /// Whether `name` is already taken by an entry of `scope`.
    pub fn is_taken(&self, scope: ScopeId, name: &str) -> bool {
        self.scope(scope).find(name).is_some()
    }

    /// Look up `name` starting from `scope` with the given behavior.
    /// For the member kinds, `scope` must be the class body scope.
    pub fn lookup(&self, scope: ScopeId, name: &str, kind: LookupKind) -> Option<SymbolId> {
        match kind {
            LookupKind::Normal => {
                let mut current = Some(scope);
                while let Some(id) = current {
                    let s = self.scope(id);
                    if s.kind != ScopeKind::Class {
                        if let Some(found) = s.find(name) {
                            return Some(found);
                        }
                    }
                    current = s.parent;
                }
                None
            }
            LookupKind::InstanceMember => self
                .scope(scope)
                .find(name)
                .filter(|&id| !self.symbol(id).is_static),
            LookupKind::StaticMember => self
                .scope(scope)
                .find(name)
                .filter(|&id| self.symbol(id).is_static),
        }
    }

    /// Look up a member by name only, ignoring staticness; used to tell
    /// "no such member" apart from "wrong staticness" in diagnostics.
    pub fn lookup_member_any(&self, class_scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scope(class_scope).find(name)
    }
}
