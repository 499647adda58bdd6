use super::scope::{ScopeTree, SymbolId};

/// Internal type representation for semantic analysis.
///
/// Class types refer to their class symbol by id, so types stay cheap
/// to clone and never own a piece of the AST.
#[derive(Debug, Clone)]
pub enum Type {
    /// Error sentinel: absorbing, never equal to anything, suppresses
    /// downstream diagnostics that mention it.
    Error,

    // -- Primitives --
    Void,
    /// The type of the `null` literal.
    Null,
    Bool,
    Int,
    Float,
    String,

    /// An instance of a class.
    Class(SymbolId),

    /// A function value: `function<R, A...>` in source syntax.
    Function { params: Vec<Type>, ret: Box<Type> },

    /// The type of an expression that *is* a type: the identifier `int`
    /// in source has type `Meta(Int)`.
    Meta(Box<Type>),

    /// Marker that overload resolution is pending for the given
    /// overload-set symbol. Never the type of a value.
    Overloaded(SymbolId),

    /// `list<T>`
    List(Box<Type>),

    /// `T?`. Construction via [`Type::nullable`] keeps these collapsed.
    Nullable(Box<Type>),
}

/// Structural equality. `Error` and `Overloaded` never compare equal to
/// anything, including themselves; conversions are not considered.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Error, _) | (_, Type::Error) => false,
            (Type::Overloaded(_), _) | (_, Type::Overloaded(_)) => false,
            (Type::Void, Type::Void) => true,
            (Type::Null, Type::Null) => true,
            (Type::Bool, Type::Bool) => true,
            (Type::Int, Type::Int) => true,
            (Type::Float, Type::Float) => true,
            (Type::String, Type::String) => true,
            (Type::Class(a), Type::Class(b)) => a == b,
            (
                Type::Function { params: ap, ret: ar },
                Type::Function { params: bp, ret: br },
            ) => ar == br && ap == bp,
            (Type::Meta(a), Type::Meta(b)) => a == b,
            (Type::List(a), Type::List(b)) => a == b,
            (Type::Nullable(a), Type::Nullable(b)) => a == b,
            _ => false,
        }
    }
}

impl Type {
    /// Build a nullable type, collapsing `T??` to `T?` and keeping the
    /// `null` and error sentinels as they are.
    pub fn nullable(inner: Type) -> Type {
        match inner {
            Type::Nullable(_) => inner,
            Type::Null | Type::Error => inner,
            other => Type::Nullable(Box::new(other)),
        }
    }

    pub fn meta(inner: Type) -> Type {
        Type::Meta(Box::new(inner))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_meta(&self) -> bool {
        matches!(self, Type::Meta(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// The instance type of a meta type: `instance(Meta(T)) = T`.
    pub fn instance(&self) -> Option<&Type> {
        match self {
            Type::Meta(inner) => Some(inner),
            _ => None,
        }
    }

    /// Whether a value of this type implicitly converts to `target`.
    ///
    /// Exactly two conversions exist: `int -> float`, and `T -> U?`
    /// whenever `T` is `null`, equals `U`, or converts to `U`. Errors
    /// convert both ways so that cascades stay silent.
    pub fn converts_to(&self, target: &Type) -> bool {
        if self.is_error() || target.is_error() {
            return true;
        }
        if self == target {
            return true;
        }
        if matches!((self, target), (Type::Int, Type::Float)) {
            return true;
        }
        if let Type::Nullable(inner) = target {
            return matches!(self, Type::Null) || self.converts_to(inner);
        }
        false
    }

    /// Whether an explicit cast from this type to `target` is valid:
    /// equal, implicitly convertible, or both numeric.
    pub fn castable_to(&self, target: &Type) -> bool {
        self.converts_to(target) || (self.is_numeric() && target.is_numeric())
    }

    /// Human-readable name in source syntax, for diagnostics.
    pub fn display_name(&self, scopes: &ScopeTree) -> std::string::String {
        match self {
            Type::Error => "<error>".into(),
            Type::Void => "void".into(),
            Type::Null => "null".into(),
            Type::Bool => "bool".into(),
            Type::Int => "int".into(),
            Type::Float => "float".into(),
            Type::String => "string".into(),
            Type::Class(id) => scopes.symbol(*id).name.clone(),
            Type::Function { params, ret } => {
                let mut inner = ret.display_name(scopes);
                for param in params {
                    inner.push_str(", ");
                    inner.push_str(&param.display_name(scopes));
                }
                format!("function<{}>", inner)
            }
            Type::Meta(inner) => format!("type {}", inner.display_name(scopes)),
            Type::Overloaded(id) => {
                format!("overloaded function {}", scopes.symbol(*id).name)
            }
            Type::List(item) => format!("list<{}>", item.display_name(scopes)),
            Type::Nullable(inner) => format!("{}?", inner.display_name(scopes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::scope::{ScopeKind, ScopeTree, Symbol, SymbolKind};
    use aria_common::Span;

    fn tree_with_class(name: &str) -> (ScopeTree, SymbolId) {
        let mut scopes = ScopeTree::new();
        let module = scopes.add_scope(ScopeKind::Module, None);
        let id = scopes
            .define(module, Symbol::new(name, SymbolKind::Class, Span::generated()))
            .unwrap();
        (scopes, id)
    }

    #[test]
    fn error_is_never_equal() {
        assert_ne!(Type::Error, Type::Error);
        assert_ne!(Type::Error, Type::Int);
    }

    #[test]
    fn overloaded_is_never_equal() {
        let (_, id) = tree_with_class("A");
        assert_ne!(Type::Overloaded(id), Type::Overloaded(id));
    }

    #[test]
    fn structural_equality() {
        assert_eq!(Type::Int, Type::Int);
        assert_eq!(
            Type::List(Box::new(Type::Int)),
            Type::List(Box::new(Type::Int))
        );
        assert_ne!(
            Type::List(Box::new(Type::Int)),
            Type::List(Box::new(Type::Float))
        );
        assert_eq!(
            Type::Function {
                params: vec![Type::Int],
                ret: Box::new(Type::Void),
            },
            Type::Function {
                params: vec![Type::Int],
                ret: Box::new(Type::Void),
            }
        );
    }

    #[test]
    fn nullable_collapses() {
        let once = Type::nullable(Type::Int);
        let twice = Type::nullable(once.clone());
        assert_eq!(once, twice);
        assert_eq!(Type::nullable(Type::Null), Type::Null);
    }

    #[test]
    fn implicit_conversions() {
        assert!(Type::Int.converts_to(&Type::Float));
        assert!(!Type::Float.converts_to(&Type::Int));
        assert!(Type::Null.converts_to(&Type::nullable(Type::Int)));
        assert!(Type::Int.converts_to(&Type::nullable(Type::Int)));
        // int -> float -> float? transitively
        assert!(Type::Int.converts_to(&Type::nullable(Type::Float)));
        assert!(!Type::String.converts_to(&Type::nullable(Type::Int)));
        // nullables do not convert between themselves
        assert!(!Type::nullable(Type::Int).converts_to(&Type::nullable(Type::Float)));
    }

    #[test]
    fn casts_allow_numeric_narrowing() {
        assert!(Type::Float.castable_to(&Type::Int));
        assert!(Type::Int.castable_to(&Type::Float));
        assert!(!Type::String.castable_to(&Type::Int));
    }

    #[test]
    fn display_names() {
        let (scopes, id) = tree_with_class("A");
        assert_eq!(Type::Class(id).display_name(&scopes), "A");
        assert_eq!(
            Type::nullable(Type::Class(id)).display_name(&scopes),
            "A?"
        );
        assert_eq!(
            Type::List(Box::new(Type::Int)).display_name(&scopes),
            "list<int>"
        );
        assert_eq!(
            Type::Function {
                params: vec![Type::String],
                ret: Box::new(Type::Int),
            }
            .display_name(&scopes),
            "function<int, string>"
        );
        assert_eq!(
            Type::meta(Type::Int).display_name(&scopes),
            "type int"
        );
    }
}
