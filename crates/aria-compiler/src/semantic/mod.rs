pub mod check;
pub mod define;
pub mod flow;
pub mod init;
pub mod operators;
pub mod overloads;
pub mod rename;
pub mod scope;
pub mod signatures;
pub mod structure;
pub mod types;

use aria_common::DiagnosticBag;

use crate::ast::Module;

use self::rename::RenameOptions;
use self::scope::ScopeTree;

/// The result of running the semantic pipeline: the scope tree the AST
/// decorations point into, and whether compilation may continue.
#[derive(Debug)]
pub struct Analysis {
    pub scopes: ScopeTree,
    pub ok: bool,
}

/// Run all semantic passes on the given module, in order:
///
///  1. Structural check (statement placement, external-block rules)
///  2. Define symbols (scope tree, overload folding)
///  3. Compute symbol types (signatures before bodies)
///  4. Compute types (expression checking, overload resolution,
///     implicit-conversion casts, constructor detection)
///  5. Flow validation (dead code, missing returns, use before def)
///  6. Default initialization
///
/// Each pass runs to completion over the whole module so the user sees
/// all errors of one stage together; the pipeline stops after the first
/// pass that reported errors, because every pass relies on the
/// decorations of the previous one.
pub fn analyze(module: &mut Module, diagnostics: &mut DiagnosticBag) -> Analysis {
    let mut scopes = ScopeTree::new();

    macro_rules! pass {
        ($body:expr) => {
            let before = diagnostics.error_count();
            $body;
            if diagnostics.error_count() > before {
                return Analysis { scopes, ok: false };
            }
        };
    }

    pass!(structure::check(module, diagnostics));
    pass!(define::run(module, &mut scopes, diagnostics));
    pass!(signatures::run(module, &mut scopes, diagnostics));
    pass!(check::run(module, &mut scopes, diagnostics));
    pass!(flow::run(module, &scopes, diagnostics));

    init::run(module, &scopes);
    Analysis { scopes, ok: true }
}

/// [`analyze`], then the optional rename pass (which never fails).
pub fn analyze_and_rename(
    module: &mut Module,
    diagnostics: &mut DiagnosticBag,
    options: &RenameOptions,
) -> Analysis {
    let mut analysis = analyze(module, diagnostics);
    if analysis.ok {
        rename::run(&mut analysis.scopes, options);
    }
    analysis
}

/// The JavaScript reserved words the `--rename` mode guards against,
/// for the JavaScript back-end this front-end feeds.
pub const JS_RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];
