use std::fs;
use std::path::PathBuf;
use std::process;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::Parser;

use aria_compiler::lexer::Lexer;
use aria_compiler::parser;
use aria_compiler::semantic::{self, rename::RenameOptions};

/// Aria language checker.
///
/// Runs the full front-end (lexer, parser, semantic pipeline) over one
/// .aria module and reports diagnostics.
#[derive(Parser)]
#[command(
    name = "ariac",
    version,
    about,
    long_about = "Aria language checker.\n\nRuns the front-end over one .aria module: structural checks, symbol\nand scope construction, type checking with overload resolution, flow\nvalidation, and default initialization.\n\nExamples:\n  ariac hello.aria                Check the module\n  ariac hello.aria --emit-ast     Print the decorated AST\n  ariac hello.aria --rename       Also mangle names for a JavaScript back-end"
)]
struct Cli {
    /// Input .aria source file.
    input: PathBuf,

    /// Suppress warning output.
    #[arg(short, long)]
    quiet: bool,

    /// Emit token stream to stdout (debug).
    #[arg(long = "emit-tokens")]
    emit_tokens: bool,

    /// Emit the decorated AST to stdout (debug).
    #[arg(long = "emit-ast")]
    emit_ast: bool,

    /// Emit the symbol table to stdout.
    #[arg(long = "emit-symbols")]
    emit_symbols: bool,

    /// Run the rename pass against the JavaScript reserved words and
    /// disambiguate overloads.
    #[arg(long)]
    rename: bool,
}

fn main() {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{}': {}", cli.input.display(), e);
            process::exit(1);
        }
    };

    let file_name = cli
        .input
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    // === Lexer ===
    let (tokens, lex_diags) = Lexer::new(&source, &file_name).tokenize();

    if lex_diags.has_errors() {
        for diag in lex_diags.diagnostics() {
            print_diagnostic(diag, &source, &file_name);
        }
        process::exit(1);
    }

    if cli.emit_tokens {
        for token in &tokens {
            println!(
                "{:>4}:{:<3} {:?} {:?}",
                token.span.line, token.span.column, token.kind, token.lexeme,
            );
        }
        return;
    }

    // === Parser ===
    let (mut module, mut diagnostics) = {
        let (module, parse_diags) = parser::Parser::new(tokens).parse();
        (module, parse_diags)
    };

    if diagnostics.has_errors() {
        for diag in diagnostics.diagnostics() {
            print_diagnostic(diag, &source, &file_name);
        }
        process::exit(1);
    }

    // === Semantic analysis ===
    let analysis = if cli.rename {
        let mut options = RenameOptions::with_reserved_words(semantic::JS_RESERVED);
        options.rename_overloads = true;
        semantic::analyze_and_rename(&mut module, &mut diagnostics, &options)
    } else {
        semantic::analyze(&mut module, &mut diagnostics)
    };

    for diag in diagnostics.diagnostics() {
        if diag.is_error() || !cli.quiet {
            print_diagnostic(diag, &source, &file_name);
        }
    }
    if !analysis.ok {
        process::exit(1);
    }

    if cli.emit_ast {
        println!("{:#?}", module);
        return;
    }

    if cli.emit_symbols {
        let scopes = &analysis.scopes;
        for scope_id in scopes.scope_ids() {
            let scope = scopes.scope(scope_id);
            if scope.entries().is_empty() {
                continue;
            }
            println!("{:?} scope:", scope.kind);
            for (name, id) in scope.entries() {
                let symbol = scopes.symbol(*id);
                println!(
                    "  {} -> {} : {}",
                    name,
                    symbol.final_name,
                    symbol.ty.display_name(scopes)
                );
            }
        }
        return;
    }

    println!("No errors found.");
}

fn print_diagnostic(diag: &aria_common::Diagnostic, source: &str, file_name: &str) {
    let kind = if diag.is_error() {
        ReportKind::Error
    } else {
        ReportKind::Warning
    };

    if let Some(ref span) = diag.span {
        let range = span.byte_range();
        let (start, end) = (range.start, range.end.max(range.start + 1));

        let color = if diag.is_error() {
            Color::Red
        } else {
            Color::Yellow
        };

        let mut report = Report::build(kind, file_name, start)
            .with_message(&diag.message)
            .with_label(
                Label::new((file_name, start..end))
                    .with_message(&diag.message)
                    .with_color(color),
            );

        for related in &diag.related {
            let range = related.span.byte_range();
            let (rs, re) = (range.start, range.end.max(range.start + 1));
            report = report.with_label(
                Label::new((file_name, rs..re))
                    .with_message(&related.message)
                    .with_color(Color::Blue),
            );
        }

        report
            .finish()
            .eprint((file_name, Source::from(source)))
            .unwrap();
    } else {
        eprintln!("{}", diag);
    }
}
