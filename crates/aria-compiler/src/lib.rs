//! Front-end for the aria language: a small statically-typed,
//! class-based source language with overloading, nullable types, and
//! local type inference, compiled ahead of a JavaScript back-end.
//!
//! The crate lexes and parses one module at a time and then runs the
//! semantic pipeline ([`semantic::analyze`]), which decorates the AST
//! in place: every expression gets a type, every name a symbol, every
//! block a scope, overloads are picked, and implicit conversions become
//! explicit cast nodes. A non-empty error list in the
//! [`DiagnosticBag`](aria_common::DiagnosticBag) is the one and only
//! failure signal.
//!
//! ```no_run
//! use aria_common::DiagnosticBag;
//! use aria_compiler::{parser, semantic};
//!
//! let (mut module, mut diagnostics) = parser::parse_module("int x", "demo.aria");
//! let analysis = semantic::analyze(&mut module, &mut diagnostics);
//! assert!(analysis.ok);
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod semantic;
