//! graphlang-core: front end for the graphlang flow language.
//!
//! Source text goes through the lexer, the recovering parser and the
//! semantic analyzer; a parsed program can then be lowered to the Tree
//! Model of `graphlang-tree` and printed back as canonical source.
//!
//! # Public API
//!
//! - [`analyze()`] -- run lexer, parser and semantic checks over a source
//! - [`lex()`], [`parse()`], [`parse_recovering()`], [`analysis()`] -- the
//!   individual stages
//! - [`program_to_tree()`] -- lower a [`Program`] to a [`Tree`]
//! - [`print_tree()`] -- render a [`Tree`] as canonical source
//! - [`Diagnostic`] -- lexical, syntax and semantic diagnostics

pub mod analyze;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod print;
pub mod semantic;
pub mod transit;

// ── Convenience re-exports: key types ────────────────────────────────

pub use analyze::Analysis;
pub use ast::{NodeKind, Program};
pub use error::{Diagnostic, DiagnosticClass};
pub use graphlang_tree::Tree;
pub use lexer::{Lexed, Lexer, Position, Range, Token, TokenKind};
pub use semantic::{Definition, Inference, SemanticResult, SymbolTable};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use analyze::analyze;
pub use lexer::lex;
pub use parser::{parse, parse_recovering, DEFAULT_MAX_ERRORS};
pub use print::print_tree;
pub use semantic::analysis;
pub use transit::program_to_tree;
