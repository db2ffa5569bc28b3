//! Whole-document analysis: lexer, recovering parser and semantic checks
//! run in order over one source string.
//!
//! This is the entry point an editor calls on every change.

use graphlang_tree::Tree;

use crate::ast::Program;
use crate::error::Diagnostic;
use crate::lexer::{self, Token};
use crate::parser::{self, DEFAULT_MAX_ERRORS};
use crate::semantic::{self, SymbolTable};
use crate::transit;

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub lexical_errors: Vec<Diagnostic>,
    pub syntax_errors: Vec<Diagnostic>,
    pub semantic_errors: Vec<Diagnostic>,
    pub table: SymbolTable,
    /// The statements that parsed. Partial when `syntax_errors` is non-empty.
    pub program: Program,
}

impl Analysis {
    /// All diagnostics, lexical first, then syntax, then semantic.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lexical_errors
            .iter()
            .chain(&self.syntax_errors)
            .chain(&self.semantic_errors)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics().next().is_some()
    }

    pub fn tree(&self) -> Tree {
        transit::program_to_tree(&self.program)
    }
}

/// Run the front end over `src`.
///
/// Every diagnostic class is collected in one pass. Semantic analysis runs
/// over whatever part of the program parsed, so a document with a broken
/// statement still gets its table and reference checks.
pub fn analyze(src: &str) -> Analysis {
    let lexed = lexer::lex(src);
    let (program, syntax_errors) = parser::parse_recovering(&lexed.tokens, DEFAULT_MAX_ERRORS);
    let semantic::SemanticResult {
        semantic_errors,
        table,
    } = semantic::analysis(&program);

    tracing::debug!(
        tokens = lexed.tokens.len(),
        lexical = lexed.errors.len(),
        syntax = syntax_errors.len(),
        semantic = semantic_errors.len(),
        "analyzed source"
    );

    Analysis {
        tokens: lexed.tokens,
        lexical_errors: lexed.errors,
        syntax_errors,
        semantic_errors,
        table,
        program,
    }
}
