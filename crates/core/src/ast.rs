//! Syntax tree produced by the parser.
//!
//! Every node carries the [`Range`] it was parsed from. Statements,
//! definitions and clauses own the comment lines directly above them;
//! blocks own the comments between their last statement and the closing
//! brace.

use serde::{Deserialize, Serialize};

use crate::lexer::{strip_delimiters, Range, Token};

// ──────────────────────────────────────────────
// Node kinds
// ──────────────────────────────────────────────

/// Tag naming an AST node type, used by diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    ImportStatement,
    ExportStatement,
    StartStatement,
    Module,
    InferenceDefinition,
    Block,
    StepStatement,
    IfStatement,
    SwitchStatement,
    SwitchBlock,
    CaseClause,
    DefaultClause,
    GotoStatement,
    Identifier,
    Action,
    Path,
}

// ──────────────────────────────────────────────
// Leaves
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Text after `#`, trimmed.
    pub text: String,
    pub range: Range,
}

impl Comment {
    pub fn from_token(token: &Token) -> Self {
        Comment {
            text: token.content().to_owned(),
            range: token.range,
        }
    }
}

/// `<name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub word: String,
    pub range: Range,
}

impl Identifier {
    /// The name with angle brackets stripped; the symbol table key.
    pub fn name(&self) -> &str {
        strip_delimiters(&self.word)
    }
}

/// `[text]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub word: String,
    pub range: Range,
}

impl Action {
    pub fn content(&self) -> &str {
        strip_delimiters(&self.word)
    }
}

/// `"path"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    pub word: String,
    pub range: Range,
}

impl SourcePath {
    pub fn content(&self) -> &str {
        strip_delimiters(&self.word)
    }
}

// ──────────────────────────────────────────────
// Module level
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub module_statements: Vec<ModuleStatement>,
    /// Comments not attached to any statement: runs separated from the
    /// next statement by a blank line, and comments after the last one.
    pub comments: Vec<Comment>,
    pub range: Range,
}

impl Program {
    pub fn definitions(&self) -> impl Iterator<Item = &InferenceDefinition> {
        self.module_statements.iter().filter_map(|s| match s {
            ModuleStatement::Definition(d) => Some(d),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleStatement {
    Import(ImportStatement),
    Export(ExportStatement),
    Start(StartStatement),
    Definition(InferenceDefinition),
}

impl ModuleStatement {
    pub fn comments(&self) -> &[Comment] {
        match self {
            ModuleStatement::Import(s) => &s.comments,
            ModuleStatement::Export(s) => &s.comments,
            ModuleStatement::Start(s) => &s.comments,
            ModuleStatement::Definition(d) => &d.comments,
        }
    }

    pub fn range(&self) -> Range {
        match self {
            ModuleStatement::Import(s) => s.range,
            ModuleStatement::Export(s) => s.range,
            ModuleStatement::Start(s) => s.range,
            ModuleStatement::Definition(d) => d.range,
        }
    }

    pub(crate) fn comments_mut(&mut self) -> &mut Vec<Comment> {
        match self {
            ModuleStatement::Import(s) => &mut s.comments,
            ModuleStatement::Export(s) => &mut s.comments,
            ModuleStatement::Start(s) => &mut s.comments,
            ModuleStatement::Definition(d) => &mut d.comments,
        }
    }
}

/// `import <a>, <b> from "path"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub items: Vec<Identifier>,
    pub path: SourcePath,
    pub comments: Vec<Comment>,
    pub range: Range,
}

/// `export <name>` or `export <name> = { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStatement {
    pub module: Module,
    pub comments: Vec<Comment>,
    pub range: Range,
}

/// `start <name>` or `start <name> = { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartStatement {
    pub module: Module,
    pub comments: Vec<Comment>,
    pub range: Range,
}

/// A module reference with an optional inline definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub identifier: Identifier,
    pub definition: Option<InferenceDefinition>,
    pub range: Range,
}

/// `<name> = { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceDefinition {
    pub identifier: Identifier,
    pub block: Block,
    pub comments: Vec<Comment>,
    pub range: Range,
}

// ──────────────────────────────────────────────
// Statements
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub trailing_comments: Vec<Comment>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Step(StepStatement),
    If(IfStatement),
    Switch(SwitchStatement),
    Goto(GotoStatement),
}

impl Statement {
    pub fn comments(&self) -> &[Comment] {
        match self {
            Statement::Step(s) => &s.comments,
            Statement::If(s) => &s.comments,
            Statement::Switch(s) => &s.comments,
            Statement::Goto(s) => &s.comments,
        }
    }

    pub fn range(&self) -> Range {
        match self {
            Statement::Step(s) => s.range,
            Statement::If(s) => s.range,
            Statement::Switch(s) => s.range,
            Statement::Goto(s) => s.range,
        }
    }
}

/// A bare `[action]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepStatement {
    pub action: Action,
    pub comments: Vec<Comment>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStatement {
    pub condition: Action,
    pub if_block: Block,
    pub else_block: Option<Block>,
    pub comments: Vec<Comment>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchStatement {
    pub condition: Action,
    pub switch_block: SwitchBlock,
    pub comments: Vec<Comment>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchBlock {
    pub case_clauses: Vec<CaseClause>,
    pub default_clause: Option<DefaultClause>,
    pub trailing_comments: Vec<Comment>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseClause {
    pub expectation: Action,
    pub block: Block,
    pub comments: Vec<Comment>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultClause {
    pub block: Block,
    pub comments: Vec<Comment>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GotoStatement {
    pub identifier: Identifier,
    pub comments: Vec<Comment>,
    pub range: Range,
}
