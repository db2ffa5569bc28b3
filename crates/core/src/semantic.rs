//! Semantic analysis: build the symbol table of declared modules and
//! check every module reference against it.
//!
//! Runs in two passes. The record pass registers imports, definitions and
//! inline `start` definitions in source order; the check pass walks the
//! whole program resolving `export`, `start` and `goto` targets. Neither
//! pass aborts: all diagnostics are collected.

use std::collections::HashMap;

use crate::ast::*;
use crate::error::Diagnostic;
use crate::lexer::Range;

/// What a name in the symbol table was declared by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Inference(InferenceDefinition),
    Import(ImportStatement),
}

impl Definition {
    pub fn range(&self) -> Range {
        match self {
            Definition::Inference(d) => d.range,
            Definition::Import(i) => i.range,
        }
    }

    pub fn node_kind(&self) -> NodeKind {
        match self {
            Definition::Inference(_) => NodeKind::InferenceDefinition,
            Definition::Import(_) => NodeKind::ImportStatement,
        }
    }
}

/// One symbol table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inference {
    pub identifier: Identifier,
    pub definition: Definition,
}

/// Declared modules keyed by name (angle brackets stripped), iterated in
/// registration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<Inference>,
    by_name: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn get(&self, name: &str) -> Option<&Inference> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Inference> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.identifier.name())
    }

    /// Register `inference` unless its name is taken. Returns false on a
    /// collision, leaving the first entry in place.
    fn insert(&mut self, inference: Inference) -> bool {
        let name = inference.identifier.name();
        if self.by_name.contains_key(name) {
            return false;
        }
        self.by_name.insert(name.to_owned(), self.entries.len());
        self.entries.push(inference);
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct SemanticResult {
    pub semantic_errors: Vec<Diagnostic>,
    pub table: SymbolTable,
}

pub fn analysis(program: &Program) -> SemanticResult {
    let mut analyzer = Analyzer::default();
    analyzer.record(program);
    analyzer.check_program(program);
    tracing::debug!(
        symbols = analyzer.table.len(),
        errors = analyzer.errors.len(),
        "analyzed program"
    );
    SemanticResult {
        semantic_errors: analyzer.errors,
        table: analyzer.table,
    }
}

#[derive(Default)]
struct Analyzer {
    table: SymbolTable,
    errors: Vec<Diagnostic>,
}

impl Analyzer {
    // -- Record pass --------------------------------------------

    fn record(&mut self, program: &Program) {
        for statement in &program.module_statements {
            match statement {
                ModuleStatement::Import(import) => {
                    for identifier in &import.items {
                        self.add(Inference {
                            identifier: identifier.clone(),
                            definition: Definition::Import(import.clone()),
                        });
                    }
                }
                ModuleStatement::Definition(definition) => self.add(Inference {
                    identifier: definition.identifier.clone(),
                    definition: Definition::Inference(definition.clone()),
                }),
                ModuleStatement::Start(start) => {
                    if let Some(definition) = &start.module.definition {
                        self.add(Inference {
                            identifier: start.module.identifier.clone(),
                            definition: Definition::Inference(definition.clone()),
                        });
                    }
                }
                ModuleStatement::Export(_) => {}
            }
        }
    }

    fn add(&mut self, inference: Inference) {
        let name = inference.identifier.name().to_owned();
        let node = inference.definition.node_kind();
        let range = inference.definition.range();
        if !self.table.insert(inference) {
            self.report(
                node,
                range,
                format!("Module {} has been declared twice", name),
            );
        }
    }

    // -- Check pass ---------------------------------------------

    fn check_program(&mut self, program: &Program) {
        for statement in &program.module_statements {
            match statement {
                ModuleStatement::Import(_) => {}
                ModuleStatement::Export(export) => self.check_module(&export.module),
                ModuleStatement::Start(start) => self.check_module(&start.module),
                ModuleStatement::Definition(definition) => self.check_block(&definition.block),
            }
        }
    }

    fn check_module(&mut self, module: &Module) {
        let name = module.identifier.name();
        if !self.table.contains(name) {
            self.report(
                NodeKind::Module,
                module.range,
                format!("Module {} has not been declared", name),
            );
        }
        if let Some(definition) = &module.definition {
            self.check_block(&definition.block);
        }
    }

    fn check_block(&mut self, block: &Block) {
        for statement in &block.statements {
            match statement {
                Statement::Step(_) => {}
                Statement::If(s) => {
                    self.check_block(&s.if_block);
                    if let Some(else_block) = &s.else_block {
                        self.check_block(else_block);
                    }
                }
                Statement::Switch(s) => {
                    for case in &s.switch_block.case_clauses {
                        self.check_block(&case.block);
                    }
                    if let Some(default) = &s.switch_block.default_clause {
                        self.check_block(&default.block);
                    }
                }
                Statement::Goto(s) => {
                    let name = s.identifier.name();
                    if !self.table.contains(name) {
                        self.report(
                            NodeKind::GotoStatement,
                            s.range,
                            format!("Module {} has not been declared", name),
                        );
                    }
                }
            }
        }
    }

    fn report(&mut self, node: NodeKind, range: Range, message: String) {
        self.errors.push(Diagnostic::semantic(node, range, message));
    }
}
