use super::Parser;
use crate::ast::{
    Action, Block, CaseClause, Comment, DefaultClause, ExportStatement, GotoStatement, Identifier,
    IfStatement, ImportStatement, InferenceDefinition, Module, ModuleStatement, SourcePath,
    StartStatement, Statement, StepStatement, SwitchBlock, SwitchStatement,
};
use crate::error::Diagnostic;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    // -- Module statements --------------------------------------

    pub(super) fn module_statement(&mut self) -> Result<ModuleStatement, Diagnostic> {
        let t = self.peek();
        if t.is_keyword("import") {
            self.import().map(ModuleStatement::Import)
        } else if t.is_keyword("export") {
            self.export().map(ModuleStatement::Export)
        } else if t.is_keyword("start") {
            self.start().map(ModuleStatement::Start)
        } else if t.kind == TokenKind::Identifier {
            self.definition(Vec::new()).map(ModuleStatement::Definition)
        } else {
            Err(self.err(format!(
                "expected 'import', 'export', 'start' or a definition, got {}",
                self.describe()
            )))
        }
    }

    fn identifier(&mut self) -> Result<Identifier, Diagnostic> {
        let t = self.expect_kind(TokenKind::Identifier, "identifier")?;
        Ok(Identifier {
            word: t.word,
            range: t.range,
        })
    }

    fn action(&mut self) -> Result<Action, Diagnostic> {
        let t = self.expect_kind(TokenKind::Action, "action")?;
        Ok(Action {
            word: t.word,
            range: t.range,
        })
    }

    fn import(&mut self) -> Result<ImportStatement, Diagnostic> {
        let start = self.expect_keyword("import")?.range.start;
        let mut items = vec![self.identifier()?];
        while self.is_operator(",") {
            self.advance();
            items.push(self.identifier()?);
        }
        self.expect_keyword("from")?;
        let t = self.expect_kind(TokenKind::Path, "path")?;
        Ok(ImportStatement {
            items,
            path: SourcePath {
                word: t.word,
                range: t.range,
            },
            comments: Vec::new(),
            range: self.span_from(start),
        })
    }

    fn export(&mut self) -> Result<ExportStatement, Diagnostic> {
        let start = self.expect_keyword("export")?.range.start;
        let module = self.module()?;
        Ok(ExportStatement {
            module,
            comments: Vec::new(),
            range: self.span_from(start),
        })
    }

    fn start(&mut self) -> Result<StartStatement, Diagnostic> {
        let start = self.expect_keyword("start")?.range.start;
        let module = self.module()?;
        Ok(StartStatement {
            module,
            comments: Vec::new(),
            range: self.span_from(start),
        })
    }

    fn module(&mut self) -> Result<Module, Diagnostic> {
        let identifier = self.identifier()?;
        let start = identifier.range.start;
        let definition = if self.is_operator("=") {
            self.advance();
            let block = self.block()?;
            Some(InferenceDefinition {
                identifier: identifier.clone(),
                block,
                comments: Vec::new(),
                range: self.span_from(start),
            })
        } else {
            None
        };
        Ok(Module {
            identifier,
            definition,
            range: self.span_from(start),
        })
    }

    fn definition(&mut self, comments: Vec<Comment>) -> Result<InferenceDefinition, Diagnostic> {
        let identifier = self.identifier()?;
        self.expect_operator("=")?;
        let block = self.block()?;
        Ok(InferenceDefinition {
            range: self.span_from(identifier.range.start),
            identifier,
            block,
            comments,
        })
    }

    // -- Blocks and statements ----------------------------------

    fn block(&mut self) -> Result<Block, Diagnostic> {
        let start = self.open_brace()?;
        let mut statements = Vec::new();
        loop {
            let comments = self.take_comments();
            if self.is_operator("}") {
                self.advance();
                return Ok(Block {
                    statements,
                    trailing_comments: comments,
                    range: self.span_from(start),
                });
            }
            if self.at_eop() {
                return Err(self.err(format!("expected '}}', got {}", self.describe())));
            }
            statements.push(self.statement(comments)?);
        }
    }

    fn statement(&mut self, comments: Vec<Comment>) -> Result<Statement, Diagnostic> {
        let t = self.peek();
        if t.kind == TokenKind::Action {
            let action = self.action()?;
            Ok(Statement::Step(StepStatement {
                range: action.range,
                action,
                comments,
            }))
        } else if t.is_keyword("if") {
            self.if_statement(comments).map(Statement::If)
        } else if t.is_keyword("switch") {
            self.switch_statement(comments).map(Statement::Switch)
        } else if t.is_keyword("goto") {
            let start = self.expect_keyword("goto")?.range.start;
            let identifier = self.identifier()?;
            Ok(Statement::Goto(GotoStatement {
                identifier,
                comments,
                range: self.span_from(start),
            }))
        } else {
            Err(self.err(format!("expected a statement, got {}", self.describe())))
        }
    }

    fn if_statement(&mut self, comments: Vec<Comment>) -> Result<IfStatement, Diagnostic> {
        let start = self.expect_keyword("if")?.range.start;
        let condition = self.action()?;
        self.expect_operator("->")?;
        let if_block = self.block()?;
        let else_block = if self.is_keyword("else") {
            self.advance();
            self.expect_operator("->")?;
            Some(self.block()?)
        } else {
            None
        };
        Ok(IfStatement {
            condition,
            if_block,
            else_block,
            comments,
            range: self.span_from(start),
        })
    }

    fn switch_statement(&mut self, comments: Vec<Comment>) -> Result<SwitchStatement, Diagnostic> {
        let start = self.expect_keyword("switch")?.range.start;
        let condition = self.action()?;
        let switch_block = self.switch_block()?;
        Ok(SwitchStatement {
            condition,
            switch_block,
            comments,
            range: self.span_from(start),
        })
    }

    fn switch_block(&mut self) -> Result<SwitchBlock, Diagnostic> {
        let start = self.open_brace()?;
        let mut case_clauses = Vec::new();
        let mut default_clause: Option<DefaultClause> = None;
        loop {
            let comments = self.take_comments();
            if self.is_operator("}") {
                self.advance();
                return Ok(SwitchBlock {
                    case_clauses,
                    default_clause,
                    trailing_comments: comments,
                    range: self.span_from(start),
                });
            }
            if self.is_keyword("case") {
                if default_clause.is_some() {
                    return Err(self.err("case clause after default"));
                }
                let clause_start = self.advance().range.start;
                let expectation = self.action()?;
                self.expect_operator("->")?;
                let block = self.block()?;
                case_clauses.push(CaseClause {
                    expectation,
                    block,
                    comments,
                    range: self.span_from(clause_start),
                });
            } else if self.is_keyword("default") {
                if default_clause.is_some() {
                    return Err(self.err("duplicate default clause"));
                }
                let clause_start = self.advance().range.start;
                self.expect_operator("->")?;
                let block = self.block()?;
                default_clause = Some(DefaultClause {
                    block,
                    comments,
                    range: self.span_from(clause_start),
                });
            } else {
                return Err(self.err(format!(
                    "expected 'case', 'default' or '}}', got {}",
                    self.describe()
                )));
            }
        }
    }
}
