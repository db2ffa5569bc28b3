/// Recursive-descent parser from tokens to the syntax tree.
/// Comment tokens are trivia: they are collected as leading comments of
/// the next statement or clause, or trailing comments of a block.
use crate::ast::{Comment, Program};
use crate::error::Diagnostic;
use crate::lexer::{Position, Range, Token, TokenKind};
use graphlang_tree::MAX_NESTING;

mod statements;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Braces opened and not yet closed.
    depth: usize,
    /// Comments passed over by `advance`, not yet attached to a node.
    pending: Vec<Comment>,
    last_end: Position,
    eop: Token,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let end = tokens.last().map(|t| t.range.end).unwrap_or_default();
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            pending: Vec::new(),
            last_end: Position::default(),
            eop: Token {
                kind: TokenKind::Eop,
                word: String::new(),
                range: Range { start: end, end },
            },
        }
    }

    /// Next significant token, looking past comments.
    fn peek(&self) -> &Token {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .find(|t| t.kind != TokenKind::Comment)
            .unwrap_or(&self.eop)
    }

    fn skip_comments(&mut self) {
        while let Some(t) = self.tokens.get(self.pos) {
            if t.kind != TokenKind::Comment {
                break;
            }
            self.pending.push(Comment::from_token(t));
            self.pos += 1;
        }
    }

    fn advance(&mut self) -> Token {
        self.skip_comments();
        let Some(t) = self.tokens.get(self.pos) else {
            return self.eop.clone();
        };
        if t.kind != TokenKind::Eop {
            self.pos += 1;
        }
        if t.is_operator("{") {
            self.depth += 1;
        } else if t.is_operator("}") {
            self.depth = self.depth.saturating_sub(1);
        }
        self.last_end = t.range.end;
        t.clone()
    }

    fn at_eop(&self) -> bool {
        self.peek().kind == TokenKind::Eop
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        self.peek().is_keyword(keyword)
    }

    fn is_operator(&self, operator: &str) -> bool {
        self.peek().is_operator(operator)
    }

    fn is_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<Token, Diagnostic> {
        if self.is_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.err(format!("expected '{}', got {}", keyword, self.describe())))
        }
    }

    fn expect_operator(&mut self, operator: &str) -> Result<Token, Diagnostic> {
        if self.is_operator(operator) {
            Ok(self.advance())
        } else {
            Err(self.err(format!("expected '{}', got {}", operator, self.describe())))
        }
    }

    fn expect_kind(&mut self, kind: TokenKind, what: &str) -> Result<Token, Diagnostic> {
        if self.is_kind(kind) {
            Ok(self.advance())
        } else {
            Err(self.err(format!("expected {}, got {}", what, self.describe())))
        }
    }

    /// Consume an opening brace, refusing to nest past [`MAX_NESTING`].
    fn open_brace(&mut self) -> Result<Position, Diagnostic> {
        let open = self.expect_operator("{")?;
        if self.depth > MAX_NESTING {
            return Err(Diagnostic::syntax(
                open.range,
                format!("blocks nested deeper than {} levels", MAX_NESTING),
            ));
        }
        Ok(open.range.start)
    }

    fn describe(&self) -> String {
        let t = self.peek();
        match t.kind {
            TokenKind::Eop => "end of program".to_owned(),
            _ => format!("'{}'", t.word),
        }
    }

    fn err(&self, msg: impl Into<String>) -> Diagnostic {
        Diagnostic::syntax(self.peek().range, msg)
    }

    /// Range from `start` up to the end of the last consumed token.
    fn span_from(&self, start: Position) -> Range {
        Range {
            start,
            end: self.last_end,
        }
    }

    /// Drain every comment between the last consumed token and the next
    /// significant one.
    fn take_comments(&mut self) -> Vec<Comment> {
        self.skip_comments();
        std::mem::take(&mut self.pending)
    }

    // -- Program ------------------------------------------------

    fn program(&mut self, max_errors: usize) -> (Program, Vec<Diagnostic>) {
        let start = self.peek().range.start;
        let mut program = Program::default();
        let mut errors = Vec::new();

        loop {
            let comments = self.take_comments();
            if self.at_eop() {
                program.comments.extend(comments);
                break;
            }
            let (detached, attached) = split_attached(comments, self.peek().range.start.line);
            program.comments.extend(detached);

            let statement_start = self.pos;
            match self.module_statement() {
                Ok(mut statement) => {
                    statement.comments_mut().splice(0..0, attached);
                    program.module_statements.push(statement);
                }
                Err(e) => {
                    errors.push(e);
                    if errors.len() >= max_errors {
                        break;
                    }
                    self.recover_to_next_statement();
                    if self.pos == statement_start {
                        self.advance();
                    }
                }
            }
        }

        let end = self.peek().range.end;
        program.range = Range { start, end };
        (program, errors)
    }

    /// Whether the next token can begin a module statement.
    fn is_module_start(&self) -> bool {
        let t = self.peek();
        t.kind == TokenKind::Identifier
            || t.is_keyword("import")
            || t.is_keyword("export")
            || t.is_keyword("start")
    }

    /// Skip tokens until the brace that closes the broken statement, or a
    /// module statement start at nesting level 0.
    fn recover_to_next_statement(&mut self) {
        loop {
            let t = self.peek();
            if t.kind == TokenKind::Eop {
                break;
            }
            if t.is_operator("}") {
                let closes_statement = self.depth <= 1;
                self.advance();
                if closes_statement {
                    break;
                }
                continue;
            }
            if self.depth == 0 && self.is_module_start() {
                break;
            }
            self.advance();
        }
        self.depth = 0;
    }
}

/// Split a run of comments before the statement starting on `line` into
/// the detached prefix and the suffix sitting on the lines directly above.
fn split_attached(mut comments: Vec<Comment>, line: u32) -> (Vec<Comment>, Vec<Comment>) {
    let mut expected = line;
    let mut at = comments.len();
    while at > 0 {
        let comment_line = comments[at - 1].range.start.line;
        if comment_line + 1 != expected {
            break;
        }
        expected = comment_line;
        at -= 1;
    }
    let attached = comments.split_off(at);
    (comments, attached)
}

/// Default maximum number of errors collected in recovering mode.
pub const DEFAULT_MAX_ERRORS: usize = 10;

/// Parse a token stream, stopping at the first syntax error.
pub fn parse(tokens: &[Token]) -> Result<Program, Diagnostic> {
    let (program, errors) = Parser::new(tokens).program(1);
    match errors.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(program),
    }
}

/// Parse in multi-error recovery mode.
///
/// Returns the program built from every module statement that parsed,
/// plus the collected syntax errors. After an error the parser skips to
/// the brace closing the broken statement, or to the next `import`,
/// `export`, `start` or definition at nesting level 0, then resumes.
pub fn parse_recovering(tokens: &[Token], max_errors: usize) -> (Program, Vec<Diagnostic>) {
    let (program, errors) = Parser::new(tokens).program(max_errors);
    tracing::debug!(
        statements = program.module_statements.len(),
        errors = errors.len(),
        "parsed program"
    );
    (program, errors)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
