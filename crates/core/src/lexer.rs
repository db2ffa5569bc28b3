use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;

pub const KEYWORDS: &[&str] = &[
    "start", "goto", "if", "else", "switch", "case", "default", "import", "from", "export",
];

pub const OPERATORS: &[&str] = &["{", "}", "=", "->", ","];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    /// Operators and braces
    Operator,
    /// `<name>`
    Identifier,
    /// `[text]`
    Action,
    /// `"path"`
    Path,
    /// `#` to end of line
    Comment,
    /// End of program
    Eop,
}

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

/// A span on one line; `end` is the column just past the last character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Smallest range covering both `self` and `other`.
    pub fn to(self, other: Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact lexeme, delimiters included.
    pub word: String,
    pub range: Range,
}

impl Token {
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.word == keyword
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.kind == TokenKind::Operator && self.word == operator
    }

    /// Literal body without delimiters. For comments, the text after `#`
    /// with surrounding whitespace trimmed.
    pub fn content(&self) -> &str {
        match self.kind {
            TokenKind::Identifier | TokenKind::Action | TokenKind::Path => strip_delimiters(&self.word),
            TokenKind::Comment => self.word.strip_prefix('#').unwrap_or(&self.word).trim(),
            TokenKind::Keyword | TokenKind::Operator | TokenKind::Eop => &self.word,
        }
    }
}

/// Drop the first and last character of a delimited literal.
pub fn strip_delimiters(word: &str) -> &str {
    let mut chars = word.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Output of a full lexer run.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    /// Always ends with exactly one `Eop` token.
    pub tokens: Vec<Token>,
    pub errors: Vec<Diagnostic>,
}

/// Maximal-munch lexer over one source string.
///
/// `offset` marks the start of the current lexeme and `forward` the next
/// unread character; `line`/`column` is the position of `forward`.
pub struct Lexer {
    chars: Vec<char>,
    offset: usize,
    forward: usize,
    line: u32,
    column: u32,
    start: Position,
}

impl Lexer {
    pub fn new(src: &str) -> Self {
        Lexer {
            chars: src.chars().collect(),
            offset: 0,
            forward: 0,
            line: 1,
            column: 1,
            start: Position::default(),
        }
    }

    /// Consume the whole input. Lexical errors are collected and scanning
    /// resumes after the discarded text.
    pub fn run(mut self) -> Lexed {
        let mut lexed = Lexed::default();
        loop {
            match self.next_token() {
                Ok(token) => {
                    let done = token.kind == TokenKind::Eop;
                    lexed.tokens.push(token);
                    if done {
                        break;
                    }
                }
                Err(e) => lexed.errors.push(e),
            }
        }
        tracing::debug!(
            tokens = lexed.tokens.len(),
            errors = lexed.errors.len(),
            "lexed source"
        );
        lexed
    }

    /// Produce the next token or lexical error. Once the input is
    /// exhausted every call returns an `Eop` token.
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_whitespace();
        self.begin();
        let Some(c) = self.current() else {
            return Ok(self.emit(TokenKind::Eop));
        };
        match c {
            '#' => Ok(self.comment()),
            '<' => self.literal(TokenKind::Identifier, '>', "Identifier"),
            '[' => self.literal(TokenKind::Action, ']', "Action"),
            '"' => self.literal(TokenKind::Path, '"', "Path"),
            c if c.is_ascii_alphabetic() => self.keyword(),
            _ => self.operator(),
        }
    }

    // -- Cursor ----------------------------------------------------

    fn current(&self) -> Option<char> {
        self.chars.get(self.forward).copied()
    }

    fn bump(&mut self) {
        if let Some(c) = self.current() {
            self.forward += 1;
            // `\r\n` breaks the line at its `\n`; a lone `\r` breaks it itself.
            let line_break = c == '\n' || (c == '\r' && self.current() != Some('\n'));
            if line_break {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn begin(&mut self) {
        self.offset = self.forward;
        self.start = self.position();
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn range(&self) -> Range {
        Range {
            start: self.start,
            end: self.position(),
        }
    }

    fn word(&self) -> String {
        self.chars[self.offset..self.forward].iter().collect()
    }

    fn emit(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            word: self.word(),
            range: self.range(),
        }
    }

    fn error(&self, message: String) -> Diagnostic {
        Diagnostic::lexical(self.range(), message)
    }

    // -- Matchers --------------------------------------------------

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn comment(&mut self) -> Token {
        self.bump();
        while matches!(self.current(), Some(c) if c != '\n' && c != '\r') {
            self.bump();
        }
        self.emit(TokenKind::Comment)
    }

    /// `open body close` where the body is any run of non-whitespace
    /// characters. There is no escape mechanism.
    fn literal(&mut self, kind: TokenKind, close: char, label: &str) -> Result<Token, Diagnostic> {
        self.bump();
        loop {
            match self.current() {
                Some(c) if c == close => {
                    self.bump();
                    return Ok(self.emit(kind));
                }
                Some(c) if !c.is_whitespace() => self.bump(),
                _ => {
                    return Err(self.error(format!("{}: {} has not been closed", label, self.word())))
                }
            }
        }
    }

    fn keyword(&mut self) -> Result<Token, Diagnostic> {
        while matches!(self.current(), Some(c) if c.is_ascii_alphabetic()) {
            self.bump();
        }
        let word = self.word();
        if is_keyword(&word) {
            Ok(self.emit(TokenKind::Keyword))
        } else {
            Err(self.error(format!("Unknown token: {}", word)))
        }
    }

    fn operator(&mut self) -> Result<Token, Diagnostic> {
        let c = self.current();
        self.bump();
        match c {
            Some('{' | '}' | '=' | ',') => Ok(self.emit(TokenKind::Operator)),
            Some('-') if self.current() == Some('>') => {
                self.bump();
                Ok(self.emit(TokenKind::Operator))
            }
            _ => Err(self.error(format!("Unknown token: {}", self.word()))),
        }
    }
}

/// Lex a whole source string.
pub fn lex(src: &str) -> Lexed {
    Lexer::new(src).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).tokens.iter().map(|t| t.kind).collect()
    }

    fn messages(src: &str) -> Vec<String> {
        lex(src).errors.into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn definition_lexes_to_expected_kinds() {
        let lexed = lex("<A> = {\n  [open]\n  goto <B>\n}");
        assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
        assert_eq!(
            kinds("<A> = {\n  [open]\n  goto <B>\n}"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Action,
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Eop,
            ]
        );
        let words: Vec<&str> = lexed.tokens.iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words, vec!["<A>", "=", "{", "[open]", "goto", "<B>", "}", ""]);
    }

    #[test]
    fn all_keywords_and_operators_are_recognized() {
        for kw in KEYWORDS {
            let lexed = lex(kw);
            assert!(lexed.errors.is_empty(), "{}", kw);
            assert!(lexed.tokens[0].is_keyword(kw));
        }
        for op in OPERATORS {
            let lexed = lex(op);
            assert!(lexed.errors.is_empty(), "{}", op);
            assert!(lexed.tokens[0].is_operator(op));
        }
    }

    #[test]
    fn ranges_track_lines_and_columns() {
        let lexed = lex("start <A>\n  goto <B>");
        let ranges: Vec<(u32, u32, u32)> = lexed
            .tokens
            .iter()
            .map(|t| (t.range.start.line, t.range.start.column, t.range.end.column))
            .collect();
        assert_eq!(
            ranges,
            vec![(1, 1, 6), (1, 7, 10), (2, 3, 7), (2, 8, 11), (2, 11, 11)]
        );
        for t in &lexed.tokens {
            assert_eq!(t.range.start.line, t.range.end.line);
            assert!(t.range.start.column <= t.range.end.column);
        }
    }

    #[test]
    fn bare_carriage_return_starts_a_new_line() {
        let starts = |src: &str| -> Vec<(u32, u32)> {
            lex(src)
                .tokens
                .iter()
                .map(|t| (t.range.start.line, t.range.start.column))
                .collect()
        };
        assert_eq!(starts("# c\r[a]\r\r  [b]"), vec![(1, 1), (2, 1), (4, 3), (4, 6)]);
        // CRLF counts once.
        assert_eq!(starts("[a]\r\n[b]"), vec![(1, 1), (2, 1), (2, 4)]);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let lexed = lex("# first line\n[a] # trailing");
        let comments: Vec<&str> = lexed
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Comment)
            .map(|t| t.word.as_str())
            .collect();
        assert_eq!(comments, vec!["# first line", "# trailing"]);
        assert_eq!(lexed.tokens[0].content(), "first line");
    }

    #[test]
    fn unterminated_literals_report_their_kind() {
        assert_eq!(messages("<a"), vec!["Identifier: <a has not been closed"]);
        assert_eq!(messages("[a"), vec!["Action: [a has not been closed"]);
        assert_eq!(messages("\"a"), vec!["Path: \"a has not been closed"]);
    }

    #[test]
    fn whitespace_inside_literal_closes_it_with_an_error() {
        let lexed = lex("[open page]");
        let msgs: Vec<&str> = lexed.errors.iter().map(|e| e.message.as_str()).collect();
        // `[open` is unterminated, then `page` is an unknown word, then `]`.
        assert_eq!(
            msgs,
            vec![
                "Action: [open has not been closed",
                "Unknown token: page",
                "Unknown token: ]",
            ]
        );
        assert_eq!(lexed.tokens.len(), 1);
    }

    #[test]
    fn keyword_versus_unknown_word() {
        let lexed = lex("goto");
        assert!(lexed.errors.is_empty());
        assert_eq!(lexed.tokens[0].kind, TokenKind::Keyword);

        assert_eq!(messages("gotox"), vec!["Unknown token: gotox"]);
    }

    #[test]
    fn dash_without_arrow_is_unknown() {
        assert_eq!(messages("- >"), vec!["Unknown token: -"]);
        assert!(messages("->").is_empty());
    }

    #[test]
    fn errors_do_not_stop_scanning() {
        let lexed = lex("@ <A> = { % [x] }");
        assert_eq!(lexed.errors.len(), 2);
        assert_eq!(
            kinds("@ <A> = { % [x] }"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Action,
                TokenKind::Operator,
                TokenKind::Eop,
            ]
        );
    }

    #[test]
    fn non_ascii_literal_bodies_are_accepted() {
        let lexed = lex("<从首页进入旅游频道> = { [打开携程首页] }");
        assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
        assert_eq!(lexed.tokens[0].content(), "从首页进入旅游频道");
        assert_eq!(lexed.tokens[3].content(), "打开携程首页");
    }

    #[test]
    fn next_token_keeps_returning_eop() {
        let mut lexer = Lexer::new("  ");
        for _ in 0..3 {
            assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eop);
        }
    }

    #[test]
    fn every_character_is_accounted_for() {
        // Sum of token and error spans plus whitespace equals the input
        // length, for a mixed input on one line.
        let src = "start <A> = { [a] gotox -x \"p\" # c";
        let lexed = lex(src);
        let covered: u32 = lexed
            .tokens
            .iter()
            .map(|t| t.range)
            .chain(lexed.errors.iter().map(|e| e.range))
            .map(|r| r.end.column - r.start.column)
            .sum();
        let whitespace = src.chars().filter(|c| c.is_whitespace()).count() as u32;
        assert_eq!(covered + whitespace, src.chars().count() as u32);
    }
}
