use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::NodeKind;
use crate::lexer::Range;

/// Which pipeline stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticClass {
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for DiagnosticClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticClass::Lexical => "lexical",
            DiagnosticClass::Syntax => "syntax",
            DiagnosticClass::Semantic => "semantic",
        })
    }
}

/// A collected (non-fatal) diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub class: DiagnosticClass,
    /// The AST fragment a semantic diagnostic points at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeKind>,
    pub range: Range,
    pub message: String,
}

impl Diagnostic {
    pub fn lexical(range: Range, message: impl Into<String>) -> Self {
        Diagnostic {
            class: DiagnosticClass::Lexical,
            node: None,
            range,
            message: message.into(),
        }
    }

    pub fn syntax(range: Range, message: impl Into<String>) -> Self {
        Diagnostic {
            class: DiagnosticClass::Syntax,
            node: None,
            range,
            message: message.into(),
        }
    }

    pub fn semantic(node: NodeKind, range: Range, message: impl Into<String>) -> Self {
        Diagnostic {
            class: DiagnosticClass::Semantic,
            node: Some(node),
            range,
            message: message.into(),
        }
    }

    /// Serialize with every field present (null for a missing node), the
    /// shape the CLI prints in `--output json` mode.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "class":   self.class,
            "node":    self.node,
            "line":    self.range.start.line,
            "column":  self.range.start.column,
            "range":   self.range,
            "message": self.message,
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} error: {}",
            self.range.start.line, self.range.start.column, self.class, self.message
        )
    }
}
