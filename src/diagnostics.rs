//! Location-tagged diagnostics collected during a parse
//!
//! No condition in this parser aborts the walk: every irregularity is
//! reported here as a value and the analyzer recovers to a safe state. The
//! caller decides whether diagnostics block downstream use.

use std::fmt;

use serde::Serialize;

/// Category of a diagnostic. The rendered message is this category's
/// display text plus the offending fragment, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// Atom text matched no known sub-grammar
    ValueError,
    /// A condition bracket opened while another was still active
    NestedCondition,
    /// A closing condition bracket did not match the active condition
    UnbalancedCondition,
    /// A condition bracket was still open at end of line
    UnclosedCondition,
    /// Damage hash while a bracket condition was already active
    InvalidDamageHash,
    /// Determinative/phonetic-complement marker misuse
    SuperscriptError,
    /// Morpheme-segment marker out of order
    SegmentationError,
    /// Doubled or misplaced sign separator
    SeparatorError,
    /// Metrological specification not in the known sign whitelist
    InvalidNumberSpec,
    /// Logogram marker left open at end of line
    UnpairedLogogram,
    /// Unrecognized shift directive
    DirectiveError,
    /// Comment with nothing to attach to
    CommentError,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticKind::ValueError => "Value error",
            DiagnosticKind::NestedCondition => "Nested condition brackets",
            DiagnosticKind::UnbalancedCondition => "Unbalanced condition brackets",
            DiagnosticKind::UnclosedCondition => "Unclosed condition bracket",
            DiagnosticKind::InvalidDamageHash => "Invalid damage hash",
            DiagnosticKind::SuperscriptError => "Superscript error",
            DiagnosticKind::SegmentationError => "Segmentation error",
            DiagnosticKind::SeparatorError => "Separator error",
            DiagnosticKind::InvalidNumberSpec => "Invalid number specification",
            DiagnosticKind::UnpairedLogogram => "Unpaired logogram marker",
            DiagnosticKind::DirectiveError => "Unknown shift directive",
            DiagnosticKind::CommentError => "Misplaced comment",
        };
        f.write_str(text)
    }
}

/// One reported irregularity. `line` and `column` are 0-based; `column`
/// counts chars, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub text: Option<String>,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}: {}", self.kind, text),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Append-only diagnostic sink. Two diagnostics at the same position are
/// both kept; order of insertion is preserved.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: usize, column: usize, kind: DiagnosticKind) {
        self.items.push(Diagnostic {
            line,
            column,
            text: None,
            kind,
        });
    }

    pub fn push_with_text(
        &mut self,
        line: usize,
        column: usize,
        kind: DiagnosticKind,
        text: impl Into<String>,
    ) {
        self.items.push(Diagnostic {
            line,
            column,
            text: Some(text.into()),
            kind,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_offending_text() {
        let mut sink = Diagnostics::new();
        sink.push_with_text(0, 2, DiagnosticKind::InvalidNumberSpec, "FOO");
        let items = sink.into_vec();
        assert_eq!(items[0].to_string(), "Invalid number specification: FOO");
    }

    #[test]
    fn test_same_position_keeps_both() {
        let mut sink = Diagnostics::new();
        sink.push(1, 4, DiagnosticKind::UnbalancedCondition);
        sink.push(1, 4, DiagnosticKind::ValueError);
        assert_eq!(sink.len(), 2);
    }
}
