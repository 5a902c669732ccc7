//! # cuneiform-parser
//!
//! A parser for scholarly cuneiform transliteration notation. One call to
//! [`parse`] turns the text of a tablet edition into flat record lists:
//! signs, the words and compounds grouping them, named sections and the
//! diagnostics collected along the way.
//!
//! The pipeline is three passes per line: a logos lexer splits at the
//! reserved operators ([`lexer::tokens`]), atom assembly folds brackets,
//! marks and comments around each semantic core ([`lexer::atoms`]), and the
//! stateful analyzer interprets the atoms into records. Irregular notation
//! never aborts a parse; every problem is reported as a [`Diagnostic`] and
//! the analyzer recovers.
//!
//! ```
//! use cuneiform_parser::{parse, ParseOptions, SignKind};
//!
//! let out = parse("{d}inanna dumu-ni", &ParseOptions::default());
//! assert_eq!(out.words.len(), 2);
//! assert_eq!(out.signs[0].kind, SignKind::Value);
//! assert!(out.diagnostics.is_empty());
//! ```

mod analyzer;
pub mod classify;
pub mod diagnostics;
pub mod grammar;
pub mod lexer;
pub mod notation;
mod options;
mod record;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use options::{InvalidOption, ParseOptions, ShiftScope};
pub use record::{
    Compound, Condition, IndicatorAlignment, Language, ParseOutput, ProperNounKind, Section, Sign,
    SignKind, SourceSpan, Word,
};

/// Parse transliteration `text`, one tablet line per input line.
///
/// Never fails and never panics on any input; irregularities end up in
/// [`ParseOutput::diagnostics`].
pub fn parse(text: &str, options: &ParseOptions) -> ParseOutput {
    analyzer::analyze(text, options)
}
