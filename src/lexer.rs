//! Lexical layer: raw tokens and atom assembly
//!
//! Two passes over one source line. `tokens` splits the line at the
//! reserved operator set with a logos-derived lexer; `atoms` folds that
//! stream into prefix/core/suffix atoms ready for classification.

pub mod atoms;
pub mod tokens;
