//! Atom assembly
//!
//! Folds the raw token stream of one line into atoms: a bracket prefix, a
//! semantic core and a suffix of closing brackets, critical marks and
//! comments. Operators, dividers, directives and whitespace pass through as
//! their own atom kinds for the analyzer to interpret. Condition brackets
//! flanked by core text on both sides fold *into* the core; the analyzer
//! strips them there (the internal damage path, separate from the
//! bracket-balance state).

use std::ops::Range;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar;
use crate::lexer::tokens::{scan, RawToken};
use crate::notation::{close_condition, open_condition, COMPLEX_JOINS};

/// Semantic payload of a token atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Core {
    /// No core: a bare bracket run, e.g. a trailing `[`
    Empty,
    /// Unreserved text, possibly with folded-in brackets or parentheses
    Text(String),
    /// Quoted description, quotes already stripped
    Description(String),
}

/// One piece of an atom's suffix, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuffixPiece {
    Close(char),
    Crit(char),
    Comment(String),
}

/// A prefix/core/suffix atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAtom {
    pub prefix: Vec<char>,
    pub core: Core,
    pub suffix: Vec<SuffixPiece>,
}

impl TokenAtom {
    fn new() -> Self {
        TokenAtom {
            prefix: Vec::new(),
            core: Core::Empty,
            suffix: Vec::new(),
        }
    }

    fn is_blank(&self) -> bool {
        self.prefix.is_empty() && self.core == Core::Empty && self.suffix.is_empty()
    }
}

/// One atom of the line, with its byte span in the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub kind: AtomKind,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomKind {
    Token(TokenAtom),
    /// `- . : , ;` between signs of one word
    Separator(char),
    /// `/`: within-word line break
    Slash,
    /// `|`: word/compound divider, itself a punctuation sign
    Divider,
    /// `_`: logogram toggle
    LogogramToggle,
    /// `%`: ligature marker
    Ligature,
    /// `%name` or `%name=value`
    Directive {
        name: String,
        value: Option<String>,
    },
    /// Parenthetical not attached to any core
    Comment(String),
    /// Whitespace: a pending word boundary
    Break,
}

/// 0-based char column of a byte offset in `line`.
pub fn char_col(line: &str, byte: usize) -> usize {
    line[..byte].chars().count()
}

struct Assembler<'a> {
    line: &'a str,
    line_no: usize,
    atoms: Vec<Atom>,
    cur: Option<(TokenAtom, Range<usize>)>,
}

impl<'a> Assembler<'a> {
    fn flush(&mut self) {
        if let Some((atom, span)) = self.cur.take() {
            if !atom.is_blank() {
                self.atoms.push(Atom {
                    kind: AtomKind::Token(atom),
                    span,
                });
            }
        }
    }

    fn pending(&mut self, span: &Range<usize>) -> &mut TokenAtom {
        if self.cur.is_none() {
            self.cur = Some((TokenAtom::new(), span.clone()));
        }
        let (atom, full) = self.cur.as_mut().unwrap();
        full.end = span.end;
        atom
    }

    fn has_core(&self) -> bool {
        matches!(
            self.cur,
            Some((
                TokenAtom {
                    core: Core::Text(_) | Core::Description(_),
                    ..
                },
                _
            ))
        )
    }

    fn has_suffix(&self) -> bool {
        matches!(&self.cur, Some((atom, _)) if !atom.suffix.is_empty())
    }

    fn push(&mut self, kind: AtomKind, span: Range<usize>) {
        self.flush();
        self.atoms.push(Atom { kind, span });
    }

    fn extend_core(&mut self, text: &str, span: &Range<usize>) {
        if self.has_suffix() || matches!(&self.cur, Some((atom, _)) if matches!(atom.core, Core::Description(_)))
        {
            self.flush();
        }
        let atom = self.pending(span);
        match &mut atom.core {
            Core::Text(core) => core.push_str(text),
            core => *core = Core::Text(text.to_string()),
        }
    }

    /// Whether the pending core text ends with a complex-join operator, the
    /// position where a parenthesized group belongs to the core.
    fn core_ends_with_join(&self) -> bool {
        match &self.cur {
            Some((
                TokenAtom {
                    core: Core::Text(core),
                    suffix,
                    ..
                },
                _,
            )) if suffix.is_empty() => core
                .chars()
                .last()
                .is_some_and(|c| COMPLEX_JOINS.contains(&c)),
            _ => false,
        }
    }

    /// Whether the pending core is a numeral so far, the position where a
    /// parenthetical is a sign specification rather than a comment.
    fn core_is_numeral(&self) -> bool {
        matches!(
            &self.cur,
            Some((
                TokenAtom {
                    core: Core::Text(core),
                    suffix,
                    ..
                },
                _,
            )) if suffix.is_empty() && grammar::match_number(core).is_some()
        )
    }

    /// Whether the pending core holds an internal opening bracket with no
    /// matching close yet, so a closing bracket still belongs inside it.
    fn core_has_open(&self, close: char) -> bool {
        let Some((
            TokenAtom {
                core: Core::Text(core),
                ..
            },
            _,
        )) = &self.cur
        else {
            return false;
        };
        let Some(class) = close_condition(close) else {
            return false;
        };
        let mut depth = 0i32;
        for c in core.chars() {
            if open_condition(c) == Some(class) {
                depth += 1;
            } else if close_condition(c) == Some(class) {
                depth -= 1;
            }
        }
        depth > 0
    }

    fn attach_crit(&mut self, c: char, span: &Range<usize>, sink: &mut Diagnostics) {
        if self.cur.is_some() {
            self.pending(span).suffix.push(SuffixPiece::Crit(c));
            return;
        }
        // A stray mark after a boundary still belongs to the last sign.
        for atom in self.atoms.iter_mut().rev() {
            if let AtomKind::Token(token) = &mut atom.kind {
                token.suffix.push(SuffixPiece::Crit(c));
                return;
            }
        }
        sink.push_with_text(
            self.line_no,
            char_col(self.line, span.start),
            DiagnosticKind::ValueError,
            c.to_string(),
        );
    }
}

/// Assemble one line into atoms. Unrecognized stretches become *Value
/// Error* diagnostics and are skipped; assembly always runs to the end of
/// the line.
pub fn assemble(line: &str, line_no: usize, sink: &mut Diagnostics) -> Vec<Atom> {
    let raw = scan(line);
    let mut asm = Assembler {
        line,
        line_no,
        atoms: Vec::new(),
        cur: None,
    };

    for i in 0..raw.len() {
        let (token, span) = &raw[i];
        let next_is_text = matches!(
            raw.get(i + 1),
            Some((Ok(RawToken::Text(_) | RawToken::Division(_)), _))
        );
        match token {
            Err(()) => {
                asm.flush();
                sink.push_with_text(
                    line_no,
                    char_col(line, span.start),
                    DiagnosticKind::ValueError,
                    &line[span.clone()],
                );
            }
            Ok(RawToken::Space) => {
                asm.flush();
                asm.atoms.push(Atom {
                    kind: AtomKind::Break,
                    span: span.clone(),
                });
            }
            Ok(RawToken::Text(s)) | Ok(RawToken::Division(s)) | Ok(RawToken::SignName(s)) => {
                asm.extend_core(s, span);
            }
            Ok(RawToken::Description(s)) => {
                if asm.has_core() || asm.has_suffix() {
                    asm.flush();
                }
                asm.pending(span).core = Core::Description(s.clone());
            }
            Ok(RawToken::Parenthetical(s)) => {
                let next_joins_numeral = matches!(
                    raw.get(i + 1),
                    Some((Ok(RawToken::Text(t)), _)) if t.starts_with(['+', 'x', '×'])
                );
                if asm.core_ends_with_join() {
                    asm.extend_core(&format!("({s})"), span);
                } else if next_joins_numeral && asm.core_is_numeral() {
                    // A calculation continues past the specification, so the
                    // whole numeral must stay one core
                    asm.extend_core(&format!("({s})"), span);
                } else if asm.has_core() {
                    asm.pending(span).suffix.push(SuffixPiece::Comment(s.clone()));
                } else if next_is_text {
                    // Leading parenthesized group of a sign complex
                    asm.extend_core(&format!("({s})"), span);
                } else {
                    asm.push(AtomKind::Comment(s.clone()), span.clone());
                }
            }
            Ok(RawToken::OpenBracket(c)) => {
                let internal =
                    open_condition(*c).is_some() && asm.has_core() && next_is_text;
                if internal {
                    asm.extend_core(&c.to_string(), span);
                } else {
                    if asm.has_core() || asm.has_suffix() {
                        asm.flush();
                    }
                    asm.pending(span).prefix.push(*c);
                }
            }
            Ok(RawToken::CloseBracket(c)) => {
                if asm.core_has_open(*c) {
                    asm.extend_core(&c.to_string(), span);
                } else {
                    asm.pending(span).suffix.push(SuffixPiece::Close(*c));
                }
            }
            Ok(RawToken::Crit(c)) => {
                asm.attach_crit(*c, span, sink);
            }
            Ok(RawToken::Pipe) => asm.push(AtomKind::Divider, span.clone()),
            Ok(RawToken::Dash) => asm.push(AtomKind::Separator('-'), span.clone()),
            Ok(RawToken::Dot) => asm.push(AtomKind::Separator('.'), span.clone()),
            Ok(RawToken::Colon) => asm.push(AtomKind::Separator(':'), span.clone()),
            Ok(RawToken::Comma) => asm.push(AtomKind::Separator(','), span.clone()),
            Ok(RawToken::Semicolon) => asm.push(AtomKind::Separator(';'), span.clone()),
            Ok(RawToken::Slash) => asm.push(AtomKind::Slash, span.clone()),
            Ok(RawToken::Underscore) => asm.push(AtomKind::LogogramToggle, span.clone()),
            Ok(RawToken::Ligature) => asm.push(AtomKind::Ligature, span.clone()),
            Ok(RawToken::Directive(s)) => {
                let (name, value) = match s.split_once('=') {
                    Some((name, value)) => (name.to_string(), Some(value.to_string())),
                    None => (s.clone(), None),
                };
                asm.push(AtomKind::Directive { name, value }, span.clone());
            }
            Ok(RawToken::CloseParen) => {
                asm.flush();
                sink.push_with_text(
                    line_no,
                    char_col(line, span.start),
                    DiagnosticKind::ValueError,
                    ")",
                );
            }
        }
    }
    asm.flush();
    asm.atoms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(line: &str) -> Vec<AtomKind> {
        let mut sink = Diagnostics::new();
        let atoms = assemble(line, 0, &mut sink);
        assert!(sink.is_empty(), "unexpected diagnostics");
        atoms.into_iter().map(|a| a.kind).collect()
    }

    fn token(prefix: &[char], core: &str, suffix: Vec<SuffixPiece>) -> AtomKind {
        AtomKind::Token(TokenAtom {
            prefix: prefix.to_vec(),
            core: if core.is_empty() {
                Core::Empty
            } else {
                Core::Text(core.to_string())
            },
            suffix,
        })
    }

    #[test]
    fn test_prefix_core_suffix() {
        assert_eq!(
            atoms("[dumu]?"),
            vec![token(
                &['['],
                "dumu",
                vec![SuffixPiece::Close(']'), SuffixPiece::Crit('?')],
            )]
        );
    }

    #[test]
    fn test_internal_brackets_fold_into_core() {
        assert_eq!(atoms("du[mu]"), vec![token(&[], "du[mu]", vec![])]);
    }

    #[test]
    fn test_trailing_open_bracket_stands_alone() {
        assert_eq!(
            atoms("LUGAL["),
            vec![token(&[], "LUGAL", vec![]), token(&['['], "", vec![])]
        );
    }

    #[test]
    fn test_determinative_region() {
        assert_eq!(
            atoms("{d}inanna"),
            vec![
                token(&['{'], "d", vec![SuffixPiece::Close('}')]),
                token(&[], "inanna", vec![]),
            ]
        );
    }

    #[test]
    fn test_separators_split_atoms() {
        assert_eq!(
            atoms("lugal-la"),
            vec![
                token(&[], "lugal", vec![]),
                AtomKind::Separator('-'),
                token(&[], "la", vec![]),
            ]
        );
    }

    #[test]
    fn test_number_spec_goes_to_suffix() {
        assert_eq!(
            atoms("1(DIŠ)"),
            vec![token(
                &[],
                "1",
                vec![SuffixPiece::Comment("DIŠ".to_string())],
            )]
        );
    }

    #[test]
    fn test_spec_in_continuing_calculation_folds_into_core() {
        assert_eq!(atoms("1(DIŠ)+2"), vec![token(&[], "1(DIŠ)+2", vec![])]);
    }

    #[test]
    fn test_calculation_group_folds_into_core() {
        assert_eq!(atoms("2x(3+1)"), vec![token(&[], "2x(3+1)", vec![])]);
    }

    #[test]
    fn test_freestanding_comment() {
        assert_eq!(
            atoms("dumu (scribe uncertain)"),
            vec![
                token(&[], "dumu", vec![]),
                AtomKind::Break,
                AtomKind::Comment("scribe uncertain".to_string()),
            ]
        );
    }

    #[test]
    fn test_divider_between_words() {
        assert_eq!(
            atoms("dumu | munus"),
            vec![
                token(&[], "dumu", vec![]),
                AtomKind::Break,
                AtomKind::Divider,
                AtomKind::Break,
                token(&[], "munus", vec![]),
            ]
        );
    }

    #[test]
    fn test_directive_with_value() {
        assert_eq!(
            atoms("%sec=colophon"),
            vec![AtomKind::Directive {
                name: "sec".to_string(),
                value: Some("colophon".to_string()),
            }]
        );
    }

    #[test]
    fn test_crit_after_description() {
        assert_eq!(
            atoms("\"sign drawing\"!"),
            vec![AtomKind::Token(TokenAtom {
                prefix: vec![],
                core: Core::Description("sign drawing".to_string()),
                suffix: vec![SuffixPiece::Crit('!')],
            })]
        );
    }
}
