//! Output records produced by one parse pass
//!
//! All records are append-only: the analyzer pushes them as lines are walked
//! and never mutates a record after the line/word/compound it belongs to has
//! closed. Cross-record references are plain 0-based positions into the
//! sibling lists (`word_index`, `compound_index`, `section_index`); callers
//! that need external identifiers map them on their side.

use serde::Serialize;

/// Category of a transliterated sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignKind {
    /// Phonetic reading (lowercase syllables, e.g. `dumu`)
    Value,
    /// Sign name (uppercase syllables or catalog number, e.g. `LUGAL`, `LAK20`)
    Sign,
    /// Numeral, including divisions and calculations
    Number,
    /// Divider marks and blank fillers
    Punctuation,
    /// Quoted free-text description of an undeciphered sign
    Description,
    /// Broken or illegible reading (`X`, `…`, placeholder numerals)
    Damage,
}

/// Where a determinative/phonetic-complement superscript sits relative to
/// the signs it annotates. `None` for ordinary, non-indicator signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndicatorAlignment {
    None,
    Left,
    Right,
    Center,
}

/// Physical state of the sign on the tablet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Condition {
    Intact,
    /// Restored by the editor, nothing legible remains (`[…]`)
    Lost,
    /// Partially legible (`⸢…⸣`)
    Damaged,
    /// Omitted by the scribe, inserted by the editor (`〈…〉`)
    Inserted,
    /// Written by the scribe, struck by the editor (`«…»`)
    Deleted,
}

/// Position of a sign in the source line, as 0-based char columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub start: usize,
    pub stop: usize,
}

/// One transliterated sign, value or numeral occupying one notation slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sign {
    /// 0-based index of the physical line this sign was read from
    pub line_no: usize,
    /// Position of the owning word in the word list
    pub word_index: usize,
    /// Normalized rendering of the sign
    pub value: String,
    /// Metrological sign-specification of a numeral, kept verbatim
    pub sign_spec: Option<String>,
    pub kind: SignKind,
    pub indicator_alignment: IndicatorAlignment,
    /// Whether the sign spells sound; `None` when not applicable
    pub phonographic: Option<bool>,
    pub condition: Condition,
    /// Whether the sign belongs to the word stem; `None` when the corpus is
    /// not annotated for morphology
    pub stem: Option<bool>,
    /// Accumulated critical marks, e.g. `?` for an uncertain reading
    pub crits: String,
    pub comment: Option<String>,
    /// Sign is immediately followed by a within-word line break (`/`)
    pub newline: bool,
    /// Reading order reversed relative to the writing order (`:`)
    pub inverted: bool,
    /// Written fused with the neighboring sign
    pub ligature: bool,
    pub source_span: SourceSpan,
}

/// A maximal run of signs between divider/boundary points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    /// Position of the owning compound in the compound list
    pub compound_index: usize,
    /// Set when the word opens under a proper-noun marker or a
    /// capitalized value
    pub capitalized: bool,
}

/// Semantic class of a proper noun, as declared by a shift directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProperNounKind {
    Person,
    Place,
    God,
    Water,
    Field,
    Temple,
    Month,
    Object,
    Ethnicity,
}

/// Language a compound is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Language {
    #[default]
    Default,
    Akkadian,
    Sumerian,
    Hittite,
}

/// A unit of one or more words sharing proper-noun classification and
/// language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compound {
    pub proper_noun_type: Option<ProperNounKind>,
    pub language: Language,
    /// Position of the enclosing section, if a `%sec=` directive is active
    pub section_index: Option<usize>,
    pub comment: Option<String>,
}

/// A named subdivision declared by an inline `%sec=` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub label: String,
}

/// Everything one `parse` call produces. The five lists are positionally
/// keyed against each other and valid only as a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseOutput {
    pub signs: Vec<Sign>,
    pub words: Vec<Word>,
    pub compounds: Vec<Compound>,
    pub sections: Vec<Section>,
    pub diagnostics: Vec<crate::diagnostics::Diagnostic>,
}
