//! Parse configuration
//!
//! The notation evolved across corpus versions; the differences that cannot
//! be guessed from the text itself live here and are threaded into the
//! analyzer as one value.

use std::fmt;
use std::str::FromStr;

use crate::record::Language;

/// How far a `%`-shift directive (language, proper-noun type) reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftScope {
    /// Resets at the next compound boundary (newer notation profiles)
    #[default]
    Compound,
    /// Resets at end of line (older notation profiles)
    Line,
}

/// Configuration for one `parse` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Language assigned to compounds with no active language shift
    pub language_default: Language,
    /// Whether the corpus is annotated for morphology. When set, signs in
    /// the stem segment get `stem = Some(true)` and prefix/suffix ones
    /// `Some(false)`; when unset, `stem` stays `None`.
    pub stem_default: bool,
    pub shift_scope: ShiftScope,
}

/// Error for a malformed configuration string. The only hard-failing
/// surface of the crate; data content never errors, it diagnoses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOption {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for InvalidOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.field, self.value)
    }
}

impl std::error::Error for InvalidOption {}

impl FromStr for Language {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Language::Default),
            "akkadian" | "akk" => Ok(Language::Akkadian),
            "sumerian" | "sum" => Ok(Language::Sumerian),
            "hittite" | "hit" => Ok(Language::Hittite),
            _ => Err(InvalidOption {
                field: "language",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for ShiftScope {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compound" => Ok(ShiftScope::Compound),
            "line" => Ok(ShiftScope::Line),
            _ => Err(InvalidOption {
                field: "shift scope",
                value: s.to_string(),
            }),
        }
    }
}
