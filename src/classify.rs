//! Atom core classification
//!
//! Given the cleaned core text of one atom, decide what kind of sign it
//! is. Classification follows this specific order (important for
//! correctness, since the sub-grammars overlap):
//!
//! 1. Ellipsis or bare `X` placeholder -> Damage
//! 2. Blank fillers `=` / `□` -> Punctuation
//! 3. Numeral grammar -> Number, or Damage when a unit is a placeholder
//! 4. Lowercase phonetic-value grammar -> Value
//! 5. Capitalized-value grammar -> Value, flagged for proper-noun handling
//! 6. Sign-name grammar -> Sign
//! 7. Relaxed broken-sign grammar -> Damage
//! 8. Otherwise -> no classification (the caller reports a Value Error)
//!
//! Quoted descriptions never reach this function; the lexer separates them
//! and the analyzer emits them as Description signs directly.

use crate::grammar;
use crate::record::SignKind;

/// Result of classifying one core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: SignKind,
    /// Normalized rendering
    pub value: String,
    /// Critical marks translated from `@` value modifiers
    pub crits: String,
    /// Core was a capitalized value: the word is proper-noun-shaped
    pub capitalized: bool,
    /// Value occurred in a morpheme prefix/suffix segment
    pub non_stem: bool,
    /// Metrological specification found inside a numeral core
    pub spec: Option<String>,
}

impl Classified {
    fn plain(kind: SignKind, value: impl Into<String>) -> Self {
        Classified {
            kind,
            value: value.into(),
            crits: String::new(),
            capitalized: false,
            non_stem: false,
            spec: None,
        }
    }
}

/// Classify `core`, already stripped of internal brackets. `affix` is true
/// when the analyzer is inside a prefix or suffix morpheme segment.
/// Returns `None` when no sub-grammar matches.
pub fn classify(core: &str, affix: bool) -> Option<Classified> {
    if core == "…" || core == "X" {
        return Some(Classified::plain(SignKind::Damage, core));
    }
    if core == "=" || core == "□" {
        return Some(Classified::plain(SignKind::Punctuation, core));
    }
    if let Some(m) = grammar::match_number(core) {
        let kind = if m.has_placeholder {
            SignKind::Damage
        } else {
            SignKind::Number
        };
        let value = match &m.spec {
            // The sole unit's specification moves out of the rendering
            Some(spec) => core.replacen(&format!("({spec})"), "", 1),
            None => normalize_placeholder(core),
        };
        let mut classified = Classified::plain(kind, value);
        classified.spec = m.spec;
        return Some(classified);
    }
    if grammar::is_value(core) {
        let (value, crits) = grammar::split_value_mods(core);
        let mut classified = Classified::plain(SignKind::Value, value);
        classified.crits = crits;
        classified.non_stem = affix;
        return Some(classified);
    }
    if grammar::is_capitalized_value(core) {
        let (value, crits) = grammar::split_value_mods(&core.to_lowercase());
        let mut classified = Classified::plain(SignKind::Value, value);
        classified.crits = crits;
        classified.capitalized = true;
        return Some(classified);
    }
    if grammar::is_sign(core) {
        let value = core.replace('x', "×").replace("ue", "&");
        return Some(Classified::plain(SignKind::Sign, value));
    }
    if grammar::is_broken_sign(core) {
        return Some(Classified::plain(
            SignKind::Damage,
            normalize_placeholder(core),
        ));
    }
    None
}

/// An illegible-count placeholder renders uppercase.
fn normalize_placeholder(core: &str) -> String {
    if core == "x" {
        "X".to_string()
    } else {
        core.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("dumu", SignKind::Value)]
    #[case("LUGAL", SignKind::Sign)]
    #[case("3", SignKind::Number)]
    #[case("1/2", SignKind::Number)]
    #[case("X", SignKind::Damage)]
    #[case("…", SignKind::Damage)]
    #[case("=", SignKind::Punctuation)]
    #[case("□", SignKind::Punctuation)]
    #[case("GA×X", SignKind::Sign)]
    fn test_kinds(#[case] core: &str, #[case] kind: SignKind) {
        assert_eq!(classify(core, false).unwrap().kind, kind);
    }

    #[test]
    fn test_unclassifiable() {
        assert_eq!(classify("du-)(", false), None);
        assert_eq!(classify("", false), None);
    }

    #[test]
    fn test_placeholder_number_is_damage() {
        let c = classify("x", false).unwrap();
        assert_eq!(c.kind, SignKind::Damage);
        assert_eq!(c.value, "X");
        assert_eq!(classify("3+n", false).unwrap().kind, SignKind::Damage);
    }

    #[test]
    fn test_number_spec_extraction() {
        let c = classify("1(DIŠ)", false).unwrap();
        assert_eq!(c.kind, SignKind::Number);
        assert_eq!(c.value, "1");
        assert_eq!(c.spec.as_deref(), Some("DIŠ"));
    }

    #[test]
    fn test_calculation_keeps_full_rendering() {
        let c = classify("2x(3+1)", false).unwrap();
        assert_eq!(c.kind, SignKind::Number);
        assert_eq!(c.value, "2x(3+1)");
        assert_eq!(c.spec, None);
    }

    #[test]
    fn test_value_modifiers_become_crits() {
        let c = classify("du@t@90", false).unwrap();
        assert_eq!(c.value, "du");
        assert_eq!(c.crits, "t^");
    }

    #[test]
    fn test_capitalized_value_lowercases() {
        let c = classify("Inanna", false).unwrap();
        assert_eq!(c.kind, SignKind::Value);
        assert_eq!(c.value, "inanna");
        assert!(c.capitalized);
    }

    #[test]
    fn test_sign_normalization() {
        assert_eq!(classify("GAxAN", false).unwrap().value, "GA×AN");
        assert_eq!(classify("ZIueZI", false).unwrap().value, "ZI&ZI");
    }

    #[test]
    fn test_affix_value_is_non_stem() {
        assert!(classify("ni", true).unwrap().non_stem);
        assert!(!classify("ni", false).unwrap().non_stem);
    }
}
