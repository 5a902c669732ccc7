//! Properties that must hold for every input, well-formed or garbage.

use cuneiform_parser::{parse, ParseOptions, ShiftScope};
use proptest::prelude::*;

/// Strings biased toward the notation's own character set, so the parser's
/// interesting paths actually get exercised.
fn notation_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("dumu".to_string()),
        Just("LUGAL".to_string()),
        Just("1(DIŠ)".to_string()),
        Just("2x(3+1)".to_string()),
        Just("…".to_string()),
        Just("X".to_string()),
        "[a-z]{1,4}",
        "[A-Z]{1,4}",
        "[0-9]{1,3}",
        Just("%akk".to_string()),
        Just("%person".to_string()),
        Just("%sec=obv".to_string()),
        proptest::sample::select(vec![
            "[", "]", "⸢", "⸣", "〈", "〉", "«", "»", "‹", "›", "{", "}", "<", ">", "-", ".", ":",
            ",", ";", "|", "/", "_", "%", "?", "!", "#", "*", "(", ")", "\"", " ", "\n",
        ])
        .prop_map(str::to_string),
    ];
    proptest::collection::vec(piece, 0..40).prop_map(|v| v.concat())
}

fn options() -> impl Strategy<Value = ParseOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(stem_default, line_scope)| ParseOptions {
        stem_default,
        shift_scope: if line_scope {
            ShiftScope::Line
        } else {
            ShiftScope::Compound
        },
        ..ParseOptions::default()
    })
}

proptest! {
    #[test]
    fn never_panics_on_arbitrary_input(text in "\\PC*", opts in options()) {
        let _ = parse(&text, &opts);
    }

    #[test]
    fn never_panics_on_notation_shaped_input(text in notation_text(), opts in options()) {
        let _ = parse(&text, &opts);
    }

    #[test]
    fn words_and_compounds_stay_paired(text in notation_text(), opts in options()) {
        let out = parse(&text, &opts);
        prop_assert_eq!(out.words.len(), out.compounds.len());
        for (i, word) in out.words.iter().enumerate() {
            prop_assert_eq!(word.compound_index, i);
        }
    }

    #[test]
    fn sign_references_are_in_bounds(text in notation_text(), opts in options()) {
        let out = parse(&text, &opts);
        for sign in &out.signs {
            prop_assert!(sign.word_index < out.words.len());
        }
        for compound in &out.compounds {
            if let Some(section) = compound.section_index {
                prop_assert!(section < out.sections.len());
            }
        }
    }

    #[test]
    fn parsing_is_deterministic(text in notation_text()) {
        let opts = ParseOptions::default();
        prop_assert_eq!(parse(&text, &opts), parse(&text, &opts));
    }
}
