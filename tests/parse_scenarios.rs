//! End-to-end parses of realistic transliteration lines.

use cuneiform_parser::{
    parse, Condition, DiagnosticKind, IndicatorAlignment, Language, ParseOptions, SignKind,
};

fn run(text: &str) -> cuneiform_parser::ParseOutput {
    parse(text, &ParseOptions::default())
}

fn diag_kinds(out: &cuneiform_parser::ParseOutput) -> Vec<DiagnosticKind> {
    out.diagnostics.iter().map(|d| d.kind).collect()
}

#[test]
fn test_sign_state_does_not_leak() {
    // crits, brackets and comments of one sign must not bleed into the next
    let out = run("[dumu]? an");
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.signs.len(), 2);
    assert_eq!(out.signs[0].condition, Condition::Lost);
    assert_eq!(out.signs[0].crits, "?");
    assert_eq!(out.signs[1].condition, Condition::Intact);
    assert!(out.signs[1].crits.is_empty());
    assert_eq!(out.signs[1].comment, None);
}

#[test]
fn test_divider_line() {
    let out = run("dumu | munus");
    assert_eq!(out.signs.len(), 3);
    assert_eq!(out.signs[1].kind, SignKind::Punctuation);
    assert_eq!(out.signs[1].word_index, 0);
    assert_eq!(out.words.len(), 2);
    assert_eq!(out.compounds.len(), 2);
    assert!(out.diagnostics.is_empty());
}

#[test]
fn test_determinative_word() {
    let out = run("{d}inanna");
    assert_eq!(out.words.len(), 1);
    assert_eq!(out.signs[0].indicator_alignment, IndicatorAlignment::Left);
    assert_eq!(out.signs[0].phonographic, Some(false));
    assert_eq!(out.signs[1].phonographic, None);
    assert!(out.diagnostics.is_empty());
}

#[test]
fn test_indicator_alignment_follows_position() {
    // leading region -> Left, trailing -> Right, infixed -> Center
    let out = run("{d}utu lugal{ki} e2{ki}a");
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.signs[0].indicator_alignment, IndicatorAlignment::Left);
    assert_eq!(out.signs[3].indicator_alignment, IndicatorAlignment::Right);
    assert_eq!(out.signs[5].indicator_alignment, IndicatorAlignment::Center);
}

#[test]
fn test_adjacent_signs_need_a_separator() {
    let out = run("du?ni");
    assert_eq!(diag_kinds(&out), vec![DiagnosticKind::SeparatorError]);
    // a within-word line break is a boundary of its own
    assert!(run("du/ma").diagnostics.is_empty());
}

#[test]
fn test_number_specifications() {
    let out = run("1(DIŠ) 2(BAN2) 3");
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.signs[0].sign_spec.as_deref(), Some("DIŠ"));
    assert_eq!(out.signs[1].sign_spec.as_deref(), Some("BAN2"));
    assert_eq!(out.signs[2].sign_spec, None);

    let out = run("1(FOO)");
    assert_eq!(diag_kinds(&out), vec![DiagnosticKind::InvalidNumberSpec]);
    assert_eq!(out.diagnostics[0].text.as_deref(), Some("FOO"));
}

#[test]
fn test_calculation_with_spec_stays_one_sign() {
    let out = run("1(DIŠ)+2");
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.signs.len(), 1);
    assert_eq!(out.signs[0].kind, SignKind::Number);
    assert_eq!(out.signs[0].value, "1(DIŠ)+2");
    // a spec inside a calculation qualifies one unit, not the whole sign
    assert_eq!(out.signs[0].sign_spec, None);
}

#[test]
fn test_trailing_open_bracket() {
    let out = run("LUGAL[");
    assert_eq!(diag_kinds(&out), vec![DiagnosticKind::UnclosedCondition]);
    assert_eq!(out.signs.len(), 1);
    // the bracket opened after the sign, so the sign itself is intact
    assert_eq!(out.signs[0].condition, Condition::Intact);
}

#[test]
fn test_bracket_misuse_diagnostics() {
    let out = run("[⸢du⸣]");
    assert!(diag_kinds(&out).contains(&DiagnosticKind::NestedCondition));

    let out = run("du]");
    assert_eq!(diag_kinds(&out), vec![DiagnosticKind::UnbalancedCondition]);
    assert_eq!(out.signs[0].condition, Condition::Intact);
}

#[test]
fn test_multi_line_document() {
    let text = "%sum lugal-e {d}En-lil2-ra\n[mu-na]-du3 ⸢e2⸣ | …";
    let out = run(text);
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.compounds[0].language, Language::Sumerian);
    assert_eq!(out.compounds[1].language, Language::Default);
    assert_eq!(out.words.len(), out.compounds.len());
    assert!(out.words[1].capitalized);
    assert!(out.signs.iter().all(|s| s.line_no <= 1));
    let lost: Vec<_> = out
        .signs
        .iter()
        .filter(|s| s.condition == Condition::Lost)
        .map(|s| s.value.as_str())
        .collect();
    assert_eq!(lost, vec!["mu", "na", "…"]);
}

#[test]
fn test_parse_is_idempotent() {
    let text = "%person A-hu-ni dumu [X] | 2x(3+1)\n⸢KUR⸣<ra> _lugal_ (left edge)";
    assert_eq!(run(text), run(text));
}

#[test]
fn test_diagnostics_carry_positions() {
    let out = run("dumu\n   qqq");
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].line, 1);
    assert_eq!(out.diagnostics[0].column, 3);
    assert_eq!(out.diagnostics[0].kind, DiagnosticKind::ValueError);
}

#[test]
fn test_damaged_run_with_placeholders() {
    let out = run("⸢du⸣-X-…");
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.signs[0].condition, Condition::Damaged);
    assert_eq!(out.signs[1].condition, Condition::Damaged);
    assert_eq!(out.signs[2].condition, Condition::Lost);
    assert_eq!(out.words.len(), 1);
}

#[test]
fn test_committed_values_reclassify_to_same_kind() {
    // normalized renderings must classify back to the kind they were
    // committed with
    let out = run("{d}En-lil2 LUGAL AN.KI 1(DIŠ) 2x(3+1) X … GA×AN du@t");
    assert!(out.diagnostics.is_empty());
    for sign in &out.signs {
        let c = cuneiform_parser::classify::classify(&sign.value, false).unwrap();
        assert_eq!(c.kind, sign.kind, "{}", sign.value);
    }
}

#[test]
fn test_serializes_to_json() {
    let out = run("{d}inanna | 1(DIŠ)");
    let json = serde_json::to_string(&out).unwrap();
    assert!(json.contains("\"signs\""));
    assert!(json.contains("\"inanna\""));
}
