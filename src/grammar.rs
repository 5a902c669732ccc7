//! Notation sub-grammars
//!
//! The flat patterns (syllable values, catalog sign names, numeral units)
//! are anchored regexes compiled once. The self-nesting patterns — sign
//! complexes joined by operators and calculations with parenthesized
//! sub-expressions — are small recursive-descent matchers with an explicit
//! position cursor, accepting the same language the notation defines for
//! them without regex recursion.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lowercase consonants of the transliteration alphabet.
const LCONS: &str = "bdgĝhḫjklmnpqrřsšṣtṭwyz’";
/// Uppercase consonants of the transliteration alphabet.
const UCONS: &str = "BDGĜHḪJKLMNPQRŘSŠṢTṬWYZ";
const LVOWELS: &str = "aeiu";
const UVOWELS: &str = "AEIU";

/// Unicode vulgar fractions accepted in numerals.
const FRACTIONS: &str = "½⅓⅔¼⅛⅜⅝";

/// Placeholder readings marking broken or uncounted material.
const PLACEHOLDERS: &[&str] = &["n", "N", "x", "X", "…"];

fn lsyll() -> String {
    format!("(?:[{LCONS}]?[{LVOWELS}][{LCONS}]?)")
}

fn usyll() -> String {
    format!("(?:[{UCONS}’]?[{UVOWELS}][{UCONS}’]?)")
}

/// Syllable opening a capitalized (proper-noun-shaped) value.
fn csyll() -> String {
    format!("(?:[{UCONS}][{LVOWELS}][{LCONS}]?|’?[{UVOWELS}][{LCONS}]?)")
}

/// Optional numeric reading index, or an unknown-index placeholder.
const INDEX: &str = "(?:[0-9]?[0-9]?|[xX])";

/// `@`-modifiers recognized on phonetic values.
const VALUE_MODS: &str = "(?:@(?:90|180|[vctg]))";

/// `@`-modifiers recognized on sign names.
const SIGN_MODS: &str = "(?:@(?:90|180|[tgšcv]))";

static VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?:{lsyll}+{INDEX}{VALUE_MODS}*|d)$",
        lsyll = lsyll()
    ))
    .unwrap()
});

static CAPITALIZED_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^{csyll}{lsyll}*{INDEX}{VALUE_MODS}*$",
        csyll = csyll(),
        lsyll = lsyll()
    ))
    .unwrap()
});

/// One base sign name: uppercase syllables with an optional index, or a
/// numbered catalog reference, either with optional modifiers. Matched at
/// the cursor, not anchored to the end.
static SIGN_UNIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?:{usyll}+[0-9]*|(?:LAK|KWU|REC|RSP)[0-9]+[a-c]?){SIGN_MODS}*",
        usyll = usyll()
    ))
    .unwrap()
});

/// One numeral unit: a division, zero, an integer with an optional
/// fraction, a bare fraction, or a placeholder.
static NUMERAL_UNIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?:[1-9][0-9]*/[1-9][0-9]*|0|[1-9][0-9]*[{FRACTIONS}]?|[{FRACTIONS}]|[nNxX…])"
    ))
    .unwrap()
});

/// Whether `s` is a lowercase phonetic value reading.
pub fn is_value(s: &str) -> bool {
    VALUE_RE.is_match(s)
}

/// Whether `s` is a capitalized, proper-noun-shaped value reading.
pub fn is_capitalized_value(s: &str) -> bool {
    CAPITALIZED_VALUE_RE.is_match(s)
}

/// Splits recognized `@` modifiers off a phonetic value, translating each
/// into its critical-mark spelling. Returns the bare value and the marks.
pub fn split_value_mods(value: &str) -> (String, String) {
    let Some(at) = value.find('@') else {
        return (value.to_string(), String::new());
    };
    let mut crits = String::new();
    let mut rest = &value[at..];
    while let Some(stripped) = rest.strip_prefix('@') {
        let (mark, len) = if stripped.starts_with("90") {
            ('^', 2)
        } else if stripped.starts_with("180") {
            ('÷', 3)
        } else if stripped.starts_with('t') {
            ('t', 1)
        } else if stripped.starts_with('c') {
            ('°', 1)
        } else if stripped.starts_with('v') {
            ('~', 1)
        } else if stripped.starts_with('g') {
            ('g', 1)
        } else {
            break;
        };
        crits.push(mark);
        rest = &stripped[len..];
    }
    (value[..at].to_string(), crits)
}

/// Operators joining sign units inside one complex. `.` and `:` only occur
/// here in freeform `|…|` names; elsewhere they are reserved and split atoms.
fn sign_join_len(s: &str) -> Option<usize> {
    if s.starts_with("ue") {
        return Some(2);
    }
    let c = s.chars().next()?;
    if matches!(c, 'x' | ':' | '$' | '+' | '×' | '&' | '%' | '.') {
        Some(c.len_utf8())
    } else {
        None
    }
}

/// Whether `s` is a sign name, possibly a complex of units joined by
/// operators with parenthesized grouping.
pub fn is_sign(s: &str) -> bool {
    let mut pos = 0;
    sign_expr(s, &mut pos, false) && pos == s.len()
}

/// Like [`is_sign`] but tolerating `X`/`x`/`…` placeholder units.
pub fn is_broken_sign(s: &str) -> bool {
    let mut pos = 0;
    sign_expr(s, &mut pos, true) && pos == s.len()
}

fn sign_expr(s: &str, pos: &mut usize, relaxed: bool) -> bool {
    if !sign_unit(s, pos, relaxed) {
        return false;
    }
    loop {
        let save = *pos;
        match sign_join_len(&s[*pos..]) {
            Some(len) => *pos += len,
            None => return true,
        }
        if !sign_unit(s, pos, relaxed) {
            *pos = save;
            return true;
        }
    }
}

fn sign_unit(s: &str, pos: &mut usize, relaxed: bool) -> bool {
    let rest = &s[*pos..];
    if let Some(inner) = rest.strip_prefix('(') {
        let mut inner_pos = 0;
        if !sign_expr(inner, &mut inner_pos, relaxed) {
            return false;
        }
        if !inner[inner_pos..].starts_with(')') {
            return false;
        }
        *pos += 1 + inner_pos + 1;
        return true;
    }
    if relaxed {
        for p in ["X", "x", "…"] {
            // A placeholder stands in only where a whole unit is illegible,
            // so it must not be followed by more unit text.
            if rest.starts_with(p) {
                let after = &rest[p.len()..];
                if after.is_empty() || sign_join_len(after).is_some() || after.starts_with(')') {
                    *pos += p.len();
                    return true;
                }
            }
        }
    }
    if let Some(m) = SIGN_UNIT_RE.find(rest) {
        *pos += m.end();
        return true;
    }
    if let Some(m) = NUMERAL_UNIT_RE.find(rest) {
        *pos += m.end();
        return true;
    }
    false
}

/// Structural facts about a matched numeral.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumberMatch {
    /// A whole unit was a placeholder (`n N x X …`); joins do not count
    pub has_placeholder: bool,
    /// More than one unit, or nested grouping (a calculation)
    pub compound: bool,
    /// Metrological specification of a sole simple unit, verbatim
    pub spec: Option<String>,
}

/// Matches `s` against the numeral grammar: units optionally carrying a
/// parenthetical sign-specification, joined by `+`/`x`/`×`, with
/// parenthesized sub-calculations. Returns `None` when `s` is not a
/// numeral.
pub fn match_number(s: &str) -> Option<NumberMatch> {
    let mut m = NumberMatch::default();
    let mut pos = 0;
    if s[pos..].starts_with('+') {
        pos += 1;
    }
    if !number_expr(s, &mut pos, &mut m) {
        return None;
    }
    if s[pos..].starts_with('+') {
        pos += 1;
    }
    if pos != s.len() {
        return None;
    }
    if m.compound {
        m.spec = None;
    }
    Some(m)
}

fn number_join(c: char) -> bool {
    matches!(c, '+' | 'x' | '×')
}

fn number_expr(s: &str, pos: &mut usize, m: &mut NumberMatch) -> bool {
    if !number_element(s, pos, m) {
        return false;
    }
    loop {
        let save = *pos;
        let Some(c) = s[*pos..].chars().next() else {
            return true;
        };
        if !number_join(c) {
            return true;
        }
        *pos += c.len_utf8();
        if s[*pos..].starts_with('(') {
            *pos += 1;
            if !number_expr(s, pos, m) || !s[*pos..].starts_with(')') {
                *pos = save;
                return true;
            }
            *pos += 1;
            m.compound = true;
        } else if number_element(s, pos, m) {
            m.compound = true;
        } else {
            *pos = save;
            return true;
        }
    }
}

fn number_element(s: &str, pos: &mut usize, m: &mut NumberMatch) -> bool {
    let rest = &s[*pos..];
    let Some(unit) = NUMERAL_UNIT_RE.find(rest) else {
        return false;
    };
    if PLACEHOLDERS.contains(&unit.as_str()) {
        m.has_placeholder = true;
    }
    *pos += unit.end();
    // Optional metrological specification, taken verbatim; validity is the
    // analyzer's concern.
    if s[*pos..].starts_with('(') {
        if let Some(end) = s[*pos + 1..].find(')') {
            let spec = &s[*pos + 1..*pos + 1 + end];
            if !spec.contains('(') {
                if m.spec.is_none() && !m.compound {
                    m.spec = Some(spec.to_string());
                } else {
                    m.spec = None;
                }
                *pos += 1 + end + 1;
            }
        }
    }
    if s[*pos..].starts_with('*') {
        *pos += 1;
    }
    true
}
