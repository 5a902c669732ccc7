//! Character tables of the transliteration notation
//!
//! One place for every reserved character the tokenizer and analyzer agree
//! on: condition brackets, operator brackets, critical marks and the
//! metrological sign whitelist. The tables mirror the conventional notation;
//! `grammar` builds its regexes from the same classes.

use crate::record::Condition;

/// Critical marks accumulated into a sign's `crits` field.
pub const CRIT_MARKS: &[char] = &['?', '!', '~', '°', '^', '÷', '*'];

/// The damage hash: marks a single sign damaged outside the bracket system.
pub const DAMAGE_HASH: char = '#';

/// Operators that join base signs into one compound sign value. `x` doubles
/// as an ASCII spelling of `×` inside sign names.
pub const COMPLEX_JOINS: &[char] = &['+', '×', '&', 'x'];

/// Sign separators within a word. `:` additionally inverts reading order.
pub const SEPARATORS: &[char] = &['-', '.', ':', ',', ';'];

/// Counting-system signs a numeral's parenthetical specification may name.
pub const METROLOGICAL_SIGNS: &[&str] = &[
    "ŠAR2", "IKU", "AŠ", "DIŠ", "BUR3", "GEŠ2", "U", "BARIG", "EŠE3", "BAN2",
];

/// Class of a condition bracket pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketClass {
    Lost,
    Damaged,
    Inserted,
    Deleted,
}

impl BracketClass {
    /// The sign condition this bracket class asserts.
    pub fn condition(self) -> Condition {
        match self {
            BracketClass::Lost => Condition::Lost,
            BracketClass::Damaged => Condition::Damaged,
            BracketClass::Inserted => Condition::Inserted,
            BracketClass::Deleted => Condition::Deleted,
        }
    }
}

/// Condition class of an opening bracket char, if it is one.
pub fn open_condition(c: char) -> Option<BracketClass> {
    match c {
        '[' => Some(BracketClass::Lost),
        '⸢' => Some(BracketClass::Damaged),
        '〈' => Some(BracketClass::Inserted),
        '«' => Some(BracketClass::Deleted),
        _ => None,
    }
}

/// Condition class of a closing bracket char, if it is one.
pub fn close_condition(c: char) -> Option<BracketClass> {
    match c {
        ']' => Some(BracketClass::Lost),
        '⸣' => Some(BracketClass::Damaged),
        '〉' => Some(BracketClass::Inserted),
        '»' => Some(BracketClass::Deleted),
        _ => None,
    }
}

/// True for any condition bracket char, either side. These are the brackets
/// that may also occur inside an atom core (the internal damage path).
pub fn is_condition_bracket(c: char) -> bool {
    open_condition(c).is_some() || close_condition(c).is_some()
}

/// True when `spec` names a known metrological sign, optionally carrying
/// `@c/@v/@t/@90/@180` modifiers.
pub fn is_metrological_spec(spec: &str) -> bool {
    let base = match spec.find('@') {
        Some(at) => &spec[..at],
        None => spec,
    };
    if !METROLOGICAL_SIGNS.contains(&base) {
        return false;
    }
    let mut rest = &spec[base.len()..];
    while let Some(stripped) = rest.strip_prefix('@') {
        let Some(end) = take_modifier(stripped) else {
            return false;
        };
        rest = &stripped[end..];
    }
    rest.is_empty()
}

fn take_modifier(s: &str) -> Option<usize> {
    for m in ["90", "180", "c", "v", "t"] {
        if s.starts_with(m) {
            return Some(m.len());
        }
    }
    None
}
