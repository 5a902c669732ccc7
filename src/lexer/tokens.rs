//! Raw token definitions for one line of transliteration
//!
//! The raw layer splits a line at the reserved operator set and nothing
//! else; all semantic shaping happens in the atom assembly pass on top of
//! it. Tokens are defined with the logos derive macro. Balanced
//! parenthetical comments are the one non-regular construct and are
//! consumed by a callback with an explicit depth counter.

use logos::{Lexer, Logos};

/// All raw tokens of the transliteration notation.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum RawToken {
    /// Quoted free-text description, quotes stripped
    #[regex(r#""[^"]*""#, |lex| trim_edges(lex.slice()))]
    Description(String),

    /// `|…|` freeform sign name, pipes stripped. Never spans whitespace.
    #[regex(r"\|[^| ]+\|", |lex| trim_edges(lex.slice()))]
    SignName(String),

    /// Numeral division, kept whole so the slash is never split
    #[regex(r"[1-9][0-9]*/[1-9][0-9]*", |lex| lex.slice().to_string(), priority = 5)]
    Division(String),

    /// Balanced parenthetical run, outer parentheses stripped
    #[token("(", scan_parenthetical)]
    Parenthetical(String),

    /// Language/proper-noun/section shift directive, `%` stripped
    #[regex(r"%[a-z]+(?:=[^ \t]+)?", |lex| lex.slice()[1..].to_string(), priority = 4)]
    Directive(String),

    /// Bare `%`: ligature marker for the next sign
    #[token("%")]
    Ligature,

    /// Standalone vertical divider
    #[token("|")]
    Pipe,

    #[token("-")]
    Dash,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    /// Within-word line break marker
    #[token("/")]
    Slash,

    /// Logogram toggle
    #[token("_")]
    Underscore,

    /// Unbalanced closing parenthesis; always an error downstream
    #[token(")")]
    CloseParen,

    /// Any opening bracket: condition, superscript or segment marker
    #[regex(r"[\[⸢〈«‹{<]", first_char)]
    OpenBracket(char),

    /// Any closing bracket
    #[regex(r"[\]⸣〉»›}>]", first_char)]
    CloseBracket(char),

    /// Critical mark, including the damage hash
    #[regex(r"[?!~°^÷*#]", first_char)]
    Crit(char),

    #[regex(r"[ \t]+")]
    Space,

    /// Maximal run of unreserved characters; the candidate atom core
    #[regex(
        r#"[^ \t\n"|()\-./:,;%_\[\]⸢⸣〈〉«»‹›{}<>?!~°^÷*#]+"#,
        |lex| lex.slice().to_string()
    )]
    Text(String),
}

fn first_char(lex: &mut Lexer<RawToken>) -> char {
    lex.slice().chars().next().unwrap()
}

fn trim_edges(slice: &str) -> String {
    let mut chars = slice.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

/// Consumes a balanced parenthetical after the opening `(` the token
/// matched, returning the inner text. `None` (a lexing error) when the
/// parenthesis never closes on this line.
fn scan_parenthetical(lex: &mut Lexer<RawToken>) -> Option<String> {
    let rest = lex.remainder();
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let inner = rest[..i].to_string();
                    lex.bump(i + 1);
                    return Some(inner);
                }
            }
            _ => {}
        }
    }
    None
}

/// Tokenize one line, keeping byte spans. Unlexable stretches surface as
/// `Err` entries so the caller can diagnose and skip them; lexing itself
/// never fails.
pub fn scan(line: &str) -> Vec<(Result<RawToken, ()>, std::ops::Range<usize>)> {
    let mut lexer = RawToken::lexer(line);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        tokens.push((result.map_err(|_| ()), lexer.span()));
    }
    tokens
}
