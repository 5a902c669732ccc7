//! Stateful semantic analysis
//!
//! Walks the atoms of each line and turns them into the output records:
//! signs accumulate piece by piece (core, critical marks, comments) and
//! commit when the next boundary arrives; words and compounds close at
//! whitespace, dividers and line ends. Every word closes exactly one
//! compound, so the two lists always stay the same length. All notation
//! irregularities surface as diagnostics; the walk itself never fails.

use crate::classify::{classify, Classified};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lexer::atoms::{assemble, char_col, Atom, AtomKind, Core, SuffixPiece, TokenAtom};
use crate::notation::{close_condition, is_condition_bracket, is_metrological_spec, open_condition, DAMAGE_HASH};
use crate::options::{ParseOptions, ShiftScope};
use crate::record::{
    Compound, Condition, IndicatorAlignment, Language, ParseOutput, ProperNounKind, Section, Sign,
    SignKind, SourceSpan, Word,
};

/// Parse `text` into records, one line at a time.
pub(crate) fn analyze(text: &str, options: &ParseOptions) -> ParseOutput {
    let mut analyzer = Analyzer::new(*options);
    for (line_no, line) in text.lines().enumerate() {
        analyzer.line_no = line_no;
        let atoms = assemble(line, line_no, &mut analyzer.diags);
        analyzer.walk_line(line, atoms);
    }
    analyzer.finish()
}

/// A sign being accumulated. Committed, and the slot reset, when the next
/// boundary (separator, whitespace, another core, line end) arrives.
struct PendingSign {
    value: String,
    kind: SignKind,
    sign_spec: Option<String>,
    crits: String,
    comments: Vec<String>,
    phonographic: Option<bool>,
    indicator_alignment: IndicatorAlignment,
    /// Bracket condition captured when the core appeared; the closing
    /// bracket may reset the line state before this sign commits.
    condition: Condition,
    stem: Option<bool>,
    hash_damaged: bool,
    internal_damage: bool,
    newline: bool,
    start: usize,
    end: usize,
}

impl PendingSign {
    fn new(kind: SignKind, value: String, condition: Condition, start: usize, end: usize) -> Self {
        PendingSign {
            value,
            kind,
            sign_spec: None,
            crits: String::new(),
            comments: Vec::new(),
            phonographic: None,
            indicator_alignment: IndicatorAlignment::None,
            condition,
            stem: None,
            hash_damaged: false,
            internal_damage: false,
            newline: false,
            start,
            end,
        }
    }
}

/// An open determinative (`{…}`) or phonetic-complement (`<…>`) region.
struct Superscript {
    phonographic: bool,
    alignment: IndicatorAlignment,
    /// Index of the first sign inside the region, for the alignment
    /// upgrade once the region turns out to sit between two sign runs
    first_sign: usize,
}

/// Interpreted core of one token atom.
enum CoreShape {
    Empty,
    Description(String),
    Text {
        classified: Option<Classified>,
        raw: String,
        internal: bool,
    },
}

struct Analyzer {
    opts: ParseOptions,
    out: ParseOutput,
    diags: Diagnostics,
    line_no: usize,

    pending: Option<PendingSign>,
    /// A `.` separator after a sign name may continue a dotted complex
    dot_pending: bool,

    condition: Condition,
    superscript: Option<Superscript>,
    /// Region just closed: first sign index and its alignment
    after_super: Option<(usize, IndicatorAlignment)>,
    logogram_open: bool,
    ligature_pending: bool,
    inverted_pending: bool,
    separated: bool,
    pending_break: bool,
    line_has_content: bool,

    language: Language,
    proper_noun: Option<ProperNounKind>,
    section: Option<usize>,

    word_signs: usize,
    word_start_sign: usize,
    word_capitalized: bool,
    word_comments: Vec<String>,
    prefix_closed: bool,
    in_suffix: bool,
}

impl Analyzer {
    fn new(opts: ParseOptions) -> Self {
        Analyzer {
            opts,
            out: ParseOutput::default(),
            diags: Diagnostics::new(),
            line_no: 0,
            pending: None,
            dot_pending: false,
            condition: Condition::Intact,
            superscript: None,
            after_super: None,
            logogram_open: false,
            ligature_pending: false,
            inverted_pending: false,
            separated: true,
            pending_break: false,
            line_has_content: false,
            language: Language::Default,
            proper_noun: None,
            section: None,
            word_signs: 0,
            word_start_sign: 0,
            word_capitalized: false,
            word_comments: Vec::new(),
            prefix_closed: false,
            in_suffix: false,
        }
    }

    fn walk_line(&mut self, line: &str, atoms: Vec<Atom>) {
        for atom in atoms {
            let col = char_col(line, atom.span.start);
            let end_col = char_col(line, atom.span.end);
            match atom.kind {
                AtomKind::Token(tok) => self.process_token(tok, col, end_col),
                AtomKind::Separator(c) => {
                    if c == '.'
                        && !self.dot_pending
                        && self
                            .pending
                            .as_ref()
                            .is_some_and(|p| p.kind == SignKind::Sign)
                    {
                        self.dot_pending = true;
                    } else {
                        self.resolve_dot(col);
                        self.finish_separator(c, col);
                    }
                }
                AtomKind::Slash => {
                    self.resolve_dot(col);
                    self.process_slash(col);
                }
                AtomKind::Divider => {
                    self.resolve_dot(col);
                    self.process_divider(col);
                }
                AtomKind::LogogramToggle => {
                    self.resolve_dot(col);
                    self.logogram_open = !self.logogram_open;
                    self.line_has_content = true;
                }
                AtomKind::Ligature => {
                    self.resolve_dot(col);
                    self.commit_pending();
                    self.ligature_pending = true;
                    self.separated = true;
                    self.line_has_content = true;
                }
                AtomKind::Directive { name, value } => {
                    self.resolve_dot(col);
                    self.process_directive(&name, value.as_deref(), col);
                }
                AtomKind::Comment(text) => {
                    self.resolve_dot(col);
                    self.process_comment(text, col);
                }
                AtomKind::Break => {
                    self.resolve_dot(col);
                    self.commit_pending();
                    self.pending_break = true;
                    self.separated = true;
                    self.after_super = None;
                }
            }
        }
        self.end_line(line);
    }

    fn process_token(&mut self, tok: TokenAtom, col: usize, end_col: usize) {
        self.line_has_content = true;

        let core = match &tok.core {
            Core::Empty => CoreShape::Empty,
            Core::Description(text) => CoreShape::Description(text.clone()),
            Core::Text(text) => {
                let (clean, internal) = strip_internal(text);
                CoreShape::Text {
                    classified: classify(&clean, self.in_suffix),
                    raw: text.clone(),
                    internal,
                }
            }
        };

        // A sign name after a held `.` continues the dotted complex
        if self.dot_pending {
            self.dot_pending = false;
            if let CoreShape::Text {
                classified: Some(c),
                internal,
                ..
            } = &core
            {
                if c.kind == SignKind::Sign
                    && self
                        .pending
                        .as_ref()
                        .is_some_and(|p| p.kind == SignKind::Sign)
                {
                    self.process_prefix(&tok.prefix, false, col);
                    let joined = c.value.clone();
                    let internal = *internal;
                    if let Some(p) = &mut self.pending {
                        p.value.push('.');
                        p.value.push_str(&joined);
                        p.internal_damage |= internal;
                        p.end = end_col;
                    }
                    self.process_suffix(tok.suffix, col);
                    return;
                }
            }
            self.finish_separator('.', col);
        }

        let was_separated = self.separated;
        self.commit_pending();

        let has_core = !matches!(core, CoreShape::Empty);
        let opens_super = tok.prefix.iter().any(|&c| matches!(c, '{' | '<'));
        let exempt = opens_super || self.superscript.is_some() || self.after_super.is_some();
        if has_core && !was_separated && !exempt {
            self.diags
                .push(self.line_no, col, DiagnosticKind::SeparatorError);
        }

        // A right-aligned region followed directly by more of the word sits
        // between two sign runs: its signs annotate both sides.
        if let Some((first, alignment)) = self.after_super.take() {
            if has_core && alignment == IndicatorAlignment::Right && !was_separated {
                for sign in &mut self.out.signs[first..] {
                    if sign.indicator_alignment == IndicatorAlignment::Right {
                        sign.indicator_alignment = IndicatorAlignment::Center;
                    }
                }
            }
        }

        self.process_prefix(&tok.prefix, self.word_signs == 0 || was_separated, col);

        match core {
            CoreShape::Empty => {}
            CoreShape::Description(text) => {
                self.begin_sign(
                    Classified {
                        kind: SignKind::Description,
                        value: text,
                        crits: String::new(),
                        capitalized: false,
                        non_stem: false,
                        spec: None,
                    },
                    false,
                    col,
                    end_col,
                );
            }
            CoreShape::Text {
                classified: None,
                raw,
                ..
            } => {
                self.diags
                    .push_with_text(self.line_no, col, DiagnosticKind::ValueError, raw);
                return;
            }
            CoreShape::Text {
                classified: Some(c),
                internal,
                ..
            } => self.begin_sign(c, internal, col, end_col),
        }

        self.process_suffix(tok.suffix, col);
    }

    fn process_prefix(&mut self, prefix: &[char], left_super: bool, col: usize) {
        for &c in prefix {
            if let Some(class) = open_condition(c) {
                if self.condition != Condition::Intact {
                    self.diags
                        .push(self.line_no, col, DiagnosticKind::NestedCondition);
                }
                self.condition = class.condition();
            } else {
                match c {
                    '{' => self.open_superscript(false, left_super, col),
                    '<' => self.open_superscript(true, left_super, col),
                    '‹' => self.close_prefix_segment(col),
                    _ => {}
                }
            }
        }
    }

    fn begin_sign(&mut self, c: Classified, internal_damage: bool, start: usize, end: usize) {
        let mut sign = PendingSign::new(c.kind, c.value, self.condition, start, end);
        sign.sign_spec = c.spec;
        sign.crits = c.crits;
        sign.internal_damage = internal_damage;

        if let Some(sup) = &self.superscript {
            let misfit = matches!(c.kind, SignKind::Punctuation | SignKind::Description)
                || (!sup.phonographic && c.kind == SignKind::Number);
            if misfit {
                self.diags
                    .push(self.line_no, start, DiagnosticKind::SuperscriptError);
            }
            sign.phonographic = Some(sup.phonographic);
            sign.indicator_alignment = sup.alignment;
        } else if self.logogram_open {
            sign.phonographic = Some(false);
        }

        if c.capitalized && self.proper_noun.is_none() {
            self.word_capitalized = true;
        }
        if c.kind != SignKind::Punctuation && self.opts.stem_default {
            sign.stem = Some(!(c.non_stem || self.in_suffix));
        }
        self.pending = Some(sign);
        // Commits are deferred, so the boundary flag must clear when a core
        // begins, not when it commits: separators and breaks arriving while
        // the sign is still pending re-set it.
        self.separated = false;
    }

    fn process_suffix(&mut self, suffix: Vec<SuffixPiece>, col: usize) {
        // The first parenthetical on a bare numeral is its specification
        let mut spec_open = self
            .pending
            .as_ref()
            .is_some_and(|p| p.kind == SignKind::Number && p.sign_spec.is_none());
        for piece in suffix {
            match piece {
                SuffixPiece::Close(c) => self.process_close(c, col),
                SuffixPiece::Crit(DAMAGE_HASH) => {
                    if self.condition != Condition::Intact {
                        self.diags
                            .push(self.line_no, col, DiagnosticKind::InvalidDamageHash);
                    } else if let Some(p) = &mut self.pending {
                        p.hash_damaged = true;
                    }
                }
                SuffixPiece::Crit(c) => {
                    if let Some(p) = &mut self.pending {
                        p.crits.push(c);
                    }
                }
                SuffixPiece::Comment(text) => {
                    if spec_open {
                        spec_open = false;
                        if !is_metrological_spec(&text) {
                            self.diags.push_with_text(
                                self.line_no,
                                col,
                                DiagnosticKind::InvalidNumberSpec,
                                text.clone(),
                            );
                        }
                        if let Some(p) = &mut self.pending {
                            p.sign_spec = Some(text);
                        }
                    } else if let Some(p) = &mut self.pending {
                        p.comments.push(text);
                    } else {
                        self.word_comments.push(text);
                    }
                }
            }
        }
    }

    fn process_close(&mut self, c: char, col: usize) {
        if let Some(class) = close_condition(c) {
            if self.condition != class.condition() {
                self.diags
                    .push(self.line_no, col, DiagnosticKind::UnbalancedCondition);
            }
            self.condition = Condition::Intact;
            return;
        }
        match c {
            '}' => self.close_superscript(false, col),
            '>' => self.close_superscript(true, col),
            '›' => {
                if self.in_suffix {
                    self.diags
                        .push(self.line_no, col, DiagnosticKind::SegmentationError);
                } else {
                    self.in_suffix = true;
                }
            }
            _ => {}
        }
    }

    fn open_superscript(&mut self, phonographic: bool, left: bool, col: usize) {
        if self.superscript.is_some() {
            self.diags
                .push(self.line_no, col, DiagnosticKind::SuperscriptError);
        }
        self.superscript = Some(Superscript {
            phonographic,
            alignment: if left {
                IndicatorAlignment::Left
            } else {
                IndicatorAlignment::Right
            },
            first_sign: self.out.signs.len(),
        });
    }

    fn close_superscript(&mut self, phonographic: bool, col: usize) {
        match self.superscript.take() {
            Some(sup) if sup.phonographic == phonographic => {
                self.after_super = Some((sup.first_sign, sup.alignment));
            }
            _ => self
                .diags
                .push(self.line_no, col, DiagnosticKind::SuperscriptError),
        }
    }

    /// A `‹` closes the prefix morpheme run: everything committed so far in
    /// this word was prefix, not stem.
    fn close_prefix_segment(&mut self, col: usize) {
        if self.prefix_closed || self.in_suffix {
            self.diags
                .push(self.line_no, col, DiagnosticKind::SegmentationError);
            return;
        }
        self.prefix_closed = true;
        for sign in &mut self.out.signs[self.word_start_sign..] {
            if sign.stem == Some(true) {
                sign.stem = Some(false);
            }
        }
    }

    fn finish_separator(&mut self, c: char, col: usize) {
        self.commit_pending();
        self.line_has_content = true;
        if self.separated {
            self.diags.push_with_text(
                self.line_no,
                col,
                DiagnosticKind::SeparatorError,
                c.to_string(),
            );
        }
        if let Some((_, IndicatorAlignment::Left)) = self.after_super {
            self.diags
                .push(self.line_no, col, DiagnosticKind::SuperscriptError);
        }
        self.after_super = None;
        if c == ':' {
            self.inverted_pending = true;
        }
        self.separated = true;
    }

    fn process_slash(&mut self, col: usize) {
        if let Some(p) = &mut self.pending {
            p.newline = true;
        } else if let Some(sign) = self.out.signs.last_mut() {
            if self.line_has_content {
                sign.newline = true;
            } else {
                self.diags
                    .push(self.line_no, col, DiagnosticKind::SeparatorError);
            }
        } else {
            self.diags
                .push(self.line_no, col, DiagnosticKind::SeparatorError);
        }
        self.line_has_content = true;
        self.separated = true;
    }

    /// A `|` divider is itself a punctuation sign in the current word, and
    /// closes the word and its compound behind itself.
    fn process_divider(&mut self, col: usize) {
        self.commit_pending();
        self.line_has_content = true;
        self.pending_break = false;
        self.after_super = None;
        self.pending = Some(PendingSign::new(
            SignKind::Punctuation,
            "|".to_string(),
            self.condition,
            col,
            col + 1,
        ));
        self.commit_pending();
        self.close_word();
        self.separated = true;
    }

    fn process_directive(&mut self, name: &str, value: Option<&str>, col: usize) {
        self.commit_pending();
        self.line_has_content = true;
        // Shifts act at compound boundaries
        if self.pending_break && self.word_signs > 0 {
            self.close_word();
        }
        self.pending_break = false;
        match (name, value) {
            ("akk", None) => self.language = Language::Akkadian,
            ("sum", None) => self.language = Language::Sumerian,
            ("hit", None) => self.language = Language::Hittite,
            ("sec", Some(label)) => {
                self.out.sections.push(Section {
                    label: label.to_string(),
                });
                self.section = Some(self.out.sections.len() - 1);
            }
            _ => match (proper_noun_kind(name), value) {
                (Some(kind), None) => {
                    self.proper_noun = Some(kind);
                    self.word_capitalized = true;
                }
                _ => self.diags.push_with_text(
                    self.line_no,
                    col,
                    DiagnosticKind::DirectiveError,
                    format!("%{name}"),
                ),
            },
        }
    }

    fn process_comment(&mut self, text: String, col: usize) {
        if !self.line_has_content {
            self.diags
                .push_with_text(self.line_no, col, DiagnosticKind::CommentError, text);
            self.line_has_content = true;
            return;
        }
        if let Some(p) = &mut self.pending {
            p.comments.push(text);
        } else {
            self.word_comments.push(text);
        }
    }

    fn commit_pending(&mut self) {
        let Some(p) = self.pending.take() else {
            return;
        };
        if self.pending_break && self.word_signs > 0 {
            self.close_word();
        }
        self.pending_break = false;

        let mut condition = p.condition;
        if p.internal_damage || p.hash_damaged {
            condition = Condition::Damaged;
        }
        if p.kind == SignKind::Damage {
            condition = if p.value == "…" {
                Condition::Lost
            } else {
                Condition::Damaged
            };
        }
        let comment = if p.comments.is_empty() {
            None
        } else {
            Some(p.comments.join("; "))
        };
        self.out.signs.push(Sign {
            line_no: self.line_no,
            word_index: self.out.words.len(),
            value: p.value,
            sign_spec: p.sign_spec,
            kind: p.kind,
            indicator_alignment: p.indicator_alignment,
            phonographic: p.phonographic,
            condition,
            stem: p.stem,
            crits: p.crits,
            comment,
            newline: p.newline,
            inverted: std::mem::take(&mut self.inverted_pending),
            ligature: std::mem::take(&mut self.ligature_pending),
            source_span: SourceSpan {
                start: p.start,
                stop: p.end,
            },
        });
        self.word_signs += 1;
    }

    fn close_word(&mut self) {
        self.out.words.push(Word {
            compound_index: self.out.compounds.len(),
            capitalized: self.word_capitalized,
        });
        let comment = if self.word_comments.is_empty() {
            None
        } else {
            Some(self.word_comments.join("; "))
        };
        let language = match self.language {
            Language::Default => self.opts.language_default,
            shifted => shifted,
        };
        self.out.compounds.push(Compound {
            proper_noun_type: self.proper_noun,
            language,
            section_index: self.section,
            comment,
        });
        self.word_signs = 0;
        self.word_start_sign = self.out.signs.len();
        self.word_capitalized = false;
        self.word_comments.clear();
        self.prefix_closed = false;
        self.in_suffix = false;
        if self.opts.shift_scope == ShiftScope::Compound {
            self.language = Language::Default;
            self.proper_noun = None;
        }
    }

    fn resolve_dot(&mut self, col: usize) {
        if self.dot_pending {
            self.dot_pending = false;
            self.finish_separator('.', col);
        }
    }

    fn end_line(&mut self, line: &str) {
        let col = line.chars().count();
        self.resolve_dot(col);
        self.commit_pending();
        if self.superscript.take().is_some() {
            self.diags
                .push(self.line_no, col, DiagnosticKind::SuperscriptError);
        }
        if self.condition != Condition::Intact {
            self.diags
                .push(self.line_no, col, DiagnosticKind::UnclosedCondition);
            self.condition = Condition::Intact;
        }
        if self.logogram_open {
            self.diags
                .push(self.line_no, col, DiagnosticKind::UnpairedLogogram);
            self.logogram_open = false;
        }
        if self.word_signs > 0 {
            self.close_word();
        }
        if self.opts.shift_scope == ShiftScope::Line {
            self.language = Language::Default;
            self.proper_noun = None;
        }
        self.pending_break = false;
        self.separated = true;
        self.after_super = None;
        self.inverted_pending = false;
        self.ligature_pending = false;
        self.line_has_content = false;
        self.word_comments.clear();
        self.word_start_sign = self.out.signs.len();
    }

    fn finish(mut self) -> ParseOutput {
        self.out.diagnostics = self.diags.into_vec();
        self.out
    }
}

/// Removes condition brackets folded inside a core, e.g. `du[mu]`. Their
/// presence marks the whole sign damaged without touching the line's
/// bracket-balance state.
fn strip_internal(text: &str) -> (String, bool) {
    if !text.chars().any(is_condition_bracket) {
        return (text.to_string(), false);
    }
    let clean: String = text.chars().filter(|&c| !is_condition_bracket(c)).collect();
    (clean, true)
}

fn proper_noun_kind(name: &str) -> Option<ProperNounKind> {
    match name {
        "person" => Some(ProperNounKind::Person),
        "place" => Some(ProperNounKind::Place),
        "god" => Some(ProperNounKind::God),
        "water" => Some(ProperNounKind::Water),
        "field" => Some(ProperNounKind::Field),
        "temple" => Some(ProperNounKind::Temple),
        "month" => Some(ProperNounKind::Month),
        "object" => Some(ProperNounKind::Object),
        "ethnicity" => Some(ProperNounKind::Ethnicity),
        _ => None,
    }
}
