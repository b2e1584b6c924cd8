//! The limited Unicode equivalence under which LTWA patterns match titles.
//!
//! The LTWA treats ligatures, foreign letters, and diacritics as equal to
//! their plain-ASCII counterparts ("Zeitschrift" matches "Zeitſchrift",
//! "œconomia" matches "Oeconomia"), but it is much narrower than full
//! Unicode collation. Everything here is a pure function of its inputs.

use unicode_normalization::UnicodeNormalization;

/// Canonical composition. Titles and LTWA fields are stored in this form.
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}

/// Fold a string towards its ASCII skeleton.
///
/// Fixed per-character rewrites (ligature expansion, foreign-letter
/// substitution, removal of a few spacing marks) followed by compatibility
/// decomposition with the Latin combining marks stripped. Case is preserved
/// wherever the target has case.
pub fn normalize(text: &str) -> String {
    let mut rewritten = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ß' => rewritten.push_str("ss"),
            'ẞ' => rewritten.push_str("SS"),
            'đ' | 'ð' => rewritten.push('d'),
            'Đ' | 'Ð' => rewritten.push('D'),
            'þ' => rewritten.push_str("th"),
            'Þ' => rewritten.push_str("TH"),
            'ħ' => rewritten.push('h'),
            'Ħ' => rewritten.push('H'),
            'ł' => rewritten.push('l'),
            'Ł' => rewritten.push('L'),
            'œ' => rewritten.push_str("oe"),
            'Œ' => rewritten.push_str("Oe"),
            'æ' => rewritten.push_str("ae"),
            'Æ' => rewritten.push_str("Ae"),
            'ı' => rewritten.push('i'),
            'ø' => rewritten.push('o'),
            'Ø' => rewritten.push('O'),
            // Catalan middle dot, modifier double prime, replacement char.
            '\u{00B7}' | '\u{02BA}' | '\u{FFFD}' => {}
            _ => rewritten.push(c),
        }
    }
    rewritten
        .nfkd()
        .filter(|c| !matches!(c, '\u{0300}'..='\u{036F}'))
        .collect()
}

/// Word-boundary characters as the matcher and collator see them.
pub fn is_boundary(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '-' | '\u{2013}'
                | '\u{2014}'
                | '_'
                | '.'
                | ','
                | ':'
                | ';'
                | '!'
                | '|'
                | '='
                | '*'
                | '\\'
                | '/'
                | '"'
                | '('
                | ')'
                | '#'
                | '%'
                | '@'
                | '$'
                | '+'
                | '&'
                | '?'
                | '\''
        )
}

/// The planner's narrower variant: `+`, `&`, `?` and `'` bind words together
/// ("A&A", "Baha'i") instead of splitting them.
pub fn is_title_boundary(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '-' | '\u{2013}'
                | '\u{2014}'
                | '_'
                | '.'
                | ','
                | ':'
                | ';'
                | '!'
                | '|'
                | '='
                | '*'
                | '\\'
                | '/'
                | '"'
                | '('
                | ')'
                | '#'
                | '%'
                | '@'
                | '$'
        )
}

/// Lossy normalization used only as a prefix-tree key.
///
/// Lowercases the [`normalize`]d string, turns every boundary character into
/// a single space, drops anything outside `[a-z ]`, and elides `h` (first as
/// part of a `kh` digraph, then on its own) so that transliteration variants
/// land on the same key. Deliberately conflates many strings; matching
/// decisions are never made on this form.
pub fn promiscuously_normalize(text: &str) -> String {
    let lowered = normalize(text).to_lowercase();
    let mut spaced = String::with_capacity(lowered.len());
    let mut in_gap = true;
    for c in lowered.chars() {
        if is_boundary(c) {
            in_gap = true;
            continue;
        }
        if !c.is_ascii_lowercase() {
            continue;
        }
        if in_gap && !spaced.is_empty() {
            spaced.push(' ');
        }
        in_gap = false;
        spaced.push(c);
    }
    spaced.replace("kh", "").replace('h', "")
}

/// Collation equivalence. Defined on strings of any length because the
/// rewrites in [`normalize`] may map one code point to several letters or to
/// nothing at all.
pub fn c_equiv(a: &str, b: &str) -> bool {
    normalize(a).to_lowercase() == normalize(b).to_lowercase()
}

/// One step of a collating alignment: a slice of the matched text and the
/// collation-equivalent slice of the pattern. Either side may be empty when
/// the other normalizes to the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPart {
    pub text: String,
    pub pattern: String,
}

/// Align `pattern` against a prefix of `text` under collation equivalence.
///
/// The result is a parallel decomposition: consecutive slices of `text` and
/// `pattern` with `c_equiv` holding pairwise. The alignment is greedy and at
/// each step tries one-to-one, two-to-two, one-to-two and two-to-one slices
/// (ligatures expand to two letters on the other side) before falling back
/// to an epsilon for characters that normalize away. Returns `None` when
/// some pattern position cannot be aligned.
///
/// Keeping the original `text` slices is what lets the match consumer emit
/// abbreviations with the title's own capitalization, diacritics, and
/// spacing.
pub fn collating_match(text: &[char], pattern: &[char]) -> Option<Vec<AlignedPart>> {
    let mut parts = Vec::with_capacity(pattern.len());
    let mut i = 0;
    let mut j = 0;
    while j < pattern.len() {
        let p1: String = pattern[j].to_string();
        let p2: Option<String> =
            (j + 1 < pattern.len()).then(|| pattern[j..j + 2].iter().collect());
        let t1: Option<String> = (i < text.len()).then(|| text[i].to_string());
        let t2: Option<String> = (i + 1 < text.len()).then(|| text[i..i + 2].iter().collect());

        if let Some(t1) = &t1 {
            if c_equiv(t1, &p1) {
                parts.push(AlignedPart { text: t1.clone(), pattern: p1 });
                i += 1;
                j += 1;
                continue;
            }
        }
        if let (Some(t2), Some(p2)) = (&t2, &p2) {
            if c_equiv(t2, p2) {
                parts.push(AlignedPart { text: t2.clone(), pattern: p2.clone() });
                i += 2;
                j += 2;
                continue;
            }
        }
        if let (Some(t1), Some(p2)) = (&t1, &p2) {
            if c_equiv(t1, p2) {
                parts.push(AlignedPart { text: t1.clone(), pattern: p2.clone() });
                i += 1;
                j += 2;
                continue;
            }
        }
        if let Some(t2) = &t2 {
            if c_equiv(t2, &p1) {
                parts.push(AlignedPart { text: t2.clone(), pattern: p1 });
                i += 2;
                j += 1;
                continue;
            }
        }
        if c_equiv("", &p1) {
            parts.push(AlignedPart { text: String::new(), pattern: p1 });
            j += 1;
            continue;
        }
        if let Some(t1) = &t1 {
            if c_equiv(t1, "") {
                parts.push(AlignedPart { text: t1.clone(), pattern: String::new() });
                i += 1;
                continue;
            }
        }
        return None;
    }
    Some(parts)
}
