//! Parsed LTWA records.
//!
//! The LTWA arrives as tab-separated lines: a word or word-fragment, its
//! canonical abbreviation, and a comma-separated list of ISO-639-2/B
//! language codes. Leading or trailing dashes on the fragment mark where
//! affixation is allowed ("-ology", "geograph-").

use std::collections::BTreeSet;

use thiserror::Error;

use crate::collate;

/// Internal stand-in for LTWA rows whose abbreviation column says the word
/// is not abbreviated (`n.a.` and its sloppier variants).
pub const NOT_ABBREVIATED: &str = "\u{2013}";

#[derive(Debug, Error)]
pub enum ParseError {
    /// A record with fewer than three tab-separated fields, or a pattern
    /// shorter than three characters once trimmed.
    #[error("invalid LTWA line: {line:?}")]
    InvalidLtwaLine { line: String },
}

/// One LTWA row. Immutable after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    /// The word or fragment as listed: NFC-normalized, trimmed, with
    /// parenthetical comments stripped. Keeps its affix dashes.
    pub pattern: String,
    /// Canonical abbreviation, or [`NOT_ABBREVIATED`].
    pub replacement: String,
    /// Language codes the row is tagged with. Filtering on these is
    /// optional; the LTWA applies every row to every language.
    pub languages: BTreeSet<String>,
    /// Pattern may match mid-word ("-ology").
    pub start_dash: bool,
    /// Pattern may extend over arbitrary flection ("geograph-").
    pub end_dash: bool,
    /// The raw line, for diagnostics.
    pub line: String,
}

impl Pattern {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidLtwaLine { line: line.to_string() };

        let mut fields = line.split('\t');
        let (raw_pattern, raw_replacement, raw_languages) =
            match (fields.next(), fields.next(), fields.next()) {
                (Some(p), Some(r), Some(l)) => (p, r, l),
                _ => return Err(invalid()),
            };

        let pattern = strip_comment(&collate::nfc(raw_pattern)).trim().to_string();
        if pattern.chars().count() < 3 {
            return Err(invalid());
        }

        let replacement = collate::nfc(raw_replacement).trim().to_string();
        let replacement = match replacement.as_str() {
            "n.a." | "n. a." | "n.a" => NOT_ABBREVIATED.to_string(),
            _ => replacement,
        };

        let languages: BTreeSet<String> = raw_languages
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        let start_dash = pattern.starts_with('-');
        let end_dash = pattern.ends_with('-');

        Ok(Pattern { pattern, replacement, languages, start_dash, end_dash, line: line.to_string() })
    }

    /// The pattern with its affix dashes removed.
    pub fn body(&self) -> &str {
        let mut body = self.pattern.as_str();
        if self.start_dash {
            body = &body[1..];
        }
        if self.end_dash {
            body = &body[..body.len() - 1];
        }
        body
    }

    pub fn is_not_abbreviated(&self) -> bool {
        self.replacement == NOT_ABBREVIATED
    }
}

/// Drop parenthetical comments some rows carry ("poste(s)" annotations and
/// editorial remarks).
fn strip_comment(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut depth = 0usize;
    for c in pattern.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Split on any Unicode line break: CRLF, LF, VT, FF, CR, NEL, LS, PS.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();
    while let Some((idx, c)) = iter.next() {
        let is_break = matches!(
            c,
            '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
        );
        if !is_break {
            continue;
        }
        lines.push(&text[start..idx]);
        let mut after = idx + c.len_utf8();
        if c == '\r' {
            if let Some(&(next_idx, next)) = iter.peek() {
                if next == '\n' {
                    iter.next();
                    after = next_idx + 1;
                }
            }
        }
        start = after;
    }
    lines.push(&text[start..]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_record() {
        let p = Pattern::parse("journal\tJ.\tmul").unwrap();
        assert_eq!(p.pattern, "journal");
        assert_eq!(p.replacement, "J.");
        assert!(p.languages.contains("mul"));
        assert!(!p.start_dash);
        assert!(!p.end_dash);
        assert_eq!(p.body(), "journal");
    }

    #[test]
    fn parses_dash_flags_and_body() {
        let p = Pattern::parse("geograph-\tGeogr.\tmul").unwrap();
        assert!(p.end_dash && !p.start_dash);
        assert_eq!(p.body(), "geograph");

        let p = Pattern::parse("-ology\t-ol.\teng").unwrap();
        assert!(p.start_dash && !p.end_dash);
        assert_eq!(p.body(), "ology");
    }

    #[test]
    fn collapses_not_abbreviated_sentinels() {
        for raw in ["n.a.", "n. a.", "n.a"] {
            let p = Pattern::parse(&format!("acta\t{raw}\tlat")).unwrap();
            assert!(p.is_not_abbreviated());
        }
    }

    #[test]
    fn strips_parenthetical_comments() {
        let p = Pattern::parse("annales (hist.)\tann.\tfre,mul").unwrap();
        assert_eq!(p.pattern, "annales");
        assert_eq!(p.languages.len(), 2);
    }

    #[test]
    fn rejects_short_and_underfilled_records() {
        assert!(matches!(
            Pattern::parse("ab\tA.\tmul"),
            Err(ParseError::InvalidLtwaLine { .. })
        ));
        assert!(matches!(
            Pattern::parse("journal\tJ."),
            Err(ParseError::InvalidLtwaLine { .. })
        ));
    }

    #[test]
    fn error_carries_the_raw_line() {
        let Err(ParseError::InvalidLtwaLine { line }) = Pattern::parse("xy\tX.\tmul") else {
            panic!("expected parse failure");
        };
        assert_eq!(line, "xy\tX.\tmul");
    }

    #[test]
    fn split_lines_handles_mixed_break_styles() {
        let text = "one\r\ntwo\nthree\rfour\u{0085}five\u{2028}six";
        assert_eq!(split_lines(text), vec!["one", "two", "three", "four", "five", "six"]);
    }

    #[test]
    fn split_lines_keeps_blank_segments() {
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_pattern() {
        let p = Pattern::parse("zeitschrift\tZ.\tger").unwrap();
        let s = serde_json::to_string(&p).expect("serialize");
        let de: Pattern = serde_json::from_str(&s).expect("deserialize");
        assert_eq!(p, de);
    }
}
