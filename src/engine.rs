//! The abbreviation engine: parsed LTWA, candidate indices, and the public
//! query surface. Built once, then immutable; every query is a pure
//! function of the engine and its arguments, so an instance can be shared
//! freely across threads.

use log::debug;

use crate::collate;
use crate::matcher::{self, Match};
use crate::pattern::{self, ParseError, Pattern};
use crate::planner;
use crate::trie::PrefixTree;

pub struct Engine {
    patterns: Vec<Pattern>,
    /// Patterns that must start at a word boundary, keyed by promiscuous
    /// body.
    dict_patterns: PrefixTree<usize>,
    /// Start-dash patterns, allowed to match mid-word.
    nonprefix_patterns: PrefixTree<usize>,
    /// Patterns whose normalized body is not ASCII-letter-initial. Their
    /// promiscuous key starts at the wrong offset for positional lookups,
    /// so they are evaluated for every query.
    bad_patterns: Vec<usize>,
    short_words: Vec<String>,
}

impl Engine {
    /// Build an engine from the LTWA and a short-word list.
    ///
    /// `ltwa` is the raw dictionary: a header line, then tab-separated
    /// `pattern`, `replacement`, `languages` records. `short_words` is one
    /// word per line. Lines are split on any Unicode line break; blank
    /// lines are skipped.
    pub fn new(ltwa: &str, short_words: &str) -> Result<Self, ParseError> {
        let mut patterns = Vec::new();
        for line in pattern::split_lines(ltwa).into_iter().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            patterns.push(Pattern::parse(line)?);
        }

        let mut dict_patterns = PrefixTree::new();
        let mut nonprefix_patterns = PrefixTree::new();
        let mut bad_patterns = Vec::new();
        for (idx, p) in patterns.iter().enumerate() {
            let body = p.body();
            let letter_initial = collate::normalize(body)
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic());
            if !letter_initial {
                bad_patterns.push(idx);
            } else if p.start_dash {
                nonprefix_patterns.add(&collate::promiscuously_normalize(body), idx);
            } else {
                dict_patterns.add(&collate::promiscuously_normalize(body), idx);
            }
        }

        let short_words: Vec<String> = pattern::split_lines(short_words)
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        debug!(
            "engine built: {} patterns ({} word-initial, {} infix, {} irregular), {} short words",
            patterns.len(),
            dict_patterns.len(),
            nonprefix_patterns.len(),
            bad_patterns.len(),
            short_words.len()
        );

        Ok(Engine { patterns, dict_patterns, nonprefix_patterns, bad_patterns, short_words })
    }

    /// Number of LTWA records loaded.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn short_words(&self) -> &[String] {
        &self.short_words
    }

    /// Candidate patterns that could match somewhere in `title`.
    ///
    /// Over-approximates (the indices are keyed on a lossy form); it never
    /// misses a pattern that [`Engine::matches`] would accept. The result
    /// is sorted by raw line and deduplicated. With `pretend_dash` every
    /// position counts as a word start, surfacing compound-word candidates
    /// such as "engineering" inside "bioengineering".
    pub fn potential_patterns(&self, title: &str, pretend_dash: bool) -> Vec<&Pattern> {
        let key = collate::promiscuously_normalize(title);
        let bytes = key.as_bytes();
        let mut found = self.bad_patterns.clone();
        for i in 0..bytes.len() {
            let suffix = &key[i..];
            if bytes[i].is_ascii_lowercase() {
                found.extend(self.nonprefix_patterns.get(suffix));
            }
            let new_word = pretend_dash || i == 0 || !bytes[i - 1].is_ascii_lowercase();
            if new_word {
                found.extend(self.dict_patterns.get(suffix));
            }
        }
        found.sort_by(|&a, &b| self.patterns[a].line.cmp(&self.patterns[b].line));
        found.dedup_by(|a, b| self.patterns[*a].line == self.patterns[*b].line);
        found.into_iter().map(|idx| &self.patterns[idx]).collect()
    }

    /// All match sites of one pattern in `title` (NFC-normalized and
    /// trimmed before matching; offsets refer to that form).
    pub fn matches<'p>(
        &self,
        title: &str,
        pattern: &'p Pattern,
        languages: Option<&[&str]>,
        pretend_dash: bool,
    ) -> Vec<Match<'p>> {
        if !languages_admit(pattern, languages) {
            return Vec::new();
        }
        let title = collate::nfc(title);
        let chars: Vec<char> = title.trim().chars().collect();
        matcher::match_sites(&chars, pattern, pretend_dash)
    }

    /// Patterns with at least one match site in `title`, sorted by the
    /// offset of their first match. `patterns` substitutes the candidate
    /// set; `None` uses [`Engine::potential_patterns`].
    pub fn matching_patterns<'a>(
        &'a self,
        title: &str,
        languages: Option<&[&str]>,
        pretend_dash: bool,
        patterns: Option<&[&'a Pattern]>,
    ) -> Vec<&'a Pattern> {
        let title = collate::nfc(title);
        let trimmed = title.trim();
        let chars: Vec<char> = trimmed.chars().collect();
        let candidates: Vec<&'a Pattern> = match patterns {
            Some(list) => list.to_vec(),
            None => self.potential_patterns(trimmed, pretend_dash),
        };

        let mut hits: Vec<(usize, &'a Pattern)> = Vec::new();
        for p in candidates {
            if !languages_admit(p, languages) {
                continue;
            }
            let first = matcher::match_sites(&chars, p, pretend_dash)
                .iter()
                .map(|m| m.start)
                .min();
            if let Some(first) = first {
                hits.push((first, p));
            }
        }
        hits.sort_by_key(|&(start, _)| start);
        hits.into_iter().map(|(_, p)| p).collect()
    }

    /// Abbreviate a serial title per ISO 4.
    ///
    /// Total: malformed or trivial input comes back NFC-normalized and
    /// trimmed rather than as an error. Single-word titles (after article
    /// removal) are preserved.
    pub fn make_abbreviation(
        &self,
        title: &str,
        languages: Option<&[&str]>,
        patterns: Option<&[&Pattern]>,
    ) -> String {
        let title = collate::nfc(title);
        let title = title.trim();
        if title.chars().count() < 2 {
            return title.to_string();
        }

        let s = planner::normalize_punctuation(title);
        let s = planner::strip_dependent_separators(&s);
        let s = planner::strip_articles(&s);

        if planner::is_single_word(&s, &self.short_words) {
            return planner::collapse_whitespace(&s);
        }

        let owned_candidates;
        let candidates: &[&Pattern] = match patterns {
            Some(list) => list,
            None => {
                owned_candidates = self.potential_patterns(&s, false);
                &owned_candidates
            }
        };

        let chars: Vec<char> = s.chars().collect();
        let mut sites = Vec::new();
        for &p in candidates {
            if !languages_admit(p, languages) {
                continue;
            }
            sites.extend(matcher::match_sites(&chars, p, false));
        }

        let s = planner::apply_matches(&chars, sites);
        let s = planner::remove_short_words(&s, &self.short_words);
        planner::collapse_whitespace(&s)
    }
}

/// `None` and `["*"]` disable filtering; otherwise the pattern's language
/// set must intersect the caller's.
fn languages_admit(pattern: &Pattern, languages: Option<&[&str]>) -> bool {
    match languages {
        None => true,
        Some(langs) => langs.contains(&"*") || langs.iter().any(|l| pattern.languages.contains(*l)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LTWA: &str = "PATTERN\tREPLACEMENT\tLANGUAGES\n\
        international\tInt.\tmul\n\
        journal\tJ.\tmul\n\
        science\tSci.\tmul\n\
        -ology\t-ol.\teng\n\
        'n Gansie\tn.a.\tafr\n";

    fn engine() -> Engine {
        Engine::new(LTWA, "of\nthe\n").unwrap()
    }

    #[test]
    fn construction_counts_records_and_short_words() {
        let e = engine();
        assert_eq!(e.len(), 5);
        assert!(!e.is_empty());
        assert_eq!(e.short_words(), ["of", "the"]);
    }

    #[test]
    fn construction_rejects_malformed_lines() {
        let err = match Engine::new("HEADER\nxy\tX.\tmul\n", "") {
            Err(err) => err,
            Ok(_) => panic!("expected construction to fail"),
        };
        let ParseError::InvalidLtwaLine { line } = err;
        assert_eq!(line, "xy\tX.\tmul");
    }

    #[test]
    fn blank_lines_and_header_are_skipped() {
        let e = Engine::new("HEADER\n\njournal\tJ.\tmul\n\n", "").unwrap();
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn potential_patterns_cover_real_matches() {
        let e = engine();
        let candidates = e.potential_patterns("International Journal of Science", false);
        let names: Vec<&str> = candidates.iter().map(|p| p.pattern.as_str()).collect();
        assert!(names.contains(&"international"));
        assert!(names.contains(&"journal"));
        assert!(names.contains(&"science"));
    }

    #[test]
    fn non_letter_initial_patterns_are_always_candidates() {
        let e = engine();
        let candidates = e.potential_patterns("Unrelated Title", false);
        assert!(candidates.iter().any(|p| p.pattern == "'n Gansie"));
    }

    #[test]
    fn language_filter_is_disabled_by_none_and_star() {
        let e = engine();
        let p = &e.patterns()[3]; // -ology, eng
        assert!(e.matches("Musicology", p, Some(&["fre"]), false).is_empty());
        assert!(!e.matches("Musicology", p, Some(&["*"]), false).is_empty());
        assert!(!e.matches("Musicology", p, None, false).is_empty());
        assert!(!e.matches("Musicology", p, Some(&["eng", "fre"]), false).is_empty());
    }

    #[test]
    fn matching_patterns_sort_by_first_match_offset() {
        let e = engine();
        let hits = e.matching_patterns("Journal of International Science", None, false, None);
        let names: Vec<&str> = hits.iter().map(|p| p.pattern.as_str()).collect();
        assert_eq!(names, ["journal", "international", "science"]);
    }

    #[test]
    fn caller_supplied_candidates_replace_the_index() {
        let e = engine();
        let journal = &e.patterns()[1];
        let only = [journal];
        let out = e.make_abbreviation("International Journal of Science", None, Some(&only));
        assert_eq!(out, "International J. Science");
    }

    #[test]
    fn trivial_titles_come_back_trimmed_and_unchanged() {
        let e = engine();
        assert_eq!(e.make_abbreviation("", None, None), "");
        assert_eq!(e.make_abbreviation("  J ", None, None), "J");
        assert_eq!(e.make_abbreviation(".", None, None), ".");
    }
}
