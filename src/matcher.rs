//! Locating LTWA patterns inside a title.
//!
//! For one pattern, every valid match site in the title is enumerated: the
//! pattern body is aligned under collation equivalence, the abbreviation is
//! assembled from the title's own characters (so case and diacritics
//! survive), and the span is extended over flection according to the
//! pattern's dash flags. Overlaps between sites of different patterns are
//! deliberately kept; the planner resolves them.

use crate::collate;
use crate::pattern::Pattern;

/// One site where a pattern matched. Offsets are character offsets into the
/// NFC-normalized, trimmed title the site was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Match<'p> {
    /// First matched character.
    pub start: usize,
    /// One past the last consumed character, appendix included.
    pub end: usize,
    /// Abbreviation to substitute for the span. Built from title characters
    /// plus literal dots from the replacement template; for rows marked "not
    /// abbreviated" it is the matched slice verbatim.
    pub abbreviation: String,
    /// Flectional suffix tolerated after a pattern without an end dash
    /// (up to three of `i a e s n ' ’`).
    pub appendix: String,
    /// The row that matched.
    pub pattern: &'p Pattern,
}

/// Suffix characters tolerated after a pattern body that does not end in a
/// dash.
fn is_appendix_char(c: char) -> bool {
    matches!(c, 'i' | 'a' | 'e' | 's' | 'n' | '\'' | '’')
}

/// Enumerate all match sites of `pattern` in `title`.
///
/// `pretend_dash` treats the pattern as if it carried both affix dashes,
/// surfacing compound-word matches ("engineering" inside "bioengineering").
pub fn match_sites<'p>(
    title: &[char],
    pattern: &'p Pattern,
    pretend_dash: bool,
) -> Vec<Match<'p>> {
    let mut body = pattern.pattern.as_str();
    if pattern.end_dash || pretend_dash {
        body = body.strip_suffix('-').unwrap_or(body);
    }
    if pattern.start_dash || pretend_dash {
        body = body.strip_prefix('-').unwrap_or(body);
    }
    let body: Vec<char> = body.chars().collect();
    // Affix rows repeat the dash in the abbreviation column ("-ology" →
    // "-ol."); it stands for the unabbreviated stem and is never emitted.
    let mut rep = pattern.replacement.as_str();
    if pattern.end_dash || pretend_dash {
        rep = rep.strip_suffix('-').unwrap_or(rep);
    }
    if pattern.start_dash || pretend_dash {
        rep = rep.strip_prefix('-').unwrap_or(rep);
    }
    let replacement: Vec<char> = if pattern.is_not_abbreviated() {
        Vec::new()
    } else {
        rep.chars().collect()
    };
    let needs_word_start = !(pattern.start_dash || pretend_dash);

    let mut sites = Vec::new();
    for start in 0..title.len() {
        if needs_word_start && start > 0 && !collate::is_boundary(title[start - 1]) {
            continue;
        }
        if let Some(site) = try_site(title, start, &body, &replacement, pattern, pretend_dash) {
            sites.push(site);
        }
    }
    sites
}

fn try_site<'p>(
    title: &[char],
    start: usize,
    body: &[char],
    replacement: &[char],
    pattern: &'p Pattern,
    pretend_dash: bool,
) -> Option<Match<'p>> {
    let parts = collate::collating_match(&title[start..], body)?;

    // Walk the replacement template against the alignment, emitting the
    // *title's* slice for every replacement character and swallowing the
    // aligned characters the abbreviation drops.
    let mut abbreviation = String::new();
    let mut end = start;
    let mut part_idx = 0;
    let mut rep_idx = 0;
    while rep_idx < replacement.len() {
        if replacement[rep_idx] == '.' {
            abbreviation.push('.');
            rep_idx += 1;
            continue;
        }
        let single = replacement[rep_idx].to_string();
        let pair: Option<String> = (rep_idx + 1 < replacement.len())
            .then(|| replacement[rep_idx..rep_idx + 2].iter().collect());
        loop {
            let part = parts.get(part_idx)?;
            part_idx += 1;
            end += part.text.chars().count();
            if collate::c_equiv(&part.pattern, &single) {
                abbreviation.push_str(&part.text);
                rep_idx += 1;
                break;
            }
            if let Some(pair) = &pair {
                if collate::c_equiv(&part.pattern, pair) {
                    abbreviation.push_str(&part.text);
                    rep_idx += 2;
                    break;
                }
            }
        }
    }
    // Aligned characters past the replacement were matched but are not part
    // of the abbreviation.
    for part in &parts[part_idx..] {
        end += part.text.chars().count();
    }

    let appendix: String;
    if pattern.end_dash || pretend_dash {
        // Open-ended pattern: the flection runs to the next boundary.
        while end < title.len() && !collate::is_boundary(title[end]) {
            end += 1;
        }
        appendix = String::new();
    } else {
        let mut run = 0;
        while run < 3 && end + run < title.len() && is_appendix_char(title[end + run]) {
            run += 1;
        }
        let taken = (0..=run).rev().find(|&n| {
            end + n == title.len() || collate::is_boundary(title[end + n])
        })?;
        appendix = title[end..end + taken].iter().collect();
        end += taken;
    }

    let abbreviation = if pattern.is_not_abbreviated() {
        title[start..end].iter().collect()
    } else {
        abbreviation
    };

    Some(Match { start, end, abbreviation, appendix, pattern })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(line: &str) -> Pattern {
        Pattern::parse(line).unwrap()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn matches_at_word_start_only() {
        let p = pat("journal\tJ.\tmul");
        let title = chars("Journal of Microjournalism");
        let sites = match_sites(&title, &p, false);
        // "journalism" fails the appendix check; mid-word "journal" is gated.
        assert_eq!(sites.len(), 1);
        assert_eq!((sites[0].start, sites[0].end), (0, 7));
        assert_eq!(sites[0].abbreviation, "J.");
        assert_eq!(sites[0].appendix, "");
    }

    #[test]
    fn tolerates_short_flectional_appendix() {
        let p = pat("journal\tJ.\tmul");
        let title = chars("Journals of Note");
        let sites = match_sites(&title, &p, false);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].appendix, "s");
        assert_eq!((sites[0].start, sites[0].end), (0, 8));
        assert_eq!(sites[0].abbreviation, "J.");
    }

    #[test]
    fn rejects_long_or_unbounded_suffixes() {
        let p = pat("journal\tJ.\tmul");
        assert!(match_sites(&chars("Journalism Today"), &p, false).is_empty());
        assert!(match_sites(&chars("Journalier"), &p, false).is_empty());
    }

    #[test]
    fn end_dash_consumes_flection_to_the_boundary() {
        let p = pat("geograph-\tGeogr.\tmul");
        let title = chars("Geographical Review");
        let sites = match_sites(&title, &p, false);
        assert_eq!(sites.len(), 1);
        assert_eq!((sites[0].start, sites[0].end), (0, 12));
        assert_eq!(sites[0].abbreviation, "Geogr.");
    }

    #[test]
    fn emitted_abbreviation_preserves_title_case() {
        let p = pat("deutsch-\tDtsch.\tger");
        let sites = match_sites(&chars("deutsches Recht"), &p, false);
        assert_eq!(sites[0].abbreviation, "dtsch.");

        let sites = match_sites(&chars("Deutsche Grammatik"), &p, false);
        assert_eq!(sites[0].abbreviation, "Dtsch.");
    }

    #[test]
    fn replacement_pair_consumes_a_title_ligature() {
        let p = pat("oeconomic-\tOecon.\tlat");
        let sites = match_sites(&chars("Œconomicus"), &p, false);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].abbreviation, "Œcon.");
        assert_eq!(sites[0].end, 10);
    }

    #[test]
    fn start_dash_matches_mid_word() {
        let p = pat("-ology\t-ol.\teng");
        let title = chars("Musicology");
        let sites = match_sites(&title, &p, false);
        assert_eq!(sites.len(), 1);
        assert_eq!((sites[0].start, sites[0].end), (5, 10));
        // Substituting the span keeps the stem: "Musicol."
        assert_eq!(sites[0].abbreviation, "ol.");
    }

    #[test]
    fn pretend_dash_surfaces_compound_matches() {
        let p = pat("engineering\tEng.\teng");
        let title = chars("Bioengineering");
        assert!(match_sites(&title, &p, false).is_empty());
        let sites = match_sites(&title, &p, true);
        assert_eq!(sites.len(), 1);
        assert_eq!((sites[0].start, sites[0].end), (3, 14));
        assert_eq!(sites[0].abbreviation, "eng.");
    }

    #[test]
    fn not_abbreviated_rows_emit_the_slice_verbatim() {
        let p = pat("acta\tn.a.\tlat");
        let sites = match_sites(&chars("Acta Mathematica"), &p, false);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].abbreviation, "Acta");
    }

    #[test]
    fn overlapping_sites_are_all_reported() {
        let p = pat("ana\tAn.\tmul");
        let title = chars("Ana ana");
        let sites = match_sites(&title, &p, false);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].start, 0);
        assert_eq!(sites[1].start, 4);
    }
}
