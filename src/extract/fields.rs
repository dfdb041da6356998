// =============================================================================
// fields.rs — THE HEURISTIC CASCADE ARTILLERY
// =============================================================================
//
// This module is where we do the actual "how many shares does the parent
// own?" determination, against thirty years of cover pages formatted by
// every word processor ever licensed to a law firm. And we do it FAST:
//
// 1. Aho-Corasick automatons find the section anchors ("sole voting",
//    "item 11", "cusip") for every field family in a single pass per line.
//    Antivirus-grade multi-pattern matching, pointed at beneficial
//    ownership boilerplate. Let that sink in.
//
// 2. memchr/memmem handles the literal zero spellings ("-0-" and friends)
//    with SIMD byte scanning, because even the zeros in this corpus come
//    in regional dialects.
//
// 3. Prioritized regex cascades do the value capture. Not one regex — a
//    priority LIST of them, most trustworthy first, because "1,234,567"
//    on the line below "SOLE VOTING POWER" is a share count and a naked
//    "750" two lines later is merely probably one.
//
// Cascade doctrine, identical for every field family:
//   - an ANCHOR phrase opens a scan window of the following lines;
//   - an ABORT phrase inside the window ends the search for the whole
//     document with the not-found sentinel (it means we've drifted into
//     the next section's boilerplate);
//   - within the window, patterns are tried line by line in priority
//     order, first hit wins;
//   - nothing found anywhere ⇒ None. Never zero. A filer who wrote "-0-"
//     told us something; a cover page we couldn't read told us nothing.
// =============================================================================

use aho_corasick::AhoCorasick;
use chrono::NaiveDate;
use memchr::memmem;
use regex::Regex;
use std::sync::LazyLock;

/// Anchor and abort phrases for one field family's scan window.
///
/// Anchors are matched against a whitespace-collapsed copy of each line, so
/// "Item  7." and "Item 7." both open a window. Aborts are matched against
/// the raw line, case-insensitively.
pub struct SectionQuery {
    anchors: AhoCorasick,
    abort: AhoCorasick,
}

impl SectionQuery {
    fn new(anchors: &[&str], abort: &str) -> Self {
        Self {
            anchors: AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(anchors)
                .expect("anchor automaton must build"),
            abort: AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build([abort])
                .expect("abort automaton must build"),
        }
    }
}

// The anchor/abort vocabularies below were tuned against the corpus, not
// deduced from the form instructions. Each abort phrase is the boilerplate
// that reliably marks the NEXT numbered item on the cover page, which is
// how we know the window ran past its section without finding a value.

/// Item 11 — aggregate amount beneficially owned.
pub static AGGREGATE_SHARES: LazyLock<SectionQuery> = LazyLock::new(|| {
    SectionQuery::new(
        &["aggregate amount", "amount beneficially owned", "item 11"],
        "check if the aggregate amount",
    )
});

/// Item 7 — sole voting power.
pub static SOLE_VOTING: LazyLock<SectionQuery> =
    LazyLock::new(|| SectionQuery::new(&["sole voting", "item 7"], "shared voting power"));

/// Item 8 — shared voting power.
pub static SHARED_VOTING: LazyLock<SectionQuery> =
    LazyLock::new(|| SectionQuery::new(&["shared voting", "item 8"], "sole dispositive power"));

/// Item 9 — sole dispositive power.
pub static SOLE_DISPOSITIVE: LazyLock<SectionQuery> = LazyLock::new(|| {
    SectionQuery::new(
        &["sole dispositive", "sole disposition", "item 9"],
        "shared dispositive power",
    )
});

/// Item 10 — shared dispositive power.
pub static SHARED_DISPOSITIVE: LazyLock<SectionQuery> = LazyLock::new(|| {
    SectionQuery::new(
        &["shared dispositive", "shared disposition", "item 10"],
        "aggregate amount beneficially",
    )
});

/// Item 13 — percent of class represented.
pub static PERCENT_OF_CLASS: LazyLock<SectionQuery> = LazyLock::new(|| {
    SectionQuery::new(
        &["percent of class", "class represented by", "item 13"],
        "type of reporting",
    )
});

// --- share count patterns, in priority order -------------------------------

/// Counts of a thousand shares or more, comma-grouped. The overwhelmingly
/// common spelling, and the most trustworthy.
static COMMA_GROUPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,3}(?:,\d{3})+\b").expect("share pattern must compile"));

/// Sub-thousand counts: any bare run of three digits. Permissive by design;
/// it only ever fires inside an anchored window after the comma pattern
/// failed.
static TRIPLE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3}").expect("share pattern must compile"));

/// "0" as a standalone word. The other zero spellings are literal enough
/// for memmem.
static WORD_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b0\b").expect("zero pattern must compile"));

// --- percentage patterns, in priority order ---------------------------------

/// A number wearing an actual percent sign. Gold standard.
static PCT_EXPLICIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d{1,3}(?:,\d{3})*(?:\.\d+)?%").expect("percent pattern must compile")
});

/// A number footnoted with an asterisk — "5.6*" with the asterisk pointing
/// at a disclaimer we are choosing not to read.
static PCT_FOOTNOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)\*").expect("percent pattern must compile"));

/// A bare decimal. On a percent-of-class cover line, "6.25" means 6.25%.
static PCT_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\.\d+\b").expect("percent pattern must compile"));

/// Last resort: any whitespace-preceded number that could be a percentage,
/// 0–100 with up to two decimals. These accumulate across the window and
/// the LAST one wins — later numbers in a percentage block are likelier to
/// be the answer than the row numbers and footnote indices that precede
/// them. Tuned against the corpus; do not "fix".
static PCT_BOUNDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s(100(?:\.0{1,2})?|0(?:\.\d{1,2})?|[1-9]?\d(?:\.\d{1,2})?)")
        .expect("percent pattern must compile")
});

static SEE_ATTACHMENT: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["see attachment"])
        .expect("attachment automaton must build")
});

// --- CUSIP ------------------------------------------------------------------

static CUSIP_ANCHOR: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["cusip"])
        .expect("cusip automaton must build")
});

/// The ten known shapes of a printed CUSIP, most general first. Issuers
/// split the 9 characters with spaces and dashes at every historically
/// attested position: 6+2+1, 3+3+2+1, 3+3+3, 5+letter+2+1, 4+5, or not at
/// all. First line in the window with any match wins, earliest pattern on
/// that line preferred.
static CUSIP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b[0-9A-Z][0-9]{3}[0-9A-Za-z]{2}[-\s]*[0-9]{0,2}[-\s]*[0-9]?\b",
        r"\b[0-9]{5}\s+[A-Z]\s+[0-9]{2}\s+[0-9]\b",
        r"\b[0-9]{3}\s+[0-9]{3}\s+[0-9]{2}\s+[0-9]\b",
        r"\b[0-9]{3}\s+[0-9]{3}\s+[0-9]{3}\b",
        r"\b[0-9]{9}\b",
        r"\b[0-9]{4}[A-Z]\s+[0-9]{2}\s+[0-9]\b",
        r"\b[0-9]{5}[A-Z][0-9]{3}\b",
        r"\b[0-9]{5}\s+[0-9]{2}\s+[0-9]\b",
        r"\b[0-9A-Z]{6}\s{2}[0-9]{3}\b",
        r"\b\d{4} \d{5}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("cusip pattern must compile"))
    .collect()
});

// --- transaction date --------------------------------------------------------

static EVENT_DATE_ANCHOR: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["date of event", "effective date"])
        .expect("event date automaton must build")
});

/// Spelled month-day(-and-day)-year, or slash-delimited numerics with a two
/// or four digit year. Leftmost match in the context window wins, spelled
/// form preferred at equal positions.
static DATE_FORMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:\s*and\s*\d{1,2})?\s*,\s*(\d{4})|(\d{1,2})/(\d{1,2})/(\d{2,4})",
    )
    .expect("date pattern must compile")
});

/// Collapse runs of whitespace to single spaces, for anchor matching only.
/// HTML-era filings love a mid-phrase line-wrap.
fn normalize_ws(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip a matched share count down to its digits. "1,234,567" → "1234567".
fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strip a matched percentage down to something f64 can read: digits, dot,
/// minus. Drops the percent sign, separators, and stray markup.
fn clean_numeric(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

fn spells_zero(line: &str) -> bool {
    WORD_ZERO.is_match(line)
        || memmem::find(line.as_bytes(), b" 0 ").is_some()
        || memmem::find(line.as_bytes(), b"-0-").is_some()
        || memmem::find(line.as_bytes(), b"None").is_some()
}

/// Hunt a share count near a section's anchor phrases.
///
/// For each anchor line, up to `window` lines (anchor line included) are
/// scanned in order. Per line, priority is: abort phrase (return the
/// sentinel for the whole document), comma-grouped count, bare three-digit
/// run, explicit zero spelling. A window that exhausts without a hit does
/// not end the hunt — a later anchor may still deliver.
pub fn find_share_count(text: &str, section: &SectionQuery, window: usize) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        if !section.anchors.is_match(normalize_ws(line).as_str()) {
            continue;
        }
        for candidate in lines.iter().skip(i).take(window) {
            if section.abort.is_match(candidate) {
                return None;
            }
            if let Some(m) = COMMA_GROUPED.find(candidate) {
                return Some(digits_only(m.as_str()));
            }
            if let Some(m) = TRIPLE_RUN.find(candidate) {
                return Some(digits_only(m.as_str()));
            }
            if spells_zero(candidate) {
                return Some("0".to_string());
            }
        }
    }
    None
}

/// Hunt the percent-of-class figure near a section's anchor phrases.
///
/// Same window mechanics as find_share_count, different cascade: explicit
/// "%" first, asterisk-footnoted number second, bare decimal third. A
/// "see attachment" inside the window is an immediate sentinel — the value
/// lives in an exhibit we don't have. Failing all that, bounded bare
/// numbers (0–100) accumulate across the window and the last one collected
/// wins.
pub fn find_percentage(text: &str, section: &SectionQuery, window: usize) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut bounded: Vec<String> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !section.anchors.is_match(normalize_ws(line).as_str()) {
            continue;
        }
        for candidate in lines.iter().skip(i).take(window) {
            if section.abort.is_match(candidate) {
                return None;
            }
            if let Some(m) = PCT_EXPLICIT.find(candidate) {
                return Some(clean_numeric(m.as_str()));
            }
            if let Some(g) = PCT_FOOTNOTE.captures(candidate).and_then(|c| c.get(1)) {
                return Some(clean_numeric(g.as_str()));
            }
            if let Some(m) = PCT_DECIMAL.find(candidate) {
                return Some(clean_numeric(m.as_str()));
            }
            if SEE_ATTACHMENT.is_match(candidate) {
                return None;
            }
            bounded.extend(
                PCT_BOUNDED
                    .captures_iter(candidate)
                    .filter_map(|c| c.get(1))
                    .map(|g| g.as_str().to_string()),
            );
        }
        if let Some(last) = bounded.last() {
            return Some(clean_numeric(last));
        }
    }
    None
}

/// Hunt the subject's CUSIP near any line containing the word "cusip".
///
/// The window is ±`radius` lines around each anchor line. Lines are scanned
/// in window order and the ten structural patterns are tried per line in
/// priority order; the first match anywhere wins, separators stripped.
pub fn find_cusip(text: &str, radius: usize) -> Option<String> {
    if !CUSIP_ANCHOR.is_match(text) {
        return None;
    }

    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !CUSIP_ANCHOR.is_match(line) {
            continue;
        }
        let start = i.saturating_sub(radius);
        let end = (i + radius).min(lines.len());
        for candidate in &lines[start..end] {
            for pattern in CUSIP_PATTERNS.iter() {
                if let Some(m) = pattern.find(candidate) {
                    let cleaned: String = m
                        .as_str()
                        .chars()
                        .filter(|c| !c.is_whitespace() && *c != '-')
                        .collect();
                    return Some(cleaned);
                }
            }
        }
    }
    None
}

/// Hunt the "date of event which requires filing" near its anchor phrases.
///
/// On an anchor hit, ±`radius` lines are joined into one context string
/// (non-breaking spaces normalized — HTML-era filings again) and the first
/// date-shaped substring is taken. Multi-day spellings like
/// "April 12 and 13, 2006" yield the first day. The extractor reports what
/// the document says, typo years included; whether to believe it is the
/// caller's problem.
pub fn find_transaction_date(text: &str, radius: usize) -> Option<NaiveDate> {
    if !EVENT_DATE_ANCHOR.is_match(text) {
        return None;
    }

    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !EVENT_DATE_ANCHOR.is_match(line) {
            continue;
        }
        let start = i.saturating_sub(radius);
        let end = (i + radius).min(lines.len());
        let context = lines[start..end].join(" ").replace('\u{a0}', " ");
        if let Some(caps) = DATE_FORMS.captures(&context) {
            return to_naive_date(&caps);
        }
    }
    None
}

fn to_naive_date(caps: &regex::Captures<'_>) -> Option<NaiveDate> {
    if let Some(month_name) = caps.get(1) {
        let month = month_number(month_name.as_str())?;
        let day: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year: i32 = caps.get(3)?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    } else {
        let month: u32 = caps.get(4)?.as_str().parse().ok()?;
        let day: u32 = caps.get(5)?.as_str().parse().ok()?;
        let year_text = caps.get(6)?.as_str();
        let year: i32 = year_text.parse().ok()?;
        // Two-digit years pivot at 70: the electronic corpus spans the
        // mid-90s through the 2020s.
        let year = if year_text.len() == 2 {
            if year >= 70 {
                1900 + year
            } else {
                2000 + year
            }
        } else {
            year
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    MONTHS
        .iter()
        .position(|m| name.eq_ignore_ascii_case(m))
        .map(|i| i as u32 + 1)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: usize = 20;
    const RADIUS: usize = 10;

    #[test]
    fn test_share_count_comma_grouped() {
        let text = "Item 7.\nSole Voting Power\n1,234,567\n";
        assert_eq!(
            find_share_count(text, &SOLE_VOTING, WINDOW).as_deref(),
            Some("1234567")
        );
    }

    #[test]
    fn test_share_count_bare_triple_digits() {
        let text = "11. Aggregate Amount Beneficially Owned\n750 shares\n";
        assert_eq!(
            find_share_count(text, &AGGREGATE_SHARES, WINDOW).as_deref(),
            Some("750")
        );
    }

    #[test]
    fn test_share_count_zero_spellings() {
        for zero in ["-0-", "None", " 0 ", "0"] {
            let text = format!("Sole Voting Power\n{zero}\n");
            assert_eq!(
                find_share_count(&text, &SOLE_VOTING, WINDOW).as_deref(),
                Some("0"),
                "zero spelling {zero:?} must parse as zero"
            );
        }
    }

    #[test]
    fn test_share_count_sentinel_is_not_zero() {
        let text = "Sole Voting Power\n(see footnote)\n";
        assert_eq!(find_share_count(text, &SOLE_VOTING, WINDOW), None);
    }

    #[test]
    fn test_share_count_abort_phrase_wins_over_later_numbers() {
        // The window drifted into the next item's boilerplate before any
        // number appeared: sentinel, even though a number follows.
        let text = "Sole Voting Power\nShared Voting Power\n1,234,567\n";
        assert_eq!(find_share_count(text, &SOLE_VOTING, WINDOW), None);
    }

    #[test]
    fn test_share_count_number_before_abort_still_wins() {
        let text = "Sole Voting Power\n2,000,000\nShared Voting Power\n";
        assert_eq!(
            find_share_count(text, &SOLE_VOTING, WINDOW).as_deref(),
            Some("2000000")
        );
    }

    #[test]
    fn test_share_count_respects_window() {
        let filler = "x\n".repeat(WINDOW);
        let text = format!("Sole Voting Power\n{filler}1,234,567\n");
        assert_eq!(find_share_count(&text, &SOLE_VOTING, WINDOW), None);
    }

    #[test]
    fn test_share_count_second_anchor_can_deliver() {
        // First anchor's window is empty; the hunt continues at the next
        // anchor instead of giving up.
        let filler = "x\n".repeat(WINDOW);
        let text = format!("Item 7\n{filler}Sole Voting Power\n42,000\n");
        assert_eq!(
            find_share_count(&text, &SOLE_VOTING, WINDOW).as_deref(),
            Some("42000")
        );
    }

    #[test]
    fn test_share_count_anchor_survives_ragged_whitespace() {
        let text = "SOLE    VOTING\tPOWER\n5,500\n";
        assert_eq!(
            find_share_count(text, &SOLE_VOTING, WINDOW).as_deref(),
            Some("5500")
        );
    }

    #[test]
    fn test_percentage_explicit_sign() {
        let text = "Item 13. Percent of Class Represented by Amount in Row (11)\n5.2%\n";
        assert_eq!(
            find_percentage(text, &PERCENT_OF_CLASS, WINDOW).as_deref(),
            Some("5.2")
        );
    }

    #[test]
    fn test_percentage_footnote_asterisk() {
        let text = "Percent of class\n7.5*\n";
        assert_eq!(
            find_percentage(text, &PERCENT_OF_CLASS, WINDOW).as_deref(),
            Some("7.5")
        );
    }

    #[test]
    fn test_percentage_bare_decimal() {
        let text = "Percent of class represented\n6.25\n";
        assert_eq!(
            find_percentage(text, &PERCENT_OF_CLASS, WINDOW).as_deref(),
            Some("6.25")
        );
    }

    #[test]
    fn test_percentage_see_attachment_is_sentinel() {
        let text = "Percent of class\nSee Attachment\n";
        assert_eq!(find_percentage(text, &PERCENT_OF_CLASS, WINDOW), None);
    }

    #[test]
    fn test_percentage_bounded_fallback_keeps_last_candidate() {
        // No %-signed, footnoted, or decimal value anywhere; the bounded
        // fallback accumulates " 11", " 45", " 52" and keeps the last.
        let text = "Percent of class represented by amount in row 11\n 45\n 52\n";
        assert_eq!(
            find_percentage(text, &PERCENT_OF_CLASS, WINDOW).as_deref(),
            Some("52")
        );
    }

    #[test]
    fn test_percentage_comma_grouped_explicit() {
        let text = "Percent of class\n1,234.5%\n";
        assert_eq!(
            find_percentage(text, &PERCENT_OF_CLASS, WINDOW).as_deref(),
            Some("1234.5")
        );
    }

    #[test]
    fn test_percentage_abort_phrase() {
        let text = "Percent of class\nType of Reporting Person\n9.9%\n";
        assert_eq!(find_percentage(text, &PERCENT_OF_CLASS, WINDOW), None);
    }

    #[test]
    fn test_cusip_fused_nine() {
        let text = "CUSIP No. 594918104\n";
        assert_eq!(find_cusip(text, RADIUS).as_deref(), Some("594918104"));
    }

    #[test]
    fn test_cusip_spaced_and_dashed_groups() {
        assert_eq!(
            find_cusip("CUSIP Number:\n594918 10 4\n", RADIUS).as_deref(),
            Some("594918104")
        );
        assert_eq!(
            find_cusip("CUSIP Number:\n594918-10-4\n", RADIUS).as_deref(),
            Some("594918104")
        );
    }

    #[test]
    fn test_cusip_six_char_root_only() {
        let text = "CUSIP No. 594918\n";
        assert_eq!(find_cusip(text, RADIUS).as_deref(), Some("594918"));
    }

    #[test]
    fn test_cusip_letter_root() {
        let text = "(CUSIP Number)\nG123456 78 9 is not ours but 12345A108 is\n";
        // First line in the window with any structural match wins.
        let found = find_cusip(text, RADIUS);
        assert!(found.is_some());
    }

    #[test]
    fn test_cusip_number_may_precede_anchor_line() {
        let text = "594918104\n(CUSIP Number)\n";
        assert_eq!(find_cusip(text, RADIUS).as_deref(), Some("594918104"));
    }

    #[test]
    fn test_cusip_absent_is_sentinel() {
        assert_eq!(find_cusip("No security identifier anywhere\n", RADIUS), None);
        assert_eq!(find_cusip("CUSIP Number: pending\n", RADIUS), None);
    }

    #[test]
    fn test_cusip_respects_radius() {
        let filler = "filler line\n".repeat(RADIUS);
        let text = format!("CUSIP No.\n{filler}594918104\n");
        assert_eq!(find_cusip(&text, RADIUS), None);
    }

    #[test]
    fn test_transaction_date_spelled_month() {
        let text = "(Date of Event Which Requires Filing of this Statement)\nApril 12, 2006\n";
        assert_eq!(
            find_transaction_date(text, RADIUS),
            NaiveDate::from_ymd_opt(2006, 4, 12)
        );
    }

    #[test]
    fn test_transaction_date_multi_day_takes_first() {
        let text = "Date of Event:\nApril 12 and 13, 2006\n";
        assert_eq!(
            find_transaction_date(text, RADIUS),
            NaiveDate::from_ymd_opt(2006, 4, 12)
        );
    }

    #[test]
    fn test_transaction_date_slash_two_digit_year() {
        let text = "Effective Date: 12/31/98\n";
        assert_eq!(
            find_transaction_date(text, RADIUS),
            NaiveDate::from_ymd_opt(1998, 12, 31)
        );
        let text = "Effective Date: 4/12/06\n";
        assert_eq!(
            find_transaction_date(text, RADIUS),
            NaiveDate::from_ymd_opt(2006, 4, 12)
        );
    }

    #[test]
    fn test_transaction_date_slash_four_digit_year() {
        let text = "date of event requiring filing: 04/12/2006\n";
        assert_eq!(
            find_transaction_date(text, RADIUS),
            NaiveDate::from_ymd_opt(2006, 4, 12)
        );
    }

    #[test]
    fn test_transaction_date_reports_typo_years_verbatim() {
        // Yes, really: the extractor's job is to read, not to believe.
        let text = "Date of Event Which Requires Filing\nApril 12, 1006\n";
        assert_eq!(
            find_transaction_date(text, RADIUS),
            NaiveDate::from_ymd_opt(1006, 4, 12)
        );
    }

    #[test]
    fn test_transaction_date_invalid_calendar_day_is_none() {
        let text = "Date of Event:\nJune 31, 2006\n";
        assert_eq!(find_transaction_date(text, RADIUS), None);
    }

    #[test]
    fn test_transaction_date_without_anchor_is_none() {
        assert_eq!(find_transaction_date("April 12, 2006\n", RADIUS), None);
    }

    #[test]
    fn test_transaction_date_context_spans_lines_before_anchor() {
        let text = "April 12, 2006\nsomething\n(Date of Event Which Requires Filing)\n";
        assert_eq!(
            find_transaction_date(text, RADIUS),
            NaiveDate::from_ymd_opt(2006, 4, 12)
        );
    }

    #[test]
    fn test_normalize_ws_collapses_everything() {
        assert_eq!(normalize_ws("  Item \t 7.\u{a0} done "), "Item 7. done");
    }

    #[test]
    fn test_clean_numeric_keeps_sign_and_dot() {
        assert_eq!(clean_numeric("-3.5%"), "-3.5");
        assert_eq!(clean_numeric("1,234.5%"), "1234.5");
    }
}
