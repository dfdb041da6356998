// =============================================================================
// parser.rs — ONE FILING IN, ONE RECORD OUT
// =============================================================================
//
// The assembly line for a single document: read it, split header from body,
// point every cascade at its section, and pack whatever survived into a
// FilingRecord. This function is the unit of work the worker pool hands to
// rayon, so it NEVER returns an error and it NEVER panics on content — a
// filing we can't read becomes a sentinel record and the batch keeps moving.
// =============================================================================

use crate::extract::{document, fields, header};
use crate::models::{FilingKind, FilingRecord};

/// Knobs for the extraction cascades. Defaults are the values the
/// vocabularies were tuned with; change them only with a corpus in hand.
#[derive(Debug, Clone, Copy)]
pub struct ParseTuning {
    /// Lines scanned below a share/percentage anchor, anchor line included.
    pub scan_window: usize,
    /// Lines scanned on EITHER side of a CUSIP or event-date anchor.
    pub context_radius: usize,
    /// Text nodes that get whitespace-normalized when stripping HTML.
    pub text_node_budget: usize,
}

impl Default for ParseTuning {
    fn default() -> Self {
        Self {
            scan_window: 20,
            context_radius: 10,
            text_node_budget: 1_000,
        }
    }
}

/// Extract everything extractable from one already-read 13D/13G document.
/// The worker pool reads the document itself so it can report the document
/// flags (html, unreadable) alongside the record.
///
/// The header fields come from the raw text — the SGML header precedes any
/// HTML and markup-stripping would only mangle its tab separators. The body
/// cascades run on the markup-stripped text when the document is HTML, on
/// the raw text otherwise.
pub fn parse_document(
    doc: &document::Document,
    file_path: String,
    kind: FilingKind,
    tuning: &ParseTuning,
) -> FilingRecord {
    if doc.is_unreadable() {
        return FilingRecord::unreadable(file_path, kind);
    }

    let raw = doc.header_text().unwrap_or_default();
    let body = doc.body_text().unwrap_or_default();

    FilingRecord {
        file_path,
        kind,
        date_issue: header::issue_date(raw),
        date_transaction: fields::find_transaction_date(body, tuning.context_radius),
        cusip: fields::find_cusip(body, tuning.context_radius),
        company: header::section_value(raw, header::SUBJECT_MARKER, header::LABEL_NAME),
        cik: header::section_cik(raw, header::SUBJECT_MARKER),
        owner: header::section_value(raw, header::FILER_MARKER, header::LABEL_NAME),
        cik_owner: header::section_cik(raw, header::FILER_MARKER),
        shares_agg: share_count(body, &fields::AGGREGATE_SHARES, tuning),
        shares_sole_voting: share_count(body, &fields::SOLE_VOTING, tuning),
        shares_shared_voting: share_count(body, &fields::SHARED_VOTING, tuning),
        shares_sole_dispositive: share_count(body, &fields::SOLE_DISPOSITIVE, tuning),
        shares_shared_dispositive: share_count(body, &fields::SHARED_DISPOSITIVE, tuning),
        pct_owned: percentage(body, tuning),
    }
}

/// Run one share-count cascade and type the result. The cascade emits pure
/// digit strings, so a parse failure here means the count overflows u64 —
/// at which point it is not a share count, it is line noise, and the
/// sentinel is the honest answer.
fn share_count(body: &str, section: &fields::SectionQuery, tuning: &ParseTuning) -> Option<u64> {
    fields::find_share_count(body, section, tuning.scan_window)?
        .parse()
        .ok()
}

fn percentage(body: &str, tuning: &ParseTuning) -> Option<f64> {
    fields::find_percentage(body, &fields::PERCENT_OF_CLASS, tuning.scan_window)?
        .parse()
        .ok()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::{Path, PathBuf};

    /// Drop a fixture in the OS temp dir under a collision-proof name.
    /// Deleted on drop so parallel test runs don't trip over each other.
    struct Fixture {
        path: PathBuf,
    }

    impl Fixture {
        fn new(contents: &str) -> Self {
            let path = std::env::temp_dir()
                .join(format!("stakewatch-parser-test-{}.txt", uuid::Uuid::new_v4()));
            std::fs::write(&path, contents).expect("fixture write");
            Self { path }
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    /// Read and parse with default tuning, the way the worker pool does.
    fn parse(path: &Path, kind: FilingKind) -> FilingRecord {
        let tuning = ParseTuning::default();
        let doc = document::read(path, tuning.text_node_budget);
        parse_document(&doc, path.to_string_lossy().into_owned(), kind, &tuning)
    }

    const HEADER: &str = "SEC-HEADER: 0000905718-06-000123\n\
        FILED AS OF DATE:\t\t20060420\n\
        SUBJECT COMPANY:\n\
        \tCOMPANY DATA:\n\
        \t\tCOMPANY CONFORMED NAME:\t\t\tMICROSOFT CORP\n\
        \t\tCENTRAL INDEX KEY:\t\t\t0000789019\n\
        FILED BY:\n\
        \tCOMPANY DATA:\n\
        \t\tCOMPANY CONFORMED NAME:\t\t\tCONTOSO CAPITAL LP\n\
        \t\tCENTRAL INDEX KEY:\t\t\t0001045810\n";

    const COVER: &str = "SCHEDULE 13D\n\
        Microsoft Corporation\n\
        (Name of Issuer)\n\
        594918104\n\
        (CUSIP Number)\n\
        April 12, 2006\n\
        (Date of Event Which Requires Filing of this Statement)\n\
        7. Sole Voting Power\n\
        1,234,567\n\
        8. Shared Voting Power\n\
        -0-\n\
        9. Sole Dispositive Power\n\
        1,234,567\n\
        10. Shared Dispositive Power\n\
        -0-\n\
        11. Aggregate Amount Beneficially Owned by Each Reporting Person\n\
        1,234,567\n\
        13. Percent of Class Represented by Amount in Row (11)\n\
        5.2%\n";

    #[test]
    fn test_parse_plaintext_filing_end_to_end() {
        let fixture = Fixture::new(&format!("{HEADER}{COVER}"));
        let record = parse(&fixture.path, FilingKind::D13);

        assert_eq!(record.kind, FilingKind::D13);
        assert_eq!(record.date_issue, NaiveDate::from_ymd_opt(2006, 4, 20));
        assert_eq!(record.date_transaction, NaiveDate::from_ymd_opt(2006, 4, 12));
        assert_eq!(record.cusip.as_deref(), Some("594918104"));
        assert_eq!(record.company.as_deref(), Some("MICROSOFT CORP"));
        assert_eq!(record.cik, Some(789019));
        assert_eq!(record.owner.as_deref(), Some("CONTOSO CAPITAL LP"));
        assert_eq!(record.cik_owner, Some(1045810));
        assert_eq!(record.shares_agg, Some(1_234_567));
        assert_eq!(record.shares_sole_voting, Some(1_234_567));
        assert_eq!(record.shares_shared_voting, Some(0));
        assert_eq!(record.shares_sole_dispositive, Some(1_234_567));
        assert_eq!(record.shares_shared_dispositive, Some(0));
        assert_eq!(record.pct_owned, Some(5.2));
    }

    #[test]
    fn test_parse_html_filing_reads_through_markup() {
        // The cover-page preamble matters: real filings put dozens of text
        // nodes between the SGML header and the CUSIP label, which keeps
        // the header's digit soup outside the CUSIP scan radius.
        let body = "<html><body><table>\
            <tr><td>UNITED STATES</td></tr>\
            <tr><td>SECURITIES AND EXCHANGE COMMISSION</td></tr>\
            <tr><td>Washington DC</td></tr>\
            <tr><td>SCHEDULE 13G</td></tr>\
            <tr><td>Under the Securities Exchange Act</td></tr>\
            <tr><td>Microsoft Corporation</td></tr>\
            <tr><td>Name of Issuer</td></tr>\
            <tr><td>Common Stock</td></tr>\
            <tr><td>Title of Class of Securities</td></tr>\
            <tr><td>Cover Page</td></tr>\
            <tr><td>CUSIP No.</td><td>594918104</td></tr>\
            <tr><td>7. Sole Voting Power</td></tr><tr><td>2,000,000</td></tr>\
            </table></body></html>";
        let fixture = Fixture::new(&format!("{HEADER}{body}"));
        let record = parse(&fixture.path, FilingKind::G13);

        // Header fields survive because they are read from the raw text,
        // body fields because the markup got stripped onto clean lines.
        assert_eq!(record.cik, Some(789019));
        assert_eq!(record.cusip.as_deref(), Some("594918104"));
        assert_eq!(record.shares_sole_voting, Some(2_000_000));
    }

    #[test]
    fn test_parse_missing_file_yields_sentinel_record() {
        let path = std::env::temp_dir().join("stakewatch-parser-test-no-such-file.txt");
        let record = parse(&path, FilingKind::D13);

        assert_eq!(record, FilingRecord::unreadable(
            path.to_string_lossy().into_owned(),
            FilingKind::D13,
        ));
    }

    #[test]
    fn test_parse_keeps_sentinels_where_cascades_find_nothing() {
        // A header-only filing: identity present, ownership numbers absent.
        let fixture = Fixture::new(HEADER);
        let record = parse(&fixture.path, FilingKind::G13);

        assert_eq!(record.cik, Some(789019));
        assert_eq!(record.cik_owner, Some(1045810));
        assert_eq!(record.cusip, None);
        assert_eq!(record.shares_agg, None, "absence must stay None, not 0");
        assert_eq!(record.pct_owned, None);
    }
}
