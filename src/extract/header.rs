// =============================================================================
// extract/header.rs — THE ONE PART OF A FILING THAT BEHAVES
// =============================================================================
//
// Every archived filing opens with an SGML-ish header block generated by the
// SEC's own intake pipeline, not by law firms. It is machine-written and
// blessedly rigid: marker lines name a section ("SUBJECT COMPANY",
// "FILED BY"), and inside a section the fields we want appear as
//
//     COMPANY CONFORMED NAME:\t\t\tMICROSOFT CORP
//     CENTRAL INDEX KEY:\t\t\t0000789019
//
// Three literal tabs, then the value. No parser crate needed: we scan
// lines, flip a flag when the marker goes by, and take the trailing token
// off the first labeled line after it. Lookups are case-sensitive because
// the intake pipeline has emitted uppercase since the Clinton
// administration.
// =============================================================================

use chrono::NaiveDate;

pub const SUBJECT_MARKER: &str = "SUBJECT COMPANY";
pub const FILER_MARKER: &str = "FILED BY";
pub const LABEL_CIK: &str = "CENTRAL INDEX KEY";
pub const LABEL_NAME: &str = "COMPANY CONFORMED NAME";

const VALUE_SEPARATOR: &str = "\t\t\t";

/// Find the value of `label` inside the section opened by `marker`: the
/// first labeled line at or after the first marker line wins. The value is
/// whatever trails the last triple-tab separator, trimmed; a line with no
/// separator yields the whole line, which downstream typed parsing will
/// reject on its own. Absence of marker or label is None, not an error.
pub fn section_value(header: &str, marker: &str, label: &str) -> Option<String> {
    let mut in_section = false;
    for line in header.lines() {
        if line.contains(marker) {
            in_section = true;
        }
        if in_section && line.contains(label) {
            let value = line.rsplit(VALUE_SEPARATOR).next().unwrap_or(line);
            return Some(value.trim().to_string());
        }
    }
    None
}

/// Like section_value, but parsed to a CIK. Values are zero-padded decimal
/// strings ("0000789019"); anything that won't parse degrades to None.
pub fn section_cik(header: &str, marker: &str) -> Option<u64> {
    section_value(header, marker, LABEL_CIK)?.parse().ok()
}

/// FILED AS OF DATE, the SEC's own stamp. First matching line wins; all
/// digits on the line are collected and must form exactly an 8-digit
/// YYYYMMDD token. Anything else degrades to None.
pub fn issue_date(header: &str) -> Option<NaiveDate> {
    for line in header.lines() {
        if line.contains("FILED AS OF DATE") {
            let digits: String = line.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() != 8 {
                return None;
            }
            return NaiveDate::parse_from_str(&digits, "%Y%m%d").ok();
        }
    }
    None
}

// =============================================================================
// TESTS
// =============================================================================
