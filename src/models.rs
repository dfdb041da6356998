// =============================================================================
// models.rs — THE SACRED DATA STRUCTURES OF BENEFICIAL OWNERSHIP
// =============================================================================
//
// These structs represent the fundamental building blocks of our stake
// extraction system. Each field has been carefully chosen to capture every
// conceivable piece of information a 13D/13G filing grudgingly discloses
// about who owns whom.
//
// Is it overkill to keep five separate share-count columns plus a percentage
// on every filing record? Yes. Do we care? Absolutely not. Item 7 through
// Item 11 exist, therefore we extract them.
// =============================================================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Event dates with years outside this band are treated as filing typos.
/// The corpus genuinely contains "April 12, 1006". The SEC did not exist
/// in 1006. Probably.
pub const PLAUSIBLE_YEAR_MIN: i32 = 1900;
pub const PLAUSIBLE_YEAR_MAX: i32 = 2100;

/// The two beneficial-ownership disclosure forms we care about.
/// Each one is a different flavor of "we now own more than 5% of you."
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FilingKind {
    /// Schedule 13D — the activist form. Filed when the buyer has opinions
    /// about what the company should do next. Usually long, occasionally
    /// hostile, always formatted by whichever law firm lost the coin toss.
    #[serde(rename = "13D")]
    D13,

    /// Schedule 13G — the passive form. Filed by index funds and other
    /// owners who promise they're just here to hold shares quietly.
    #[serde(rename = "13G")]
    G13,
}

impl fmt::Display for FilingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilingKind::D13 => write!(f, "13D"),
            FilingKind::G13 => write!(f, "13G"),
        }
    }
}

/// The metadata encoded in a filing's on-disk path:
/// `<form>/<year>_<month>/<cik>_<date>_<accession>.txt`.
/// The archive mirror names files this way so that humans can find things
/// without a database. We parse it back out for logging and sanity checks,
/// never for extraction — the document itself is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingPathMeta {
    pub year: i32,
    pub month: u32,
    /// CIK of the subject company, per the archive's naming convention.
    pub cik: u64,
    pub filing_date: NaiveDate,
    pub accession: String,
}

impl FilingPathMeta {
    /// Parse the archive path convention. Returns None for names that don't
    /// follow it — those files still get parsed, they just don't get the
    /// nice structured log fields.
    pub fn parse(path: &str) -> Option<Self> {
        let normalized = path.replace('\\', "/");
        let mut parts = normalized.rsplit('/');
        let file_name = parts.next()?;
        let folder = parts.next()?;

        // "<year>_<month>"
        let (year_str, month_str) = folder.split_once('_')?;
        let year: i32 = year_str.parse().ok()?;
        let month: u32 = month_str.parse().ok()?;

        // "<cik>_<YYYY-MM-DD>_<accession>.txt"
        let stem = file_name.strip_suffix(".txt").unwrap_or(file_name);
        let mut segments = stem.splitn(3, '_');
        let cik: u64 = segments.next()?.parse().ok()?;
        let filing_date = NaiveDate::parse_from_str(segments.next()?, "%Y-%m-%d").ok()?;
        let accession = segments.next()?.to_string();

        Some(Self {
            year,
            month,
            cik,
            filing_date,
            accession,
        })
    }
}

/// One row of the filings table: everything we managed to pry out of a
/// single 13D/13G document. This is the load-bearing struct of the whole
/// engine — the parser produces it, the identity resolver votes with it,
/// the panel builder spreads it across three decades of calendar days.
///
/// Every extracted field is an Option. `None` means "the cascade came up
/// empty," which is NOT the same as zero shares. A filer who reports
/// "-0-" sole voting power told us something; a filer whose table our
/// patterns couldn't read told us nothing. Conflating the two would
/// quietly poison every downstream average, so we don't.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilingRecord {
    /// Path of the source document. Doubles as the record's identity in
    /// logs, because accession numbers are unique but unpronounceable.
    pub file_path: String,

    /// 13D or 13G, derived from which archive folder the file lives in.
    pub kind: FilingKind,

    /// FILED AS OF DATE from the SGML header. The one date the SEC's own
    /// pipeline stamps, so it's almost always present and almost always
    /// trustworthy. "Almost" is doing real work in that sentence.
    pub date_issue: Option<NaiveDate>,

    /// The "date of event which requires filing" from the body text.
    /// Free-text, typed by paralegals, occasionally from the 11th century.
    pub date_transaction: Option<NaiveDate>,

    /// The subject company's CUSIP as printed, separators stripped.
    /// 6, 8, or 9 characters when found. None is the "No CUSIP" sentinel.
    pub cusip: Option<String>,

    /// Subject company conformed name from the header.
    pub company: Option<String>,

    /// Subject company CIK from the header.
    pub cik: Option<u64>,

    /// Filer (owner) conformed name from the header.
    pub owner: Option<String>,

    /// Filer (owner) CIK from the header.
    pub cik_owner: Option<u64>,

    /// Item 11 — aggregate amount beneficially owned.
    pub shares_agg: Option<u64>,

    /// Item 7 — sole voting power.
    pub shares_sole_voting: Option<u64>,

    /// Item 8 — shared voting power.
    pub shares_shared_voting: Option<u64>,

    /// Item 9 — sole dispositive power.
    pub shares_sole_dispositive: Option<u64>,

    /// Item 10 — shared dispositive power.
    pub shares_shared_dispositive: Option<u64>,

    /// Item 13 — percent of class represented, 0–100.
    pub pct_owned: Option<f64>,
}

impl FilingRecord {
    /// A record for a document we could not read at all. Path and kind are
    /// the only things the filesystem still vouches for; everything else is
    /// the not-found sentinel. The batch keeps moving.
    pub fn unreadable(file_path: String, kind: FilingKind) -> Self {
        Self {
            file_path,
            kind,
            date_issue: None,
            date_transaction: None,
            cusip: None,
            company: None,
            cik: None,
            owner: None,
            cik_owner: None,
            shares_agg: None,
            shares_sole_voting: None,
            shares_shared_voting: None,
            shares_sole_dispositive: None,
            shares_shared_dispositive: None,
            pct_owned: None,
        }
    }

    /// True when the subject filed about itself — financial intermediaries
    /// (hi, Renaissance) sometimes appear as both subject and owner on the
    /// same asset. Known data-quality exclusion, not an error.
    pub fn is_self_filing(&self) -> bool {
        match (self.cik, self.cik_owner) {
            (Some(subject), Some(owner)) => subject == owner,
            _ => false,
        }
    }

    /// The date this record's ownership state takes effect in the panel:
    /// the transaction date when it parsed and its year is plausible,
    /// otherwise the issue date. Returns None when neither is usable.
    pub fn event_date(&self) -> Option<NaiveDate> {
        match self.date_transaction {
            Some(d) if (PLAUSIBLE_YEAR_MIN..=PLAUSIBLE_YEAR_MAX).contains(&d.year()) => Some(d),
            _ => self.date_issue,
        }
    }
}

impl fmt::Display for FilingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} — subject cik {:?} / owner cik {:?} / cusip {:?}",
            self.kind,
            self.file_path,
            self.cik,
            self.cik_owner,
            self.cusip
        )
    }
}

/// One reported ownership state at a point in time, keyed by the pair it
/// belongs to. This is the sparse input to the panel builder: one event
/// per usable filing, later spread across every calendar day until the
/// next event (or the heat death of the panel end date) overrides it.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnershipEvent {
    /// Stable hash of (subject CUSIP, owner CIK). Partitions the panel:
    /// every pair's timeline is built independently of every other pair's.
    pub pair_id: u64,

    /// When this ownership state takes effect. Transaction date if sane,
    /// issue date if not. See FilingRecord::event_date.
    pub date: NaiveDate,

    /// Subject CUSIP as extracted (6, 8, or 9 chars). Required — a pair
    /// without a security identifier can never match the price series.
    pub cusip: String,

    /// Owner CIK. Required — it's half of the pair identity.
    pub cik_owner: u64,

    pub kind: FilingKind,
    pub date_issue: Option<NaiveDate>,
    pub date_transaction: Option<NaiveDate>,
    pub company: Option<String>,
    pub cik: Option<u64>,
    pub owner: Option<String>,
    pub shares_agg: Option<u64>,
    pub shares_sole_voting: Option<u64>,
    pub shares_shared_voting: Option<u64>,
    pub shares_sole_dispositive: Option<u64>,
    pub shares_shared_dispositive: Option<u64>,
    pub pct_owned: Option<f64>,
}

impl OwnershipEvent {
    /// The pair identity: a stable hash over (subject CUSIP, owner CIK).
    /// Deterministic within a build, which is all the panel needs — the id
    /// is a partition key, not a foreign key anyone stores across runs.
    pub fn pair_id(cusip: &str, cik_owner: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        cusip.hash(&mut hasher);
        cik_owner.hash(&mut hasher);
        hasher.finish()
    }

    /// Derive an event from a parsed record. None when the record lacks a
    /// CUSIP, an owner CIK, or any usable date — such filings still live in
    /// the filings table, they just can't anchor a panel timeline.
    pub fn from_record(record: &FilingRecord) -> Option<Self> {
        let cusip = record.cusip.clone()?;
        let cik_owner = record.cik_owner?;
        let date = record.event_date()?;

        Some(Self {
            pair_id: Self::pair_id(&cusip, cik_owner),
            date,
            cusip,
            cik_owner,
            kind: record.kind,
            date_issue: record.date_issue,
            date_transaction: record.date_transaction,
            company: record.company.clone(),
            cik: record.cik,
            owner: record.owner.clone(),
            shares_agg: record.shares_agg,
            shares_sole_voting: record.shares_sole_voting,
            shares_shared_voting: record.shares_shared_voting,
            shares_sole_dispositive: record.shares_sole_dispositive,
            shares_shared_dispositive: record.shares_shared_dispositive,
            pct_owned: record.pct_owned,
        })
    }

    /// The subject-side join key for the 8-character price tier. CUSIPs
    /// shorter than 8 characters keep their full length and simply never
    /// match an 8-character series entry, which is exactly the fallthrough
    /// the 6-character tier exists for.
    pub fn cusip_prefix8(&self) -> &str {
        char_prefix(&self.cusip, 8)
    }

    /// The subject-side join key for the 6-character fallback tier.
    pub fn cusip6(&self) -> &str {
        char_prefix(&self.cusip, 6)
    }
}

/// First `chars` characters of a CUSIP, counted in chars rather than bytes.
/// Extracted CUSIPs are ASCII, but the reuse path reads the filings table
/// back from disk, and a hand-edited table must not be able to panic a
/// slice mid-character.
fn char_prefix(cusip: &str, chars: usize) -> &str {
    match cusip.char_indices().nth(chars) {
        Some((end, _)) => &cusip[..end],
        None => cusip,
    }
}

impl fmt::Display for OwnershipEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pair {:016x} @ {} — {} owns {:?} shares of {} ({:?}%)",
            self.pair_id,
            self.date,
            self.cik_owner,
            self.shares_agg,
            self.cusip,
            self.pct_owned
        )
    }
}

/// One row of the external daily price/identifier series. The engine
/// consumes this read-only: it never writes prices, it only joins against
/// them. Column names are ours; the loader owns the mapping from whatever
/// the vendor file calls things this decade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,

    /// 8-character security identifier (issuer root + issue).
    pub cusip: String,

    /// 6-character issuer root. The vendor ships it pre-sliced; we trust
    /// but verify nothing.
    pub cusip6: String,

    /// Entity identifier, annotated by us from the identity map. Empty in
    /// the raw vendor file, populated before the panel join. Bars whose
    /// issuer root never appears in the filing corpus stay None and are
    /// dropped from the join input.
    pub cik: Option<u64>,

    /// The vendor's own permanent security id.
    pub security_id: Option<u64>,

    pub ticker: Option<String>,

    /// Industry classification code.
    pub industry: Option<String>,

    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

/// One row of the final panel: a (pair, calendar day) with the ownership
/// state forward-filled from the most recent filing, plus that day's price
/// bar for the subject and — suffixed `_o` — for the owner. Wide on
/// purpose; this table exists to be thrown at a regression, and
/// regressions eat columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelRow {
    pub pair_id: u64,
    pub date: NaiveDate,

    // --- ownership state, forward-filled from the pair's filings ---
    pub kind: FilingKind,
    pub date_issue: Option<NaiveDate>,
    pub date_transaction: Option<NaiveDate>,
    pub cusip: String,
    pub company: Option<String>,
    pub cik: Option<u64>,
    pub owner: Option<String>,
    pub cik_owner: u64,
    pub shares_agg: Option<u64>,
    pub shares_sole_voting: Option<u64>,
    pub shares_shared_voting: Option<u64>,
    pub shares_sole_dispositive: Option<u64>,
    pub shares_shared_dispositive: Option<u64>,
    pub pct_owned: Option<f64>,

    // --- subject-side price bar (joined on cusip prefix, tier 1 or 2) ---
    pub cusip6: String,
    pub security_id: Option<u64>,
    pub ticker: Option<String>,
    pub industry: Option<String>,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub shares_outstanding: Option<f64>,

    // --- owner-side price bar (joined on owner CIK) ---
    pub cusip_o: String,
    pub cusip6_o: String,
    pub security_id_o: Option<u64>,
    pub ticker_o: Option<String>,
    pub industry_o: Option<String>,
    pub price_o: Option<f64>,
    pub market_cap_o: Option<f64>,
    pub volume_o: Option<f64>,
    pub shares_outstanding_o: Option<f64>,
}

// =============================================================================
// TESTS
// =============================================================================
