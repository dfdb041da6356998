// =============================================================================
// panel.rs — EVERY DAY IS OWNERSHIP DAY
// =============================================================================
//
// Filings are sparse: an owner tells the world about a stake maybe twice a
// year. Regressions are dense: they want a row for every calendar day. This
// module bridges the two in the classic way:
//
//   1. EXPANSION — per (subject CUSIP, owner CIK) pair, lay out one draft
//      row per calendar day from the pair's first event to the panel end,
//      with the filed attributes parked on their event dates.
//   2. FORWARD FILL — one ordered pass per pair, each attribute column
//      carrying its most recent non-None value. Filling twice changes
//      nothing; the pass is a fixed point.
//   3. PRICE JOIN — each surviving day picks up the subject's price bar
//      (full 8-char CUSIP first; the 6-char issuer root only for pairs the
//      8-char key never matches anywhere) and the owner's bar via its
//      annotated CIK. A day missing either bar is dropped and counted,
//      not mourned.
//
// Pairs are embarrassingly independent, so rayon chews through them the
// same way the parse pool chews through filings.
// =============================================================================

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::info;

use crate::metrics::MetricsCollector;
use crate::models::{FilingKind, FilingRecord, OwnershipEvent, PanelRow, PriceBar};

// -----------------------------------------------------------------------------
// Price index
// -----------------------------------------------------------------------------

/// The external daily series, indexed three ways for the three joins the
/// panel performs: by full 8-char CUSIP, by 6-char issuer root, and by
/// annotated CIK for the owner side. The series is assumed de-duplicated
/// by (date, CUSIP); when it is not, the first bar wins and the rest are
/// counted.
pub struct PriceIndex {
    bars: Vec<PriceBar>,
    by_cusip8: HashMap<String, HashMap<NaiveDate, usize>>,
    by_root6: HashMap<String, HashMap<NaiveDate, usize>>,
    by_cik: HashMap<u64, HashMap<NaiveDate, usize>>,
    duplicate_bars: u64,
}

impl PriceIndex {
    pub fn build(bars: Vec<PriceBar>) -> Self {
        let mut by_cusip8: HashMap<String, HashMap<NaiveDate, usize>> = HashMap::new();
        let mut by_root6: HashMap<String, HashMap<NaiveDate, usize>> = HashMap::new();
        let mut by_cik: HashMap<u64, HashMap<NaiveDate, usize>> = HashMap::new();
        let mut duplicate_bars = 0u64;

        for (i, bar) in bars.iter().enumerate() {
            match by_cusip8.entry(bar.cusip.clone()).or_default().entry(bar.date) {
                Entry::Occupied(_) => {
                    duplicate_bars += 1;
                    continue;
                }
                Entry::Vacant(slot) => {
                    slot.insert(i);
                }
            }
            // Root and CIK collisions are not duplicates: multiple issues of
            // one issuer legitimately share both keys. First bar wins.
            by_root6.entry(bar.cusip6.clone()).or_default().entry(bar.date).or_insert(i);
            if let Some(cik) = bar.cik {
                by_cik.entry(cik).or_default().entry(bar.date).or_insert(i);
            }
        }

        Self {
            bars,
            by_cusip8,
            by_root6,
            by_cik,
            duplicate_bars,
        }
    }

    pub fn duplicate_bars(&self) -> u64 {
        self.duplicate_bars
    }

    fn cusip8(&self, date: NaiveDate, prefix: &str) -> Option<&PriceBar> {
        self.by_cusip8
            .get(prefix)?
            .get(&date)
            .and_then(|&i| self.bars.get(i))
    }

    fn root6(&self, date: NaiveDate, root: &str) -> Option<&PriceBar> {
        self.by_root6
            .get(root)?
            .get(&date)
            .and_then(|&i| self.bars.get(i))
    }

    fn owner(&self, date: NaiveDate, cik: u64) -> Option<&PriceBar> {
        self.by_cik
            .get(&cik)?
            .get(&date)
            .and_then(|&i| self.bars.get(i))
    }
}

// -----------------------------------------------------------------------------
// Event derivation
// -----------------------------------------------------------------------------

/// Turn parsed records into panel events. Records without a CUSIP, an owner
/// CIK, or a usable date stay in the filings table but can't anchor a
/// timeline, so they fall out here.
pub fn derive_events(records: &[FilingRecord], metrics: &MetricsCollector) -> Vec<OwnershipEvent> {
    let events: Vec<OwnershipEvent> = records
        .iter()
        .filter_map(OwnershipEvent::from_record)
        .collect();
    metrics.add_events(events.len() as u64);
    info!(
        records = records.len(),
        events = events.len(),
        "ownership events derived"
    );
    events
}

// -----------------------------------------------------------------------------
// Expansion and forward fill
// -----------------------------------------------------------------------------

/// The forward-fillable slice of an event. Every field is optional here:
/// a draft calendar day starts all-None and the fill pass paints in the
/// most recent filed value, column by column. A filing that reports shares
/// but not a percentage must not erase the percentage from the filing
/// before it.
#[derive(Debug, Clone, Default, PartialEq)]
struct OwnershipState {
    kind: Option<FilingKind>,
    date_issue: Option<NaiveDate>,
    date_transaction: Option<NaiveDate>,
    company: Option<String>,
    cik: Option<u64>,
    owner: Option<String>,
    shares_agg: Option<u64>,
    shares_sole_voting: Option<u64>,
    shares_shared_voting: Option<u64>,
    shares_sole_dispositive: Option<u64>,
    shares_shared_dispositive: Option<u64>,
    pct_owned: Option<f64>,
}

impl OwnershipState {
    fn from_event(event: &OwnershipEvent) -> Self {
        Self {
            kind: Some(event.kind),
            date_issue: event.date_issue,
            date_transaction: event.date_transaction,
            company: event.company.clone(),
            cik: event.cik,
            owner: event.owner.clone(),
            shares_agg: event.shares_agg,
            shares_sole_voting: event.shares_sole_voting,
            shares_shared_voting: event.shares_shared_voting,
            shares_sole_dispositive: event.shares_sole_dispositive,
            shares_shared_dispositive: event.shares_shared_dispositive,
            pct_owned: event.pct_owned,
        }
    }
}

/// Phase 1: one draft row per calendar day from the pair's first event
/// through `panel_end` inclusive. Expects `events` sorted by date with
/// same-day refilings already collapsed.
fn expand_pair(
    events: &[OwnershipEvent],
    panel_end: NaiveDate,
) -> Vec<(NaiveDate, OwnershipState)> {
    let Some(first) = events.first() else {
        return Vec::new();
    };

    let mut next = events.iter().peekable();
    let mut rows = Vec::new();
    for date in first.date.iter_days().take_while(|d| *d <= panel_end) {
        let state = match next.next_if(|event| event.date == date) {
            Some(event) => OwnershipState::from_event(event),
            None => OwnershipState::default(),
        };
        rows.push((date, state));
    }
    rows
}

/// Phase 2: the ordered pass. One "last seen" slot per column, carried
/// forward into every None cell. Cells that already hold a value update
/// the slot instead, which is what makes a second pass a no-op.
fn forward_fill(rows: &mut [(NaiveDate, OwnershipState)]) {
    let mut last = OwnershipState::default();
    for (_, state) in rows.iter_mut() {
        carry(&mut last.kind, &mut state.kind);
        carry(&mut last.date_issue, &mut state.date_issue);
        carry(&mut last.date_transaction, &mut state.date_transaction);
        carry(&mut last.company, &mut state.company);
        carry(&mut last.cik, &mut state.cik);
        carry(&mut last.owner, &mut state.owner);
        carry(&mut last.shares_agg, &mut state.shares_agg);
        carry(&mut last.shares_sole_voting, &mut state.shares_sole_voting);
        carry(&mut last.shares_shared_voting, &mut state.shares_shared_voting);
        carry(&mut last.shares_sole_dispositive, &mut state.shares_sole_dispositive);
        carry(&mut last.shares_shared_dispositive, &mut state.shares_shared_dispositive);
        carry(&mut last.pct_owned, &mut state.pct_owned);
    }
}

fn carry<T: Clone>(slot: &mut Option<T>, cell: &mut Option<T>) {
    match cell {
        Some(value) => *slot = Some(value.clone()),
        None => *cell = slot.clone(),
    }
}

/// An owner sometimes files twice about the same stake on the same day
/// (an amendment chasing its original out the door). One event per
/// (pair, day): the one with the latest issue date wins, input order
/// breaking ties in favor of the later record.
fn collapse_same_day(events: Vec<OwnershipEvent>) -> (Vec<OwnershipEvent>, u64) {
    let mut collapsed: Vec<OwnershipEvent> = Vec::with_capacity(events.len());
    let mut dropped = 0u64;
    for event in events {
        match collapsed.iter_mut().find(|e| e.date == event.date) {
            Some(existing) => {
                dropped += 1;
                if event.date_issue >= existing.date_issue {
                    *existing = event;
                }
            }
            None => collapsed.push(event),
        }
    }
    collapsed.sort_by_key(|e| e.date);
    (collapsed, dropped)
}

// -----------------------------------------------------------------------------
// Per-pair assembly
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum SubjectTier {
    Cusip8,
    Root6,
    Unmatched,
}

struct PairPanel {
    rows: Vec<PanelRow>,
    tier: SubjectTier,
    deduplicated: u64,
    dropped_no_subject: u64,
    dropped_no_owner: u64,
}

fn build_pair(events: Vec<OwnershipEvent>, panel_end: NaiveDate, prices: &PriceIndex) -> PairPanel {
    let (events, deduplicated) = collapse_same_day(events);
    let mut panel = PairPanel {
        rows: Vec::new(),
        tier: SubjectTier::Unmatched,
        deduplicated,
        dropped_no_subject: 0,
        dropped_no_owner: 0,
    };
    let Some(first) = events.first().cloned() else {
        return panel;
    };

    let mut rows = expand_pair(&events, panel_end);
    forward_fill(&mut rows);

    // Subject join. The 6-char root is consulted only when the 8-char key
    // matches nowhere on the pair's entire timeline; a pair that matched
    // even one day on the full CUSIP never mixes in root-level bars.
    let mut subject_bars: Vec<Option<&PriceBar>> = rows
        .iter()
        .map(|(date, _)| prices.cusip8(*date, first.cusip_prefix8()))
        .collect();
    if subject_bars.iter().any(Option::is_some) {
        panel.tier = SubjectTier::Cusip8;
    } else {
        subject_bars = rows
            .iter()
            .map(|(date, _)| prices.root6(*date, first.cusip6()))
            .collect();
        if subject_bars.iter().any(Option::is_some) {
            panel.tier = SubjectTier::Root6;
        }
    }

    for ((date, state), subject_bar) in rows.into_iter().zip(subject_bars) {
        let Some(subject) = subject_bar else {
            panel.dropped_no_subject += 1;
            continue;
        };
        let Some(owner_bar) = prices.owner(date, first.cik_owner) else {
            panel.dropped_no_owner += 1;
            continue;
        };
        panel.rows.push(make_row(&first, date, state, subject, owner_bar));
    }
    panel
}

fn make_row(
    first: &OwnershipEvent,
    date: NaiveDate,
    state: OwnershipState,
    subject: &PriceBar,
    owner_bar: &PriceBar,
) -> PanelRow {
    PanelRow {
        pair_id: first.pair_id,
        date,
        kind: state.kind.unwrap_or(first.kind),
        date_issue: state.date_issue,
        date_transaction: state.date_transaction,
        cusip: first.cusip.clone(),
        company: state.company,
        cik: state.cik,
        owner: state.owner,
        cik_owner: first.cik_owner,
        shares_agg: state.shares_agg,
        shares_sole_voting: state.shares_sole_voting,
        shares_shared_voting: state.shares_shared_voting,
        shares_sole_dispositive: state.shares_sole_dispositive,
        shares_shared_dispositive: state.shares_shared_dispositive,
        pct_owned: state.pct_owned,
        cusip6: subject.cusip6.clone(),
        security_id: subject.security_id,
        ticker: subject.ticker.clone(),
        industry: subject.industry.clone(),
        price: subject.price,
        market_cap: subject.market_cap,
        volume: subject.volume,
        shares_outstanding: subject.shares_outstanding,
        cusip_o: owner_bar.cusip.clone(),
        cusip6_o: owner_bar.cusip6.clone(),
        security_id_o: owner_bar.security_id,
        ticker_o: owner_bar.ticker.clone(),
        industry_o: owner_bar.industry.clone(),
        price_o: owner_bar.price,
        market_cap_o: owner_bar.market_cap,
        volume_o: owner_bar.volume,
        shares_outstanding_o: owner_bar.shares_outstanding,
    }
}

// -----------------------------------------------------------------------------
// The whole panel
// -----------------------------------------------------------------------------

/// Group events by pair, build every pair's timeline in parallel, and glue
/// the results back together sorted by (pair, date).
pub fn build_panel(
    events: Vec<OwnershipEvent>,
    prices: &PriceIndex,
    panel_end: NaiveDate,
    metrics: &MetricsCollector,
) -> Vec<PanelRow> {
    let mut groups: HashMap<u64, Vec<OwnershipEvent>> = HashMap::new();
    for event in events {
        groups.entry(event.pair_id).or_default().push(event);
    }
    let pairs_total = groups.len() as u64;
    info!(pairs = pairs_total, panel_end = %panel_end, "building daily ownership panel");

    let outcomes: Vec<PairPanel> = groups
        .into_par_iter()
        .map(|(_, pair_events)| build_pair(pair_events, panel_end, prices))
        .collect();

    let mut rows = Vec::new();
    let (mut cusip8_pairs, mut root6_pairs) = (0u64, 0u64);
    let (mut deduplicated, mut no_subject, mut no_owner) = (0u64, 0u64, 0u64);
    for outcome in outcomes {
        match outcome.tier {
            SubjectTier::Cusip8 => cusip8_pairs += 1,
            SubjectTier::Root6 => root6_pairs += 1,
            SubjectTier::Unmatched => {}
        }
        deduplicated += outcome.deduplicated;
        no_subject += outcome.dropped_no_subject;
        no_owner += outcome.dropped_no_owner;
        rows.extend(outcome.rows);
    }
    rows.sort_by(|a, b| (a.pair_id, a.date).cmp(&(b.pair_id, b.date)));

    metrics.add_events_deduplicated(deduplicated);
    metrics.record_pairs(pairs_total, cusip8_pairs, root6_pairs);
    metrics.add_panel_rows(rows.len() as u64);
    metrics.add_dropped_no_subject_bar(no_subject);
    metrics.add_dropped_no_owner_bar(no_owner);
    info!(
        rows = rows.len(),
        cusip8_pairs,
        root6_pairs,
        unmatched_pairs = pairs_total - cusip8_pairs - root6_pairs,
        dropped_no_subject_bar = no_subject,
        dropped_no_owner_bar = no_owner,
        "panel assembled"
    );
    rows
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(
        cusip: &str,
        cik_owner: u64,
        date: NaiveDate,
        shares: Option<u64>,
        pct: Option<f64>,
    ) -> OwnershipEvent {
        OwnershipEvent {
            pair_id: OwnershipEvent::pair_id(cusip, cik_owner),
            date,
            cusip: cusip.to_string(),
            cik_owner,
            kind: FilingKind::D13,
            date_issue: Some(date),
            date_transaction: Some(date),
            company: Some("MICROSOFT CORP".to_string()),
            cik: Some(789019),
            owner: Some("CONTOSO CAPITAL LP".to_string()),
            shares_agg: shares,
            shares_sole_voting: None,
            shares_shared_voting: None,
            shares_sole_dispositive: None,
            shares_shared_dispositive: None,
            pct_owned: pct,
        }
    }

    fn bar(date: NaiveDate, cusip: &str, cik: Option<u64>) -> PriceBar {
        PriceBar {
            date,
            cusip: cusip.to_string(),
            cusip6: cusip[..6].to_string(),
            cik,
            security_id: Some(77),
            ticker: Some("MSFT".to_string()),
            industry: Some("7372".to_string()),
            price: Some(27.5),
            market_cap: Some(280e9),
            volume: Some(6.2e7),
            shares_outstanding: Some(1.02e10),
        }
    }

    /// Bars for subject "59491810" and owner cik 999 on every day of the
    /// given range, so join misses in a test mean what the test says they
    /// mean.
    fn full_coverage(from: NaiveDate, to: NaiveDate) -> PriceIndex {
        let mut bars = Vec::new();
        for date in from.iter_days().take_while(|d| *d <= to) {
            bars.push(bar(date, "59491810", None));
            bars.push(bar(date, "88878800", Some(999)));
        }
        PriceIndex::build(bars)
    }

    #[test]
    fn test_forward_fill_is_a_fixed_point() {
        let events = vec![
            event("594918104", 999, ymd(2006, 4, 1), Some(100), Some(5.0)),
            event("594918104", 999, ymd(2006, 4, 4), Some(200), None),
        ];
        let mut rows = expand_pair(&events, ymd(2006, 4, 8));
        forward_fill(&mut rows);
        let once = rows.clone();
        forward_fill(&mut rows);
        assert_eq!(rows, once);
    }

    #[test]
    fn test_fill_carries_each_column_independently() {
        // The second filing reports shares but stays mum on percentage;
        // the percentage from the first filing must survive it.
        let events = vec![
            event("594918104", 999, ymd(2006, 4, 1), Some(100), Some(5.0)),
            event("594918104", 999, ymd(2006, 4, 3), Some(200), None),
        ];
        let mut rows = expand_pair(&events, ymd(2006, 4, 4));
        forward_fill(&mut rows);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].1.shares_agg, Some(100));
        assert_eq!(rows[2].1.shares_agg, Some(200));
        assert_eq!(rows[2].1.pct_owned, Some(5.0));
        assert_eq!(rows[3].1.shares_agg, Some(200));
        assert_eq!(rows[3].1.pct_owned, Some(5.0));
    }

    #[test]
    fn test_panel_starts_exactly_at_first_event_date() {
        let prices = full_coverage(ymd(2006, 3, 28), ymd(2006, 4, 5));
        let events = vec![event("594918104", 999, ymd(2006, 4, 1), Some(100), Some(5.0))];
        let metrics = MetricsCollector::new();

        let rows = build_panel(events, &prices, ymd(2006, 4, 5), &metrics);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].date, ymd(2006, 4, 1));
        assert!(rows.iter().all(|r| r.date >= ymd(2006, 4, 1)));
        assert_eq!(rows[4].date, ymd(2006, 4, 5));
    }

    #[test]
    fn test_cusip8_match_disables_root6_fallback() {
        // Full-CUSIP bar on day one only; a sibling issue shares the root
        // on every day. The pair matched on the full CUSIP once, so the
        // later days drop instead of borrowing the sibling's bars.
        let mut bars = vec![bar(ymd(2006, 4, 1), "59491810", None)];
        for day in 1..=3 {
            bars.push(bar(ymd(2006, 4, day), "59491820", None));
            bars.push(bar(ymd(2006, 4, day), "88878800", Some(999)));
        }
        let prices = PriceIndex::build(bars);
        let events = vec![event("594918104", 999, ymd(2006, 4, 1), Some(100), Some(5.0))];
        let metrics = MetricsCollector::new();

        let rows = build_panel(events, &prices, ymd(2006, 4, 3), &metrics);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, ymd(2006, 4, 1));
        let snap = metrics.snapshot();
        assert_eq!(snap.pairs_tier1, 1);
        assert_eq!(snap.pairs_tier2, 0);
        assert_eq!(snap.panel_dropped_no_subject_bar, 2);
    }

    #[test]
    fn test_root6_fallback_when_full_cusip_never_matches() {
        // Only a sibling issue trades; the filed 9-char CUSIP matches no
        // 8-char bar anywhere, so the whole pair falls back to the root.
        let mut bars = Vec::new();
        for day in 1..=3 {
            bars.push(bar(ymd(2006, 4, day), "59491820", None));
            bars.push(bar(ymd(2006, 4, day), "88878800", Some(999)));
        }
        let prices = PriceIndex::build(bars);
        let events = vec![event("594918104", 999, ymd(2006, 4, 1), Some(100), Some(5.0))];
        let metrics = MetricsCollector::new();

        let rows = build_panel(events, &prices, ymd(2006, 4, 3), &metrics);

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.cusip6 == "594918"));
        let snap = metrics.snapshot();
        assert_eq!(snap.pairs_tier1, 0);
        assert_eq!(snap.pairs_tier2, 1);
    }

    #[test]
    fn test_rows_need_an_owner_bar() {
        let mut bars = vec![
            bar(ymd(2006, 4, 1), "59491810", None),
            bar(ymd(2006, 4, 2), "59491810", None),
        ];
        bars.push(bar(ymd(2006, 4, 1), "88878800", Some(999)));
        let prices = PriceIndex::build(bars);
        let events = vec![event("594918104", 999, ymd(2006, 4, 1), Some(100), Some(5.0))];
        let metrics = MetricsCollector::new();

        let rows = build_panel(events, &prices, ymd(2006, 4, 2), &metrics);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, ymd(2006, 4, 1));
        assert_eq!(rows[0].price_o, Some(27.5));
        assert_eq!(rows[0].cusip_o, "88878800");
        assert_eq!(metrics.snapshot().panel_dropped_no_owner_bar, 1);
    }

    #[test]
    fn test_same_day_refilings_last_word_wins() {
        let prices = full_coverage(ymd(2006, 4, 1), ymd(2006, 4, 1));
        let date = ymd(2006, 4, 1);

        let mut stale = event("594918104", 999, date, Some(100), None);
        stale.date_issue = Some(ymd(2006, 4, 20));
        let mut amended = event("594918104", 999, date, Some(999_000), None);
        amended.date_issue = Some(ymd(2006, 4, 25));

        for ordering in [
            vec![stale.clone(), amended.clone()],
            vec![amended.clone(), stale.clone()],
        ] {
            let metrics = MetricsCollector::new();
            let rows = build_panel(ordering, &prices, date, &metrics);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].shares_agg, Some(999_000));
            assert_eq!(metrics.snapshot().events_deduplicated, 1);
        }
    }

    #[test]
    fn test_rows_ordered_by_pair_then_date() {
        let mut bars = Vec::new();
        for day in 1..=3 {
            bars.push(bar(ymd(2006, 4, day), "59491810", None));
            bars.push(bar(ymd(2006, 4, day), "03783310", None));
            bars.push(bar(ymd(2006, 4, day), "88878800", Some(999)));
        }
        let prices = PriceIndex::build(bars);
        let events = vec![
            event("594918104", 999, ymd(2006, 4, 2), Some(100), None),
            event("037833100", 999, ymd(2006, 4, 1), Some(50), None),
        ];
        let metrics = MetricsCollector::new();

        let rows = build_panel(events, &prices, ymd(2006, 4, 3), &metrics);

        assert_eq!(rows.len(), 5);
        for window in rows.windows(2) {
            assert!((window[0].pair_id, window[0].date) < (window[1].pair_id, window[1].date));
        }
    }

    #[test]
    fn test_duplicate_bars_first_wins() {
        let first = bar(ymd(2006, 4, 1), "59491810", None);
        let mut second = bar(ymd(2006, 4, 1), "59491810", None);
        second.price = Some(99.0);

        let prices = PriceIndex::build(vec![first, second]);

        assert_eq!(prices.duplicate_bars(), 1);
        let kept = prices.cusip8(ymd(2006, 4, 1), "59491810").unwrap();
        assert_eq!(kept.price, Some(27.5));
    }

    #[test]
    fn test_event_after_panel_end_contributes_nothing() {
        let prices = full_coverage(ymd(2006, 4, 1), ymd(2006, 4, 5));
        let events = vec![event("594918104", 999, ymd(2006, 4, 9), Some(100), None)];
        let metrics = MetricsCollector::new();

        let rows = build_panel(events, &prices, ymd(2006, 4, 5), &metrics);

        assert!(rows.is_empty());
        assert_eq!(metrics.snapshot().pairs_total, 1);
    }

    #[test]
    fn test_derive_events_skips_unusable_records() {
        let mut usable = FilingRecord::unreadable("a.txt".to_string(), FilingKind::D13);
        usable.cusip = Some("594918104".to_string());
        usable.cik_owner = Some(999);
        usable.date_issue = Some(ymd(2006, 4, 20));

        let no_cusip = FilingRecord::unreadable("b.txt".to_string(), FilingKind::G13);

        let metrics = MetricsCollector::new();
        let events = derive_events(&[usable, no_cusip], &metrics);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].cik_owner, 999);
        assert_eq!(metrics.snapshot().events_derived, 1);
    }
}
