// ═══════════════════════════════════════════════════════════════
// METRICS COLLECTOR - Because if you can't measure it, it didn't happen
// ═══════════════════════════════════════════════════════════════
//
// Atomic counters for every way a filing can disappoint us. Lock-free
// because the parse pool hits these from every worker at once and the
// counters must never become the contention point.
//
// Is it overkill to count nine separate flavors of "the cascade came up
// empty"? No. When the panel looks thin in 1997, the first question is
// WHICH field went missing, and this is where the answer lives. The
// snapshot gets serialized to JSON and logged at the end of the run, so
// every batch leaves a coroner's report.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use crate::models::FilingRecord;

/// The metrics snapshot - what gets serialized to JSON
#[derive(Debug, Serialize, Clone)]
pub struct MetricsSnapshot {
    pub run_id: String,

    // corpus
    pub files_discovered: u64,
    pub files_parsed: u64,
    pub files_unreadable: u64,
    pub html_documents: u64,
    pub malformed_path_names: u64,
    pub self_filings_excluded: u64,

    // per-field sentinel counts
    pub missing_cusip: u64,
    pub missing_issue_date: u64,
    pub missing_transaction_date: u64,
    pub missing_shares_agg: u64,
    pub missing_shares_sole_voting: u64,
    pub missing_shares_shared_voting: u64,
    pub missing_shares_sole_dispositive: u64,
    pub missing_shares_shared_dispositive: u64,
    pub missing_pct_owned: u64,

    // identity
    pub identity_roots: u64,
    pub identity_votes: u64,

    // price series
    pub price_bars_loaded: u64,
    pub price_bars_unmapped: u64,
    pub price_duplicate_bars: u64,

    // events and panel
    pub public_filter_dropped: u64,
    pub events_derived: u64,
    pub events_deduplicated: u64,
    pub pairs_total: u64,
    pub pairs_tier1: u64,
    pub pairs_tier2: u64,
    pub panel_rows: u64,
    pub panel_dropped_no_subject_bar: u64,
    pub panel_dropped_no_owner_bar: u64,

    pub uptime_seconds: u64,
    pub documents_per_second: f64,
    pub status: String,
}

/// Thread-safe atomic metrics collector
/// Every counter is atomic because mutexes are for the weak
pub struct MetricsCollector {
    run_id: Uuid,

    files_discovered: AtomicU64,
    files_parsed: AtomicU64,
    files_unreadable: AtomicU64,
    html_documents: AtomicU64,
    malformed_path_names: AtomicU64,
    self_filings_excluded: AtomicU64,

    missing_cusip: AtomicU64,
    missing_issue_date: AtomicU64,
    missing_transaction_date: AtomicU64,
    missing_shares_agg: AtomicU64,
    missing_shares_sole_voting: AtomicU64,
    missing_shares_shared_voting: AtomicU64,
    missing_shares_sole_dispositive: AtomicU64,
    missing_shares_shared_dispositive: AtomicU64,
    missing_pct_owned: AtomicU64,

    identity_roots: AtomicU64,
    identity_votes: AtomicU64,

    price_bars_loaded: AtomicU64,
    price_bars_unmapped: AtomicU64,
    price_duplicate_bars: AtomicU64,

    public_filter_dropped: AtomicU64,
    events_derived: AtomicU64,
    events_deduplicated: AtomicU64,
    pairs_total: AtomicU64,
    pairs_tier1: AtomicU64,
    pairs_tier2: AtomicU64,
    panel_rows: AtomicU64,
    panel_dropped_no_subject_bar: AtomicU64,
    panel_dropped_no_owner_bar: AtomicU64,

    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            files_discovered: AtomicU64::new(0),
            files_parsed: AtomicU64::new(0),
            files_unreadable: AtomicU64::new(0),
            html_documents: AtomicU64::new(0),
            malformed_path_names: AtomicU64::new(0),
            self_filings_excluded: AtomicU64::new(0),
            missing_cusip: AtomicU64::new(0),
            missing_issue_date: AtomicU64::new(0),
            missing_transaction_date: AtomicU64::new(0),
            missing_shares_agg: AtomicU64::new(0),
            missing_shares_sole_voting: AtomicU64::new(0),
            missing_shares_shared_voting: AtomicU64::new(0),
            missing_shares_sole_dispositive: AtomicU64::new(0),
            missing_shares_shared_dispositive: AtomicU64::new(0),
            missing_pct_owned: AtomicU64::new(0),
            identity_roots: AtomicU64::new(0),
            identity_votes: AtomicU64::new(0),
            price_bars_loaded: AtomicU64::new(0),
            price_bars_unmapped: AtomicU64::new(0),
            price_duplicate_bars: AtomicU64::new(0),
            public_filter_dropped: AtomicU64::new(0),
            events_derived: AtomicU64::new(0),
            events_deduplicated: AtomicU64::new(0),
            pairs_total: AtomicU64::new(0),
            pairs_tier1: AtomicU64::new(0),
            pairs_tier2: AtomicU64::new(0),
            panel_rows: AtomicU64::new(0),
            panel_dropped_no_subject_bar: AtomicU64::new(0),
            panel_dropped_no_owner_bar: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn add_files_discovered(&self, n: u64) {
        self.files_discovered.fetch_add(n, Ordering::Relaxed);
    }

    pub fn increment_parsed(&self) {
        self.files_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_unreadable(&self) {
        self.files_unreadable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_html(&self) {
        self.html_documents.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_malformed_path(&self) {
        self.malformed_path_names.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_self_filing(&self) {
        self.self_filings_excluded.fetch_add(1, Ordering::Relaxed);
    }

    /// Count every field the cascades failed to find on this record. Called
    /// once per record at the sink, which keeps the tally single-writer even
    /// though nothing here requires it.
    pub fn record_field_sentinels(&self, record: &FilingRecord) {
        let fields = [
            (record.cusip.is_none(), &self.missing_cusip),
            (record.date_issue.is_none(), &self.missing_issue_date),
            (
                record.date_transaction.is_none(),
                &self.missing_transaction_date,
            ),
            (record.shares_agg.is_none(), &self.missing_shares_agg),
            (
                record.shares_sole_voting.is_none(),
                &self.missing_shares_sole_voting,
            ),
            (
                record.shares_shared_voting.is_none(),
                &self.missing_shares_shared_voting,
            ),
            (
                record.shares_sole_dispositive.is_none(),
                &self.missing_shares_sole_dispositive,
            ),
            (
                record.shares_shared_dispositive.is_none(),
                &self.missing_shares_shared_dispositive,
            ),
            (record.pct_owned.is_none(), &self.missing_pct_owned),
        ];
        for (missing, counter) in fields {
            if missing {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn record_identity(&self, roots: u64, votes: u64) {
        self.identity_roots.store(roots, Ordering::Relaxed);
        self.identity_votes.store(votes, Ordering::Relaxed);
    }

    pub fn record_price_series(&self, loaded: u64, unmapped: u64, duplicates: u64) {
        self.price_bars_loaded.store(loaded, Ordering::Relaxed);
        self.price_bars_unmapped.store(unmapped, Ordering::Relaxed);
        self.price_duplicate_bars
            .store(duplicates, Ordering::Relaxed);
    }

    pub fn add_public_filter_dropped(&self, n: u64) {
        self.public_filter_dropped.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_events(&self, n: u64) {
        self.events_derived.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_events_deduplicated(&self, n: u64) {
        self.events_deduplicated.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_pairs(&self, total: u64, tier1: u64, tier2: u64) {
        self.pairs_total.store(total, Ordering::Relaxed);
        self.pairs_tier1.store(tier1, Ordering::Relaxed);
        self.pairs_tier2.store(tier2, Ordering::Relaxed);
    }

    pub fn add_panel_rows(&self, n: u64) {
        self.panel_rows.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_dropped_no_subject_bar(&self, n: u64) {
        self.panel_dropped_no_subject_bar
            .fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_dropped_no_owner_bar(&self, n: u64) {
        self.panel_dropped_no_owner_bar
            .fetch_add(n, Ordering::Relaxed);
    }

    /// Take a snapshot of all metrics (lock-free reads)
    pub fn snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        let parsed = self.files_parsed.load(Ordering::Relaxed);
        let documents_per_second = if uptime > 0 {
            parsed as f64 / uptime as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            run_id: self.run_id.to_string(),
            files_discovered: self.files_discovered.load(Ordering::Relaxed),
            files_parsed: parsed,
            files_unreadable: self.files_unreadable.load(Ordering::Relaxed),
            html_documents: self.html_documents.load(Ordering::Relaxed),
            malformed_path_names: self.malformed_path_names.load(Ordering::Relaxed),
            self_filings_excluded: self.self_filings_excluded.load(Ordering::Relaxed),
            missing_cusip: self.missing_cusip.load(Ordering::Relaxed),
            missing_issue_date: self.missing_issue_date.load(Ordering::Relaxed),
            missing_transaction_date: self.missing_transaction_date.load(Ordering::Relaxed),
            missing_shares_agg: self.missing_shares_agg.load(Ordering::Relaxed),
            missing_shares_sole_voting: self.missing_shares_sole_voting.load(Ordering::Relaxed),
            missing_shares_shared_voting: self
                .missing_shares_shared_voting
                .load(Ordering::Relaxed),
            missing_shares_sole_dispositive: self
                .missing_shares_sole_dispositive
                .load(Ordering::Relaxed),
            missing_shares_shared_dispositive: self
                .missing_shares_shared_dispositive
                .load(Ordering::Relaxed),
            missing_pct_owned: self.missing_pct_owned.load(Ordering::Relaxed),
            identity_roots: self.identity_roots.load(Ordering::Relaxed),
            identity_votes: self.identity_votes.load(Ordering::Relaxed),
            price_bars_loaded: self.price_bars_loaded.load(Ordering::Relaxed),
            price_bars_unmapped: self.price_bars_unmapped.load(Ordering::Relaxed),
            price_duplicate_bars: self.price_duplicate_bars.load(Ordering::Relaxed),
            public_filter_dropped: self.public_filter_dropped.load(Ordering::Relaxed),
            events_derived: self.events_derived.load(Ordering::Relaxed),
            events_deduplicated: self.events_deduplicated.load(Ordering::Relaxed),
            pairs_total: self.pairs_total.load(Ordering::Relaxed),
            pairs_tier1: self.pairs_tier1.load(Ordering::Relaxed),
            pairs_tier2: self.pairs_tier2.load(Ordering::Relaxed),
            panel_rows: self.panel_rows.load(Ordering::Relaxed),
            panel_dropped_no_subject_bar: self
                .panel_dropped_no_subject_bar
                .load(Ordering::Relaxed),
            panel_dropped_no_owner_bar: self.panel_dropped_no_owner_bar.load(Ordering::Relaxed),
            uptime_seconds: uptime,
            documents_per_second,
            status: "operational".to_string(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════
