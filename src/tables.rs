// =============================================================================
// tables.rs — THE CSV LOADING DOCK
// =============================================================================
//
// Every table the engine reads or writes passes through here. The star of
// the module is the filings-table sink: the single consumer at the end of
// the parse pipeline.
//
// Architecture:
// 1. Workers parse documents and push outcomes into the crossbeam channel
// 2. The sink thread drains the channel until every producer hangs up
// 3. Each record is appended to the filings CSV (serde does the heavy
//    lifting) and kept in memory for the downstream stages
// 4. Self-filings are written to the table but dropped from the in-memory
//    collection, so the table stays a faithful extraction log while the
//    pipeline never sees a company owning itself
//
// One writer, many readers. CSV because every downstream consumer of this
// data is a stats package, and stats packages eat CSV before they eat
// anything else.
// =============================================================================

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::{debug, error, info};

use crate::error::{EngineError, EngineResult};
use crate::identity::IdentityRow;
use crate::metrics::MetricsCollector;
use crate::models::{FilingRecord, PanelRow, PriceBar};

/// What one parse worker hands the sink: the record, plus the document
/// flags only the reader could see and the sink turns into metrics.
pub struct ParseOutcome {
    pub record: FilingRecord,
    pub was_html: bool,
    pub unreadable: bool,
    pub malformed_path: bool,
}

/// Sink statistics for metrics.
pub struct SinkStats {
    pub records_written: portable_atomic::AtomicU64,
    pub records_collected: portable_atomic::AtomicU64,
    pub self_filings_dropped: portable_atomic::AtomicU64,
    pub write_errors: portable_atomic::AtomicU64,
}

impl SinkStats {
    pub fn new() -> Self {
        Self {
            records_written: portable_atomic::AtomicU64::new(0),
            records_collected: portable_atomic::AtomicU64::new(0),
            self_filings_dropped: portable_atomic::AtomicU64::new(0),
            write_errors: portable_atomic::AtomicU64::new(0),
        }
    }
}

/// A serializable snapshot of sink stats.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SinkSnapshot {
    pub records_written: u64,
    pub records_collected: u64,
    pub self_filings_dropped: u64,
    pub write_errors: u64,
}

/// The filings-table sink. Consumes parse outcomes from the crossbeam
/// channel and appends them to the filings CSV with the patience of a
/// clerk who has seen every possible way a form can be filled in wrong.
pub struct FilingTableSink {
    path: PathBuf,
    receiver: Receiver<ParseOutcome>,
    metrics: Arc<MetricsCollector>,
    stats: Arc<SinkStats>,
}

impl FilingTableSink {
    /// Create a new sink.
    ///
    /// # Arguments
    /// * `path` - Where the filings table gets written
    /// * `receiver` - The receiving end of the crossbeam channel
    /// * `metrics` - The run-wide collector; the sink is its single writer
    ///   for all per-record counters
    pub fn new(
        path: PathBuf,
        receiver: Receiver<ParseOutcome>,
        metrics: Arc<MetricsCollector>,
    ) -> (Self, Arc<SinkStats>) {
        let stats = Arc::new(SinkStats::new());
        let stats_clone = Arc::clone(&stats);
        (
            Self {
                path,
                receiver,
                metrics,
                stats,
            },
            stats_clone,
        )
    }

    /// Run the sink loop until the channel disconnects (every worker done),
    /// then flush and return the in-memory collection.
    ///
    /// Per outcome:
    /// 1. Metrics: parsed/unreadable/html/malformed-path plus the per-field
    ///    sentinel counters
    /// 2. Append the record to the CSV (a row that won't serialize is
    ///    logged and counted, never fatal — the in-memory copy survives)
    /// 3. Collect it, unless it's a self-filing
    pub fn run(self) -> EngineResult<Vec<FilingRecord>> {
        use portable_atomic::Ordering;

        info!(table = %self.path.display(), "filings sink starting");
        let file = File::create(&self.path)
            .map_err(|e| EngineError::io(self.path.display().to_string(), e))?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        let mut collected: Vec<FilingRecord> = Vec::new();

        for outcome in self.receiver.iter() {
            self.metrics.increment_parsed();
            if outcome.unreadable {
                self.metrics.increment_unreadable();
            }
            if outcome.was_html {
                self.metrics.increment_html();
            }
            if outcome.malformed_path {
                self.metrics.increment_malformed_path();
            }
            self.metrics.record_field_sentinels(&outcome.record);

            match writer.serialize(&outcome.record) {
                Ok(()) => {
                    self.stats.records_written.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    error!(
                        error = %e,
                        path = %outcome.record.file_path,
                        "failed to append filings row"
                    );
                    self.stats.write_errors.fetch_add(1, Ordering::Relaxed);
                }
            }

            if outcome.record.is_self_filing() {
                self.metrics.increment_self_filing();
                self.stats
                    .self_filings_dropped
                    .fetch_add(1, Ordering::Relaxed);
                debug!(
                    path = %outcome.record.file_path,
                    cik = ?outcome.record.cik,
                    "self-filing logged to table, dropped from collection"
                );
                continue;
            }

            self.stats.records_collected.fetch_add(1, Ordering::Relaxed);
            collected.push(outcome.record);
        }

        writer
            .flush()
            .map_err(|e| EngineError::io(self.path.display().to_string(), e))?;

        let snap = Self::snapshot(&self.stats);
        info!(
            written = snap.records_written,
            collected = collected.len(),
            self_filings = snap.self_filings_dropped,
            write_errors = snap.write_errors,
            "filings sink finished"
        );
        Ok(collected)
    }

    /// Get a snapshot of sink statistics.
    pub fn snapshot(stats: &SinkStats) -> SinkSnapshot {
        use portable_atomic::Ordering;
        SinkSnapshot {
            records_written: stats.records_written.load(Ordering::Relaxed),
            records_collected: stats.records_collected.load(Ordering::Relaxed),
            self_filings_dropped: stats.self_filings_dropped.load(Ordering::Relaxed),
            write_errors: stats.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Read a filings table back, e.g. in reuse mode where a previous run
/// already paid the parsing bill. Sentinels round-trip: an empty cell
/// deserializes to `None`, never to zero.
pub fn read_filings_table(path: &Path) -> EngineResult<Vec<FilingRecord>> {
    let table_path = path.display().to_string();
    if !path.exists() {
        return Err(EngineError::MissingInput(table_path));
    }
    let file = File::open(path).map_err(|e| EngineError::io(&table_path, e))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: FilingRecord = row.map_err(|e| EngineError::csv(&table_path, e))?;
        records.push(record);
    }
    info!(rows = records.len(), table = %table_path, "filings table loaded");
    Ok(records)
}

/// Write the resolved identity crosswalk. Two columns, sorted by root,
/// diffable across runs.
pub fn write_identity_table(path: &Path, rows: &[IdentityRow]) -> EngineResult<()> {
    let table_path = path.display().to_string();
    let file = File::create(path).map_err(|e| EngineError::io(&table_path, e))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    for row in rows {
        writer.serialize(row).map_err(|e| EngineError::csv(&table_path, e))?;
    }
    writer.flush().map_err(|e| EngineError::io(&table_path, e))?;
    info!(rows = rows.len(), table = %table_path, "identity table written");
    Ok(())
}

/// Load the external daily price/identifier series. Expects our canonical
/// header (`date,cusip,cusip6,cik,security_id,ticker,industry,price,
/// market_cap,volume,shares_outstanding`); whoever exports from the vendor
/// owns the column mapping. The `cik` column is usually empty on disk and
/// gets stamped by the identity map later.
pub fn read_price_series(path: &Path) -> EngineResult<Vec<PriceBar>> {
    let table_path = path.display().to_string();
    if !path.exists() {
        return Err(EngineError::MissingInput(table_path));
    }
    let file = File::open(path).map_err(|e| EngineError::io(&table_path, e))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let bar: PriceBar = row.map_err(|e| EngineError::csv(&table_path, e))?;
        bars.push(bar);
    }
    info!(bars = bars.len(), table = %table_path, "price series loaded");
    Ok(bars)
}

/// Write the final panel. The rows arrive already sorted by (pair_id, date);
/// this function just moves them onto disk.
pub fn write_panel_table(path: &Path, rows: &[PanelRow]) -> EngineResult<()> {
    let table_path = path.display().to_string();
    let file = File::create(path).map_err(|e| EngineError::io(&table_path, e))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    for row in rows {
        writer.serialize(row).map_err(|e| EngineError::csv(&table_path, e))?;
    }
    writer.flush().map_err(|e| EngineError::io(&table_path, e))?;
    info!(rows = rows.len(), table = %table_path, "panel table written");
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
