// =============================================================================
// corpus.rs — THE ARCHIVE CRAWL
// =============================================================================
//
// Thirty years of 13D/13G filings sit in two directory trees, one per form,
// named `<year>_<month>/<cik>_<date>_<accession>.txt` by the mirror that
// downloaded them. This module finds every file, fans the parsing across a
// rayon pool (documents are stateless and gloriously independent), and
// streams the outcomes through a bounded crossbeam channel into the single
// filings-table sink.
//
// Order discipline: the walk is sorted, the pool is not, so the collected
// records get re-sorted by path before anyone downstream sees them. The
// identity vote's tie-breaks depend on corpus order being the same every
// run, and "whatever order the scheduler felt like" is not a tie-break.
// =============================================================================

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::extract::document;
use crate::extract::parser::{self, ParseTuning};
use crate::metrics::MetricsCollector;
use crate::models::{FilingKind, FilingPathMeta, FilingRecord};
use crate::tables::{self, FilingTableSink, ParseOutcome};

/// Walk both form directories and return every regular file, sorted within
/// each form. A missing corpus directory is a real failure — an empty one
/// is merely a quiet year.
pub fn discover(config: &Config) -> EngineResult<Vec<(PathBuf, FilingKind)>> {
    let corpora = [
        (&config.filings_13d_dir, FilingKind::D13),
        (&config.filings_13g_dir, FilingKind::G13),
    ];

    let mut jobs = Vec::new();
    for (dir, kind) in corpora {
        let root = Path::new(dir);
        if !root.is_dir() {
            return Err(EngineError::MissingInput(dir.clone()));
        }
        let mut paths = Vec::new();
        walk(root, &mut paths)?;
        paths.sort();
        info!(kind = %kind, files = paths.len(), dir = %dir, "corpus directory walked");
        jobs.extend(paths.into_iter().map(|path| (path, kind)));
    }
    Ok(jobs)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> EngineResult<()> {
    let entries =
        fs::read_dir(dir).map_err(|e| EngineError::io(dir.display().to_string(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| EngineError::io(dir.display().to_string(), e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| EngineError::io(entry.path().display().to_string(), e))?;
        if file_type.is_dir() {
            walk(&entry.path(), out)?;
        } else if file_type.is_file() {
            out.push(entry.path());
        }
    }
    Ok(())
}

/// Parse the whole corpus: rayon workers → bounded channel → filings sink.
/// Returns the collection-ready records (self-filings already dropped by
/// the sink, re-sorted by path for run-to-run determinism). The filings
/// table lands on disk as a side effect.
pub fn parse_corpus(
    config: &Config,
    metrics: &Arc<MetricsCollector>,
) -> EngineResult<Vec<FilingRecord>> {
    let jobs = discover(config)?;
    metrics.add_files_discovered(jobs.len() as u64);
    info!(files = jobs.len(), "corpus discovered, dispatching parse pool");

    let tuning = ParseTuning {
        scan_window: config.scan_window,
        context_radius: config.context_radius,
        text_node_budget: config.text_node_budget,
    };

    let (sender, receiver) =
        crossbeam_channel::bounded::<ParseOutcome>(config.channel_capacity);
    let (sink, _stats) = FilingTableSink::new(
        config.filings_table_path(),
        receiver,
        Arc::clone(metrics),
    );
    let sink_handle = std::thread::spawn(move || sink.run());

    jobs.par_iter().for_each_with(sender, |tx, (path, kind)| {
        let outcome = parse_one(path, *kind, &tuning);
        // Send only fails if the sink hung up early; the join below
        // surfaces whatever killed it.
        let _ = tx.send(outcome);
    });

    let mut records = match sink_handle.join() {
        Ok(result) => result?,
        Err(_) => {
            return Err(EngineError::io(
                "filings sink",
                std::io::Error::other("sink thread panicked"),
            ))
        }
    };
    records.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    Ok(records)
}

/// The reuse path: a previous run already paid the parsing bill, so load
/// its filings table and apply the same collection rules the sink applies
/// (self-filing drop, path sort).
pub fn load_corpus_from_table(
    config: &Config,
    metrics: &MetricsCollector,
) -> EngineResult<Vec<FilingRecord>> {
    let mut records = tables::read_filings_table(&config.filings_table_path())?;
    records.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    let before = records.len();
    records.retain(|record| {
        if record.is_self_filing() {
            metrics.increment_self_filing();
            false
        } else {
            true
        }
    });
    info!(
        loaded = before,
        collected = records.len(),
        "filings table reused"
    );
    Ok(records)
}

fn parse_one(path: &Path, kind: FilingKind, tuning: &ParseTuning) -> ParseOutcome {
    let path_text = path.to_string_lossy().into_owned();
    let meta = FilingPathMeta::parse(&path_text);
    match &meta {
        Some(meta) => debug!(
            kind = %kind,
            folder_year = meta.year,
            folder_month = meta.month,
            cik = meta.cik,
            filed = %meta.filing_date,
            accession = %meta.accession,
            "parsing filing"
        ),
        None => debug!(kind = %kind, path = %path_text, "parsing filing with unconventional name"),
    }

    let doc = document::read(path, tuning.text_node_budget);
    let unreadable = doc.is_unreadable();
    let was_html = doc.was_html();
    let record = parser::parse_document(&doc, path_text, kind, tuning);

    ParseOutcome {
        record,
        was_html,
        unreadable,
        malformed_path: meta.is_none(),
    }
}

/// Keep only records whose owner is itself a filing subject somewhere in
/// the corpus — publicly traded parents, the ones an owner-side price join
/// can ever match. The subject roster is taken from the unfiltered
/// collection, so an owner qualifies even when its own filings carry no
/// usable CUSIP.
pub fn retain_public_owner_pairs(
    records: Vec<FilingRecord>,
    metrics: &MetricsCollector,
) -> Vec<FilingRecord> {
    let subjects: HashSet<u64> = records.iter().filter_map(|r| r.cik).collect();
    let before = records.len();

    let kept: Vec<FilingRecord> = records
        .into_iter()
        .filter(|record| {
            record
                .cik_owner
                .map(|owner| subjects.contains(&owner))
                .unwrap_or(false)
        })
        .collect();

    let dropped = (before - kept.len()) as u64;
    metrics.add_public_filter_dropped(dropped);
    info!(
        kept = kept.len(),
        dropped,
        subjects = subjects.len(),
        "public-owner filter applied"
    );
    kept
}

// =============================================================================
// TESTS
// =============================================================================
