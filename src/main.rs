// ███████╗████████╗ █████╗ ██╗  ██╗███████╗
// ██╔════╝╚══██╔══╝██╔══██╗██║ ██╔╝██╔════╝
// ███████╗   ██║   ███████║█████╔╝ █████╗
// ╚════██║   ██║   ██╔══██║██╔═██╗ ██╔══╝
// ███████║   ██║   ██║  ██║██║  ██╗███████╗
// ╚══════╝   ╚═╝   ╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝
//
// ██╗    ██╗ █████╗ ████████╗ ██████╗██╗  ██╗
// ██║    ██║██╔══██╗╚══██╔══╝██╔════╝██║  ██║
// ██║ █╗ ██║███████║   ██║   ██║     ███████║
// ██║███╗██║██╔══██║   ██║   ██║     ██╔══██║
// ╚███╔███╔╝██║  ██║   ██║   ╚██████╗██║  ██║
//  ╚══╝╚══╝ ╚═╝  ╚═╝   ╚═╝    ╚═════╝╚═╝  ╚═╝
//
// E N G I N E
//
// The most overkill beneficial-ownership extraction engine ever conceived.
// Rust + Rayon + Crossbeam + SIMD Aho-Corasick + ten shapes of CUSIP regex
// All to find out who quietly bought 5% of whom in 1997.

mod config;
mod corpus;
mod error;
mod extract;
mod identity;
mod metrics;
mod models;
mod panel;
mod tables;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::identity::IdentityMap;
use crate::metrics::MetricsCollector;
use crate::panel::PriceIndex;

fn print_banner() {
    let banner = r#"

    ╔══════════════════════════════════════════════════════════════════╗
    ║                                                                  ║
    ║     ███████╗████████╗ █████╗ ██╗  ██╗███████╗                    ║
    ║     ██╔════╝╚══██╔══╝██╔══██╗██║ ██╔╝██╔════╝                    ║
    ║     ███████╗   ██║   ███████║█████╔╝ █████╗                      ║
    ║     ╚════██║   ██║   ██╔══██║██╔═██╗ ██╔══╝                      ║
    ║     ███████║   ██║   ██║  ██║██║  ██╗███████╗                    ║
    ║     ╚══════╝   ╚═╝   ╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝                    ║
    ║                                                                  ║
    ║     ██╗    ██╗ █████╗ ████████╗ ██████╗██╗  ██╗                  ║
    ║     ██║    ██║██╔══██╗╚══██╔══╝██╔════╝██║  ██║                  ║
    ║     ██║ █╗ ██║███████║   ██║   ██║     ███████║                  ║
    ║     ██║███╗██║██╔══██║   ██║   ██║     ██╔══██║                  ║
    ║     ╚███╔███╔╝██║  ██║   ██║   ╚██████╗██║  ██║                  ║
    ║      ╚══╝╚══╝ ╚═╝  ╚═╝   ╚═╝    ╚═════╝╚═╝  ╚═╝                  ║
    ║                                                                  ║
    ║        ⚡ BENEFICIAL OWNERSHIP EXTRACTION ENGINE ⚡               ║
    ║                                                                  ║
    ║   Sources:  SEC 13D | SEC 13G | Daily price series               ║
    ║   Parsing:  SIMD Aho-Corasick + the ten shapes of CUSIP          ║
    ║   Identity: CUSIP6 → CIK by majority vote                        ║
    ║   Panel:    Daily forward fill, two-tier price join              ║
    ║   Pool:     Rayon work-stealing + lock-free crossbeam            ║
    ║                                                                  ║
    ║   "Thirty years of 5% stakes, one CSV at a time."                ║
    ║                                                                  ║
    ╚══════════════════════════════════════════════════════════════════╝

    "#;
    println!("{}", banner);
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .init();

    print_banner();

    info!("📈 STAKEWATCH ENGINE initializing...");

    // Load configuration
    let config = Config::from_env();
    info!(
        "✅ Configuration loaded: 13D={} 13G={} output={}",
        config.filings_13d_dir, config.filings_13g_dir, config.output_dir
    );

    if config.worker_threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .build_global()
            .context("pinning the rayon pool")?;
        info!("✅ Rayon pool pinned to {} threads", config.worker_threads);
    }

    let metrics = Arc::new(MetricsCollector::new());
    info!("✅ Metrics collector initialized (run {})", metrics.run_id());

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir))?;

    // ═══════════════════════════════════════════
    // STAGE 1: PARSE THE CORPUS
    // ═══════════════════════════════════════════
    let stage = Instant::now();
    let records = if config.reuse_filings_table && config.filings_table_path().exists() {
        info!(
            "♻️  Reusing filings table at {}",
            config.filings_table_path().display()
        );
        corpus::load_corpus_from_table(&config, &metrics)
            .context("reusing the filings table")?
    } else {
        corpus::parse_corpus(&config, &metrics).context("parsing the filing corpus")?
    };
    info!(
        records = records.len(),
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "📄 STAGE 1 complete: filings table ready"
    );

    // ═══════════════════════════════════════════
    // STAGE 2: THE IDENTITY VOTE
    // ═══════════════════════════════════════════
    let stage = Instant::now();
    let identity = IdentityMap::build(&records);
    if identity.is_empty() {
        warn!("identity map came out empty; every price bar will drop at annotation");
    }
    metrics.record_identity(identity.len() as u64, identity.votes_cast());
    tables::write_identity_table(&config.identity_table_path(), &identity.rows())
        .context("writing the identity table")?;
    info!(
        roots = identity.len(),
        votes = identity.votes_cast(),
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "🗳️  STAGE 2 complete: identity map built"
    );

    // ═══════════════════════════════════════════
    // STAGE 3: PRICE SERIES
    // ═══════════════════════════════════════════
    let stage = Instant::now();
    let bars = tables::read_price_series(Path::new(&config.price_series_path))
        .context("loading the price series")?;
    let loaded = bars.len() as u64;
    let (bars, unmapped) = identity.annotate_price_series(bars);
    let prices = PriceIndex::build(bars);
    metrics.record_price_series(loaded, unmapped, prices.duplicate_bars());
    info!(
        loaded,
        unmapped,
        duplicates = prices.duplicate_bars(),
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "💹 STAGE 3 complete: price series indexed"
    );

    // ═══════════════════════════════════════════
    // STAGE 4: OWNERSHIP EVENTS
    // ═══════════════════════════════════════════
    let stage = Instant::now();
    let records = if config.require_public_owner {
        corpus::retain_public_owner_pairs(records, &metrics)
    } else {
        records
    };
    let events = panel::derive_events(&records, &metrics);
    info!(
        events = events.len(),
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "📅 STAGE 4 complete: ownership events derived"
    );

    // ═══════════════════════════════════════════
    // STAGE 5: THE DAILY PANEL
    // ═══════════════════════════════════════════
    let stage = Instant::now();
    let rows = panel::build_panel(events, &prices, config.panel_end, &metrics);
    tables::write_panel_table(&config.panel_table_path(), &rows)
        .context("writing the panel table")?;
    info!(
        rows = rows.len(),
        path = %config.panel_table_path().display(),
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "🧮 STAGE 5 complete: daily panel written"
    );

    // ═══════════════════════════════════════════
    // STAGE 6: THE RECEIPTS
    // ═══════════════════════════════════════════
    match serde_json::to_string_pretty(&metrics.snapshot()) {
        Ok(json) => info!("📊 Final run metrics:\n{}", json),
        Err(e) => error!("📊 Metrics snapshot refused to serialize: {}", e),
    }

    info!("💀 STAKEWATCH ENGINE: OFFLINE");
    Ok(())
}
