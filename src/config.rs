// =============================================================================
// config.rs — THE GRAND CONFIGURATION CATHEDRAL
// =============================================================================
//
// Every system needs configuration, but not every system needs THIS MUCH
// configuration. We have knobs for the scan windows, knobs for the channel,
// knobs for which decades of filings to chew through.
//
// All values can be overridden via environment variables, because hardcoding
// configuration is how you end up re-running a six-hour batch to change one
// path.
//
// Default values have been carefully chosen through a rigorous process of
// "that is what the corpus was tuned with" and "that seems about right."
// =============================================================================

use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;

/// The Grand Configuration Struct. Every tunable parameter in the entire
/// engine lives here. If you need to change something, this is where you
/// come. Think of it as the cockpit of a combine harvester, except instead
/// of wheat you're threshing three decades of beneficial ownership filings.
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // INPUT CORPORA
    // =========================================================================

    /// Root directory of the 13D archive mirror, laid out as
    /// `<year>_<month>/<cik>_<date>_<accession>.txt`.
    pub filings_13d_dir: String,

    /// Root directory of the 13G archive mirror. Same layout, calmer filers.
    pub filings_13g_dir: String,

    /// The external daily price/identifier series, CSV with our canonical
    /// header. See tables::read_price_series for the column contract.
    pub price_series_path: String,

    /// Where the three output tables land.
    pub output_dir: String,

    // =========================================================================
    // PANEL PARAMETERS
    // =========================================================================

    /// Last calendar day the panel extends to. Every pair's timeline runs
    /// from its first event through this date, inclusive.
    /// Default: 2024-12-31.
    pub panel_end: NaiveDate,

    // =========================================================================
    // EXTRACTION PARAMETERS
    // The window sizes the anchor vocabularies were tuned with. Change them
    // only with a labeled corpus in hand and a free afternoon.
    // =========================================================================

    /// Lines scanned below a share/percentage anchor, anchor line included.
    /// Default: 20.
    pub scan_window: usize,

    /// Lines scanned on either side of a CUSIP or event-date anchor.
    /// Default: 10.
    pub context_radius: usize,

    /// HTML text nodes that get whitespace-normalized before we stop
    /// bothering. The bound exists for the occasional megabyte-sized
    /// exhibit dump pretending to be a cover page. Default: 1000.
    pub text_node_budget: usize,

    // =========================================================================
    // PIPELINE PARAMETERS
    // =========================================================================

    /// Worker threads for the parse pool and the panel fill.
    /// 0 means "let rayon count the cores."
    pub worker_threads: usize,

    /// Bounded capacity of the parse → sink channel. Backpressure, not
    /// unbounded memory, when the workers outrun the disk. Default: 10000.
    pub channel_capacity: usize,

    /// Keep only events whose owner is itself a filing subject somewhere in
    /// the corpus — i.e. restrict the panel to publicly traded parents.
    /// Default: true.
    pub require_public_owner: bool,

    /// Skip the parse stage and load an existing filings table instead.
    /// For when the extraction already ran and you're iterating on the
    /// panel. Default: false.
    pub reuse_filings_table: bool,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    /// "Sensible" here meaning "will work out of the box without any env vars
    /// but will also respect your wishes if you set them."
    ///
    /// Every parameter can be overridden via environment variables prefixed
    /// with STAKEWATCH_. Because namespacing your env vars is what separates
    /// the professionals from the amateurs.
    pub fn from_env() -> Self {
        // Try to load .env file if it exists. Fail silently if it doesn't,
        // because not everyone has their life together enough to create
        // a .env file.
        let _ = dotenvy::dotenv();

        Config {
            // Input corpora
            filings_13d_dir: env_or_default("STAKEWATCH_13D_DIR", "data/filings/13D"),
            filings_13g_dir: env_or_default("STAKEWATCH_13G_DIR", "data/filings/13G"),
            price_series_path: env_or_default(
                "STAKEWATCH_PRICE_SERIES",
                "data/prices/daily_bars.csv",
            ),
            output_dir: env_or_default("STAKEWATCH_OUTPUT_DIR", "output"),

            // Panel
            panel_end: NaiveDate::parse_from_str(
                &env_or_default("STAKEWATCH_PANEL_END", "2024-12-31"),
                "%Y-%m-%d",
            )
            .unwrap_or_else(|_| {
                NaiveDate::from_ymd_opt(2024, 12, 31).expect("calendar literal")
            }),

            // Extraction
            scan_window: env_or_default("STAKEWATCH_SCAN_WINDOW", "20")
                .parse()
                .unwrap_or(20),
            context_radius: env_or_default("STAKEWATCH_CONTEXT_RADIUS", "10")
                .parse()
                .unwrap_or(10),
            text_node_budget: env_or_default("STAKEWATCH_TEXT_NODE_BUDGET", "1000")
                .parse()
                .unwrap_or(1_000),

            // Pipeline
            worker_threads: env_or_default("STAKEWATCH_WORKER_THREADS", "0")
                .parse()
                .unwrap_or(0),
            channel_capacity: env_or_default("STAKEWATCH_CHANNEL_CAPACITY", "10000")
                .parse()
                .unwrap_or(10_000),
            require_public_owner: env_or_default("STAKEWATCH_PUBLIC_OWNERS_ONLY", "true")
                .parse()
                .unwrap_or(true),
            reuse_filings_table: env_or_default("STAKEWATCH_REUSE_FILINGS_TABLE", "false")
                .parse()
                .unwrap_or(false),
        }
    }

    /// The raw per-document extraction output.
    pub fn filings_table_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("filings.csv")
    }

    /// The resolved CUSIP6 → CIK crosswalk.
    pub fn identity_table_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("identity_map.csv")
    }

    /// The daily ownership panel, the thing everything else exists for.
    pub fn panel_table_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("ownership_panel.csv")
    }
}

/// Helper function to read an environment variable with a default fallback.
/// Because unwrap_or on env::var is ugly and we have standards.
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
