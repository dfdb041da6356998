// =============================================================================
// identity.rs — WHO EVEN IS "594918", A DEMOCRATIC INQUIRY
// =============================================================================
//
// Filings identify the subject two different ways at once: the SGML header
// carries the SEC's entity number (CIK), the cover page carries the security
// identifier (CUSIP). The external price series only speaks CUSIP, the
// owner side of a filing only speaks CIK, and nobody ships the crosswalk.
// So we build it ourselves: every usable filing casts one vote that its
// CUSIP's 6-char issuer root belongs to its header CIK, and per root the
// majority wins. Typo'd CUSIPs lose elections; that's the whole trick.
//
// Rebuilt from scratch every run. It is cheap, and a stale crosswalk is the
// kind of bug you only find a paper-retraction later.
// =============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{FilingRecord, PriceBar};

/// Issuer roots that are printer lint, not identifiers. "000000" is what a
/// blank CUSIP box OCRs to; "0001pt" is a pagination artifact that shows up
/// often enough to deserve a ban by name.
const PLACEHOLDER_ROOTS: [&str; 2] = ["000000", "0001pt"];

/// One row of the published identity table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityRow {
    pub cusip6: String,
    pub cik: u64,
}

struct Tally {
    count: u64,
    first_seen: usize,
}

/// The resolved CUSIP6 → subject CIK crosswalk. Built once per run from the
/// full record set, read-only afterward.
pub struct IdentityMap {
    map: HashMap<String, u64>,
    votes_cast: u64,
}

impl IdentityMap {
    /// Tally and resolve. A record is franchised when it has a subject CIK
    /// and a CUSIP of plausible length (6, 8, or 9 after separator
    /// stripping); an owner CIK is NOT required — a subsidiary's identity
    /// does not depend on who is buying it. Per root, the CIK with the most
    /// votes wins; ties go to the candidate seen earliest in corpus order,
    /// which the sorted walk makes deterministic.
    pub fn build(records: &[FilingRecord]) -> Self {
        let mut votes: HashMap<String, HashMap<u64, Tally>> = HashMap::new();
        let mut cast = 0usize;

        for record in records {
            let Some(cik) = record.cik else { continue };
            let Some(cusip) = record.cusip.as_deref() else {
                continue;
            };
            if !matches!(cusip.len(), 6 | 8 | 9) {
                continue;
            }
            let Some(root) = cusip.get(..6) else { continue };
            if PLACEHOLDER_ROOTS.contains(&root) {
                continue;
            }

            votes
                .entry(root.to_string())
                .or_default()
                .entry(cik)
                .or_insert(Tally {
                    count: 0,
                    first_seen: cast,
                })
                .count += 1;
            cast += 1;
        }

        let mut map = HashMap::with_capacity(votes.len());
        for (root, tallies) in votes {
            // first_seen is unique per candidate, so this comparator is
            // total and the winner does not depend on hash iteration order.
            let winner = tallies.into_iter().max_by(|(_, a), (_, b)| {
                a.count
                    .cmp(&b.count)
                    .then(b.first_seen.cmp(&a.first_seen))
            });
            if let Some((cik, _)) = winner {
                map.insert(root, cik);
            }
        }

        info!(
            roots = map.len(),
            votes = cast,
            "identity map resolved"
        );

        Self {
            map,
            votes_cast: cast as u64,
        }
    }

    pub fn get(&self, cusip6: &str) -> Option<u64> {
        self.map.get(cusip6).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn votes_cast(&self) -> u64 {
        self.votes_cast
    }

    /// Stamp each price bar's `cik` from the crosswalk via its issuer root.
    /// Bars whose root never appears in the filing corpus are dropped — they
    /// can't join anything downstream, and carrying them only inflates the
    /// index. Returns the survivors and the drop count.
    pub fn annotate_price_series(&self, bars: Vec<PriceBar>) -> (Vec<PriceBar>, u64) {
        let total = bars.len();
        let mut kept = Vec::with_capacity(total);
        for mut bar in bars {
            if let Some(cik) = self.get(&bar.cusip6) {
                bar.cik = Some(cik);
                kept.push(bar);
            }
        }
        let dropped = (total - kept.len()) as u64;
        info!(kept = kept.len(), dropped, "price series annotated");
        (kept, dropped)
    }

    /// The table rows, sorted by root for a diffable output file.
    pub fn rows(&self) -> Vec<IdentityRow> {
        let mut rows: Vec<IdentityRow> = self
            .map
            .iter()
            .map(|(cusip6, &cik)| IdentityRow {
                cusip6: cusip6.clone(),
                cik,
            })
            .collect();
        rows.sort_by(|a, b| a.cusip6.cmp(&b.cusip6));
        rows
    }
}

// =============================================================================
// TESTS
// =============================================================================
