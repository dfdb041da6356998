// =============================================================================
// extract/mod.rs — THE EXTRACTION FLOOR
// =============================================================================
//
// This module is the assembly line that turns one raw 13D/13G document into
// one structured FilingRecord. Four stations, strictly ordered:
//
//   document — read the bytes, detect HTML, demolish the markup
//   header   — the SGML preamble the SEC's own pipeline stamps on every file
//   fields   — heuristic cascades over the body text (the fun part)
//   parser   — bolts the other three together into a record
//
// The body extractors are prioritized pattern cascades, not grammars. Thirty
// years of filings means thirty years of law-firm word processors, and the
// only thing they agree on is that "CUSIP" is probably spelled correctly
// somewhere near the number we want.
// =============================================================================

pub mod document;
pub mod fields;
pub mod header;
pub mod parser;
