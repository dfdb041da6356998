// =============================================================================
// extract/document.rs — THE MARKUP DEMOLITION SITE
// =============================================================================
//
// Every filing enters the engine through this module. Two jobs:
//
// 1. Read the bytes without dying. Thirty-year-old archives contain files
//    with mojibake, truncation, and encodings chosen by throwing darts.
//    An unreadable file is a sentinel record downstream, never a crash.
//
// 2. Detect and strip HTML. Pre-2001 filings are plain text. Later ones are
//    HTML produced by whatever word processor the law firm had, which means
//    the share count we're hunting for might be split across three nested
//    <font> tags with a newline in the middle. We flatten every text node
//    (whitespace collapsed) and join them with newlines so the line-oriented
//    cascades downstream see one value per line, the way the plain-text era
//    intended.
//
// The text-node normalization is budgeted: some filings embed tens of
// thousands of nodes, and the deeply nested ones were crashing recursive
// walkers long before we got here. Nodes past the budget are emitted
// unnormalized rather than dropped.
// =============================================================================

use scraper::{Html, Node};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

/// Python-era detection rule, kept verbatim: a document is HTML when the
/// literal tag "<html>" appears anywhere, any case. "<html lang=..>" does
/// not count, and in this corpus it genuinely never appears without the
/// bare form somewhere nearby.
static HTML_TAG: LazyLock<aho_corasick::AhoCorasick> = LazyLock::new(|| {
    aho_corasick::AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["<html>"])
        .expect("html tag automaton must build")
});

/// One filing's text, as far as we could recover it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Raw decoded text, byte-for-byte what the archive holds (modulo lossy
    /// UTF-8 replacement). The SGML header lives here untouched.
    raw: Option<String>,
    /// Markup-stripped body, present only when the raw text was HTML.
    stripped: Option<String>,
}

impl Document {
    /// The text the header extractor scans: always the unmodified original.
    pub fn header_text(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// The text the field cascades scan: stripped when HTML, raw otherwise.
    pub fn body_text(&self) -> Option<&str> {
        self.stripped.as_deref().or(self.raw.as_deref())
    }

    pub fn was_html(&self) -> bool {
        self.stripped.is_some()
    }

    pub fn is_unreadable(&self) -> bool {
        self.raw.is_none()
    }
}

/// Read one filing from disk. Never errors: an unreadable file yields an
/// empty Document and the batch moves on.
pub fn read(path: &Path, text_node_budget: usize) -> Document {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "Filing unreadable, downstream fields will be sentinels"
            );
            return Document::default();
        }
    };

    // Lossy on purpose. A handful of replacement characters beats losing
    // the whole document over one bad byte.
    let raw = String::from_utf8_lossy(&bytes).into_owned();

    let stripped = if looks_like_html(&raw) {
        Some(strip_markup(&raw, text_node_budget))
    } else {
        None
    };

    Document {
        raw: Some(raw),
        stripped,
    }
}

/// Cheap byte check first, automaton second. Most of the corpus is plain
/// text with no '<' anywhere near the truth.
fn looks_like_html(raw: &str) -> bool {
    if memchr::memchr(b'<', raw.as_bytes()).is_none() {
        return false;
    }
    HTML_TAG.is_match(raw)
}

/// Flatten an HTML filing to newline-separated text.
///
/// Text nodes are emitted in document order. The first `text_node_budget`
/// of them get their whitespace collapsed to single spaces; anything past
/// the budget is emitted as-is. Matches the long-standing behavior the
/// extraction cascades were tuned against.
pub fn strip_markup(raw: &str, text_node_budget: usize) -> String {
    let dom = Html::parse_document(raw);

    let mut chunks: Vec<String> = Vec::new();
    let mut normalized = 0usize;

    for node in dom.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let fragment: &str = &text.text;

        if normalized < text_node_budget {
            chunks.push(fragment.split_whitespace().collect::<Vec<_>>().join(" "));
            normalized += 1;
        } else {
            chunks.push(fragment.to_string());
        }
    }

    chunks.join("\n")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through_unchanged() {
        assert!(!looks_like_html("SOLE VOTING POWER\n1,234,567\n"));
        assert!(!looks_like_html("shares < votes but no markup"));
    }

    #[test]
    fn test_html_detection_is_case_insensitive_and_exact() {
        assert!(looks_like_html("<HTML><body>x</body></HTML>"));
        assert!(looks_like_html("prefix <Html> suffix"));
        // Attribute-laden root tags don't count; the detection rule is the
        // bare tag, same as it always was.
        assert!(!looks_like_html("<html lang=\"en\"><body>x</body></html>"));
    }

    #[test]
    fn test_strip_markup_collapses_intra_tag_whitespace() {
        let html = "<html><body><p>SOLE   VOTING\n   POWER</p><p>1,234,567</p></body></html>";
        let text = strip_markup(html, 1000);
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert!(lines.contains(&"SOLE VOTING POWER"));
        assert!(lines.contains(&"1,234,567"));
    }

    #[test]
    fn test_strip_markup_splits_table_cells_onto_lines() {
        let html = "<html><body><table><tr><td>Item 11</td><td>5,000,000</td></tr></table></body></html>";
        let text = strip_markup(html, 1000);
        // Each text node lands on its own line, so the cascades can treat
        // HTML and plain-text filings identically.
        assert!(text.lines().any(|l| l == "Item 11"));
        assert!(text.lines().any(|l| l == "5,000,000"));
    }

    #[test]
    fn test_strip_markup_budget_leaves_tail_unnormalized() {
        let html = "<html><body><p>first   node</p><p>second   node</p></body></html>";
        let text = strip_markup(html, 1);
        assert!(text.contains("first node"), "first node is normalized");
        assert!(
            text.contains("second   node"),
            "past-budget node keeps its whitespace"
        );
    }

    #[test]
    fn test_read_missing_file_yields_empty_document() {
        let doc = read(Path::new("/nonexistent/archive/13D/1998_11/nope.txt"), 1000);
        assert!(doc.is_unreadable());
        assert_eq!(doc.header_text(), None);
        assert_eq!(doc.body_text(), None);
        assert!(!doc.was_html());
    }

    #[test]
    fn test_body_text_prefers_stripped_content() {
        let doc = Document {
            raw: Some("<html><b>7</b></html>".to_string()),
            stripped: Some("7".to_string()),
        };
        assert_eq!(doc.body_text(), Some("7"));
        assert_eq!(doc.header_text(), Some("<html><b>7</b></html>"));
        assert!(doc.was_html());
    }
}
