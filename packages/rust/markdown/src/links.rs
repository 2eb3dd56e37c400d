//! `- [[Note]]` link extraction.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use bottleneck_shared::RecordId;

/// Matches a list item holding an Obsidian wiki link: `- [[Target]]`.
static LIST_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"- \[\[([^\]]+)\]\]").expect("list link regex")
});

/// Collect the targets of all `- [[...]]` links, in document order.
///
/// Duplicates are kept. An empty result is a normal outcome; the caller
/// decides what a tasting without links means.
pub fn extract_references(content: &str) -> Vec<RecordId> {
    let ids: Vec<RecordId> = LIST_LINK_RE
        .captures_iter(content)
        .map(|caps| RecordId::from(&caps[1]))
        .collect();

    debug!(count = ids.len(), "extracted note references");
    ids
}
