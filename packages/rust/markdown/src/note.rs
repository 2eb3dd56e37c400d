//! Tasting-note template matcher.
//!
//! A whisky note looks like this (blank lines and indentation are free):
//!
//! ```text
//! # Springbank 10
//! ---
//! - [ ] Kühlgefiltert
//! - [X] Gefärbt
//! - Typ: Single Malt
//! - Region: Campbeltown
//! - Destillerie: [[Springbank]]
//! - Alter: 10
//! - Stärke: 46 % vol.
//! - Reifung: Bourbon, Sherry
//! ```
//!
//! The divider under the heading is optional and may also be a `## ...`
//! sub-heading. Field labels are fixed German literals.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use bottleneck_shared::{Marker, Record};

/// The whole note template as one pattern.
///
/// Values are lazy up to trailing whitespace and cannot cross a line. The
/// first block that matches from the top of the document wins.
static NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*#[ \t]+(?P<name>.*?)\s+",
        r"(?:(?:-{3,}|\*{3,}|_{3,}|#{2,6}[ \t].*?)\s+)?",
        r"-[ \t]+\[(?P<chill_filtered>.?)\][ \t]+Kühlgefiltert\s+",
        r"-[ \t]+\[(?P<coloured>.)\][ \t]+Gefärbt\s+",
        r"-[ \t]+Typ:[ \t]*(?P<type>.*?)\s+",
        r"-[ \t]+Region:[ \t]*(?P<region>.*?)\s+",
        r"-[ \t]+Destillerie:[ \t]*(?:\[\[[^\]|\n]*\|)?(?P<distillery>.*?)(?:\]\])?\s+",
        r"-[ \t]+Alter:[ \t]*(?P<age>.*?)\s+",
        r"-[ \t]+Stärke:[ \t]*(?P<abv>[^%\n]*?)%.*?\s+",
        r"-[ \t]+Reifung:[ \t]*(?P<casks>.*?)[ \t\r]*(?:\n|\z)",
    ))
    .expect("note template regex")
});

/// Match `content` against the tasting-note template.
///
/// Returns `None` when no complete block is found. Field values are taken
/// verbatim; nothing is validated or defaulted here.
pub fn parse_note(content: &str) -> Option<Record> {
    let Some(caps) = NOTE_RE.captures(content) else {
        debug!(len = content.len(), "note does not match template");
        return None;
    };

    let field = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };

    Some(Record {
        name: field("name"),
        kind: field("type"),
        region: field("region"),
        distillery: field("distillery"),
        age: field("age"),
        abv: field("abv"),
        casks: field("casks"),
        chill_filtered: Marker::from_token(&field("chill_filtered")),
        coloured: Marker::from_token(&field("coloured")),
    })
}
