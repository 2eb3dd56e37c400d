//! LaTeX serialization of records.
//!
//! Every record becomes one `\whiskey{...}` invocation with seven arguments:
//!
//! ```text
//! \whiskey{name}{type}{abv}{filtering, colouring}{distillery (region)}{age}{casks}
//! ```
//!
//! Blank values are replaced by [`NOT_SPECIFIED`] here, not at parse time.

use bottleneck_shared::{Marker, ParseFailure, Record};

/// Printed in place of any blank field.
pub const NOT_SPECIFIED: &str = "Keine Angabe";

/// Printed for a checkbox holding anything but ` `, `X`, `x` or `?`.
pub const UNRECOGNIZED_MARKER: &str = "UNBEKANNT";

/// Separator between consecutive `\whiskey` invocations.
pub const FRAGMENT_SEPARATOR: &str = "\n\n";

fn or_not_specified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

/// Phrase for the `Kühlgefiltert` checkbox.
pub fn filtering_phrase(marker: &Marker) -> &'static str {
    match marker {
        Marker::Blank => "Nicht kühlgefiltert",
        Marker::Marked => "Kühlgefiltert",
        Marker::Unknown => "Ggf. kühlgefiltert",
        Marker::Unrecognized(_) => UNRECOGNIZED_MARKER,
    }
}

/// Phrase for the `Gefärbt` checkbox.
pub fn colouring_phrase(marker: &Marker) -> &'static str {
    match marker {
        Marker::Blank => "ohne Farbstoff",
        Marker::Marked => "mit Zuckercouleur",
        Marker::Unknown => "Ggf. mit Farbstoff",
        Marker::Unrecognized(_) => UNRECOGNIZED_MARKER,
    }
}

/// Render one record as a single-line `\whiskey` invocation.
pub fn to_latex(record: &Record) -> String {
    let abv = record.abv.replace(',', ".");
    let distillery = record.distillery.trim_matches(['[', ']']);

    format!(
        "\\whiskey{{{name}}}{{{kind}}}{{{abv}}}{{{filtering}, {colouring}}}{{{distillery} ({region})}}{{{age}}}{{{casks}}}",
        name = or_not_specified(&record.name),
        kind = or_not_specified(&record.kind),
        abv = or_not_specified(&abv),
        filtering = filtering_phrase(&record.chill_filtered),
        colouring = colouring_phrase(&record.coloured),
        distillery = or_not_specified(distillery),
        region = or_not_specified(&record.region),
        age = or_not_specified(&record.age),
        casks = or_not_specified(&record.casks),
    )
}

/// Render a batch, one invocation per record, separated by a blank line.
pub fn join_fragments(records: &[Record]) -> String {
    records
        .iter()
        .map(to_latex)
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR)
}

/// Operator-facing line for a note that failed to parse.
pub fn diagnostic(failure: &ParseFailure) -> String {
    format!("[!!] For dataset {}: {}", failure.id, failure.reason)
}
