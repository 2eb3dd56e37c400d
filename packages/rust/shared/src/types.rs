//! Record model for tasting notes.
//!
//! A note either parses into a [`Record`] or becomes a [`ParseFailure`];
//! [`ParseResult`] carries exactly one of the two.

use serde::Serialize;

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

/// Name of a referenced note, taken from a `[[...]]` link target.
///
/// Used as the file stem when looking the note up, and as the label in
/// diagnostics. Not required to be unique within a tasting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// Checkbox state for the chill-filtering and colouring lines.
///
/// Decoded from the single character between the brackets of `- [ ] ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// `[ ]`: no.
    Blank,
    /// `[X]` or `[x]`: yes.
    Marked,
    /// `[?]`: not known.
    Unknown,
    /// Anything else, kept verbatim (may be empty for `[]`).
    Unrecognized(String),
}

impl Marker {
    /// Decode the raw token captured between the checkbox brackets.
    pub fn from_token(token: &str) -> Self {
        match token {
            " " => Self::Blank,
            "X" | "x" => Self::Marked,
            "?" => Self::Unknown,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A well-formed tasting note.
///
/// Text fields hold exactly what the note contained; defaulting of blank
/// values happens when the record is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    /// Single Malt, Grain, Blend, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub region: String,
    /// May still carry link brackets, e.g. `[[Springbank`.
    pub distillery: String,
    pub age: String,
    /// Alcohol by volume, without the `%`.
    pub abv: String,
    /// Cask finish / maturation notes.
    pub casks: String,
    pub chill_filtered: Marker,
    pub coloured: Marker,
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

/// Why a referenced note could not become a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No note file exists for the identifier.
    SourceMissing,
    /// The note exists but does not follow the tasting-note template.
    PatternMismatch,
    /// The note exists but could not be read as text.
    Unknown,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::SourceMissing => "File does not exist",
            Self::PatternMismatch => "File does not match pattern",
            Self::Unknown => "Unknown Error",
        };
        f.write_str(text)
    }
}

/// A referenced note that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub id: RecordId,
    pub reason: FailureReason,
}

impl ParseFailure {
    pub fn new(id: RecordId, reason: FailureReason) -> Self {
        Self { id, reason }
    }
}

/// Outcome of parsing one referenced note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseResult {
    Record(Record),
    Failure(ParseFailure),
}

impl ParseResult {
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Split a batch into records and failures, keeping batch order in each.
    pub fn partition(results: Vec<ParseResult>) -> (Vec<Record>, Vec<ParseFailure>) {
        let mut records = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Self::Record(record) => records.push(record),
                Self::Failure(failure) => failures.push(failure),
            }
        }
        (records, failures)
    }
}
