//! Obsidian-flavoured markdown readers for tasting files.
//!
//! Two passes, both regex driven:
//! - [`extract_references`] pulls the `- [[Note]]` list links out of a
//!   tasting (index) file;
//! - [`parse_note`] matches one whisky note against the fixed tasting-note
//!   template and builds a [`Record`](bottleneck_shared::Record).
//!
//! Neither touches the filesystem; lookups live in `bottleneck-core`.

mod links;
mod note;

pub use links::extract_references;
pub use note::parse_note;
