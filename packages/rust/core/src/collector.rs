//! Note lookup and batch collection.
//!
//! Each referenced note is resolved as `<vault>/<id>.<ext>`, read once and
//! matched against the note template. Results come back 1:1 with the input
//! identifiers, in input order.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use bottleneck_markdown::parse_note;
use bottleneck_shared::{
    BottleneckError, FailureReason, ParseFailure, ParseResult, RecordId, Result,
};

/// Path a note identifier resolves to inside the vault.
pub fn note_path(root: &Path, id: &RecordId, extension: &str) -> PathBuf {
    root.join(format!("{id}.{extension}"))
}

/// Look up and parse a single note.
///
/// Never fails: a missing file, a template mismatch or an unreadable file
/// all come back as [`ParseResult::Failure`].
#[instrument(skip_all, fields(id = %id))]
pub fn read_record(root: &Path, id: &RecordId, extension: &str) -> ParseResult {
    let path = note_path(root, id, extension);

    if !path.is_file() {
        debug!(path = %path.display(), "note not found");
        return ParseResult::Failure(ParseFailure::new(id.clone(), FailureReason::SourceMissing));
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "note exists but cannot be read");
            return ParseResult::Failure(ParseFailure::new(id.clone(), FailureReason::Unknown));
        }
    };

    match parse_note(&content) {
        Some(record) => {
            debug!(name = %record.name, "note parsed");
            ParseResult::Record(record)
        }
        None => ParseResult::Failure(ParseFailure::new(id.clone(), FailureReason::PatternMismatch)),
    }
}

/// Parse every referenced note on the current thread.
pub fn collect_blocking(root: &Path, ids: &[RecordId], extension: &str) -> Vec<ParseResult> {
    ids.iter()
        .map(|id| read_record(root, id, extension))
        .collect()
}

/// Parse every referenced note on tokio's blocking pool.
///
/// Reads run concurrently; handles are awaited in input order so the output
/// lines up with `ids`.
#[instrument(skip_all, fields(root = %root.display(), count = ids.len()))]
pub async fn collect(root: &Path, ids: &[RecordId], extension: &str) -> Result<Vec<ParseResult>> {
    let mut handles = Vec::with_capacity(ids.len());

    for id in ids {
        let root = root.to_path_buf();
        let id = id.clone();
        let extension = extension.to_string();
        handles.push(tokio::task::spawn_blocking(move || {
            read_record(&root, &id, &extension)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle
            .await
            .map_err(|e| BottleneckError::parse(format!("note reader task failed: {e}")))?;
        results.push(result);
    }

    let failed = results.iter().filter(|r| !r.is_record()).count();
    debug!(total = results.len(), failed, "collection complete");

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures/vault")
    }

    fn ids(names: &[&str]) -> Vec<RecordId> {
        names.iter().map(|n| RecordId::from(*n)).collect()
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bottleneck-collector-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn note_path_appends_extension() {
        let path = note_path(Path::new("/vault"), &"Springbank 10".into(), "md");
        assert_eq!(path, PathBuf::from("/vault/Springbank 10.md"));
    }

    #[test]
    fn reads_well_formed_note() {
        let result = read_record(&vault(), &"Springbank 10".into(), "md");
        match result {
            ParseResult::Record(record) => {
                assert_eq!(record.name, "Springbank 10");
                assert_eq!(record.region, "Campbeltown");
            }
            ParseResult::Failure(f) => panic!("expected record, got {f:?}"),
        }
    }

    #[test]
    fn missing_note_is_source_missing() {
        let result = read_record(&vault(), &"Nonexistent Dram".into(), "md");
        assert_eq!(
            result,
            ParseResult::Failure(ParseFailure::new(
                "Nonexistent Dram".into(),
                FailureReason::SourceMissing
            ))
        );
    }

    #[test]
    fn directory_is_not_a_note() {
        let dir = temp_dir();
        std::fs::create_dir_all(dir.join("Folder.md")).unwrap();

        let result = read_record(&dir, &"Folder".into(), "md");
        assert_eq!(
            result,
            ParseResult::Failure(ParseFailure::new("Folder".into(), FailureReason::SourceMissing))
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_note_is_pattern_mismatch() {
        let result = read_record(&vault(), &"Broken Draft".into(), "md");
        assert_eq!(
            result,
            ParseResult::Failure(ParseFailure::new(
                "Broken Draft".into(),
                FailureReason::PatternMismatch
            ))
        );
    }

    #[test]
    fn non_utf8_note_is_unknown_failure() {
        let dir = temp_dir();
        std::fs::write(dir.join("Binary.md"), [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let result = read_record(&dir, &"Binary".into(), "md");
        assert_eq!(
            result,
            ParseResult::Failure(ParseFailure::new("Binary".into(), FailureReason::Unknown))
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn custom_extension_is_used() {
        let dir = temp_dir();
        let note = std::fs::read_to_string(vault().join("Springbank 10.md")).unwrap();
        std::fs::write(dir.join("Springbank 10.txt"), note).unwrap();

        assert!(read_record(&dir, &"Springbank 10".into(), "txt").is_record());
        assert!(!read_record(&dir, &"Springbank 10".into(), "md").is_record());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn blocking_collection_is_one_to_one() {
        let input = ids(&["Lagavulin 16", "Nonexistent Dram", "Springbank 10", "Lagavulin 16"]);
        let results = collect_blocking(&vault(), &input, "md");

        assert_eq!(results.len(), input.len());
        assert!(results[0].is_record());
        assert!(!results[1].is_record());
        assert!(results[2].is_record());
        assert_eq!(results[0], results[3]);
    }

    #[tokio::test]
    async fn async_collection_preserves_order() {
        let input = ids(&[
            "Springbank 10",
            "Broken Draft",
            "Lagavulin 16",
            "Nonexistent Dram",
            "Springbank 10",
        ]);

        let results = collect(&vault(), &input, "md").await.unwrap();
        assert_eq!(results, collect_blocking(&vault(), &input, "md"));

        for (id, result) in input.iter().zip(&results) {
            match result {
                ParseResult::Record(record) => assert_eq!(&record.name, id.as_str()),
                ParseResult::Failure(failure) => assert_eq!(&failure.id, id),
            }
        }
    }

    #[tokio::test]
    async fn empty_input_collects_nothing() {
        let results = collect(&vault(), &[], "md").await.unwrap();
        assert!(results.is_empty());
    }
}
