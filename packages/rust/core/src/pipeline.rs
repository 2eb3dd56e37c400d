//! End-to-end `generate` pipeline: tasting file → note references → records → `.tex`.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use bottleneck_markdown::extract_references;
use bottleneck_shared::{BottleneckError, ParseFailure, ParseResult, Record, Result};

use crate::assembler::{self, AssembleResult};
use crate::{collector, latex};

/// Name used for the output when the tasting file has no usable stem.
const FALLBACK_OUTPUT_STEM: &str = "whisky_tasting";

/// Configuration for the `generate` pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tasting (index) file listing the notes as `- [[Name]]`.
    pub index_path: PathBuf,
    /// Vault directory the notes are looked up in.
    pub vault_dir: PathBuf,
    /// Note file extension, without the dot.
    pub note_extension: String,
    /// Where the `.tex` file is written.
    pub output_path: PathBuf,
    /// Custom template; the built-in one is used when `None`.
    pub template_path: Option<PathBuf>,
}

/// How a pipeline run ended.
#[derive(Debug)]
pub enum Outcome {
    /// All notes parsed and the document was written.
    Assembled(AssembleResult),
    /// The tasting file links no notes. Nothing was written.
    NoReferences { index_path: PathBuf },
    /// At least one note failed to parse. Nothing was written.
    Rejected(Vec<ParseFailure>),
}

impl Outcome {
    pub fn is_assembled(&self) -> bool {
        matches!(self, Self::Assembled(_))
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the tasting file's links are known.
    fn references_found(&self, count: usize);
    /// Called for every note that parsed, in tasting order.
    fn record_accepted(&self, record: &Record);
    /// Called when the pipeline completes.
    fn done(&self, outcome: &Outcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn references_found(&self, _count: usize) {}
    fn record_accepted(&self, _record: &Record) {}
    fn done(&self, _outcome: &Outcome) {}
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Resolve the tasting file argument.
///
/// A path that exists as given (absolute, or relative to the working
/// directory) is used directly; anything else is looked up in the vault.
pub fn resolve_index_path(vault_dir: &Path, arg: &Path) -> PathBuf {
    if arg.is_absolute() || arg.exists() {
        arg.to_path_buf()
    } else {
        vault_dir.join(arg)
    }
}

/// Default output: `<output_dir>/<tasting stem>.tex`.
pub fn default_output_path(output_dir: &Path, index_path: &Path) -> PathBuf {
    let stem = index_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_OUTPUT_STEM.to_string());
    output_dir.join(format!("{stem}.tex"))
}

/// Read the tasting file. A missing or unreadable file aborts the run.
pub fn read_index(index_path: &Path) -> Result<String> {
    if !index_path.is_file() {
        return Err(BottleneckError::validation(format!(
            "tasting file does not exist: {}",
            index_path.display()
        )));
    }
    std::fs::read_to_string(index_path).map_err(|e| BottleneckError::io(index_path, e))
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

/// Parse every note a tasting file links, without writing anything.
///
/// Results line up 1:1 with the links; an empty vector means the tasting
/// file links no notes.
#[instrument(skip_all, fields(index = %index_path.display()))]
pub async fn check(
    index_path: &Path,
    vault_dir: &Path,
    note_extension: &str,
) -> Result<Vec<ParseResult>> {
    let content = read_index(index_path)?;
    let ids = extract_references(&content);
    collector::collect(vault_dir, &ids, note_extension).await
}

/// Run the full `generate` pipeline.
///
/// 1. Read the tasting file and extract `- [[...]]` links
/// 2. Parse every linked note
/// 3. Stop if any note failed (nothing is written)
/// 4. Render the records and splice them into the template
#[instrument(skip_all, fields(index = %config.index_path.display()))]
pub async fn generate(
    config: &PipelineConfig,
    progress: &dyn ProgressReporter,
) -> Result<Outcome> {
    progress.phase("Reading tasting file");
    let content = read_index(&config.index_path)?;

    let ids = extract_references(&content);
    if ids.is_empty() {
        warn!("tasting file links no notes");
        let outcome = Outcome::NoReferences {
            index_path: config.index_path.clone(),
        };
        progress.done(&outcome);
        return Ok(outcome);
    }
    progress.references_found(ids.len());

    progress.phase("Looking for relevant data");
    let results = collector::collect(&config.vault_dir, &ids, &config.note_extension).await?;

    progress.phase("Validating read data");
    let (records, failures) = ParseResult::partition(results);
    if !failures.is_empty() {
        warn!(
            failed = failures.len(),
            total = ids.len(),
            "notes failed to parse, nothing written"
        );
        let outcome = Outcome::Rejected(failures);
        progress.done(&outcome);
        return Ok(outcome);
    }

    for record in &records {
        progress.record_accepted(record);
    }

    progress.phase("Generating TEX file");
    let template = assembler::load_template(config.template_path.as_deref())?;
    let fragments = latex::join_fragments(&records);
    let result =
        assembler::write_document(&template, &fragments, records.len(), &config.output_path)?;

    info!(
        records = result.record_count,
        output = %result.output_path.display(),
        "tasting document generated"
    );

    let outcome = Outcome::Assembled(result);
    progress.done(&outcome);
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bottleneck_shared::FailureReason;

    use super::*;

    fn vault() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures/vault")
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bottleneck-pipeline-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_config(index: &str, out_dir: &Path) -> PipelineConfig {
        let index_path = vault().join(index);
        PipelineConfig {
            output_path: default_output_path(out_dir, &index_path),
            index_path,
            vault_dir: vault(),
            note_extension: "md".into(),
            template_path: None,
        }
    }

    /// Records every callback so tests can assert on the reported flow.
    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl RecordingProgress {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.events.lock().unwrap().push(format!("phase:{name}"));
        }
        fn references_found(&self, count: usize) {
            self.events.lock().unwrap().push(format!("refs:{count}"));
        }
        fn record_accepted(&self, record: &Record) {
            self.events.lock().unwrap().push(format!("found:{}", record.name));
        }
        fn done(&self, outcome: &Outcome) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{}", outcome.is_assembled()));
        }
    }

    #[test]
    fn default_output_uses_tasting_stem() {
        assert_eq!(
            default_output_path(Path::new("/out"), Path::new("/vault/Tasting 2024-03.md")),
            PathBuf::from("/out/Tasting 2024-03.tex")
        );
        assert_eq!(
            default_output_path(Path::new("/out"), Path::new("/")),
            PathBuf::from("/out/whisky_tasting.tex")
        );
    }

    #[test]
    fn index_path_falls_back_to_vault() {
        let resolved = resolve_index_path(&vault(), Path::new("Tasting 2024-03.md"));
        assert_eq!(resolved, vault().join("Tasting 2024-03.md"));

        let absolute = vault().join("Tasting Empty.md");
        assert_eq!(resolve_index_path(Path::new("/elsewhere"), &absolute), absolute);
    }

    #[tokio::test]
    async fn two_valid_references_are_assembled_in_order() {
        let out = temp_dir();
        let config = make_config("Tasting 2024-03.md", &out);
        let progress = RecordingProgress::default();

        let outcome = generate(&config, &progress).await.unwrap();
        let result = match outcome {
            Outcome::Assembled(result) => result,
            other => panic!("expected assembled outcome, got {other:?}"),
        };
        assert_eq!(result.record_count, 2);
        assert_eq!(result.output_path, out.join("Tasting 2024-03.tex"));

        let written = std::fs::read_to_string(&result.output_path).unwrap();
        let springbank = "\\whiskey{Springbank 10}{Single Malt}{46 }{Nicht kühlgefiltert, ohne Farbstoff}{Springbank (Campbeltown)}{10}{Bourbon, Sherry}";
        let lagavulin = "\\whiskey{Lagavulin 16}{Single Malt}{43.0}{Kühlgefiltert, mit Zuckercouleur}{Lagavulin (Islay)}{16}{Keine Angabe}";
        assert!(written.contains(&format!("{springbank}\n\n{lagavulin}")));
        assert!(!written.contains(assembler::TEMPLATE_MARKER));

        assert_eq!(
            progress.events(),
            [
                "phase:Reading tasting file",
                "refs:2",
                "phase:Looking for relevant data",
                "phase:Validating read data",
                "found:Springbank 10",
                "found:Lagavulin 16",
                "phase:Generating TEX file",
                "done:true",
            ]
        );

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn missing_note_halts_without_output() {
        let out = temp_dir();
        let config = make_config("Tasting Missing.md", &out);

        let outcome = generate(&config, &SilentProgress).await.unwrap();
        let failures = match outcome {
            Outcome::Rejected(failures) => failures,
            other => panic!("expected rejection, got {other:?}"),
        };
        assert_eq!(
            failures,
            [ParseFailure::new(
                "Nonexistent Dram".into(),
                FailureReason::SourceMissing
            )]
        );
        assert_eq!(
            latex::diagnostic(&failures[0]),
            "[!!] For dataset Nonexistent Dram: File does not exist"
        );
        assert!(!config.output_path.exists());

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn malformed_note_halts_without_output() {
        let out = temp_dir();
        let config = make_config("Tasting Broken.md", &out);

        let outcome = generate(&config, &SilentProgress).await.unwrap();
        let failures = match outcome {
            Outcome::Rejected(failures) => failures,
            other => panic!("expected rejection, got {other:?}"),
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].reason, FailureReason::PatternMismatch);
        assert!(!config.output_path.exists());

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn no_references_halts_without_output() {
        let out = temp_dir();
        let config = make_config("Tasting Empty.md", &out);
        let progress = RecordingProgress::default();

        let outcome = generate(&config, &progress).await.unwrap();
        assert!(matches!(outcome, Outcome::NoReferences { .. }));
        assert!(!config.output_path.exists());
        assert_eq!(
            progress.events(),
            ["phase:Reading tasting file", "done:false"]
        );

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn missing_tasting_file_is_an_error() {
        let out = temp_dir();
        let config = make_config("No Such Tasting.md", &out);

        let err = generate(&config, &SilentProgress).await.unwrap_err();
        assert!(matches!(err, BottleneckError::Validation { .. }));

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn custom_template_is_used() {
        let out = temp_dir();
        let template = out.join("mini.tex");
        std::fs::write(&template, "BEGIN\n% bottleneck_insert\nEND\n").unwrap();

        let config = PipelineConfig {
            template_path: Some(template),
            ..make_config("Tasting 2024-03.md", &out)
        };

        let outcome = generate(&config, &SilentProgress).await.unwrap();
        assert!(outcome.is_assembled());

        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert!(written.starts_with("BEGIN\n\\whiskey{Springbank 10}"));
        assert!(written.ends_with("{Keine Angabe}\nEND\n"));

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn template_without_marker_is_an_error() {
        let out = temp_dir();
        let template = out.join("broken.tex");
        std::fs::write(&template, "\\begin{document}\\end{document}\n").unwrap();

        let config = PipelineConfig {
            template_path: Some(template),
            ..make_config("Tasting 2024-03.md", &out)
        };

        let err = generate(&config, &SilentProgress).await.unwrap_err();
        assert!(matches!(err, BottleneckError::Template(_)));
        assert!(!config.output_path.exists());

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn check_reports_every_reference() {
        let results = check(&vault().join("Tasting Missing.md"), &vault(), "md")
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_record());
        assert!(!results[1].is_record());

        let empty = check(&vault().join("Tasting Empty.md"), &vault(), "md")
            .await
            .unwrap();
        assert!(empty.is_empty());
    }
}
