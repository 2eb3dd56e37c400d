//! LaTeX document assembler.
//!
//! Splices the rendered `\whiskey` fragments into a template at the
//! [`TEMPLATE_MARKER`] line and writes the finished `.tex` file.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use bottleneck_shared::{BottleneckError, Result};

/// Placeholder the fragments replace. Only the first occurrence is used.
pub const TEMPLATE_MARKER: &str = "% bottleneck_insert";

/// Template used when no custom template is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/template.tex");

/// Output from a successful assembly.
#[derive(Debug, Clone)]
pub struct AssembleResult {
    /// Path of the written `.tex` file.
    pub output_path: PathBuf,
    /// Number of `\whiskey` entries in the document.
    pub record_count: usize,
    /// Size of the written document in bytes.
    pub size_bytes: usize,
}

/// Load the template text, falling back to [`DEFAULT_TEMPLATE`].
pub fn load_template(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            let text =
                std::fs::read_to_string(path).map_err(|e| BottleneckError::io(path, e))?;
            debug!(path = %path.display(), "loaded custom template");
            Ok(text)
        }
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

/// Replace the first [`TEMPLATE_MARKER`] in `template` with `fragments`.
///
/// The fragments are inserted verbatim. A template without the marker is
/// rejected rather than silently producing a document without entries.
pub fn splice(template: &str, fragments: &str) -> Result<String> {
    if !template.contains(TEMPLATE_MARKER) {
        return Err(BottleneckError::Template(format!(
            "template does not contain the `{TEMPLATE_MARKER}` marker"
        )));
    }
    Ok(template.replacen(TEMPLATE_MARKER, fragments, 1))
}

/// Splice `fragments` into `template` and write the result to `output_path`.
///
/// The file is written to a temporary sibling first and renamed into place,
/// so a failed run never leaves a half-written document behind.
#[instrument(skip(template, fragments), fields(output = %output_path.display()))]
pub fn write_document(
    template: &str,
    fragments: &str,
    record_count: usize,
    output_path: &Path,
) -> Result<AssembleResult> {
    let document = splice(template, fragments)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BottleneckError::io(parent, e))?;
    }

    let file_name = output_path
        .file_name()
        .ok_or_else(|| {
            BottleneckError::validation(format!(
                "output path has no file name: {}",
                output_path.display()
            ))
        })?
        .to_string_lossy();
    let temp = output_path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, &document).map_err(|e| BottleneckError::io(&temp, e))?;
    std::fs::rename(&temp, output_path).map_err(|e| BottleneckError::io(output_path, e))?;

    info!(
        record_count,
        size = document.len(),
        "wrote LaTeX document"
    );

    Ok(AssembleResult {
        output_path: output_path.to_path_buf(),
        record_count,
        size_bytes: document.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
