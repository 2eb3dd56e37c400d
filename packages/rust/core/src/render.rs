//! `pdflatex` hand-off.
//!
//! Runs the configured LaTeX compiler on an assembled `.tex` file. The
//! compiler's own output goes straight to the terminal; only its exit status
//! is reported back.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::{info, instrument, warn};

use bottleneck_shared::{AppConfig, BottleneckError, Result, expand_home};

/// Compiler settings, resolved from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Compiler executable (`pdflatex` by default).
    pub compiler: String,
    /// Extra search directory for `.sty` files.
    pub include_dir: Option<PathBuf>,
}

impl RenderConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let include_dir = config
            .latex
            .include_dir
            .as_deref()
            .map(expand_home)
            .transpose()?;

        Ok(Self {
            compiler: config.latex.compiler.clone(),
            include_dir,
        })
    }
}

/// Result of one compiler run.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// Where the compiler was asked to put the PDF.
    pub pdf_path: PathBuf,
    /// Whether the compiler exited successfully.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub exit_code: Option<i32>,
}

/// Directory the PDF and `aux/` land in: the `.tex` file's own directory.
fn output_dir(tex_path: &Path) -> PathBuf {
    match tex_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Command-line arguments for compiling `tex_path`.
pub fn compiler_args(tex_path: &Path, config: &RenderConfig) -> Vec<OsString> {
    let out_dir = output_dir(tex_path);

    let mut args: Vec<OsString> = vec![
        "-synctex=1".into(),
        "-output-format=pdf".into(),
        format!("-output-directory={}", out_dir.display()).into(),
        format!("-aux-directory={}", out_dir.join("aux").display()).into(),
    ];
    if let Some(include) = &config.include_dir {
        args.push(format!("-include-directory={}", include.display()).into());
    }
    args.push(tex_path.as_os_str().to_owned());
    args
}

/// Compile `tex_path` to PDF.
///
/// Fails only when the compiler cannot be started. A compiler that runs and
/// exits non-zero yields an unsuccessful [`RenderOutcome`].
#[instrument(skip(config), fields(tex = %tex_path.display(), compiler = %config.compiler))]
pub async fn render_pdf(tex_path: &Path, config: &RenderConfig) -> Result<RenderOutcome> {
    let args = compiler_args(tex_path, config);
    info!("running LaTeX compiler");

    let status = tokio::process::Command::new(&config.compiler)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| {
            BottleneckError::Render(format!(
                "failed to run `{}`: {e}. Is it installed and on PATH?",
                config.compiler
            ))
        })?;

    let pdf_name = tex_path.with_extension("pdf");
    let pdf_path = output_dir(tex_path).join(pdf_name.file_name().unwrap_or_default());

    if !status.success() {
        warn!(code = ?status.code(), "LaTeX compiler reported failure");
    }

    Ok(RenderOutcome {
        pdf_path,
        success: status.success(),
        exit_code: status.code(),
    })
}
