//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use bottleneck_core::latex;
use bottleneck_core::pipeline::{self, Outcome, PipelineConfig, ProgressReporter};
use bottleneck_core::render::{self, RenderConfig};
use bottleneck_shared::{
    AppConfig, ParseResult, Record, config_file_path, expand_home, init_config, load_config,
    render_config,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// bottleneck: easily create beautiful pages for whisky tastings.
#[derive(Parser)]
#[command(
    name = "bottleneck",
    version,
    about = "Easily create beautiful pages for whisky tastings.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate the LaTeX document (and PDF) for a tasting.
    Generate {
        /// Tasting file listing the whiskies as `- [[Name]]`.
        tasting: PathBuf,

        /// Obsidian vault holding the whisky notes.
        #[arg(long, env = "BOTTLENECK_VAULT")]
        vault: Option<PathBuf>,

        /// Output `.tex` file (defaults to <output_dir>/<tasting>.tex).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// LaTeX template containing the `% bottleneck_insert` marker.
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Only write the `.tex` file, do not run the LaTeX compiler.
        #[arg(long)]
        tex_only: bool,
    },

    /// Validate the whisky notes of a tasting without writing anything.
    Check {
        /// Tasting file listing the whiskies as `- [[Name]]`.
        tasting: PathBuf,

        /// Obsidian vault holding the whisky notes.
        #[arg(long, env = "BOTTLENECK_VAULT")]
        vault: Option<PathBuf>,

        /// Print the parsed notes as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "bottleneck=warn",
        1 => "bottleneck=info",
        2 => "bottleneck=debug",
        _ => "bottleneck=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            tasting,
            vault,
            output,
            template,
            tex_only,
        } => {
            cmd_generate(
                &tasting,
                vault.as_deref(),
                output.as_deref(),
                template.as_deref(),
                tex_only,
            )
            .await
        }
        Command::Check {
            tasting,
            vault,
            json,
        } => cmd_check(&tasting, vault.as_deref(), json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Config merging
// ---------------------------------------------------------------------------

/// Vault from the flag, else from the config file.
fn resolve_vault(config: &AppConfig, flag: Option<&Path>) -> Result<PathBuf> {
    Ok(match flag {
        Some(path) => path.to_path_buf(),
        None => expand_home(&config.defaults.vault_dir)?,
    })
}

/// Build the pipeline configuration from config file values and CLI flags.
fn pipeline_config(
    config: &AppConfig,
    tasting: &Path,
    vault: Option<&Path>,
    output: Option<&Path>,
    template: Option<&Path>,
) -> Result<PipelineConfig> {
    let vault_dir = resolve_vault(config, vault)?;
    let index_path = pipeline::resolve_index_path(&vault_dir, tasting);

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let output_dir = expand_home(&config.defaults.output_dir)?;
            pipeline::default_output_path(&output_dir, &index_path)
        }
    };

    let template_path = match template {
        Some(path) => Some(path.to_path_buf()),
        None => config
            .latex
            .template
            .as_deref()
            .map(expand_home)
            .transpose()?,
    };

    Ok(PipelineConfig {
        index_path,
        vault_dir,
        note_extension: config.defaults.note_extension.clone(),
        output_path,
        template_path,
    })
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_generate(
    tasting: &Path,
    vault: Option<&Path>,
    output: Option<&Path>,
    template: Option<&Path>,
    tex_only: bool,
) -> Result<()> {
    let config = load_config()?;
    let pipeline_config = pipeline_config(&config, tasting, vault, output, template)?;

    println!("Extracting data from: {}", pipeline_config.index_path.display());
    info!(
        vault = %pipeline_config.vault_dir.display(),
        output = %pipeline_config.output_path.display(),
        "generating tasting document"
    );

    let reporter = CliProgress::new();
    let outcome = pipeline::generate(&pipeline_config, &reporter).await?;

    let result = match outcome {
        Outcome::Assembled(result) => result,
        Outcome::NoReferences { index_path } => {
            println!("[!!] No file links were found in {}", index_path.display());
            return Err(eyre!("nothing to generate"));
        }
        Outcome::Rejected(failures) => {
            for failure in &failures {
                println!("{}", latex::diagnostic(failure));
            }
            return Err(eyre!("{} whisky note(s) could not be used", failures.len()));
        }
    };

    println!(
        "Generated TEX file {} ({} whiskies)",
        result.output_path.display(),
        result.record_count
    );

    if tex_only {
        return Ok(());
    }

    println!("Generating PDF file");
    let render_config = RenderConfig::from_app_config(&config)?;
    let rendered = render::render_pdf(&result.output_path, &render_config).await?;

    if rendered.success {
        println!("PDF written to {}", rendered.pdf_path.display());
        Ok(())
    } else {
        Err(eyre!(
            "`{}` exited with {} (see its output above)",
            render_config.compiler,
            rendered
                .exit_code
                .map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
        ))
    }
}

async fn cmd_check(tasting: &Path, vault: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config()?;
    let vault_dir = resolve_vault(&config, vault)?;
    let index_path = pipeline::resolve_index_path(&vault_dir, tasting);

    let results =
        pipeline::check(&index_path, &vault_dir, &config.defaults.note_extension).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    if results.is_empty() {
        if !json {
            println!("[!!] No file links were found in {}", index_path.display());
        }
        return Err(eyre!("no whisky notes linked"));
    }

    let mut failed = 0;
    for result in &results {
        match result {
            ParseResult::Record(record) if !json => println!("\tFound: {}", record.name),
            ParseResult::Record(_) => {}
            ParseResult::Failure(failure) => {
                failed += 1;
                if !json {
                    println!("{}", latex::diagnostic(failure));
                }
            }
        }
    }

    if failed > 0 {
        return Err(eyre!("{failed} of {} whisky note(s) could not be used", results.len()));
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created config file: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let path = config_file_path()?;
    let config = load_config()?;

    println!("# {}", path.display());
    print!("{}", render_config(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn references_found(&self, count: usize) {
        self.spinner.set_message(format!("Found {count} linked whisky notes"));
    }

    fn record_accepted(&self, record: &Record) {
        self.spinner.println(format!("\tFound: {}", record.name));
    }

    fn done(&self, _outcome: &Outcome) {
        self.spinner.finish_and_clear();
    }
}
