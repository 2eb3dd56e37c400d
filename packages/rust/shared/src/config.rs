//! Application configuration for bottleneck.
//!
//! User config lives at `~/.bottleneck/bottleneck.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BottleneckError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "bottleneck.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".bottleneck";

// ---------------------------------------------------------------------------
// Config structs (matching bottleneck.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// LaTeX template and compiler settings.
    #[serde(default)]
    pub latex: LatexConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Obsidian vault holding the tasting and whisky notes.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Directory the generated `.tex` (and PDF) land in.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File extension of the whisky notes, without the dot.
    #[serde(default = "default_note_extension")]
    pub note_extension: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            output_dir: default_output_dir(),
            note_extension: default_note_extension(),
        }
    }
}

fn default_vault_dir() -> String {
    "~/Documents/vaults/whiskey".into()
}
fn default_output_dir() -> String {
    ".".into()
}
fn default_note_extension() -> String {
    "md".into()
}

/// `[latex]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatexConfig {
    /// Compiler executable.
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Custom template; the built-in one is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Extra directory the compiler searches for `.sty` files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_dir: Option<String>,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            template: None,
            include_dir: None,
        }
    }
}

fn default_compiler() -> String {
    "pdflatex".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.bottleneck/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BottleneckError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.bottleneck/bottleneck.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BottleneckError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        BottleneckError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BottleneckError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = render_config(&AppConfig::default())?;

    std::fs::write(&path, content).map_err(|e| BottleneckError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Serialize a config to pretty TOML.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| BottleneckError::config(e.to_string()))
}

/// Expand a leading `~/` against the user's home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match rest {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| {
                BottleneckError::config(format!("cannot expand '{path}': no home directory"))
            })?;
            Ok(if rest.is_empty() { home } else { home.join(rest) })
        }
        None => Ok(PathBuf::from(path)),
    }
}
