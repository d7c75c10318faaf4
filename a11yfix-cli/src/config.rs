//! Configuration file loading for a11yfix.
//!
//! Discovers and loads `a11yfix.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "a11yfix.toml";

/// Scan root used when neither the CLI nor the config file name one.
pub const DEFAULT_ROOT: &str = "src";

/// Markup extension used when neither the CLI nor the config file name one.
pub const DEFAULT_EXTENSION: &str = "tsx";

/// Top-level configuration from a11yfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct A11yfixConfig {
    /// What to scan.
    pub scan: ScanSection,

    /// Directory holding the config file; relative `scan.root` resolves against it.
    #[serde(skip)]
    pub base_dir: Option<Utf8PathBuf>,
}

/// Scan section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Directory to walk.
    pub root: Option<Utf8PathBuf>,

    /// File extension, with or without the leading dot.
    pub extension: Option<String>,

    /// Never write files.
    pub dry_run: bool,
}

/// Discover the a11yfix.toml config file.
///
/// Returns `None` if no config file is found in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse an a11yfix.toml config file.
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<A11yfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    let mut config =
        parse_config(&contents).with_context(|| format!("parse config file {}", path))?;
    config.base_dir = path
        .parent()
        .filter(|p| !p.as_str().is_empty() && p.as_str() != ".")
        .map(Utf8Path::to_path_buf);
    Ok(config)
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<A11yfixConfig> {
    let config: A11yfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<A11yfixConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(A11yfixConfig::default()),
    }
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub root: Utf8PathBuf,

    /// Extension without the leading dot.
    pub extension: String,

    pub dry_run: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: A11yfixConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: A11yfixConfig) -> Self {
        Self { config }
    }

    /// Merge with CLI arguments.
    ///
    /// CLI values replace config file values; `--dry-run` can only turn dry-run on.
    pub fn merge_cli_args(
        self,
        cli_root: Option<Utf8PathBuf>,
        cli_extension: Option<String>,
        cli_dry_run: bool,
    ) -> anyhow::Result<MergedConfig> {
        let root = match cli_root {
            Some(root) => root,
            None => match (self.config.scan.root, self.config.base_dir) {
                (Some(root), Some(base)) if root.is_relative() => base.join(root),
                (Some(root), _) => root,
                (None, _) => Utf8PathBuf::from(DEFAULT_ROOT),
            },
        };

        let extension = cli_extension
            .or(self.config.scan.extension)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        let extension = extension.trim().trim_start_matches('.').to_string();
        if extension.is_empty() {
            bail!("file extension must not be empty");
        }

        Ok(MergedConfig {
            root,
            extension,
            dry_run: cli_dry_run || self.config.scan.dry_run,
        })
    }
}
