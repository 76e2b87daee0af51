//! Configuration file management for accordion.
//!
//! Provides a TOML-based config file at `~/.config/accordion/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.
//! A missing config file is not an error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use accordion_core::export::{DEFAULT_DATE_FORMAT, validate_date_format};
use accordion_core::{AnchorMode, Catalog, TaskTemplate};

pub const ENV_ANCHOR_MODE: &str = "ACCORDION_ANCHOR_MODE";
pub const ENV_DATE_FORMAT: &str = "ACCORDION_DATE_FORMAT";
pub const ENV_CATALOG: &str = "ACCORDION_CATALOG";
pub const ENV_TEMPLATE: &str = "ACCORDION_TEMPLATE";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub catalog: SourceSection,
    #[serde(default)]
    pub template: SourceSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScheduleSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_mode: Option<AnchorMode>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExportSection {
    /// strftime pattern for exported dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

/// Optional override file for the catalog or the template.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SourceSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl ConfigFile {
    /// The file `accordion init` writes: every default spelled out.
    pub fn with_defaults() -> Self {
        Self {
            schedule: ScheduleSection {
                anchor_mode: Some(AnchorMode::default()),
            },
            export: ExportSection {
                date_format: Some(DEFAULT_DATE_FORMAT.to_string()),
            },
            ..Self::default()
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the accordion config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/accordion` or
/// `~/.config/accordion`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("accordion");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("accordion")
}

/// Return the path to the accordion config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`. Returns `Ok(None)` if it does
/// not exist.
pub fn load_config(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct AccordionConfig {
    pub anchor_mode: AnchorMode,
    pub date_format: String,
    pub catalog: Catalog,
    pub template: TaskTemplate,
}

impl AccordionConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Anchor mode: `cli_mode` > `ACCORDION_ANCHOR_MODE` > `schedule.anchor_mode` > `forward_chaining`
    /// - Date format: `cli_date_format` > `ACCORDION_DATE_FORMAT` > `export.date_format` > `%-m/%-d/%Y`
    /// - Catalog: `ACCORDION_CATALOG` > `catalog.path` > embedded
    /// - Template: `ACCORDION_TEMPLATE` > `template.path` > embedded
    pub fn resolve(
        cli_mode: Option<AnchorMode>,
        cli_date_format: Option<&str>,
        cli_config: Option<&Path>,
    ) -> Result<Self> {
        let path = cli_config.map_or_else(config_path, Path::to_path_buf);
        let file_config = load_config(&path)?.unwrap_or_default();

        let anchor_mode = if let Some(mode) = cli_mode {
            mode
        } else if let Ok(raw) = std::env::var(ENV_ANCHOR_MODE) {
            raw.parse()
                .with_context(|| format!("{ENV_ANCHOR_MODE} env var is not a valid anchor mode"))?
        } else if let Some(mode) = file_config.schedule.anchor_mode {
            mode
        } else {
            AnchorMode::default()
        };

        let date_format = if let Some(fmt) = cli_date_format {
            fmt.to_string()
        } else if let Ok(fmt) = std::env::var(ENV_DATE_FORMAT) {
            fmt
        } else if let Some(fmt) = file_config.export.date_format {
            fmt
        } else {
            DEFAULT_DATE_FORMAT.to_string()
        };
        validate_date_format(&date_format)?;

        let catalog = match source_path(ENV_CATALOG, file_config.catalog.path) {
            Some(p) => Catalog::load(&p)
                .with_context(|| format!("failed to load catalog from {}", p.display()))?,
            None => Catalog::builtin(),
        };

        let template = match source_path(ENV_TEMPLATE, file_config.template.path) {
            Some(p) => TaskTemplate::load(&p)
                .with_context(|| format!("failed to load template from {}", p.display()))?,
            None => TaskTemplate::builtin(),
        };

        Ok(Self {
            anchor_mode,
            date_format,
            catalog,
            template,
        })
    }
}

fn source_path(env_var: &str, from_file: Option<PathBuf>) -> Option<PathBuf> {
    std::env::var_os(env_var).map(PathBuf::from).or(from_file)
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
