//! Configuration management with layered hierarchy

use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::error::{ObfuscateError, Result};
use crate::document::xml::xml_name;
use crate::document::WriteOptions;
use crate::transform::dates::{self, DEFAULT_OUTPUT_FORMATS};
use crate::transform::NameStyle;

/// Default indent width for JSON and XML output
pub const DEFAULT_INDENT: usize = 4;

/// Largest indent accepted from config
const MAX_INDENT: usize = 16;

/// DFO configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fixed seed for reproducible output
    pub seed: Option<u64>,

    /// Field name generation style
    pub name_style: Option<NameStyle>,

    /// Output pool for date reformatting (chrono strftime patterns)
    pub date_formats: Option<Vec<String>>,

    /// Indent width for JSON and XML output
    pub indent: Option<usize>,

    /// XML root element name when the input has none
    pub root_element: Option<String>,

    /// XML element name for list items
    pub item_element: Option<String>,
}

/// Fully resolved settings for a run
#[derive(Debug, Clone)]
pub struct Settings {
    pub seed: Option<u64>,
    pub name_style: NameStyle,
    pub date_formats: Vec<String>,
    pub write: WriteOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            name_style: NameStyle::default(),
            date_formats: DEFAULT_OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect(),
            write: WriteOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// An explicit config file must exist and parse; the global user config
    /// is skipped with a warning when it is broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/dfo/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                match Self::from_file(&global_path) {
                    Ok(global) => {
                        debug!(path = %global_path.display(), "loaded global config");
                        config.merge(global);
                    }
                    Err(e) => warn!("ignoring global config: {}", e),
                }
            }
        }

        // 3. Explicit config file (--config)
        if let Some(path) = explicit {
            config.merge(Self::from_file(path)?);
            debug!(path = %path.display(), "loaded config file");
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Read a single config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ObfuscateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str(&contents).map_err(|e| ObfuscateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dfo")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Apply `DFO_SEED` and `DFO_NAME_STYLE` from the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup("DFO_SEED") {
            let seed = seed.trim().parse::<u64>().map_err(|_| ObfuscateError::Argument {
                message: format!("DFO_SEED must be an unsigned integer, got '{}'", seed),
                help: None,
            })?;
            self.seed = Some(seed);
        }
        if let Some(style) = lookup("DFO_NAME_STYLE") {
            let style = NameStyle::from_str(style.trim(), true).map_err(|_| {
                ObfuscateError::Argument {
                    message: format!("DFO_NAME_STYLE must be 'shape' or 'words', got '{}'", style),
                    help: None,
                }
            })?;
            self.name_style = Some(style);
        }
        Ok(())
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.name_style.is_some() {
            self.name_style = other.name_style;
        }
        if other.date_formats.is_some() {
            self.date_formats = other.date_formats;
        }
        if other.indent.is_some() {
            self.indent = other.indent;
        }
        if other.root_element.is_some() {
            self.root_element = other.root_element;
        }
        if other.item_element.is_some() {
            self.item_element = other.item_element;
        }
    }

    /// Validate and resolve into run settings
    pub fn settings(&self) -> Result<Settings> {
        let defaults = Settings::default();

        let date_formats = match &self.date_formats {
            Some(formats) if formats.is_empty() => {
                return Err(ObfuscateError::argument("date_formats must not be empty"))
            }
            Some(formats) => {
                for pattern in formats {
                    dates::validate_format(pattern).map_err(ObfuscateError::argument)?;
                }
                formats.clone()
            }
            None => defaults.date_formats,
        };

        let indent = self.indent.unwrap_or(DEFAULT_INDENT);
        if indent > MAX_INDENT {
            return Err(ObfuscateError::argument(format!(
                "indent must be at most {}, got {}",
                MAX_INDENT, indent
            )));
        }

        let root_element = element_setting("root_element", &self.root_element, "root")?;
        let item_element = element_setting("item_element", &self.item_element, "item")?;

        Ok(Settings {
            seed: self.seed,
            name_style: self.name_style.unwrap_or_default(),
            date_formats,
            write: WriteOptions {
                indent,
                root_element,
                item_element,
            },
        })
    }
}

fn element_setting(field: &str, value: &Option<String>, default: &str) -> Result<String> {
    match value {
        None => Ok(default.to_string()),
        Some(name) if xml_name(name) == *name => Ok(name.clone()),
        Some(name) => Err(ObfuscateError::Argument {
            message: format!("{} '{}' is not a valid XML element name", field, name),
            help: Some(format!("try '{}'", xml_name(name))),
        }),
    }
}
