//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/astree/astree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `ASTREE_*` prefix, `__` between sections
//!    (e.g. `ASTREE_TEXT__INDENT=2`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, GraphStyle, TextStyle};

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "ASTREE";

const RANKDIRS: [&str; 4] = ["TB", "LR", "BT", "RL"];

/// Widest accepted `text.indent`.
pub const MAX_INDENT: usize = 32;

/// Raw text settings for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawTextStyle {
    pub indent: Option<usize>,
    pub show_payload: Option<bool>,
}

/// Raw graph settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawGraphStyle {
    pub name: Option<String>,
    pub node_shape: Option<String>,
    pub rankdir: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub text: RawTextStyle,
    pub graph: RawGraphStyle,
}

/// Unified configuration for astree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Indented text rendering
    pub text: TextStyle,
    /// Graphviz rendering
    pub graph: GraphStyle,
}

/// Get the XDG config directory for astree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "astree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("astree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Read one key from the env source; unset keys are `None`, malformed ones an error.
fn env_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            text: TextStyle {
                indent: overlay.text.indent.unwrap_or(self.text.indent),
                show_payload: overlay.text.show_payload.unwrap_or(self.text.show_payload),
            },
            graph: GraphStyle {
                name: overlay
                    .graph
                    .name
                    .clone()
                    .unwrap_or_else(|| self.graph.name.clone()),
                node_shape: overlay
                    .graph
                    .node_shape
                    .clone()
                    .unwrap_or_else(|| self.graph.node_shape.clone()),
                rankdir: overlay
                    .graph
                    .rankdir
                    .clone()
                    .unwrap_or_else(|| self.graph.rankdir.clone()),
            },
        }
    }

    /// Load settings with layered precedence, reading `ASTREE_*` overrides.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(config_file, ENV_PREFIX)
    }

    /// Same as [`Settings::load`] with a custom environment prefix.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env_prefix: &str,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            debug!("config file: {}", path.display());
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current, env_prefix)?;

        current.validate()?;
        Ok(current)
    }

    fn apply_env_overrides(mut settings: Self, prefix: &str) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "text.indent")? {
            settings.text.indent = val;
        }
        if let Some(val) = env_value(&config, "text.show_payload")? {
            settings.text.show_payload = val;
        }
        if let Some(val) = env_value(&config, "graph.name")? {
            settings.graph.name = val;
        }
        if let Some(val) = env_value(&config, "graph.node_shape")? {
            settings.graph.node_shape = val;
        }
        if let Some(val) = env_value(&config, "graph.rankdir")? {
            settings.graph.rankdir = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.text.indent > MAX_INDENT {
            return Err(ApplicationError::Config {
                message: format!(
                    "text.indent must be at most {}, got {}",
                    MAX_INDENT, self.text.indent
                ),
            });
        }
        if !RANKDIRS.contains(&self.graph.rankdir.as_str()) {
            return Err(ApplicationError::Config {
                message: format!(
                    "graph.rankdir must be one of {}, got {:?}",
                    RANKDIRS.join(", "),
                    self.graph.rankdir
                ),
            });
        }
        if self.graph.name.is_empty() {
            return Err(ApplicationError::Config {
                message: "graph.name must not be empty".into(),
            });
        }
        if self.graph.node_shape.is_empty()
            || !self.graph.node_shape.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ApplicationError::Config {
                message: format!("invalid graph.node_shape: {:?}", self.graph.node_shape),
            });
        }
        Ok(())
    }

    /// Render settings as TOML, e.g. for `astree config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
