//! Configuration for perplexity-guard
//!
//! Values are layered, later sources overriding earlier ones:
//! - built-in defaults
//! - ~/.config/perplexity-guard/config.toml
//! - ./perplexity-guard.toml
//! - a file passed with `--config`
//! - command-line flags and their environment variables

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{DEFAULT_BAR_WIDTH, MAX_BAR_WIDTH};
use crate::error::{Error, Result};
use crate::Thresholds;

pub const PROJECT_CONFIG_FILE: &str = "perplexity-guard.toml";

/// One layer of settings; unset fields leave the lower layer untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub max_perplexity: Option<f64>,
    pub max_burstiness: Option<f64>,
    /// Plain-text reference corpus; relative paths resolve against the
    /// directory of the file that names them.
    pub corpus_path: Option<PathBuf>,
    pub bar_width: Option<usize>,
}

impl ConfigLayer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut layer: ConfigLayer = toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if let (Some(corpus), Some(dir)) = (&layer.corpus_path, path.parent()) {
            if corpus.is_relative() {
                layer.corpus_path = Some(dir.join(corpus));
            }
        }
        debug!(path = %path.display(), "loaded config layer");
        Ok(layer)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub thresholds: Thresholds,
    pub corpus_path: Option<PathBuf>,
    pub bar_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            corpus_path: None,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl Config {
    /// Load defaults, the user config, the project config in the current
    /// directory, then `explicit` if given. Missing implicit files are
    /// skipped; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        let implicit = [
            Self::user_config_path(),
            Some(PathBuf::from(PROJECT_CONFIG_FILE)),
        ];
        for path in implicit.into_iter().flatten().filter(|p| p.is_file()) {
            config.merge(ConfigLayer::from_file(&path)?)?;
        }

        if let Some(path) = explicit {
            config.merge(ConfigLayer::from_file(path)?)?;
        }

        Ok(config)
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("perplexity-guard").join("config.toml"))
    }

    /// Apply a layer on top of this config, validating the resulting thresholds.
    /// Bar width is clamped to `1..=MAX_BAR_WIDTH`.
    pub fn merge(&mut self, layer: ConfigLayer) -> Result<()> {
        let max_perplexity = layer
            .max_perplexity
            .unwrap_or(self.thresholds.max_perplexity);
        let max_burstiness = layer
            .max_burstiness
            .unwrap_or(self.thresholds.max_burstiness);
        self.thresholds = Thresholds::new(max_perplexity, max_burstiness)?;
        if layer.corpus_path.is_some() {
            self.corpus_path = layer.corpus_path;
        }
        if let Some(width) = layer.bar_width {
            self.bar_width = width.clamp(1, MAX_BAR_WIDTH);
        }
        Ok(())
    }
}
