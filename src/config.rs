use std::path::{Path, PathBuf};

use dirs::home_dir;
use log::error;
use thiserror::Error;

const CONFIG_ENV: &str = "RANGEBAND_CONFIG";
const CONFIG_FILE: &str = "config.json";

const DEFAULT_WINDOW_WIDTH: f32 = 420.0;
const DEFAULT_WINDOW_HEIGHT: f32 = 460.0;
const DEFAULT_STEP_VALUE: f32 = 5.0;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config file: {0}")]
  Io(#[from] std::io::Error),
  #[error("Failed to parse config file: {0}")]
  Parse(#[from] serde_json::Error),
}

/// Settings for the demo application, merged from the environment, a
/// config file and built-in defaults, in that order.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
  pub config_path: Option<PathBuf>,
  pub window_width: Option<f32>,
  pub window_height: Option<f32>,
  /// Report value changes every frame while dragging.
  pub continuous_updates: Option<bool>,
  /// Step used by the stepped demo slider.
  pub step_value: Option<f32>,
}

impl Config {
  #[must_use]
  pub fn new() -> Self {
    let from_env = Self::from_env();
    let from_file = Self::from_file();
    let default = Self::default();

    let mut merged = from_env;
    if let Some(from_file) = &from_file {
      merged = merged.merge(from_file);
    }
    merged = merged.merge(&default);

    if merged.config_path.is_some() && from_file.is_none() {
      merged.init_cfg_file();
    }

    merged
  }

  /// Load a config from a specific file instead of the search path.
  ///
  /// # Errors
  /// Fails when the file cannot be read or parsed.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
  }

  #[must_use]
  pub fn window_size(&self) -> (f32, f32) {
    (
      self.window_width.unwrap_or(DEFAULT_WINDOW_WIDTH),
      self.window_height.unwrap_or(DEFAULT_WINDOW_HEIGHT),
    )
  }

  #[must_use]
  pub fn continuous_updates(&self) -> bool {
    self.continuous_updates.unwrap_or(true)
  }

  #[must_use]
  pub fn step_value(&self) -> f32 {
    self.step_value.unwrap_or(DEFAULT_STEP_VALUE)
  }

  fn from_env() -> Self {
    let config_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
    Self {
      config_path,
      window_width: None,
      window_height: None,
      continuous_updates: None,
      step_value: None,
    }
  }

  fn merge(mut self, other: &Self) -> Self {
    self.config_path = self.config_path.or(other.config_path.clone());
    self.window_width = self.window_width.or(other.window_width);
    self.window_height = self.window_height.or(other.window_height);
    self.continuous_updates = self.continuous_updates.or(other.continuous_updates);
    self.step_value = self.step_value.or(other.step_value);
    self
  }

  fn from_file() -> Option<Self> {
    let config_path = std::env::var(CONFIG_ENV)
      .ok()
      .map(PathBuf::from)
      .or_else(|| home_dir().map(|p| p.join(".config").join("rangeband")))?;

    Self::from_path(&config_path.join(CONFIG_FILE))
      .inspect_err(|e| {
        // A missing file is the common first-run case.
        if !matches!(e, ConfigError::Io(_)) {
          error!("{e}");
        }
      })
      .ok()
  }

  fn init_cfg_file(&self) {
    let Some(path) = &self.config_path else {
      return;
    };
    if !path.exists() {
      let _ = std::fs::create_dir_all(path).inspect_err(|e| {
        error!("Failed to create config directory: {e}");
      });
    }

    let file = path.join(CONFIG_FILE);
    if !file.exists() {
      match serde_json::to_string_pretty(self) {
        Ok(config) => {
          let _ = std::fs::write(file, config).inspect_err(|e| {
            error!("Failed to write config file: {e}");
          });
        }
        Err(e) => error!("Failed to serialize config: {e}"),
      }
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      config_path: home_dir().map(|p| p.join(".config").join("rangeband")),
      window_width: Some(DEFAULT_WINDOW_WIDTH),
      window_height: Some(DEFAULT_WINDOW_HEIGHT),
      continuous_updates: Some(true),
      step_value: Some(DEFAULT_STEP_VALUE),
    }
  }
}
