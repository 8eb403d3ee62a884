use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
///
/// Every field has a default; rotom runs fine with no config file at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Custom title for the header (defaults to the crate name)
  pub title: Option<String>,
  pub list: ListConfig,
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListConfig {
  /// How many entries one catalog page requests
  pub page_size: u32,
}

impl Default for ListConfig {
  fn default() -> Self {
    Self { page_size: 20 }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Persist API responses between runs
  pub enabled: bool,
  /// Override the directory holding the cache database
  pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      dir: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./rotom.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/rotom/config.yaml
  ///
  /// No file found means defaults, not an error.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("rotom.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("rotom").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_usable() {
    let config = Config::default();

    assert_eq!(config.list.page_size, 20);
    assert!(config.cache.enabled);
    assert!(config.cache.dir.is_none());
  }

  #[test]
  fn partial_yaml_fills_in_defaults() {
    let config: Config = serde_yaml::from_str("list:\n  page_size: 50\n").unwrap();

    assert_eq!(config.list.page_size, 50);
    assert!(config.cache.enabled);
    assert!(config.title.is_none());
  }

  #[test]
  fn cache_can_be_disabled() {
    let config: Config = serde_yaml::from_str("cache:\n  enabled: false\n").unwrap();

    assert!(!config.cache.enabled);
  }
}
