//! Configuration loading and discovery for `collage.toml`
//!
//! Provides functions to find, load and validate configuration.

use super::schema::{BackgroundConfig, CollageConfig, ProjectConfig};
use crate::pixel::DEFAULT_MAX_VALUE;
use log::debug;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up during discovery.
pub const CONFIG_FILE: &str = "collage.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse collage.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Find collage.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for collage.toml
/// 2. Check XDG_CONFIG_HOME/collager/collage.toml (or ~/.config/collager/collage.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("collager").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find collage.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a collage.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns a default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("poster/collage.toml")))?;
/// let project = Project::from_config(&config)?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<CollageConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            debug!("No {} found, using defaults", CONFIG_FILE);
            Ok(default_config())
        }
    }
}

fn load_config_file(path: &Path) -> Result<CollageConfig, ConfigError> {
    debug!("Loading config from {}", path.display());
    let contents = fs::read_to_string(path)?;
    let config: CollageConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Create a default configuration when no collage.toml is found.
///
/// The project name is taken from the current directory name, with
/// whitespace replaced by dashes.
pub fn default_config() -> CollageConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().replace(char::is_whitespace, "-")))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "untitled".to_string());

    CollageConfig {
        project: ProjectConfig { name: project_name, width: 100, height: 100, max_value: DEFAULT_MAX_VALUE },
        background: BackgroundConfig::default(),
    }
}
