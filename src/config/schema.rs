//! Configuration schema types for `collage.toml`
//!
//! Defines the project defaults and background layer settings, plus their
//! validation rules.

use crate::pixel::DEFAULT_MAX_VALUE;
use crate::project::BACKGROUND_LAYER;
use serde::{Deserialize, Serialize};

/// Project metadata section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Canvas width in pixels
    #[serde(default = "default_size")]
    pub width: usize,
    /// Canvas height in pixels
    #[serde(default = "default_size")]
    pub height: usize,
    /// Maximum channel value shared by every layer
    #[serde(default = "default_max_value")]
    pub max_value: u16,
}

fn default_size() -> usize {
    100
}

fn default_max_value() -> u16 {
    DEFAULT_MAX_VALUE
}

/// Implicit background layer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    /// Name of the bottom layer
    #[serde(default = "default_background_name")]
    pub name: String,
    /// RGB fill; white at the project's max value when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u16; 3]>,
    /// Alpha of the fill
    #[serde(default)]
    pub alpha: u16,
}

fn default_background_name() -> String {
    BACKGROUND_LAYER.to_string()
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self { name: default_background_name(), color: None, alpha: 0 }
    }
}

impl BackgroundConfig {
    /// The configured color, or white for the given channel depth.
    pub fn color_or_white(&self, max_value: u16) -> [u16; 3] {
        self.color.unwrap_or([max_value; 3])
    }
}

/// Root configuration for `collage.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollageConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    /// Background layer settings
    #[serde(default)]
    pub background: BackgroundConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "background.alpha")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "collage.toml: '{}' {}", self.field, self.message)
    }
}

impl CollageConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        if self.project.name.is_empty() {
            push("project.name", "must be a non-empty string".to_string());
        } else if self.project.name.chars().any(char::is_whitespace) {
            push("project.name", "must not contain whitespace".to_string());
        }
        if self.project.width == 0 {
            push("project.width", "must be a positive integer".to_string());
        }
        if self.project.height == 0 {
            push("project.height", "must be a positive integer".to_string());
        }

        let max = self.project.max_value;
        if max == 0 {
            push("project.max_value", "must be a positive integer".to_string());
        }

        if self.background.name.is_empty() {
            push("background.name", "must be a non-empty string".to_string());
        } else if self.background.name.chars().any(char::is_whitespace) {
            push("background.name", "must not contain whitespace".to_string());
        }
        if let Some(color) = self.background.color {
            if color.iter().any(|&c| c > max) {
                push("background.color", format!("channels must not exceed max_value {}", max));
            }
        }
        if self.background.alpha > max {
            push("background.alpha", format!("must not exceed max_value {}", max));
        }

        errors
    }
}
