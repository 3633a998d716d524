//! Configuration module for collage projects
//!
//! Provides types, discovery and loading for `collage.toml`.

pub mod loader;
pub mod schema;

pub use loader::{default_config, find_config, find_config_from, load_config, ConfigError, CONFIG_FILE};
pub use schema::*;
