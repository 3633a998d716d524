//! Collager - Library for building layered raster collages
//!
//! This library provides functionality to:
//! - Represent pixels in RGB or HSL with alpha and convert between them
//! - Stack named layers, apply per-pixel filters and stamp images onto them
//! - Flatten a project's layer stack into a single image
//! - Save and load projects as plain text, export layers to PPM and PNG

pub mod color;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod layer;
pub mod output;
pub mod pixel;
pub mod project;

pub use error::{CollageError, Result};
pub use filter::Filter;
pub use layer::Layer;
pub use pixel::{Hsl, Pixel, Rgb};
pub use project::Project;
