//! Raster adapters between layers and 8-bit RGBA images, plus PNG output

use crate::error::{CollageError, Result};
use crate::layer::Layer;
use crate::pixel::Pixel;
use image::{Rgba, RgbaImage};
use log::debug;
use std::io;
use std::path::Path;

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding or decoding error
    Image(image::ImageError),
    /// Decoded image could not become a pixel grid
    Collage(CollageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
            OutputError::Collage(e) => write!(f, "Collage error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
            OutputError::Collage(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

impl From<CollageError> for OutputError {
    fn from(e: CollageError) -> Self {
        OutputError::Collage(e)
    }
}

/// Render a layer's display grid into an RGBA image.
///
/// Layer rows map to image y and columns to image x. Channels are rescaled
/// from each pixel's own depth to 8 bits.
pub fn layer_to_image(layer: &Layer) -> RgbaImage {
    let mut image = RgbaImage::new(layer.width() as u32, layer.height() as u32);
    for (row, cells) in layer.rows().enumerate() {
        for (col, pixel) in cells.iter().enumerate() {
            image.put_pixel(col as u32, row as u32, to_rgba8(pixel));
        }
    }
    image
}

fn to_rgba8(pixel: &Pixel) -> Rgba<u8> {
    let rgb = pixel.to_rgb();
    let max = f64::from(rgb.max_value().max(1));
    let scale = |c: u16| -> u8 { (f64::from(c) * 255.0 / max).round().clamp(0.0, 255.0) as u8 };
    Rgba([scale(rgb.red()), scale(rgb.green()), scale(rgb.blue()), scale(rgb.alpha())])
}

/// Convert an 8-bit RGBA image into a row-major pixel grid at `max_value`.
///
/// The result can be stamped onto a layer with `add_layer_img`.
pub fn grid_from_image(image: &RgbaImage, max_value: u16) -> Result<Vec<Vec<Pixel>>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(CollageError::EmptyImage);
    }

    let max = f64::from(max_value);
    let scale = |c: u8| -> u16 { (f64::from(c) * max / 255.0).round() as u16 };

    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
                    Pixel::rgb_with_max(scale(r), scale(g), scale(b), scale(a), max_value)
                })
                .collect()
        })
        .collect()
}

/// Decode an image file into a pixel grid at `max_value`.
pub fn load_image_grid(path: &Path, max_value: u16) -> std::result::Result<Vec<Vec<Pixel>>, OutputError> {
    let image = image::open(path)?.to_rgba8();
    debug!("Decoded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(grid_from_image(&image, max_value)?)
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> std::result::Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Render a layer and save it as PNG.
pub fn save_layer_png(layer: &Layer, path: &Path) -> std::result::Result<(), OutputError> {
    debug!("Writing layer '{}' to {}", layer.name(), path.display());
    save_png(&layer_to_image(layer), path)
}
