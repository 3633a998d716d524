//! Projects: ordered layer stacks flattened into a single image

use crate::config::CollageConfig;
use crate::error::{CollageError, Result};
use crate::filter::Filter;
use crate::format;
use crate::layer::{validate_name, Layer};
use crate::pixel::{Pixel, DEFAULT_MAX_VALUE};
use log::{info, warn};
use std::borrow::Cow;

/// Name of the implicit bottom layer every new project starts with.
pub const BACKGROUND_LAYER: &str = "background";

/// An ordered stack of equally sized layers.
///
/// Index 0 is the bottom-most layer; later layers paint over earlier ones.
/// Layer names are unique within a project.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    name: String,
    height: usize,
    width: usize,
    max_value: u16,
    layers: Vec<Layer>,
}

impl Project {
    /// A project with the default maximum channel value of 255.
    pub fn new(name: impl Into<String>, height: usize, width: usize) -> Result<Project> {
        Project::with_max_value(name, height, width, DEFAULT_MAX_VALUE)
    }

    /// A project whose implicit background is fully transparent white.
    pub fn with_max_value(name: impl Into<String>, height: usize, width: usize, max_value: u16) -> Result<Project> {
        let background = Pixel::rgb_with_max(max_value, max_value, max_value, 0, max_value)?;
        Project::with_background(name, height, width, max_value, BACKGROUND_LAYER, background)
    }

    /// A project built from a loaded `collage.toml`.
    pub fn from_config(config: &CollageConfig) -> Result<Project> {
        let project = &config.project;
        let background = &config.background;
        let [r, g, b] = background.color_or_white(project.max_value);
        let fill = Pixel::rgb_with_max(r, g, b, background.alpha, project.max_value)?;
        Project::with_background(&project.name, project.height, project.width, project.max_value, &background.name, fill)
    }

    fn with_background(
        name: impl Into<String>,
        height: usize,
        width: usize,
        max_value: u16,
        background_name: &str,
        fill: Pixel,
    ) -> Result<Project> {
        let name = name.into();
        validate_header(&name, height, width, max_value)?;
        let background = Layer::filled(background_name, height, width, fill)?;
        Ok(Project { name, height, width, max_value, layers: vec![background] })
    }

    /// Reconstruct a project from an existing layer stack, bottom first.
    ///
    /// No implicit background is added; the first layer plays that role.
    pub fn from_layers(
        name: impl Into<String>,
        height: usize,
        width: usize,
        max_value: u16,
        layers: Vec<Layer>,
    ) -> Result<Project> {
        let name = name.into();
        validate_header(&name, height, width, max_value)?;
        if layers.is_empty() {
            return Err(CollageError::NoLayers);
        }
        for (i, layer) in layers.iter().enumerate() {
            if layer.height() != height || layer.width() != width {
                return Err(CollageError::DimensionMismatch {
                    layer: layer.name().to_string(),
                    expected: (height, width),
                    actual: (layer.height(), layer.width()),
                });
            }
            if layers[..i].iter().any(|other| other.name() == layer.name()) {
                return Err(CollageError::DuplicateLayer { name: layer.name().to_string() });
            }
        }
        Ok(Project { name, height, width, max_value, layers })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// Layers from bottom to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Find a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name() == name)
    }

    fn layer_mut(&mut self, name: &str) -> Result<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|layer| layer.name() == name)
            .ok_or_else(|| CollageError::LayerNotFound { name: name.to_string() })
    }

    /// Append a fully transparent white layer on top of the stack.
    pub fn add_layer(&mut self, name: &str) -> Result<()> {
        if self.layer(name).is_some() {
            return Err(CollageError::DuplicateLayer { name: name.to_string() });
        }
        let max = self.max_value;
        let fill = Pixel::rgb_with_max(max, max, max, 0, max)?;
        let layer = Layer::filled(name, self.height, self.width, fill)?;

        info!("Added layer '{}' to project '{}' at depth {}", name, self.name, self.layers.len());
        self.layers.push(layer);
        Ok(())
    }

    /// Stamp `image` onto the named layer with its top-left corner at row
    /// `x`, column `y`.
    ///
    /// Image pixels are converted to RGB at the project's channel depth
    /// before compositing, so every layer stays within `0..=max_value`.
    pub fn add_layer_img(&mut self, layer_name: &str, image: &[Vec<Pixel>], x: usize, y: usize) -> Result<()> {
        let max_value = self.max_value;
        let layer = self.layer_mut(layer_name)?;
        let (height, width) = (layer.height(), layer.width());

        if x > height || y > width {
            return Err(CollageError::PositionOffLayer { x, y, height, width });
        }

        let image_height = image.len();
        let image_width = image.first().map_or(0, Vec::len);
        if image_height == 0 || image_width == 0 {
            return Err(CollageError::EmptyImage);
        }
        if let Some((row, cells)) = image.iter().enumerate().find(|(_, cells)| cells.len() != image_width) {
            return Err(CollageError::RaggedImage { row, expected: image_width, actual: cells.len() });
        }
        if image_height * image_width > height * width {
            return Err(CollageError::ImageTooLarge {
                image_pixels: image_height * image_width,
                layer_pixels: height * width,
            });
        }
        if height - x < image_height || width - y < image_width {
            return Err(CollageError::PlacementOverflow { image: (image_height, image_width), x, y, height, width });
        }

        let image: Vec<Vec<Pixel>> = image
            .iter()
            .map(|row| row.iter().map(|pixel| Pixel::from(pixel.to_rgb().rescaled(max_value))).collect())
            .collect();
        layer.add_img(&image, x, y)
    }

    /// Assign `filter` to the named layer and recompute its display grid.
    pub fn apply_filter_to_layer(&mut self, filter: Filter, layer_name: &str) -> Result<()> {
        self.layer_mut(layer_name)?.apply_filter(filter);
        Ok(())
    }

    /// Record `filter` on the named layer without recomputing; the display
    /// grid catches up on the next refresh or flatten.
    pub fn set_layer_filter(&mut self, filter: Filter, layer_name: &str) -> Result<()> {
        self.layer_mut(layer_name)?.set_filter(filter);
        Ok(())
    }

    /// Recompute the display grid of every layer with its recorded filter.
    pub fn refresh_all(&mut self) {
        for layer in &mut self.layers {
            layer.refresh();
        }
    }

    /// Flatten the stack into one layer.
    ///
    /// Every layer is first refreshed with its own filter. The background at
    /// index 0 is skipped; layers from index 1 upward are composited bottom
    /// first, each new layer over the accumulated result. A project holding
    /// only its background returns that layer borrowed, without copying.
    /// Otherwise the result carries the `normal` filter.
    pub fn compress_to_image(&mut self, name: &str) -> Result<Cow<'_, Layer>> {
        validate_name("Layer", name)?;
        self.refresh_all();

        if self.layers.len() == 1 {
            warn!("Project '{}' has no layers above its background", self.name);
            return Ok(Cow::Borrowed(&self.layers[0]));
        }

        info!("Flattening {} layers of project '{}'", self.layers.len() - 1, self.name);
        let mut flattened = self.layers[1].flattened();
        for layer in &self.layers[2..] {
            flattened = flattened.merge_layers(layer)?;
        }
        Ok(Cow::Owned(flattened.renamed(name)))
    }

    /// Rebuilt copies of every layer: baseline pixels and recorded filters,
    /// with display grids reset to the baseline.
    pub fn snapshot(&self) -> Vec<Layer> {
        self.layers.iter().map(Layer::rebuilt).collect()
    }

    /// The project in its plain-text file form.
    pub fn format_project(&self) -> String {
        format::write_project(self)
    }
}

fn validate_header(name: &str, height: usize, width: usize, max_value: u16) -> Result<()> {
    validate_name("Project", name)?;
    if height == 0 {
        return Err(CollageError::InvalidDimension { field: "Project height" });
    }
    if width == 0 {
        return Err(CollageError::InvalidDimension { field: "Project width" });
    }
    if max_value == 0 {
        return Err(CollageError::InvalidMaxValue(max_value));
    }
    Ok(())
}
