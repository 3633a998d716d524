//! Layers: fixed-size pixel grids with an assigned filter
//!
//! A layer keeps two grids of identical shape. The baseline grid holds the
//! unfiltered content; the display grid holds the baseline with the assigned
//! filter applied. Assigning a filter without recomputing leaves the display
//! grid stale until [`Layer::refresh`] runs.
//!
//! Grids are stored flat in row-major order, row 0 at the top.

use crate::error::{CollageError, Result};
use crate::filter::Filter;
use crate::pixel::Pixel;
use log::debug;

/// Filter bookkeeping for the display grid.
#[derive(Debug, Clone, PartialEq)]
struct FilterState {
    assigned: Filter,
    display: Vec<Pixel>,
    /// True when `display` does not reflect `assigned` over the baseline
    dirty: bool,
}

/// A named grid of pixels occupying one depth position in a project.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: String,
    height: usize,
    width: usize,
    baseline: Vec<Pixel>,
    state: FilterState,
}

impl Layer {
    /// Create a layer from a row-major grid. The display grid starts as a
    /// copy of the grid with the `normal` filter.
    pub fn new(name: impl Into<String>, grid: Vec<Vec<Pixel>>, height: usize, width: usize) -> Result<Layer> {
        Layer::with_filter(name, grid, Filter::Normal, height, width)
    }

    /// Create a layer with a recorded filter.
    ///
    /// The filter is recorded but not applied: the display grid starts as a
    /// copy of the grid and the layer is dirty unless the filter is `normal`.
    pub fn with_filter(
        name: impl Into<String>,
        grid: Vec<Vec<Pixel>>,
        filter: Filter,
        height: usize,
        width: usize,
    ) -> Result<Layer> {
        let name = name.into();
        validate_name("Layer", &name)?;
        if height == 0 {
            return Err(CollageError::InvalidDimension { field: "Layer height" });
        }
        if width == 0 {
            return Err(CollageError::InvalidDimension { field: "Layer width" });
        }
        if grid.len() != height {
            return Err(CollageError::RowCountMismatch { layer: name, expected: height, actual: grid.len() });
        }
        if let Some((row, cells)) = grid.iter().enumerate().find(|(_, cells)| cells.len() != width) {
            return Err(CollageError::RowWidthMismatch { layer: name, row, expected: width, actual: cells.len() });
        }

        let baseline: Vec<Pixel> = grid.into_iter().flatten().collect();
        Ok(Layer::from_flat(name, height, width, baseline, filter))
    }

    /// A layer where every pixel is `fill`.
    pub fn filled(name: impl Into<String>, height: usize, width: usize, fill: Pixel) -> Result<Layer> {
        Layer::new(name, vec![vec![fill; width]; height], height, width)
    }

    fn from_flat(name: String, height: usize, width: usize, baseline: Vec<Pixel>, filter: Filter) -> Layer {
        let display = baseline.clone();
        Layer {
            name,
            height,
            width,
            baseline,
            state: FilterState { assigned: filter, display, dirty: filter != Filter::Normal },
        }
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

    /// The assigned filter.
    pub fn filter(&self) -> Filter {
        self.state.assigned
    }

    /// Whether the display grid lags behind the assigned filter or baseline.
    pub fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(CollageError::OutOfBounds { row, col, height: self.height, width: self.width });
        }
        Ok(row * self.width + col)
    }

    /// Pixel of the display grid.
    pub fn get_pixel(&self, row: usize, col: usize) -> Result<&Pixel> {
        let index = self.index(row, col)?;
        Ok(&self.state.display[index])
    }

    /// Pixel of the unfiltered baseline grid.
    pub fn get_original_pixel(&self, row: usize, col: usize) -> Result<&Pixel> {
        let index = self.index(row, col)?;
        Ok(&self.baseline[index])
    }

    /// The context pixel for `(row, col)`: the baseline pixel in the same
    /// column one row down. `None` on the bottom row or off the grid.
    pub fn context_pixel(&self, row: usize, col: usize) -> Option<&Pixel> {
        if row + 1 >= self.height || col >= self.width {
            return None;
        }
        self.baseline.get((row + 1) * self.width + col)
    }

    /// Rows of the display grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.state.display.chunks(self.width)
    }

    /// Rows of the baseline grid, top to bottom.
    pub fn original_rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.baseline.chunks(self.width)
    }

    /// A nested copy of the baseline grid.
    pub fn pixel_grid_copy(&self) -> Vec<Vec<Pixel>> {
        self.original_rows().map(<[Pixel]>::to_vec).collect()
    }

    /// A nested copy of the display grid.
    pub fn display_grid_copy(&self) -> Vec<Vec<Pixel>> {
        self.rows().map(<[Pixel]>::to_vec).collect()
    }

    /// Assign `filter` and rebuild the display grid from the baseline.
    pub fn apply_filter(&mut self, filter: Filter) {
        self.state.assigned = filter;
        self.refresh();
    }

    /// Record `filter` without recomputing; the layer becomes dirty.
    pub fn set_filter(&mut self, filter: Filter) {
        if filter != self.state.assigned {
            self.state.dirty = true;
        }
        self.state.assigned = filter;
    }

    /// Rebuild the display grid by applying the assigned filter to a copy of
    /// every baseline pixel.
    pub fn refresh(&mut self) {
        let filter = self.state.assigned;
        debug!("Rebuilding layer '{}' ({}x{}) with filter {}", self.name, self.height, self.width, filter);

        let mut display = self.baseline.clone();
        if filter != Filter::Normal {
            for row in 0..self.height {
                for col in 0..self.width {
                    let context = self.context_pixel(row, col);
                    display[row * self.width + col].apply(filter, context);
                }
            }
        }
        self.state.display = display;
        self.state.dirty = false;
    }

    /// Stamp `image` onto this layer with its top-left corner at row `x`,
    /// column `y`.
    ///
    /// Each stamped cell is `image[i][j]` composited over the current display
    /// pixel and written into the baseline grid, so the next refresh derives
    /// from the stamped content. The display grid is left stale.
    pub fn add_img(&mut self, image: &[Vec<Pixel>], x: usize, y: usize) -> Result<()> {
        let image_height = image.len();
        let image_width = image.first().map_or(0, Vec::len);
        if image_height == 0 || image_width == 0 {
            return Err(CollageError::EmptyImage);
        }
        if x > self.height || y > self.width {
            return Err(CollageError::PositionOffLayer { x, y, height: self.height, width: self.width });
        }
        if let Some((row, cells)) = image.iter().enumerate().find(|(_, cells)| cells.len() != image_width) {
            return Err(CollageError::RaggedImage { row, expected: image_width, actual: cells.len() });
        }
        if x + image_height > self.height || y + image_width > self.width {
            return Err(CollageError::PlacementOverflow {
                image: (image_height, image_width),
                x,
                y,
                height: self.height,
                width: self.width,
            });
        }

        for (i, cells) in image.iter().enumerate() {
            for (j, pixel) in cells.iter().enumerate() {
                let index = (x + i) * self.width + (y + j);
                self.baseline[index] = pixel.merge(&self.state.display[index]);
            }
        }
        self.state.dirty = true;

        debug!(
            "Stamped {}x{} image onto layer '{}' at ({}, {})",
            image_height, image_width, self.name, x, y
        );
        Ok(())
    }

    /// Composite `above` over this layer.
    ///
    /// Returns a new unfiltered layer named after `above` with this layer's
    /// dimensions; neither input changes.
    pub fn merge_layers(&self, above: &Layer) -> Result<Layer> {
        if above.height != self.height || above.width != self.width {
            return Err(CollageError::DimensionMismatch {
                layer: above.name.clone(),
                expected: (self.height, self.width),
                actual: (above.height, above.width),
            });
        }

        let merged: Vec<Pixel> = above
            .state
            .display
            .iter()
            .zip(&self.state.display)
            .map(|(upper, lower)| upper.merge(lower))
            .collect();

        Ok(Layer::from_flat(above.name.clone(), self.height, self.width, merged, Filter::Normal))
    }

    /// A `normal` layer whose baseline is this layer's display grid.
    pub fn flattened(&self) -> Layer {
        Layer::from_flat(self.name.clone(), self.height, self.width, self.state.display.clone(), Filter::Normal)
    }

    /// This layer under a different name.
    pub fn renamed(mut self, name: impl Into<String>) -> Layer {
        self.name = name.into();
        self
    }

    /// A rebuilt copy: baseline pixels and recorded filter carried over, the
    /// display grid reset to the baseline (dirty when a filter is assigned).
    pub fn rebuilt(&self) -> Layer {
        Layer::from_flat(self.name.clone(), self.height, self.width, self.baseline.clone(), self.state.assigned)
    }
}

/// Names are written as single tokens in project files.
pub(crate) fn validate_name(what: &'static str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CollageError::EmptyName { what });
    }
    if name.chars().any(char::is_whitespace) {
        return Err(CollageError::WhitespaceInName { what, name: name.to_string() });
    }
    Ok(())
}
