//! Error types for the compositing engine

use thiserror::Error;

/// Result type alias for compositing operations.
pub type Result<T> = std::result::Result<T, CollageError>;

/// Validation and placement failures reported by pixels, layers and projects.
///
/// Every variant carries the offending field or value so a caller can retry
/// with corrected input. A failed operation never leaves partial changes
/// behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollageError {
    /// A color channel is outside its permitted range
    #[error("Channel '{channel}' value {value} is outside 0..={max}")]
    ChannelOutOfRange { channel: &'static str, value: f64, max: f64 },

    /// Maximum channel value must be positive
    #[error("Maximum channel value must be positive, got {0}")]
    InvalidMaxValue(u16),

    /// Filter name is not one of the canonical identifiers
    #[error("No filter named '{name}' exists")]
    InvalidFilter { name: String },

    /// Layer or project name is empty
    #[error("{what} name cannot be empty")]
    EmptyName { what: &'static str },

    /// Name contains whitespace and cannot be written as a single token
    #[error("{what} name '{name}' must not contain whitespace")]
    WhitespaceInName { what: &'static str, name: String },

    /// Width or height is zero
    #[error("{field} must be greater than 0")]
    InvalidDimension { field: &'static str },

    /// Grid row count disagrees with the declared height
    #[error("Layer '{layer}' declares height {expected} but its grid has {actual} rows")]
    RowCountMismatch { layer: String, expected: usize, actual: usize },

    /// A grid row disagrees with the declared width
    #[error("Row {row} of layer '{layer}' has {actual} pixels, expected width {expected}")]
    RowWidthMismatch { layer: String, row: usize, expected: usize, actual: usize },

    /// Two layers that must share dimensions do not
    #[error("Layer '{layer}' is {actual_h}x{actual_w}, expected {expected_h}x{expected_w}", actual_h = actual.0, actual_w = actual.1, expected_h = expected.0, expected_w = expected.1)]
    DimensionMismatch { layer: String, expected: (usize, usize), actual: (usize, usize) },

    /// Pixel coordinate outside the layer
    #[error("Pixel ({row}, {col}) is out of bounds for a {height}x{width} layer")]
    OutOfBounds { row: usize, col: usize, height: usize, width: usize },

    /// A layer with this name already exists in the project
    #[error("A layer named '{name}' already exists")]
    DuplicateLayer { name: String },

    /// No layer with this name exists in the project
    #[error("No layer named '{name}' exists in the project")]
    LayerNotFound { name: String },

    /// Project has no layers at all
    #[error("A project needs at least one layer")]
    NoLayers,

    /// Image to stamp has no pixels
    #[error("Cannot place an empty image")]
    EmptyImage,

    /// Image rows have differing widths
    #[error("Image row {row} has {actual} pixels, expected {expected}")]
    RaggedImage { row: usize, expected: usize, actual: usize },

    /// Image holds more pixels than the target layer
    #[error("Image of {image_pixels} pixels does not fit a layer of {layer_pixels} pixels")]
    ImageTooLarge { image_pixels: usize, layer_pixels: usize },

    /// Placement coordinate lies off the layer
    #[error("Position ({x}, {y}) is not on the {height}x{width} layer")]
    PositionOffLayer { x: usize, y: usize, height: usize, width: usize },

    /// Image would overflow the layer when placed at the given position
    #[error("Image ({image_h}x{image_w}) placed at ({x}, {y}) overflows the {height}x{width} layer", image_h = image.0, image_w = image.1)]
    PlacementOverflow { image: (usize, usize), x: usize, y: usize, height: usize, width: usize },
}
