//! Per-pixel filters applied to layers

use crate::error::CollageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named, deterministic per-pixel color transform.
///
/// `Difference`, `Multiply` and `Screen` read the context pixel (the pixel
/// directly beneath in the same layer) and do nothing when there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    /// Leaves the pixel unchanged
    #[default]
    Normal,
    /// Keeps only the red channel
    RedComponent,
    /// Keeps only the green channel
    GreenComponent,
    /// Keeps only the blue channel
    BlueComponent,
    /// Adds max(r, g, b) to every channel
    BrightenValue,
    /// Subtracts max(r, g, b) from every channel
    DarkenValue,
    /// Adds the Rec. 709 luma to every channel
    BrightenLuma,
    /// Subtracts the Rec. 709 luma from every channel
    DarkenLuma,
    /// Adds the channel mean to every channel
    BrightenIntensity,
    /// Subtracts the channel mean from every channel
    DarkenIntensity,
    /// Absolute per-channel difference against the context pixel
    Difference,
    /// Multiplies lightness by the context pixel's lightness
    Multiply,
    /// Screens lightness with the context pixel's lightness
    Screen,
}

impl Filter {
    /// Every filter, in canonical order.
    pub const ALL: [Filter; 13] = [
        Filter::Normal,
        Filter::RedComponent,
        Filter::GreenComponent,
        Filter::BlueComponent,
        Filter::BrightenValue,
        Filter::DarkenValue,
        Filter::BrightenLuma,
        Filter::DarkenLuma,
        Filter::BrightenIntensity,
        Filter::DarkenIntensity,
        Filter::Difference,
        Filter::Multiply,
        Filter::Screen,
    ];

    /// Parse a canonical filter identifier such as `"darken-luma"`.
    pub fn from_name(name: &str) -> Result<Filter, CollageError> {
        match name {
            "normal" => Ok(Filter::Normal),
            "red-component" => Ok(Filter::RedComponent),
            "green-component" => Ok(Filter::GreenComponent),
            "blue-component" => Ok(Filter::BlueComponent),
            "brighten-value" => Ok(Filter::BrightenValue),
            "darken-value" => Ok(Filter::DarkenValue),
            "brighten-luma" => Ok(Filter::BrightenLuma),
            "darken-luma" => Ok(Filter::DarkenLuma),
            "brighten-intensity" => Ok(Filter::BrightenIntensity),
            "darken-intensity" => Ok(Filter::DarkenIntensity),
            "difference" => Ok(Filter::Difference),
            "multiply" => Ok(Filter::Multiply),
            "screen" => Ok(Filter::Screen),
            _ => Err(CollageError::InvalidFilter { name: name.to_string() }),
        }
    }

    /// The canonical identifier of this filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::Normal => "normal",
            Filter::RedComponent => "red-component",
            Filter::GreenComponent => "green-component",
            Filter::BlueComponent => "blue-component",
            Filter::BrightenValue => "brighten-value",
            Filter::DarkenValue => "darken-value",
            Filter::BrightenLuma => "brighten-luma",
            Filter::DarkenLuma => "darken-luma",
            Filter::BrightenIntensity => "brighten-intensity",
            Filter::DarkenIntensity => "darken-intensity",
            Filter::Difference => "difference",
            Filter::Multiply => "multiply",
            Filter::Screen => "screen",
        }
    }

    /// Whether this filter reads the context pixel.
    pub fn requires_context(&self) -> bool {
        matches!(self, Filter::Difference | Filter::Multiply | Filter::Screen)
    }
}

impl FromStr for Filter {
    type Err = CollageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::from_name(s)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
