//! Pixel color model
//!
//! A [`Pixel`] is a tagged variant over two interchangeable representations:
//! integer RGB channels with alpha, and HSL with alpha. Filters mutate a
//! pixel in place; merging alpha-composites one pixel over another and always
//! yields an RGB pixel.
//!
//! Spatial filters need the pixel directly beneath (same column, next row).
//! Pixels never store that neighbour; the owning [`Layer`](crate::layer::Layer)
//! looks it up and passes it to [`Pixel::apply`].

use crate::color::{hsl_to_rgb, rgb_to_hsl};
use crate::error::{CollageError, Result};
use crate::filter::Filter;
use std::fmt;

/// Default maximum channel value for RGB pixels.
pub const DEFAULT_MAX_VALUE: u16 = 255;

/// Alpha depth of HSL pixels built directly rather than converted from RGB.
pub const HSL_MAX_VALUE: u16 = 360;

fn rescale_channel(value: u16, from: u16, to: u16) -> u16 {
    if from == to {
        return value;
    }
    let scaled = f64::from(value) * f64::from(to) / f64::from(from.max(1));
    scaled.round().clamp(0.0, f64::from(to)) as u16
}

/// RGB channels with alpha, each within `0..=max_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    r: u16,
    g: u16,
    b: u16,
    a: u16,
    max_value: u16,
}

impl Rgb {
    /// Build without range checks; callers guarantee the invariant.
    pub(crate) fn from_parts(r: u16, g: u16, b: u16, a: u16, max_value: u16) -> Self {
        Self { r, g, b, a, max_value }
    }

    pub fn red(&self) -> u16 {
        self.r
    }

    pub fn green(&self) -> u16 {
        self.g
    }

    pub fn blue(&self) -> u16 {
        self.b
    }

    pub fn alpha(&self) -> u16 {
        self.a
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// Channels as an `(r, g, b, a)` tuple.
    pub fn rgba(&self) -> (u16, u16, u16, u16) {
        (self.r, self.g, self.b, self.a)
    }

    /// max(r, g, b)
    pub fn value(&self) -> f64 {
        f64::from(self.r.max(self.g).max(self.b))
    }

    /// Rec. 709 luma.
    pub fn luma(&self) -> f64 {
        0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b)
    }

    /// Mean of the three color channels.
    pub fn intensity(&self) -> f64 {
        (f64::from(self.r) + f64::from(self.g) + f64::from(self.b)) / 3.0
    }

    pub fn to_hsl(&self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b, self.a, self.max_value)
    }

    fn apply(&mut self, filter: Filter, context: Option<&Pixel>) {
        match filter {
            Filter::Normal => {}
            Filter::RedComponent => {
                self.g = 0;
                self.b = 0;
            }
            Filter::GreenComponent => {
                self.r = 0;
                self.b = 0;
            }
            Filter::BlueComponent => {
                self.r = 0;
                self.g = 0;
            }
            Filter::BrightenValue => self.shift(self.value()),
            Filter::DarkenValue => self.shift(-self.value()),
            Filter::BrightenLuma => self.shift(self.luma()),
            Filter::DarkenLuma => self.shift(-self.luma()),
            Filter::BrightenIntensity => self.shift(self.intensity()),
            Filter::DarkenIntensity => self.shift(-self.intensity()),
            Filter::Difference => {
                if let Some(below) = context {
                    let below = below.to_rgb();
                    let below = below.rescaled(self.max_value);
                    self.r = self.r.abs_diff(below.r).min(self.max_value);
                    self.g = self.g.abs_diff(below.g).min(self.max_value);
                    self.b = self.b.abs_diff(below.b).min(self.max_value);
                }
            }
            Filter::Multiply | Filter::Screen => {
                if let Some(below) = context {
                    let mut hsl = self.to_hsl();
                    hsl.blend_lightness(filter, below.lightness());
                    let back = hsl_to_rgb(hsl.h, hsl.s, hsl.l, self.a, self.max_value);
                    self.r = back.r;
                    self.g = back.g;
                    self.b = back.b;
                }
            }
        }
    }

    /// Add `amount` to each color channel, truncating toward zero and
    /// clamping into `0..=max_value`.
    fn shift(&mut self, amount: f64) {
        let max = f64::from(self.max_value);
        let shift = |channel: u16| -> u16 { (f64::from(channel) + amount).trunc().clamp(0.0, max) as u16 };
        self.r = shift(self.r);
        self.g = shift(self.g);
        self.b = shift(self.b);
    }

    /// Re-express channels in another depth, rounding to the nearest level.
    pub fn rescaled(&self, max_value: u16) -> Rgb {
        if max_value == self.max_value {
            return *self;
        }
        let scale = |c: u16| rescale_channel(c, self.max_value, max_value);
        Rgb::from_parts(scale(self.r), scale(self.g), scale(self.b), scale(self.a), max_value)
    }

    /// Composite `self` over `below` (source over destination).
    fn over(&self, below: &Rgb) -> Rgb {
        let max = f64::from(self.max_value.max(1));
        let below = below.rescaled(self.max_value);

        let alpha_top = f64::from(self.a) / max;
        let alpha_bottom = f64::from(below.a) / max;
        let alpha_out = alpha_top + alpha_bottom * (1.0 - alpha_top);

        if alpha_out <= 0.0 {
            return Rgb::from_parts(0, 0, 0, 0, self.max_value);
        }

        let composite = |top: u16, bottom: u16| -> u16 {
            let c = (f64::from(top) * alpha_top + f64::from(bottom) * alpha_bottom * (1.0 - alpha_top)) / alpha_out;
            c.round().clamp(0.0, max) as u16
        };

        Rgb::from_parts(
            composite(self.r, below.r),
            composite(self.g, below.g),
            composite(self.b, below.b),
            (alpha_out * max).round().clamp(0.0, max) as u16,
            self.max_value,
        )
    }
}

/// Hue in degrees `[0, 360]`, saturation and lightness in `[0, 1]`, with alpha.
///
/// Alpha lies in `0..=max_value`. Pixels converted from RGB keep the source
/// depth here so alpha survives the trip back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    h: f64,
    s: f64,
    l: f64,
    a: u16,
    max_value: u16,
}

impl Hsl {
    /// Build without range checks; callers guarantee the invariant.
    pub(crate) fn from_parts(h: f64, s: f64, l: f64, a: u16, max_value: u16) -> Self {
        Self { h, s, l, a, max_value }
    }

    pub fn hue(&self) -> f64 {
        self.h
    }

    pub fn saturation(&self) -> f64 {
        self.s
    }

    pub fn lightness(&self) -> f64 {
        self.l
    }

    pub fn alpha(&self) -> u16 {
        self.a
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// RGB at the default depth of 255, alpha rescaled.
    pub fn to_rgb(&self) -> Rgb {
        self.to_rgb_with_max(DEFAULT_MAX_VALUE)
    }

    /// RGB at `max_value`, alpha rescaled from this pixel's depth.
    pub fn to_rgb_with_max(&self, max_value: u16) -> Rgb {
        let alpha = rescale_channel(self.a, self.max_value, max_value);
        hsl_to_rgb(self.h, self.s, self.l, alpha, max_value)
    }

    fn blend_lightness(&mut self, filter: Filter, below: f64) {
        match filter {
            Filter::Multiply => self.l *= below,
            Filter::Screen => self.l = 1.0 - (1.0 - self.l) * (1.0 - below),
            _ => {}
        }
        self.l = self.l.clamp(0.0, 1.0);
    }

    fn apply(&mut self, filter: Filter, context: Option<&Pixel>) {
        match filter {
            Filter::Normal => {}
            Filter::Multiply | Filter::Screen => {
                if let Some(below) = context {
                    self.blend_lightness(filter, below.lightness());
                }
            }
            _ => {
                // channel filters run in RGB space, then convert back
                let mut rgb = self.to_rgb();
                rgb.apply(filter, context);
                let back = rgb.to_hsl();
                self.h = back.h;
                self.s = back.s;
                self.l = back.l;
            }
        }
    }
}

/// A color sample in either representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pixel {
    Rgb(Rgb),
    Hsl(Hsl),
}

impl Pixel {
    /// An RGB pixel with the default maximum channel value of 255.
    pub fn rgb(r: u16, g: u16, b: u16, a: u16) -> Result<Pixel> {
        Pixel::rgb_with_max(r, g, b, a, DEFAULT_MAX_VALUE)
    }

    /// An RGB pixel whose channels must lie in `0..=max_value`.
    pub fn rgb_with_max(r: u16, g: u16, b: u16, a: u16, max_value: u16) -> Result<Pixel> {
        if max_value == 0 {
            return Err(CollageError::InvalidMaxValue(max_value));
        }
        for (channel, value) in [("r", r), ("g", g), ("b", b), ("a", a)] {
            if value > max_value {
                return Err(CollageError::ChannelOutOfRange {
                    channel,
                    value: f64::from(value),
                    max: f64::from(max_value),
                });
            }
        }
        Ok(Pixel::Rgb(Rgb::from_parts(r, g, b, a, max_value)))
    }

    /// An opaque HSL pixel.
    pub fn hsl(h: f64, s: f64, l: f64) -> Result<Pixel> {
        Pixel::hsl_with_alpha(h, s, l, HSL_MAX_VALUE)
    }

    /// An HSL pixel with explicit alpha in `0..=360`.
    pub fn hsl_with_alpha(h: f64, s: f64, l: f64, a: u16) -> Result<Pixel> {
        let checks = [("h", h, 360.0), ("s", s, 1.0), ("l", l, 1.0)];
        for (channel, value, max) in checks {
            if !(0.0..=max).contains(&value) {
                return Err(CollageError::ChannelOutOfRange { channel, value, max });
            }
        }
        if a > HSL_MAX_VALUE {
            return Err(CollageError::ChannelOutOfRange {
                channel: "a",
                value: f64::from(a),
                max: f64::from(HSL_MAX_VALUE),
            });
        }
        Ok(Pixel::Hsl(Hsl::from_parts(h, s, l, a, HSL_MAX_VALUE)))
    }

    pub fn is_rgb(&self) -> bool {
        matches!(self, Pixel::Rgb(_))
    }

    pub fn is_hsl(&self) -> bool {
        matches!(self, Pixel::Hsl(_))
    }

    pub fn max_value(&self) -> u16 {
        match self {
            Pixel::Rgb(p) => p.max_value,
            Pixel::Hsl(p) => p.max_value,
        }
    }

    pub fn alpha(&self) -> u16 {
        match self {
            Pixel::Rgb(p) => p.a,
            Pixel::Hsl(p) => p.a,
        }
    }

    /// This pixel in RGB form.
    pub fn to_rgb(&self) -> Rgb {
        match self {
            Pixel::Rgb(p) => *p,
            Pixel::Hsl(p) => p.to_rgb(),
        }
    }

    /// This pixel in HSL form.
    pub fn to_hsl(&self) -> Hsl {
        match self {
            Pixel::Rgb(p) => p.to_hsl(),
            Pixel::Hsl(p) => *p,
        }
    }

    /// RGB channels as an `(r, g, b, a)` tuple, converting HSL pixels.
    pub fn rgba(&self) -> (u16, u16, u16, u16) {
        self.to_rgb().rgba()
    }

    pub fn lightness(&self) -> f64 {
        match self {
            Pixel::Rgb(p) => p.to_hsl().l,
            Pixel::Hsl(p) => p.l,
        }
    }

    /// max(r, g, b) of the RGB form.
    pub fn value(&self) -> f64 {
        self.to_rgb().value()
    }

    /// Luma of the RGB form.
    pub fn luma(&self) -> f64 {
        self.to_rgb().luma()
    }

    /// Intensity of the RGB form.
    pub fn intensity(&self) -> f64 {
        self.to_rgb().intensity()
    }

    /// Apply `filter` in place.
    ///
    /// `context` is the pixel directly beneath this one in its layer. Filters
    /// that need it leave the pixel untouched when it is `None`. Alpha is
    /// never changed.
    pub fn apply(&mut self, filter: Filter, context: Option<&Pixel>) {
        match self {
            Pixel::Rgb(p) => p.apply(filter, context),
            Pixel::Hsl(p) => p.apply(filter, context),
        }
    }

    /// Alpha-composite this pixel over `below`.
    ///
    /// The result is always RGB, in this pixel's channel depth (HSL pixels
    /// composite at the default depth).
    pub fn merge(&self, below: &Pixel) -> Pixel {
        Pixel::Rgb(self.to_rgb().over(&below.to_rgb()))
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pixel::Rgb(p) => write!(f, "{} {} {} {}", p.r, p.g, p.b, p.a),
            Pixel::Hsl(p) => write!(f, "{} {} {}", p.h, p.s, p.l),
        }
    }
}

impl From<Rgb> for Pixel {
    fn from(rgb: Rgb) -> Self {
        Pixel::Rgb(rgb)
    }
}

impl From<Hsl> for Pixel {
    fn from(hsl: Hsl) -> Self {
        Pixel::Hsl(hsl)
    }
}
