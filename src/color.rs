//! Conversions between the RGB and HSL pixel representations
//!
//! Both directions are pure and preserve alpha unchanged. Context pixels are
//! looked up from the owning layer on demand, so nothing here carries one.

use crate::pixel::{Hsl, Rgb};

/// Convert integer RGB channels in `0..=max_value` to HSL.
///
/// Channels are normalized to `0.0..=1.0` before conversion:
/// - lightness = (max + min) / 2
/// - saturation = delta / (1 - |2 * lightness - 1|), or 0 for greys
/// - hue from the 60 degree sector of the dominant channel, in `[0, 360)`
///
/// Alpha is carried over unchanged and the result records `max_value` as its
/// alpha depth.
pub fn rgb_to_hsl(r: u16, g: u16, b: u16, a: u16, max_value: u16) -> Hsl {
    let scale = f64::from(max_value.max(1));
    let r = f64::from(r) / scale;
    let g = f64::from(g) / scale;
    let b = f64::from(b) / scale;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let lightness = (max + min) / 2.0;

    if delta == 0.0 {
        return Hsl::from_parts(0.0, 0.0, lightness.clamp(0.0, 1.0), a, max_value);
    }

    let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());

    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let hue = (sector * 60.0).rem_euclid(360.0);

    Hsl::from_parts(hue, saturation.clamp(0.0, 1.0), lightness.clamp(0.0, 1.0), a, max_value)
}

/// Convert HSL to integer RGB channels in `0..=max_value`.
///
/// Evaluates the HSL polygon at phase offsets 0, 8 and 4 on a 12-step wheel.
/// Channel values are truncated, not rounded. `a` must already be expressed
/// at `max_value`; it is clamped, never rescaled.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64, a: u16, max_value: u16) -> Rgb {
    let scale = f64::from(max_value);
    let channel = |n: f64| -> u16 {
        let value = wheel(h, s, l, n) * scale;
        value.clamp(0.0, scale) as u16
    };

    Rgb::from_parts(channel(0.0), channel(8.0), channel(4.0), a.min(max_value), max_value)
}

fn wheel(hue: f64, saturation: f64, lightness: f64, n: f64) -> f64 {
    let k = (n + hue / 30.0) % 12.0;
    let a = saturation * lightness.min(1.0 - lightness);
    lightness - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0)
}
