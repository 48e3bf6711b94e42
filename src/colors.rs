//! Named colors and HSV helpers.
//!
//! The palette holds the fade targets a request layer refers to by name.
//! [`hsv`] and [`hue`] go through `palette` and return duty-cycle vectors.

use crate::types::ColorVector;
use palette::{FromColor, Hsv, Srgb};

pub const OFF: ColorVector = ColorVector::splat(0.0);
pub const RED: ColorVector = ColorVector::new(100.0, 0.0, 0.0);
pub const GREEN: ColorVector = ColorVector::new(0.0, 100.0, 0.0);
pub const BLUE: ColorVector = ColorVector::new(0.0, 0.0, 100.0);
pub const RED_GREEN: ColorVector = ColorVector::new(100.0, 100.0, 0.0);
pub const GREEN_BLUE: ColorVector = ColorVector::new(0.0, 100.0, 100.0);
pub const RED_BLUE: ColorVector = ColorVector::new(100.0, 0.0, 100.0);

/// Dim white.
pub const ON: ColorVector = ColorVector::splat(30.0);

/// Every named color, in display order.
pub const NAMED: [(&str, ColorVector); 8] = [
    ("off", OFF),
    ("on", ON),
    ("red", RED),
    ("green", GREEN),
    ("blue", BLUE),
    ("red-green", RED_GREEN),
    ("green-blue", GREEN_BLUE),
    ("red-blue", RED_BLUE),
];

/// Legs of the default show: once around the hue wheel.
pub const HUE_CYCLE: [ColorVector; 6] = [RED, RED_GREEN, GREEN, GREEN_BLUE, BLUE, RED_BLUE];

/// Looks up a named color, ignoring ASCII case. `white` is accepted for `on`.
pub fn by_name(name: &str) -> Option<ColorVector> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("white") {
        return Some(ON);
    }
    NAMED
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|&(_, color)| color)
}

/// Creates a color vector from HSV (Hue, Saturation, Value) components.
///
/// Hue is in degrees, saturation and value in 0.0-1.0.
#[inline]
pub fn hsv(hue: f32, saturation: f32, value: f32) -> ColorVector {
    let hsv = Hsv::new(hue, saturation, value);
    ColorVector::from(Srgb::from_color(hsv))
}

/// Creates a color vector from hue only (full saturation and value).
#[inline]
pub fn hue(hue: f32) -> ColorVector {
    hsv(hue, 1.0, 1.0)
}
