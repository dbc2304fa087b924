//! Color types and the 8-bit color math used by pixel writes.
//!
//! Scaling and blending follow the fixed-point conventions of common LED controller
//! libraries: `scale8(v, 255) == v` and `blend8(a, b, 255) == b`.

use embedded_graphics::prelude::RgbColor;
use smart_leds::hsv::{Hsv, hsv2rgb};

/// Predefined RGB color constants from the `smart_leds` crate.
#[doc(inline)]
pub use smart_leds::colors;

/// 8-bit-per-channel RGB color from `embedded_graphics`.
#[doc(inline)]
pub use embedded_graphics::pixelcolor::Rgb888;

/// RGB color type stored in the physical LED buffer.
pub use smart_leds::RGB8;

/// The "off" color.
pub const BLACK: RGB8 = RGB8::new(0, 0, 0);

/// Convert colors to [`RGB8`].
///
/// # Example
///
/// ```rust
/// use led_fixture::color::{Rgb888, ToRgb8, RGB8};
///
/// let converted = Rgb888::new(16, 32, 48).to_rgb8();
/// assert_eq!(converted, RGB8::new(16, 32, 48));
/// ```
pub trait ToRgb8 {
    /// Convert this color to [`RGB8`].
    #[must_use]
    fn to_rgb8(self) -> RGB8;
}

impl ToRgb8 for RGB8 {
    #[inline]
    fn to_rgb8(self) -> RGB8 {
        self
    }
}

impl ToRgb8 for Rgb888 {
    #[inline]
    fn to_rgb8(self) -> RGB8 {
        RGB8::new(self.r(), self.g(), self.b())
    }
}

/// Convert colors to [`Rgb888`] for embedded-graphics rendering.
pub trait ToRgb888 {
    /// Convert this color to [`Rgb888`].
    #[must_use]
    fn to_rgb888(self) -> Rgb888;
}

impl ToRgb888 for RGB8 {
    #[inline]
    fn to_rgb888(self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }
}

impl ToRgb888 for Rgb888 {
    #[inline]
    fn to_rgb888(self) -> Rgb888 {
        self
    }
}

/// Scale `value` by `scale / 256`, with 255 leaving it unchanged.
#[must_use]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Linear blend from `a` to `b` by `amount_of_b` (0 = `a`, 255 = `b`).
#[must_use]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let mut partial = ((a as u32) << 8) | b as u32;
    partial += b as u32 * amount_of_b as u32;
    partial -= a as u32 * amount_of_b as u32;
    (partial >> 8) as u8
}

/// Scale every channel by `scale / 256`.
#[must_use]
pub const fn nscale8(color: RGB8, scale: u8) -> RGB8 {
    RGB8::new(scale8(color.r, scale), scale8(color.g, scale), scale8(color.b, scale))
}

/// Dim toward black by `amount` (255 = black).
#[must_use]
pub const fn fade_to_black_by(color: RGB8, amount: u8) -> RGB8 {
    nscale8(color, 255 - amount)
}

/// Blend the existing color toward `new` by `amount_of_new`.
#[must_use]
pub const fn blend(existing: RGB8, new: RGB8, amount_of_new: u8) -> RGB8 {
    RGB8::new(
        blend8(existing.r, new.r, amount_of_new),
        blend8(existing.g, new.g, amount_of_new),
        blend8(existing.b, new.b, amount_of_new),
    )
}

/// Channelwise saturating add.
#[must_use]
pub const fn add(a: RGB8, b: RGB8) -> RGB8 {
    RGB8::new(a.r.saturating_add(b.r), a.g.saturating_add(b.g), a.b.saturating_add(b.b))
}

/// Channelwise saturating subtract.
#[must_use]
pub const fn sub(a: RGB8, b: RGB8) -> RGB8 {
    RGB8::new(a.r.saturating_sub(b.r), a.g.saturating_sub(b.g), a.b.saturating_sub(b.b))
}

/// Hue/saturation/value to RGB.
#[must_use]
pub fn hsv(hue: u8, sat: u8, val: u8) -> RGB8 {
    hsv2rgb(Hsv { hue, sat, val })
}

/// Rainbow color `index` steps of `delta_hue` past `initial_hue`.
#[must_use]
pub fn rainbow(initial_hue: u8, delta_hue: u8, index: usize) -> RGB8 {
    let hue = initial_hue.wrapping_add(delta_hue.wrapping_mul(index as u8));
    hsv(hue, 240, 255)
}
