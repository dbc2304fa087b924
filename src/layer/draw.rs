//! Drawing primitives built on the pixel-access contract of [`LayerView`].
//!
//! Nothing here looks at the mapping table. Every primitive reads and writes through the
//! coordinate accessors, so it works the same on any projection.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_4X6, FONT_5X7, FONT_5X8, FONT_6X10, FONT_6X13, FONT_8X13, FONT_10X20},
    },
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};

use crate::Coord3D;
use crate::color::{self, BLACK, RGB8, ToRgb8, ToRgb888};

use super::LayerView;

/// Monospace fonts available to [`LayerView::draw_text`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// 4×6 pixels.
    #[default]
    Font4x6,
    /// 5×7 pixels.
    Font5x7,
    /// 5×8 pixels.
    Font5x8,
    /// 6×10 pixels.
    Font6x10,
    /// 6×13 pixels.
    Font6x13,
    /// 8×13 pixels.
    Font8x13,
    /// 10×20 pixels.
    Font10x20,
}

impl Font {
    /// The `embedded-graphics` font behind this variant.
    #[must_use]
    pub fn mono_font(self) -> MonoFont<'static> {
        match self {
            Self::Font4x6 => FONT_4X6,
            Self::Font5x7 => FONT_5X7,
            Self::Font5x8 => FONT_5X8,
            Self::Font6x10 => FONT_6X10,
            Self::Font6x13 => FONT_6X13,
            Self::Font8x13 => FONT_8X13,
            Self::Font10x20 => FONT_10X20,
        }
    }
}

/// Pull `end` back toward `start` so the line covers `depth / 255` of its length.
///
/// Returns `None` for depth 0, which draws nothing.
fn shorten(start: Coord3D, end: Coord3D, depth: u8) -> Option<Coord3D> {
    match depth {
        0 => None,
        1 => Some(start),
        u8::MAX => Some(end),
        _ => {
            // Doubled coordinates keep half a pixel of precision while scaling.
            let twice = start * 2;
            let delta = (end * 2 - twice) * i32::from(depth) / 255;
            Some((twice + delta + Coord3D::ONE) / 2)
        }
    }
}

fn coverage(fraction: f32) -> u8 {
    (fraction.clamp(0.0, 1.0) * 255.0) as u8
}

impl LayerView<'_> {
    /// Bresenham line in the z = 0 plane. `depth` below 255 draws only that fraction of
    /// the line, starting at `from`.
    pub fn draw_line(&mut self, from: Point, to: Point, color: RGB8, depth: u8) {
        let Some(to) = shorten(Coord3D::new(from.x, from.y, 0), Coord3D::new(to.x, to.y, 0), depth)
        else {
            return;
        };
        let (mut x, mut y) = (from.x, from.y);
        let (dx, sx) = ((to.x - x).abs(), if x < to.x { 1 } else { -1 });
        let (dy, sy) = ((to.y - y).abs(), if y < to.y { 1 } else { -1 });
        let mut err = (if dx > dy { dx } else { -dy }) / 2;
        loop {
            self.set_pixel_color_at(Coord3D::new(x, y, 0), color);
            if x == to.x && y == to.y {
                break;
            }
            let e2 = err;
            if e2 > -dx {
                err -= dy;
                x += sx;
            }
            if e2 < dy {
                err += dx;
                y += sy;
            }
        }
    }

    /// Anti-aliased line (Xiaolin Wu) in the z = 0 plane.
    pub fn draw_line_soft(&mut self, from: Point, to: Point, color: RGB8, depth: u8) {
        let Some(end) = shorten(Coord3D::new(from.x, from.y, 0), Coord3D::new(to.x, to.y, 0), depth)
        else {
            return;
        };
        let (mut x0, mut y0, mut x1, mut y1) = (from.x, from.y, end.x, end.y);
        if x0 == x1 && y0 == y1 {
            self.set_pixel_color_at(Coord3D::new(x0, y0, 0), color);
            return;
        }
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            core::mem::swap(&mut x0, &mut y0);
            core::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }
        let gradient = (y1 - y0) as f32 / (x1 - x0) as f32;
        let mut intersect = y0 as f32;
        for along in x0..=x1 {
            let across = libm::floorf(intersect) as i32;
            let fraction = intersect - across as f32;
            let (near, far) = if steep {
                (Coord3D::new(across, along, 0), Coord3D::new(across + 1, along, 0))
            } else {
                (Coord3D::new(along, across, 0), Coord3D::new(along, across + 1, 0))
            };
            self.blend_pixel_color_at(near, color, coverage(1.0 - fraction));
            self.blend_pixel_color_at(far, color, coverage(fraction));
            intersect += gradient;
        }
    }

    /// 3D Bresenham line along the dominant axis.
    pub fn draw_line_3d(&mut self, from: Coord3D, to: Coord3D, color: RGB8, depth: u8) {
        let Some(to) = shorten(from, to, depth) else {
            return;
        };
        let mut point = from;
        self.set_pixel_color_at(point, color);

        let delta = Coord3D::new(
            (to.x - from.x).abs(),
            (to.y - from.y).abs(),
            (to.z - from.z).abs(),
        );
        let step = Coord3D::new(
            if to.x > from.x { 1 } else { -1 },
            if to.y > from.y { 1 } else { -1 },
            if to.z > from.z { 1 } else { -1 },
        );

        // Driving axis first.
        let axes = if delta.x >= delta.y && delta.x >= delta.z {
            [0, 1, 2]
        } else if delta.y >= delta.x && delta.y >= delta.z {
            [1, 0, 2]
        } else {
            [2, 1, 0]
        };
        let get = |coord: Coord3D, axis: usize| match axis {
            0 => coord.x,
            1 => coord.y,
            _ => coord.z,
        };
        let bump = |coord: &mut Coord3D, axis: usize, by: i32| match axis {
            0 => coord.x += by,
            1 => coord.y += by,
            _ => coord.z += by,
        };

        let [drive, first, second] = axes;
        let (d_drive, d_first, d_second) =
            (get(delta, drive), get(delta, first), get(delta, second));
        let mut p1 = 2 * d_first - d_drive;
        let mut p2 = 2 * d_second - d_drive;
        while get(point, drive) != get(to, drive) {
            bump(&mut point, drive, get(step, drive));
            if p1 >= 0 {
                bump(&mut point, first, get(step, first));
                p1 -= 2 * d_drive;
            }
            if p2 >= 0 {
                bump(&mut point, second, get(step, second));
                p2 -= 2 * d_drive;
            }
            p1 += 2 * d_first;
            p2 += 2 * d_second;
            self.set_pixel_color_at(point, color);
        }
    }

    /// Bresenham circle outline in the z = 0 plane.
    pub fn draw_circle(&mut self, center: Point, radius: u8, color: RGB8) {
        if radius == 0 {
            return;
        }
        let radius = i32::from(radius);
        let (mut x, mut y) = (0, radius);
        let mut d = 3 - 2 * radius;
        while y >= x {
            for (dx, dy) in octants(x, y) {
                self.set_pixel_color_at(Coord3D::new(center.x + dx, center.y + dy, 0), color);
            }
            x += 1;
            if d > 0 {
                y -= 1;
                d += 4 * (x - y) + 10;
            } else {
                d += 4 * x + 6;
            }
        }
    }

    /// Anti-aliased circle outline: each octant step splits the color between the two
    /// cells straddling the exact radius.
    pub fn draw_circle_soft(&mut self, center: Point, radius: u8, color: RGB8) {
        if radius == 0 {
            return;
        }
        let radius = i32::from(radius);
        let squared = (radius * radius) as f32;
        let mut x = 0;
        while x <= radius {
            let exact = libm::sqrtf(squared - (x * x) as f32);
            if exact < x as f32 {
                break;
            }
            let outer = libm::ceilf(exact) as i32;
            // Share of the color kept by the inner cell.
            let fade = coverage(outer as f32 - exact);
            for (dx, dy) in octants(x, outer) {
                let cell = Coord3D::new(center.x + dx, center.y + dy, 0);
                self.blend_pixel_color_at(cell, color, 255 - fade);
            }
            for (dx, dy) in octants(x, outer - 1) {
                let cell = Coord3D::new(center.x + dx, center.y + dy, 0);
                self.blend_pixel_color_at(cell, color, fade);
            }
            x += 1;
        }
    }

    /// One-dimensional box blur over the first `size.x` virtual pixels.
    pub fn blur1d(&mut self, amount: u8) {
        let width = self.size().x.max(0) as usize;
        let (keep, seep) = (255 - amount, amount / 2);
        let mut carry = BLACK;
        for index in 0..width {
            let current = self.get_pixel_color(index);
            let part = color::nscale8(current, seep);
            let kept = color::add(color::nscale8(current, keep), carry);
            if index > 0 {
                self.add_pixel_color(index - 1, part);
            }
            self.set_pixel_color(index, kept, None);
            carry = part;
        }
    }

    /// Box blur along every row of the z = 0 plane.
    pub fn blur_rows(&mut self, amount: u8) {
        let size = self.size();
        for y in 0..size.y {
            self.blur_line(amount, size.x, |x| Coord3D::new(x, y, 0));
        }
    }

    /// Box blur along every column of the z = 0 plane.
    pub fn blur_columns(&mut self, amount: u8) {
        let size = self.size();
        for x in 0..size.x {
            self.blur_line(amount, size.y, |y| Coord3D::new(x, y, 0));
        }
    }

    /// Rows, then columns.
    pub fn blur2d(&mut self, amount: u8) {
        self.blur_rows(amount);
        self.blur_columns(amount);
    }

    fn blur_line(&mut self, amount: u8, length: i32, at: impl Fn(i32) -> Coord3D) {
        let (keep, seep) = (255 - amount, amount / 2);
        let mut carry = BLACK;
        for step in 0..length {
            let current = self.get_pixel_color_at(at(step));
            let part = color::nscale8(current, seep);
            let kept = color::add(color::nscale8(current, keep), carry);
            if step > 0 {
                self.add_pixel_color_at(at(step - 1), part);
            }
            self.set_pixel_color_at(at(step), kept);
            carry = part;
        }
    }

    /// Draw `text` with its top-left corner at `position`. Returns where the next
    /// character would start.
    pub fn draw_text(&mut self, text: &str, position: Point, font: Font, color: RGB8) -> Point {
        let font = font.mono_font();
        let style = MonoTextStyle::new(&font, color.to_rgb888());
        match Text::with_baseline(text, position, style, Baseline::Top).draw(self) {
            Ok(next) => next,
            Err(never) => match never {},
        }
    }
}

fn octants(x: i32, y: i32) -> [(i32, i32); 8] {
    [(x, y), (-x, y), (x, -y), (-x, -y), (y, x), (-y, x), (y, -x), (-y, -x)]
}

impl OriginDimensions for LayerView<'_> {
    fn size(&self) -> Size {
        let canvas = LayerView::size(self);
        Size::new(canvas.x.max(0) as u32, canvas.y.max(0) as u32)
    }
}

impl DrawTarget for LayerView<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel_color_at(Coord3D::new(point.x, point.y, 0), color.to_rgb8());
        }
        Ok(())
    }
}
