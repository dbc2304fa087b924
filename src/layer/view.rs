//! Per-pixel read/write access to one layer.

use rand::Rng;
use rand::rngs::SmallRng;

use crate::Coord3D;
use crate::color::{self, BLACK, RGB8};
use crate::fixture::{Diagnostics, Frame};
use crate::mapping::PhysMap;
use crate::projection::{ProjectionKind, XyzContext};
use crate::scratch::ScratchArena;

use super::Layer;

/// Mutable access to one layer and the physical LEDs behind it.
///
/// Obtained from [`Fixture::view`](crate::fixture::Fixture::view). Writes fan out through
/// the layer's mapping table; with no table (projections `None` and `Random`) virtual
/// indices address physical LEDs directly.
///
/// Nothing here fails. Out-of-range indices and reads of unmapped pixels are counted in
/// [`Diagnostics`] and otherwise ignored; reads return black.
#[derive(Debug)]
pub struct LayerView<'a> {
    layer: &'a mut Layer,
    leds: &'a mut [RGB8],
    frame: Frame,
    fixture_size: Coord3D,
    global_blend: u8,
    rng: &'a mut SmallRng,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> LayerView<'a> {
    pub(crate) fn new(
        layer: &'a mut Layer,
        leds: &'a mut [RGB8],
        frame: Frame,
        fixture_size: Coord3D,
        global_blend: u8,
        rng: &'a mut SmallRng,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            layer,
            leds,
            frame,
            fixture_size,
            global_blend,
            rng,
            diagnostics,
        }
    }

    /// Virtual canvas size.
    #[must_use]
    pub fn size(&self) -> Coord3D {
        self.layer.size
    }

    /// Number of virtual pixels.
    #[must_use]
    pub fn nr_of_leds(&self) -> usize {
        self.layer.nr_of_leds
    }

    /// Frame time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u32 {
        self.frame.now_ms
    }

    /// Scratch arena reserved for the effect.
    pub fn effect_data(&mut self) -> &mut ScratchArena {
        &mut self.layer.effect_data
    }

    /// Scratch arena reserved for the projection.
    pub fn projection_data(&mut self) -> &mut ScratchArena {
        &mut self.layer.projection_data
    }

    /// Virtual index of `pixel` after the projection's read-time transform, or `None`
    /// when it falls outside the canvas.
    pub fn xyz(&mut self, mut pixel: Coord3D) -> Option<usize> {
        let projection = self.layer.kind.projection();
        if projection.has_xyz() {
            let layer = &mut *self.layer;
            let mut ctx = XyzContext {
                canvas: layer.size,
                projection_dimension: layer.projection_dimension,
                fixture_size: self.fixture_size,
                settings: &layer.settings,
                now_ms: self.frame.now_ms,
                orientation: self.frame.orientation,
                trigo: &mut layer.trigo,
            };
            projection.adjust_xyz(&mut ctx, &mut pixel);
        }
        pixel.flatten(self.layer.size)
    }

    /// True when `index` has at least one physical LED behind it.
    #[must_use]
    pub fn is_mapped(&self, index: usize) -> bool {
        matches!(
            self.layer.mapping.entry(index),
            Some(PhysMap::Single(_) | PhysMap::Multiple(_))
        )
    }

    /// Write `color` to virtual pixel `index`.
    ///
    /// Mapped pixels blend into every physical LED behind them by `blend`, or by the
    /// fixture's global blend when `None`; 255 overwrites. Passthrough layers write the
    /// physical LED directly, and `Random` picks a random one.
    pub fn set_pixel_color(&mut self, index: usize, color: RGB8, blend: Option<u8>) {
        if self.layer.mapping.is_empty() {
            self.set_passthrough(index, color);
            return;
        }
        if index >= self.layer.mapping.len() {
            self.diagnostics.virtual_out_of_bounds += 1;
            trace!("LayerView::set_pixel_color: virtual {} >= {}", index, self.layer.mapping.len());
            return;
        }
        let amount = blend.unwrap_or(self.global_blend);
        for &physical in self.layer.mapping.physical(index) {
            if let Some(led) = self.leds.get_mut(usize::from(physical)) {
                *led = color::blend(*led, color, amount);
            }
        }
    }

    fn set_passthrough(&mut self, index: usize, color: RGB8) {
        let count = self.leds.len();
        let target = if self.layer.kind == ProjectionKind::Random && count > 0 {
            self.rng.gen_range(0..count)
        } else {
            index
        };
        match self.leds.get_mut(target) {
            Some(led) => *led = color,
            None => {
                self.diagnostics.physical_out_of_bounds += 1;
                trace!("LayerView::set_pixel_color: physical {} >= {}", target, count);
            }
        }
    }

    /// Color of virtual pixel `index`, read from the first physical LED behind it.
    pub fn get_pixel_color(&mut self, index: usize) -> RGB8 {
        if self.layer.mapping.is_empty() {
            if let Some(led) = self.leds.get(index) {
                return *led;
            }
            self.diagnostics.physical_out_of_bounds += 1;
            trace!("LayerView::get_pixel_color: physical {} >= {}", index, self.leds.len());
            return BLACK;
        }
        match self.layer.mapping.first(index) {
            Some(physical) => self.leds.get(usize::from(physical)).copied().unwrap_or(BLACK),
            None if index >= self.layer.mapping.len() => {
                self.diagnostics.virtual_out_of_bounds += 1;
                trace!(
                    "LayerView::get_pixel_color: virtual {} >= {}",
                    index,
                    self.layer.mapping.len()
                );
                BLACK
            }
            None => {
                self.diagnostics.unmapped_reads += 1;
                trace!("LayerView::get_pixel_color: virtual {} unmapped", index);
                BLACK
            }
        }
    }

    /// Add `color` to virtual pixel `index`, saturating each channel.
    pub fn add_pixel_color(&mut self, index: usize, color: RGB8) {
        let current = self.get_pixel_color(index);
        self.set_pixel_color(index, color::add(current, color), None);
    }

    /// Blend `color` into virtual pixel `index` by `amount`, also on passthrough layers.
    pub fn blend_pixel_color(&mut self, index: usize, color: RGB8, amount: u8) {
        let current = self.get_pixel_color(index);
        self.set_pixel_color(index, color::blend(current, color, amount), Some(u8::MAX));
    }

    /// [`set_pixel_color`](Self::set_pixel_color) by coordinate. Coordinates outside the
    /// canvas are ignored.
    pub fn set_pixel_color_at(&mut self, pixel: Coord3D, color: RGB8) {
        if let Some(index) = self.xyz(pixel) {
            self.set_pixel_color(index, color, None);
        }
    }

    /// [`get_pixel_color`](Self::get_pixel_color) by coordinate; black outside the canvas.
    pub fn get_pixel_color_at(&mut self, pixel: Coord3D) -> RGB8 {
        self.xyz(pixel).map_or(BLACK, |index| self.get_pixel_color(index))
    }

    /// [`add_pixel_color`](Self::add_pixel_color) by coordinate.
    pub fn add_pixel_color_at(&mut self, pixel: Coord3D, color: RGB8) {
        if let Some(index) = self.xyz(pixel) {
            self.add_pixel_color(index, color);
        }
    }

    /// [`blend_pixel_color`](Self::blend_pixel_color) by coordinate.
    pub fn blend_pixel_color_at(&mut self, pixel: Coord3D, color: RGB8, amount: u8) {
        if let Some(index) = self.xyz(pixel) {
            self.blend_pixel_color(index, color, amount);
        }
    }

    /// Dim every pixel of the layer toward black by `amount`.
    pub fn fade_to_black_by(&mut self, amount: u8) {
        if self.layer.mapping.is_empty() {
            for led in self.leds.iter_mut() {
                *led = color::fade_to_black_by(*led, amount);
            }
            return;
        }
        let blend = self.global_blend;
        self.for_each_mapped(|_, led| {
            let faded = color::fade_to_black_by(*led, amount);
            *led = color::blend(*led, faded, blend);
        });
    }

    /// Set every pixel of the layer to `color`.
    pub fn fill_solid(&mut self, color: RGB8) {
        if self.layer.mapping.is_empty() {
            self.leds.fill(color);
            return;
        }
        let blend = self.global_blend;
        self.for_each_mapped(|_, led| *led = color::blend(*led, color, blend));
    }

    /// Rainbow across the layer: hue starts at `initial_hue` and steps by `delta_hue` per
    /// virtual pixel.
    pub fn fill_rainbow(&mut self, initial_hue: u8, delta_hue: u8) {
        if self.layer.mapping.is_empty() {
            for (index, led) in self.leds.iter_mut().enumerate() {
                *led = color::rainbow(initial_hue, delta_hue, index);
            }
            return;
        }
        let blend = self.global_blend;
        self.for_each_mapped(|index, led| {
            *led = color::blend(*led, color::rainbow(initial_hue, delta_hue, index), blend);
        });
    }

    fn for_each_mapped(&mut self, mut apply: impl FnMut(usize, &mut RGB8)) {
        for (index, physical) in self.layer.mapping.iter() {
            for &physical in physical {
                if let Some(led) = self.leds.get_mut(usize::from(physical)) {
                    apply(index, led);
                }
            }
        }
    }
}
