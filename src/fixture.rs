//! The physical fixture: LED buffer, layers and the mapping pass that connects them.
//!
//! ```rust
//! use led_fixture::fixture::{Fixture, FixtureConfig, FixtureDescription, PinRegistry, Wiring};
//! use led_fixture::projection::{Dimension, ProjectionKind};
//! use led_fixture::{Coord3D, RGB8};
//!
//! let mut source = FixtureDescription::matrix(4, 4, Wiring::Serpentine, 10);
//! let mut pins = PinRegistry::<1>::new();
//! let mut fixture = Fixture::new(FixtureConfig::default());
//! let layer = fixture.add_layer(ProjectionKind::Default)?;
//! fixture.layer_mut(layer)?.set_effect(1, Dimension::Two);
//! fixture.map_if_needed(&mut source, &mut pins)?;
//!
//! fixture.begin_frame(16, None);
//! let mut view = fixture.view(layer)?;
//! assert_eq!(view.size(), Coord3D::new(4, 4, 1));
//! view.set_pixel_color_at(Coord3D::new(3, 1, 0), RGB8::new(0, 0, 255));
//! // Row 1 runs right to left, so (3, 1) is the fifth LED on the wire.
//! assert_eq!(fixture.leds()[4], RGB8::new(0, 0, 255));
//! # Ok::<(), led_fixture::Error>(())
//! ```

mod builder;
mod layout;
mod pins;
mod source;

pub use crate::config::FixtureConfig;
pub use layout::{Wiring, cube, matrix, strip};
pub use pins::{LedRange, PinAllocator, PinRegistry};
pub use source::{
    FixtureDescription, FixtureRecord, FixtureSink, FixtureSource, PointMm, UnavailableSource,
    point_coord,
};

use alloc::boxed::Box;
use alloc::vec;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::color::{BLACK, RGB8};
use crate::layer::{Layer, LayerView};
use crate::projection::ProjectionKind;
use crate::{Coord3D, Error, MAX_LAYERS, NUM_LEDS_MAX, Result};

/// Per-frame inputs to read-time transforms.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Milliseconds since start.
    pub now_ms: u32,
    /// Orientation sensor reading in degrees per axis, when a sensor reports.
    pub orientation: Option<Coord3D>,
}

/// Soft errors counted since the last [`Fixture::take_diagnostics`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    /// Pixel accesses past the end of a layer's mapping table.
    pub virtual_out_of_bounds: u32,
    /// Passthrough accesses past the end of the physical buffer.
    pub physical_out_of_bounds: u32,
    /// Reads of virtual pixels with no physical LED behind them.
    pub unmapped_reads: u32,
    /// Points dropped by a mapping pass for landing outside a canvas or past a ceiling.
    pub mapping_drops: u32,
    /// Points left unmapped because the inverse search found no cell.
    pub unresolved_inverse: u32,
    /// Pin ranges the allocator refused.
    pub pin_failures: u32,
}

/// Physical LED buffer plus the layers drawn onto it.
#[derive(Debug)]
pub struct Fixture {
    leds: Box<[RGB8]>,
    nr_of_leds: usize,
    size: Coord3D,
    layers: heapless::Vec<Layer, MAX_LAYERS>,
    config: FixtureConfig,
    remap_requested: bool,
    frame: Frame,
    rng: SmallRng,
    diagnostics: Diagnostics,
}

impl Fixture {
    /// Empty fixture. Nothing is mapped until the first pass.
    #[must_use]
    pub fn new(config: FixtureConfig) -> Self {
        Self {
            leds: vec![BLACK; NUM_LEDS_MAX].into_boxed_slice(),
            nr_of_leds: 0,
            size: Coord3D::ZERO,
            layers: heapless::Vec::new(),
            config,
            remap_requested: true,
            frame: Frame::default(),
            rng: SmallRng::seed_from_u64(config.random_seed),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Fixture-wide settings.
    #[must_use]
    pub const fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Replace the fixture-wide settings. A new seed restarts the random sequence.
    pub fn set_config(&mut self, config: FixtureConfig) {
        if config.random_seed != self.config.random_seed {
            self.rng = SmallRng::seed_from_u64(config.random_seed);
        }
        self.config = config;
    }

    /// Fixture size in cells, as of the last pass.
    #[must_use]
    pub const fn size(&self) -> Coord3D {
        self.size
    }

    /// Number of physical LEDs, as of the last pass.
    #[must_use]
    pub const fn nr_of_leds(&self) -> usize {
        self.nr_of_leds
    }

    /// The physical buffer, in wiring order, for the output driver.
    #[must_use]
    pub fn leds(&self) -> &[RGB8] {
        self.leds.get(..self.nr_of_leds).unwrap_or_default()
    }

    /// Append a layer. It is mapped by the next pass.
    ///
    /// # Errors
    ///
    /// [`Error::TooManyLayers`] when all [`MAX_LAYERS`] slots are taken.
    pub fn add_layer(&mut self, kind: ProjectionKind) -> Result<usize> {
        self.layers.push(Layer::new(kind)).map_err(|_| Error::TooManyLayers)?;
        Ok(self.layers.len() - 1)
    }

    /// Remove the last layer.
    pub fn pop_layer(&mut self) -> Option<Layer> {
        self.layers.pop()
    }

    /// All layers, in compositing order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::LayerNotFound`] when there is none.
    pub fn layer(&self, index: usize) -> Result<&Layer> {
        self.layers.get(index).ok_or(Error::LayerNotFound(index))
    }

    /// Mutable layer at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::LayerNotFound`] when there is none.
    pub fn layer_mut(&mut self, index: usize) -> Result<&mut Layer> {
        self.layers.get_mut(index).ok_or(Error::LayerNotFound(index))
    }

    /// Pixel access to layer `index` for the current frame.
    ///
    /// # Errors
    ///
    /// [`Error::LayerNotFound`] when there is none.
    pub fn view(&mut self, index: usize) -> Result<LayerView<'_>> {
        let layer = self.layers.get_mut(index).ok_or(Error::LayerNotFound(index))?;
        let leds = self.leds.get_mut(..self.nr_of_leds).unwrap_or_default();
        Ok(LayerView::new(
            layer,
            leds,
            self.frame,
            self.size,
            self.config.global_blend,
            &mut self.rng,
            &mut self.diagnostics,
        ))
    }

    /// Set the time and orientation read-time transforms see until the next call.
    pub fn begin_frame(&mut self, now_ms: u32, orientation: Option<Coord3D>) {
        self.frame = Frame {
            now_ms,
            orientation,
        };
    }

    /// State of the current frame.
    #[must_use]
    pub const fn frame(&self) -> Frame {
        self.frame
    }

    /// Blank the physical buffer.
    pub fn clear(&mut self) {
        self.leds.fill(BLACK);
    }

    /// Rebuild every layer on the next pass, e.g. after the fixture description changed.
    pub fn request_remap(&mut self) {
        self.remap_requested = true;
    }

    /// True when a pass is pending.
    #[must_use]
    pub fn needs_mapping(&self) -> bool {
        self.remap_requested || self.layers.iter().any(Layer::needs_mapping)
    }

    /// Run one pass if anything is pending; any number of requests since the last pass
    /// coalesce into this one. Returns whether a pass ran.
    ///
    /// # Errors
    ///
    /// See [`project_and_map`](Self::project_and_map).
    pub fn map_if_needed(
        &mut self,
        source: &mut impl FixtureSource,
        pins: &mut impl PinAllocator,
    ) -> Result<bool> {
        if !self.needs_mapping() {
            return Ok(false);
        }
        self.project_and_map(source, pins)?;
        Ok(true)
    }

    /// Soft error counters.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Soft error counters, resetting them.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        core::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_slots_are_bounded() {
        let mut fixture = Fixture::new(FixtureConfig::default());
        for expected in 0..MAX_LAYERS {
            assert_eq!(fixture.add_layer(ProjectionKind::None), Ok(expected));
        }
        assert_eq!(fixture.add_layer(ProjectionKind::None), Err(Error::TooManyLayers));
        assert_eq!(fixture.layer(MAX_LAYERS).err(), Some(Error::LayerNotFound(MAX_LAYERS)));
        assert!(fixture.pop_layer().is_some());
        assert!(fixture.add_layer(ProjectionKind::Default).is_ok());
    }

    #[test]
    fn unmapped_fixture_has_no_leds() {
        let mut fixture = Fixture::new(FixtureConfig::default());
        let layer = fixture.add_layer(ProjectionKind::None).unwrap();
        assert!(fixture.leds().is_empty());
        assert!(fixture.needs_mapping());
        let mut view = fixture.view(layer).unwrap();
        view.set_pixel_color(0, RGB8::new(1, 2, 3), None);
        assert_eq!(fixture.diagnostics().physical_out_of_bounds, 1);
        assert_eq!(fixture.take_diagnostics().physical_out_of_bounds, 1);
        assert_eq!(fixture.diagnostics(), &Diagnostics::default());
    }

    #[test]
    fn frame_state_is_kept() {
        let mut fixture = Fixture::new(FixtureConfig::default());
        fixture.begin_frame(1234, Some(Coord3D::new(0, 90, 0)));
        assert_eq!(fixture.frame().now_ms, 1234);
        assert_eq!(fixture.frame().orientation, Some(Coord3D::new(0, 90, 0)));
    }
}
