//! Layers: one effect surface per slot, each with its own projection and mapping table.
//!
//! A [`Layer`] is plain configuration plus the products of the last mapping pass. Pixel
//! access goes through a [`LayerView`], which the fixture hands out together with the
//! physical buffer and the frame state.

mod draw;
mod view;

pub use draw::Font;
pub use view::LayerView;

use serde::{Deserialize, Serialize};

use crate::Coord3D;
use crate::config::ProjectionSettings;
use crate::mapping::MappingTable;
use crate::projection::{Dimension, ProjectionKind};
use crate::scratch::ScratchArena;
use crate::trigo::{Trigo, TrigoStats};

/// Sub-volume of the fixture a layer covers, in fixture cells.
///
/// Each corner is clamped to the fixture when a mapping pass runs, so the default covers
/// the whole fixture whatever its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// First cell, inclusive.
    pub start: Coord3D,
    /// Centre used by distance and angle based projections.
    pub mid: Coord3D,
    /// Last cell, inclusive.
    pub end: Coord3D,
}

impl Region {
    /// The whole fixture.
    pub const WHOLE: Self = Self {
        start: Coord3D::ZERO,
        mid: Coord3D::ZERO,
        end: Coord3D::splat(i32::MAX),
    };
}

impl Default for Region {
    fn default() -> Self {
        Self::WHOLE
    }
}

/// Where a layer stands in the mapping cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// Configuration changed since the last pass; the table is stale.
    #[default]
    Unmapped,
    /// A pass is rebuilding the table.
    Mapping,
    /// The table matches the configuration.
    Mapped,
}

/// One effect surface composited onto the fixture.
#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) kind: ProjectionKind,
    pub(crate) effect: u16,
    pub(crate) effect_dimension: Dimension,
    pub(crate) projection_dimension: u8,
    pub(crate) region: Region,
    pub(crate) settings: ProjectionSettings,
    pub(crate) size: Coord3D,
    pub(crate) nr_of_leds: usize,
    pub(crate) mapping: MappingTable,
    pub(crate) state: MapState,
    pub(crate) trigo: Trigo,
    pub(crate) effect_data: ScratchArena,
    pub(crate) projection_data: ScratchArena,
}

impl Layer {
    /// Unmapped layer with the given projection and default settings.
    #[must_use]
    pub fn new(kind: ProjectionKind) -> Self {
        Self {
            kind,
            effect: 0,
            effect_dimension: Dimension::default(),
            projection_dimension: 0,
            region: Region::default(),
            settings: ProjectionSettings::default(),
            size: Coord3D::ZERO,
            nr_of_leds: 0,
            mapping: MappingTable::new(),
            state: MapState::Unmapped,
            trigo: Trigo::default(),
            effect_data: ScratchArena::new(),
            projection_data: ScratchArena::new(),
        }
    }

    /// Assigned projection.
    #[must_use]
    pub const fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Assigned effect id.
    #[must_use]
    pub const fn effect(&self) -> u16 {
        self.effect
    }

    /// Dimensionality the assigned effect draws in.
    #[must_use]
    pub const fn effect_dimension(&self) -> Dimension {
        self.effect_dimension
    }

    /// Number of region axes longer than one cell, as of the last pass.
    #[must_use]
    pub const fn projection_dimension(&self) -> u8 {
        self.projection_dimension
    }

    /// Region of interest.
    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    /// Projection parameters.
    #[must_use]
    pub const fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    /// Virtual canvas size from the last pass.
    #[must_use]
    pub const fn size(&self) -> Coord3D {
        self.size
    }

    /// Number of virtual pixels from the last pass.
    #[must_use]
    pub const fn nr_of_leds(&self) -> usize {
        self.nr_of_leds
    }

    /// Mapping table from the last pass; empty for passthrough projections.
    #[must_use]
    pub const fn mapping(&self) -> &MappingTable {
        &self.mapping
    }

    /// Position in the mapping cycle.
    #[must_use]
    pub const fn state(&self) -> MapState {
        self.state
    }

    /// True when the next pass must rebuild this layer.
    #[must_use]
    pub fn needs_mapping(&self) -> bool {
        self.state != MapState::Mapped
    }

    /// Trigonometry cache counters for this layer's read-time rotations.
    #[must_use]
    pub const fn trigo_stats(&self) -> TrigoStats {
        self.trigo.stats()
    }

    /// Scratch arena reserved for the effect.
    pub const fn effect_data(&mut self) -> &mut ScratchArena {
        &mut self.effect_data
    }

    /// Scratch arena reserved for the projection.
    pub const fn projection_data(&mut self) -> &mut ScratchArena {
        &mut self.projection_data
    }

    /// Switch projection. Marks the layer for remapping when it changes.
    pub fn set_projection(&mut self, kind: ProjectionKind) {
        if kind != self.kind {
            self.kind = kind;
            self.projection_data.clear();
            self.trigo.invalidate();
            self.mark_dirty("projection");
        }
    }

    /// Switch effect. Marks the layer for remapping when the effect or its dimensionality
    /// changes.
    pub fn set_effect(&mut self, effect: u16, dimension: Dimension) {
        if effect != self.effect || dimension != self.effect_dimension {
            self.effect = effect;
            self.effect_dimension = dimension;
            self.effect_data.clear();
            self.mark_dirty("effect");
        }
    }

    /// Change the region of interest. Marks the layer for remapping when it changes.
    pub fn set_region(&mut self, region: Region) {
        if region != self.region {
            self.region = region;
            self.mark_dirty("region");
        }
    }

    /// Edit the projection parameters in place.
    ///
    /// Only changes that alter geometry mark the layer for remapping; rotation speeds and
    /// the orientation switch take effect on the next pixel access.
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut ProjectionSettings)) {
        let before = self.settings;
        edit(&mut self.settings);
        if before.geometry_differs(&self.settings) {
            self.mark_dirty("settings");
        }
    }

    /// Force a rebuild on the next pass.
    pub fn invalidate(&mut self) {
        self.mark_dirty("invalidate");
    }

    fn mark_dirty(&mut self, reason: &str) {
        if self.state == MapState::Mapped {
            debug!("Layer::mark_dirty: {}", reason);
        }
        self.state = MapState::Unmapped;
    }

    pub(crate) fn begin_mapping(&mut self) {
        self.state = MapState::Mapping;
    }

    /// Leave a failed pass with the previous products in place.
    pub(crate) fn abort_mapping(&mut self) {
        self.state = MapState::Unmapped;
    }

    /// Install the products of a completed pass.
    pub(crate) fn finish_mapping(
        &mut self,
        size: Coord3D,
        nr_of_leds: usize,
        projection_dimension: u8,
        mapping: MappingTable,
    ) {
        self.size = size;
        self.nr_of_leds = nr_of_leds;
        self.projection_dimension = projection_dimension;
        self.mapping = mapping;
        self.trigo.invalidate();
        self.state = MapState::Mapped;
    }
}
