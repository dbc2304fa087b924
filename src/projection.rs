//! Projections fold a fixture's physical geometry into a layer's virtual canvas.
//!
//! A [`Projection`] has three hooks. The mapping pass calls the first two once per physical
//! point; pixel reads and writes call the third on every access:
//!
//! 1. [`adjust_size_and_pixel`](Projection::adjust_size_and_pixel) reshapes the region size,
//!    the point and the midpoint (tiling, grouping, mirroring, dimension reduction).
//! 2. [`adjust_mapped`](Projection::adjust_mapped) picks the final virtual coordinate,
//!    which is then flattened row-major into a virtual index.
//! 3. [`adjust_xyz`](Projection::adjust_xyz) transforms a coordinate at read/write time
//!    without touching the mapping table (rotation, live reverse/transpose).
//!
//! Concrete projections are stateless; everything they read comes in through
//! [`MapContext`] or [`XyzContext`]. [`ProjectionKind`] names them and hands out the
//! shared `&'static dyn Projection` for each.

mod default;
mod modifiers;
mod pinwheel;
mod presets;
mod rotation;
mod transformers;

pub use default::DefaultProjection;
pub use modifiers::{
    GroupingProjection, MirrorProjection, MultiplyProjection, ReverseProjection,
    TransposeProjection,
};
pub use pinwheel::PinwheelProjection;
pub use presets::{ModifiedDefaultProjection, ModifiedPinwheelProjection, Preset1Projection};
pub use rotation::{DistanceFromPointProjection, TiltPanRollProjection, inverse_distance_search};
pub use transformers::{ReverseXyzProjection, TransposeXyzProjection};

use serde::{Deserialize, Serialize};

use crate::Coord3D;
use crate::config::ProjectionSettings;
use crate::trigo::Trigo;

/// Number of axes an effect draws in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// A strip.
    #[default]
    One = 1,
    /// A plane.
    Two = 2,
    /// A volume.
    Three = 3,
}

/// What a projection sees while one physical point is mapped into one layer.
#[derive(Debug, Clone, Copy)]
pub struct MapContext<'a> {
    /// Dimensionality the layer's effect draws in.
    pub effect_dimension: Dimension,
    /// Number of region axes longer than one cell.
    pub projection_dimension: u8,
    /// Region of interest size in cells, before any projection reshaped it.
    pub region: Coord3D,
    /// Canvas fixed by the first point of this pass; zero until then.
    pub canvas: Coord3D,
    /// Projection parameters of the layer.
    pub settings: &'a ProjectionSettings,
}

impl MapContext<'_> {
    /// True before the first point of the pass has fixed the canvas.
    #[must_use]
    pub fn canvas_unset(&self) -> bool {
        self.canvas == Coord3D::ZERO
    }
}

/// What a projection sees when a coordinate is read or written.
#[derive(Debug)]
pub struct XyzContext<'a> {
    /// Layer canvas size.
    pub canvas: Coord3D,
    /// Number of region axes longer than one cell.
    pub projection_dimension: u8,
    /// Physical fixture size in cells.
    pub fixture_size: Coord3D,
    /// Projection parameters of the layer.
    pub settings: &'a ProjectionSettings,
    /// Milliseconds since start, from the current frame.
    pub now_ms: u32,
    /// Orientation sensor reading for this frame, in degrees per axis.
    pub orientation: Option<Coord3D>,
    /// The layer's own trigonometry cache.
    pub trigo: &'a mut Trigo,
}

/// Strategy that folds physical geometry into a virtual canvas.
///
/// Every hook has a neutral default, so a projection implements only what it changes.
pub trait Projection: Sync {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Reshape the region `size`, the `pixel` inside it and the midpoint `mid`.
    fn adjust_size_and_pixel(
        &self,
        _ctx: &MapContext<'_>,
        _size: &mut Coord3D,
        _pixel: &mut Coord3D,
        _mid: &mut Coord3D,
    ) {
    }

    /// Pick the final virtual coordinate for `pixel`.
    fn adjust_mapped(
        &self,
        _ctx: &MapContext<'_>,
        mapped: &mut Coord3D,
        _size: Coord3D,
        pixel: Coord3D,
        _mid: Coord3D,
    ) {
        *mapped = pixel;
    }

    /// Transform a coordinate at read/write time. Must keep it within the canvas range.
    fn adjust_xyz(&self, _ctx: &mut XyzContext<'_>, _pixel: &mut Coord3D) {}

    /// True when [`adjust_xyz`](Self::adjust_xyz) does anything; lets the hot path skip it.
    fn has_xyz(&self) -> bool {
        false
    }

    /// True when a mapped index must be resolved with [`inverse_distance_search`].
    fn needs_inverse(&self, _ctx: &MapContext<'_>) -> bool {
        false
    }
}

/// Passthrough: no table, writes land on the physical index directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneProjection;

impl Projection for NoneProjection {
    fn name(&self) -> &'static str {
        "None"
    }
}

/// Passthrough to a random physical LED on every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomProjection;

impl Projection for RandomProjection {
    fn name(&self) -> &'static str {
        "Random"
    }
}

/// Every available projection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// [`NoneProjection`].
    #[default]
    None,
    /// [`DefaultProjection`].
    Default,
    /// [`PinwheelProjection`].
    Pinwheel,
    /// [`RandomProjection`].
    Random,
    /// [`MultiplyProjection`].
    Multiply,
    /// [`ReverseProjection`].
    Reverse,
    /// [`MirrorProjection`].
    Mirror,
    /// [`GroupingProjection`].
    Grouping,
    /// [`TransposeProjection`].
    Transpose,
    /// [`TiltPanRollProjection`].
    TiltPanRoll,
    /// [`DistanceFromPointProjection`].
    DistanceFromPoint,
    /// [`Preset1Projection`].
    Preset1,
    /// [`ModifiedPinwheelProjection`].
    ModifiedPinwheel,
    /// [`ModifiedDefaultProjection`].
    ModifiedDefault,
    /// [`TransposeXyzProjection`].
    TransposeXyz,
    /// [`ReverseXyzProjection`].
    ReverseXyz,
}

impl ProjectionKind {
    /// Every kind, in menu order.
    pub const ALL: [Self; 16] = [
        Self::None,
        Self::Default,
        Self::Pinwheel,
        Self::Random,
        Self::Multiply,
        Self::Reverse,
        Self::Mirror,
        Self::Grouping,
        Self::Transpose,
        Self::TiltPanRoll,
        Self::DistanceFromPoint,
        Self::Preset1,
        Self::ModifiedPinwheel,
        Self::ModifiedDefault,
        Self::TransposeXyz,
        Self::ReverseXyz,
    ];

    /// Shared instance implementing this kind.
    #[must_use]
    pub fn projection(self) -> &'static dyn Projection {
        match self {
            Self::None => &NoneProjection,
            Self::Default => &DefaultProjection,
            Self::Pinwheel => &PinwheelProjection,
            Self::Random => &RandomProjection,
            Self::Multiply => &MultiplyProjection,
            Self::Reverse => &ReverseProjection,
            Self::Mirror => &MirrorProjection,
            Self::Grouping => &GroupingProjection,
            Self::Transpose => &TransposeProjection,
            Self::TiltPanRoll => &TiltPanRollProjection,
            Self::DistanceFromPoint => &DistanceFromPointProjection,
            Self::Preset1 => &Preset1Projection,
            Self::ModifiedPinwheel => &ModifiedPinwheelProjection,
            Self::ModifiedDefault => &ModifiedDefaultProjection,
            Self::TransposeXyz => &TransposeXyzProjection,
            Self::ReverseXyz => &ReverseXyzProjection,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.projection().name()
    }

    /// Look a kind up by display name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// False for the passthrough kinds, which never build a mapping table.
    #[must_use]
    pub const fn builds_table(self) -> bool {
        !matches!(self, Self::None | Self::Random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in ProjectionKind::ALL {
            assert_eq!(ProjectionKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ProjectionKind::from_name("pinwheel"), Some(ProjectionKind::Pinwheel));
        assert_eq!(ProjectionKind::from_name("nope"), None);
    }

    #[test]
    fn passthrough_kinds_skip_tables() {
        assert!(!ProjectionKind::None.builds_table());
        assert!(!ProjectionKind::Random.builds_table());
        assert!(ProjectionKind::Multiply.builds_table());
    }
}
