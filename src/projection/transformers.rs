//! Read-time transformers: they reshape coordinates on access and leave the mapping
//! table alone, so toggling them never triggers a remap.

use crate::Coord3D;
use crate::config::{AxisFlags, TransposeFlags};

use super::{Projection, XyzContext};

/// Swaps axes on every read and write.
///
/// XY is always honored. XZ and YZ only apply on a 3D region, where z has extent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransposeXyzProjection;

impl Projection for TransposeXyzProjection {
    fn name(&self) -> &'static str {
        "Transpose XYZ"
    }

    fn adjust_xyz(&self, ctx: &mut XyzContext<'_>, pixel: &mut Coord3D) {
        let mut flags = ctx.settings.transpose;
        if ctx.projection_dimension != 3 {
            flags.set(TransposeFlags::XZ, false);
            flags.set(TransposeFlags::YZ, false);
        }
        super::modifiers::transpose(flags, pixel);
    }

    fn has_xyz(&self) -> bool {
        true
    }
}

/// Counts the flagged axes backwards on every read and write.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseXyzProjection;

impl Projection for ReverseXyzProjection {
    fn name(&self) -> &'static str {
        "Reverse XYZ"
    }

    fn adjust_xyz(&self, ctx: &mut XyzContext<'_>, pixel: &mut Coord3D) {
        let flags = ctx.settings.reverse;
        let canvas = ctx.canvas;
        if flags.contains(AxisFlags::X) {
            pixel.x = canvas.x - pixel.x - 1;
        }
        if flags.contains(AxisFlags::Y) {
            pixel.y = canvas.y - pixel.y - 1;
        }
        if flags.contains(AxisFlags::Z) {
            pixel.z = canvas.z - pixel.z - 1;
        }
    }

    fn has_xyz(&self) -> bool {
        true
    }
}
