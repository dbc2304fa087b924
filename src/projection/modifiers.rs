//! Size-and-pixel modifiers. Each reshapes the running size/pixel/mid state and leaves the
//! final coordinate choice to whatever runs after it.

use crate::Coord3D;
use crate::config::{AxisFlags, TransposeFlags};

use super::{MapContext, Projection};

/// Tiles the canvas: the region is cut into `multiply` tiles that all share one canvas.
///
/// With `multiply_mirror`, odd tiles along an axis are reflected so neighbors meet edge
/// to edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplyProjection;

impl Projection for MultiplyProjection {
    fn name(&self) -> &'static str {
        "Multiply"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        mid: &mut Coord3D,
    ) {
        let tiles = ctx.settings.multiply.maximum(Coord3D::ONE);
        if tiles == Coord3D::ONE {
            return;
        }

        *size = (*size + tiles - Coord3D::ONE) / tiles;
        *mid /= tiles;
        let tile_size = size.maximum(Coord3D::ONE);

        if ctx.settings.multiply_mirror {
            let tile = *pixel / tile_size;
            *pixel = *pixel % tile_size;
            if tile.x % 2 != 0 {
                pixel.x = tile_size.x - 1 - pixel.x;
            }
            if tile.y % 2 != 0 {
                pixel.y = tile_size.y - 1 - pixel.y;
            }
            if tile.z % 2 != 0 {
                pixel.z = tile_size.z - 1 - pixel.z;
            }
        } else {
            *pixel = *pixel % tile_size;
        }
    }
}

/// Counts the flagged axes backwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseProjection;

impl Projection for ReverseProjection {
    fn name(&self) -> &'static str {
        "Reverse"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        _mid: &mut Coord3D,
    ) {
        let flags = ctx.settings.reverse;
        if flags.contains(AxisFlags::X) {
            pixel.x = size.x - pixel.x - 1;
        }
        if flags.contains(AxisFlags::Y) {
            pixel.y = size.y - pixel.y - 1;
        }
        if flags.contains(AxisFlags::Z) {
            pixel.z = size.z - pixel.z - 1;
        }
    }
}

/// Folds the flagged axes in half so both halves show the same content.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorProjection;

impl Projection for MirrorProjection {
    fn name(&self) -> &'static str {
        "Mirror"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        _mid: &mut Coord3D,
    ) {
        let flags = ctx.settings.mirror;
        let fold = |position: &mut i32, extent: &mut i32| {
            if *position >= *extent / 2 {
                *position = *extent - 1 - *position;
            }
            *extent = (*extent + 1) / 2;
        };
        if flags.contains(AxisFlags::X) {
            fold(&mut pixel.x, &mut size.x);
        }
        if flags.contains(AxisFlags::Y) {
            fold(&mut pixel.y, &mut size.y);
        }
        if flags.contains(AxisFlags::Z) {
            fold(&mut pixel.z, &mut size.z);
        }
    }
}

/// Merges `grouping` adjacent cells into one virtual cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupingProjection;

impl Projection for GroupingProjection {
    fn name(&self) -> &'static str {
        "Grouping"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        _mid: &mut Coord3D,
    ) {
        let group = ctx.settings.grouping.maximum(Coord3D::ONE);
        if group == Coord3D::ONE {
            return;
        }
        *pixel = *pixel / group;
        *size = (*size + group - Coord3D::ONE) / group;
    }
}

/// Swaps axis pairs of the size, the pixel and the midpoint.
///
/// Size and midpoint turn with the pixel, so a non-square region yields the transposed
/// canvas and every point stays inside it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransposeProjection;

impl Projection for TransposeProjection {
    fn name(&self) -> &'static str {
        "Transpose"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        mid: &mut Coord3D,
    ) {
        let flags = ctx.settings.transpose;
        for coord in [size, pixel, mid] {
            transpose(flags, coord);
        }
    }
}

pub(super) fn transpose(flags: TransposeFlags, coord: &mut Coord3D) {
    if flags.contains(TransposeFlags::XY) {
        core::mem::swap(&mut coord.x, &mut coord.y);
    }
    if flags.contains(TransposeFlags::XZ) {
        core::mem::swap(&mut coord.x, &mut coord.z);
    }
    if flags.contains(TransposeFlags::YZ) {
        core::mem::swap(&mut coord.y, &mut coord.z);
    }
}
