//! Fit an effect's dimensionality onto the fixture's.

use crate::Coord3D;
use crate::coord::{icbrt, isqrt};

use super::{Dimension, MapContext, Projection};

/// Reduces or folds axes so a 1D, 2D or 3D effect covers any fixture shape.
///
/// | effect | fixture | canvas |
/// |--------|---------|--------|
/// | 1D | any | a line as long as the farthest distance from the midpoint |
/// | 2D | 1D | the strip folded into rows of `√n` |
/// | 2D | 2D | the two long axes |
/// | 2D | 3D | x+y/2 by y/2+z |
/// | 3D | 1D | the strip folded into a `∛n` cube |
/// | 3D | 2D/3D | unchanged |
///
/// The canvas is derived only from the first point of a pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProjection;

impl Projection for DefaultProjection {
    fn name(&self) -> &'static str {
        "Default"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        _pixel: &mut Coord3D,
        mid: &mut Coord3D,
    ) {
        if !ctx.canvas_unset() {
            return;
        }
        let before = *size;
        *size = reduced_size(ctx, *size, *mid);
        debug!(
            "DefaultProjection: {}D effect on {}D region {},{},{} -> {},{},{}",
            ctx.effect_dimension as u8,
            ctx.projection_dimension,
            before.x,
            before.y,
            before.z,
            size.x,
            size.y,
            size.z
        );
    }

    fn adjust_mapped(
        &self,
        ctx: &MapContext<'_>,
        mapped: &mut Coord3D,
        _size: Coord3D,
        pixel: Coord3D,
        mid: Coord3D,
    ) {
        *mapped = mapped_coord(ctx, pixel, mid);
    }
}

fn reduced_size(ctx: &MapContext<'_>, size: Coord3D, mid: Coord3D) -> Coord3D {
    match (ctx.effect_dimension, ctx.projection_dimension) {
        (Dimension::One, _) => {
            let reach =
                |extent: i32, middle: i32| u64::from((extent - middle).max(middle).unsigned_abs());
            let (x, y, z) = (reach(size.x, mid.x), reach(size.y, mid.y), reach(size.z, mid.z));
            let length = isqrt(x * x + y * y + z * z) as i32 + 1;
            Coord3D::new(length, 1, 1)
        }
        (Dimension::Two, 1) => {
            let count = size.product().max(1);
            let width = (isqrt(count as u64) as i64).max(1);
            Coord3D::new(width as i32, (count / width) as i32, 1)
        }
        (Dimension::Two, 2) => {
            if size.x > 1 {
                let y = if size.y <= 1 { size.z } else { size.y };
                Coord3D::new(size.x, y, 1)
            } else {
                Coord3D::new(size.y, size.z, 1)
            }
        }
        (Dimension::Two, 3) => Coord3D::new(size.x + size.y / 2, size.y / 2 + size.z, 1),
        (Dimension::Three, 1) => {
            let side = (icbrt(size.product().max(1) as u64) as i32).max(1);
            Coord3D::splat(side)
        }
        _ => size,
    }
}

fn mapped_coord(ctx: &MapContext<'_>, pixel: Coord3D, mid: Coord3D) -> Coord3D {
    match (ctx.effect_dimension, ctx.projection_dimension) {
        (Dimension::One, _) => Coord3D::new(pixel.distance(mid) as i32, 0, 0),
        (Dimension::Two, 1) => {
            let linear = pixel.x + pixel.y + pixel.z;
            let width = ctx.canvas.x.max(1);
            Coord3D::new(linear % width, linear / width, 0)
        }
        (Dimension::Two, 2) => {
            // Axis choice follows the region so the first point maps like the rest.
            let region = ctx.region;
            if region.x > 1 {
                let y = if region.y > 1 { pixel.y } else { pixel.z };
                Coord3D::new(pixel.x, y, 0)
            } else {
                Coord3D::new(pixel.y, pixel.z, 0)
            }
        }
        (Dimension::Two, 3) => Coord3D::new(pixel.x + pixel.y / 2, pixel.y / 2 + pixel.z, 0),
        (Dimension::Two, _) => Coord3D::ZERO,
        (Dimension::Three, 1) => {
            let linear = pixel.x + pixel.y + pixel.z;
            let side = ctx.canvas.x.max(1);
            Coord3D::new(linear % side, (linear / side) % side, linear / (side * side))
        }
        (Dimension::Three, _) => pixel,
    }
}
