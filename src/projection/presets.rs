//! Fixed chains of other projections. Order matters: each stage reads and overwrites the
//! running size, pixel and midpoint.

use crate::Coord3D;

use super::{
    DefaultProjection, GroupingProjection, MapContext, MirrorProjection, MultiplyProjection,
    PinwheelProjection, Projection, ReverseProjection, TiltPanRollProjection,
    TransposeProjection, XyzContext,
};

const MODIFIER_CHAIN: [&dyn Projection; 5] = [
    &TransposeProjection,
    &ReverseProjection,
    &MirrorProjection,
    &GroupingProjection,
    &MultiplyProjection,
];

fn run_chain(
    stages: &[&dyn Projection],
    ctx: &MapContext<'_>,
    size: &mut Coord3D,
    pixel: &mut Coord3D,
    mid: &mut Coord3D,
) {
    for stage in stages {
        stage.adjust_size_and_pixel(ctx, size, pixel, mid);
    }
}

/// Default sizing tiled by Multiply, with TiltPanRoll rotation on access.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preset1Projection;

impl Projection for Preset1Projection {
    fn name(&self) -> &'static str {
        "Preset1"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        mid: &mut Coord3D,
    ) {
        run_chain(&[&DefaultProjection, &MultiplyProjection], ctx, size, pixel, mid);
    }

    fn adjust_mapped(
        &self,
        ctx: &MapContext<'_>,
        mapped: &mut Coord3D,
        size: Coord3D,
        pixel: Coord3D,
        mid: Coord3D,
    ) {
        DefaultProjection.adjust_mapped(ctx, mapped, size, pixel, mid);
    }

    fn adjust_xyz(&self, ctx: &mut XyzContext<'_>, pixel: &mut Coord3D) {
        TiltPanRollProjection.adjust_xyz(ctx, pixel);
    }

    fn has_xyz(&self) -> bool {
        true
    }
}

/// Transpose, reverse, mirror, group and multiply, then a pinwheel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifiedPinwheelProjection;

impl Projection for ModifiedPinwheelProjection {
    fn name(&self) -> &'static str {
        "Modified Pinwheel"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        mid: &mut Coord3D,
    ) {
        run_chain(&MODIFIER_CHAIN, ctx, size, pixel, mid);
        PinwheelProjection.adjust_size_and_pixel(ctx, size, pixel, mid);
    }

    fn adjust_mapped(
        &self,
        ctx: &MapContext<'_>,
        mapped: &mut Coord3D,
        size: Coord3D,
        pixel: Coord3D,
        mid: Coord3D,
    ) {
        PinwheelProjection.adjust_mapped(ctx, mapped, size, pixel, mid);
    }
}

/// Transpose, reverse, mirror, group and multiply, then Default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifiedDefaultProjection;

impl Projection for ModifiedDefaultProjection {
    fn name(&self) -> &'static str {
        "Modified Default"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        mid: &mut Coord3D,
    ) {
        run_chain(&MODIFIER_CHAIN, ctx, size, pixel, mid);
        DefaultProjection.adjust_size_and_pixel(ctx, size, pixel, mid);
    }

    fn adjust_mapped(
        &self,
        ctx: &MapContext<'_>,
        mapped: &mut Coord3D,
        size: Coord3D,
        pixel: Coord3D,
        mid: Coord3D,
    ) {
        DefaultProjection.adjust_mapped(ctx, mapped, size, pixel, mid);
    }
}
