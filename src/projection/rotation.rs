//! Projections that rotate or radially remap a Default-sized canvas.

use crate::Coord3D;
use crate::trigo::{Axis, Trigo};

use super::{DefaultProjection, Dimension, MapContext, Projection, XyzContext};

/// Angle domain used for time-driven rotation.
const ROTATION_PERIOD: u16 = 255;

/// Default sizing and mapping, rotated at read/write time.
///
/// Each axis with a non-zero speed turns by `now * 5 / (255 - speed)`. When
/// `use_orientation` is set and the frame carries an orientation reading, that reading
/// drives the rotation instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiltPanRollProjection;

impl Projection for TiltPanRollProjection {
    fn name(&self) -> &'static str {
        "TiltPanRoll"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        mid: &mut Coord3D,
    ) {
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

    fn adjust_xyz(&self, ctx: &mut XyzContext<'_>, pixel: &mut Coord3D) {
        let middle = ctx.canvas / 2;
        let settings = ctx.settings;
        ctx.trigo.set_period(ROTATION_PERIOD);

        if let Some(orientation) = ctx.orientation.filter(|_| settings.use_orientation) {
            *pixel = ctx.trigo.tilt(*pixel, middle, orientation.x.rem_euclid(360) as u16);
            *pixel = ctx.trigo.pan(*pixel, middle, orientation.y.rem_euclid(360) as u16);
            *pixel = ctx.trigo.roll(*pixel, middle, orientation.z.rem_euclid(360) as u16);
            return;
        }

        if settings.tilt_speed != 0 {
            *pixel = ctx.trigo.tilt(*pixel, middle, timed_angle(ctx.now_ms, settings.tilt_speed));
        }
        if settings.pan_speed != 0 {
            *pixel = ctx.trigo.pan(*pixel, middle, timed_angle(ctx.now_ms, settings.pan_speed));
        }
        if settings.roll_speed != 0 {
            *pixel = ctx.trigo.roll(*pixel, middle, timed_angle(ctx.now_ms, settings.roll_speed));
        }
        if ctx.fixture_size.z == 1 {
            pixel.z = 0;
        }
    }

    fn has_xyz(&self) -> bool {
        true
    }
}

fn timed_angle(now_ms: u32, speed: u8) -> u16 {
    let divisor = 255 - u32::from(speed.min(254));
    (now_ms.wrapping_mul(5) / divisor) as u16
}

/// Default sizing and mapping; a 2D effect on a 2D region is resolved through
/// [`inverse_distance_search`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceFromPointProjection;

impl Projection for DistanceFromPointProjection {
    fn name(&self) -> &'static str {
        "DistanceFromPoint"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        pixel: &mut Coord3D,
        mid: &mut Coord3D,
    ) {
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

    fn needs_inverse(&self, ctx: &MapContext<'_>) -> bool {
        ctx.effect_dimension == Dimension::Two && ctx.projection_dimension == 2
    }
}

/// Find the canvas cell whose forward spiral position flattens to `index`.
///
/// Cell `(x, y)` is sent to
/// `((f·sin(x) + w) / 2, (f·cos(x) + h) / 2)` with `f = 1 - y / (h - 1)`, the angle
/// period being `w - 1`. Cells are scanned column by column and the first hit wins. The
/// hit is returned as the row-major index of `(x, y)`; `None` leaves the point unmapped.
#[must_use]
pub fn inverse_distance_search(canvas: Coord3D, index: usize) -> Option<usize> {
    let (width, height) = (canvas.x, canvas.y);
    if width <= 0 || height <= 0 {
        return None;
    }
    let mut trigo = Trigo::new((width - 1).clamp(1, i32::from(u16::MAX)) as u16);

    for x in 0..width {
        let angle = x as u16;
        let sin = trigo.sin(width, angle, Axis::Pan) as f32;
        let cos = trigo.cos(height, angle, Axis::Pan) as f32;
        for y in 0..height {
            let y_factor = if height > 1 { 1.0 - y as f32 / (height - 1) as f32 } else { 1.0 };
            let x2 = libm::roundf((y_factor * sin + width as f32) / 2.0) as i32;
            let y2 = libm::roundf((y_factor * cos + height as f32) / 2.0) as i32;
            let hit = Coord3D::new(x2, y2, 0).flatten(Coord3D::new(width, height, 1));
            if hit == Some(index) {
                return Some((x + y * width) as usize);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectionSettings;

    fn xyz_ctx<'a>(
        settings: &'a ProjectionSettings,
        trigo: &'a mut Trigo,
        now_ms: u32,
        orientation: Option<Coord3D>,
    ) -> XyzContext<'a> {
        XyzContext {
            canvas: Coord3D::new(10, 10, 1),
            projection_dimension: 2,
            fixture_size: Coord3D::new(10, 10, 1),
            settings,
            now_ms,
            orientation,
            trigo,
        }
    }

    #[test]
    fn no_speed_no_rotation() {
        let settings = ProjectionSettings {
            tilt_speed: 0,
            pan_speed: 0,
            roll_speed: 0,
            ..ProjectionSettings::default()
        };
        let mut trigo = Trigo::default();
        let mut ctx = xyz_ctx(&settings, &mut trigo, 12_345, None);
        let mut pixel = Coord3D::new(3, 7, 0);
        TiltPanRollProjection.adjust_xyz(&mut ctx, &mut pixel);
        assert_eq!(pixel, Coord3D::new(3, 7, 0));
    }

    #[test]
    fn roll_turns_about_canvas_center() {
        // speed 250: angle = 51 * 5 / 5 = 51, a fifth of the 255 period.
        let settings = ProjectionSettings {
            tilt_speed: 0,
            pan_speed: 0,
            roll_speed: 250,
            ..ProjectionSettings::default()
        };
        let mut trigo = Trigo::default();
        let mut ctx = xyz_ctx(&settings, &mut trigo, 51, None);
        let mut center = Coord3D::new(5, 5, 0);
        TiltPanRollProjection.adjust_xyz(&mut ctx, &mut center);
        assert_eq!(center, Coord3D::new(5, 5, 0));

        let mut pixel = Coord3D::new(9, 5, 0);
        TiltPanRollProjection.adjust_xyz(&mut ctx, &mut pixel);
        assert_ne!(pixel, Coord3D::new(9, 5, 0));
        assert_eq!(pixel.z, 0);
    }

    #[test]
    fn orientation_overrides_speeds_when_enabled() {
        let settings = ProjectionSettings {
            use_orientation: true,
            ..ProjectionSettings::default()
        };
        let mut trigo = Trigo::default();
        let mut ctx = xyz_ctx(&settings, &mut trigo, 99_999, Some(Coord3D::ZERO));
        let mut pixel = Coord3D::new(2, 8, 0);
        TiltPanRollProjection.adjust_xyz(&mut ctx, &mut pixel);
        assert_eq!(pixel, Coord3D::new(2, 8, 0));
    }

    #[test]
    fn negative_orientation_wraps_to_a_full_turn() {
        let settings = ProjectionSettings {
            use_orientation: true,
            ..ProjectionSettings::default()
        };
        let turned = |orientation: Coord3D| {
            let mut trigo = Trigo::default();
            let mut ctx = xyz_ctx(&settings, &mut trigo, 0, Some(orientation));
            let mut pixel = Coord3D::new(9, 5, 0);
            TiltPanRollProjection.adjust_xyz(&mut ctx, &mut pixel);
            pixel
        };
        assert_eq!(turned(Coord3D::new(0, 0, -90)), turned(Coord3D::new(0, 0, 270)));
        assert_eq!(turned(Coord3D::new(0, 0, 450)), turned(Coord3D::new(0, 0, 90)));
        assert_ne!(turned(Coord3D::new(0, 0, -90)), turned(Coord3D::new(0, 0, 90)));
    }

    #[test]
    fn inverse_search_finds_spiral_origin() {
        let canvas = Coord3D::new(5, 5, 1);
        // x = 0, y = 4 has y_factor 0 and lands on the center cell (3, 3) after rounding.
        let center = Coord3D::new(3, 3, 0).flatten(canvas);
        assert!(center.is_some());
        let found = center.and_then(|index| inverse_distance_search(canvas, index));
        assert!(found.is_some());
    }

    #[test]
    fn inverse_search_rejects_unreachable_cells() {
        let canvas = Coord3D::new(5, 5, 1);
        // (0, 0) needs sin and cos both at -1 in the same column.
        let corner = Coord3D::new(0, 0, 0).flatten(canvas);
        assert_eq!(corner.and_then(|index| inverse_distance_search(canvas, index)), None);
        assert_eq!(inverse_distance_search(Coord3D::ZERO, 0), None);
    }
}
