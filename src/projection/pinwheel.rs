//! Polar projection: every pixel maps to the petal its angle around the midpoint falls in.

use crate::Coord3D;

use super::{MapContext, Projection};

/// Maps a 2D/3D fixture onto a 1D canvas of `petals` cells by angle.
///
/// `value = angle + swirl·distance + z_twist·z`, where the angle is whole degrees in
/// `0..=360` measured around the midpoint and truncated after the 180° offset. The value
/// is then divided into petals of `angle_range / petals` degrees each, wrapping with a
/// Euclidean remainder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinwheelProjection;

impl Projection for PinwheelProjection {
    fn name(&self) -> &'static str {
        "Pinwheel"
    }

    fn adjust_size_and_pixel(
        &self,
        ctx: &MapContext<'_>,
        size: &mut Coord3D,
        _pixel: &mut Coord3D,
        _mid: &mut Coord3D,
    ) {
        *size = Coord3D::new(i32::from(ctx.settings.petals.max(1)), 1, 1);
    }

    fn adjust_mapped(
        &self,
        ctx: &MapContext<'_>,
        mapped: &mut Coord3D,
        _size: Coord3D,
        pixel: Coord3D,
        mid: Coord3D,
    ) {
        *mapped = Coord3D::new(petal(ctx, pixel, mid), 0, 0);
    }
}

fn petal(ctx: &MapContext<'_>, pixel: Coord3D, mid: Coord3D) -> i32 {
    let settings = ctx.settings;
    let swirl = i32::from(settings.swirl);
    let petals = i32::from(settings.petals.max(1));

    let dx = f64::from(pixel.x - mid.x);
    let dy = f64::from(pixel.y - mid.y);
    let swirl_term = if swirl == 0 {
        0
    } else {
        (libm::hypot(dy, dx) * f64::from(swirl.unsigned_abs())) as i32
    };
    // offset before truncating: -165.96 + 180 is 14, not 15
    let mut angle = (libm::atan2(dy, dx).to_degrees() + 180.0) as i32;
    if swirl < 0 {
        angle = 360 - angle;
    }

    let value = angle + swirl_term + i32::from(settings.z_twist) * pixel.z;
    let petal_width = f64::from(settings.angle_range.max(1)) / f64::from(petals);
    let mut index = ((f64::from(value) / petal_width) as i32).rem_euclid(petals);
    if settings.pinwheel_reverse {
        index = petals - index - 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectionSettings;
    use crate::projection::Dimension;

    fn map(settings: &ProjectionSettings, pixel: Coord3D, mid: Coord3D) -> i32 {
        let ctx = MapContext {
            effect_dimension: Dimension::One,
            projection_dimension: 2,
            region: Coord3D::new(9, 9, 1),
            canvas: Coord3D::new(i32::from(settings.petals), 1, 1),
            settings,
        };
        let mut mapped = Coord3D::ZERO;
        PinwheelProjection.adjust_mapped(&ctx, &mut mapped, ctx.region, pixel, mid);
        assert_eq!((mapped.y, mapped.z), (0, 0));
        mapped.x
    }

    #[test]
    fn one_petal_maps_everything_to_zero() {
        let settings = ProjectionSettings {
            petals: 1,
            swirl: 17,
            z_twist: 5,
            ..ProjectionSettings::default()
        };
        let mid = Coord3D::new(4, 4, 0);
        for x in 0..9 {
            for y in 0..9 {
                assert_eq!(map(&settings, Coord3D::new(x, y, x % 3), mid), 0);
            }
        }
    }

    #[test]
    fn quadrants_with_four_petals() {
        let settings = ProjectionSettings {
            petals: 4,
            ..ProjectionSettings::default()
        };
        let mid = Coord3D::new(4, 4, 0);
        // atan2 of (0, -4) is 180 degrees, +180 wraps to petal 0.
        assert_eq!(map(&settings, Coord3D::new(0, 4, 0), mid), 0);
        assert_eq!(map(&settings, Coord3D::new(4, 0, 0), mid), 1);
        assert_eq!(map(&settings, Coord3D::new(8, 4, 0), mid), 2);
        assert_eq!(map(&settings, Coord3D::new(4, 8, 0), mid), 3);
    }

    #[test]
    fn reverse_counts_petals_backwards() {
        let settings = ProjectionSettings {
            petals: 4,
            pinwheel_reverse: true,
            ..ProjectionSettings::default()
        };
        assert_eq!(map(&settings, Coord3D::new(8, 4, 0), Coord3D::new(4, 4, 0)), 1);
    }

    #[test]
    fn fractional_angles_truncate_after_the_offset() {
        let mid = Coord3D::new(4, 4, 0);
        // (0, 3): atan2 is -165.96 degrees, so the angle is 14
        let settings = ProjectionSettings {
            petals: 360,
            ..ProjectionSettings::default()
        };
        assert_eq!(map(&settings, Coord3D::new(0, 3, 0), mid), 14);
        // (1, 0): atan2 is -126.87 degrees, so the angle is 53
        assert_eq!(map(&settings, Coord3D::new(1, 0, 0), mid), 53);
        let settings = ProjectionSettings {
            petals: 60,
            ..ProjectionSettings::default()
        };
        assert_eq!(map(&settings, Coord3D::new(1, 0, 0), mid), 8);
    }

    #[test]
    fn swirl_twist_and_range() {
        struct Case {
            pixel: Coord3D,
            petals: u16,
            swirl: i16,
            z_twist: i16,
            angle_range: u16,
            expected: i32,
        }
        let case = |pixel, petals, swirl, z_twist, angle_range, expected| Case {
            pixel,
            petals,
            swirl,
            z_twist,
            angle_range,
            expected,
        };
        let cases = [
            // angle 146 + swirl 18 = 164, 30 degree petals
            case(Coord3D::new(7, 2, 0), 12, 5, 0, 360, 5),
            // negative swirl mirrors the angle: 360 - 146 + 18 = 232
            case(Coord3D::new(7, 2, 0), 12, -5, 0, 360, 7),
            // 315 + 20 * 3 = 375 wraps past the last petal
            case(Coord3D::new(2, 6, 3), 24, 0, 20, 360, 1),
            // 315 - 42 * 3 = 189
            case(Coord3D::new(2, 6, 3), 24, 0, -42, 360, 12),
            // 14 - 42 * 2 = -70 lands in petal -2, wrapped to 10
            case(Coord3D::new(0, 3, 2), 12, 0, -42, 360, 10),
            // half turn range: 216 / 22.5 is petal 9, wrapped to 1
            case(Coord3D::new(8, 7, 0), 8, 0, 0, 180, 1),
            // double turn range: 14 + 123 = 137, 72 degree petals
            case(Coord3D::new(0, 3, 0), 10, 30, 0, 720, 1),
        ];
        let mid = Coord3D::new(4, 4, 0);
        for case in cases {
            let settings = ProjectionSettings {
                petals: case.petals,
                swirl: case.swirl,
                z_twist: case.z_twist,
                angle_range: case.angle_range,
                ..ProjectionSettings::default()
            };
            assert_eq!(map(&settings, case.pixel, mid), case.expected, "pixel {:?}", case.pixel);
        }
    }

    #[test]
    fn size_is_petal_count() {
        let settings = ProjectionSettings {
            petals: 12,
            ..ProjectionSettings::default()
        };
        let ctx = MapContext {
            effect_dimension: Dimension::One,
            projection_dimension: 2,
            region: Coord3D::new(9, 9, 1),
            canvas: Coord3D::ZERO,
            settings: &settings,
        };
        let (mut size, mut pixel, mut mid) = (Coord3D::new(9, 9, 1), Coord3D::ZERO, Coord3D::ZERO);
        PinwheelProjection.adjust_size_and_pixel(&ctx, &mut size, &mut pixel, &mut mid);
        assert_eq!(size, Coord3D::new(12, 1, 1));
    }
}
