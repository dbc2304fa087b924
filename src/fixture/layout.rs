//! Point generators for common fixture shapes.
//!
//! Positions are in millimetres and follow wiring order: the n-th point yielded is
//! physical LED n.

use crate::Coord3D;

use super::FixtureDescription;

/// How a matrix is wired from one row to the next.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Wiring {
    /// Every row runs left to right.
    #[default]
    RowMajor,
    /// Even rows run left to right, odd rows right to left.
    Serpentine,
}

/// Straight strip along x.
pub fn strip(count: u16, spacing_mm: i32) -> impl Iterator<Item = Coord3D> {
    (0..i32::from(count)).map(move |x| Coord3D::new(x * spacing_mm, 0, 0))
}

/// `width × height` panel in the xy plane.
pub fn matrix(
    width: u16,
    height: u16,
    wiring: Wiring,
    spacing_mm: i32,
) -> impl Iterator<Item = Coord3D> {
    let (width, height) = (i32::from(width), i32::from(height));
    (0..width * height).map(move |index| {
        let (row, column) = (index / width, index % width);
        let x = match wiring {
            Wiring::Serpentine if row % 2 == 1 => width - 1 - column,
            _ => column,
        };
        Coord3D::new(x * spacing_mm, row * spacing_mm, 0)
    })
}

/// `width × height × depth` volume, one row-major panel per z layer.
pub fn cube(width: u16, height: u16, depth: u16, spacing_mm: i32) -> impl Iterator<Item = Coord3D> {
    (0..i32::from(depth)).flat_map(move |z| {
        matrix(width, height, Wiring::RowMajor, spacing_mm)
            .map(move |point| Coord3D::new(point.x, point.y, z * spacing_mm))
    })
}

impl FixtureDescription {
    /// One strip of `count` LEDs on pin 0.
    #[must_use]
    pub fn strip(count: u16, spacing_mm: i32) -> Self {
        Self::new().with_array(0, strip(count, spacing_mm))
    }

    /// One panel on pin 0.
    #[must_use]
    pub fn matrix(width: u16, height: u16, wiring: Wiring, spacing_mm: i32) -> Self {
        Self::new().with_array(0, matrix(width, height, wiring, spacing_mm))
    }

    /// One volume on pin 0.
    #[must_use]
    pub fn cube(width: u16, height: u16, depth: u16, spacing_mm: i32) -> Self {
        Self::new().with_array(0, cube(width, height, depth, spacing_mm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn serpentine_reverses_odd_rows() {
        let points: Vec<_> = matrix(3, 2, Wiring::Serpentine, 10).collect();
        assert_eq!(points[2], Coord3D::new(20, 0, 0));
        assert_eq!(points[3], Coord3D::new(20, 10, 0));
        assert_eq!(points[5], Coord3D::new(0, 10, 0));
    }

    #[test]
    fn row_major_keeps_direction() {
        let points: Vec<_> = matrix(3, 2, Wiring::RowMajor, 10).collect();
        assert_eq!(points[3], Coord3D::new(0, 10, 0));
    }

    #[test]
    fn cube_stacks_panels() {
        let points: Vec<_> = cube(2, 2, 2, 10).collect();
        assert_eq!(points.len(), 8);
        assert_eq!(points[4], Coord3D::new(0, 0, 10));
        assert_eq!(points[7], Coord3D::new(10, 10, 10));
    }

    #[test]
    fn strip_spacing() {
        let points: Vec<_> = strip(3, 20).collect();
        assert_eq!(points, [Coord3D::new(0, 0, 0), Coord3D::new(20, 0, 0), Coord3D::new(40, 0, 0)]);
    }
}
