//! Integer 3-vector used for fixture positions, canvas sizes and virtual coordinates.
//!
//! All operators are componentwise. Division and remainder truncate toward zero, so a
//! remainder takes the sign of its dividend (`-7 % 3 == -1`).
//!
//! Comparisons are deliberately *not* an ordering: [`Coord3D::ge_all`],
//! [`Coord3D::le_all`] and [`Coord3D::lt_all`] require every component to satisfy the
//! relation. That is what region-of-interest tests need, and it is why `Coord3D` does not
//! implement `PartialOrd`.

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, Rem, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Integer triple `(x, y, z)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord3D {
    /// X component.
    pub x: i32,
    /// Y component.
    pub y: i32,
    /// Z component.
    pub z: i32,
}

impl Coord3D {
    /// `(0, 0, 0)`.
    pub const ZERO: Self = Self::new(0, 0, 0);
    /// `(1, 1, 1)`.
    pub const ONE: Self = Self::new(1, 1, 1);

    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// All three components set to `value`.
    #[must_use]
    pub const fn splat(value: i32) -> Self {
        Self::new(value, value, value)
    }

    /// Every component of `self` is `>=` the matching component of `other`.
    #[must_use]
    pub const fn ge_all(self, other: Self) -> bool {
        self.x >= other.x && self.y >= other.y && self.z >= other.z
    }

    /// Every component of `self` is `<=` the matching component of `other`.
    #[must_use]
    pub const fn le_all(self, other: Self) -> bool {
        self.x <= other.x && self.y <= other.y && self.z <= other.z
    }

    /// Every component of `self` is strictly `<` the matching component of `other`.
    #[must_use]
    pub const fn lt_all(self, other: Self) -> bool {
        self.x < other.x && self.y < other.y && self.z < other.z
    }

    /// Componentwise minimum.
    #[must_use]
    pub fn minimum(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Componentwise maximum.
    #[must_use]
    pub fn maximum(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Move each component toward `goal` by at most `step`.
    #[must_use]
    pub fn advance(self, goal: Self, step: u32) -> Self {
        fn toward(from: i32, to: i32, step: u32) -> i32 {
            let delta = i64::from(to) - i64::from(from);
            let step = i64::from(step);
            (i64::from(from) + delta.clamp(-step, step)) as i32
        }
        Self::new(
            toward(self.x, goal.x, step),
            toward(self.y, goal.y, step),
            toward(self.z, goal.z, step),
        )
    }

    /// Squared Euclidean distance.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> u64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        (dx * dx + dy * dy + dz * dz) as u64
    }

    /// Euclidean distance, rounded down.
    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        isqrt(self.distance_squared(other)) as u32
    }

    /// True when any component is negative or not strictly below `size`.
    #[must_use]
    pub const fn is_out_of_bounds(self, size: Self) -> bool {
        self.x < 0
            || self.y < 0
            || self.z < 0
            || self.x >= size.x
            || self.y >= size.y
            || self.z >= size.z
    }

    /// Product of the three components.
    #[must_use]
    pub const fn product(self) -> i64 {
        (self.x as i64) * (self.y as i64) * (self.z as i64)
    }

    /// Number of components greater than one.
    #[must_use]
    pub const fn dimensions(self) -> u8 {
        (self.x > 1) as u8 + (self.y > 1) as u8 + (self.z > 1) as u8
    }

    /// Divide with every divisor component clamped to at least one.
    #[must_use]
    pub fn safe_div(self, divisor: Self) -> Self {
        self / divisor.maximum(Self::ONE)
    }

    /// Row-major flattening inside a canvas of `size`: `x + y*size.x + z*size.x*size.y`.
    ///
    /// Returns `None` when the coordinate lies outside the canvas.
    #[must_use]
    pub fn flatten(self, size: Self) -> Option<usize> {
        if self.is_out_of_bounds(size) {
            return None;
        }
        let index = i64::from(self.x)
            + i64::from(self.y) * i64::from(size.x)
            + i64::from(self.z) * i64::from(size.x) * i64::from(size.y);
        usize::try_from(index).ok()
    }

    /// Row-major flattening without bounds checks; the caller validates the result.
    #[must_use]
    pub const fn flatten_unchecked(self, size: Self) -> i64 {
        (self.x as i64)
            + (self.y as i64) * (size.x as i64)
            + (self.z as i64) * (size.x as i64) * (size.y as i64)
    }
}

/// Floor of the square root.
#[must_use]
pub fn isqrt(value: u64) -> u64 {
    if value < 2 {
        return value;
    }
    let mut root = libm::sqrt(value as f64) as u64;
    while root.saturating_mul(root) > value {
        root -= 1;
    }
    while (root + 1).saturating_mul(root + 1) <= value {
        root += 1;
    }
    root
}

/// Floor of the cube root.
#[must_use]
pub fn icbrt(value: u64) -> u64 {
    if value < 2 {
        return value;
    }
    let cube = |root: u64| root.saturating_mul(root).saturating_mul(root);
    let mut root = libm::cbrt(value as f64) as u64;
    while cube(root) > value {
        root -= 1;
    }
    while cube(root + 1) <= value {
        root += 1;
    }
    root
}

impl Add for Coord3D {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coord3D {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Coord3D {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<i32> for Coord3D {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// # Panics
///
/// Panics if any component of `rhs` is zero; use [`Coord3D::safe_div`] when that can happen.
impl Div for Coord3D {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }
}

/// # Panics
///
/// Panics if `rhs` is zero.
impl Div<i32> for Coord3D {
    type Output = Self;
    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// # Panics
///
/// Panics if any component of `rhs` is zero.
impl Rem for Coord3D {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        Self::new(self.x % rhs.x, self.y % rhs.y, self.z % rhs.z)
    }
}

impl AddAssign for Coord3D {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Coord3D {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Components whose divisor is zero are left unchanged.
impl DivAssign for Coord3D {
    fn div_assign(&mut self, rhs: Self) {
        if rhs.x != 0 {
            self.x /= rhs.x;
        }
        if rhs.y != 0 {
            self.y /= rhs.y;
        }
        if rhs.z != 0 {
            self.z /= rhs.z;
        }
    }
}

impl From<[i32; 3]> for Coord3D {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(i32, i32, i32)> for Coord3D {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_are_componentwise() {
        let a = Coord3D::new(1, 5, 2);
        let b = Coord3D::new(2, 4, 3);
        assert!(!a.ge_all(b));
        assert!(!a.le_all(b));
        assert!(a.le_all(Coord3D::new(1, 5, 2)));
        assert!(!a.lt_all(Coord3D::new(1, 6, 3)));
        assert!(a.lt_all(Coord3D::new(2, 6, 3)));
    }

    #[test]
    fn remainder_is_componentwise_and_truncating() {
        let samples = [
            Coord3D::new(7, -7, 0),
            Coord3D::new(-1, 13, 100),
            Coord3D::new(i32::MAX, i32::MIN + 1, 5),
        ];
        let divisors = [Coord3D::new(3, 3, 1), Coord3D::new(1, 4, 7), Coord3D::new(10, 2, 9)];
        for a in samples {
            for b in divisors {
                let r = a % b;
                assert_eq!(r.x, a.x % b.x);
                assert_eq!(r.y, a.y % b.y);
                assert_eq!(r.z, a.z % b.z);
            }
        }
        assert_eq!(Coord3D::new(-7, 7, 0) % Coord3D::splat(3), Coord3D::new(-1, 1, 0));
    }

    #[test]
    fn div_assign_skips_zero_divisors() {
        let mut a = Coord3D::new(9, 8, 7);
        a /= Coord3D::new(3, 0, 7);
        assert_eq!(a, Coord3D::new(3, 8, 1));
        assert_eq!(Coord3D::new(9, 8, 7).safe_div(Coord3D::new(0, 2, -5)), Coord3D::new(9, 4, 7));
    }

    #[test]
    fn advance_moves_by_at_most_step() {
        let start = Coord3D::new(0, 10, 5);
        let goal = Coord3D::new(10, 0, 6);
        assert_eq!(start.advance(goal, 3), Coord3D::new(3, 7, 6));
        assert_eq!(start.advance(goal, 100), goal);
    }

    #[test]
    fn distance_rounds_down() {
        assert_eq!(Coord3D::ZERO.distance(Coord3D::new(3, 4, 0)), 5);
        assert_eq!(Coord3D::ZERO.distance(Coord3D::new(1, 1, 1)), 1);
        assert_eq!(Coord3D::ZERO.distance_squared(Coord3D::new(1, 2, 3)), 14);
    }

    #[test]
    fn roots_are_exact_floors() {
        for value in 0..2000_u64 {
            let root = isqrt(value);
            assert!(root * root <= value && (root + 1) * (root + 1) > value);
            let cube = icbrt(value);
            assert!(cube * cube * cube <= value && (cube + 1).pow(3) > value);
        }
    }

    #[test]
    fn flatten_is_row_major() {
        let size = Coord3D::new(4, 3, 2);
        assert_eq!(Coord3D::new(1, 2, 1).flatten(size), Some(1 + 2 * 4 + 12));
        assert_eq!(Coord3D::new(4, 0, 0).flatten(size), None);
        assert_eq!(Coord3D::new(-1, 0, 0).flatten(size), None);
        assert_eq!(size.dimensions(), 3);
        assert_eq!(Coord3D::new(5, 1, 1).dimensions(), 1);
    }
}
