//! Sine/cosine with a per-axis cache, plus tilt/pan/roll rotations built on it.
//!
//! A full sweep over a layer's pixels rotates every pixel by the same angle, so
//! [`Trigo`] remembers the last angle and value per [`Axis`]. Each distinct angle costs one
//! evaluation per frame per axis instead of one per pixel.
//!
//! The basis function is pluggable: [`FloatBasis`] uses `libm`, while [`Sin8Basis`] and
//! [`Sin16Basis`] use the 8-bit and 16-bit lookup approximations common on LED
//! controllers. All three share the same external contract.

use core::f32::consts::TAU;

use crate::coord::Coord3D;

/// Angle domain used for rotation angles when nothing else is configured: degrees.
pub const DEFAULT_PERIOD: u16 = 360;

/// Independent cache line for each rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Axis {
    /// Rotation about the x axis.
    Tilt = 1,
    /// Rotation about the y axis.
    Pan = 0,
    /// Rotation about the z axis.
    Roll = 2,
}

impl Axis {
    const fn slot(self) -> usize {
        self as usize
    }
}

/// Basis function behind a [`Trigo`] cache.
pub trait TrigoBasis {
    /// Sine of `angle`, where `period` is a full turn. Result in about `[-1, 1]`.
    fn sin(&self, angle: u16, period: u16) -> f32;
    /// Cosine of `angle`, where `period` is a full turn. Result in about `[-1, 1]`.
    fn cos(&self, angle: u16, period: u16) -> f32;
}

/// Floating-point reference basis.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatBasis;

impl TrigoBasis for FloatBasis {
    fn sin(&self, angle: u16, period: u16) -> f32 {
        libm::sinf(TAU * f32::from(angle) / f32::from(period))
    }

    fn cos(&self, angle: u16, period: u16) -> f32 {
        libm::cosf(TAU * f32::from(angle) / f32::from(period))
    }
}

/// 8-bit table basis (`sin8`/`cos8`), one full turn in 256 steps.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sin8Basis;

impl Sin8Basis {
    fn theta(angle: u16, period: u16) -> u8 {
        (256.0 * f32::from(angle) / f32::from(period)) as u32 as u8
    }
}

impl TrigoBasis for Sin8Basis {
    fn sin(&self, angle: u16, period: u16) -> f32 {
        (f32::from(sin8(Self::theta(angle, period))) - 128.0) / 127.0
    }

    fn cos(&self, angle: u16, period: u16) -> f32 {
        (f32::from(cos8(Self::theta(angle, period))) - 128.0) / 127.0
    }
}

/// 16-bit table basis (`sin16`/`cos16`), one full turn in 65536 steps.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sin16Basis;

impl Sin16Basis {
    fn theta(angle: u16, period: u16) -> u16 {
        (65536.0 * f32::from(angle) / f32::from(period)) as u32 as u16
    }
}

impl TrigoBasis for Sin16Basis {
    fn sin(&self, angle: u16, period: u16) -> f32 {
        f32::from(sin16(Self::theta(angle, period))) / 32645.0
    }

    fn cos(&self, angle: u16, period: u16) -> f32 {
        f32::from(cos16(Self::theta(angle, period))) / 32645.0
    }
}

/// Piecewise-linear 16-bit sine. `0..=65535` is one turn, output in `-32645..=32645`.
#[must_use]
pub fn sin16(theta: u16) -> i16 {
    const BASE: [u16; 8] = [0, 6393, 12539, 18204, 23170, 27245, 30273, 32137];
    const SLOPE: [u8; 8] = [49, 48, 44, 38, 31, 23, 14, 4];

    let mut offset = (theta & 0x3FFF) >> 3;
    if theta & 0x4000 != 0 {
        offset = 2047 - offset;
    }
    let section = usize::from(offset / 256);
    let b = BASE[section];
    let m = u16::from(SLOPE[section]);
    let secoffset8 = u16::from((offset as u8) / 2);
    let y = (m * secoffset8 + b) as i16;
    if theta & 0x8000 != 0 { -y } else { y }
}

/// [`sin16`] shifted by a quarter turn.
#[must_use]
pub fn cos16(theta: u16) -> i16 {
    sin16(theta.wrapping_add(16384))
}

/// Piecewise-linear 8-bit sine. `0..=255` is one turn, output in `1..=255` centered on 128.
#[must_use]
pub fn sin8(theta: u8) -> u8 {
    const B_M16: [u8; 8] = [0, 49, 49, 41, 90, 27, 117, 10];

    let mut offset = theta;
    if theta & 0x40 != 0 {
        offset = 255 - offset;
    }
    offset &= 0x3F;

    let mut secoffset = offset & 0x0F;
    if theta & 0x40 != 0 {
        secoffset += 1;
    }

    let section = usize::from(offset >> 4);
    let b = B_M16[section * 2];
    let m16 = B_M16[section * 2 + 1];
    let mx = ((u16::from(m16) * u16::from(secoffset)) >> 4) as u8;

    let mut y = mx.wrapping_add(b) as i8;
    if theta & 0x80 != 0 {
        y = y.wrapping_neg();
    }
    (y as u8).wrapping_add(128)
}

/// [`sin8`] shifted by a quarter turn.
#[must_use]
pub fn cos8(theta: u8) -> u8 {
    sin8(theta.wrapping_add(64))
}

#[derive(Debug, Clone, Copy, Default)]
struct CacheLine {
    angle: Option<u16>,
    value: f32,
}

/// Hit/miss counters for a [`Trigo`] cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrigoStats {
    /// Lookups answered from the cache.
    pub cached: u32,
    /// Lookups that evaluated the basis function.
    pub uncached: u32,
}

/// Cached sine/cosine over a configurable period.
///
/// Owned per layer; two layers animating independently each need their own instance.
#[derive(Debug, Clone)]
pub struct Trigo<B = FloatBasis> {
    period: u16,
    sin_lines: [CacheLine; 3],
    cos_lines: [CacheLine; 3],
    basis: B,
    stats: TrigoStats,
}

impl Default for Trigo {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

impl Trigo {
    /// Floating-point cache with the given period.
    #[must_use]
    pub fn new(period: u16) -> Self {
        Self::with_basis(period, FloatBasis)
    }
}

impl<B: TrigoBasis> Trigo<B> {
    /// Cache over a custom basis. A period of zero is treated as one.
    #[must_use]
    pub fn with_basis(period: u16, basis: B) -> Self {
        Self {
            period: period.max(1),
            sin_lines: [CacheLine::default(); 3],
            cos_lines: [CacheLine::default(); 3],
            basis,
            stats: TrigoStats::default(),
        }
    }

    /// Current period.
    #[must_use]
    pub const fn period(&self) -> u16 {
        self.period
    }

    /// Change the period. Cached values are dropped when it actually changes.
    pub fn set_period(&mut self, period: u16) {
        let period = period.max(1);
        if period != self.period {
            self.period = period;
            self.invalidate();
        }
    }

    /// Forget every cached angle.
    pub fn invalidate(&mut self) {
        self.sin_lines = [CacheLine::default(); 3];
        self.cos_lines = [CacheLine::default(); 3];
    }

    /// Cache counters since construction.
    #[must_use]
    pub const fn stats(&self) -> TrigoStats {
        self.stats
    }

    /// `factor * sin(angle)`, truncated toward zero.
    pub fn sin(&mut self, factor: i32, angle: u16, axis: Axis) -> i32 {
        let line = &mut self.sin_lines[axis.slot()];
        if line.angle == Some(angle) {
            self.stats.cached = self.stats.cached.wrapping_add(1);
        } else {
            line.angle = Some(angle);
            line.value = self.basis.sin(angle, self.period);
            self.stats.uncached = self.stats.uncached.wrapping_add(1);
        }
        (factor as f32 * line.value) as i32
    }

    /// `factor * cos(angle)`, truncated toward zero.
    pub fn cos(&mut self, factor: i32, angle: u16, axis: Axis) -> i32 {
        let line = &mut self.cos_lines[axis.slot()];
        if line.angle == Some(angle) {
            self.stats.cached = self.stats.cached.wrapping_add(1);
        } else {
            line.angle = Some(angle);
            line.value = self.basis.cos(angle, self.period);
            self.stats.uncached = self.stats.uncached.wrapping_add(1);
        }
        (factor as f32 * line.value) as i32
    }

    /// Rotate about the y axis through `middle`.
    pub fn pan(&mut self, point: Coord3D, middle: Coord3D, angle: u16) -> Coord3D {
        let local = point - middle;
        let axis = Axis::Pan;
        let x = self.cos(local.x, angle, axis) + self.sin(local.z, angle, axis);
        let z = -self.sin(local.x, angle, axis) + self.cos(local.z, angle, axis);
        Coord3D::new(x, local.y, z) + middle
    }

    /// Rotate about the x axis through `middle`.
    pub fn tilt(&mut self, point: Coord3D, middle: Coord3D, angle: u16) -> Coord3D {
        let local = point - middle;
        let axis = Axis::Tilt;
        let y = self.cos(local.y, angle, axis) - self.sin(local.z, angle, axis);
        let z = self.sin(local.y, angle, axis) + self.cos(local.z, angle, axis);
        Coord3D::new(local.x, y, z) + middle
    }

    /// Rotate about the z axis through `middle`.
    pub fn roll(&mut self, point: Coord3D, middle: Coord3D, angle: u16) -> Coord3D {
        let local = point - middle;
        let axis = Axis::Roll;
        let x = self.cos(local.x, angle, axis) - self.sin(local.y, angle, axis);
        let y = self.sin(local.x, angle, axis) + self.cos(local.y, angle, axis);
        Coord3D::new(x, y, local.z) + middle
    }

    /// Tilt, then pan, then roll, after switching to `period`.
    pub fn rotate(
        &mut self,
        point: Coord3D,
        middle: Coord3D,
        angles: Rotation,
        period: u16,
    ) -> Coord3D {
        self.set_period(period);
        let tilted = self.tilt(point, middle, angles.tilt);
        let panned = self.pan(tilted, middle, angles.pan);
        self.roll(panned, middle, angles.roll)
    }
}

/// Tilt/pan/roll angles for [`Trigo::rotate`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Angle about x.
    pub tilt: u16,
    /// Angle about y.
    pub pan: u16,
    /// Angle about z.
    pub roll: u16,
}
