//! Projection and fixture settings.
//!
//! Settings are plain data. [`ProjectionSettings::from_store`] fills them from a
//! [`ParamStore`], falling back to defaults for anything unset and clamping values into
//! their valid ranges.

mod params;

pub use params::{PARAM_NAME_LEN, ParamMap, ParamStore, ParamValue};

use core::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::Coord3D;

macro_rules! flag_set {
    ($(#[$meta:meta])* $name:ident { $($(#[$flag_meta:meta])* $flag:ident = $bit:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(u8);

        impl $name {
            /// No flags set.
            pub const EMPTY: Self = Self(0);
            $($(#[$flag_meta])* pub const $flag: Self = Self(1 << $bit);)+

            /// Raw bitmask.
            #[must_use]
            pub const fn bits(self) -> u8 {
                self.0
            }

            /// True when every flag in `other` is set.
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Set or clear `flag`.
            pub const fn set(&mut self, flag: Self, on: bool) {
                if on {
                    self.0 |= flag.0;
                } else {
                    self.0 &= !flag.0;
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }
    };
}

flag_set! {
    /// Per-axis flags used by mirror and reverse.
    AxisFlags {
        /// X axis.
        X = 0,
        /// Y axis.
        Y = 1,
        /// Z axis.
        Z = 2,
    }
}

flag_set! {
    /// Axis pairs swapped by transpose.
    TransposeFlags {
        /// Swap x and y.
        XY = 0,
        /// Swap x and z.
        XZ = 1,
        /// Swap y and z.
        YZ = 2,
    }
}

/// Geometry and animation parameters read by the projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSettings {
    /// Tile factor per axis; components below one act as one.
    pub multiply: Coord3D,
    /// Reflect alternate tiles instead of repeating them.
    pub multiply_mirror: bool,
    /// Physical cells merged into one virtual cell, per axis.
    pub grouping: Coord3D,
    /// Axes folded in half and reflected.
    pub mirror: AxisFlags,
    /// Axes counted backwards.
    pub reverse: AxisFlags,
    /// Axis pairs swapped.
    pub transpose: TransposeFlags,
    /// Number of pinwheel petals, `1..=360`.
    pub petals: u16,
    /// Distance-proportional pinwheel swirl, `-30..=30`.
    pub swirl: i16,
    /// Pinwheel twist per z layer, `-42..=42`.
    pub z_twist: i16,
    /// Degrees covered by all petals together, `1..=720`.
    pub angle_range: u16,
    /// Count pinwheel petals the other way round.
    pub pinwheel_reverse: bool,
    /// Tilt rotation speed, `0` disables, `1..=254`.
    pub tilt_speed: u8,
    /// Pan rotation speed, `0` disables, `1..=254`.
    pub pan_speed: u8,
    /// Roll rotation speed, `0` disables, `1..=254`.
    pub roll_speed: u8,
    /// Drive rotation from the orientation sensor when one reports.
    pub use_orientation: bool,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            multiply: Coord3D::ONE,
            multiply_mirror: false,
            grouping: Coord3D::ONE,
            mirror: AxisFlags::EMPTY,
            reverse: AxisFlags::EMPTY,
            transpose: TransposeFlags::EMPTY,
            petals: 360,
            swirl: 0,
            z_twist: 0,
            angle_range: 360,
            pinwheel_reverse: false,
            tilt_speed: 128,
            pan_speed: 128,
            roll_speed: 128,
            use_orientation: false,
        }
    }
}

impl ProjectionSettings {
    /// Read every parameter from `store`, using defaults for anything unset.
    #[must_use]
    pub fn from_store(store: &impl ParamStore) -> Self {
        let defaults = Self::default();
        let int = |name: &str, default: i32, min: i32, max: i32| {
            store.int(name).unwrap_or(default).clamp(min, max)
        };
        let flag = |name: &str| store.boolean(name).unwrap_or(false);

        let mut mirror = AxisFlags::EMPTY;
        mirror.set(AxisFlags::X, flag("mirror_x"));
        mirror.set(AxisFlags::Y, flag("mirror_y"));
        mirror.set(AxisFlags::Z, flag("mirror_z"));
        let mut reverse = AxisFlags::EMPTY;
        reverse.set(AxisFlags::X, flag("reverse_x"));
        reverse.set(AxisFlags::Y, flag("reverse_y"));
        reverse.set(AxisFlags::Z, flag("reverse_z"));
        let mut transpose = TransposeFlags::EMPTY;
        transpose.set(TransposeFlags::XY, flag("transpose_xy"));
        transpose.set(TransposeFlags::XZ, flag("transpose_xz"));
        transpose.set(TransposeFlags::YZ, flag("transpose_yz"));

        Self {
            multiply: store.coord("multiply").unwrap_or(defaults.multiply),
            multiply_mirror: flag("multiply_mirror"),
            grouping: store.coord("grouping").unwrap_or(defaults.grouping),
            mirror,
            reverse,
            transpose,
            petals: int("petals", 360, 1, 360) as u16,
            swirl: int("swirl", 0, -30, 30) as i16,
            z_twist: int("z_twist", 0, -42, 42) as i16,
            angle_range: int("angle_range", 360, 1, 720) as u16,
            pinwheel_reverse: flag("pinwheel_reverse"),
            tilt_speed: int("tilt_speed", 128, 0, 254) as u8,
            pan_speed: int("pan_speed", 128, 0, 254) as u8,
            roll_speed: int("roll_speed", 128, 0, 254) as u8,
            use_orientation: flag("use_orientation"),
        }
    }

    /// True when switching from `self` to `other` changes mapping geometry.
    ///
    /// Rotation speeds and the orientation switch only affect read-time transforms.
    #[must_use]
    pub fn geometry_differs(&self, other: &Self) -> bool {
        let strip = |settings: &Self| Self {
            tilt_speed: 0,
            pan_speed: 0,
            roll_speed: 0,
            use_orientation: false,
            ..*settings
        };
        strip(self) != strip(other)
    }
}

/// Fixture-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Weight of the new color when a write lands on a mapped LED; 255 overwrites.
    pub global_blend: u8,
    /// Record LED ranges against output pins during the mapping pass.
    pub alloc_pins: bool,
    /// Seed for the random projection.
    pub random_seed: u64,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            global_blend: 255,
            alloc_pins: true,
            random_seed: 0x5EED,
        }
    }
}
