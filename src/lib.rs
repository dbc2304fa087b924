//! Map virtual LED effect canvases onto physical fixtures of any shape.
//!
//! A [`Fixture`](fixture::Fixture) owns the physical LED buffer and a small list of
//! [`Layer`](layer::Layer)s. Each layer pairs an effect surface with a
//! [`Projection`](projection::Projection) that folds the physical geometry (a 1D strip,
//! a 2D panel, a 3D volume) into the virtual canvas the effect draws on.
//!
//! A mapping pass reads the physical points from a [`FixtureSource`](fixture::FixtureSource)
//! and builds a compact [`MappingTable`](mapping::MappingTable) per layer. Effects then
//! read and write virtual pixels through a [`LayerView`](layer::LayerView), which fans
//! every write out to the physical LEDs behind it.
//!
//! # Glossary
//!
//! - **Virtual pixel / index:** a cell of an effect's canvas, independent of wiring.
//! - **Physical pixel / index:** a cell of the output buffer, ordered by wiring position.
//! - **Projection:** how physical geometry is folded into a layer's canvas.
//! - **Mapping pass:** the full rebuild of every dirty layer's table from the point stream.
//! - **Region of interest:** the sub-volume of the fixture a layer is restricted to.
//!
//! # Example
//!
//! ```rust
//! use led_fixture::fixture::{Fixture, FixtureConfig, FixtureDescription, PinRegistry};
//! use led_fixture::projection::ProjectionKind;
//! use led_fixture::RGB8;
//!
//! let mut source = FixtureDescription::strip(3, 10);
//! let mut pins = PinRegistry::<4>::new();
//! let mut fixture = Fixture::new(FixtureConfig::default());
//! let layer = fixture.add_layer(ProjectionKind::Multiply)?;
//! fixture.layer_mut(layer)?.update_settings(|settings| {
//!     settings.multiply = led_fixture::Coord3D::new(3, 1, 1);
//! });
//! fixture.project_and_map(&mut source, &mut pins)?;
//!
//! let mut view = fixture.view(layer)?;
//! view.set_pixel_color(0, RGB8::new(255, 0, 0), Some(255));
//! assert!(fixture.leds().iter().all(|led| *led == RGB8::new(255, 0, 0)));
//! # Ok::<(), led_fixture::Error>(())
//! ```
#![cfg_attr(not(feature = "host"), no_std)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod color;
pub mod config;
pub mod coord;
mod error;
pub mod fixture;
pub mod layer;
pub mod mapping;
pub mod projection;
pub mod scratch;
#[cfg(feature = "host")]
pub mod to_png;
pub mod trigo;

// Re-export error types and result (used throughout)
pub use crate::coord::Coord3D;
pub use crate::error::{Error, Result};
pub use smart_leds::RGB8;

/// Maximum number of virtual pixels a layer may address.
pub const NUM_VLEDS_MAX: usize = 8192;

/// Maximum number of physical LEDs a fixture may drive.
pub const NUM_LEDS_MAX: usize = 8192;

/// Maximum number of layers composited onto one fixture.
pub const MAX_LAYERS: usize = 4;
