//! Crate-wide error type.
//!
//! Per-pixel operations never fail; they record soft errors in
//! [`Diagnostics`](crate::fixture::Diagnostics) and keep going. `Error` is reserved for
//! setup calls and the mapping pass, where the caller can act on the failure.

/// Errors returned by fixture setup and the mapping pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum Error {
    /// The fixture description could not be opened. Previous mappings were left untouched.
    #[display("fixture source unavailable")]
    SourceUnavailable,
    /// The fixture description failed part way through the point stream.
    #[display("fixture source failed while streaming")]
    SourceFailed,
    /// A virtual index was at or beyond the layer maximum.
    #[display("virtual index {index} out of bounds (max {max})")]
    VirtualIndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Exclusive upper bound.
        max: usize,
    },
    /// A physical index was at or beyond the fixture maximum.
    #[display("physical index {index} out of bounds (max {max})")]
    PhysicalIndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Exclusive upper bound.
        max: usize,
    },
    /// The fixture already holds [`MAX_LAYERS`](crate::MAX_LAYERS) layers.
    #[display("too many layers")]
    TooManyLayers,
    /// No layer exists at the requested position.
    #[display("layer {_0} not found")]
    LayerNotFound(#[error(not(source))] usize),
    /// A scratch arena could not grow.
    #[display("scratch arena exhausted")]
    ArenaExhausted,
    /// The pin allocator refused a range.
    #[display("pin {pin} allocation failed")]
    PinAllocationFailed {
        /// Pin that was refused.
        pin: u16,
    },
    /// A fixed-capacity parameter map is full.
    #[display("parameter map full")]
    ParamCapacity,
}

/// Result alias with [`Error`] as the default error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;
