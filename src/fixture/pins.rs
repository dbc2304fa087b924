//! Bookkeeping of which output pin drives which physical LEDs.

use heapless::LinearMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Inclusive range of physical LED indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedRange {
    /// First index.
    pub start: u16,
    /// Last index, inclusive.
    pub end: u16,
}

impl LedRange {
    /// Range from `start` to `end`, inclusive.
    #[must_use]
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// Number of LEDs covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.end as usize + 1).saturating_sub(self.start as usize)
    }

    /// True for an inverted range.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Pin registry the mapping pass reports LED ranges to.
///
/// The pass calls [`deallocate_all`](Self::deallocate_all) once, then
/// [`allocate`](Self::allocate) for the first array on a pin and
/// [`extend`](Self::extend) for any later one.
pub trait PinAllocator {
    /// Record `range` against a pin the LED subsystem does not own yet.
    ///
    /// # Errors
    ///
    /// [`Error::PinAllocationFailed`] when the pin is taken or the registry is full.
    fn allocate(&mut self, pin: u16, range: LedRange) -> Result<()>;

    /// Grow the range of an owned pin to cover `range` as well.
    ///
    /// # Errors
    ///
    /// [`Error::PinAllocationFailed`] when the pin is not owned.
    fn extend(&mut self, pin: u16, range: LedRange) -> Result<()>;

    /// Release every pin owned by the LED subsystem.
    fn deallocate_all(&mut self);

    /// Range owned on `pin`, if any.
    fn owned_range(&self, pin: u16) -> Option<LedRange>;
}

/// In-memory [`PinAllocator`] for up to `N` pins.
#[derive(Debug, Clone, Default)]
pub struct PinRegistry<const N: usize> {
    ranges: LinearMap<u16, LedRange, N>,
}

impl<const N: usize> PinRegistry<N> {
    /// Empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ranges: LinearMap::new(),
        }
    }

    /// Owned pins and their ranges, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, LedRange)> + '_ {
        self.ranges.iter().map(|(pin, range)| (*pin, *range))
    }

    /// Number of owned pins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True when no pin is owned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl<const N: usize> PinAllocator for PinRegistry<N> {
    fn allocate(&mut self, pin: u16, range: LedRange) -> Result<()> {
        if self.ranges.contains_key(&pin) {
            return Err(Error::PinAllocationFailed { pin });
        }
        self.ranges
            .insert(pin, range)
            .map(|_| ())
            .map_err(|_| Error::PinAllocationFailed { pin })
    }

    fn extend(&mut self, pin: u16, range: LedRange) -> Result<()> {
        let owned = self.ranges.get_mut(&pin).ok_or(Error::PinAllocationFailed { pin })?;
        *owned = owned.union(range);
        Ok(())
    }

    fn deallocate_all(&mut self) {
        self.ranges.clear();
    }

    fn owned_range(&self, pin: u16) -> Option<LedRange> {
        self.ranges.get(&pin).copied()
    }
}
