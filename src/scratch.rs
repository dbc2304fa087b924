//! Per-layer scratch arena for small typed effect and projection state.
//!
//! An effect calls [`ScratchArena::begin`] at the start of its setup, then
//! [`reserve`](ScratchArena::reserve)s the same sequence of values on every frame. The first
//! frame grows the arena, later frames land on the same offsets and read back what they
//! left there. Handles ([`Slot`]) are plain offsets, valid until the next `begin`.
//!
//! Growth is in 32-byte steps and zero-filled. If growth fails, or would pass the optional
//! byte limit, the arena is marked failed for good: reservations return `None` and writes
//! become no-ops.

use alloc::vec::Vec;
use core::marker::PhantomData;
use core::mem::size_of;

use bytemuck::Pod;

const GROWTH_STEP: usize = 32;

/// Typed handle to `len` consecutive values of `T` inside a [`ScratchArena`].
#[derive(Debug)]
pub struct Slot<T> {
    offset: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> Slot<T> {
    /// Number of values in the slot.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length slot.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Growable byte arena with rewind.
#[derive(Debug, Default, Clone)]
pub struct ScratchArena {
    bytes: Vec<u8>,
    cursor: usize,
    limit: Option<usize>,
    failed: bool,
    sealed: bool,
}

impl ScratchArena {
    /// Unbounded arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            cursor: 0,
            limit: None,
            failed: false,
            sealed: false,
        }
    }

    /// Arena that fails once it would grow past `limit` bytes.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            cursor: 0,
            limit: Some(limit),
            failed: false,
            sealed: false,
        }
    }

    /// Rewind to the start. Contents are kept so state survives across frames.
    pub const fn begin(&mut self) {
        self.cursor = 0;
    }

    /// Release the memory and reset the failure flag.
    pub fn clear(&mut self) {
        self.bytes = Vec::new();
        self.cursor = 0;
        self.failed = false;
        self.sealed = false;
    }

    /// Mark setup complete. Any later growth is logged as unexpected.
    pub const fn seal(&mut self) {
        self.sealed = true;
    }

    /// False once an allocation has failed.
    #[must_use]
    pub const fn success(&self) -> bool {
        !self.failed
    }

    /// Bytes currently allocated.
    #[must_use]
    pub fn bytes_allocated(&self) -> usize {
        self.bytes.len()
    }

    /// Reserve `len` zero-initialized values of `T` at the cursor.
    pub fn reserve<T: Pod>(&mut self, len: usize) -> Option<Slot<T>> {
        if self.failed {
            return None;
        }
        let offset = self.cursor;
        let Some(end) = len.checked_mul(size_of::<T>()).and_then(|bytes| offset.checked_add(bytes))
        else {
            self.fail(usize::MAX);
            return None;
        };
        if end > self.bytes.len() && !self.grow(end) {
            return None;
        }
        self.cursor = end;
        Some(Slot {
            offset,
            len,
            _marker: PhantomData,
        })
    }

    /// Reserve one value and initialize it to `value`.
    pub fn write<T: Pod>(&mut self, value: T) -> Option<Slot<T>> {
        let slot = self.reserve::<T>(1)?;
        self.set(slot, 0, value);
        Some(slot)
    }

    /// Reserve one value, keeping whatever an earlier frame stored there.
    pub fn read_write<T: Pod>(&mut self) -> Option<Slot<T>> {
        self.reserve::<T>(1)
    }

    /// Value `index` of `slot`; zero when the slot or arena is unusable.
    #[must_use]
    pub fn get<T: Pod>(&self, slot: Slot<T>, index: usize) -> T {
        self.byte_range(slot, index)
            .and_then(|range| self.bytes.get(range))
            .map_or_else(T::zeroed, bytemuck::pod_read_unaligned)
    }

    /// Store `value` at `index` of `slot`. Ignored when the arena has failed.
    pub fn set<T: Pod>(&mut self, slot: Slot<T>, index: usize, value: T) {
        if self.failed {
            return;
        }
        if let Some(bytes) =
            self.byte_range(slot, index).and_then(|range| self.bytes.get_mut(range))
        {
            bytes.copy_from_slice(bytemuck::bytes_of(&value));
        }
    }

    fn byte_range<T: Pod>(&self, slot: Slot<T>, index: usize) -> Option<core::ops::Range<usize>> {
        if index >= slot.len {
            return None;
        }
        let start = slot.offset.checked_add(index.checked_mul(size_of::<T>())?)?;
        Some(start..start.checked_add(size_of::<T>())?)
    }

    fn grow(&mut self, end: usize) -> bool {
        let current = self.bytes.len();
        let steps = (end - current).div_ceil(GROWTH_STEP);
        let target = current + steps * GROWTH_STEP;
        if self.limit.is_some_and(|limit| target > limit) {
            self.fail(target);
            return false;
        }
        if self.bytes.try_reserve_exact(target - current).is_err() {
            self.fail(target);
            return false;
        }
        if self.sealed {
            warn!("ScratchArena::grow: growing after setup {} -> {} bytes", current, target);
        }
        self.bytes.resize(target, 0);
        true
    }

    fn fail(&mut self, requested: usize) {
        error!(
            "ScratchArena::grow: allocation of {} bytes failed ({} held)",
            requested,
            self.bytes.len()
        );
        self.failed = true;
    }
}
