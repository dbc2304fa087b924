//! Virtual-to-physical mapping table.
//!
//! Each virtual index holds a [`PhysMap`]: nothing, one physical index, or a handle to a
//! list of physical indices. Lists live in one shared `u16` pool, carved into blocks whose
//! capacities are powers of two. When a list outgrows its block it moves to a block twice
//! the size, and the old block goes onto a free list for its size class. A full table
//! therefore costs a few flat allocations instead of one small vector per entry.
//!
//! The table is rebuilt from scratch on every mapping pass; [`MappingTable::clear`] keeps
//! the allocations for the next pass.

use alloc::vec::Vec;

use crate::{Error, NUM_LEDS_MAX, NUM_VLEDS_MAX, Result};

/// Smallest list block, used when an entry gains its second physical index.
const MIN_CLASS: u8 = 1;
/// Largest block is `1 << MAX_CLASS` indices, enough for every physical LED.
const MAX_CLASS: u8 = 13;

/// Handle to a list of physical indices inside a [`MappingTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListHandle(u16);

/// Physical side of one virtual index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysMap {
    /// No physical LED behind this virtual pixel.
    #[default]
    Unmapped,
    /// Exactly one physical LED.
    Single(u16),
    /// Two or more physical LEDs.
    Multiple(ListHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexList {
    start: u32,
    len: u16,
    class: u8,
}

impl IndexList {
    const fn capacity(&self) -> usize {
        1 << self.class
    }
}

/// Counts reported at the end of a mapping pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingSummary {
    /// Virtual entries, mapped or not.
    pub virtual_len: usize,
    /// Virtual entries with at least one physical LED.
    pub mapped: usize,
    /// Physical indices referenced, counting duplicates.
    pub physical_refs: usize,
}

/// Virtual index → physical indices.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<PhysMap>,
    lists: Vec<IndexList>,
    pool: Vec<u16>,
    free_blocks: [Vec<u32>; (MAX_CLASS + 1) as usize],
}

impl PartialEq for MappingTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && (0..self.entries.len()).all(|index| self.physical(index) == other.physical(index))
    }
}

impl Eq for MappingTable {}

impl MappingTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of virtual entries, including unmapped ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no entries (1:1 passthrough).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, keeping allocations.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lists.clear();
        self.pool.clear();
        for free in &mut self.free_blocks {
            free.clear();
        }
    }

    /// Raw entry for `virtual_index`, if the table reaches that far.
    #[must_use]
    pub fn entry(&self, virtual_index: usize) -> Option<PhysMap> {
        self.entries.get(virtual_index).copied()
    }

    /// Physical indices behind `virtual_index`; empty when unmapped or out of range.
    #[must_use]
    pub fn physical(&self, virtual_index: usize) -> &[u16] {
        match self.entries.get(virtual_index) {
            None | Some(PhysMap::Unmapped) => &[],
            Some(PhysMap::Single(physical)) => core::slice::from_ref(physical),
            Some(PhysMap::Multiple(handle)) => self.list(*handle),
        }
    }

    /// First physical index behind `virtual_index`.
    #[must_use]
    pub fn first(&self, virtual_index: usize) -> Option<u16> {
        self.physical(virtual_index).first().copied()
    }

    /// Iterate `(virtual_index, physical_indices)` over every entry.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[u16])> + '_ {
        (0..self.entries.len()).map(move |index| (index, self.physical(index)))
    }

    /// Append `physical_index` to the entry for `virtual_index`, growing the table with
    /// unmapped entries as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VirtualIndexOutOfBounds`] or [`Error::PhysicalIndexOutOfBounds`]
    /// when either index reaches its ceiling; the table is left unchanged.
    pub fn push(&mut self, virtual_index: usize, physical_index: usize) -> Result<()> {
        if virtual_index >= NUM_VLEDS_MAX {
            return Err(Error::VirtualIndexOutOfBounds {
                index: virtual_index,
                max: NUM_VLEDS_MAX,
            });
        }
        let physical = match u16::try_from(physical_index) {
            Ok(physical) if physical_index < NUM_LEDS_MAX => physical,
            _ => {
                return Err(Error::PhysicalIndexOutOfBounds {
                    index: physical_index,
                    max: NUM_LEDS_MAX,
                });
            }
        };

        if virtual_index >= self.entries.len() {
            self.entries.resize(virtual_index + 1, PhysMap::Unmapped);
        }
        let Some(entry) = self.entries.get(virtual_index).copied() else {
            return Ok(());
        };
        let updated = match entry {
            PhysMap::Unmapped => PhysMap::Single(physical),
            PhysMap::Single(first) => {
                let handle = self.new_list(first);
                self.append(handle, physical);
                PhysMap::Multiple(handle)
            }
            PhysMap::Multiple(handle) => {
                self.append(handle, physical);
                PhysMap::Multiple(handle)
            }
        };
        if let Some(slot) = self.entries.get_mut(virtual_index) {
            *slot = updated;
        }
        Ok(())
    }

    /// Counts for diagnostics.
    #[must_use]
    pub fn summary(&self) -> MappingSummary {
        self.iter().fold(
            MappingSummary {
                virtual_len: self.len(),
                ..MappingSummary::default()
            },
            |mut summary, (_, physical)| {
                if !physical.is_empty() {
                    summary.mapped += 1;
                    summary.physical_refs += physical.len();
                }
                summary
            },
        )
    }

    fn list(&self, handle: ListHandle) -> &[u16] {
        self.lists
            .get(usize::from(handle.0))
            .and_then(|list| {
                let start = list.start as usize;
                self.pool.get(start..start + usize::from(list.len))
            })
            .unwrap_or(&[])
    }

    fn new_list(&mut self, first: u16) -> ListHandle {
        let start = self.take_block(MIN_CLASS);
        if let Some(cell) = self.pool.get_mut(start as usize) {
            *cell = first;
        }
        // Entries are bounded by NUM_VLEDS_MAX, so the list count fits in u16.
        let handle = ListHandle(self.lists.len() as u16);
        self.lists.push(IndexList {
            start,
            len: 1,
            class: MIN_CLASS,
        });
        handle
    }

    fn append(&mut self, handle: ListHandle, physical: u16) {
        let Some(mut list) = self.lists.get(usize::from(handle.0)).copied() else {
            return;
        };
        if usize::from(list.len) == list.capacity() && list.class < MAX_CLASS {
            let new_class = list.class + 1;
            let new_start = self.take_block(new_class);
            let old = list.start as usize;
            self.pool.copy_within(old..old + usize::from(list.len), new_start as usize);
            if let Some(free) = self.free_blocks.get_mut(usize::from(list.class)) {
                free.push(list.start);
            }
            list.start = new_start;
            list.class = new_class;
        }
        if usize::from(list.len) < list.capacity() {
            if let Some(cell) = self.pool.get_mut(list.start as usize + usize::from(list.len)) {
                *cell = physical;
            }
            list.len += 1;
        }
        if let Some(slot) = self.lists.get_mut(usize::from(handle.0)) {
            *slot = list;
        }
    }

    fn take_block(&mut self, class: u8) -> u32 {
        if let Some(start) =
            self.free_blocks.get_mut(usize::from(class)).and_then(Vec::pop)
        {
            return start;
        }
        let start = self.pool.len() as u32;
        self.pool.resize(self.pool.len() + (1 << class), 0);
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_then_multiple() {
        let mut table = MappingTable::new();
        table.push(2, 7).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.entry(0), Some(PhysMap::Unmapped));
        assert_eq!(table.entry(2), Some(PhysMap::Single(7)));
        table.push(2, 8).unwrap();
        table.push(2, 9).unwrap();
        assert!(matches!(table.entry(2), Some(PhysMap::Multiple(_))));
        assert_eq!(table.physical(2), &[7, 8, 9]);
        assert_eq!(table.first(2), Some(7));
        assert_eq!(table.physical(0), &[] as &[u16]);
        assert_eq!(table.physical(99), &[] as &[u16]);
    }

    #[test]
    fn lists_grow_without_disturbing_neighbors() {
        let mut table = MappingTable::new();
        for physical in 0..40 {
            table.push(physical % 3, physical).unwrap();
        }
        for virtual_index in 0..3 {
            let expected: Vec<u16> =
                (0..40_u16).filter(|p| usize::from(*p) % 3 == virtual_index).collect();
            assert_eq!(table.physical(virtual_index), expected.as_slice());
        }
        let summary = table.summary();
        let expected = MappingSummary {
            virtual_len: 3,
            mapped: 3,
            physical_refs: 40,
        };
        assert_eq!(summary, expected);
    }

    #[test]
    fn ceilings_are_enforced() {
        let mut table = MappingTable::new();
        assert_eq!(
            table.push(NUM_VLEDS_MAX, 0),
            Err(Error::VirtualIndexOutOfBounds {
                index: NUM_VLEDS_MAX,
                max: NUM_VLEDS_MAX,
            })
        );
        assert_eq!(
            table.push(0, NUM_LEDS_MAX),
            Err(Error::PhysicalIndexOutOfBounds {
                index: NUM_LEDS_MAX,
                max: NUM_LEDS_MAX,
            })
        );
        assert!(table.is_empty());
    }

    #[test]
    fn clear_then_rebuild_is_identical() {
        let mut first = MappingTable::new();
        let mut second = MappingTable::new();
        for table in [&mut first, &mut second] {
            for round in 0..2 {
                table.clear();
                for physical in 0..10 {
                    table.push(physical / 4, physical + round).unwrap();
                }
            }
        }
        assert_eq!(first, second);
        assert_eq!(first.physical(0), &[1, 2, 3, 4]);
    }
}
