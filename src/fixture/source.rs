//! The physical point stream a mapping pass consumes.
//!
//! Parsing the serialized fixture file is left to the caller; the mapping pass only sees
//! [`FixtureRecord`]s pushed into a [`FixtureSink`].

use alloc::vec::Vec;

use heapless::Vec as HVec;
use serde::{Deserialize, Serialize};

use crate::{Coord3D, Error, Result};

/// Coordinates of one physical point in millimetres, one to three axes.
pub type PointMm = HVec<i32, 3>;

/// One entry of a fixture description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureRecord {
    /// Fixture width in cells.
    Width(u16),
    /// Fixture height in cells.
    Height(u16),
    /// Fixture depth in cells.
    Depth(u16),
    /// Declared number of physical LEDs.
    LedCount(u16),
    /// Output pin driving the points that follow.
    Pin(u16),
    /// One physical LED position. Points are numbered in stream order.
    Point(PointMm),
    /// End of the points driven by the current pin.
    EndOfArray,
}

impl FixtureRecord {
    /// Point record from a coordinate.
    #[must_use]
    pub fn point(mm: Coord3D) -> Self {
        let mut coords = PointMm::new();
        for value in [mm.x, mm.y, mm.z] {
            // capacity is exactly three
            let _ = coords.push(value);
        }
        Self::Point(coords)
    }
}

/// Coordinate of a point record; missing axes are zero.
#[must_use]
pub fn point_coord(coords: &[i32]) -> Coord3D {
    let axis = |i: usize| coords.get(i).copied().unwrap_or(0);
    Coord3D::new(axis(0), axis(1), axis(2))
}

/// Receiver of fixture records.
pub trait FixtureSink {
    /// Handle one record.
    fn on_record(&mut self, record: &FixtureRecord);
}

/// Anything that can replay a fixture description.
pub trait FixtureSource {
    /// Check the description can be read.
    ///
    /// # Errors
    ///
    /// [`Error::SourceUnavailable`] when it cannot.
    fn open(&mut self) -> Result<()>;

    /// Push every record, in order, into `sink`. Each call replays from the start.
    ///
    /// # Errors
    ///
    /// [`Error::SourceFailed`] when reading stops part way.
    fn stream(&mut self, sink: &mut dyn FixtureSink) -> Result<()>;
}

/// In-memory fixture description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureDescription {
    records: Vec<FixtureRecord>,
}

impl FixtureDescription {
    /// Empty description.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Declare the fixture size in cells instead of deriving it from the points.
    #[must_use]
    pub fn with_size(mut self, width: u16, height: u16, depth: u16) -> Self {
        self.records.push(FixtureRecord::Width(width));
        self.records.push(FixtureRecord::Height(height));
        self.records.push(FixtureRecord::Depth(depth));
        self
    }

    /// Declare the number of physical LEDs.
    #[must_use]
    pub fn with_led_count(mut self, count: u16) -> Self {
        self.records.push(FixtureRecord::LedCount(count));
        self
    }

    /// Append one array of points driven by `pin`.
    #[must_use]
    pub fn with_array(mut self, pin: u16, points: impl IntoIterator<Item = Coord3D>) -> Self {
        self.push_array(pin, points);
        self
    }

    /// Append one array of points driven by `pin`.
    pub fn push_array(&mut self, pin: u16, points: impl IntoIterator<Item = Coord3D>) {
        self.records.push(FixtureRecord::Pin(pin));
        self.records.extend(points.into_iter().map(FixtureRecord::point));
        self.records.push(FixtureRecord::EndOfArray);
    }

    /// Append a raw record.
    pub fn push(&mut self, record: FixtureRecord) {
        self.records.push(record);
    }

    /// Records in stream order.
    #[must_use]
    pub fn records(&self) -> &[FixtureRecord] {
        &self.records
    }

    /// Number of point records.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.records.iter().filter(|record| matches!(record, FixtureRecord::Point(_))).count()
    }
}

impl FixtureSource for FixtureDescription {
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn stream(&mut self, sink: &mut dyn FixtureSink) -> Result<()> {
        for record in &self.records {
            sink.on_record(record);
        }
        Ok(())
    }
}

/// A source that cannot be opened, standing in for a missing fixture file.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSource;

impl FixtureSource for UnavailableSource {
    fn open(&mut self) -> Result<()> {
        Err(Error::SourceUnavailable)
    }

    fn stream(&mut self, _sink: &mut dyn FixtureSink) -> Result<()> {
        Err(Error::SourceUnavailable)
    }
}
