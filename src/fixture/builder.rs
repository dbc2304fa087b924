//! The mapping pass.
//!
//! The source is streamed twice. The survey fixes the fixture size and LED count; the
//! second stream maps every point into every dirty layer. Tables are built on the side and
//! only installed once the whole stream went through, so a failing source never leaves a
//! layer half-mapped.

use alloc::vec::Vec;

use crate::color::BLACK;
use crate::layer::Layer;
use crate::mapping::MappingTable;
use crate::projection::{MapContext, inverse_distance_search};
use crate::{Coord3D, NUM_LEDS_MAX, Result};

use super::{
    Fixture, FixtureRecord, FixtureSink, FixtureSource, LedRange, PinAllocator, point_coord,
};

/// Physical extent of the fixture, gathered before any layer is touched.
#[derive(Debug, Default)]
struct Survey {
    declared: Coord3D,
    declared_count: Option<u16>,
    max_mm: Coord3D,
    points: usize,
}

impl Survey {
    /// Declared size per axis, else the bounding box in cells.
    fn fixture_size(&self) -> Coord3D {
        let derived = self.max_mm / 10 + Coord3D::ONE;
        let pick = |declared: i32, derived: i32| if declared > 0 { declared } else { derived };
        Coord3D::new(
            pick(self.declared.x, derived.x),
            pick(self.declared.y, derived.y),
            pick(self.declared.z, derived.z),
        )
    }
}

impl FixtureSink for Survey {
    fn on_record(&mut self, record: &FixtureRecord) {
        match record {
            FixtureRecord::Width(width) => self.declared.x = i32::from(*width),
            FixtureRecord::Height(height) => self.declared.y = i32::from(*height),
            FixtureRecord::Depth(depth) => self.declared.z = i32::from(*depth),
            FixtureRecord::LedCount(count) => self.declared_count = Some(*count),
            FixtureRecord::Point(coords) => {
                self.max_mm = self.max_mm.maximum(point_coord(coords));
                self.points += 1;
            }
            FixtureRecord::Pin(_) | FixtureRecord::EndOfArray => {}
        }
    }
}

/// A layer's table under construction.
#[derive(Debug)]
struct Staged {
    layer: usize,
    size: Coord3D,
    projection_dimension: u8,
    mapping: MappingTable,
    dropped: u32,
    unresolved: u32,
}

impl Staged {
    fn new(layer: usize) -> Self {
        Self {
            layer,
            size: Coord3D::ZERO,
            projection_dimension: 0,
            mapping: MappingTable::new(),
            dropped: 0,
            unresolved: 0,
        }
    }
}

struct MappingPass<'a> {
    layers: &'a [Layer],
    staged: &'a mut [Staged],
    fixture_size: Coord3D,
    index_p: usize,
    array_start: usize,
    pin: u16,
    pin_ranges: Vec<(u16, LedRange)>,
}

impl MappingPass<'_> {
    fn close_array(&mut self) {
        if self.index_p > self.array_start {
            let to_u16 = |index: usize| u16::try_from(index).unwrap_or(u16::MAX);
            let range = LedRange::new(to_u16(self.array_start), to_u16(self.index_p - 1));
            self.pin_ranges.push((self.pin, range));
        }
        self.array_start = self.index_p;
    }
}

impl FixtureSink for MappingPass<'_> {
    fn on_record(&mut self, record: &FixtureRecord) {
        match record {
            FixtureRecord::Pin(pin) => self.pin = *pin,
            FixtureRecord::Point(coords) => {
                let point = point_coord(coords);
                for staged in self.staged.iter_mut() {
                    if let Some(layer) = self.layers.get(staged.layer) {
                        map_point(layer, staged, self.fixture_size, point, self.index_p);
                    }
                }
                self.index_p += 1;
            }
            FixtureRecord::EndOfArray => self.close_array(),
            FixtureRecord::Width(_)
            | FixtureRecord::Height(_)
            | FixtureRecord::Depth(_)
            | FixtureRecord::LedCount(_) => {}
        }
    }
}

/// Map physical LED `index_p` at `point_mm` into one layer.
fn map_point(
    layer: &Layer,
    staged: &mut Staged,
    fixture_size: Coord3D,
    point_mm: Coord3D,
    index_p: usize,
) {
    if !layer.kind.builds_table() {
        return;
    }
    let last = fixture_size - Coord3D::ONE;
    let start = layer.region.start.maximum(Coord3D::ZERO).minimum(last);
    let end = layer.region.end.minimum(last);
    if !(point_mm.ge_all(start * 10) && point_mm.le_all(end * 10)) {
        return;
    }

    let mut size = end - start + Coord3D::ONE;
    let mut pixel = (point_mm - start * 10) / 10;
    let mut mid = layer.region.mid.maximum(Coord3D::ZERO).minimum(last);
    let projection_dimension = size.dimensions();
    staged.projection_dimension = projection_dimension;

    let projection = layer.kind.projection();
    let mut ctx = MapContext {
        effect_dimension: layer.effect_dimension,
        projection_dimension,
        region: size,
        canvas: staged.size,
        settings: &layer.settings,
    };
    projection.adjust_size_and_pixel(&ctx, &mut size, &mut pixel, &mut mid);
    if ctx.canvas_unset() {
        staged.size = size;
        ctx.canvas = size;
        debug!(
            "Fixture::project_and_map: layer {} canvas {}x{}x{}",
            staged.layer,
            size.x,
            size.y,
            size.z
        );
    }

    let mut mapped = Coord3D::ZERO;
    projection.adjust_mapped(&ctx, &mut mapped, size, pixel, mid);
    let Some(mut index_v) = mapped.flatten(staged.size) else {
        staged.dropped += 1;
        warn!(
            "Fixture::project_and_map: layer {} led {} lands at {},{},{} outside canvas",
            staged.layer,
            index_p,
            mapped.x,
            mapped.y,
            mapped.z
        );
        return;
    };

    if projection.needs_inverse(&ctx) {
        if let Some(found) = inverse_distance_search(staged.size, index_v) {
            index_v = found;
        } else {
            staged.unresolved += 1;
            debug!(
                "Fixture::project_and_map: layer {} led {} has no cell for {}",
                staged.layer,
                index_p,
                index_v
            );
            return;
        }
    }

    if staged.mapping.push(index_v, index_p).is_err() {
        staged.dropped += 1;
        warn!(
            "Fixture::project_and_map: layer {} dropped led {} -> virtual {}",
            staged.layer,
            index_p,
            index_v
        );
    }
}

impl Fixture {
    /// Rebuild the mapping table of every dirty layer from `source`.
    ///
    /// Every layer is rebuilt after [`request_remap`](Self::request_remap) or on the first
    /// pass. Points outside a layer's region are skipped; points that land outside its
    /// canvas or past a ceiling are dropped and counted in
    /// [`Diagnostics::mapping_drops`](super::Diagnostics::mapping_drops). When the fixture's
    /// [`alloc_pins`](super::FixtureConfig::alloc_pins) is set, every pin ends up owning
    /// the physical range of the arrays declared on it.
    ///
    /// # Errors
    ///
    /// [`Error::SourceUnavailable`](crate::Error::SourceUnavailable) or
    /// [`Error::SourceFailed`](crate::Error::SourceFailed) when `source` cannot be read. The
    /// fixture, its layers and `pins` are then left exactly as they were.
    pub fn project_and_map(
        &mut self,
        source: &mut impl FixtureSource,
        pins: &mut impl PinAllocator,
    ) -> Result<()> {
        source.open().inspect_err(|_| error!("Fixture::project_and_map: source unavailable"))?;
        let mut survey = Survey::default();
        source
            .stream(&mut survey)
            .inspect_err(|_| error!("Fixture::project_and_map: survey failed"))?;
        let fixture_size = survey.fixture_size();

        let mut staged = Vec::new();
        for (index, layer) in self.layers.iter_mut().enumerate() {
            if self.remap_requested || layer.needs_mapping() {
                layer.begin_mapping();
                staged.push(Staged::new(index));
            }
        }

        let mut pass = MappingPass {
            layers: &self.layers,
            staged: &mut staged,
            fixture_size,
            index_p: 0,
            array_start: 0,
            pin: 0,
            pin_ranges: Vec::new(),
        };
        let streamed = source.stream(&mut pass);
        let pin_ranges = pass.pin_ranges;
        if let Err(err) = streamed {
            error!("Fixture::project_and_map: stream failed, keeping previous mapping");
            for stage in &staged {
                if let Some(layer) = self.layers.get_mut(stage.layer) {
                    layer.abort_mapping();
                }
            }
            return Err(err);
        }

        self.commit(&survey, fixture_size, staged);
        if self.config.alloc_pins {
            self.allocate_pins(pins, &pin_ranges);
        }
        self.remap_requested = false;
        Ok(())
    }

    fn commit(&mut self, survey: &Survey, fixture_size: Coord3D, staged: Vec<Staged>) {
        if survey.points > NUM_LEDS_MAX {
            warn!(
                "Fixture::project_and_map: {} leds streamed, driving the first {}",
                survey.points,
                NUM_LEDS_MAX
            );
        }
        if let Some(declared) = survey.declared_count {
            if usize::from(declared) != survey.points {
                warn!(
                    "Fixture::project_and_map: {} leds declared, {} streamed",
                    declared,
                    survey.points
                );
            }
        }
        self.size = fixture_size;
        self.nr_of_leds = survey.points.min(NUM_LEDS_MAX);
        if !staged.is_empty() {
            self.leds.fill(BLACK);
        }

        for stage in staged {
            self.diagnostics.mapping_drops += stage.dropped;
            self.diagnostics.unresolved_inverse += stage.unresolved;
            let Some(layer) = self.layers.get_mut(stage.layer) else {
                continue;
            };
            if layer.kind.builds_table() {
                let summary = stage.mapping.summary();
                info!(
                    "Fixture::project_and_map: layer {} {} {}x{}x{}: {} virtual, {} mapped, {} physical refs",
                    stage.layer,
                    layer.kind.name(),
                    stage.size.x,
                    stage.size.y,
                    stage.size.z,
                    summary.virtual_len,
                    summary.mapped,
                    summary.physical_refs
                );
                layer.finish_mapping(
                    stage.size,
                    summary.virtual_len,
                    stage.projection_dimension,
                    stage.mapping,
                );
            } else {
                layer.finish_mapping(
                    fixture_size,
                    self.nr_of_leds,
                    fixture_size.dimensions(),
                    MappingTable::new(),
                );
            }
        }
    }

    fn allocate_pins(&mut self, pins: &mut impl PinAllocator, ranges: &[(u16, LedRange)]) {
        pins.deallocate_all();
        for &(pin, range) in ranges {
            let result = if pins.owned_range(pin).is_some() {
                pins.extend(pin, range)
            } else {
                pins.allocate(pin, range)
            };
            if result.is_err() {
                self.diagnostics.pin_failures += 1;
                warn!(
                    "Fixture::project_and_map: pin {} refused leds {}..={}",
                    pin,
                    range.start,
                    range.end
                );
            }
        }
    }
}
