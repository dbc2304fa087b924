#![allow(missing_docs)]
//! Host-level tests for the mapping pass.

use led_fixture::fixture::{
    Fixture, FixtureConfig, FixtureDescription, FixtureSink, FixtureSource, LedRange,
    PinAllocator, PinRegistry, UnavailableSource, Wiring,
};
use led_fixture::layer::{MapState, Region};
use led_fixture::mapping::PhysMap;
use led_fixture::projection::{Dimension, ProjectionKind};
use led_fixture::{Coord3D, Error, NUM_VLEDS_MAX, RGB8, Result};

fn three_points() -> FixtureDescription {
    FixtureDescription::new().with_array(
        0,
        [Coord3D::new(0, 0, 0), Coord3D::new(10, 0, 0), Coord3D::new(20, 0, 0)],
    )
}

fn mapped_fixture(
    source: &mut FixtureDescription,
    kind: ProjectionKind,
    configure: impl FnOnce(&mut Fixture, usize),
) -> (Fixture, usize) {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(kind).unwrap();
    configure(&mut fixture, layer);
    fixture.project_and_map(source, &mut PinRegistry::<4>::new()).unwrap();
    (fixture, layer)
}

fn multiply_by_three(fixture: &mut Fixture, layer: usize) {
    fixture
        .layer_mut(layer)
        .unwrap()
        .update_settings(|settings| settings.multiply = Coord3D::new(3, 1, 1));
}

#[test]
fn none_projection_maps_one_to_one() {
    let (fixture, layer) = mapped_fixture(&mut three_points(), ProjectionKind::None, |_, _| {});
    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::new(3, 1, 1));
    assert_eq!(layer.nr_of_leds(), 3);
    assert!(layer.mapping().is_empty());
    assert_eq!(layer.state(), MapState::Mapped);
    assert_eq!(fixture.size(), Coord3D::new(3, 1, 1));
    assert_eq!(fixture.nr_of_leds(), 3);
}

#[test]
fn multiply_folds_strip_onto_one_pixel() {
    let (fixture, layer) =
        mapped_fixture(&mut three_points(), ProjectionKind::Multiply, multiply_by_three);
    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::ONE);
    assert_eq!(layer.nr_of_leds(), 1);
    assert_eq!(layer.mapping().physical(0), &[0, 1, 2]);
    assert!(matches!(layer.mapping().entry(0), Some(PhysMap::Multiple(_))));
}

#[test]
fn grouping_merges_cells() {
    let mut source = FixtureDescription::matrix(4, 4, Wiring::RowMajor, 10);
    let (fixture, layer) = mapped_fixture(&mut source, ProjectionKind::Grouping, |fixture, layer| {
        fixture
            .layer_mut(layer)
            .unwrap()
            .update_settings(|settings| settings.grouping = Coord3D::new(2, 2, 1));
    });
    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::new(2, 2, 1));
    assert_eq!(layer.nr_of_leds(), 4);
    for index in 0..4 {
        assert_eq!(layer.mapping().physical(index).len(), 4);
    }
    assert_eq!(layer.mapping().physical(0), &[0, 1, 4, 5]);
}

#[test_log::test]
fn virtual_index_past_ceiling_is_dropped() {
    let mut source = FixtureDescription::new()
        .with_size(100, 100, 1)
        .with_array(0, [Coord3D::new(0, 0, 0), Coord3D::new(0, 900, 0)]);
    let (fixture, layer) = mapped_fixture(&mut source, ProjectionKind::Default, |fixture, layer| {
        fixture.layer_mut(layer).unwrap().set_effect(1, Dimension::Two);
    });
    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::new(100, 100, 1));
    assert_eq!(layer.mapping().len(), 1);
    assert!(layer.mapping().len() <= NUM_VLEDS_MAX);
    assert_eq!(fixture.diagnostics().mapping_drops, 1);
}

#[test]
fn mapping_is_idempotent() {
    let mut source = FixtureDescription::matrix(5, 3, Wiring::Serpentine, 10);
    let (mut fixture, layer) =
        mapped_fixture(&mut source, ProjectionKind::Mirror, |fixture, layer| {
            fixture.layer_mut(layer).unwrap().update_settings(|settings| {
                settings.mirror = led_fixture::config::AxisFlags::X;
            });
        });
    let first = fixture.layer(layer).unwrap().mapping().clone();
    fixture.request_remap();
    assert!(fixture.map_if_needed(&mut source, &mut PinRegistry::<1>::new()).unwrap());
    assert_eq!(fixture.layer(layer).unwrap().mapping(), &first);
    assert!(!fixture.map_if_needed(&mut source, &mut PinRegistry::<1>::new()).unwrap());
}

#[test_log::test]
fn unavailable_source_keeps_previous_mapping() {
    let (mut fixture, layer) =
        mapped_fixture(&mut three_points(), ProjectionKind::Multiply, multiply_by_three);
    let before = fixture.layer(layer).unwrap().mapping().clone();
    fixture.layer_mut(layer).unwrap().invalidate();

    let result = fixture.project_and_map(&mut UnavailableSource, &mut PinRegistry::<1>::new());
    assert_eq!(result, Err(Error::SourceUnavailable));
    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.mapping(), &before);
    assert_eq!(layer.size(), Coord3D::ONE);
    assert_eq!(fixture.nr_of_leds(), 3);
}

/// Opens fine, then fails on the second replay.
struct FlakySource {
    inner: FixtureDescription,
    streams: usize,
}

impl FixtureSource for FlakySource {
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn stream(&mut self, sink: &mut dyn FixtureSink) -> Result<()> {
        self.streams += 1;
        if self.streams > 1 {
            return Err(Error::SourceFailed);
        }
        self.inner.stream(sink)
    }
}

#[test]
fn failing_stream_leaves_layers_untouched() {
    let (mut fixture, layer) =
        mapped_fixture(&mut three_points(), ProjectionKind::Default, |_, _| {});
    let before = fixture.layer(layer).unwrap().mapping().clone();
    fixture
        .layer_mut(layer)
        .unwrap()
        .set_region(Region {
            end: Coord3D::new(1, 0, 0),
            ..Region::WHOLE
        });

    let mut source = FlakySource {
        inner: FixtureDescription::strip(8, 10),
        streams: 0,
    };
    let mut pins = PinRegistry::<2>::new();
    pins.allocate(9, LedRange::new(0, 2)).unwrap();
    assert_eq!(fixture.project_and_map(&mut source, &mut pins), Err(Error::SourceFailed));

    assert_eq!(fixture.layer(layer).unwrap().mapping(), &before);
    assert_eq!(fixture.layer(layer).unwrap().state(), MapState::Unmapped);
    assert_eq!(fixture.size(), Coord3D::new(3, 1, 1));
    assert_eq!(pins.owned_range(9), Some(LedRange::new(0, 2)));
}

#[test]
fn clean_layers_are_not_rebuilt() {
    let mut source = three_points();
    let mut fixture = Fixture::new(FixtureConfig::default());
    let strip = fixture.add_layer(ProjectionKind::Default).unwrap();
    let folded = fixture.add_layer(ProjectionKind::Multiply).unwrap();
    fixture.project_and_map(&mut source, &mut PinRegistry::<1>::new()).unwrap();

    let strip_size = fixture.layer(strip).unwrap().size();
    fixture.view(strip).unwrap().fill_solid(RGB8::new(5, 5, 5));
    assert!(!fixture.needs_mapping());
    fixture
        .layer_mut(folded)
        .unwrap()
        .update_settings(|settings| settings.multiply = Coord3D::new(3, 1, 1));
    assert!(fixture.needs_mapping());
    fixture.map_if_needed(&mut source, &mut PinRegistry::<1>::new()).unwrap();

    assert_eq!(fixture.layer(folded).unwrap().size(), Coord3D::ONE);
    assert_eq!(fixture.layer(strip).unwrap().size(), strip_size);
    assert_eq!(fixture.layer(strip).unwrap().state(), MapState::Mapped);
    // a rebuilt layer blanks the buffer
    assert!(fixture.leds().iter().all(|led| *led == RGB8::default()));
}

#[test]
fn declared_led_count_does_not_override_points() {
    let mut source = three_points().with_led_count(10);
    let (fixture, _) = mapped_fixture(&mut source, ProjectionKind::None, |_, _| {});
    assert_eq!(fixture.nr_of_leds(), 3);
    assert_eq!(fixture.leds().len(), 3);
}

#[test]
fn pins_are_released_and_reallocated() {
    let mut source = FixtureDescription::new()
        .with_array(1, led_fixture::fixture::strip(4, 10))
        .with_array(2, led_fixture::fixture::strip(4, 10).map(|p| Coord3D::new(p.x, 10, 0)));
    let mut pins = PinRegistry::<4>::new();
    pins.allocate(7, LedRange::new(0, 0)).unwrap();
    let mut fixture = Fixture::new(FixtureConfig::default());
    fixture.project_and_map(&mut source, &mut pins).unwrap();
    assert_eq!(pins.owned_range(7), None);
    assert_eq!(pins.owned_range(1), Some(LedRange::new(0, 3)));
    assert_eq!(pins.owned_range(2), Some(LedRange::new(4, 7)));

    let mut untouched = PinRegistry::<4>::new();
    untouched.allocate(7, LedRange::new(0, 0)).unwrap();
    let mut fixture = Fixture::new(FixtureConfig {
        alloc_pins: false,
        ..FixtureConfig::default()
    });
    fixture.project_and_map(&mut source, &mut untouched).unwrap();
    assert_eq!(untouched.owned_range(7), Some(LedRange::new(0, 0)));
}

#[test]
fn refused_pins_are_counted() {
    let mut source = FixtureDescription::new()
        .with_array(1, led_fixture::fixture::strip(2, 10))
        .with_array(2, led_fixture::fixture::strip(2, 10).map(|p| Coord3D::new(p.x, 10, 0)));
    let mut fixture = Fixture::new(FixtureConfig::default());
    fixture.project_and_map(&mut source, &mut PinRegistry::<1>::new()).unwrap();
    assert_eq!(fixture.diagnostics().pin_failures, 1);
}
