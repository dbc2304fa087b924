#![allow(missing_docs)]
//! Projections driven end to end through a mapping pass.

use led_fixture::config::{AxisFlags, TransposeFlags};
use led_fixture::fixture::{Fixture, FixtureConfig, FixtureDescription, PinRegistry, Wiring};
use led_fixture::layer::Region;
use led_fixture::projection::{Dimension, ProjectionKind};
use led_fixture::{Coord3D, RGB8};

const RED: RGB8 = RGB8::new(255, 0, 0);

fn two_d_layer(kind: ProjectionKind) -> (Fixture, usize) {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(kind).unwrap();
    fixture.layer_mut(layer).unwrap().set_effect(1, Dimension::Two);
    (fixture, layer)
}

fn map(fixture: &mut Fixture, source: &mut FixtureDescription) {
    fixture.project_and_map(source, &mut PinRegistry::<1>::new()).unwrap();
}

#[test]
fn pinwheel_with_one_petal_maps_everything_to_zero() {
    let (mut fixture, layer) = two_d_layer(ProjectionKind::Pinwheel);
    fixture.layer_mut(layer).unwrap().update_settings(|settings| {
        settings.petals = 1;
        settings.swirl = 17;
    });
    fixture.layer_mut(layer).unwrap().set_region(Region {
        mid: Coord3D::new(3, 3, 0),
        ..Region::WHOLE
    });
    map(&mut fixture, &mut FixtureDescription::matrix(6, 6, Wiring::RowMajor, 10));

    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::ONE);
    assert_eq!(layer.mapping().physical(0).len(), 36);
}

#[test]
fn multiply_by_one_passes_through() {
    let mut source = FixtureDescription::matrix(3, 2, Wiring::RowMajor, 10);
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::Multiply).unwrap();
    map(&mut fixture, &mut source);

    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::new(3, 2, 1));
    for index in 0..6 {
        assert_eq!(layer.mapping().physical(index), &[index as u16]);
    }
}

#[test]
fn mirror_folds_the_panel() {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::Mirror).unwrap();
    fixture
        .layer_mut(layer)
        .unwrap()
        .update_settings(|settings| settings.mirror = AxisFlags::X);
    map(&mut fixture, &mut FixtureDescription::strip(4, 10));

    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::new(2, 1, 1));
    assert_eq!(layer.mapping().physical(0), &[0, 3]);
    assert_eq!(layer.mapping().physical(1), &[1, 2]);
}

#[test]
fn reverse_counts_backwards() {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::Reverse).unwrap();
    fixture
        .layer_mut(layer)
        .unwrap()
        .update_settings(|settings| settings.reverse = AxisFlags::X);
    map(&mut fixture, &mut FixtureDescription::strip(5, 10));

    let mapping = fixture.layer(layer).unwrap().mapping();
    assert_eq!(mapping.physical(0), &[4]);
    assert_eq!(mapping.physical(4), &[0]);
}

#[test]
fn transpose_swaps_axes() {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::Transpose).unwrap();
    fixture
        .layer_mut(layer)
        .unwrap()
        .update_settings(|settings| settings.transpose = TransposeFlags::XY);
    map(&mut fixture, &mut FixtureDescription::matrix(3, 2, Wiring::RowMajor, 10));

    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::new(2, 3, 1));
    // physical (2, 0) is virtual (0, 2)
    assert_eq!(layer.mapping().physical(4), &[2]);
}

#[test]
fn transpose_keeps_every_point_of_a_wide_panel() {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::Transpose).unwrap();
    fixture
        .layer_mut(layer)
        .unwrap()
        .update_settings(|settings| settings.transpose = TransposeFlags::XY);
    map(&mut fixture, &mut FixtureDescription::matrix(8, 4, Wiring::RowMajor, 10));

    assert_eq!(fixture.diagnostics().mapping_drops, 0);
    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::new(4, 8, 1));
    assert_eq!(layer.mapping().summary().mapped, 32);
    // physical (7, 0) is virtual (0, 7), physical (1, 3) is virtual (3, 1)
    assert_eq!(layer.mapping().physical(28), &[7]);
    assert_eq!(layer.mapping().physical(7), &[25]);
}

#[test]
fn default_folds_strip_for_two_d_effect() {
    let (mut fixture, layer) = two_d_layer(ProjectionKind::Default);
    map(&mut fixture, &mut FixtureDescription::strip(12, 10));

    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::new(3, 4, 1));
    assert_eq!(layer.mapping().physical(7), &[7]);
}

#[test]
fn default_cube_for_three_d_effect_drops_the_remainder() {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::Default).unwrap();
    fixture.layer_mut(layer).unwrap().set_effect(1, Dimension::Three);
    map(&mut fixture, &mut FixtureDescription::strip(10, 10));

    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::splat(2));
    assert_eq!(layer.nr_of_leds(), 8);
    assert_eq!(fixture.diagnostics().mapping_drops, 2);
}

#[test]
fn tilt_pan_roll_rotates_on_access() {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::TiltPanRoll).unwrap();
    fixture.layer_mut(layer).unwrap().set_effect(1, Dimension::Two);
    fixture.layer_mut(layer).unwrap().update_settings(|settings| {
        settings.tilt_speed = 0;
        settings.pan_speed = 0;
        settings.roll_speed = 0;
    });
    map(&mut fixture, &mut FixtureDescription::matrix(5, 5, Wiring::RowMajor, 10));

    // without speeds the transform is the identity
    fixture.begin_frame(1000, None);
    let mut view = fixture.view(layer).unwrap();
    view.set_pixel_color_at(Coord3D::new(1, 2, 0), RED);
    assert_eq!(fixture.leds()[11], RED);

    fixture.layer_mut(layer).unwrap().update_settings(|settings| settings.roll_speed = 250);
    assert!(!fixture.needs_mapping());
    fixture.begin_frame(51, None);
    let mut view = fixture.view(layer).unwrap();
    // the centre is a fixed point of any rotation
    assert_eq!(view.xyz(Coord3D::new(2, 2, 0)), Some(12));
}

#[test]
fn transformer_kinds_leave_the_table_alone() {
    let mut source = FixtureDescription::matrix(4, 3, Wiring::RowMajor, 10);
    let mut fixture = Fixture::new(FixtureConfig::default());
    let reverse = fixture.add_layer(ProjectionKind::ReverseXyz).unwrap();
    fixture
        .layer_mut(reverse)
        .unwrap()
        .update_settings(|settings| settings.reverse = AxisFlags::X);
    map(&mut fixture, &mut source);

    let mut view = fixture.view(reverse).unwrap();
    assert_eq!(view.xyz(Coord3D::new(0, 1, 0)), Some(7));
    view.set_pixel_color_at(Coord3D::new(0, 0, 0), RED);
    assert_eq!(fixture.leds()[3], RED);
}

#[test]
fn distance_from_point_resolves_cells_by_search() {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::DistanceFromPoint).unwrap();
    fixture.layer_mut(layer).unwrap().set_effect(1, Dimension::Two);
    map(&mut fixture, &mut FixtureDescription::matrix(5, 5, Wiring::RowMajor, 10));

    let layer_ref = fixture.layer(layer).unwrap();
    assert_eq!(layer_ref.size(), Coord3D::new(5, 5, 1));
    let unresolved = fixture.diagnostics().unresolved_inverse as usize;
    let mapped: usize = layer_ref.mapping().iter().map(|(_, physical)| physical.len()).sum();
    assert_eq!(mapped + unresolved, 25);
    assert!(unresolved > 0);
}

#[test]
fn modified_pinwheel_counts_petals() {
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::ModifiedPinwheel).unwrap();
    fixture.layer_mut(layer).unwrap().update_settings(|settings| settings.petals = 4);
    fixture.layer_mut(layer).unwrap().set_region(Region {
        mid: Coord3D::new(4, 4, 0),
        ..Region::WHOLE
    });
    map(&mut fixture, &mut FixtureDescription::matrix(9, 9, Wiring::RowMajor, 10));

    let layer = fixture.layer(layer).unwrap();
    assert_eq!(layer.size(), Coord3D::new(4, 1, 1));
    let total: usize = (0..4).map(|petal| layer.mapping().physical(petal).len()).sum();
    assert_eq!(total, 81);
}

#[test]
fn names_resolve_for_every_kind() {
    for kind in ProjectionKind::ALL {
        assert_eq!(ProjectionKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(ProjectionKind::from_name("Transpose XYZ"), Some(ProjectionKind::TransposeXyz));
}
