#![cfg(feature = "host")]

// Renders a rolling rainbow on a 12x8 panel to an APNG.
//
// cargo run --example panel_preview -- [output.png]

use embedded_graphics::prelude::Point;
use led_fixture::fixture::{Fixture, FixtureConfig, FixtureDescription, PinRegistry, Wiring};
use led_fixture::layer::Font;
use led_fixture::projection::{Dimension, ProjectionKind};
use led_fixture::to_png::{LedGrid, write_grids_apng};
use smart_leds::colors;
use std::error::Error;
use std::path::PathBuf;

const WIDTH: u16 = 12;
const HEIGHT: u16 = 8;
const FRAME_COUNT: u32 = 24;
const FRAME_DELAY_MS: u16 = 80;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let output_path = output_path_from_args();

    let mut source = FixtureDescription::matrix(WIDTH, HEIGHT, Wiring::RowMajor, 10);
    let mut pins = PinRegistry::<1>::new();
    let mut fixture = Fixture::new(FixtureConfig::default());
    let layer = fixture.add_layer(ProjectionKind::TiltPanRoll)?;
    fixture.layer_mut(layer)?.set_effect(1, Dimension::Two);
    fixture.layer_mut(layer)?.update_settings(|settings| {
        settings.tilt_speed = 0;
        settings.pan_speed = 0;
        settings.roll_speed = 200;
    });
    fixture.map_if_needed(&mut source, &mut pins)?;

    let mut grids = Vec::with_capacity(FRAME_COUNT as usize);
    for frame_index in 0..FRAME_COUNT {
        fixture.begin_frame(frame_index * u32::from(FRAME_DELAY_MS), None);
        let mut view = fixture.view(layer)?;
        view.fill_rainbow((frame_index * 8) as u8, 6);
        view.fade_to_black_by(160);
        view.draw_text("Hi", Point::new(2, 1), Font::Font4x6, colors::WHITE);
        grids.push(LedGrid::from_leds(fixture.leds(), u32::from(WIDTH))?);
    }

    write_grids_apng(&grids, &output_path, 400, FRAME_DELAY_MS)?;
    println!("wrote APNG to {}", output_path.display());
    Ok(())
}

fn output_path_from_args() -> PathBuf {
    let mut args = std::env::args().skip(1);
    if let Some(path) = args.next() {
        return PathBuf::from(path);
    }
    PathBuf::from("panel_preview.png")
}
