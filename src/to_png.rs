#![cfg(feature = "host")]
//! PNG previews of layers and of the physical buffer, drawn as round LEDs on black.

use crate::Coord3D;
use crate::layer::LayerView;
use png::{BitDepth, ColorType, Encoder, ScaledFloat};
use smart_leds::RGB8;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PREVIEW_INVERSE_GAMMA: f32 = 2.2;

/// Row-major grid of LED colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedGrid {
    width: u32,
    height: u32,
    colors: Vec<RGB8>,
}

impl LedGrid {
    /// Grid of `width` columns; the last row is padded with black.
    ///
    /// # Errors
    ///
    /// Fails when `width` is zero or `colors` is empty.
    pub fn from_leds(leds: &[RGB8], width: u32) -> Result<Self, Box<dyn Error>> {
        if width == 0 || leds.is_empty() {
            return Err("grid needs a width and at least one LED".into());
        }
        let height = u32::try_from(leds.len().div_ceil(width as usize))?;
        let mut colors = leds.to_vec();
        colors.resize((width * height) as usize, RGB8::default());
        Ok(Self {
            width,
            height,
            colors,
        })
    }

    /// The z = 0 slice of a layer's canvas, read through its projection.
    ///
    /// # Errors
    ///
    /// Fails when the layer has not been mapped.
    pub fn from_layer(view: &mut LayerView<'_>) -> Result<Self, Box<dyn Error>> {
        let size = view.size();
        if size.x <= 0 || size.y <= 0 {
            return Err("layer has no canvas yet".into());
        }
        let colors = (0..size.y)
            .flat_map(|y| (0..size.x).map(move |x| Coord3D::new(x, y, 0)))
            .map(|pixel| view.get_pixel_color_at(pixel))
            .collect();
        Ok(Self {
            width: size.x as u32,
            height: size.y as u32,
            colors,
        })
    }

    /// Columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    fn color(&self, column: u32, row: u32) -> RGB8 {
        self.colors.get((row * self.width + column) as usize).copied().unwrap_or_default()
    }
}

/// Render `grid` into a PNG file sized to the requested maximum dimension.
///
/// # Errors
///
/// Fails on I/O or encoder errors.
pub fn write_grid_png(
    grid: &LedGrid,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
) -> Result<(), Box<dyn Error>> {
    write_grid_png_with_gamma(grid, output_path, target_max_dimension, PREVIEW_INVERSE_GAMMA)
}

/// Render `grid` into a PNG file with a custom preview inverse gamma.
///
/// # Errors
///
/// Fails on I/O or encoder errors, or when the gamma is not positive.
pub fn write_grid_png_with_gamma(
    grid: &LedGrid,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
    preview_inverse_gamma: f32,
) -> Result<(), Box<dyn Error>> {
    if preview_inverse_gamma <= 0.0 {
        return Err("preview_inverse_gamma must be positive".into());
    }
    let output_path = output_path.as_ref();
    let cell_size = select_cell_size(grid.width, grid.height, target_max_dimension)?;
    let (width, height, pixels) = grid_pixels(grid, cell_size, preview_inverse_gamma)?;
    create_parent(output_path)?;

    let file = File::create(output_path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Sixteen);
    encoder.set_source_gamma(ScaledFloat::new(1.0));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    info!("to_png: wrote {}", output_path.to_str().unwrap_or("PNG"));
    Ok(())
}

/// Render a sequence of grids of equal size into a looping APNG file.
///
/// # Errors
///
/// Fails on I/O or encoder errors, on an empty sequence or mismatched grid sizes.
pub fn write_grids_apng(
    grids: &[LedGrid],
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
    frame_delay_ms: u16,
) -> Result<(), Box<dyn Error>> {
    let Some(first) = grids.first() else {
        return Err("no frames to write".into());
    };
    if frame_delay_ms == 0 {
        return Err("frame_delay_ms must be positive".into());
    }
    if grids.iter().any(|grid| (grid.width, grid.height) != (first.width, first.height)) {
        return Err("all frames must share one grid size".into());
    }
    let output_path = output_path.as_ref();
    let cell_size = select_cell_size(first.width, first.height, target_max_dimension)?;
    let mut frames = Vec::with_capacity(grids.len());
    for grid in grids {
        frames.push(grid_pixels(grid, cell_size, PREVIEW_INVERSE_GAMMA)?);
    }
    let (width, height) = (frames[0].0, frames[0].1);
    create_parent(output_path)?;

    let file = File::create(output_path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Sixteen);
    encoder.set_source_gamma(ScaledFloat::new(1.0));
    encoder.set_animated(u32::try_from(frames.len())?, 0)?;
    let mut writer = encoder.write_header()?;
    for (_, _, pixels) in frames {
        writer.set_frame_delay(frame_delay_ms, 1000)?;
        writer.write_image_data(&pixels)?;
    }
    writer.finish()?;
    info!("to_png: wrote {}", output_path.to_str().unwrap_or("APNG"));
    Ok(())
}

fn create_parent(output_path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Largest cell that keeps the image, border included, within `target_max_dimension`.
fn select_cell_size(
    grid_width: u32,
    grid_height: u32,
    target_max_dimension: u32,
) -> Result<u32, Box<dyn Error>> {
    if target_max_dimension < 8 {
        return Err("target_max_dimension must be at least 8".into());
    }
    let mut cell_size = target_max_dimension;
    while cell_size > 8 {
        let led_radius = led_radius(cell_size);
        let max_dimension = grid_width.max(grid_height) * cell_size + led_radius * 2;
        if max_dimension <= target_max_dimension {
            break;
        }
        cell_size -= 1;
    }
    Ok(cell_size)
}

fn led_radius(cell_size: u32) -> u32 {
    let led_margin = (cell_size / 8).max(1);
    (cell_size - led_margin * 2) / 2
}

fn grid_pixels(
    grid: &LedGrid,
    cell_size: u32,
    preview_inverse_gamma: f32,
) -> Result<(u32, u32, Vec<u8>), Box<dyn Error>> {
    let led_radius = led_radius(cell_size);
    let fade_width = (led_radius / 3).max(1);
    if led_radius <= fade_width {
        return Err("cells too small to draw".into());
    }
    let border = led_radius;
    let width = grid.width * cell_size + border * 2;
    let height = grid.height * cell_size + border * 2;
    let mut bytes = vec![0u8; (width * height * 3 * 2) as usize];
    let center = (cell_size - 1) as i32 / 2;
    let led_radius_f = led_radius as f32;
    let inner_radius_f = (led_radius - fade_width) as f32;
    let radius_sq = (led_radius as i32) * (led_radius as i32);

    for row in 0..grid.height {
        for column in 0..grid.width {
            let pixel = grid.color(column, row);
            let linear = [pixel.r, pixel.g, pixel.b]
                .map(|channel| inverse_gamma_to_linear(channel, preview_inverse_gamma));
            for local_y in 0..cell_size {
                let delta_y = local_y as i32 - center;
                for local_x in 0..cell_size {
                    let delta_x = local_x as i32 - center;
                    let distance_sq = delta_x * delta_x + delta_y * delta_y;
                    if distance_sq > radius_sq {
                        continue;
                    }
                    let distance = (distance_sq as f32).sqrt();
                    let intensity = if distance <= inner_radius_f {
                        1.0
                    } else {
                        (1.0 - (distance - inner_radius_f) / (led_radius_f - inner_radius_f))
                            .max(0.0)
                    };
                    let x = border + column * cell_size + local_x;
                    let y = border + row * cell_size + local_y;
                    let offset = ((y * width + x) * 3 * 2) as usize;
                    if let Some(out) = bytes.get_mut(offset..offset + 6) {
                        for (pair, channel) in out.chunks_exact_mut(2).zip(linear) {
                            pair.copy_from_slice(&linear_to_u16(channel * intensity).to_be_bytes());
                        }
                    }
                }
            }
        }
    }

    Ok((width, height, bytes))
}

fn inverse_gamma_to_linear(channel: u8, preview_inverse_gamma: f32) -> f32 {
    let normalized = f32::from(channel) / 255.0;
    normalized.powf(preview_inverse_gamma)
}

fn linear_to_u16(value: f32) -> u16 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 65535.0).round() as u16
}
