// src/render.rs

//! Rasterizes grids and density maps into RGB images.
//!
//! Four views: the palette-color rendering of any grid, the jet-ramp value
//! rendering and its linearly interpolated upsampled variant for
//! `Continuous` grids, and the reversed-jet density rendering with its
//! origin at the bottom-left. PNG encoding happens at the CLI layer;
//! everything here returns an [`image::RgbImage`]. Titles, labels and tick
//! text are not rasterized; that metadata stays on the grid.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Rgb as ImageRgb, RgbImage};
use log::debug;

use crate::color::Rgb;
use crate::density::DensityMap;
use crate::error::XpmError;
use crate::xpm::{categorical_matrix, numeric_matrix, PixelGrid};

/// Color stops of the jet ramp, blue through cyan and yellow to dark red.
const JET_STOPS: [Rgb; 6] = [
    Rgb::new(0, 0, 128),
    Rgb::new(0, 0, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 0, 0),
    Rgb::new(128, 0, 0),
];

/// Maps `t` in [0, 1] through the jet ramp by interpolating between
/// evenly spaced stops. Out-of-range inputs clamp to the end colors.
pub fn jet(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (JET_STOPS.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(JET_STOPS.len() - 2);
    JET_STOPS[lower].lerp(JET_STOPS[lower + 1], scaled - lower as f64)
}

/// The jet ramp reversed, dark red at 0 through to dark blue at 1.
pub fn jet_reversed(t: f64) -> Rgb {
    jet(1.0 - t.clamp(0.0, 1.0))
}

fn pixel(color: Rgb) -> ImageRgb<u8> {
    ImageRgb([color.r, color.g, color.b])
}

/// Position of `value` within [min, max], 0.5 for a flat range.
fn normalized(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    }
}

/// Paints a matrix of colors as `cell`-sized square blocks, row 0 at the
/// top of the image.
fn paint_blocks(matrix: &[Vec<Rgb>], cell: u32) -> RgbImage {
    let height = matrix.len() as u32;
    let width = matrix.first().map_or(0, |row| row.len()) as u32;
    let mut img = RgbImage::new(width * cell, height * cell);
    for (row_idx, row) in matrix.iter().enumerate() {
        for (col_idx, &color) in row.iter().enumerate() {
            let px = pixel(color);
            for dy in 0..cell {
                for dx in 0..cell {
                    img.put_pixel(
                        col_idx as u32 * cell + dx,
                        row_idx as u32 * cell + dy,
                        px,
                    );
                }
            }
        }
    }
    img
}

/// Maps a value matrix through a color ramp after normalizing it to its
/// own [min, max] range.
fn ramp_matrix(values: &[Vec<f64>], ramp: fn(f64) -> Rgb) -> Vec<Vec<Rgb>> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in values {
        for &v in row {
            min = min.min(v);
            max = max.max(v);
        }
    }
    values
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| ramp(normalized(v, min, max)))
                .collect()
        })
        .collect()
}

/// Renders each cell as a block of its palette color, row 0 topmost.
pub fn render_categorical(grid: &PixelGrid, cell: u32) -> Result<RgbImage, XpmError> {
    let matrix = categorical_matrix(grid)?;
    Ok(paint_blocks(&matrix, cell))
}

/// Renders a `Continuous` grid's values through the jet ramp, row 0
/// topmost.
pub fn render_values(grid: &PixelGrid, cell: u32) -> Result<RgbImage, XpmError> {
    let values = numeric_matrix(grid)?;
    Ok(paint_blocks(&ramp_matrix(&values, jet), cell))
}

/// Renders a `Continuous` grid's values linearly resampled onto a
/// `factor`-times denser grid spanning the axis ranges, jet-mapped, with
/// the y origin at the bottom (the largest y at the top of the image).
pub fn render_interpolated(
    grid: &PixelGrid,
    cell: u32,
    factor: usize,
) -> Result<RgbImage, XpmError> {
    let values = numeric_matrix(grid)?;
    let fine = resample_values(&values, grid.width * factor, grid.height * factor);
    debug!(
        "interpolated {}x{} grid to {}x{}",
        grid.width,
        grid.height,
        grid.width * factor,
        grid.height * factor
    );
    Ok(paint_blocks(&ramp_matrix(&fine, jet), cell))
}

/// Renders a density map one pixel per bin through the reversed jet ramp,
/// x bins left-to-right and y bins bottom-to-top.
pub fn render_density(map: &DensityMap) -> RgbImage {
    let (x_bins, y_bins) = map.bins();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &c in map.counts.iter() {
        min = min.min(c);
        max = max.max(c);
    }
    let mut img = RgbImage::new(x_bins as u32, y_bins as u32);
    for i in 0..x_bins {
        for j in 0..y_bins {
            let t = normalized(map.counts[[i, j]], min, max);
            img.put_pixel(i as u32, (y_bins - 1 - j) as u32, pixel(jet_reversed(t)));
        }
    }
    img
}

/// Linearly resamples a value matrix onto an `nx` x `ny` grid through the
/// external resampling operator (`image::imageops::resize` with the
/// triangle filter).
///
/// `values[j][i]` is the sample at column `i` of row `j`; the output keeps
/// the same orientation. Samples round-trip through `f32`, the operator's
/// sample type, and the output is a convex combination of the inputs, so
/// it never leaves their value range. The operator resamples uniformly in
/// index space; the grid's axis arrays only carry coordinates.
pub fn resample_values(values: &[Vec<f64>], nx: usize, ny: usize) -> Vec<Vec<f64>> {
    let height = values.len();
    let width = values.first().map_or(0, |row| row.len());
    let mut img = ImageBuffer::<Luma<f32>, Vec<f32>>::new(width as u32, height as u32);
    for (j, row) in values.iter().enumerate() {
        for (i, &v) in row.iter().enumerate() {
            img.put_pixel(i as u32, j as u32, Luma([v as f32]));
        }
    }
    let fine = imageops::resize(&img, nx as u32, ny as u32, FilterType::Triangle);
    (0..ny)
        .map(|j| {
            (0..nx)
                .map(|i| f64::from(fine.get_pixel(i as u32, j as u32)[0]))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::histogram2d;
    use crate::xpm::XpmParser;

    const SAMPLE: &str = r#"/* XPM */
static char *gv_xpm[] = {
"2 2 2 1",
"A  c #FF0000 " /* "1.0" */,
"B  c #0000FF " /* "2.0" */,
/* x-axis:  0.0 1.0 */
/* y-axis:  0.0 1.0 */
/* type:    "Continuous" */
"AB",
"BA"
};
"#;

    #[test_log::test]
    fn categorical_render_scales_cells_into_blocks() {
        let grid = XpmParser::new().parse(SAMPLE).unwrap();
        let img = render_categorical(&grid, 3).unwrap();
        assert_eq!(img.dimensions(), (6, 6));
        // Top-left block holds the first row's first cell color.
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(2, 2).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(3, 0).0, [0, 0, 255]);
    }

    #[test_log::test]
    fn value_render_hits_the_ramp_endpoints() {
        let grid = XpmParser::new().parse(SAMPLE).unwrap();
        let img = render_values(&grid, 1).unwrap();
        // Minimum value maps to the first jet stop, maximum to the last.
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 128]);
        assert_eq!(img.get_pixel(1, 0).0, [128, 0, 0]);
    }

    #[test]
    fn jet_interpolates_between_stops() {
        assert_eq!(jet(0.0), Rgb::new(0, 0, 128));
        assert_eq!(jet(1.0), Rgb::new(128, 0, 0));
        assert_eq!(jet(0.4), Rgb::new(0, 255, 255));
        assert_eq!(jet_reversed(0.0), Rgb::new(128, 0, 0));
        assert_eq!(jet_reversed(1.0), Rgb::new(0, 0, 128));
    }

    #[test]
    fn resample_preserves_flat_fields_and_dimensions() {
        let values = vec![vec![5.0; 3]; 2];
        let fine = resample_values(&values, 9, 4);
        assert_eq!(fine.len(), 4);
        assert!(fine.iter().all(|row| row.len() == 9));
        for row in &fine {
            for &v in row {
                assert!((v - 5.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn resample_stays_within_the_sample_range() {
        let values = vec![vec![0.0, 2.0], vec![4.0, 6.0]];
        let fine = resample_values(&values, 8, 8);
        for row in &fine {
            for &v in row {
                assert!((-1e-4..=6.0001).contains(&v));
            }
        }
        // The gradient survives the upsampling.
        let min = fine.iter().flatten().cloned().fold(f64::INFINITY, f64::min);
        let max = fine
            .iter()
            .flatten()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(max > min);
    }

    #[test_log::test]
    fn interpolated_render_has_upscaled_dimensions() {
        let grid = XpmParser::new().parse(SAMPLE).unwrap();
        let img = render_interpolated(&grid, 1, 10).unwrap();
        assert_eq!(img.dimensions(), (20, 20));
    }

    #[test]
    fn density_render_puts_the_first_y_bin_at_the_bottom() {
        // One point in the low-y corner: its bin is the image's bottom row.
        let map = histogram2d(&[(0.0, 0.0), (1.0, 1.0)], 4);
        let img = render_density(&map);
        assert_eq!(img.dimensions(), (4, 4));
        // The reversed ramp sends occupied bins toward dark blue and empty
        // bins toward dark red. Bin [0, 0] lands on the bottom image row.
        assert_eq!(img.get_pixel(0, 3).0, [0, 0, 128]);
        assert_eq!(img.get_pixel(3, 0).0, [0, 0, 128]);
        assert_eq!(img.get_pixel(0, 0).0, [128, 0, 0]);
    }
}
