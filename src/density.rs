// src/density.rs

//! Combines the weighted scatter clouds of several grids into one smoothed
//! 2D histogram.
//!
//! Points are binned over the joint bounding range of every input cloud and
//! the raw counts are Gaussian-smoothed as a pure post-processing step. The
//! smoothing itself is an external numeric operator (the `image` crate's
//! separable Gaussian blur), consumed behind [`gaussian_smooth`]. The
//! result keeps raw smoothed counts; it is never normalized to a
//! probability density.

use image::{ImageBuffer, Luma};
use log::info;
use ndarray::Array2;

use crate::xpm::ScatterCloud;

/// Bin count per histogram axis.
pub const DENSITY_BINS: usize = 800;
/// Smoothing kernel width, in bins.
pub const DENSITY_SIGMA: f64 = 16.0;

/// A smoothed 2D histogram over the joint point set of several clouds.
///
/// `counts` is indexed `[x_bin, y_bin]`; the edge arrays hold one more
/// entry than the bin count per axis. Read-only once produced.
#[derive(Debug, Clone)]
pub struct DensityMap {
    pub counts: Array2<f64>,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
}

impl DensityMap {
    /// Bin count along each axis.
    pub fn bins(&self) -> (usize, usize) {
        self.counts.dim()
    }
}

/// Combines the weighted points of all clouds into one smoothed density
/// map with the fixed [`DENSITY_BINS`] / [`DENSITY_SIGMA`] constants.
pub fn combine(clouds: &[ScatterCloud]) -> DensityMap {
    combine_with(clouds, DENSITY_BINS, DENSITY_SIGMA)
}

/// [`combine`] with explicit bin count and smoothing sigma.
pub fn combine_with(clouds: &[ScatterCloud], bins: usize, sigma: f64) -> DensityMap {
    let mut points = Vec::new();
    for cloud in clouds {
        points.extend(cloud.weighted_points());
    }
    info!(
        "combining {} clouds into a {}x{} density map ({} weighted points)",
        clouds.len(),
        bins,
        bins,
        points.len()
    );

    let mut map = histogram2d(&points, bins);
    map.counts = gaussian_smooth(&map.counts, sigma);
    map
}

/// Bins points into a `bins` x `bins` count matrix over their bounding
/// range, first axis x, second axis y.
///
/// A point on the upper edge of a range falls into the last bin. A
/// degenerate range (all points sharing one coordinate) expands by 0.5 on
/// both sides; an empty point set bins over [0, 1] with zero counts.
pub fn histogram2d(points: &[(f64, f64)], bins: usize) -> DensityMap {
    let (x_range, y_range) = bounding_ranges(points);
    let x_edges = linspace(x_range.0, x_range.1, bins + 1);
    let y_edges = linspace(y_range.0, y_range.1, bins + 1);

    let mut counts = Array2::<f64>::zeros((bins, bins));
    for &(x, y) in points {
        let i = bin_index(x, x_range, bins);
        let j = bin_index(y, y_range, bins);
        counts[[i, j]] += 1.0;
    }

    DensityMap {
        counts,
        x_edges,
        y_edges,
    }
}

fn bounding_ranges(points: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
    if points.is_empty() {
        return ((0.0, 1.0), (0.0, 1.0));
    }
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    (expand_degenerate(x_min, x_max), expand_degenerate(y_min, y_max))
}

/// A zero-width range widens by 0.5 on each side so every point lands in a
/// real bin.
fn expand_degenerate(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

fn bin_index(value: f64, range: (f64, f64), bins: usize) -> usize {
    let fraction = (value - range.0) / (range.1 - range.0);
    ((fraction * bins as f64) as usize).min(bins - 1)
}

fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let step = (stop - start) / (count - 1) as f64;
    (0..count).map(|i| start + step * i as f64).collect()
}

/// Applies the external Gaussian operator to a count matrix.
///
/// The convolution is `image::imageops::blur`: a separable, normalized
/// Gaussian with edge-extended padding and same-shape output. Counts
/// round-trip through `f32`, the operator's sample type. A non-positive
/// sigma returns the input unchanged.
pub fn gaussian_smooth(counts: &Array2<f64>, sigma: f64) -> Array2<f64> {
    if sigma <= 0.0 {
        return counts.clone();
    }
    let (x_bins, y_bins) = counts.dim();
    let mut img = ImageBuffer::<Luma<f32>, Vec<f32>>::new(x_bins as u32, y_bins as u32);
    for ((i, j), &count) in counts.indexed_iter() {
        img.put_pixel(i as u32, j as u32, Luma([count as f32]));
    }
    let blurred = image::imageops::blur(&img, sigma as f32);
    Array2::from_shape_fn((x_bins, y_bins), |(i, j)| {
        f64::from(blurred.get_pixel(i as u32, j as u32)[0])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xpm::ScatterCloud;

    fn cloud_of(points: &[(f64, f64)]) -> ScatterCloud {
        ScatterCloud {
            x: points.iter().map(|p| p.0).collect(),
            y: points.iter().map(|p| p.1).collect(),
            v: vec![0.0; points.len()],
            weight: vec![1; points.len()],
        }
    }

    #[test]
    fn identical_points_concentrate_in_one_bin() {
        let points = vec![(2.0, 3.0); 40];
        let map = histogram2d(&points, 8);
        assert_eq!(map.counts.sum(), 40.0);
        let nonzero: Vec<f64> = map.counts.iter().cloned().filter(|&c| c != 0.0).collect();
        assert_eq!(nonzero, vec![40.0]);
        // Degenerate range expands by half a unit on each side.
        assert_eq!(map.x_edges[0], 1.5);
        assert_eq!(*map.x_edges.last().unwrap(), 2.5);
    }

    #[test]
    fn points_on_the_upper_edge_fall_into_the_last_bin() {
        let points = vec![(0.0, 0.0), (1.0, 1.0)];
        let map = histogram2d(&points, 4);
        assert_eq!(map.counts[[0, 0]], 1.0);
        assert_eq!(map.counts[[3, 3]], 1.0);
    }

    #[test]
    fn empty_input_yields_zero_counts_over_unit_range() {
        let map = histogram2d(&[], 4);
        assert_eq!(map.counts.sum(), 0.0);
        assert_eq!(map.x_edges[0], 0.0);
        assert_eq!(*map.x_edges.last().unwrap(), 1.0);
    }

    #[test]
    fn smoothing_spreads_mass_but_keeps_it_nonnegative() {
        let map = combine_with(&[cloud_of(&[(2.0, 3.0); 10])], 32, 2.0);
        assert!(map.counts.iter().all(|&c| c >= 0.0));
        // Mass spread beyond the single source bin.
        let nonzero = map.counts.iter().filter(|&&c| c > 1e-9).count();
        assert!(nonzero > 1);
        // Away from the borders the normalized kernel conserves the total,
        // up to the operator's f32 precision.
        assert!((map.counts.sum() - 10.0).abs() < 1e-2);
    }

    #[test]
    fn smoothing_preserves_a_flat_field() {
        let flat = Array2::from_elem((16, 16), 3.0);
        let out = gaussian_smooth(&flat, 4.0);
        assert_eq!(out.dim(), (16, 16));
        for &v in out.iter() {
            assert!((v - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn combine_uses_weighted_expansion() {
        let mut cloud = cloud_of(&[(0.0, 0.0), (1.0, 1.0)]);
        cloud.weight = vec![3, 0];
        let map = combine_with(&[cloud], 8, 0.0);
        // Only the weight-3 point contributes; range is degenerate.
        assert_eq!(map.counts.sum(), 3.0);
    }
}
