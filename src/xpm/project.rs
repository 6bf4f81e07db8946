// src/xpm/project.rs

//! Derived views of a [`PixelGrid`]: color matrix, value matrix, scatter
//! cloud with density-weighted expansion.
//!
//! All three projections are pure functions of the grid and are recomputed
//! on each call; nothing is cached.

use super::palette::ColorTable;
use super::{GridKind, PixelGrid};
use crate::color::Rgb;
use crate::error::XpmError;

/// A cloud of per-cell sample points, in parallel arrays.
///
/// `x`, `y` and `v` hold one entry per grid cell in row-major order (top
/// row first, paired with the reversed y axis). `weight` holds the
/// repetition count used by [`ScatterCloud::weighted_points`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterCloud {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub v: Vec<f64>,
    pub weight: Vec<usize>,
}

impl ScatterCloud {
    /// Number of cells contributing to the cloud.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Expands the cloud into its weighted point list: each `(x, y)` pair
    /// repeated `weight` times, zero-weight cells contributing nothing.
    ///
    /// The weights come from `round(v_max - v)`, so points accumulate where
    /// the grid value is far below the per-grid maximum. This is a
    /// visualization heuristic for GROMACS free-energy-style maps (low
    /// values become dense regions), not a statistically principled density
    /// estimate.
    pub fn weighted_points(&self) -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        for i in 0..self.x.len() {
            for _ in 0..self.weight[i] {
                points.push((self.x[i], self.y[i]));
            }
        }
        points
    }
}

/// Projects the grid onto a matrix of display colors, row 0 topmost.
///
/// Fails with [`XpmError::UnknownCode`] when a cell slice matches no
/// palette entry; after a successful parse that means the grid is
/// internally inconsistent, not that the user input was malformed.
pub fn categorical_matrix(grid: &PixelGrid) -> Result<Vec<Vec<Rgb>>, XpmError> {
    let table = ColorTable::new(grid);
    let mut matrix = Vec::with_capacity(grid.height);
    for (row_idx, row) in grid.rows.iter().enumerate() {
        let mut colors = Vec::with_capacity(grid.width);
        for (col_idx, code) in grid.cell_codes(row).iter().enumerate() {
            let color = table.color_of(code).ok_or_else(|| {
                XpmError::UnknownCode(format!(
                    "{:?} at row {}, column {}",
                    code, row_idx, col_idx
                ))
            })?;
            colors.push(color);
        }
        matrix.push(colors);
    }
    Ok(matrix)
}

/// Projects a `Continuous` grid onto its numeric values, row 0 topmost.
///
/// Fails with [`XpmError::UnsupportedKind`] for any other grid kind.
pub fn numeric_matrix(grid: &PixelGrid) -> Result<Vec<Vec<f64>>, XpmError> {
    if grid.kind != GridKind::Continuous {
        return Err(XpmError::UnsupportedKind {
            operation: "numeric matrix projection",
            kind: grid.kind,
        });
    }
    let table = ColorTable::new(grid);
    let mut matrix = Vec::with_capacity(grid.height);
    for row in &grid.rows {
        let values = grid
            .cell_codes(row)
            .iter()
            .map(|code| table.value_of(code))
            .collect::<Result<Vec<f64>, XpmError>>()?;
        matrix.push(values);
    }
    Ok(matrix)
}

/// Flattens a `Continuous` grid into one `(x, y, v)` triple per cell.
///
/// Cells are visited in row-major order against the resolved x axis and the
/// y axis reversed once, so the topmost row pairs with the largest y. Each
/// cell's weight is `round(v_max - v)` with `v_max` the maximum value across
/// the whole grid; ties round to the even neighbor, the convention the
/// weights were calibrated against.
pub fn scatter_cloud(grid: &PixelGrid) -> Result<ScatterCloud, XpmError> {
    let values = numeric_matrix(grid)?;
    let y_desc = grid.y_axis_descending();

    let mut cloud = ScatterCloud::default();
    for (row_idx, row) in values.iter().enumerate() {
        for (col_idx, &v) in row.iter().enumerate() {
            cloud.x.push(grid.x_axis[col_idx]);
            cloud.y.push(y_desc[row_idx]);
            cloud.v.push(v);
        }
    }

    let v_max = cloud.v.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    cloud.weight = cloud
        .v
        .iter()
        .map(|&v| (v_max - v).round_ties_even() as usize)
        .collect();
    Ok(cloud)
}
