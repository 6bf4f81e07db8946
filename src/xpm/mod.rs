// src/xpm/mod.rs

//! Decoding of GROMACS pixel-matrix (`.xpm`) text into a typed grid model,
//! plus the views derived from it.
//!
//! A [`PixelGrid`] is produced once per source text by [`XpmParser`] and
//! never mutated afterwards; every derived structure is a pure function of
//! it and is recomputed on each request.

pub mod axis;
pub mod palette;
pub mod parser;
pub mod project;

pub use palette::ColorTable;
pub use parser::{ParseWarning, XpmParser};
pub use project::{categorical_matrix, numeric_matrix, scatter_cloud, ScatterCloud};

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// How the cell values of a grid are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridKind {
    /// Palette notes hold numeric values; value-based views are available.
    Continuous,
    /// Palette notes hold category labels.
    Discrete,
    /// The source declared no `type` comment, or an unrecognized one.
    #[default]
    Unspecified,
}

impl GridKind {
    /// Maps the quoted value of a `type` comment to a kind.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Continuous" => GridKind::Continuous,
            "Discrete" => GridKind::Discrete,
            _ => GridKind::Unspecified,
        }
    }
}

/// One palette entry: a fixed-width code, its display color, and its note.
///
/// For `Continuous` grids the note holds the numeric value of the cell as
/// text; otherwise it is a category label.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub code: String,
    pub color: Rgb,
    pub note: String,
}

/// A decoded pixel matrix: the validated, immutable result of one parse.
///
/// `rows` are stored top-to-bottom as they appear in the source, while
/// `y_axis` is in ascending semantic order. Consumers pairing rows with
/// y-coordinates must reverse the axis once so that row 0 aligns with the
/// largest y; see [`PixelGrid::y_axis_descending`].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    pub title: String,
    pub legend: String,
    pub kind: GridKind,
    pub x_label: String,
    pub y_label: String,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Fixed-width code length identifying a color per cell.
    pub chars_per_cell: usize,
    pub palette: Vec<PaletteEntry>,
    /// Per-column x coordinates, length == `width`.
    pub x_axis: Vec<f64>,
    /// Per-row y coordinates in ascending order, length == `height`.
    pub y_axis: Vec<f64>,
    /// Pixel rows, top-to-bottom, each `width * chars_per_cell` characters.
    pub rows: Vec<String>,
}

impl PixelGrid {
    /// The y axis reversed for pairing with `rows`: index 0 holds the
    /// coordinate of the topmost row.
    pub fn y_axis_descending(&self) -> Vec<f64> {
        let mut reversed = self.y_axis.clone();
        reversed.reverse();
        reversed
    }

    /// Splits one stored row into its fixed-width cell codes.
    pub fn cell_codes(&self, row: &str) -> Vec<String> {
        let chars: Vec<char> = row.chars().collect();
        chars
            .chunks(self.chars_per_cell)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}
