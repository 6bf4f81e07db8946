// src/xpm/palette.rs

//! Exact-match lookup from cell codes to display colors and numeric values.

use std::collections::HashMap;

use super::{GridKind, PixelGrid};
use crate::color::Rgb;
use crate::error::XpmError;

/// Code to (color, note) lookup built from a grid's palette.
///
/// Lookup is by exact match against the fixed-width code alphabet; no
/// trimming is applied beyond what the parser already did. When a palette
/// carries duplicate codes the first entry wins.
pub struct ColorTable<'a> {
    kind: GridKind,
    entries: HashMap<&'a str, (Rgb, &'a str)>,
}

impl<'a> ColorTable<'a> {
    pub fn new(grid: &'a PixelGrid) -> Self {
        let mut entries = HashMap::with_capacity(grid.palette.len());
        for entry in &grid.palette {
            entries
                .entry(entry.code.as_str())
                .or_insert((entry.color, entry.note.as_str()));
        }
        ColorTable {
            kind: grid.kind,
            entries,
        }
    }

    /// The display color of `code`, or `None` when the palette has no entry.
    pub fn color_of(&self, code: &str) -> Option<Rgb> {
        self.entries.get(code).map(|(color, _)| *color)
    }

    /// The note text of `code`, or `None` when the palette has no entry.
    pub fn note_of(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(|(_, note)| *note)
    }

    /// The numeric value encoded by `code`'s note.
    ///
    /// Fails with `UnsupportedKind` unless the grid kind is `Continuous`,
    /// with `UnknownCode` when the palette has no entry for `code`, and
    /// with `NumericNote` when the note does not parse as a number.
    pub fn value_of(&self, code: &str) -> Result<f64, XpmError> {
        if self.kind != GridKind::Continuous {
            return Err(XpmError::UnsupportedKind {
                operation: "value lookup",
                kind: self.kind,
            });
        }
        let (_, note) = self
            .entries
            .get(code)
            .ok_or_else(|| XpmError::UnknownCode(format!("{:?}", code)))?;
        note.parse::<f64>().map_err(|_| XpmError::NumericNote {
            code: code.to_string(),
            note: note.to_string(),
        })
    }
}
