// src/error.rs

//! Error taxonomy for pixel-matrix decoding and the views derived from it.
//!
//! Parsing is all-or-nothing: any violated invariant aborts the parse of that
//! file with a `Format` error and no partial grid is ever returned. Derived
//! views fail with the more specific variants below. Non-fatal
//! irregularities are `ParseWarning`s (see `crate::xpm::parser`), not errors.

use thiserror::Error;

use crate::xpm::GridKind;

/// Errors produced while decoding an XPM grid or deriving views from it.
#[derive(Debug, Error)]
pub enum XpmError {
    /// The source text violated a structural rule of the format: dimensions
    /// line, palette size, row count, axis lengths or field syntax.
    #[error("format error: {0}")]
    Format(String),

    /// A continuous-only operation was requested on a non-continuous grid.
    #[error("{operation} requires a Continuous grid, but this grid is {kind:?}")]
    UnsupportedKind {
        operation: &'static str,
        kind: GridKind,
    },

    /// A data row referenced a code with no palette entry. After a
    /// successful parse this means the grid is internally inconsistent.
    #[error("unknown pixel code: {0}")]
    UnknownCode(String),

    /// A palette note that should hold a numeric value does not.
    #[error("palette note {note:?} for code {code:?} is not numeric")]
    NumericNote { code: String, note: String },

    /// An export sink failed mid-write.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using XpmError.
pub type Result<T> = std::result::Result<T, XpmError>;
