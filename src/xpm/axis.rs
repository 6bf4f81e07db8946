// src/xpm/axis.rs

//! Axis coordinate resolution: reconciles a declared axis array against the
//! grid dimension, reducing bin edges to centers when one extra coordinate
//! is present.

/// Whether [`resolve_axis`] returned its input unchanged or reduced edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisResolution {
    Unchanged,
    /// The input had `expected_len + 1` entries and was reduced to the
    /// midpoints of consecutive pairs.
    EdgesReduced,
}

/// Resolves a declared axis against the expected number of cells.
///
/// With exactly `expected_len` entries the axis is returned as-is. With
/// `expected_len + 1` entries the input is treated as bin edges and each
/// output coordinate is the midpoint of one consecutive pair, reducing the
/// length by one. The function is pure and order-preserving; it never
/// reverses or sorts. Any other input length is rejected by the parser
/// before this is called and would be returned unchanged here.
pub fn resolve_axis(axis: &[f64], expected_len: usize) -> (Vec<f64>, AxisResolution) {
    if axis.len() == expected_len + 1 {
        let centers = axis
            .windows(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect();
        (centers, AxisResolution::EdgesReduced)
    } else {
        (axis.to_vec(), AxisResolution::Unchanged)
    }
}
