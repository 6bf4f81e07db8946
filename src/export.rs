// src/export.rs

//! CSV export of per-cell scatter data.

use std::io::Write;

use crate::error::XpmError;
use crate::xpm::ScatterCloud;

/// Writes one `x-axis,y-axis,value` row per cell, 6 decimal places each.
pub fn write_scatter_csv<W: Write>(writer: &mut W, cloud: &ScatterCloud) -> Result<(), XpmError> {
    writeln!(writer, "x-axis,y-axis,value")?;
    for i in 0..cloud.len() {
        writeln!(
            writer,
            "{:.6},{:.6},{:.6}",
            cloud.x[i], cloud.y[i], cloud.v[i]
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_six_decimal_rows() {
        let cloud = ScatterCloud {
            x: vec![0.5, 1.5],
            y: vec![2.5, 2.5],
            v: vec![1.0, 2.0],
            weight: vec![1, 0],
        };
        let mut out = Vec::new();
        write_scatter_csv(&mut out, &cloud).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "x-axis,y-axis,value\n0.500000,2.500000,1.000000\n1.500000,2.500000,2.000000\n"
        );
    }
}
