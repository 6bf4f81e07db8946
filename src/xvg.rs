// src/xvg.rs

//! Reformats GROMACS `.xvg` columnar time-series text.
//!
//! An `.xvg` file carries `#` comments, `@` metadata directives (axis
//! labels and per-series legends) and whitespace-separated numeric rows.
//! [`parse_xvg`] gathers those into an [`XvgTable`]; the writers emit the
//! table as right-aligned fixed-width text or as CSV.

use std::io::Write;

use log::debug;

use crate::error::XpmError;

/// A parsed columnar time series: axis labels, column titles and rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XvgTable {
    pub x_label: String,
    pub y_label: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

/// Parses `.xvg` text into an [`XvgTable`].
///
/// `#` lines are skipped. `@` lines feed the header: `xaxis`/`yaxis`
/// labels take their quoted segment (spaces removed, the x label opening
/// the column list) and `s<N> ... legend` lines append a series title. A
/// data-position line whose first token is not numeric replaces the whole
/// column list, split on runs of two spaces. Every other line must be
/// all-numeric and becomes one row. When only one column title was
/// gathered the y label is appended as the second column.
pub fn parse_xvg(text: &str) -> Result<XvgTable, XpmError> {
    let mut table = XvgTable::default();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(directive) = line.strip_prefix('@') {
            apply_directive(&mut table, directive);
            continue;
        }
        let first = line.split_whitespace().next().unwrap_or_default();
        if first.parse::<f64>().is_err() {
            // A textual line in data position carries explicit column
            // titles, two-space separated.
            table.columns = line
                .split("  ")
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(|field| field.replace(' ', ""))
                .collect();
            debug!("column titles replaced: {:?}", table.columns);
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    XpmError::Format(format!("bad numeric token {:?} in xvg row {:?}", token, line))
                })
            })
            .collect::<Result<Vec<f64>, XpmError>>()?;
        table.rows.push(row);
    }

    if table.columns.len() == 1 {
        table.columns.push(table.y_label.clone());
    }
    Ok(table)
}

/// Applies one `@` directive to the header state.
fn apply_directive(table: &mut XvgTable, directive: &str) {
    let directive = directive.trim_start();
    if directive.contains("xaxis") {
        if let Some(label) = quoted_segment(directive) {
            table.x_label = label.clone();
            table.columns.push(label);
        }
    } else if directive.contains("yaxis") {
        if let Some(label) = quoted_segment(directive) {
            table.y_label = label;
        }
    } else if directive.starts_with('s') && directive.contains("legend") {
        if let Some(title) = quoted_segment(directive) {
            table.columns.push(title);
        }
    }
}

/// The first quoted segment with interior spaces removed.
fn quoted_segment(text: &str) -> Option<String> {
    text.split('"').nth(1).map(|s| s.replace(' ', ""))
}

impl XvgTable {
    /// Writes the table as right-aligned 16-column text, preceded by two
    /// comment lines naming the source and the axis labels.
    pub fn write_formatted<W: Write>(&self, writer: &mut W, source: &str) -> Result<(), XpmError> {
        writeln!(writer, "# reformatted from {}", source)?;
        writeln!(
            writer,
            "# xaxis : {}   yaxis : {}",
            self.x_label, self.y_label
        )?;
        let mut header = String::new();
        for title in &self.columns {
            header.push_str(&format!("{:>16}", title));
        }
        writeln!(writer, "{}", header)?;
        for row in &self.rows {
            let mut line = String::new();
            for value in row {
                line.push_str(&format!("{:>16.2}", value));
            }
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }

    /// Writes the same content comma-separated, keeping the comment lines.
    pub fn write_csv<W: Write>(&self, writer: &mut W, source: &str) -> Result<(), XpmError> {
        writeln!(writer, "# reformatted from {}", source)?;
        writeln!(
            writer,
            "# xaxis : {}   yaxis : {}",
            self.x_label, self.y_label
        )?;
        writeln!(writer, "{}", self.columns.join(","))?;
        for row in &self.rows {
            let fields: Vec<String> = row.iter().map(|v| format!("{:.2}", v)).collect();
            writeln!(writer, "{}", fields.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"# GROMACS energy output
@    title "Energies"
@    xaxis  label "Time (ps)"
@    yaxis  label "(kJ/mol)"
@ s0 legend "Potential"
@ s1 legend "Kinetic En."
0.0  -100.5  30.25
1.0  -99.0  31.0
"#;

    #[test_log::test]
    fn gathers_labels_legends_and_rows() {
        let table = parse_xvg(SAMPLE).unwrap();
        assert_eq!(table.x_label, "Time(ps)");
        assert_eq!(table.y_label, "(kJ/mol)");
        assert_eq!(table.columns, vec!["Time(ps)", "Potential", "KineticEn."]);
        assert_eq!(
            table.rows,
            vec![vec![0.0, -100.5, 30.25], vec![1.0, -99.0, 31.0]]
        );
    }

    #[test_log::test]
    fn single_column_header_falls_back_to_the_y_label() {
        let text = "@    xaxis  label \"Time (ps)\"\n@    yaxis  label \"RMSD (nm)\"\n0.0 0.1\n";
        let table = parse_xvg(text).unwrap();
        assert_eq!(table.columns, vec!["Time(ps)", "RMSD(nm)"]);
    }

    #[test_log::test]
    fn textual_data_line_replaces_the_header() {
        let text = "@    xaxis  label \"Time (ps)\"\nresidue name  mean value\n1.0 2.0\n";
        let table = parse_xvg(text).unwrap();
        assert_eq!(table.columns, vec!["residuename", "meanvalue"]);
        assert_eq!(table.rows, vec![vec![1.0, 2.0]]);
    }

    #[test_log::test]
    fn bad_numeric_rows_fail() {
        // First token numeric, later token not: the row is malformed.
        let text = "1.0 oops\n";
        assert!(matches!(parse_xvg(text), Err(XpmError::Format(_))));
    }

    #[test_log::test]
    fn formatted_output_is_right_aligned() {
        let table = parse_xvg(SAMPLE).unwrap();
        let mut out = Vec::new();
        table.write_formatted(&mut out, "energy.xvg").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# reformatted from energy.xvg");
        assert_eq!(lines[1], "# xaxis : Time(ps)   yaxis : (kJ/mol)");
        assert_eq!(
            lines[2],
            format!("{:>16}{:>16}{:>16}", "Time(ps)", "Potential", "KineticEn.")
        );
        assert_eq!(
            lines[3],
            format!("{:>16.2}{:>16.2}{:>16.2}", 0.0, -100.5, 30.25)
        );
    }

    #[test_log::test]
    fn csv_output_keeps_comments_and_joins_fields() {
        let table = parse_xvg(SAMPLE).unwrap();
        let mut out = Vec::new();
        table.write_csv(&mut out, "energy.xvg").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "Time(ps),Potential,KineticEn.");
        assert_eq!(lines[3], "0.00,-100.50,30.25");
    }
}
