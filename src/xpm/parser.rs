// src/xpm/parser.rs

//! Parses GROMACS `.xpm` pixel-matrix text into a validated [`PixelGrid`].
//!
//! Each trimmed input line is classified into exactly one [`LineClass`] by a
//! fixed set of structural predicates applied in priority order; the parse
//! driver folds the classified lines into builder state and validates the
//! cross-field invariants before assembling the grid.

use log::{debug, info, warn};

use super::axis::{resolve_axis, AxisResolution};
use super::{GridKind, PaletteEntry, PixelGrid};
use crate::color::Rgb;
use crate::error::XpmError;

/// Non-fatal irregularities observed while decoding a grid.
///
/// Warnings never abort a parse; they are logged through the `log` facade
/// and accumulated on the parser for callers that want to inspect them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A palette code was shorter than `chars_per_cell` and was right-padded
    /// with spaces.
    PaddedCode { code: String },
    /// An axis carried one more coordinate than the grid dimension and was
    /// reduced to bin-center midpoints.
    EdgeAxisReduced { axis: &'static str },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::PaddedCode { code } => {
                write!(f, "palette code {:?} padded with trailing spaces", code)
            }
            ParseWarning::EdgeAxisReduced { axis } => {
                write!(
                    f,
                    "{}-axis has one more value than the grid dimension, using bin centers",
                    axis
                )
            }
        }
    }
}

/// Progress of dimensions-line detection.
///
/// The line after the declaration opener is the dimensions line; once that
/// line is consumed, later lines are never treated as dimensions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DimensionsState {
    /// The declaration opener has not been seen yet.
    Pending,
    /// The opener was just seen; the next line holds the four integers.
    Armed,
    /// The dimensions line has been consumed.
    Consumed,
}

/// Metadata comment tags recognized by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MetaTag {
    XAxis,
    YAxis,
    Title,
    Legend,
    XLabel,
    YLabel,
    Kind,
}

const META_TAGS: [(&str, MetaTag); 7] = [
    ("/* x-axis", MetaTag::XAxis),
    ("/* y-axis", MetaTag::YAxis),
    ("/* title", MetaTag::Title),
    ("/* legend", MetaTag::Legend),
    ("/* x-label", MetaTag::XLabel),
    ("/* y-label", MetaTag::YLabel),
    ("/* type", MetaTag::Kind),
];

/// The classification of a single input line.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum LineClass<'a> {
    /// Opens the declaration block; the following line is the dimensions
    /// line.
    DeclarationStart,
    /// The four-integer dimensions line.
    Dimensions(&'a str),
    /// A recognized metadata comment.
    Meta(MetaTag, &'a str),
    /// A palette entry: seven whitespace tokens, the second literally `c`.
    Palette(&'a str),
    /// A quoted pixel row of exactly the expected unquoted length.
    DataRow(&'a str),
    /// Anything else; skipped.
    Ignorable,
}

/// Classifies one trimmed line.
///
/// Dimensions-block detection runs before the generic predicates: while the
/// parser is `Armed` the line is the dimensions line no matter what it looks
/// like, and the declaration opener is only recognized before the dimensions
/// line has been consumed. Data rows are only recognized once the expected
/// row length is known.
pub(super) fn classify<'a>(
    line: &'a str,
    dims: DimensionsState,
    row_len: Option<usize>,
) -> LineClass<'a> {
    if dims == DimensionsState::Armed {
        return LineClass::Dimensions(line);
    }
    if dims == DimensionsState::Pending && line.starts_with("static char") {
        return LineClass::DeclarationStart;
    }
    for (prefix, tag) in META_TAGS {
        if line.starts_with(prefix) {
            return LineClass::Meta(tag, line);
        }
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() == 7 && tokens[1] == "c" {
        return LineClass::Palette(line);
    }
    if let Some(expected) = row_len {
        if line.starts_with('"') && unquote(line).chars().count() == expected {
            return LineClass::DataRow(line);
        }
    }
    LineClass::Ignorable
}

/// Strips a trailing comma and the surrounding quotes from a line fragment.
fn unquote(fragment: &str) -> &str {
    fragment.trim_matches(',').trim_matches('"')
}

/// The four integers of the dimensions line.
#[derive(Debug, Clone, Copy)]
struct Dimensions {
    width: usize,
    height: usize,
    color_count: usize,
    chars_per_cell: usize,
}

/// Accumulated state of a single parse, folded line by line.
#[derive(Debug, Default)]
struct GridBuilder {
    title: String,
    legend: String,
    kind: GridKind,
    x_label: String,
    y_label: String,
    dimensions: Option<Dimensions>,
    palette: Vec<PaletteEntry>,
    x_axis: Vec<f64>,
    y_axis: Vec<f64>,
    rows: Vec<String>,
}

/// Decodes `.xpm` text into [`PixelGrid`]s, accumulating non-fatal warnings.
#[derive(Debug, Default)]
pub struct XpmParser {
    warnings: Vec<ParseWarning>,
}

impl XpmParser {
    pub fn new() -> Self {
        XpmParser::default()
    }

    /// Warnings accumulated since the last [`XpmParser::take_warnings`].
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Drains the accumulated warnings.
    pub fn take_warnings(&mut self) -> Vec<ParseWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn record(&mut self, warning: ParseWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Parses one pixel-matrix text into a validated grid.
    ///
    /// Fails with [`XpmError::Format`] on any violated invariant; no partial
    /// grid is ever returned. Warnings (code padding, edge-axis reduction)
    /// are recorded but never abort the parse.
    pub fn parse(&mut self, text: &str) -> Result<PixelGrid, XpmError> {
        let mut dims_state = DimensionsState::Pending;
        let mut builder = GridBuilder::default();

        for raw in text.lines() {
            let line = raw.trim();
            let row_len = builder.dimensions.map(|d| d.width * d.chars_per_cell);
            match classify(line, dims_state, row_len) {
                LineClass::DeclarationStart => dims_state = DimensionsState::Armed,
                LineClass::Dimensions(content) => {
                    builder.dimensions = Some(parse_dimensions(content)?);
                    dims_state = DimensionsState::Consumed;
                }
                LineClass::Meta(tag, content) => apply_meta(&mut builder, tag, content)?,
                LineClass::Palette(content) => self.push_palette_entry(&mut builder, content)?,
                LineClass::DataRow(content) => builder.rows.push(unquote(content).to_string()),
                LineClass::Ignorable => {}
            }
        }

        self.finish(builder)
    }

    /// Extracts one palette entry. Codes shorter than `chars_per_cell` are
    /// right-padded with spaces (with a warning); longer codes drop the
    /// entry, surfacing later as a palette size mismatch.
    fn push_palette_entry(
        &mut self,
        builder: &mut GridBuilder,
        line: &str,
    ) -> Result<(), XpmError> {
        let Some(dims) = builder.dimensions else {
            debug!("palette entry before dimensions line, skipping: {:?}", line);
            return Ok(());
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut code = tokens[0].trim_matches('"').to_string();
        let color = Rgb::from_hex(tokens[2])?;
        let note = tokens[5].trim_matches('"').to_string();

        let code_len = code.chars().count();
        if code_len > dims.chars_per_cell {
            debug!(
                "palette code {:?} is longer than {} chars, dropping entry",
                code, dims.chars_per_cell
            );
            return Ok(());
        }
        if code_len < dims.chars_per_cell {
            code.push_str(&" ".repeat(dims.chars_per_cell - code_len));
            self.record(ParseWarning::PaddedCode { code: code.clone() });
        }
        builder.palette.push(PaletteEntry { code, color, note });
        Ok(())
    }

    /// Validates the cross-field invariants, resolves the axes, and
    /// assembles the grid.
    fn finish(&mut self, builder: GridBuilder) -> Result<PixelGrid, XpmError> {
        let Some(dims) = builder.dimensions else {
            return Err(XpmError::Format("missing dimensions line".to_string()));
        };
        if builder.palette.len() != dims.color_count {
            return Err(XpmError::Format(format!(
                "palette size mismatch: {} entries, declared {}",
                builder.palette.len(),
                dims.color_count
            )));
        }
        if builder.rows.len() != dims.height {
            return Err(XpmError::Format(format!(
                "row count mismatch: {} data rows, height is {}",
                builder.rows.len(),
                dims.height
            )));
        }
        check_axis_len(&builder.x_axis, dims.width, "x-axis")?;
        check_axis_len(&builder.y_axis, dims.height, "y-axis")?;

        let (x_axis, x_resolution) = resolve_axis(&builder.x_axis, dims.width);
        if x_resolution == AxisResolution::EdgesReduced {
            self.record(ParseWarning::EdgeAxisReduced { axis: "x" });
        }
        let (y_axis, y_resolution) = resolve_axis(&builder.y_axis, dims.height);
        if y_resolution == AxisResolution::EdgesReduced {
            self.record(ParseWarning::EdgeAxisReduced { axis: "y" });
        }

        info!(
            "decoded {}x{} grid with {} palette entries ({:?})",
            dims.width, dims.height, dims.color_count, builder.kind
        );

        Ok(PixelGrid {
            title: builder.title,
            legend: builder.legend,
            kind: builder.kind,
            x_label: builder.x_label,
            y_label: builder.y_label,
            width: dims.width,
            height: dims.height,
            chars_per_cell: dims.chars_per_cell,
            palette: builder.palette,
            x_axis,
            y_axis,
            rows: builder.rows,
        })
    }
}

/// Applies one metadata comment to the builder. Quoted tags overwrite any
/// previous value (last occurrence wins); axis tags append.
fn apply_meta(builder: &mut GridBuilder, tag: MetaTag, line: &str) -> Result<(), XpmError> {
    match tag {
        MetaTag::XAxis => append_axis_values(&mut builder.x_axis, line, "x-axis")?,
        MetaTag::YAxis => append_axis_values(&mut builder.y_axis, line, "y-axis")?,
        MetaTag::Title => builder.title = quoted_value(line, "title")?,
        MetaTag::Legend => builder.legend = quoted_value(line, "legend")?,
        MetaTag::XLabel => builder.x_label = quoted_value(line, "x-label")?,
        MetaTag::YLabel => builder.y_label = quoted_value(line, "y-label")?,
        MetaTag::Kind => builder.kind = GridKind::from_label(&quoted_value(line, "type")?),
    }
    Ok(())
}

/// Appends the numeric tokens of one axis comment, preserving order.
///
/// The first two tokens (the comment opener and the tag) and the final token
/// (the comment terminator) are structural and skipped. Axis comments may
/// repeat; values concatenate across lines.
fn append_axis_values(axis: &mut Vec<f64>, line: &str, tag: &str) -> Result<(), XpmError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return Ok(());
    }
    for token in &tokens[2..tokens.len() - 1] {
        let value = token.parse::<f64>().map_err(|_| {
            XpmError::Format(format!("bad numeric token {:?} in {} comment", token, tag))
        })?;
        axis.push(value);
    }
    Ok(())
}

/// Extracts the first quoted segment of a metadata comment.
fn quoted_value(line: &str, tag: &str) -> Result<String, XpmError> {
    line.split('"').nth(1).map(str::to_string).ok_or_else(|| {
        XpmError::Format(format!("{} comment has no quoted value: {:?}", tag, line))
    })
}

/// Parses the dimensions line: width, height, color count and characters per
/// cell, all required to be positive.
fn parse_dimensions(line: &str) -> Result<Dimensions, XpmError> {
    let values = unquote(line)
        .split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|_| {
                XpmError::Format(format!(
                    "bad integer {:?} in dimensions line {:?}",
                    token, line
                ))
            })
        })
        .collect::<Result<Vec<usize>, XpmError>>()?;
    if values.len() < 4 {
        return Err(XpmError::Format(format!(
            "dimensions line {:?} has {} integers, expected 4",
            line,
            values.len()
        )));
    }
    let dims = Dimensions {
        width: values[0],
        height: values[1],
        color_count: values[2],
        chars_per_cell: values[3],
    };
    if dims.width == 0 || dims.height == 0 || dims.color_count == 0 || dims.chars_per_cell == 0 {
        return Err(XpmError::Format(format!(
            "dimensions line {:?} must hold four positive integers",
            line
        )));
    }
    Ok(dims)
}

/// Axis lengths must equal the grid dimension or exceed it by exactly one.
fn check_axis_len(axis: &[f64], expected: usize, tag: &str) -> Result<(), XpmError> {
    if axis.len() == expected || axis.len() == expected + 1 {
        Ok(())
    } else {
        Err(XpmError::Format(format!(
            "axis length mismatch: {} has {} values, expected {} or {}",
            tag,
            axis.len(),
            expected,
            expected + 1
        )))
    }
}
