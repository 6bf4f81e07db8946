// src/main.rs

// Declare modules
pub mod color;
pub mod config;
pub mod density;
pub mod error;
pub mod export;
pub mod render;
pub mod xpm;
pub mod xvg;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;

use crate::config::{Config, CONFIG};
use crate::xpm::{scatter_cloud, PixelGrid, XpmParser};

/// Views and exports for GROMACS xpm pixel matrices and xvg time series.
#[derive(Debug, Parser)]
#[command(name = "xpmview", version, about)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one xpm file to PNG.
    Show {
        /// Input xpm file.
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
        /// Output PNG path; defaults to the input with a png extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render numeric values through the jet ramp (Continuous only).
        #[arg(long)]
        values: bool,
        /// Render the linearly interpolated, upsampled value view
        /// (Continuous only).
        #[arg(long)]
        interpolate: bool,
    },
    /// Combine the weighted scatter clouds of several Continuous xpm
    /// files into one smoothed density map.
    Combine {
        /// Input xpm files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output PNG path.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Extract per-cell scatter data of Continuous xpm files to CSV.
    Extract {
        /// Input files; each must carry the xpm suffix.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Reformat xvg time-series files into aligned text.
    Xvg {
        /// Input xvg files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Additionally write a CSV rendition of each table.
        #[arg(long)]
        csv: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => CONFIG.clone(),
    };

    match cli.command {
        Command::Show {
            file,
            output,
            values,
            interpolate,
        } => show(&file, output, values, interpolate, &config),
        Command::Combine { files, output } => combine(&files, &output),
        Command::Extract { files } => extract(&files),
        Command::Xvg { files, csv } => reformat_xvg(&files, csv),
    }
}

/// Parses one xpm file, attaching the file name to any failure.
fn parse_file(path: &Path) -> anyhow::Result<PixelGrid> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    XpmParser::new()
        .parse(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Refuses to clobber files the user did not ask to replace.
fn check_fresh(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        bail!("output file {} already exists", path.display());
    }
    Ok(())
}

fn show(
    file: &Path,
    output: Option<PathBuf>,
    values: bool,
    interpolate: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| file.with_extension("png"));
    check_fresh(&output)?;

    let grid = parse_file(file)?;
    info!(
        "rendering {} ({}x{}, {:?})",
        file.display(),
        grid.width,
        grid.height,
        grid.kind
    );

    let cell = config.render.cell_size;
    let img = if interpolate {
        render::render_interpolated(&grid, cell, config.render.upscale)
    } else if values {
        render::render_values(&grid, cell)
    } else {
        render::render_categorical(&grid, cell)
    }
    .with_context(|| format!("failed to render {}", file.display()))?;

    img.save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {}", output.display());
    Ok(())
}

fn combine(files: &[PathBuf], output: &Path) -> anyhow::Result<()> {
    check_fresh(output)?;

    let mut clouds = Vec::with_capacity(files.len());
    for file in files {
        let grid = parse_file(file)?;
        let cloud = scatter_cloud(&grid)
            .with_context(|| format!("cannot combine {}", file.display()))?;
        clouds.push(cloud);
    }

    let map = density::combine(&clouds);
    let img = render::render_density(&map);
    img.save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {}", output.display());
    Ok(())
}

fn extract(files: &[PathBuf]) -> anyhow::Result<()> {
    for file in files {
        if file.extension().and_then(|e| e.to_str()) != Some("xpm") {
            bail!("{} does not carry the xpm suffix", file.display());
        }
        let out_path = file.with_extension("csv");
        check_fresh(&out_path)?;

        let grid = parse_file(file)?;
        let cloud = scatter_cloud(&grid)
            .with_context(|| format!("cannot extract {}", file.display()))?;

        let out = File::create(&out_path)
            .with_context(|| format!("failed to create {}", out_path.display()))?;
        export::write_scatter_csv(&mut BufWriter::new(out), &cloud)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!("wrote {}", out_path.display());
    }
    Ok(())
}

fn reformat_xvg(files: &[PathBuf], csv: bool) -> anyhow::Result<()> {
    for file in files {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let table = xvg::parse_xvg(&text)
            .with_context(|| format!("failed to parse {}", file.display()))?;
        let source = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("input");

        let stem = file.with_extension("");
        let formatted_path = stem.with_file_name(format!(
            "{}_formatted.xvg",
            stem.file_name().and_then(|n| n.to_str()).unwrap_or("out")
        ));
        let out = File::create(&formatted_path)
            .with_context(|| format!("failed to create {}", formatted_path.display()))?;
        table
            .write_formatted(&mut BufWriter::new(out), source)
            .with_context(|| format!("failed to write {}", formatted_path.display()))?;
        info!("wrote {}", formatted_path.display());

        if csv {
            let csv_path = file.with_extension("csv");
            let out = File::create(&csv_path)
                .with_context(|| format!("failed to create {}", csv_path.display()))?;
            table
                .write_csv(&mut BufWriter::new(out), source)
                .with_context(|| format!("failed to write {}", csv_path.display()))?;
            info!("wrote {}", csv_path.display());
        }
    }
    Ok(())
}
