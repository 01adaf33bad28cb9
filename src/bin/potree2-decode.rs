//! Potree 2.0 decoder CLI
//!
//! Reads a Potree 2.0 point cloud directory and writes a flat `points.txt`
//! (header line of attribute names, comma-separated rows) into an output
//! directory. The reader variant (DEFAULT vs. BROTLI) is selected from
//! `metadata.json`'s `encoding` field — not a user-supplied flag, per the
//! spec's CLI surface.

use anyhow::{Context, Result};
use clap::Parser;
use potree2_decoder::cloud::{Cloud, Column};
use potree2_decoder::metadata::Metadata;
use potree2_decoder::reader::{reader_for, ReaderConfig, ReaderName};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "potree2-decode")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decode a Potree 2.0 point cloud into a flat points.txt", long_about = None)]
struct Cli {
    /// Path to the Potree point cloud directory to read
    #[arg(short, long)]
    path: PathBuf,

    /// Path to the directory to write points.txt into (created if missing)
    #[arg(short, long)]
    output: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        log::error!("{err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let started = Instant::now();

    let metadata = Metadata::load(&cli.path)
        .with_context(|| format!("failed to load metadata.json from {}", cli.path.display()))?;
    let reader_name = ReaderName::from_encoding(&metadata.encoding)
        .with_context(|| format!("unrecognized encoding in metadata.json: {}", metadata.encoding))?;
    log::info!("decoding {} with {reader_name}", cli.path.display());

    let reader = reader_for(ReaderConfig { reader_name });
    let cloud = reader
        .decode(&cli.path)
        .with_context(|| format!("failed to decode point cloud at {}", cli.path.display()))?;

    log::debug!(
        "decoded {} points across {} attributes in {:?}",
        cloud.columns.values().next().map(Column::len).unwrap_or(0),
        cloud.columns.len(),
        started.elapsed()
    );

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create output directory {}", cli.output.display()))?;
    write_points_txt(&cloud, &cli.output.join("points.txt"))
        .with_context(|| format!("failed to write {}", cli.output.join("points.txt").display()))?;

    log::info!("wrote {}", cli.output.join("points.txt").display());
    Ok(())
}

/// Write the decoded cloud as a header line of attribute names followed by
/// one comma-separated row per point. Multi-component attributes (`position`,
/// `rgb`) contribute one header column per component.
fn write_points_txt(cloud: &Cloud, path: &std::path::Path) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);

    let header: Vec<String> = cloud
        .columns
        .iter()
        .flat_map(|(name, column)| match column.components() {
            3 => vec![format!("{name}.x"), format!("{name}.y"), format!("{name}.z")],
            _ => vec![name.clone()],
        })
        .collect();
    writeln!(writer, "{}", header.join(","))?;

    let num_points = cloud.columns.values().next().map(Column::len).unwrap_or(0);
    for row in 0..num_points {
        let mut fields = Vec::with_capacity(header.len());
        for column in cloud.columns.values() {
            push_row_fields(column, row, &mut fields);
        }
        writeln!(writer, "{}", fields.join(","))?;
    }
    Ok(())
}

fn push_row_fields(column: &Column, row: usize, out: &mut Vec<String>) {
    match column {
        Column::Position(values) | Column::Rgb(values) => {
            let [x, y, z] = values[row];
            out.push(x.to_string());
            out.push(y.to_string());
            out.push(z.to_string());
        }
        Column::UInt8(values) => out.push(values[row].to_string()),
        Column::UInt16(values) => out.push(values[row].to_string()),
        Column::UInt32(values) => out.push(values[row].to_string()),
        Column::Int16(values) => out.push(values[row].to_string()),
        Column::Float(values) => out.push(values[row].to_string()),
        Column::Double(values) => out.push(values[row].to_string()),
    }
}
