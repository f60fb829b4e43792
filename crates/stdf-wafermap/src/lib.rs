//! Builds part-coordinate grids from STDF part result records.
//!
//! The stream is decoded with `stdf-parser`; every PRR feeds its part id and
//! (x, y) coordinates into a [`CoordinateCollector`], and once the stream is
//! exhausted a [`Grid`] renders the collected parts as labeled text.
//!
//! # Usage
//!
//! ```no_run
//! use stdf_wafermap::{collect_parts, Grid};
//!
//! let data: &[u8] = &[/* stdf bytes */];
//! let mut cursor = std::io::Cursor::new(data);
//!
//! let (collector, _summary) = collect_parts(&mut cursor).unwrap();
//! print!("{}", Grid::from_collector(&collector).render(5));
//! ```

pub mod cli;
pub mod collector;
pub mod config;
pub mod dump;
pub mod grid;

use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

use anyhow::Context;

use stdf_parser::{ParseError, ProcessSummary, StreamProcessor};

pub use collector::{Bounds, Coord, CoordinateCollector, PartResult};
pub use config::DumpConfig;
pub use grid::Grid;

/// Decode a whole stream and return the collected parts.
pub fn collect_parts<R: Read + Seek>(
    reader: R,
) -> Result<(CoordinateCollector, ProcessSummary), ParseError> {
    let mut collector = CoordinateCollector::new();
    let summary = StreamProcessor::new(reader).process(&mut collector)?;
    Ok((collector, summary))
}

/// Decode a stream, writing the field dump, part list and grid to `out`
/// as selected by `cfg`.
pub fn dump_stream<R: Read + Seek, W: Write>(
    reader: R,
    cfg: &DumpConfig,
    out: &mut W,
) -> anyhow::Result<(CoordinateCollector, ProcessSummary)> {
    let mut collector = CoordinateCollector::new();
    let mut dump = dump::FieldDump::new(&mut *out, cfg.show_headers, cfg.dump_records);
    dump.begin();

    let summary = StreamProcessor::new(reader).process(&mut (&mut collector, &mut dump))?;
    dump.finish()?;

    if cfg.show_parts {
        dump::write_parts(out, &collector)?;
    }
    if cfg.show_grid {
        writeln!(out, "\nPart Results Grid View")?;
        Grid::from_collector(&collector).write_to(out, cfg.cell_width)?;
    }
    Ok((collector, summary))
}

/// Open `path` and dump it with [`dump_stream`].
///
/// Nothing is written to `out` if the file cannot be opened.
pub fn dump_file<W: Write>(
    path: &Path,
    cfg: &DumpConfig,
    out: &mut W,
) -> anyhow::Result<(CoordinateCollector, ProcessSummary)> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    log::info!("reading {}", path.display());
    writeln!(out, "Reading {}", path.display())?;

    let (collector, summary) = dump_stream(BufReader::new(file), cfg, out)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    log::info!(
        "closing {}: {} decoded, {} unparsed, {} skipped, {} malformed, {} parts, {} bytes{}",
        path.display(),
        summary.decoded,
        summary.unparsed,
        summary.skipped,
        summary.malformed,
        collector.len(),
        summary.bytes_read,
        if summary.truncated { " (truncated)" } else { "" }
    );
    Ok((collector, summary))
}
