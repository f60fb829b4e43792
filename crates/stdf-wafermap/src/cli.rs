//! The `stdf-wafermap` command line.

use std::io::Write;
use std::path::PathBuf;

use crate::config::{self, Args, DumpConfig};
use crate::dump_file;

pub const USAGE: &str = "usage: stdf-wafermap [-c config.json] <file.stdf>...";

/// Exit code for usage and configuration errors.
pub const EXIT_USAGE: u8 = 2;
/// Exit code when at least one input file failed.
pub const EXIT_FAILURE: u8 = 1;

/// Dump every input in order, reporting failures to `err` and continuing
/// with the next file. Returns the paths that failed.
pub fn dump_files<W: Write, E: Write>(
    inputs: &[PathBuf],
    cfg: &DumpConfig,
    out: &mut W,
    err: &mut E,
) -> Vec<PathBuf> {
    let mut failed = Vec::new();
    for path in inputs {
        let result = dump_file(path, cfg, out).and_then(|_| out.flush().map_err(Into::into));
        if let Err(e) = result {
            log::error!("failed to process {}: {:?}", path.display(), e);
            let _ = writeln!(err, "error: {:#}", e);
            failed.push(path.clone());
        }
    }
    failed
}

/// Run the command line over `args` (without the program name) and return
/// the process exit code.
pub fn run<I, W, E>(args: I, out: &mut W, err: &mut E) -> u8
where
    I: IntoIterator<Item = String>,
    W: Write,
    E: Write,
{
    let args = match Args::parse(args) {
        Ok(args) => args,
        Err(e) => {
            let _ = writeln!(err, "error: {:#}", e);
            return EXIT_USAGE;
        }
    };
    if args.inputs.is_empty() {
        let _ = writeln!(err, "{}", USAGE);
        return EXIT_USAGE;
    }

    let cfg = match config::load_dump_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            let _ = writeln!(err, "error: {:#}", e);
            return EXIT_USAGE;
        }
    };

    if dump_files(&args.inputs, &cfg, out, err).is_empty() {
        0
    } else {
        EXIT_FAILURE
    }
}
