use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::grid::DEFAULT_CELL_WIDTH;

/// Controls what the dump prints for each input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Print the decoded fields of every record.
    pub dump_records: bool,
    /// Print `length, major, minor` for every record header.
    pub show_headers: bool,
    /// Print the list of part coordinates.
    pub show_parts: bool,
    /// Print the part grid.
    pub show_grid: bool,
    pub cell_width: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        DumpConfig {
            dump_records: true,
            show_headers: true,
            show_parts: true,
            show_grid: true,
            cell_width: DEFAULT_CELL_WIDTH,
        }
    }
}

impl DumpConfig {
    pub fn from_json(data: &str) -> Result<Self> {
        let mut cfg: DumpConfig =
            serde_json::from_str(data).context("failed to parse dump config as JSON")?;
        cfg.cell_width = cfg.cell_width.max(1);
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Apply `STDF_CELL_WIDTH` from the environment, if set.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var("STDF_CELL_WIDTH") {
            self.apply_cell_width(&raw)?;
        }
        Ok(())
    }

    fn apply_cell_width(&mut self, raw: &str) -> Result<()> {
        let width: usize = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid STDF_CELL_WIDTH {:?}", raw))?;
        self.cell_width = width.max(1);
        Ok(())
    }
}

/// Parsed command line: an optional `-c <config>` and the input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub config_path: Option<PathBuf>,
    pub inputs: Vec<PathBuf>,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut config_path = None;
        let mut inputs = Vec::new();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            if arg == "-c" {
                let path = iter.next().context("-c requires a config file path")?;
                config_path = Some(PathBuf::from(path));
            } else {
                inputs.push(PathBuf::from(arg));
            }
        }
        Ok(Args {
            config_path,
            inputs,
        })
    }
}

/// Load the dump config from `-c`, falling back to defaults, then apply
/// environment overrides.
pub fn load_dump_config(args: &Args) -> Result<DumpConfig> {
    let mut cfg = match &args.config_path {
        Some(path) => DumpConfig::from_file(path)?,
        None => DumpConfig::default(),
    };
    cfg.apply_env()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = DumpConfig::from_json(r#"{"dump_records": false}"#).unwrap();
        assert!(!cfg.dump_records);
        assert!(cfg.show_grid);
        assert_eq!(cfg.cell_width, 5);
    }

    #[test]
    fn test_zero_width_clamped() {
        let cfg = DumpConfig::from_json(r#"{"cell_width": 0}"#).unwrap();
        assert_eq!(cfg.cell_width, 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(DumpConfig::from_json("{").is_err());
    }

    #[test]
    fn test_cell_width_override() {
        let mut cfg = DumpConfig::default();
        cfg.apply_cell_width(" 7 ").unwrap();
        assert_eq!(cfg.cell_width, 7);
        assert!(cfg.apply_cell_width("wide").is_err());
    }

    #[test]
    fn test_args_parse() {
        let a = Args::parse(args(&["a.stdf", "-c", "cfg.json", "b.stdf"])).unwrap();
        assert_eq!(a.config_path, Some(PathBuf::from("cfg.json")));
        assert_eq!(a.inputs, vec![PathBuf::from("a.stdf"), PathBuf::from("b.stdf")]);
    }

    #[test]
    fn test_args_missing_config_path() {
        assert!(Args::parse(args(&["-c"])).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let a = Args::parse(args(&["-c", "/nonexistent/stdf.config.json"])).unwrap();
        let err = load_dump_config(&a).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/stdf.config.json"));
    }

    #[test]
    fn test_read_error_names_file() {
        // A directory is never readable as a config file.
        let dir = std::env::temp_dir();
        let err = DumpConfig::from_file(&dir).unwrap_err();
        assert!(format!("{:#}", err).contains(&dir.display().to_string()));
    }
}
