//! Sparse row/column projection of aggregated part coordinates.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::io;
use std::iter;
use std::ops::RangeInclusive;

use crate::collector::{Bounds, CoordinateCollector};

pub const DEFAULT_CELL_WIDTH: usize = 5;

/// Part ids indexed by row (y) then column (x).
#[derive(Debug, Clone)]
pub struct Grid {
    cells: BTreeMap<i16, BTreeMap<i16, String>>,
    bounds: Bounds,
}

impl Grid {
    /// Build the grid from the collector's final state.
    pub fn from_collector(collector: &CoordinateCollector) -> Self {
        let mut cells: BTreeMap<i16, BTreeMap<i16, String>> = BTreeMap::new();
        for part in collector.parts() {
            cells
                .entry(part.y)
                .or_default()
                .insert(part.x, part.id.to_string());
        }
        Grid {
            cells,
            bounds: collector.bounds(),
        }
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&str> {
        let x = i16::try_from(x).ok()?;
        let y = i16::try_from(y).ok()?;
        self.cells.get(&y)?.get(&x).map(String::as_str)
    }

    /// Columns rendered, left to right: min x - 1 through max x + 1.
    pub fn columns(&self) -> RangeInclusive<i32> {
        (self.bounds.min_x as i32 - 1)..=(self.bounds.max_x as i32 + 1)
    }

    /// Rows rendered, top to bottom: max y + 1 down to min y - 1.
    pub fn rows(&self) -> impl Iterator<Item = i32> {
        ((self.bounds.min_y as i32 - 1)..=(self.bounds.max_y as i32 + 1)).rev()
    }

    /// Number of populated cells within the rendered area.
    pub fn filled(&self) -> usize {
        let cols = self.columns();
        self.rows()
            .map(|y| cols.clone().filter(|&x| self.cell(x, y).is_some()).count())
            .sum()
    }

    /// Render as text with centered cells of `width` characters.
    ///
    /// The first line holds the column labels; every following line starts
    /// with its row label. Trailing whitespace is trimmed from each line.
    pub fn render(&self, width: usize) -> String {
        let mut out = String::new();
        for line in self.lines(width) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Write the rendered grid one line at a time.
    pub fn write_to(&self, out: &mut impl io::Write, width: usize) -> io::Result<()> {
        for line in self.lines(width) {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Rendered lines, produced lazily: the column labels, then one line
    /// per row from top to bottom.
    pub fn lines(&self, width: usize) -> impl Iterator<Item = String> + '_ {
        let width = width.max(1);
        iter::once(self.header_line(width))
            .chain(self.rows().map(move |row| self.row_line(row, width)))
    }

    fn header_line(&self, width: usize) -> String {
        let mut line = " ".repeat(width);
        for col in self.columns() {
            let _ = write!(line, "{:^width$}", col);
        }
        trim_line(line)
    }

    fn row_line(&self, row: i32, width: usize) -> String {
        let mut line = format!("{:^width$}", row);
        for col in self.columns() {
            let id = self.cell(col, row).unwrap_or(" ");
            let _ = write!(line, "{:^width$}", id);
        }
        trim_line(line)
    }
}

fn trim_line(mut line: String) -> String {
    line.truncate(line.trim_end().len());
    line
}
