//! Aggregates part coordinates from PRR records.

use indexmap::IndexMap;
use stdf_parser::{DecodedRecord, Record, RecordSink};

/// The (x, y) position of one part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coord {
    pub x: i16,
    pub y: i16,
}

/// One aggregated part result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartResult<'a> {
    pub id: &'a str,
    pub x: i16,
    pub y: i16,
}

/// The running coordinate envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i16,
    pub max_x: i16,
    pub min_y: i16,
    pub max_y: i16,
}

impl Bounds {
    pub const MIN_SENTINEL: i16 = 32767;
    pub const MAX_SENTINEL: i16 = -32767;

    /// Update the envelope with one coordinate.
    ///
    /// Per axis, a value below the current min updates the min; only
    /// otherwise is it compared against the max. A first coordinate
    /// therefore sets the min and leaves the max at its sentinel.
    pub fn include(&mut self, x: i16, y: i16) {
        if x < self.min_x {
            self.min_x = x;
        } else if x > self.max_x {
            self.max_x = x;
        }
        if y < self.min_y {
            self.min_y = y;
        } else if y > self.max_y {
            self.max_y = y;
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            min_x: Self::MIN_SENTINEL,
            max_x: Self::MAX_SENTINEL,
            min_y: Self::MIN_SENTINEL,
            max_y: Self::MAX_SENTINEL,
        }
    }
}

/// Collects part coordinates keyed by part id.
///
/// A later record with the same id overwrites the earlier coordinates but
/// keeps the id's original position in iteration order.
#[derive(Debug, Default)]
pub struct CoordinateCollector {
    parts: IndexMap<String, Coord>,
    bounds: Bounds,
}

impl CoordinateCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: &str, x: i16, y: i16) {
        if let Some(prev) = self.parts.insert(id.to_string(), Coord { x, y }) {
            log::debug!(
                "part {:?} moved from ({}, {}) to ({}, {})",
                id,
                prev.x,
                prev.y,
                x,
                y
            );
        }
        self.bounds.include(x, y);
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn get(&self, id: &str) -> Option<Coord> {
        self.parts.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterate over parts in first-insertion order.
    pub fn parts(&self) -> impl Iterator<Item = PartResult<'_>> {
        self.parts.iter().map(|(id, c)| PartResult {
            id: id.as_str(),
            x: c.x,
            y: c.y,
        })
    }
}

impl RecordSink for CoordinateCollector {
    fn record(&mut self, rec: &DecodedRecord) {
        if let Record::Prr(prr) = &rec.record {
            CoordinateCollector::record(self, prr.id(), prr.x_coord, prr.y_coord);
        }
    }
}
