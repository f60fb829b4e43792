//! Text output: per-record field dumps and the part list.

use std::io::{self, Write};

use stdf_parser::{DecodedRecord, ParseError, Record, RecordHeader, RecordSink};

use crate::collector::CoordinateCollector;

/// Writes one line per record header and the decoded fields of each record.
///
/// Write errors are sticky: after the first failure nothing more is written
/// and the error is returned from [`FieldDump::finish`].
pub struct FieldDump<W: Write> {
    out: W,
    show_headers: bool,
    dump_records: bool,
    err: Option<io::Error>,
}

impl<W: Write> FieldDump<W> {
    pub fn new(out: W, show_headers: bool, dump_records: bool) -> Self {
        Self {
            out,
            show_headers,
            dump_records,
            err: None,
        }
    }

    /// Print the column title for the header listing.
    pub fn begin(&mut self) {
        if self.show_headers {
            self.write(|out| writeln!(out, "\nREC_LEN, REC_TYP, REC_SUB"));
        }
    }

    pub fn finish(self) -> io::Result<W> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn write(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.err.is_some() {
            return;
        }
        if let Err(e) = f(&mut self.out) {
            self.err = Some(e);
        }
    }

    fn header_line(&mut self, header: &RecordHeader) {
        if self.show_headers {
            self.write(|out| {
                writeln!(
                    out,
                    "{:7}, {:7}, {:7}",
                    header.length, header.major, header.minor
                )
            });
        }
    }
}

impl<W: Write> RecordSink for FieldDump<W> {
    fn record(&mut self, rec: &DecodedRecord) {
        self.header_line(&rec.header);
        if !self.dump_records || matches!(rec.record, Record::Unparsed(_)) {
            return;
        }
        self.write(|out| write_fields(out, &rec.record));
    }

    fn skipped(&mut self, header: &RecordHeader, _offset: u64) {
        self.header_line(header);
    }

    fn malformed(&mut self, header: &RecordHeader, _offset: u64, _err: &ParseError) {
        self.header_line(header);
    }
}

/// Write a record's kind heading followed by `NAME: value` lines.
pub fn write_fields(out: &mut impl Write, record: &Record) -> io::Result<()> {
    writeln!(out, "{}", record.kind())?;
    for field in record.fields() {
        let label = format!("{}:", field.name);
        writeln!(out, "{:20}{}", label, field.value)?;
    }
    Ok(())
}

/// Write one line per aggregated part, in first-insertion order.
pub fn write_parts(out: &mut impl Write, collector: &CoordinateCollector) -> io::Result<()> {
    writeln!(out, "\nShowing Part Results Record\n")?;
    for part in collector.parts() {
        writeln!(out, "x={:6}   y={:6}   part ID={:>6}", part.x, part.y, part.id)?;
    }
    Ok(())
}
