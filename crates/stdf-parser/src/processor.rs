use std::io::{Read, Seek};

use crate::cursor::ByteCursor;
use crate::registry::Registry;
use crate::types::{DecodedRecord, ParseError, Record, RecordHeader, RecordKind};

/// Receives records as the stream processor decodes them, in stream order.
pub trait RecordSink {
    /// Called for every record with a registered handler.
    fn record(&mut self, record: &DecodedRecord);

    /// Called for records whose type pair is not registered.
    fn skipped(&mut self, _header: &RecordHeader, _offset: u64) {}

    /// Called for records that failed to decode.
    fn malformed(&mut self, _header: &RecordHeader, _offset: u64, _err: &ParseError) {}
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn record(&mut self, record: &DecodedRecord) {
        (**self).record(record)
    }

    fn skipped(&mut self, header: &RecordHeader, offset: u64) {
        (**self).skipped(header, offset)
    }

    fn malformed(&mut self, header: &RecordHeader, offset: u64, err: &ParseError) {
        (**self).malformed(header, offset, err)
    }
}

macro_rules! impl_tuple_sink {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: RecordSink),+> RecordSink for ($($name,)+) {
            fn record(&mut self, record: &DecodedRecord) {
                $(self.$idx.record(record);)+
            }

            fn skipped(&mut self, header: &RecordHeader, offset: u64) {
                $(self.$idx.skipped(header, offset);)+
            }

            fn malformed(&mut self, header: &RecordHeader, offset: u64, err: &ParseError) {
                $(self.$idx.malformed(header, offset, err);)+
            }
        }
    };
}

impl_tuple_sink!(A 0, B 1);
impl_tuple_sink!(A 0, B 1, C 2);

/// Counters describing one completed pass over a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Records decoded into fields.
    pub decoded: usize,
    /// Records of a recognized kind that are intentionally not decoded.
    pub unparsed: usize,
    /// Records whose type pair is not registered.
    pub skipped: usize,
    /// Records that failed to decode and were skipped.
    pub malformed: usize,
    /// Whether the stream ended without a terminating zero-length header.
    pub truncated: bool,
    pub bytes_read: u64,
}

/// The outcome of a single read-decode-dispatch step.
#[derive(Debug)]
enum Step {
    Record(DecodedRecord),
    Skip(RecordHeader, u64),
    Malformed(RecordHeader, u64, Option<RecordKind>, ParseError),
    Done { truncated: bool },
}

/// Drives the record loop over a seekable byte source.
pub struct StreamProcessor<R> {
    cursor: ByteCursor<R>,
    registry: Registry,
}

impl<R: Read + Seek> StreamProcessor<R> {
    pub fn new(src: R) -> Self {
        Self::with_registry(src, Registry::standard())
    }

    pub fn with_registry(src: R, registry: Registry) -> Self {
        Self {
            cursor: ByteCursor::new(src),
            registry,
        }
    }

    /// Read records until the end-of-stream header or the end of input,
    /// handing each one to `sink`.
    ///
    /// Malformed records are logged and skipped. Only I/O failures other
    /// than a short read are returned as errors.
    pub fn process(&mut self, sink: &mut impl RecordSink) -> Result<ProcessSummary, ParseError> {
        let mut summary = ProcessSummary::default();
        loop {
            match self.step()? {
                Step::Record(rec) => {
                    if matches!(rec.record, Record::Unparsed(_)) {
                        summary.unparsed += 1;
                    } else {
                        summary.decoded += 1;
                    }
                    sink.record(&rec);
                }
                Step::Skip(header, offset) => {
                    log::debug!(
                        "skipping unregistered record type ({}, {}) at offset {}",
                        header.major,
                        header.minor,
                        offset
                    );
                    summary.skipped += 1;
                    sink.skipped(&header, offset);
                }
                Step::Malformed(header, offset, kind, err) => {
                    log::warn!(
                        "skipping malformed {} record ({}, {}) at offset {}: {}",
                        kind.map_or("unknown", RecordKind::name),
                        header.major,
                        header.minor,
                        offset,
                        err
                    );
                    summary.malformed += 1;
                    sink.malformed(&header, offset, &err);
                }
                Step::Done { truncated } => {
                    summary.truncated = truncated;
                    break;
                }
            }
        }
        summary.bytes_read = self.cursor.position();
        Ok(summary)
    }

    fn step(&mut self) -> Result<Step, ParseError> {
        let offset = self.cursor.position();
        let header = match self.cursor.read_header() {
            Ok(h) => h,
            Err(ParseError::TruncatedStream) => {
                log::debug!("stream truncated while reading header at offset {}", offset);
                return Ok(Step::Done { truncated: true });
            }
            Err(e) => return Err(e),
        };
        log::debug!(
            "record header at {}: length={} type=({}, {})",
            offset,
            header.length,
            header.major,
            header.minor
        );
        if header.is_end_of_stream() {
            return Ok(Step::Done { truncated: false });
        }

        let body = match self.cursor.read_body(&header) {
            Ok(b) => b,
            Err(ParseError::TruncatedStream) => {
                log::debug!("stream truncated while reading body at offset {}", offset);
                return Ok(Step::Done { truncated: true });
            }
            Err(e) => return Err(e),
        };

        match self.registry.dispatch(header.major, header.minor, &body) {
            Ok(Some(record)) => Ok(Step::Record(DecodedRecord {
                header,
                offset,
                record,
            })),
            Ok(None) => Ok(Step::Skip(header, offset)),
            Err(err @ ParseError::Io(_)) => Err(err),
            Err(err) => {
                let kind = self.registry.kind(header.major, header.minor);
                Ok(Step::Malformed(header, offset, kind, err))
            }
        }
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }
}
