//! Decoder for STDF (Standard Test Data Format) record streams.
//!
//! An STDF file is a sequence of self-describing records, each a 4-byte
//! header followed by a variable-length body:
//!
//! | Offset | Size | Field                  |
//! |--------|------|------------------------|
//! | 0      | 2    | Body length (LE)       |
//! | 2      | 1    | Major record type      |
//! | 3      | 1    | Minor record type      |
//! | 4      | N    | Record body            |
//!
//! A header with length 0 ends the stream. Record types that are not in the
//! [`Registry`] are skipped without decoding.
//!
//! # Usage
//!
//! ```no_run
//! use stdf_parser::{DecodedRecord, RecordSink, StreamProcessor};
//!
//! struct Print;
//!
//! impl RecordSink for Print {
//!     fn record(&mut self, rec: &DecodedRecord) {
//!         println!("{:?}", rec.record);
//!     }
//! }
//!
//! let file = std::fs::File::open("lot.stdf").unwrap();
//! let mut processor = StreamProcessor::new(std::io::BufReader::new(file));
//! let summary = processor.process(&mut Print).unwrap();
//! println!("{} records decoded", summary.decoded);
//! ```

mod cursor;
pub mod lookup;
mod parser;
mod processor;
pub mod reader;
mod registry;
pub mod types;

pub use cursor::ByteCursor;
pub use parser::{decode_atr, decode_far, decode_mir, decode_prr, decode_sdr};
pub use processor::{ProcessSummary, RecordSink, StreamProcessor};
pub use registry::{DecodeFn, Dispatch, Handler, Registry};
pub use types::{
    DecodedRecord, Epoch, Field, FieldValue, ParseError, Prr, Record, RecordHeader, RecordKind,
};
