use std::io::{Read, Seek, SeekFrom};

use crate::types::{ParseError, RecordHeader, HEADER_SIZE};

/// Tracks the absolute read position over a seekable byte source.
pub struct ByteCursor<R> {
    src: R,
    pos: u64,
}

impl<R: Read + Seek> ByteCursor<R> {
    pub fn new(src: R) -> Self {
        Self { src, pos: 0 }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Read exactly `n` bytes.
    /// Returns `ParseError::TruncatedStream` if fewer than `n` bytes remain.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, ParseError> {
        let mut buf = vec![0u8; n];
        match self.src.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ParseError::TruncatedStream);
            }
            Err(e) => return Err(ParseError::Io(e)),
        }
        self.pos += n as u64;
        Ok(buf)
    }

    /// Reposition the cursor. Negative positions clamp to 0.
    pub fn seek(&mut self, pos: i64) -> Result<u64, ParseError> {
        let target = pos.max(0) as u64;
        self.src.seek(SeekFrom::Start(target))?;
        self.pos = target;
        Ok(target)
    }

    /// Read a record header.
    pub fn read_header(&mut self) -> Result<RecordHeader, ParseError> {
        let buf = self.read_exact(HEADER_SIZE)?;
        Ok(RecordHeader {
            length: u16::from_le_bytes([buf[0], buf[1]]),
            major: buf[2],
            minor: buf[3],
        })
    }

    /// Read a record body of exactly `header.length` bytes.
    pub fn read_body(&mut self, header: &RecordHeader) -> Result<Vec<u8>, ParseError> {
        self.read_exact(header.length as usize)
    }

    pub fn into_inner(self) -> R {
        self.src
    }
}
