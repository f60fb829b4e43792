use crate::types::{Epoch, ParseError, TextFields};

// === Field extractors ===

fn ensure(bytes: &[u8], needed: usize) -> Result<(), ParseError> {
    if bytes.len() < needed {
        Err(ParseError::MalformedRecord {
            needed,
            available: bytes.len(),
        })
    } else {
        Ok(())
    }
}

/// Read a little-endian unsigned integer of 1, 2 or 4 bytes.
pub fn read_uint(bytes: &[u8], width: usize) -> Result<u32, ParseError> {
    if !matches!(width, 1 | 2 | 4) {
        return Err(ParseError::UnsupportedWidth(width));
    }
    ensure(bytes, width)?;
    Ok(match width {
        1 => bytes[0] as u32,
        2 => u16::from_le_bytes([bytes[0], bytes[1]]) as u32,
        _ => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
    })
}

/// Read a little-endian two's-complement integer of 1, 2 or 4 bytes.
pub fn read_int(bytes: &[u8], width: usize) -> Result<i32, ParseError> {
    let u = read_uint(bytes, width)?;
    Ok(match width {
        1 => u as u8 as i8 as i32,
        2 => u as u16 as i16 as i32,
        _ => u as i32,
    })
}

/// Map a single byte to its character value.
pub fn read_char(byte: u8) -> char {
    byte as char
}

/// Read a Pascal string: one length byte followed by that many payload bytes.
///
/// Returns the trimmed text and the remainder of the slice.
pub fn read_pstring(bytes: &[u8]) -> Result<(String, &[u8]), ParseError> {
    ensure(bytes, 1)?;
    let len = bytes[0] as usize;
    let rest = &bytes[1..];
    if len > rest.len() {
        return Err(ParseError::MalformedString {
            len,
            available: rest.len(),
        });
    }
    let text = String::from_utf8_lossy(&rest[..len]).trim().to_string();
    Ok((text, &rest[len..]))
}

/// Read a 4-byte Unix timestamp.
pub fn read_epoch(bytes: &[u8]) -> Result<Epoch, ParseError> {
    Ok(Epoch(read_uint(bytes, 4)?))
}

// === Body reader ===

/// A cursor over one record body that consumes fields left to right.
pub(crate) struct BodyReader<'a> {
    data: &'a [u8],
}

impl<'a> BodyReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn advance(&mut self, n: usize) {
        self.data = &self.data[n..];
    }

    pub fn byte(&mut self) -> Result<u8, ParseError> {
        let v = read_uint(self.data, 1)? as u8;
        self.advance(1);
        Ok(v)
    }

    pub fn uint16(&mut self) -> Result<u16, ParseError> {
        let v = read_uint(self.data, 2)? as u16;
        self.advance(2);
        Ok(v)
    }

    pub fn int16(&mut self) -> Result<i16, ParseError> {
        let v = read_int(self.data, 2)? as i16;
        self.advance(2);
        Ok(v)
    }

    pub fn uint32(&mut self) -> Result<u32, ParseError> {
        let v = read_uint(self.data, 4)?;
        self.advance(4);
        Ok(v)
    }

    pub fn char_val(&mut self) -> Result<char, ParseError> {
        Ok(read_char(self.byte()?))
    }

    pub fn epoch(&mut self) -> Result<Epoch, ParseError> {
        let v = read_epoch(self.data)?;
        self.advance(4);
        Ok(v)
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], ParseError> {
        ensure(self.data, n)?;
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    pub fn string(&mut self) -> Result<String, ParseError> {
        let (text, rest) = read_pstring(self.data)?;
        self.data = rest;
        Ok(text)
    }

    /// Consume the rest of the body verbatim as text.
    pub fn rest_text(&mut self) -> String {
        let text = String::from_utf8_lossy(self.data).into_owned();
        self.data = &[];
        text
    }

    /// Read trailing Pascal strings, assigning them to `names` in order.
    ///
    /// Stops when the body is exhausted or every name has a value; names
    /// left over are simply absent.
    pub fn strings(&mut self, names: &[&'static str]) -> Result<TextFields, ParseError> {
        let mut fields = Vec::new();
        for name in names {
            if self.is_empty() {
                break;
            }
            fields.push((*name, self.string()?));
        }
        if !self.is_empty() {
            log::debug!("ignoring {} bytes after trailing strings", self.remaining());
        }
        Ok(TextFields(fields))
    }
}
