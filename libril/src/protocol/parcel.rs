// libril/src/protocol/parcel.rs

use crate::constants::NULL_LENGTH;
use crate::{Error, Result};

/// Round a byte count up to the 4-byte parcel alignment.
fn padded(len: usize) -> usize {
    (len + 3) & !3
}

/// Cursor over a parcel body. Every read is bounds-checked against the
/// remaining bytes; length fields are validated before anything is
/// allocated.
#[derive(Debug, Clone)]
pub struct ParcelReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ParcelReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor offset, usable with `rewind_to`.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor back to a previously saved position.
    pub fn rewind_to(&mut self, pos: usize) {
        debug_assert!(pos <= self.data.len());
        self.pos = pos.min(self.data.len());
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// The full body this cursor reads from.
    pub fn body(&self) -> &'a [u8] {
        self.data
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::InvalidLength {
                expected: self.pos + len,
                actual: self.data.len(),
            });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a length field, mapping the null sentinel to `None`.
    fn read_len(&mut self, what: &str) -> Result<Option<usize>> {
        let len = self.read_i32()?;
        if len == NULL_LENGTH {
            return Ok(None);
        }
        if len < 0 {
            return Err(Error::FrameFormat(format!("negative {} length {}", what, len)));
        }
        Ok(Some(len as usize))
    }

    /// UTF-16 string: unit count, units, NUL terminator, padding.
    pub fn read_string(&mut self) -> Result<Option<String>> {
        let Some(units) = self.read_len("string")? else {
            return Ok(None);
        };
        // units + terminator, two bytes each
        let raw_len = units
            .checked_add(1)
            .and_then(|n| n.checked_mul(2))
            .ok_or_else(|| Error::FrameFormat("string length overflow".into()))?;
        if padded(raw_len) > self.remaining() {
            return Err(Error::InvalidLength {
                expected: self.pos + padded(raw_len),
                actual: self.data.len(),
            });
        }
        let bytes = self.take(padded(raw_len))?;
        let code_units: Vec<u16> = bytes[..units * 2]
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16(&code_units)
            .map(Some)
            .map_err(|e| Error::FrameFormat(format!("invalid utf-16 string: {}", e)))
    }

    pub fn read_byte_array(&mut self) -> Result<Option<Vec<u8>>> {
        let Some(len) = self.read_len("byte array")? else {
            return Ok(None);
        };
        if padded(len) > self.remaining() {
            return Err(Error::InvalidLength {
                expected: self.pos + padded(len),
                actual: self.data.len(),
            });
        }
        let bytes = self.take(padded(len))?;
        Ok(Some(bytes[..len].to_vec()))
    }

    /// String array; a null array reads as empty.
    pub fn read_string_array(&mut self) -> Result<Vec<Option<String>>> {
        let Some(count) = self.read_len("string array")? else {
            return Ok(Vec::new());
        };
        // every element takes at least its 4-byte length field
        if count > self.remaining() / 4 {
            return Err(Error::InvalidLength {
                expected: self.pos + count * 4,
                actual: self.data.len(),
            });
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.read_string()?);
        }
        Ok(out)
    }

    /// Int array; a null array reads as empty.
    pub fn read_int_array(&mut self) -> Result<Vec<i32>> {
        let Some(count) = self.read_len("int array")? else {
            return Ok(Vec::new());
        };
        if count > self.remaining() / 4 {
            return Err(Error::InvalidLength {
                expected: self.pos + count * 4,
                actual: self.data.len(),
            });
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.read_i32()?);
        }
        Ok(out)
    }

    /// Everything not yet consumed.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }
}

/// Builder for parcel bodies, the write side of `ParcelReader`.
#[derive(Debug, Default, Clone)]
pub struct ParcelWriter {
    buf: Vec<u8>,
}

impl ParcelWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn pad(&mut self) {
        let target = padded(self.buf.len());
        self.buf.resize(target, 0);
    }

    pub fn write_string(&mut self, value: &str) -> &mut Self {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_i32(units.len() as i32);
        for u in units {
            self.buf.extend_from_slice(&u.to_le_bytes());
        }
        self.buf.extend_from_slice(&[0, 0]);
        self.pad();
        self
    }

    pub fn write_opt_string(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            Some(s) => self.write_string(s),
            None => self.write_i32(NULL_LENGTH),
        }
    }

    pub fn write_string_array<S: AsRef<str>>(&mut self, values: &[S]) -> &mut Self {
        self.write_i32(values.len() as i32);
        for v in values {
            self.write_string(v.as_ref());
        }
        self
    }

    pub fn write_opt_string_array(&mut self, values: &[Option<String>]) -> &mut Self {
        self.write_i32(values.len() as i32);
        for v in values {
            self.write_opt_string(v.as_deref());
        }
        self
    }

    pub fn write_byte_array(&mut self, value: &[u8]) -> &mut Self {
        self.write_i32(value.len() as i32);
        self.buf.extend_from_slice(value);
        self.pad();
        self
    }

    pub fn write_int_array(&mut self, values: &[i32]) -> &mut Self {
        self.write_i32(values.len() as i32);
        for v in values {
            self.write_i32(*v);
        }
        self
    }

    /// Append bytes that are already parcel-encoded.
    pub fn write_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
