// libril/src/protocol/frame.rs

use std::io::{ErrorKind, Read, Write};

use crate::constants::{FRAME_HEADER_LEN, MAX_FRAME_LEN};
use crate::{Error, Result};

/// Record framing on the socket.
/// Format: [Len(4, big-endian)] [Body(len)]
/// `len` never exceeds the configured maximum (8 KiB by default).
pub struct Frame {
    pub body: Vec<u8>,
}

impl Frame {
    /// Prefix a body with its length.
    pub fn encode(body: &[u8]) -> Result<Vec<u8>> {
        Self::encode_with_limit(body, MAX_FRAME_LEN)
    }

    pub fn encode_with_limit(body: &[u8], max_len: usize) -> Result<Vec<u8>> {
        if body.len() > max_len {
            return Err(Error::InvalidLength {
                expected: max_len,
                actual: body.len(),
            });
        }
        let mut out = Vec::with_capacity(FRAME_HEADER_LEN + body.len());
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(body);
        Ok(out)
    }

    /// Decode one complete record and return its body.
    pub fn decode(record: &[u8]) -> Result<Vec<u8>> {
        if record.len() < FRAME_HEADER_LEN {
            return Err(Error::InvalidLength {
                expected: FRAME_HEADER_LEN,
                actual: record.len(),
            });
        }
        let len = u32::from_be_bytes([record[0], record[1], record[2], record[3]]) as usize;
        if len > MAX_FRAME_LEN {
            return Err(Error::FrameFormat(format!(
                "frame length {} exceeds limit {}",
                len, MAX_FRAME_LEN
            )));
        }
        let required_len = FRAME_HEADER_LEN + len;
        if record.len() != required_len {
            return Err(Error::InvalidLength {
                expected: required_len,
                actual: record.len(),
            });
        }
        Ok(record[FRAME_HEADER_LEN..].to_vec())
    }

    /// Read one record from a byte stream. A clean end of stream before
    /// the header maps to `Disconnected`; the length is checked against
    /// `max_len` before the body buffer is allocated.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R, max_len: usize) -> Result<Vec<u8>> {
        let mut header = [0u8; FRAME_HEADER_LEN];
        let mut filled = 0;
        while filled < FRAME_HEADER_LEN {
            match reader.read(&mut header[filled..]) {
                Ok(0) if filled == 0 => return Err(Error::Disconnected),
                Ok(0) => {
                    return Err(Error::FrameFormat("stream ended inside frame header".into()));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let len = u32::from_be_bytes(header) as usize;
        if len > max_len {
            return Err(Error::FrameFormat(format!(
                "frame length {} exceeds limit {}",
                len, max_len
            )));
        }

        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => Error::FrameFormat("stream ended inside frame body".into()),
            _ => Error::from(e),
        })?;
        Ok(body)
    }

    /// Write one record and flush.
    pub fn write_to<W: Write + ?Sized>(writer: &mut W, body: &[u8]) -> Result<()> {
        let record = Self::encode(body)?;
        writer.write_all(&record)?;
        writer.flush()?;
        Ok(())
    }
}
