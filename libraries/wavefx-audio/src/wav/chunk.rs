//! RIFF chunk framing
//!
//! A RIFF stream is a sequence of chunks: a 4-byte ASCII identifier, a 4-byte
//! little-endian payload size, the payload, and one pad byte when the size is odd.

use crate::error::{AudioError, Result};
use std::fmt;
use std::io::{self, Read};

/// Four-character chunk identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    /// RIFF container header
    pub const RIFF: Self = Self(*b"RIFF");
    /// RIFF form type of WAVE files
    pub const WAVE: Self = Self(*b"WAVE");
    /// Format sub-chunk
    pub const FMT: Self = Self(*b"fmt ");
    /// Sample data sub-chunk
    pub const DATA: Self = Self(*b"data");

    /// Identifier as a big-endian integer ('RIFF' = 0x52494646)
    pub fn as_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{}", std::ascii::escape_default(byte))?;
        }
        Ok(())
    }
}

/// Byte-counting reader for RIFF fields
pub(crate) struct ChunkReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ChunkReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Bytes consumed so far
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    /// Read the next chunk identifier
    ///
    /// Returns `None` when fewer than four bytes remain: running out of input
    /// here is the normal end of the stream.
    pub(crate) fn next_id(&mut self) -> Result<Option<ChunkId>> {
        let mut id = [0u8; 4];
        let mut filled = 0;
        while filled < id.len() {
            match self.inner.read(&mut id[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(AudioError::Io(e)),
            }
        }
        self.offset += filled as u64;

        if filled < id.len() {
            if filled > 0 {
                tracing::debug!("Ignoring {} trailing bytes at end of stream", filled);
            }
            return Ok(None);
        }
        Ok(Some(ChunkId(id)))
    }

    /// Read exactly `N` bytes; `what` names the field for truncation errors
    pub(crate) fn read_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        self.inner.read_exact(&mut bytes).map_err(|e| truncated(e, what))?;
        self.offset += N as u64;
        Ok(bytes)
    }

    pub(crate) fn read_u16(&mut self, what: &str) -> Result<u16> {
        self.read_array(what).map(u16::from_le_bytes)
    }

    pub(crate) fn read_u32(&mut self, what: &str) -> Result<u32> {
        self.read_array(what).map(u32::from_le_bytes)
    }

    pub(crate) fn read_id(&mut self, what: &str) -> Result<ChunkId> {
        self.read_array(what).map(ChunkId)
    }

    /// Read a whole payload of `len` bytes
    pub(crate) fn read_payload(&mut self, len: u32, what: &str) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        let read = (&mut self.inner)
            .take(u64::from(len))
            .read_to_end(&mut payload)?;
        self.offset += read as u64;

        if read < len as usize {
            return Err(AudioError::format(format!(
                "truncated {}: expected {} bytes, found {}",
                what, len, read
            )));
        }
        Ok(payload)
    }

    /// Discard `len` bytes
    pub(crate) fn skip(&mut self, len: u64, what: &str) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())?;
        self.offset += skipped;

        if skipped < len {
            return Err(AudioError::format(format!(
                "truncated {}: expected {} bytes, found {}",
                what, len, skipped
            )));
        }
        Ok(())
    }

    /// Consume the pad byte that follows an odd-sized payload
    ///
    /// A missing pad byte at the very end of the stream is tolerated.
    pub(crate) fn skip_padding(&mut self, payload_len: u32) -> Result<()> {
        if payload_len % 2 == 0 {
            return Ok(());
        }
        let skipped = io::copy(&mut (&mut self.inner).take(1), &mut io::sink())?;
        self.offset += skipped;
        Ok(())
    }
}

fn truncated(err: io::Error, what: &str) -> AudioError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        AudioError::format(format!("truncated {}", what))
    } else {
        AudioError::Io(err)
    }
}
