//! In-memory stream variants

use crate::stream::{StreamInput, StreamOutput};
use bytes::{BufMut, Bytes, BytesMut};
use dicomite_core::DicomResult;

/// Input stream reading from an immutable byte buffer
#[derive(Debug, Clone)]
pub struct MemoryStreamInput {
    data: Bytes,
    position: usize,
}

impl MemoryStreamInput {
    pub fn new(data: Bytes) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}

impl StreamInput for MemoryStreamInput {
    fn read(&mut self, buf: &mut [u8]) -> DicomResult<usize> {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }
}

/// Output stream accumulating into a byte buffer
#[derive(Debug, Default)]
pub struct MemoryStreamOutput {
    data: BytesMut,
}

impl MemoryStreamOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Take the accumulated bytes
    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }
}

impl StreamOutput for MemoryStreamOutput {
    fn write(&mut self, buf: &[u8]) -> DicomResult<()> {
        self.data.put_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> DicomResult<()> {
        Ok(())
    }
}
