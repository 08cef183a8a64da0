//! Stream capability traits
//!
//! Every stream variant (File, Memory, TCP) implements the same two
//! capability interfaces instead of a class hierarchy; the variants
//! differ only in their constructors.

use dicomite_core::{DicomError, DicomResult};

/// Readable byte stream
pub trait StreamInput: Send {
    /// Read up to `buf.len()` bytes
    ///
    /// Blocks until at least one byte is available; returns 0 only at
    /// end of stream.
    fn read(&mut self, buf: &mut [u8]) -> DicomResult<usize>;

    /// Read exactly `buf.len()` bytes
    ///
    /// # Errors
    ///
    /// Fails when the stream ends before the buffer is filled.
    fn read_exact(&mut self, mut buf: &mut [u8]) -> DicomResult<()> {
        while !buf.is_empty() {
            let n = self.read(buf)?;
            if n == 0 {
                return Err(DicomError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "failed to read exact number of bytes",
                )));
            }
            buf = &mut buf[n..];
        }
        Ok(())
    }
}

/// Writable byte stream
pub trait StreamOutput: Send {
    /// Write the whole buffer
    ///
    /// Blocks until every byte is consumed; a partial write is reported
    /// as an error, never as silent success.
    fn write(&mut self, buf: &[u8]) -> DicomResult<()>;

    /// Flush any buffered data
    fn flush(&mut self) -> DicomResult<()>;
}
