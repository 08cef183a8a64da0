//! File-backed streams

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use dicomite_core::{DicomError, DicomResult};

use crate::stream::{StreamInput, StreamOutput};

/// Input stream over an existing file
#[derive(Debug)]
pub struct FileStreamInput {
    reader: BufReader<File>,
}

impl FileStreamInput {
    /// Opens the file for reading, failing immediately with `FileOpen`
    /// when the path does not exist or cannot be read.
    pub fn open<P: AsRef<Path>>(path: P) -> DicomResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DicomError::FileOpen(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            reader: BufReader::new(file),
        })
    }
}

impl StreamInput for FileStreamInput {
    fn read(&mut self, buf: &mut [u8]) -> DicomResult<usize> {
        Ok(self.reader.read(buf)?)
    }
}

/// Output stream creating or truncating a file
#[derive(Debug)]
pub struct FileStreamOutput {
    writer: BufWriter<File>,
}

impl FileStreamOutput {
    /// Creates (or truncates) the file, failing immediately with `FileOpen`
    /// when the path cannot be written.
    pub fn create<P: AsRef<Path>>(path: P) -> DicomResult<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| DicomError::FileOpen(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl StreamOutput for FileStreamOutput {
    fn write(&mut self, buf: &[u8]) -> DicomResult<()> {
        self.writer.write_all(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> DicomResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
