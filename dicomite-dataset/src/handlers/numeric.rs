use crate::dataset::DataSet;
use crate::handlers::reading::{Native, ReadingDataHandler};
use crate::memory::MutableMemory;
use bytes::Bytes;
use dicomite_core::{DicomError, DicomResult, TagId, Vr};
use std::ops::Deref;

/// Specialized reading handler for binary numeric VRs
///
/// Adds raw memory access on top of the typed getters, and the
/// element-wise `copy_to` conversion into a differently typed
/// destination buffer.
#[derive(Debug, Clone)]
pub struct ReadingDataHandlerNumeric {
    inner: ReadingDataHandler,
}

impl ReadingDataHandlerNumeric {
    pub fn new(vr: Vr, memory: Bytes) -> DicomResult<Self> {
        if !vr.is_numeric() {
            return Err(DicomError::conversion(vr, "numeric data handler", 0));
        }
        Ok(Self {
            inner: ReadingDataHandler::new(vr, memory),
        })
    }

    /// Snapshot of the raw buffer
    pub fn memory(&self) -> Bytes {
        self.inner.memory().clone()
    }

    /// Number of bytes occupied by one element
    pub fn unit_size(&self) -> u32 {
        self.vr().word_size()
    }

    /// Whether the buffer stores signed numbers
    pub fn is_signed(&self) -> bool {
        self.vr().is_signed()
    }

    /// Whether the buffer stores floating point numbers
    pub fn is_float(&self) -> bool {
        self.vr().is_float()
    }

    /// Copy the content into another numeric handler, converting each
    /// element to the destination data type
    ///
    /// The destination size stays unchanged: when the destination is too
    /// small only the first `destination.size()` elements are copied.
    /// Value conversion is lossy in the C cast sense, distinct from the
    /// typed getters which report conversion failures.
    pub fn copy_to(&self, destination: &mut WritingDataHandlerNumeric<'_>) -> DicomResult<()> {
        let count = self.size().min(destination.size());
        for index in 0..count {
            let native = self.inner.native(index)?;
            destination.store_lossy(index, native)?;
        }
        Ok(())
    }
}

impl Deref for ReadingDataHandlerNumeric {
    type Target = ReadingDataHandler;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Specialized writing handler for binary numeric VRs
///
/// Stages the raw buffer directly and exposes it for bulk writes
/// (pixel data); commits like the generic writing handler.
#[derive(Debug)]
pub struct WritingDataHandlerNumeric<'a> {
    dataset: &'a mut DataSet,
    tag: TagId,
    vr: Vr,
    memory: MutableMemory,
}

impl<'a> WritingDataHandlerNumeric<'a> {
    pub(crate) fn new(dataset: &'a mut DataSet, tag: TagId, vr: Vr) -> DicomResult<Self> {
        if !vr.is_numeric() {
            return Err(DicomError::conversion(vr, "numeric data handler", 0));
        }
        Ok(Self {
            dataset,
            tag,
            vr,
            memory: MutableMemory::new(),
        })
    }

    pub fn vr(&self) -> Vr {
        self.vr
    }

    pub fn unit_size(&self) -> u32 {
        self.vr.word_size()
    }

    /// Current number of staged elements
    pub fn size(&self) -> usize {
        self.memory.size() / self.vr.word_size() as usize
    }

    /// Change the number of staged elements; growth is zero-filled
    pub fn resize(&mut self, count: usize) {
        self.memory.resize(count * self.vr.word_size() as usize);
    }

    /// Raw access to the staged buffer
    pub fn memory_mut(&mut self) -> &mut MutableMemory {
        &mut self.memory
    }

    /// Store an element converting with a plain numeric cast
    pub(crate) fn store_lossy(&mut self, index: usize, value: Native) -> DicomResult<()> {
        let word = self.vr.word_size() as usize;
        let offset = index * word;
        if offset + word > self.memory.size() {
            return Err(DicomError::index_out_of_bounds(index, self.size()));
        }
        let bytes: Vec<u8> = match self.vr {
            Vr::Fl | Vr::Of => (native_f64(&value) as f32).to_le_bytes().to_vec(),
            Vr::Fd | Vr::Od => native_f64(&value).to_le_bytes().to_vec(),
            Vr::Ss => (native_i64(&value) as i16).to_le_bytes().to_vec(),
            Vr::Sl => (native_i64(&value) as i32).to_le_bytes().to_vec(),
            Vr::Sv => native_i64(&value).to_le_bytes().to_vec(),
            Vr::Ob | Vr::Un => vec![native_i64(&value) as u8],
            Vr::Us | Vr::Ow => (native_i64(&value) as u16).to_le_bytes().to_vec(),
            Vr::Ul | Vr::Ol | Vr::At => (native_i64(&value) as u32).to_le_bytes().to_vec(),
            Vr::Uv | Vr::Ov => (native_u64(&value)).to_le_bytes().to_vec(),
            _ => unreachable!("constructor rejects non-numeric VRs"),
        };
        self.memory.assign_region(&bytes, offset)
    }

    pub fn set_i64(&mut self, index: usize, value: i64) -> DicomResult<()> {
        self.store_lossy(index, Native::Int(value))
    }

    pub fn set_u64(&mut self, index: usize, value: u64) -> DicomResult<()> {
        self.store_lossy(index, Native::Uint(value))
    }

    pub fn set_f64(&mut self, index: usize, value: f64) -> DicomResult<()> {
        self.store_lossy(index, Native::Float(value))
    }

    /// Validate the staged buffer and swap it into the tag
    pub fn commit(self) -> DicomResult<()> {
        let count = self.size() as u32;
        self.dataset
            .commit_buffer(self.tag, self.vr, self.memory.freeze(), count)
    }
}

fn native_i64(value: &Native) -> i64 {
    match value {
        Native::Int(i) => *i,
        Native::Uint(u) => *u as i64,
        Native::Float(f) => *f as i64,
        Native::Text(s) => s.trim().parse().unwrap_or(0),
    }
}

fn native_u64(value: &Native) -> u64 {
    match value {
        Native::Int(i) => *i as u64,
        Native::Uint(u) => *u,
        Native::Float(f) => *f as u64,
        Native::Text(s) => s.trim().parse().unwrap_or(0),
    }
}

fn native_f64(value: &Native) -> f64 {
    match value {
        Native::Int(i) => *i as f64,
        Native::Uint(u) => *u as f64,
        Native::Float(f) => *f,
        Native::Text(s) => s.trim().parse().unwrap_or(0.0),
    }
}
