use bytes::{BufMut, Bytes, BytesMut};
use dicomite_core::{DicomError, DicomResult};

/// Growable byte region backing writing data handlers
///
/// Mirrors standard buffer semantics: `resize` changes the logical size
/// (zero-filling growth), `reserve` preallocates without changing it, and
/// `assign_region` never grows the region.
#[derive(Debug, Default, Clone)]
pub struct MutableMemory {
    data: BytesMut,
}

impl MutableMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(size: usize) -> Self {
        let mut memory = Self::new();
        memory.resize(size);
        memory
    }

    /// Current logical size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Change the logical size; growth is zero-filled
    pub fn resize(&mut self, new_size: usize) {
        self.data.resize(new_size, 0);
    }

    /// Preallocate capacity without changing the logical size
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Replace the whole content
    pub fn assign(&mut self, bytes: &[u8]) {
        self.data.clear();
        self.data.put_slice(bytes);
    }

    /// Overwrite a region of the current content
    ///
    /// Fails when the region would extend past the current size: a write
    /// never grows the memory implicitly.
    pub fn assign_region(&mut self, bytes: &[u8], offset: usize) -> DicomResult<()> {
        let end = offset
            .checked_add(bytes.len())
            .ok_or_else(|| DicomError::Range("region end overflows".to_string()))?;
        if end > self.data.len() {
            return Err(DicomError::Range(format!(
                "region [{}, {}) exceeds the memory size {}",
                offset,
                end,
                self.data.len()
            )));
        }
        self.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Take an immutable snapshot of the content
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_zero_fills() {
        let mut memory = MutableMemory::new();
        memory.assign(&[1, 2, 3]);
        memory.resize(5);
        assert_eq!(memory.data(), &[1, 2, 3, 0, 0]);
        memory.resize(2);
        assert_eq!(memory.data(), &[1, 2]);
    }

    #[test]
    fn test_reserve_keeps_size() {
        let mut memory = MutableMemory::with_size(4);
        memory.reserve(128);
        assert_eq!(memory.size(), 4);
    }

    #[test]
    fn test_assign_region_bounds() {
        let mut memory = MutableMemory::with_size(4);
        memory.assign_region(&[0xAA, 0xBB], 1).unwrap();
        assert_eq!(memory.data(), &[0, 0xAA, 0xBB, 0]);
        assert!(matches!(
            memory.assign_region(&[1, 2, 3], 2),
            Err(DicomError::Range(_))
        ));
    }
}
