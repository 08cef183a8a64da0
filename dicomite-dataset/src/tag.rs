use crate::dataset::DataSet;
use bytes::Bytes;
use dicomite_core::{DicomError, DicomResult, Vr};

/// Content of a tag
///
/// Most tags hold one raw byte buffer; multi-frame pixel data holds one
/// buffer per fragment. Tags with VR `SQ` hold an ordered list of nested
/// data sets instead.
#[derive(Debug, Clone, Default)]
pub enum TagValue {
    /// No value yet
    #[default]
    Empty,
    /// Raw byte buffers; buffer 0 is the main value
    Buffers(Vec<Bytes>),
    /// Nested data sets (VR `SQ`)
    Sequence(Vec<DataSet>),
}

/// A single attribute owned by a data set
///
/// Buffers are immutable snapshots: a write replaces the buffer
/// reference wholesale, so data handlers holding the previous snapshot
/// keep observing the old content. Binary values are stored in little
/// endian order regardless of the transfer syntax they came from.
#[derive(Debug, Clone)]
pub struct Tag {
    vr: Vr,
    value: TagValue,
}

impl Tag {
    pub fn new(vr: Vr) -> Self {
        Self {
            vr,
            value: TagValue::Empty,
        }
    }

    pub fn with_buffer(vr: Vr, buffer: Bytes) -> Self {
        Self {
            vr,
            value: TagValue::Buffers(vec![buffer]),
        }
    }

    pub fn vr(&self) -> Vr {
        self.vr
    }

    pub fn value(&self) -> &TagValue {
        &self.value
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.value, TagValue::Sequence(_)) || self.vr == Vr::Sq
    }

    /// Number of buffers stored in this tag
    pub fn buffers_count(&self) -> usize {
        match &self.value {
            TagValue::Buffers(buffers) => buffers.len(),
            _ => 0,
        }
    }

    /// Snapshot of one of the tag's buffers
    pub fn buffer(&self, index: usize) -> DicomResult<Bytes> {
        match &self.value {
            TagValue::Buffers(buffers) => buffers
                .get(index)
                .cloned()
                .ok_or_else(|| DicomError::index_out_of_bounds(index, buffers.len())),
            TagValue::Empty if index == 0 => Ok(Bytes::new()),
            TagValue::Empty => Err(DicomError::index_out_of_bounds(index, 0)),
            TagValue::Sequence(_) => Err(DicomError::conversion(Vr::Sq, "buffer", index)),
        }
    }

    /// Replace a buffer, or append when `index` equals the buffer count
    ///
    /// Readers holding the previous snapshot are unaffected.
    pub fn set_buffer(&mut self, index: usize, buffer: Bytes) -> DicomResult<()> {
        if let TagValue::Sequence(_) = self.value {
            return Err(DicomError::conversion(Vr::Sq, "buffer", index));
        }
        if let TagValue::Empty = self.value {
            self.value = TagValue::Buffers(Vec::new());
        }
        let TagValue::Buffers(buffers) = &mut self.value else {
            unreachable!()
        };
        if index < buffers.len() {
            buffers[index] = buffer;
            Ok(())
        } else if index == buffers.len() {
            buffers.push(buffer);
            Ok(())
        } else {
            Err(DicomError::index_out_of_bounds(index, buffers.len()))
        }
    }

    /// Append a pixel-data fragment buffer
    pub fn push_buffer(&mut self, buffer: Bytes) -> DicomResult<()> {
        let count = self.buffers_count();
        self.set_buffer(count, buffer)
    }

    /// The nested data sets of a sequence tag
    pub fn sequence_items(&self) -> DicomResult<&[DataSet]> {
        match &self.value {
            TagValue::Sequence(items) => Ok(items),
            _ => Err(DicomError::conversion(self.vr, "sequence", 0)),
        }
    }

    pub(crate) fn sequence_items_mut(&mut self) -> DicomResult<&mut Vec<DataSet>> {
        if let TagValue::Empty = self.value {
            if self.vr == Vr::Sq {
                self.value = TagValue::Sequence(Vec::new());
            }
        }
        match &mut self.value {
            TagValue::Sequence(items) => Ok(items),
            _ => Err(DicomError::conversion(self.vr, "sequence", 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_replacement_keeps_snapshots() {
        let mut tag = Tag::with_buffer(Vr::Ob, Bytes::from_static(&[1, 2, 3]));
        let snapshot = tag.buffer(0).unwrap();
        tag.set_buffer(0, Bytes::from_static(&[9, 9])).unwrap();
        assert_eq!(&snapshot[..], &[1, 2, 3]);
        assert_eq!(&tag.buffer(0).unwrap()[..], &[9, 9]);
    }

    #[test]
    fn test_empty_tag_reads_as_empty_buffer() {
        let tag = Tag::new(Vr::Lo);
        assert!(tag.buffer(0).unwrap().is_empty());
        assert!(tag.buffer(1).is_err());
    }

    #[test]
    fn test_multi_frame_buffers() {
        let mut tag = Tag::new(Vr::Ob);
        tag.push_buffer(Bytes::from_static(&[1])).unwrap();
        tag.push_buffer(Bytes::from_static(&[2])).unwrap();
        assert_eq!(tag.buffers_count(), 2);
        assert_eq!(&tag.buffer(1).unwrap()[..], &[2]);
        // A gap cannot be created
        assert!(tag.set_buffer(5, Bytes::new()).is_err());
    }

    #[test]
    fn test_sequence_tag_rejects_buffers() {
        let mut tag = Tag::new(Vr::Sq);
        tag.sequence_items_mut().unwrap().push(DataSet::new());
        assert!(tag.buffer(0).is_err());
        assert!(tag.set_buffer(0, Bytes::new()).is_err());
        assert_eq!(tag.sequence_items().unwrap().len(), 1);
    }
}
