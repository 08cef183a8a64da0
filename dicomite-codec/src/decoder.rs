//! Data set decoder for the native transfer syntaxes

use bytes::{Bytes, BytesMut};
use log::debug;

use dicomite_core::{DicomError, DicomResult, Endianness, TagId, TransferSyntax, Vr};
use dicomite_dataset::DataSet;
use dicomite_transport::StreamInput;

use crate::wire::{swap_unit, swap_words, ITEM, ITEM_DELIMITER, SEQUENCE_DELIMITER, UNDEFINED_LENGTH};

/// Upper bound on a single read while decoding a value
const VALUE_CHUNK: usize = 64 * 1024;

/// Rebuilds a data set from a [`StreamInput`]
///
/// Both defined- and undefined-length sequences and items are accepted.
/// In implicit VR syntaxes the VR comes from the data set's dictionary,
/// with `UN` as the fallback for unknown tags. Binary values are
/// normalized to little endian order before being stored, so the decoded
/// data set reads the same regardless of the wire byte order.
pub struct DataSetDecoder<'a, R: StreamInput> {
    input: &'a mut R,
    syntax: TransferSyntax,
    position: u64,
}

impl<'a, R: StreamInput> DataSetDecoder<'a, R> {
    pub fn new(input: &'a mut R, syntax: TransferSyntax) -> Self {
        Self {
            input,
            syntax,
            position: 0,
        }
    }

    /// Read elements until the stream ends at a tag boundary
    ///
    /// # Errors
    ///
    /// Structural faults (truncated headers, misplaced delimiters,
    /// unknown VR codes) fail with [`DicomError::Codec`].
    pub fn decode(&mut self) -> DicomResult<DataSet> {
        let mut dataset = DataSet::with_transfer_syntax(self.syntax);
        while let Some(tag) = self.read_tag_or_eof()? {
            if tag.group() == 0xFFFE {
                return Err(DicomError::Codec(format!(
                    "delimiter {} outside a sequence",
                    tag
                )));
            }
            self.decode_element(tag, &mut dataset)?;
        }
        debug!("decoded {} top-level tag(s)", dataset.len());
        Ok(dataset)
    }

    fn decode_element(&mut self, tag: TagId, dataset: &mut DataSet) -> DicomResult<()> {
        let (vr, length) = self.read_vr_and_length(tag, dataset)?;

        if vr == Vr::Sq {
            return self.decode_sequence(tag, length, dataset);
        }
        if length == UNDEFINED_LENGTH {
            // Undefined length outside SQ only occurs in encapsulated
            // syntaxes, which external codecs handle.
            return Err(DicomError::Codec(format!(
                "undefined length on non-sequence element {} ({})",
                tag, vr
            )));
        }

        let mut value = self.read_value(length as usize)?;
        if self.syntax.endianness() == Endianness::Big {
            swap_words(&mut value, swap_unit(vr));
        }
        dataset.set_raw_buffer(tag, vr, value.freeze())
    }

    fn decode_sequence(
        &mut self,
        tag: TagId,
        length: u32,
        dataset: &mut DataSet,
    ) -> DicomResult<()> {
        // The tag exists even when the sequence carries no items
        dataset.create_sequence(tag)?;

        let end = if length == UNDEFINED_LENGTH {
            None
        } else {
            Some(self.position + u64::from(length))
        };

        loop {
            if let Some(end) = end {
                if self.position == end {
                    return Ok(());
                }
                if self.position > end {
                    return Err(DicomError::Codec(format!(
                        "sequence {} overran its defined length",
                        tag
                    )));
                }
            }
            let item_tag = self.read_tag()?;
            if item_tag == SEQUENCE_DELIMITER {
                self.read_u32()?;
                if end.is_some() {
                    return Err(DicomError::Codec(format!(
                        "sequence delimiter inside defined-length sequence {}",
                        tag
                    )));
                }
                return Ok(());
            }
            if item_tag != ITEM {
                return Err(DicomError::Codec(format!(
                    "expected item tag in sequence {}, found {}",
                    tag, item_tag
                )));
            }
            let item_length = self.read_u32()?;
            self.decode_item(tag, item_length, dataset)?;
        }
    }

    fn decode_item(&mut self, tag: TagId, length: u32, dataset: &mut DataSet) -> DicomResult<()> {
        let item = dataset.append_sequence_item(tag)?;
        if length == UNDEFINED_LENGTH {
            loop {
                let element_tag = self.read_tag()?;
                if element_tag == ITEM_DELIMITER {
                    self.read_u32()?;
                    return Ok(());
                }
                self.decode_element(element_tag, item)?;
            }
        }
        let end = self.position + u64::from(length);
        while self.position < end {
            let element_tag = self.read_tag()?;
            self.decode_element(element_tag, item)?;
        }
        if self.position != end {
            return Err(DicomError::Codec(format!(
                "item of sequence {} overran its defined length",
                tag
            )));
        }
        Ok(())
    }

    fn read_vr_and_length(&mut self, tag: TagId, dataset: &DataSet) -> DicomResult<(Vr, u32)> {
        if self.syntax.is_explicit_vr() {
            let mut code = [0u8; 2];
            self.read_bytes(&mut code)?;
            let vr = Vr::from_bytes(code)?;
            if vr.uses_long_length() {
                let mut reserved = [0u8; 2];
                self.read_bytes(&mut reserved)?;
                Ok((vr, self.read_u32()?))
            } else {
                Ok((vr, u32::from(self.read_u16()?)))
            }
        } else {
            let vr = dataset.dictionary().tag_vr(tag).unwrap_or(Vr::Un);
            Ok((vr, self.read_u32()?))
        }
    }

    /// Read a tag pair, or `None` on a clean end of stream
    fn read_tag_or_eof(&mut self) -> DicomResult<Option<TagId>> {
        let mut header = [0u8; 4];
        let mut filled = 0;
        while filled < header.len() {
            let n = self.input.read(&mut header[filled..])?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(DicomError::Codec(
                    "stream ended inside an element header".to_owned(),
                ));
            }
            filled += n;
        }
        self.position += header.len() as u64;
        Ok(Some(self.tag_from(header)))
    }

    fn read_tag(&mut self) -> DicomResult<TagId> {
        let mut header = [0u8; 4];
        self.read_bytes(&mut header)?;
        Ok(self.tag_from(header))
    }

    fn tag_from(&self, header: [u8; 4]) -> TagId {
        let (group, element) = match self.syntax.endianness() {
            Endianness::Little => (
                u16::from_le_bytes([header[0], header[1]]),
                u16::from_le_bytes([header[2], header[3]]),
            ),
            Endianness::Big => (
                u16::from_be_bytes([header[0], header[1]]),
                u16::from_be_bytes([header[2], header[3]]),
            ),
        };
        TagId::new(group, element)
    }

    fn read_u16(&mut self) -> DicomResult<u16> {
        let mut bytes = [0u8; 2];
        self.read_bytes(&mut bytes)?;
        Ok(match self.syntax.endianness() {
            Endianness::Little => u16::from_le_bytes(bytes),
            Endianness::Big => u16::from_be_bytes(bytes),
        })
    }

    fn read_u32(&mut self) -> DicomResult<u32> {
        let mut bytes = [0u8; 4];
        self.read_bytes(&mut bytes)?;
        Ok(match self.syntax.endianness() {
            Endianness::Little => u32::from_le_bytes(bytes),
            Endianness::Big => u32::from_be_bytes(bytes),
        })
    }

    /// Read a value of `length` bytes in bounded chunks
    ///
    /// The length field comes straight off the wire; the buffer grows
    /// with the bytes actually read, so a forged length cannot force a
    /// multi-gigabyte allocation before the stream runs dry.
    fn read_value(&mut self, length: usize) -> DicomResult<BytesMut> {
        let mut value = BytesMut::with_capacity(length.min(VALUE_CHUNK));
        let mut chunk = [0u8; VALUE_CHUNK];
        let mut remaining = length;
        while remaining > 0 {
            let n = remaining.min(chunk.len());
            self.read_bytes(&mut chunk[..n])?;
            value.extend_from_slice(&chunk[..n]);
            remaining -= n;
        }
        Ok(value)
    }

    /// A short read inside an element is a structural fault, not an I/O
    /// condition the caller can retry.
    fn read_bytes(&mut self, buf: &mut [u8]) -> DicomResult<()> {
        self.input.read_exact(buf).map_err(|e| match e {
            DicomError::Io(ref io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                DicomError::Codec("stream ended inside an element".to_owned())
            }
            other => other,
        })?;
        self.position += buf.len() as u64;
        Ok(())
    }
}

/// Decode a data set held entirely in memory
pub fn decode_bytes(data: Bytes, syntax: TransferSyntax) -> DicomResult<DataSet> {
    let mut input = dicomite_transport::MemoryStreamInput::new(data);
    DataSetDecoder::new(&mut input, syntax).decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::DataSetEncoder;
    use dicomite_transport::{MemoryStreamInput, MemoryStreamOutput};

    const PATIENT_NAME: TagId = TagId::new(0x0010, 0x0010);
    const ROWS: TagId = TagId::new(0x0028, 0x0010);
    const COLUMNS: TagId = TagId::new(0x0028, 0x0011);
    const REFERENCED_STUDY_SEQUENCE: TagId = TagId::new(0x0008, 0x1110);

    const ALL_SYNTAXES: [TransferSyntax; 3] = [
        TransferSyntax::ImplicitVrLittleEndian,
        TransferSyntax::ExplicitVrLittleEndian,
        TransferSyntax::ExplicitVrBigEndian,
    ];

    fn round_trip(dataset: &DataSet, syntax: TransferSyntax) -> DataSet {
        let mut output = MemoryStreamOutput::new();
        DataSetEncoder::new(&mut output, syntax)
            .encode(dataset)
            .unwrap();
        let mut input = MemoryStreamInput::new(output.into_bytes());
        DataSetDecoder::new(&mut input, syntax).decode().unwrap()
    }

    #[test]
    fn test_round_trip_all_syntaxes() {
        let mut dataset = DataSet::new();
        dataset.set_string(PATIENT_NAME, "DOE^JOHN").unwrap();
        dataset.set_u16(ROWS, 512).unwrap();
        dataset.set_u16(COLUMNS, 1024).unwrap();

        for syntax in ALL_SYNTAXES {
            let decoded = round_trip(&dataset, syntax);
            assert_eq!(decoded.get_string(PATIENT_NAME, 0).unwrap(), "DOE^JOHN");
            assert_eq!(decoded.get_u16(ROWS, 0).unwrap(), 512);
            assert_eq!(decoded.get_u16(COLUMNS, 0).unwrap(), 1024);
        }
    }

    #[test]
    fn test_round_trip_nested_sequence() {
        let mut dataset = DataSet::new();
        dataset.set_u16(ROWS, 16).unwrap();
        {
            let item = dataset
                .append_sequence_item(REFERENCED_STUDY_SEQUENCE)
                .unwrap();
            item.set_string(PATIENT_NAME, "NESTED").unwrap();
            let inner = item.append_sequence_item(REFERENCED_STUDY_SEQUENCE).unwrap();
            inner.set_u16(COLUMNS, 2).unwrap();
        }
        dataset
            .append_sequence_item(REFERENCED_STUDY_SEQUENCE)
            .unwrap();

        for syntax in ALL_SYNTAXES {
            let decoded = round_trip(&dataset, syntax);
            let items = decoded.get_sequence_items(REFERENCED_STUDY_SEQUENCE).unwrap();
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].get_string(PATIENT_NAME, 0).unwrap(), "NESTED");
            let inner = items[0]
                .get_sequence_item(REFERENCED_STUDY_SEQUENCE, 0)
                .unwrap();
            assert_eq!(inner.get_u16(COLUMNS, 0).unwrap(), 2);
            assert!(items[1].is_empty());
        }
    }

    #[test]
    fn test_decode_defined_length_sequence() {
        // One item with a single US element, everything defined-length,
        // implicit VR little endian.
        let mut data = Vec::new();
        data.extend_from_slice(&[0x08, 0x00, 0x10, 0x11]); // (0008,1110)
        data.extend_from_slice(&18u32.to_le_bytes());
        data.extend_from_slice(&[0xFE, 0xFF, 0x00, 0xE0]); // item
        data.extend_from_slice(&10u32.to_le_bytes());
        data.extend_from_slice(&[0x28, 0x00, 0x10, 0x00]); // (0028,0010)
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&7u16.to_le_bytes());

        let decoded =
            decode_bytes(Bytes::from(data), TransferSyntax::ImplicitVrLittleEndian).unwrap();
        let item = decoded
            .get_sequence_item(REFERENCED_STUDY_SEQUENCE, 0)
            .unwrap();
        assert_eq!(item.get_u16(ROWS, 0).unwrap(), 7);
    }

    #[test]
    fn test_implicit_unknown_tag_falls_back_to_un() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0xE1, 0x7F, 0x34, 0x12]); // not in the dictionary
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[0xAA, 0xBB]);

        let decoded =
            decode_bytes(Bytes::from(data), TransferSyntax::ImplicitVrLittleEndian).unwrap();
        let stored = decoded.get_tag(TagId::new(0x7FE1, 0x1234)).unwrap();
        assert_eq!(stored.vr(), Vr::Un);
        assert_eq!(&stored.buffer(0).unwrap()[..], &[0xAA, 0xBB]);
    }

    #[test]
    fn test_truncated_element_is_a_codec_error() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0x28, 0x00, 0x10, 0x00]);
        data.extend_from_slice(&100u32.to_le_bytes()); // longer than the stream
        data.extend_from_slice(&[0x01, 0x02]);

        let result = decode_bytes(Bytes::from(data), TransferSyntax::ImplicitVrLittleEndian);
        assert!(matches!(result, Err(DicomError::Codec(_))));
    }

    #[test]
    fn test_huge_declared_length_is_a_codec_error() {
        // A length field close to 4 GiB on a stream holding 2 bytes: the
        // decoder must fail on the short read, not allocate the declared
        // size upfront.
        let mut data = Vec::new();
        data.extend_from_slice(&[0x28, 0x00, 0x10, 0x00]);
        data.extend_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        data.extend_from_slice(&[0x01, 0x02]);

        let result = decode_bytes(Bytes::from(data), TransferSyntax::ImplicitVrLittleEndian);
        assert!(matches!(result, Err(DicomError::Codec(_))));
    }

    #[test]
    fn test_stray_delimiter_is_a_codec_error() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0xFE, 0xFF, 0x0D, 0xE0]);
        data.extend_from_slice(&0u32.to_le_bytes());

        let result = decode_bytes(Bytes::from(data), TransferSyntax::ImplicitVrLittleEndian);
        assert!(matches!(result, Err(DicomError::Codec(_))));
    }

    #[test]
    fn test_clean_eof_at_tag_boundary() {
        let decoded = decode_bytes(Bytes::new(), TransferSyntax::ExplicitVrLittleEndian).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_big_endian_values_normalized_to_little_endian() {
        let mut dataset = DataSet::new();
        dataset.set_u16(ROWS, 0x0102).unwrap();

        let decoded = round_trip(&dataset, TransferSyntax::ExplicitVrBigEndian);
        // In-memory buffers are little endian regardless of the wire order
        let stored = decoded.get_tag(ROWS).unwrap();
        assert_eq!(&stored.buffer(0).unwrap()[..], &[0x02, 0x01]);
    }

    #[test]
    fn test_big_endian_at_round_trip_keeps_halves() {
        // An AT value is a (group, element) pair: each u16 half swaps on
        // its own, so the pair order survives a big endian round trip
        let pointer = TagId::new(0x0028, 0x0009);
        let mut dataset = DataSet::new();
        dataset
            .set_raw_buffer(pointer, Vr::At, Bytes::from_static(&[0x10, 0x00, 0x20, 0x00]))
            .unwrap();

        let decoded = round_trip(&dataset, TransferSyntax::ExplicitVrBigEndian);
        let stored = decoded.get_tag(pointer).unwrap();
        assert_eq!(stored.vr(), Vr::At);
        assert_eq!(&stored.buffer(0).unwrap()[..], &[0x10, 0x00, 0x20, 0x00]);
    }
}
