//! Data set encoder for the native transfer syntaxes

use bytes::{BufMut, BytesMut};
use log::debug;

use dicomite_core::{DicomError, DicomResult, Endianness, TagId, TransferSyntax, Vr};
use dicomite_dataset::{DataSet, Tag};
use dicomite_transport::StreamOutput;

use crate::wire::{swap_unit, swap_words, ITEM, ITEM_DELIMITER, SEQUENCE_DELIMITER, UNDEFINED_LENGTH};

/// Serializes data sets through a [`StreamOutput`]
///
/// Elements are written in the order the data set stores them. Sequences
/// are written with undefined length and delimiter tags; every other
/// element carries a defined length, padded to an even byte count with
/// the VR's padding byte.
pub struct DataSetEncoder<'a, W: StreamOutput> {
    output: &'a mut W,
    syntax: TransferSyntax,
}

impl<'a, W: StreamOutput> DataSetEncoder<'a, W> {
    pub fn new(output: &'a mut W, syntax: TransferSyntax) -> Self {
        Self { output, syntax }
    }

    /// Write the whole data set and flush the stream
    pub fn encode(&mut self, dataset: &DataSet) -> DicomResult<()> {
        debug!("encoding {} top-level tag(s) as {}", dataset.len(), self.syntax);
        self.encode_tags(dataset)?;
        self.output.flush()
    }

    fn encode_tags(&mut self, dataset: &DataSet) -> DicomResult<()> {
        for (tag, stored) in dataset.tags() {
            self.encode_element(tag, stored)?;
        }
        Ok(())
    }

    fn encode_element(&mut self, tag: TagId, stored: &Tag) -> DicomResult<()> {
        if stored.is_sequence() {
            return self.encode_sequence(tag, stored);
        }

        let vr = stored.vr();
        // Pixel data fragments are stored as separate buffers in memory;
        // the native syntaxes carry them as one contiguous value.
        let mut value = BytesMut::new();
        for index in 0..stored.buffers_count().max(1) {
            value.put_slice(&stored.buffer(index)?);
        }
        if value.len() % 2 != 0 {
            value.put_u8(vr.padding_byte());
        }
        if self.syntax.endianness() == Endianness::Big {
            swap_words(&mut value, swap_unit(vr));
        }

        self.write_element_header(tag, vr, value.len())?;
        self.output.write(&value)
    }

    fn encode_sequence(&mut self, tag: TagId, stored: &Tag) -> DicomResult<()> {
        self.write_element_header_raw(tag, Vr::Sq, UNDEFINED_LENGTH)?;
        for item in stored.sequence_items()? {
            self.write_delimiter(ITEM, UNDEFINED_LENGTH)?;
            self.encode_tags(item)?;
            self.write_delimiter(ITEM_DELIMITER, 0)?;
        }
        self.write_delimiter(SEQUENCE_DELIMITER, 0)
    }

    fn write_element_header(&mut self, tag: TagId, vr: Vr, length: usize) -> DicomResult<()> {
        let short_form = self.syntax.is_explicit_vr() && !vr.uses_long_length();
        if short_form && length > u16::MAX as usize {
            return Err(DicomError::Codec(format!(
                "value of {} ({}) exceeds the short length form: {} bytes",
                tag, vr, length
            )));
        }
        let length = u32::try_from(length)
            .map_err(|_| DicomError::Codec(format!("value of {} exceeds 4 GiB", tag)))?;
        self.write_element_header_raw(tag, vr, length)
    }

    fn write_element_header_raw(&mut self, tag: TagId, vr: Vr, length: u32) -> DicomResult<()> {
        self.write_u16(tag.group())?;
        self.write_u16(tag.element())?;
        if self.syntax.is_explicit_vr() {
            self.output.write(&vr.as_bytes())?;
            if vr.uses_long_length() {
                self.output.write(&[0, 0])?;
                self.write_u32(length)
            } else {
                self.write_u16(length as u16)
            }
        } else {
            self.write_u32(length)
        }
    }

    /// Item and delimiter headers never carry a VR, even in explicit VR
    /// syntaxes.
    fn write_delimiter(&mut self, tag: TagId, length: u32) -> DicomResult<()> {
        self.write_u16(tag.group())?;
        self.write_u16(tag.element())?;
        self.write_u32(length)
    }

    fn write_u16(&mut self, value: u16) -> DicomResult<()> {
        let bytes = match self.syntax.endianness() {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        self.output.write(&bytes)
    }

    fn write_u32(&mut self, value: u32) -> DicomResult<()> {
        let bytes = match self.syntax.endianness() {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        self.output.write(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicomite_core::TagId;
    use dicomite_transport::MemoryStreamOutput;

    const PATIENT_NAME: TagId = TagId::new(0x0010, 0x0010);
    const ROWS: TagId = TagId::new(0x0028, 0x0010);

    fn encode(dataset: &DataSet, syntax: TransferSyntax) -> Vec<u8> {
        let mut output = MemoryStreamOutput::new();
        DataSetEncoder::new(&mut output, syntax)
            .encode(dataset)
            .unwrap();
        output.into_bytes().to_vec()
    }

    #[test]
    fn test_explicit_little_endian_header() {
        let mut dataset = DataSet::new();
        dataset.set_string(PATIENT_NAME, "DOE^JOHN").unwrap();

        let encoded = encode(&dataset, TransferSyntax::ExplicitVrLittleEndian);
        assert_eq!(
            encoded,
            [
                0x10, 0x00, 0x10, 0x00, // tag
                b'P', b'N', // VR
                0x08, 0x00, // length
                b'D', b'O', b'E', b'^', b'J', b'O', b'H', b'N',
            ]
        );
    }

    #[test]
    fn test_implicit_header_has_no_vr() {
        let mut dataset = DataSet::new();
        dataset.set_u16(ROWS, 512).unwrap();

        let encoded = encode(&dataset, TransferSyntax::ImplicitVrLittleEndian);
        assert_eq!(
            encoded,
            [
                0x28, 0x00, 0x10, 0x00, // tag
                0x02, 0x00, 0x00, 0x00, // 4-byte length, no VR
                0x00, 0x02, // 512 little endian
            ]
        );
    }

    #[test]
    fn test_big_endian_swaps_headers_and_values() {
        let mut dataset = DataSet::new();
        dataset.set_u16(ROWS, 512).unwrap();

        let encoded = encode(&dataset, TransferSyntax::ExplicitVrBigEndian);
        assert_eq!(
            encoded,
            [
                0x00, 0x28, 0x00, 0x10, // tag big endian
                b'U', b'S', // VR
                0x00, 0x02, // length big endian
                0x02, 0x00, // 512 big endian
            ]
        );
    }

    #[test]
    fn test_big_endian_swaps_at_values_per_half() {
        // Frame Increment Pointer holds a (group, element) pair: the two
        // u16 halves swap independently
        let pointer = TagId::new(0x0028, 0x0009);
        let mut dataset = DataSet::new();
        dataset
            .set_raw_buffer(
                pointer,
                Vr::At,
                bytes::Bytes::from_static(&[0x10, 0x00, 0x20, 0x00]),
            )
            .unwrap();

        let encoded = encode(&dataset, TransferSyntax::ExplicitVrBigEndian);
        assert_eq!(&encoded[4..6], b"AT");
        assert_eq!(&encoded[8..], &[0x00, 0x10, 0x00, 0x20]);
    }

    #[test]
    fn test_odd_value_is_padded() {
        let mut dataset = DataSet::new();
        dataset.set_string(PATIENT_NAME, "DOE").unwrap();

        let encoded = encode(&dataset, TransferSyntax::ExplicitVrLittleEndian);
        // 3 characters padded to 4 with a space
        assert_eq!(encoded[6], 4);
        assert_eq!(&encoded[8..], b"DOE ");
    }
}
