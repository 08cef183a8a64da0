use crate::handlers::{
    ReadingDataHandler, ReadingDataHandlerNumeric, WritingDataHandler, WritingDataHandlerNumeric,
};
use crate::tag::Tag;
use bytes::Bytes;
use dicomite_core::datatypes::{Age, DicomDate, PersonName};
use dicomite_core::{DicomError, DicomResult, TagId, TransferSyntax, Vr};
use dicomite_dictionary::{standard, DicomDictionary};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory DICOM document
///
/// An ordered collection of tags keyed by tag identifier; insertion order
/// is preserved for serialization. Tags may hold nested data sets (DICOM
/// sequences), owned exclusively by this data set and released with it.
///
/// Typed access goes through data handlers obtained per tag. A reading
/// handler snapshots the tag's current buffer; a writing handler stages a
/// new buffer and swaps it in atomically on commit, so readers obtained
/// earlier keep observing the values that existed when they were created.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    dictionary: Option<Arc<DicomDictionary>>,
    transfer_syntax: TransferSyntax,
    order: Vec<TagId>,
    tags: HashMap<TagId, Tag>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transfer_syntax(transfer_syntax: TransferSyntax) -> Self {
        Self {
            transfer_syntax,
            ..Self::default()
        }
    }

    /// Use an owned dictionary (e.g. with registered private tags)
    /// instead of the process-wide standard one
    pub fn with_dictionary(mut self, dictionary: Arc<DicomDictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn dictionary(&self) -> &DicomDictionary {
        self.dictionary.as_deref().unwrap_or_else(|| standard())
    }

    pub fn transfer_syntax(&self) -> TransferSyntax {
        self.transfer_syntax
    }

    pub fn set_transfer_syntax(&mut self, transfer_syntax: TransferSyntax) {
        self.transfer_syntax = transfer_syntax;
    }

    /// Iterate the tags in insertion order
    pub fn tags(&self) -> impl Iterator<Item = (TagId, &Tag)> {
        self.order.iter().map(|tag| (*tag, &self.tags[tag]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, tag: TagId) -> bool {
        self.tags.contains_key(&tag)
    }

    /// Retrieve a tag
    pub fn get_tag(&self, tag: TagId) -> DicomResult<&Tag> {
        self.tags.get(&tag).ok_or(DicomError::MissingTag { tag })
    }

    fn tag_mut_or_insert(&mut self, tag: TagId, vr: Vr) -> &mut Tag {
        if !self.tags.contains_key(&tag) {
            self.order.push(tag);
            self.tags.insert(tag, Tag::new(vr));
        }
        self.tags.get_mut(&tag).unwrap()
    }

    /// The VR used when writing a tag: the stored one when the tag
    /// exists, the dictionary default otherwise
    fn default_vr(&self, tag: TagId) -> DicomResult<Vr> {
        match self.tags.get(&tag) {
            Some(existing) => Ok(existing.vr()),
            None => self.dictionary().tag_vr(tag),
        }
    }

    /// Obtain a reading handler bound to the tag's current buffer
    pub fn get_reading_data_handler(&self, tag: TagId) -> DicomResult<ReadingDataHandler> {
        let stored = self.get_tag(tag)?;
        if stored.is_sequence() {
            return Err(DicomError::conversion(Vr::Sq, "data handler", 0));
        }
        Ok(ReadingDataHandler::new(stored.vr(), stored.buffer(0)?))
    }

    /// Obtain a numeric reading handler bound to the tag's current buffer
    pub fn get_reading_data_handler_numeric(
        &self,
        tag: TagId,
    ) -> DicomResult<ReadingDataHandlerNumeric> {
        let stored = self.get_tag(tag)?;
        if stored.is_sequence() {
            return Err(DicomError::conversion(Vr::Sq, "data handler", 0));
        }
        ReadingDataHandlerNumeric::new(stored.vr(), stored.buffer(0)?)
    }

    /// Obtain a writing handler for a tag, using the stored or dictionary
    /// default VR
    pub fn get_writing_data_handler(&mut self, tag: TagId) -> DicomResult<WritingDataHandler<'_>> {
        let vr = self.default_vr(tag)?;
        Ok(WritingDataHandler::new(self, tag, vr))
    }

    /// Obtain a writing handler with an explicit VR
    pub fn get_writing_data_handler_with_vr(
        &mut self,
        tag: TagId,
        vr: Vr,
    ) -> WritingDataHandler<'_> {
        WritingDataHandler::new(self, tag, vr)
    }

    /// Obtain a numeric writing handler for a tag
    pub fn get_writing_data_handler_numeric(
        &mut self,
        tag: TagId,
    ) -> DicomResult<WritingDataHandlerNumeric<'_>> {
        let vr = self.default_vr(tag)?;
        WritingDataHandlerNumeric::new(self, tag, vr)
    }

    /// Obtain a numeric writing handler with an explicit VR
    pub fn get_writing_data_handler_numeric_with_vr(
        &mut self,
        tag: TagId,
        vr: Vr,
    ) -> DicomResult<WritingDataHandlerNumeric<'_>> {
        WritingDataHandlerNumeric::new(self, tag, vr)
    }

    /// Install a pre-built buffer; used by the decoder
    pub fn set_raw_buffer(&mut self, tag: TagId, vr: Vr, buffer: Bytes) -> DicomResult<()> {
        self.tag_mut_or_insert(tag, vr).set_buffer(0, buffer)
    }

    /// Validate a staged buffer against the dictionary multiplicity and
    /// swap it into the tag
    ///
    /// The check runs before any mutation: a multiplicity failure leaves
    /// the data set untouched. Tags missing from the dictionary (and
    /// empty writes) skip the check.
    pub(crate) fn commit_buffer(
        &mut self,
        tag: TagId,
        vr: Vr,
        buffer: Bytes,
        count: u32,
    ) -> DicomResult<()> {
        // Blob VRs (pixel data and friends) hold one logical value no
        // matter how many words the buffer contains; the element count is
        // only meaningful for the bounded VRs.
        if count > 0 && vr.max_size() != 0 {
            if let Ok(entry) = self.dictionary().lookup(tag) {
                entry.multiplicity.check(tag, count)?;
            }
        }
        debug!("committing {} value(s) into {} ({})", count, tag, vr);
        self.tag_mut_or_insert(tag, vr).set_buffer(0, buffer)
    }

    /// Retrieve one item of a sequence tag
    pub fn get_sequence_item(&self, tag: TagId, item: usize) -> DicomResult<&DataSet> {
        self.get_tag(tag)?
            .sequence_items()?
            .get(item)
            .ok_or(DicomError::MissingTag { tag })
    }

    /// Retrieve all the items of a sequence tag
    pub fn get_sequence_items(&self, tag: TagId) -> DicomResult<&[DataSet]> {
        self.get_tag(tag)?.sequence_items()
    }

    /// Create a sequence tag with no items, keeping any existing items
    pub fn create_sequence(&mut self, tag: TagId) -> DicomResult<()> {
        self.tag_mut_or_insert(tag, Vr::Sq).sequence_items_mut()?;
        Ok(())
    }

    /// Append a new empty item to a sequence tag, creating the tag when
    /// absent
    pub fn append_sequence_item(&mut self, tag: TagId) -> DicomResult<&mut DataSet> {
        let transfer_syntax = self.transfer_syntax;
        let dictionary = self.dictionary.clone();
        let stored = self.tag_mut_or_insert(tag, Vr::Sq);
        let items = stored.sequence_items_mut()?;
        items.push(DataSet {
            dictionary,
            transfer_syntax,
            ..DataSet::default()
        });
        Ok(items.last_mut().unwrap())
    }

    // Convenience typed accessors: one call per
    // value, the handler plumbing stays hidden.

    pub fn get_string(&self, tag: TagId, index: usize) -> DicomResult<String> {
        self.get_reading_data_handler(tag)?.get_string(index)
    }

    pub fn get_i64(&self, tag: TagId, index: usize) -> DicomResult<i64> {
        self.get_reading_data_handler(tag)?.get_i64(index)
    }

    pub fn get_i32(&self, tag: TagId, index: usize) -> DicomResult<i32> {
        self.get_reading_data_handler(tag)?.get_i32(index)
    }

    pub fn get_u32(&self, tag: TagId, index: usize) -> DicomResult<u32> {
        self.get_reading_data_handler(tag)?.get_u32(index)
    }

    pub fn get_u16(&self, tag: TagId, index: usize) -> DicomResult<u16> {
        self.get_reading_data_handler(tag)?.get_u16(index)
    }

    pub fn get_f64(&self, tag: TagId, index: usize) -> DicomResult<f64> {
        self.get_reading_data_handler(tag)?.get_f64(index)
    }

    pub fn get_date(&self, tag: TagId, index: usize) -> DicomResult<DicomDate> {
        self.get_reading_data_handler(tag)?.get_date(index)
    }

    pub fn get_age(&self, tag: TagId, index: usize) -> DicomResult<Age> {
        self.get_reading_data_handler(tag)?.get_age(index)
    }

    pub fn get_person_name(&self, tag: TagId, index: usize) -> DicomResult<PersonName> {
        self.get_reading_data_handler(tag)?.get_person_name(index)
    }

    /// Lenient read: a missing tag or index yields the default, while a
    /// type mismatch still surfaces as an error
    pub fn get_string_or(&self, tag: TagId, index: usize, default: &str) -> DicomResult<String> {
        lenient(self.get_string(tag, index), || default.to_string())
    }

    pub fn get_i64_or(&self, tag: TagId, index: usize, default: i64) -> DicomResult<i64> {
        lenient(self.get_i64(tag, index), || default)
    }

    pub fn get_u32_or(&self, tag: TagId, index: usize, default: u32) -> DicomResult<u32> {
        lenient(self.get_u32(tag, index), || default)
    }

    pub fn get_f64_or(&self, tag: TagId, index: usize, default: f64) -> DicomResult<f64> {
        lenient(self.get_f64(tag, index), || default)
    }

    pub fn set_string(&mut self, tag: TagId, value: &str) -> DicomResult<()> {
        let mut handler = self.get_writing_data_handler(tag)?;
        handler.resize(1);
        handler.set_string(0, value)?;
        handler.commit()
    }

    pub fn set_string_with_vr(&mut self, tag: TagId, vr: Vr, value: &str) -> DicomResult<()> {
        let mut handler = self.get_writing_data_handler_with_vr(tag, vr);
        handler.resize(1);
        handler.set_string(0, value)?;
        handler.commit()
    }

    pub fn set_i64(&mut self, tag: TagId, value: i64) -> DicomResult<()> {
        let mut handler = self.get_writing_data_handler(tag)?;
        handler.resize(1);
        handler.set_i64(0, value)?;
        handler.commit()
    }

    pub fn set_u32(&mut self, tag: TagId, value: u32) -> DicomResult<()> {
        let mut handler = self.get_writing_data_handler(tag)?;
        handler.resize(1);
        handler.set_u32(0, value)?;
        handler.commit()
    }

    pub fn set_u16(&mut self, tag: TagId, value: u16) -> DicomResult<()> {
        let mut handler = self.get_writing_data_handler(tag)?;
        handler.resize(1);
        handler.set_u16(0, value)?;
        handler.commit()
    }

    pub fn set_f64(&mut self, tag: TagId, value: f64) -> DicomResult<()> {
        let mut handler = self.get_writing_data_handler(tag)?;
        handler.resize(1);
        handler.set_f64(0, value)?;
        handler.commit()
    }

    pub fn set_date(&mut self, tag: TagId, value: &DicomDate) -> DicomResult<()> {
        let mut handler = self.get_writing_data_handler(tag)?;
        handler.resize(1);
        handler.set_date(0, value)?;
        handler.commit()
    }

    pub fn set_age(&mut self, tag: TagId, value: &Age) -> DicomResult<()> {
        let mut handler = self.get_writing_data_handler(tag)?;
        handler.resize(1);
        handler.set_age(0, value)?;
        handler.commit()
    }

    pub fn set_person_name(&mut self, tag: TagId, value: &PersonName) -> DicomResult<()> {
        let mut handler = self.get_writing_data_handler(tag)?;
        handler.resize(1);
        handler.set_person_name(0, value)?;
        handler.commit()
    }
}

fn lenient<T>(result: DicomResult<T>, default: impl FnOnce() -> T) -> DicomResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(DicomError::MissingTag { .. }) | Err(DicomError::Range(_)) => Ok(default()),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicomite_dictionary::{DictionaryEntry, Multiplicity};

    const PATIENT_NAME: TagId = TagId::new(0x0010, 0x0010);
    const PATIENT_AGE: TagId = TagId::new(0x0010, 0x1010);
    const IMAGE_POSITION: TagId = TagId::new(0x0020, 0x0032);
    const ROWS: TagId = TagId::new(0x0028, 0x0010);
    const REFERENCED_IMAGES: TagId = TagId::new(0x0008, 0x1140);

    #[test]
    fn test_missing_tag() {
        let dataset = DataSet::new();
        assert!(matches!(
            dataset.get_tag(PATIENT_NAME),
            Err(DicomError::MissingTag { .. })
        ));
    }

    #[test]
    fn test_set_and_get_string() {
        let mut dataset = DataSet::new();
        dataset.set_string(PATIENT_NAME, "Doe^Jane").unwrap();
        assert_eq!(dataset.get_string(PATIENT_NAME, 0).unwrap(), "Doe^Jane");
        assert_eq!(
            dataset.get_person_name(PATIENT_NAME, 0).unwrap().alphabetic(),
            "Doe^Jane"
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut dataset = DataSet::new();
        dataset.set_u16(ROWS, 512).unwrap();
        dataset.set_string(PATIENT_NAME, "A").unwrap();
        let order: Vec<TagId> = dataset.tags().map(|(tag, _)| tag).collect();
        assert_eq!(order, vec![ROWS, PATIENT_NAME]);

        // Rewriting an existing tag does not move it
        dataset.set_u16(ROWS, 256).unwrap();
        let order: Vec<TagId> = dataset.tags().map(|(tag, _)| tag).collect();
        assert_eq!(order, vec![ROWS, PATIENT_NAME]);
    }

    #[test]
    fn test_reading_handler_snapshot_isolation() {
        let mut dataset = DataSet::new();
        dataset.set_string(PATIENT_NAME, "Before^Change").unwrap();
        let handler = dataset.get_reading_data_handler(PATIENT_NAME).unwrap();

        dataset.set_string(PATIENT_NAME, "After^Change").unwrap();

        // The handler keeps the snapshot taken when it was obtained
        assert_eq!(handler.get_string(0).unwrap(), "Before^Change");
        assert_eq!(dataset.get_string(PATIENT_NAME, 0).unwrap(), "After^Change");
    }

    #[test]
    fn test_multiplicity_enforced_at_commit() {
        let mut dataset = DataSet::new();

        // Image Position (Patient) requires exactly 3 values
        let mut handler = dataset.get_writing_data_handler(IMAGE_POSITION).unwrap();
        handler.resize(2);
        handler.set_f64(0, 1.0).unwrap();
        handler.set_f64(1, 2.0).unwrap();
        assert!(matches!(
            handler.commit(),
            Err(DicomError::Multiplicity { count: 2, .. })
        ));
        // The failed commit left nothing behind
        assert!(!dataset.contains(IMAGE_POSITION));

        let mut handler = dataset.get_writing_data_handler(IMAGE_POSITION).unwrap();
        handler.resize(3);
        for index in 0..3 {
            handler.set_f64(index, index as f64).unwrap();
        }
        handler.commit().unwrap();
        let reader = dataset.get_reading_data_handler(IMAGE_POSITION).unwrap();
        assert_eq!(reader.size(), 3);
    }

    #[test]
    fn test_drop_without_commit_discards() {
        let mut dataset = DataSet::new();
        {
            let mut handler = dataset.get_writing_data_handler(PATIENT_NAME).unwrap();
            handler.resize(1);
            handler.set_string(0, "Ghost").unwrap();
            // dropped here
        }
        assert!(!dataset.contains(PATIENT_NAME));
    }

    #[test]
    fn test_sequences() {
        let mut dataset = DataSet::new();
        {
            let item = dataset.append_sequence_item(REFERENCED_IMAGES).unwrap();
            item.set_string(TagId::new(0x0008, 0x1155), "1.2.3.4").unwrap();
        }
        {
            let item = dataset.append_sequence_item(REFERENCED_IMAGES).unwrap();
            item.set_string(TagId::new(0x0008, 0x1155), "5.6.7.8").unwrap();
        }

        assert_eq!(dataset.get_sequence_items(REFERENCED_IMAGES).unwrap().len(), 2);
        let second = dataset.get_sequence_item(REFERENCED_IMAGES, 1).unwrap();
        assert_eq!(
            second.get_string(TagId::new(0x0008, 0x1155), 0).unwrap(),
            "5.6.7.8"
        );
        assert!(matches!(
            dataset.get_sequence_item(REFERENCED_IMAGES, 2),
            Err(DicomError::MissingTag { .. })
        ));
    }

    #[test]
    fn test_lenient_accessors() {
        let mut dataset = DataSet::new();
        assert_eq!(dataset.get_string_or(PATIENT_NAME, 0, "none").unwrap(), "none");

        dataset.set_string(PATIENT_NAME, "X").unwrap();
        assert_eq!(dataset.get_string_or(PATIENT_NAME, 0, "none").unwrap(), "X");
        // Type mismatch still surfaces
        assert!(dataset.get_i64_or(PATIENT_NAME, 0, 7).is_err());
    }

    #[test]
    fn test_age_round_trip() {
        let mut dataset = DataSet::new();
        let age = Age::new(42, dicomite_core::AgeUnits::Years).unwrap();
        dataset.set_age(PATIENT_AGE, &age).unwrap();
        assert_eq!(dataset.get_age(PATIENT_AGE, 0).unwrap(), age);
        assert_eq!(dataset.get_string(PATIENT_AGE, 0).unwrap(), "042Y");
    }

    #[test]
    fn test_numeric_copy_to_truncates_to_destination() {
        // A tag outside the dictionary: the copy semantics are what is
        // under test, not the multiplicity rules
        let samples = TagId::new(0x7FE1, 0x0010);

        let mut source = DataSet::new();
        {
            let mut handler = source
                .get_writing_data_handler_numeric_with_vr(samples, Vr::Us)
                .unwrap();
            handler.resize(4);
            for index in 0..4 {
                handler.set_u64(index, (index as u64 + 1) * 100).unwrap();
            }
            handler.commit().unwrap();
        }
        let reader = source.get_reading_data_handler_numeric(samples).unwrap();
        assert_eq!(reader.unit_size(), 2);
        assert!(!reader.is_signed());

        let mut destination = DataSet::new();
        let mut writer = destination
            .get_writing_data_handler_numeric_with_vr(samples, Vr::Sl)
            .unwrap();
        writer.resize(2);
        reader.copy_to(&mut writer).unwrap();
        assert_eq!(writer.size(), 2);
        writer.commit().unwrap();

        assert_eq!(destination.get_i64(samples, 0).unwrap(), 100);
        assert_eq!(destination.get_i64(samples, 1).unwrap(), 200);
        // Only min(source, destination) elements were copied
        assert!(destination.get_i64(samples, 2).is_err());
    }

    #[test]
    fn test_private_dictionary() {
        let mut dictionary = DicomDictionary::new();
        let private = TagId::new(0x0009, 0x0001);
        dictionary
            .register_private_tag(
                DictionaryEntry::new(private, "Lot Number", "LotNumber", Vr::Lo, Multiplicity::one()),
                "ACME",
            )
            .unwrap();

        let mut dataset = DataSet::new().with_dictionary(Arc::new(dictionary));
        dataset
            .set_string_with_vr(private, Vr::Lo, "LOT-7")
            .unwrap();
        assert_eq!(dataset.get_string(private, 0).unwrap(), "LOT-7");
        assert_eq!(
            dataset
                .dictionary()
                .lookup_private(private, "ACME")
                .unwrap()
                .keyword,
            "LotNumber"
        );
    }
}
