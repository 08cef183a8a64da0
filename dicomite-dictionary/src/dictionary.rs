use crate::entry::{DictionaryEntry, Multiplicity};
use crate::standard::STANDARD_ENTRIES;
use dicomite_core::{DicomError, DicomResult, TagId, Vr};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static STANDARD: Lazy<DicomDictionary> = Lazy::new(DicomDictionary::new);

/// The process-wide standard dictionary
///
/// Built on first access and immutable afterwards, so concurrent lookups
/// need no locking. Private-tag registration happens on owned
/// `DicomDictionary` instances, where the `&mut` receiver serializes
/// registrations against lookups.
pub fn standard() -> &'static DicomDictionary {
    &STANDARD
}

/// Dictionary of DICOM tags: descriptions, default VRs and multiplicity
///
/// Lookups are deterministic and stable across repeated calls absent
/// re-registration.
#[derive(Debug, Clone)]
pub struct DicomDictionary {
    entries: HashMap<TagId, DictionaryEntry>,
    // Private reservation blocks may share a group; the company identifier
    // disambiguates them.
    private_entries: HashMap<(TagId, String), DictionaryEntry>,
}

impl DicomDictionary {
    /// Create a dictionary preloaded with the standard tag table
    pub fn new() -> Self {
        let entries = STANDARD_ENTRIES
            .iter()
            .map(|raw| {
                let tag = TagId::new(raw.group, raw.element);
                (
                    tag,
                    DictionaryEntry::new(
                        tag,
                        raw.name,
                        raw.keyword,
                        raw.vr,
                        Multiplicity {
                            min: raw.min,
                            max: raw.max,
                            step: raw.step,
                        },
                    ),
                )
            })
            .collect();
        Self {
            entries,
            private_entries: HashMap::new(),
        }
    }

    /// Retrieve the entry describing a tag
    pub fn lookup(&self, tag: TagId) -> DicomResult<&DictionaryEntry> {
        self.entries
            .get(&tag)
            .ok_or(DicomError::NotFound { tag })
    }

    /// Retrieve a private tag registered under a company identifier
    ///
    /// Falls back to the standard table when no private entry matches.
    pub fn lookup_private(&self, tag: TagId, company: &str) -> DicomResult<&DictionaryEntry> {
        if let Some(entry) = self.private_entries.get(&(tag, company.to_string())) {
            return Ok(entry);
        }
        self.lookup(tag)
    }

    /// Retrieve a tag's description
    pub fn tag_description(&self, tag: TagId) -> DicomResult<&str> {
        Ok(&self.lookup(tag)?.name)
    }

    /// Retrieve a tag's default VR
    pub fn tag_vr(&self, tag: TagId) -> DicomResult<Vr> {
        Ok(self.lookup(tag)?.vr)
    }

    /// Retrieve a tag's multiplicity bounds
    pub fn tag_multiplicity(&self, tag: TagId) -> DicomResult<Multiplicity> {
        Ok(self.lookup(tag)?.multiplicity)
    }

    /// Register a private tag
    ///
    /// Private tags must have an odd group number and an element lower
    /// than or equal to 0xFF. All the private tags belonging to the same
    /// organization should share the same company identifier, which
    /// reserves the proper block within the group.
    pub fn register_private_tag(
        &mut self,
        entry: DictionaryEntry,
        company: &str,
    ) -> DicomResult<()> {
        if !entry.tag.is_valid_private() {
            return Err(DicomError::InvalidPrivateTag(format!(
                "{} must have an odd group and an element <= 0xFF",
                entry.tag
            )));
        }
        if company.is_empty() {
            return Err(DicomError::InvalidPrivateTag(
                "company identifier must not be empty".to_string(),
            ));
        }
        self.private_entries
            .insert((entry.tag, company.to_string()), entry);
        Ok(())
    }

    /// Size in bytes of a single element of the data type, 0 when variable
    pub fn word_size(vr: Vr) -> u32 {
        vr.word_size()
    }

    /// Maximum size in bytes of tags with the data type, 0 when unbounded
    pub fn max_size(vr: Vr) -> u32 {
        vr.max_size()
    }
}

impl Default for DicomDictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lookup() {
        let dictionary = standard();
        let entry = dictionary.lookup(TagId::new(0x0010, 0x0010)).unwrap();
        assert_eq!(entry.keyword, "PatientName");
        assert_eq!(entry.vr, Vr::Pn);
    }

    #[test]
    fn test_lookup_is_stable() {
        let dictionary = standard();
        let tag = TagId::new(0x0008, 0x0060);
        let first = dictionary.lookup(tag).unwrap().clone();
        for _ in 0..3 {
            assert_eq!(dictionary.lookup(tag).unwrap(), &first);
        }
    }

    #[test]
    fn test_lookup_miss() {
        assert!(matches!(
            standard().lookup(TagId::new(0x4242, 0x4242)),
            Err(DicomError::NotFound { .. })
        ));
    }

    #[test]
    fn test_register_private_tag() {
        let mut dictionary = DicomDictionary::new();
        let tag = TagId::new(0x0009, 0x0010);
        let entry = DictionaryEntry::new(tag, "Vendor Data", "VendorData", Vr::Lo, Multiplicity::one());
        dictionary.register_private_tag(entry, "ACME").unwrap();

        let found = dictionary.lookup_private(tag, "ACME").unwrap();
        assert_eq!(found.keyword, "VendorData");
        // An unrelated company does not see the entry
        assert!(dictionary.lookup_private(tag, "OTHER").is_err());
    }

    #[test]
    fn test_register_private_tag_even_group() {
        let mut dictionary = DicomDictionary::new();
        let entry = DictionaryEntry::new(
            TagId::new(0x0008, 0x0010),
            "Bad",
            "Bad",
            Vr::Lo,
            Multiplicity::one(),
        );
        assert!(matches!(
            dictionary.register_private_tag(entry, "ACME"),
            Err(DicomError::InvalidPrivateTag(_))
        ));
    }

    #[test]
    fn test_register_private_tag_element_too_large() {
        let mut dictionary = DicomDictionary::new();
        let entry = DictionaryEntry::new(
            TagId::new(0x0009, 0x0100),
            "Bad",
            "Bad",
            Vr::Lo,
            Multiplicity::one(),
        );
        assert!(dictionary.register_private_tag(entry, "ACME").is_err());
    }

    #[test]
    fn test_word_and_max_size_delegation() {
        assert_eq!(DicomDictionary::word_size(Vr::Us), 2);
        assert_eq!(DicomDictionary::word_size(Vr::Lo), 0);
        assert_eq!(DicomDictionary::max_size(Vr::Ae), 16);
        assert_eq!(DicomDictionary::max_size(Vr::Ob), 0);
    }
}
