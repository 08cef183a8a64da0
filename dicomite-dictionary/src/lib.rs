//! DICOM tag dictionary
//!
//! Maps (group, element) tag identifiers to their description, default VR
//! and multiplicity bounds, and supports private-tag registration.

pub mod dictionary;
pub mod entry;
pub mod standard;

pub use dictionary::{standard, DicomDictionary};
pub use entry::{DictionaryEntry, Multiplicity};
