//! DICOM value datatypes
//!
//! Typed forms of the text encodings used by the DA/TM/DT, AS and PN
//! value representations.

pub mod age;
pub mod date;
pub mod person_name;

pub use age::{Age, AgeUnits};
pub use date::DicomDate;
pub use person_name::PersonName;
