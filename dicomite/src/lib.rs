//! dicomite - DICOM data-set toolkit
//!
//! This library provides an in-memory DICOM document model with typed
//! data handlers, a tag dictionary, native transfer-syntax
//! serialization and a stream/network transport layer.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `dicomite-core`: Tag identifiers, VRs, transfer syntaxes, DICOM
//!   value types, error handling and UID generation
//! - `dicomite-dictionary`: Standard tag dictionary and private-tag
//!   registration
//! - `dicomite-dataset`: Data sets, tags, data handlers and overlays
//! - `dicomite-codec`: Data set encoder/decoder for the native
//!   transfer syntaxes
//! - `dicomite-transport`: File/Memory/TCP streams and TCP addressing
//!
//! # Usage
//!
//! ```no_run
//! use dicomite::{DataSet, TagId};
//!
//! let mut dataset = DataSet::new();
//! dataset
//!     .set_string(TagId::new(0x0010, 0x0010), "DOE^JOHN")
//!     .unwrap();
//! ```

// Re-export core types
pub use dicomite_core::datatypes::*;
pub use dicomite_core::{
    DicomError, DicomResult, Endianness, RandomUidGenerator, TagId, TransferSyntax,
    UidGeneratorRegistry, Vr,
};

// Re-export the document model
pub use dicomite_dataset::{
    DataSet, Image, MutableMemory, Overlay, OverlayType, ReadingDataHandler,
    ReadingDataHandlerNumeric, Tag, TagValue, WritingDataHandler, WritingDataHandlerNumeric,
};

// Re-export the dictionary API
pub mod dictionary {
    pub use dicomite_dictionary::*;
}

// Re-export the serialization API
pub mod codec {
    pub use dicomite_codec::*;
}

// Re-export the stream and network API
pub mod transport {
    pub use dicomite_transport::*;
}
