//! In-memory DICOM document model
//!
//! A `DataSet` owns an insertion-ordered collection of tags. Each tag
//! holds immutable buffer snapshots (or nested data sets for sequences);
//! typed access goes through transient data handlers bound to a buffer
//! snapshot, so concurrent readers are isolated from later writes.

pub mod dataset;
pub mod handlers;
pub mod memory;
pub mod overlay;
pub mod tag;

pub use dataset::DataSet;
pub use handlers::{
    ReadingDataHandler, ReadingDataHandlerNumeric, WritingDataHandler, WritingDataHandlerNumeric,
};
pub use memory::MutableMemory;
pub use overlay::{Image, Overlay, OverlayType};
pub use tag::{Tag, TagValue};
