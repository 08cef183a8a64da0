//! Typed read/write views over a single tag's buffer
//!
//! Reading handlers are bound to the buffer snapshot existing when they
//! are obtained; writing handlers stage values and swap the tag's buffer
//! atomically on commit. Numeric specializations add raw memory access
//! and element-wise conversion between differently typed buffers.

pub mod numeric;
pub mod reading;
pub mod writing;

pub use numeric::{ReadingDataHandlerNumeric, WritingDataHandlerNumeric};
pub use reading::ReadingDataHandler;
pub use writing::WritingDataHandler;
