//! Data set serialization for the native DICOM transfer syntaxes
//!
//! [`DataSetEncoder`] writes a data set through any
//! [`StreamOutput`](dicomite_transport::StreamOutput);
//! [`DataSetDecoder`] rebuilds one from any
//! [`StreamInput`](dicomite_transport::StreamInput). Implicit and
//! explicit VR, little and big endian are supported; compressed and
//! encapsulated syntaxes are handled by external codecs.

pub mod decoder;
pub mod encoder;
mod wire;

pub use decoder::{decode_bytes, DataSetDecoder};
pub use encoder::DataSetEncoder;
pub use dicomite_core::{Endianness, TransferSyntax};
