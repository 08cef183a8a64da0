use crate::tag_id::TagId;
use crate::vr::Vr;
use thiserror::Error;

/// Main error type for dicomite operations
#[derive(Error, Debug)]
pub enum DicomError {
    #[error("Tag {tag} not found in the dictionary")]
    NotFound { tag: TagId },

    #[error("Tag {tag} is not present in the data set")]
    MissingTag { tag: TagId },

    #[error("Cannot convert value at index {index} from VR {from} to {requested}")]
    Conversion {
        from: Vr,
        requested: &'static str,
        index: usize,
    },

    #[error("Range error: {0}")]
    Range(String),

    #[error("Frame {frame} requested but only {frames_count} frame(s) are available")]
    FrameRange { frame: usize, frames_count: usize },

    #[error("Tag {tag} holds {count} value(s), outside the allowed multiplicity [{min}, {max}]")]
    Multiplicity {
        tag: TagId,
        count: u32,
        min: u32,
        max: u32,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid private tag: {0}")]
    InvalidPrivateTag(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open file for writing: {0}")]
    FileOpen(String),

    #[error("The stream is closed")]
    StreamClosed,

    #[error("Address resolution failed: {0}")]
    AddressResolution(String),

    #[error("The socket is not connected yet")]
    NotConnected,

    #[error("Malformed DICOM stream: {0}")]
    Codec(String),
}

/// Result type alias for dicomite operations
pub type DicomResult<T> = Result<T, DicomError>;

impl DicomError {
    /// Build a conversion error for a typed getter
    pub fn conversion(from: Vr, requested: &'static str, index: usize) -> Self {
        DicomError::Conversion {
            from,
            requested,
            index,
        }
    }

    /// Build a range error for an out-of-bounds index
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        DicomError::Range(format!("index {} out of bounds (size {})", index, size))
    }
}
