use crate::error::{DicomError, DicomResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte order of a transfer syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endianness {
    Little,
    Big,
}

/// The native DICOM transfer syntaxes
///
/// The transfer syntax is the encoding convention (VR explicitness, byte
/// order) attached to a data set and used when serializing it. Compressed
/// and encapsulated syntaxes are handled by external codecs and are not
/// part of this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferSyntax {
    ImplicitVrLittleEndian,
    ExplicitVrLittleEndian,
    ExplicitVrBigEndian,
}

impl TransferSyntax {
    /// The registered UID of this transfer syntax
    pub const fn uid(&self) -> &'static str {
        match self {
            TransferSyntax::ImplicitVrLittleEndian => "1.2.840.10008.1.2",
            TransferSyntax::ExplicitVrLittleEndian => "1.2.840.10008.1.2.1",
            TransferSyntax::ExplicitVrBigEndian => "1.2.840.10008.1.2.2",
        }
    }

    /// Resolve a transfer syntax from its UID
    pub fn from_uid(uid: &str) -> DicomResult<Self> {
        // Trailing NUL padding is tolerated, UI values are NUL padded
        let uid = uid.trim_end_matches('\0').trim();
        match uid {
            "1.2.840.10008.1.2" => Ok(TransferSyntax::ImplicitVrLittleEndian),
            "1.2.840.10008.1.2.1" => Ok(TransferSyntax::ExplicitVrLittleEndian),
            "1.2.840.10008.1.2.2" => Ok(TransferSyntax::ExplicitVrBigEndian),
            _ => Err(DicomError::Codec(format!(
                "unsupported transfer syntax: {}",
                uid
            ))),
        }
    }

    /// Whether element headers carry an explicit VR code
    pub const fn is_explicit_vr(&self) -> bool {
        !matches!(self, TransferSyntax::ImplicitVrLittleEndian)
    }

    /// Byte order of element headers and binary values
    pub const fn endianness(&self) -> Endianness {
        match self {
            TransferSyntax::ExplicitVrBigEndian => Endianness::Big,
            _ => Endianness::Little,
        }
    }
}

impl Default for TransferSyntax {
    fn default() -> Self {
        TransferSyntax::ExplicitVrLittleEndian
    }
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_round_trip() {
        for ts in [
            TransferSyntax::ImplicitVrLittleEndian,
            TransferSyntax::ExplicitVrLittleEndian,
            TransferSyntax::ExplicitVrBigEndian,
        ] {
            assert_eq!(TransferSyntax::from_uid(ts.uid()).unwrap(), ts);
        }
    }

    #[test]
    fn test_padded_uid_accepted() {
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2\0").unwrap(),
            TransferSyntax::ImplicitVrLittleEndian
        );
    }

    #[test]
    fn test_unknown_uid_rejected() {
        assert!(TransferSyntax::from_uid("1.2.840.10008.1.2.4.50").is_err());
    }
}
