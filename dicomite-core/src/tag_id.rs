use crate::error::{DicomError, DicomResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static TAG_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?([0-9a-fA-F]{4})\s*,\s*([0-9a-fA-F]{4})\)?$").unwrap());

/// Identifier of a DICOM tag: a (group, element) pair
///
/// Tag identifiers are immutable once constructed. Private tags occupy odd
/// groups with an element lower than or equal to 0xFF, and are further
/// qualified by a company identifier when registered in a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId {
    group: u16,
    element: u16,
}

impl TagId {
    /// Create a new tag identifier
    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }

    /// Parse a tag identifier from string format
    ///
    /// Supports formats like:
    /// - "0010,0010"
    /// - "(0010,0010)"
    pub fn from_string(s: &str) -> DicomResult<Self> {
        let captures = TAG_FORMAT.captures(s.trim()).ok_or_else(|| {
            DicomError::Range(format!("invalid tag identifier format: {}", s))
        })?;

        // The regex guarantees 4 hex digits per capture
        let group = u16::from_str_radix(&captures[1], 16).unwrap();
        let element = u16::from_str_radix(&captures[2], 16).unwrap();
        Ok(Self { group, element })
    }

    /// Get the group number
    pub const fn group(&self) -> u16 {
        self.group
    }

    /// Get the element number
    pub const fn element(&self) -> u16 {
        self.element
    }

    /// Check whether this tag lies in a private group (odd group number)
    pub const fn is_private(&self) -> bool {
        self.group % 2 == 1
    }

    /// Check whether this tag may be registered as a private tag
    ///
    /// Private tags must have an odd group number and an element lower than
    /// or equal to 0xFF.
    pub const fn is_valid_private(&self) -> bool {
        self.is_private() && self.element <= 0xFF
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.group, self.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_id_accessors() {
        let tag = TagId::new(0x0010, 0x0010);
        assert_eq!(tag.group(), 0x0010);
        assert_eq!(tag.element(), 0x0010);
        assert!(!tag.is_private());
    }

    #[test]
    fn test_tag_id_from_string() {
        assert_eq!(
            TagId::from_string("0008,0060").unwrap(),
            TagId::new(0x0008, 0x0060)
        );
        assert_eq!(
            TagId::from_string("(7FE0,0010)").unwrap(),
            TagId::new(0x7FE0, 0x0010)
        );
        assert!(TagId::from_string("10,10").is_err());
        assert!(TagId::from_string("00100010").is_err());
    }

    #[test]
    fn test_tag_id_display() {
        assert_eq!(TagId::new(0x7FE0, 0x0010).to_string(), "(7FE0,0010)");
    }

    #[test]
    fn test_private_tag_validation() {
        assert!(TagId::new(0x0009, 0x0010).is_valid_private());
        assert!(!TagId::new(0x0008, 0x0010).is_valid_private());
        assert!(!TagId::new(0x0009, 0x0100).is_valid_private());
    }
}
