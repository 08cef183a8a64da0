//! Person name value type for the PN value representation

use serde::{Deserialize, Serialize};
use std::fmt;

/// A person name, as stored by the PN value representation
///
/// PN values carry up to three representation groups separated by '=':
/// alphabetic, ideographic and phonetic. Components inside each group are
/// separated by '^' (family, given, middle, prefix, suffix); this type
/// keeps each group as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonName {
    alphabetic: String,
    ideographic: String,
    phonetic: String,
}

impl PersonName {
    /// Constructs a person name from its representation groups
    pub fn new(
        alphabetic: impl Into<String>,
        ideographic: impl Into<String>,
        phonetic: impl Into<String>,
    ) -> Self {
        Self {
            alphabetic: alphabetic.into(),
            ideographic: ideographic.into(),
            phonetic: phonetic.into(),
        }
    }

    /// Parse a PN value
    pub fn parse(text: &str) -> Self {
        let mut groups = text.splitn(3, '=');
        Self {
            alphabetic: groups.next().unwrap_or("").to_string(),
            ideographic: groups.next().unwrap_or("").to_string(),
            phonetic: groups.next().unwrap_or("").to_string(),
        }
    }

    /// The alphabetic representation of the person name
    pub fn alphabetic(&self) -> &str {
        &self.alphabetic
    }

    /// The ideographic representation of the person name
    pub fn ideographic(&self) -> &str {
        &self.ideographic
    }

    /// The phonetic representation of the person name
    pub fn phonetic(&self) -> &str {
        &self.phonetic
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Trailing empty groups and their separators are omitted
        if !self.phonetic.is_empty() {
            write!(f, "{}={}={}", self.alphabetic, self.ideographic, self.phonetic)
        } else if !self.ideographic.is_empty() {
            write!(f, "{}={}", self.alphabetic, self.ideographic)
        } else {
            write!(f, "{}", self.alphabetic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_parse() {
        let name = PersonName::parse("Doe^John");
        assert_eq!(name.alphabetic(), "Doe^John");
        assert_eq!(name.ideographic(), "");
        assert_eq!(name.to_string(), "Doe^John");
    }

    #[test]
    fn test_person_name_groups() {
        let name = PersonName::parse("Yamada^Tarou=山田^太郎=やまだ^たろう");
        assert_eq!(name.alphabetic(), "Yamada^Tarou");
        assert_eq!(name.ideographic(), "山田^太郎");
        assert_eq!(name.phonetic(), "やまだ^たろう");
        assert_eq!(name.to_string(), "Yamada^Tarou=山田^太郎=やまだ^たろう");
    }

    #[test]
    fn test_trailing_groups_trimmed() {
        let name = PersonName::new("Doe^Jane", "", "");
        assert_eq!(name.to_string(), "Doe^Jane");
    }
}
