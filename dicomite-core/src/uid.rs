//! Unique identifier generation
//!
//! DICOM instances (SOP, study, series) need globally unique UIDs rooted
//! at an organization's registered root. The generator seeds a random
//! session component once and appends a monotonically increasing counter,
//! so UIDs produced within a process never repeat.

use crate::error::{DicomError, DicomResult};
use rand::Rng;
use std::collections::HashMap;

/// Generates unique UIDs under a registered root
#[derive(Debug)]
pub struct RandomUidGenerator {
    prefix: String,
    counter: u64,
}

impl RandomUidGenerator {
    /// Create a new generator
    ///
    /// # Arguments
    ///
    /// * `root` - the organization's UID root (e.g. "1.2.826.0.1.3680043")
    /// * `department_id` - department component appended to the root
    /// * `model_id` - software/model component appended to the department
    pub fn new(root: &str, department_id: u32, model_id: u32) -> DicomResult<Self> {
        if root.is_empty()
            || !root
                .split('.')
                .all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(DicomError::InvalidData(format!("invalid UID root: {}", root)));
        }
        let session: u64 = rand::thread_rng().gen();
        Ok(Self {
            prefix: format!("{}.{}.{}.{}", root, department_id, model_id, session),
            counter: 0,
        })
    }

    /// Return a new unique UID
    pub fn get_uid(&mut self) -> String {
        self.counter += 1;
        format!("{}.{}", self.prefix, self.counter)
    }
}

/// Registry of named UID generators
///
/// An owned registry rather than process-global state: create one per
/// application, register the generators at startup, look them up by name
/// afterwards.
#[derive(Debug, Default)]
pub struct UidGeneratorRegistry {
    generators: HashMap<String, RandomUidGenerator>,
}

impl UidGeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator under a name, replacing any previous one
    pub fn register(&mut self, name: &str, generator: RandomUidGenerator) {
        self.generators.insert(name.to_string(), generator);
    }

    /// Retrieve a registered generator
    pub fn get(&mut self, name: &str) -> DicomResult<&mut RandomUidGenerator> {
        self.generators
            .get_mut(name)
            .ok_or_else(|| DicomError::InvalidData(format!("no UID generator named {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uids_are_unique() {
        let mut generator = RandomUidGenerator::new("1.2.840.99999", 1, 1).unwrap();
        let first = generator.get_uid();
        let second = generator.get_uid();
        assert_ne!(first, second);
        assert!(first.starts_with("1.2.840.99999.1.1."));
    }

    #[test]
    fn test_invalid_root_rejected() {
        assert!(RandomUidGenerator::new("", 1, 1).is_err());
        assert!(RandomUidGenerator::new("1..2", 1, 1).is_err());
        assert!(RandomUidGenerator::new("1.2a", 1, 1).is_err());
    }

    #[test]
    fn test_registry() {
        let mut registry = UidGeneratorRegistry::new();
        registry.register(
            "sop",
            RandomUidGenerator::new("1.2.840.99999", 2, 3).unwrap(),
        );
        assert!(registry.get("sop").is_ok());
        assert!(registry.get("missing").is_err());
    }
}
