use dicomite_core::{DicomError, DicomResult, TagId, Vr};

/// Multiplicity bounds of a tag: how many values it may hold
///
/// `max == 0` means unbounded. When bounded, valid counts are
/// `min, min + step, ..., max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl Multiplicity {
    /// Create multiplicity bounds
    ///
    /// # Errors
    ///
    /// Returns an error when `min > max` (with `max` finite) or when the
    /// step does not divide the `max - min` span.
    pub fn new(min: u32, max: u32, step: u32) -> DicomResult<Self> {
        if max != 0 && min > max {
            return Err(DicomError::InvalidData(format!(
                "multiplicity minimum {} exceeds maximum {}",
                min, max
            )));
        }
        if max != 0 && step != 0 && (max - min) % step != 0 {
            return Err(DicomError::InvalidData(format!(
                "multiplicity step {} does not divide the range [{}, {}]",
                step, min, max
            )));
        }
        Ok(Self { min, max, step })
    }

    /// A single mandatory value
    pub const fn one() -> Self {
        Self {
            min: 1,
            max: 1,
            step: 1,
        }
    }

    /// One or more values
    pub const fn unbounded() -> Self {
        Self {
            min: 1,
            max: 0,
            step: 1,
        }
    }

    /// Check a value count against these bounds
    pub fn check(&self, tag: TagId, count: u32) -> DicomResult<()> {
        let in_bounds = count >= self.min
            && (self.max == 0 || count <= self.max)
            && (self.step <= 1 || (count - self.min) % self.step == 0);
        if in_bounds {
            Ok(())
        } else {
            Err(DicomError::Multiplicity {
                tag,
                count,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// A single entry of the tag dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub tag: TagId,
    pub name: String,
    pub keyword: String,
    pub vr: Vr,
    pub multiplicity: Multiplicity,
}

impl DictionaryEntry {
    pub fn new(
        tag: TagId,
        name: &str,
        keyword: &str,
        vr: Vr,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            tag,
            name: name.to_string(),
            keyword: keyword.to_string(),
            vr,
            multiplicity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicity_validation() {
        assert!(Multiplicity::new(1, 1, 1).is_ok());
        assert!(Multiplicity::new(2, 1, 1).is_err());
        assert!(Multiplicity::new(1, 0, 1).is_ok());
        assert!(Multiplicity::new(2, 7, 2).is_err());
        assert!(Multiplicity::new(2, 8, 2).is_ok());
    }

    #[test]
    fn test_multiplicity_check() {
        let tag = TagId::new(0x0020, 0x0032);
        let m = Multiplicity::new(3, 3, 1).unwrap();
        assert!(m.check(tag, 3).is_ok());
        assert!(matches!(
            m.check(tag, 2),
            Err(DicomError::Multiplicity { count: 2, .. })
        ));

        let unbounded = Multiplicity::unbounded();
        assert!(unbounded.check(tag, 40).is_ok());
        assert!(unbounded.check(tag, 0).is_err());
    }

    #[test]
    fn test_multiplicity_step() {
        let tag = TagId::new(0x0018, 0x1149);
        let m = Multiplicity::new(2, 6, 2).unwrap();
        assert!(m.check(tag, 4).is_ok());
        assert!(m.check(tag, 3).is_err());
    }
}
