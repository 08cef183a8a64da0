//! Age value type for the AS value representation

use crate::error::{DicomError, DicomResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static AGE_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{3})([DWMY])$").unwrap());

/// Units of an age value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeUnits {
    Days,
    Weeks,
    Months,
    Years,
}

impl AgeUnits {
    fn code(&self) -> char {
        match self {
            AgeUnits::Days => 'D',
            AgeUnits::Weeks => 'W',
            AgeUnits::Months => 'M',
            AgeUnits::Years => 'Y',
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code {
            'D' => Some(AgeUnits::Days),
            'W' => Some(AgeUnits::Weeks),
            'M' => Some(AgeUnits::Months),
            'Y' => Some(AgeUnits::Years),
            _ => None,
        }
    }
}

/// An age, as stored by the AS value representation ("nnnU")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    value: u32,
    units: AgeUnits,
}

impl Age {
    /// Constructs an age value
    ///
    /// The AS text form allows at most three digits.
    pub fn new(value: u32, units: AgeUnits) -> DicomResult<Self> {
        if value > 999 {
            return Err(DicomError::InvalidData(format!(
                "age value {} does not fit the AS format",
                value
            )));
        }
        Ok(Self { value, units })
    }

    /// Parse an AS value
    pub fn parse(text: &str) -> DicomResult<Self> {
        let captures = AGE_FORMAT.captures(text.trim()).ok_or_else(|| {
            DicomError::InvalidData(format!("invalid AS value: {}", text))
        })?;
        let value = captures[1].parse::<u32>().unwrap();
        let units = AgeUnits::from_code(captures[2].chars().next().unwrap()).unwrap();
        Ok(Self { value, units })
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn units(&self) -> AgeUnits {
        self.units
    }

    /// The age expressed in years
    pub fn years(&self) -> f64 {
        match self.units {
            AgeUnits::Days => self.value as f64 / 365.0,
            AgeUnits::Weeks => self.value as f64 * 7.0 / 365.0,
            AgeUnits::Months => self.value as f64 / 12.0,
            AgeUnits::Years => self.value as f64,
        }
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}{}", self.value, self.units.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_round_trip() {
        let age = Age::parse("018Y").unwrap();
        assert_eq!(age.value(), 18);
        assert_eq!(age.units(), AgeUnits::Years);
        assert_eq!(age.to_string(), "018Y");
    }

    #[test]
    fn test_age_years_conversion() {
        let age = Age::new(24, AgeUnits::Months).unwrap();
        assert!((age.years() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_age_invalid() {
        assert!(Age::parse("18Y").is_err());
        assert!(Age::parse("018X").is_err());
        assert!(Age::new(1000, AgeUnits::Days).is_err());
    }
}
