//! Date/time value type for the DA, TM and DT value representations

use crate::error::{DicomError, DicomResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DICOM date/time value
///
/// A single structure backs the three date-bearing VRs: DA stores only the
/// date part, TM only the time part, DT the full value with an optional
/// UTC offset. Unset parts are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicomDate {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanoseconds: u32,
    offset_hours: i8,
    offset_minutes: i8,
}

impl DicomDate {
    /// Constructs a DICOM date/time value
    ///
    /// # Arguments
    ///
    /// * `year` - The year (0 allowed for time-only values)
    /// * `month` - The month from 1 to 12, or 0 when unset
    /// * `day` - The day of the month from 1 to 31, or 0 when unset
    /// * `hour` - The hour from 0 to 23
    /// * `minute` - The minute from 0 to 59
    /// * `second` - The second from 0 to 60 (leap second allowed)
    /// * `nanoseconds` - Sub-second part in nanoseconds
    ///
    /// # Errors
    ///
    /// Returns an error if parameters are out of range
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanoseconds: u32,
    ) -> DicomResult<Self> {
        if month > 12 || (month == 0 && day != 0) {
            return Err(DicomError::InvalidData(format!("invalid month: {}", month)));
        }
        if day > 31 {
            return Err(DicomError::InvalidData(format!("invalid day: {}", day)));
        }
        if hour > 23 {
            return Err(DicomError::InvalidData(format!("invalid hour: {}", hour)));
        }
        if minute > 59 {
            return Err(DicomError::InvalidData(format!(
                "invalid minute: {}",
                minute
            )));
        }
        if second > 60 {
            return Err(DicomError::InvalidData(format!(
                "invalid second: {}",
                second
            )));
        }
        if nanoseconds > 999_999_999 {
            return Err(DicomError::InvalidData(format!(
                "invalid nanoseconds: {}",
                nanoseconds
            )));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanoseconds,
            offset_hours: 0,
            offset_minutes: 0,
        })
    }

    /// Constructs a date-only value (DA)
    pub fn from_date(year: u16, month: u8, day: u8) -> DicomResult<Self> {
        Self::new(year, month, day, 0, 0, 0, 0)
    }

    /// Set the UTC offset carried by a DT value
    pub fn with_offset(mut self, offset_hours: i8, offset_minutes: i8) -> DicomResult<Self> {
        if !(-12..=14).contains(&offset_hours) || !(0..=59).contains(&(offset_minutes as i16).abs())
        {
            return Err(DicomError::InvalidData(format!(
                "invalid UTC offset: {:+03}{:02}",
                offset_hours, offset_minutes
            )));
        }
        self.offset_hours = offset_hours;
        self.offset_minutes = offset_minutes;
        Ok(self)
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn nanoseconds(&self) -> u32 {
        self.nanoseconds
    }

    pub fn offset_hours(&self) -> i8 {
        self.offset_hours
    }

    pub fn offset_minutes(&self) -> i8 {
        self.offset_minutes
    }

    /// Parse a DA value ("YYYYMMDD")
    pub fn parse_da(text: &str) -> DicomResult<Self> {
        let text = text.trim();
        if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DicomError::InvalidData(format!("invalid DA value: {}", text)));
        }
        let year = text[0..4].parse::<u16>().unwrap();
        let month = text[4..6].parse::<u8>().unwrap();
        let day = text[6..8].parse::<u8>().unwrap();
        Self::from_date(year, month, day)
    }

    /// Parse a TM value ("HHMMSS.FFFFFF", trailing components optional)
    pub fn parse_tm(text: &str) -> DicomResult<Self> {
        let text = text.trim();
        let (clock, fraction) = match text.split_once('.') {
            Some((clock, fraction)) => (clock, Some(fraction)),
            None => (text, None),
        };
        if clock.is_empty() || clock.len() > 6 || clock.len() % 2 != 0
            || !clock.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(DicomError::InvalidData(format!("invalid TM value: {}", text)));
        }
        let hour = clock[0..2].parse::<u8>().unwrap();
        let minute = if clock.len() >= 4 {
            clock[2..4].parse::<u8>().unwrap()
        } else {
            0
        };
        let second = if clock.len() >= 6 {
            clock[4..6].parse::<u8>().unwrap()
        } else {
            0
        };
        let nanoseconds = match fraction {
            Some(f) => parse_fraction(f)?,
            None => 0,
        };
        Self::new(0, 0, 0, hour, minute, second, nanoseconds)
    }

    /// Parse a DT value ("YYYYMMDDHHMMSS.FFFFFF&ZZXX", trailing components
    /// optional)
    pub fn parse_dt(text: &str) -> DicomResult<Self> {
        let text = text.trim();
        let (body, offset) = match text.find(['+', '-']) {
            Some(pos) => (&text[..pos], Some(&text[pos..])),
            None => (text, None),
        };
        if body.len() < 4 || !body[..body.len().min(8)].bytes().all(|b| b.is_ascii_digit()) {
            return Err(DicomError::InvalidData(format!("invalid DT value: {}", text)));
        }
        let year = body[0..4].parse::<u16>().unwrap();
        let month = if body.len() >= 6 {
            body[4..6].parse::<u8>().map_err(|_| {
                DicomError::InvalidData(format!("invalid DT value: {}", text))
            })?
        } else {
            0
        };
        let day = if body.len() >= 8 {
            body[6..8].parse::<u8>().map_err(|_| {
                DicomError::InvalidData(format!("invalid DT value: {}", text))
            })?
        } else {
            0
        };
        let time = if body.len() > 8 {
            Self::parse_tm(&body[8..])?
        } else {
            Self::new(0, 0, 0, 0, 0, 0, 0)?
        };
        let date = Self::new(
            year,
            month,
            day,
            time.hour,
            time.minute,
            time.second,
            time.nanoseconds,
        )?;
        match offset {
            Some(offset) => {
                if offset.len() != 5 || !offset[1..].bytes().all(|b| b.is_ascii_digit()) {
                    return Err(DicomError::InvalidData(format!(
                        "invalid DT offset: {}",
                        offset
                    )));
                }
                let sign: i8 = if offset.starts_with('-') { -1 } else { 1 };
                let hours = offset[1..3].parse::<i8>().unwrap();
                let minutes = offset[3..5].parse::<i8>().unwrap();
                date.with_offset(sign * hours, sign * minutes)
            }
            None => Ok(date),
        }
    }

    /// Format as a DA value
    pub fn format_da(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }

    /// Format as a TM value
    pub fn format_tm(&self) -> String {
        let mut out = format!("{:02}{:02}{:02}", self.hour, self.minute, self.second);
        if self.nanoseconds != 0 {
            out.push_str(&format!(".{:06}", self.nanoseconds / 1000));
        }
        out
    }

    /// Format as a DT value
    pub fn format_dt(&self) -> String {
        let mut out = format!("{}{}", self.format_da(), self.format_tm());
        if self.offset_hours != 0 || self.offset_minutes != 0 {
            let sign = if self.offset_hours < 0 || self.offset_minutes < 0 {
                '-'
            } else {
                '+'
            };
            out.push_str(&format!(
                "{}{:02}{:02}",
                sign,
                self.offset_hours.unsigned_abs(),
                self.offset_minutes.unsigned_abs()
            ));
        }
        out
    }
}

fn parse_fraction(fraction: &str) -> DicomResult<u32> {
    if fraction.is_empty() || fraction.len() > 6 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DicomError::InvalidData(format!(
            "invalid fractional seconds: {}",
            fraction
        )));
    }
    let micros = fraction.parse::<u32>().unwrap() * 10u32.pow(6 - fraction.len() as u32);
    Ok(micros * 1000)
}

impl fmt::Display for DicomDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_dt())
    }
}
