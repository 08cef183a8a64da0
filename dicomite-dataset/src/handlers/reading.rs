use bytes::Bytes;
use dicomite_core::datatypes::{Age, DicomDate, PersonName};
use dicomite_core::{DicomError, DicomResult, Vr};

/// Value of one element in its buffer-native form, before the caller's
/// requested conversion is applied
pub(crate) enum Native {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

/// Read-only typed view over a tag's buffer
///
/// The view is frozen to the buffer snapshot existing when the handler
/// was obtained; later writes to the tag replace the buffer and are not
/// observed. Every getter attempts a VR-appropriate conversion and fails
/// with a conversion error naming the source VR, the requested type and
/// the index; it never substitutes a default or truncates silently.
#[derive(Debug, Clone)]
pub struct ReadingDataHandler {
    vr: Vr,
    memory: Bytes,
}

impl ReadingDataHandler {
    pub fn new(vr: Vr, memory: Bytes) -> Self {
        Self { vr, memory }
    }

    /// The VR of the underlying buffer
    pub fn vr(&self) -> Vr {
        self.vr
    }

    pub(crate) fn memory(&self) -> &Bytes {
        &self.memory
    }

    /// Number of elements in the buffer
    pub fn size(&self) -> usize {
        if self.memory.is_empty() {
            return 0;
        }
        let word = self.vr.word_size() as usize;
        if word > 0 {
            self.memory.len() / word
        } else if self.vr.is_single_value_text() || !self.vr.is_text() {
            1
        } else {
            self.memory.iter().filter(|&&b| b == b'\\').count() + 1
        }
    }

    fn check_index(&self, index: usize) -> DicomResult<()> {
        if index >= self.size() {
            Err(DicomError::index_out_of_bounds(index, self.size()))
        } else {
            Ok(())
        }
    }

    /// The raw bytes of the index-th text element, with the value
    /// separator applied and padding trimmed
    fn text_element(&self, index: usize) -> DicomResult<&str> {
        let raw = if self.vr.is_single_value_text() {
            &self.memory[..]
        } else {
            self.memory
                .split(|&b| b == b'\\')
                .nth(index)
                .ok_or_else(|| DicomError::index_out_of_bounds(index, self.size()))?
        };
        let text = std::str::from_utf8(raw)
            .map_err(|_| DicomError::conversion(self.vr, "string", index))?;
        Ok(text.trim_matches(['\0', ' ']))
    }

    /// Read the element in its buffer-native form
    pub(crate) fn native(&self, index: usize) -> DicomResult<Native> {
        self.check_index(index)?;
        let word = self.vr.word_size() as usize;
        if word > 0 {
            let bytes = &self.memory[index * word..(index + 1) * word];
            return Ok(match self.vr {
                Vr::Fl | Vr::Of => {
                    Native::Float(f32::from_le_bytes(bytes.try_into().unwrap()) as f64)
                }
                Vr::Fd | Vr::Od => Native::Float(f64::from_le_bytes(bytes.try_into().unwrap())),
                Vr::Ss => Native::Int(i16::from_le_bytes(bytes.try_into().unwrap()) as i64),
                Vr::Sl => Native::Int(i32::from_le_bytes(bytes.try_into().unwrap()) as i64),
                Vr::Sv => Native::Int(i64::from_le_bytes(bytes.try_into().unwrap())),
                Vr::Ob | Vr::Un => Native::Uint(bytes[0] as u64),
                Vr::Us | Vr::Ow => {
                    Native::Uint(u16::from_le_bytes(bytes.try_into().unwrap()) as u64)
                }
                Vr::Ul | Vr::Ol | Vr::At => {
                    Native::Uint(u32::from_le_bytes(bytes.try_into().unwrap()) as u64)
                }
                Vr::Uv | Vr::Ov => Native::Uint(u64::from_le_bytes(bytes.try_into().unwrap())),
                _ => unreachable!("fixed-word VRs are covered above"),
            });
        }
        Ok(Native::Text(self.text_element(index)?.to_string()))
    }

    fn to_i64(&self, index: usize) -> DicomResult<i64> {
        let fail = || DicomError::conversion(self.vr, "i64", index);
        match self.native(index)? {
            Native::Int(i) => Ok(i),
            Native::Uint(u) => i64::try_from(u).map_err(|_| fail()),
            Native::Float(f) => float_to_i64(f).ok_or_else(fail),
            Native::Text(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| s.trim().parse::<f64>().ok().and_then(float_to_i64))
                .ok_or_else(fail),
        }
    }

    fn to_u64(&self, index: usize) -> DicomResult<u64> {
        let fail = || DicomError::conversion(self.vr, "u64", index);
        match self.native(index)? {
            Native::Uint(u) => Ok(u),
            Native::Int(i) => u64::try_from(i).map_err(|_| fail()),
            Native::Float(f) => float_to_u64(f).ok_or_else(fail),
            Native::Text(s) => s
                .trim()
                .parse::<u64>()
                .ok()
                .or_else(|| s.trim().parse::<f64>().ok().and_then(float_to_u64))
                .ok_or_else(fail),
        }
    }

    pub fn get_i64(&self, index: usize) -> DicomResult<i64> {
        self.to_i64(index)
    }

    pub fn get_i32(&self, index: usize) -> DicomResult<i32> {
        i32::try_from(self.to_i64(index)?)
            .map_err(|_| DicomError::conversion(self.vr, "i32", index))
    }

    pub fn get_i16(&self, index: usize) -> DicomResult<i16> {
        i16::try_from(self.to_i64(index)?)
            .map_err(|_| DicomError::conversion(self.vr, "i16", index))
    }

    pub fn get_i8(&self, index: usize) -> DicomResult<i8> {
        i8::try_from(self.to_i64(index)?)
            .map_err(|_| DicomError::conversion(self.vr, "i8", index))
    }

    pub fn get_u64(&self, index: usize) -> DicomResult<u64> {
        self.to_u64(index)
    }

    pub fn get_u32(&self, index: usize) -> DicomResult<u32> {
        u32::try_from(self.to_u64(index)?)
            .map_err(|_| DicomError::conversion(self.vr, "u32", index))
    }

    pub fn get_u16(&self, index: usize) -> DicomResult<u16> {
        u16::try_from(self.to_u64(index)?)
            .map_err(|_| DicomError::conversion(self.vr, "u16", index))
    }

    pub fn get_u8(&self, index: usize) -> DicomResult<u8> {
        u8::try_from(self.to_u64(index)?)
            .map_err(|_| DicomError::conversion(self.vr, "u8", index))
    }

    pub fn get_f64(&self, index: usize) -> DicomResult<f64> {
        let fail = || DicomError::conversion(self.vr, "f64", index);
        match self.native(index)? {
            Native::Float(f) => Ok(f),
            Native::Int(i) => Ok(i as f64),
            Native::Uint(u) => Ok(u as f64),
            Native::Text(s) => s.trim().parse::<f64>().map_err(|_| fail()),
        }
    }

    pub fn get_f32(&self, index: usize) -> DicomResult<f32> {
        Ok(self.get_f64(index)? as f32)
    }

    pub fn get_string(&self, index: usize) -> DicomResult<String> {
        match self.native(index)? {
            Native::Text(s) => Ok(s),
            Native::Int(i) => Ok(i.to_string()),
            Native::Uint(u) => Ok(u.to_string()),
            Native::Float(f) => Ok(f.to_string()),
        }
    }

    pub fn get_date(&self, index: usize) -> DicomResult<DicomDate> {
        let fail = |_| DicomError::conversion(self.vr, "date", index);
        let text = match self.native(index)? {
            Native::Text(s) => s,
            _ => return Err(DicomError::conversion(self.vr, "date", index)),
        };
        match self.vr {
            Vr::Da => DicomDate::parse_da(&text).map_err(fail),
            Vr::Tm => DicomDate::parse_tm(&text).map_err(fail),
            _ => DicomDate::parse_dt(&text).map_err(fail),
        }
    }

    pub fn get_age(&self, index: usize) -> DicomResult<Age> {
        match self.native(index)? {
            Native::Text(s) => {
                Age::parse(&s).map_err(|_| DicomError::conversion(self.vr, "age", index))
            }
            _ => Err(DicomError::conversion(self.vr, "age", index)),
        }
    }

    pub fn get_person_name(&self, index: usize) -> DicomResult<PersonName> {
        match self.native(index)? {
            Native::Text(s) => Ok(PersonName::parse(&s)),
            _ => Err(DicomError::conversion(self.vr, "person name", index)),
        }
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn float_to_u64(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_handler(vr: Vr, text: &str) -> ReadingDataHandler {
        ReadingDataHandler::new(vr, Bytes::copy_from_slice(text.as_bytes()))
    }

    #[test]
    fn test_size_text_values() {
        assert_eq!(text_handler(Vr::Is, "1\\2\\3").size(), 3);
        assert_eq!(text_handler(Vr::Lo, "").size(), 0);
        assert_eq!(text_handler(Vr::Ut, "a\\b").size(), 1);
    }

    #[test]
    fn test_numeric_string_parsing() {
        let handler = text_handler(Vr::Is, "10\\-42");
        assert_eq!(handler.get_i32(0).unwrap(), 10);
        assert_eq!(handler.get_i32(1).unwrap(), -42);
        assert!(matches!(
            handler.get_u32(1),
            Err(DicomError::Conversion { index: 1, .. })
        ));
    }

    #[test]
    fn test_non_numeric_text_fails() {
        let handler = text_handler(Vr::Lo, "HELLO");
        let err = handler.get_i32(0).unwrap_err();
        match err {
            DicomError::Conversion {
                from,
                requested,
                index,
            } => {
                assert_eq!(from, Vr::Lo);
                assert_eq!(requested, "i32");
                assert_eq!(index, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_binary_words() {
        let handler = ReadingDataHandler::new(
            Vr::Us,
            Bytes::from_static(&[0x34, 0x12, 0xFF, 0xFF]),
        );
        assert_eq!(handler.size(), 2);
        assert_eq!(handler.get_u16(0).unwrap(), 0x1234);
        assert_eq!(handler.get_u32(1).unwrap(), 0xFFFF);
        // 0xFFFF does not fit an i16
        assert!(handler.get_i16(1).is_err());
        assert_eq!(handler.get_string(0).unwrap(), "4660");
    }

    #[test]
    fn test_index_out_of_range() {
        let handler = text_handler(Vr::Lo, "one");
        assert!(matches!(handler.get_string(1), Err(DicomError::Range(_))));
    }

    #[test]
    fn test_date_parsing() {
        let handler = text_handler(Vr::Da, "20231201");
        let date = handler.get_date(0).unwrap();
        assert_eq!(date.year(), 2023);
        assert!(text_handler(Vr::Da, "abc").get_date(0).is_err());
    }

    #[test]
    fn test_decimal_string() {
        let handler = text_handler(Vr::Ds, "1.25\\-0.5");
        assert!((handler.get_f64(0).unwrap() - 1.25).abs() < f64::EPSILON);
        assert_eq!(handler.get_i32(0).unwrap(), 1);
    }

    #[test]
    fn test_person_name() {
        let handler = text_handler(Vr::Pn, "Doe^John");
        assert_eq!(handler.get_person_name(0).unwrap().alphabetic(), "Doe^John");
    }

    #[test]
    fn test_age() {
        let handler = text_handler(Vr::As, "030Y");
        assert_eq!(handler.get_age(0).unwrap().value(), 30);
    }
}
