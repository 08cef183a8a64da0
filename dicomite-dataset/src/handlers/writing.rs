use crate::dataset::DataSet;
use crate::memory::MutableMemory;
use bytes::Bytes;
use dicomite_core::datatypes::{Age, DicomDate, PersonName};
use dicomite_core::{DicomError, DicomResult, TagId, Vr};

/// Staged values of a writing handler, in the buffer's native encoding
#[derive(Debug)]
pub(crate) enum Staged {
    Text(Vec<String>),
    Binary(MutableMemory),
}

/// Write-only typed view staging a tag's new buffer
///
/// Setters collect values into staging storage; `commit` validates the
/// value count against the dictionary's multiplicity bounds and swaps the
/// tag's buffer in a single step. Dropping the handler without committing
/// discards every staged write, so a failed or abandoned write never
/// leaves the tag partially mutated.
#[derive(Debug)]
pub struct WritingDataHandler<'a> {
    dataset: &'a mut DataSet,
    tag: TagId,
    vr: Vr,
    staged: Staged,
}

impl<'a> WritingDataHandler<'a> {
    pub(crate) fn new(dataset: &'a mut DataSet, tag: TagId, vr: Vr) -> Self {
        let staged = if vr.word_size() > 0 {
            Staged::Binary(MutableMemory::new())
        } else {
            Staged::Text(Vec::new())
        };
        Self {
            dataset,
            tag,
            vr,
            staged,
        }
    }

    pub fn vr(&self) -> Vr {
        self.vr
    }

    /// Current number of staged elements
    pub fn size(&self) -> usize {
        match &self.staged {
            Staged::Text(values) => values.len(),
            Staged::Binary(memory) => memory.size() / self.vr.word_size() as usize,
        }
    }

    /// Change the number of staged elements; new elements are empty/zero
    pub fn resize(&mut self, count: usize) {
        match &mut self.staged {
            Staged::Text(values) => values.resize(count, String::new()),
            Staged::Binary(memory) => memory.resize(count * self.vr.word_size() as usize),
        }
    }

    fn check_index(&self, index: usize) -> DicomResult<()> {
        if index >= self.size() {
            Err(DicomError::index_out_of_bounds(index, self.size()))
        } else {
            Ok(())
        }
    }

    fn store_text(&mut self, index: usize, value: String) -> DicomResult<()> {
        self.check_index(index)?;
        match &mut self.staged {
            Staged::Text(values) => {
                values[index] = value;
                Ok(())
            }
            Staged::Binary(_) => unreachable!("binary staging has a fixed word size"),
        }
    }

    fn store_word(&mut self, index: usize, bytes: &[u8]) -> DicomResult<()> {
        self.check_index(index)?;
        let word = self.vr.word_size() as usize;
        match &mut self.staged {
            Staged::Binary(memory) => memory.assign_region(bytes, index * word),
            Staged::Text(_) => unreachable!("text staging has no word size"),
        }
    }

    fn store_i64(&mut self, index: usize, value: i64) -> DicomResult<()> {
        let fail = || DicomError::conversion(self.vr, "stored integer", index);
        match self.vr {
            Vr::Ss => {
                let v = i16::try_from(value).map_err(|_| fail())?;
                self.store_word(index, &v.to_le_bytes())
            }
            Vr::Sl => {
                let v = i32::try_from(value).map_err(|_| fail())?;
                self.store_word(index, &v.to_le_bytes())
            }
            Vr::Sv => self.store_word(index, &value.to_le_bytes()),
            Vr::Ob | Vr::Un => {
                let v = u8::try_from(value).map_err(|_| fail())?;
                self.store_word(index, &[v])
            }
            Vr::Us | Vr::Ow => {
                let v = u16::try_from(value).map_err(|_| fail())?;
                self.store_word(index, &v.to_le_bytes())
            }
            Vr::Ul | Vr::Ol | Vr::At => {
                let v = u32::try_from(value).map_err(|_| fail())?;
                self.store_word(index, &v.to_le_bytes())
            }
            Vr::Uv | Vr::Ov => {
                let v = u64::try_from(value).map_err(|_| fail())?;
                self.store_word(index, &v.to_le_bytes())
            }
            Vr::Fl | Vr::Of => self.store_word(index, &(value as f32).to_le_bytes()),
            Vr::Fd | Vr::Od => self.store_word(index, &(value as f64).to_le_bytes()),
            _ => self.store_text(index, value.to_string()),
        }
    }

    fn store_u64(&mut self, index: usize, value: u64) -> DicomResult<()> {
        match i64::try_from(value) {
            Ok(v) => self.store_i64(index, v),
            Err(_) => match self.vr {
                // Only the 64-bit unsigned VRs can hold values above i64::MAX
                Vr::Uv | Vr::Ov => self.store_word(index, &value.to_le_bytes()),
                _ => Err(DicomError::conversion(self.vr, "stored integer", index)),
            },
        }
    }

    fn store_f64(&mut self, index: usize, value: f64) -> DicomResult<()> {
        match self.vr {
            Vr::Fl | Vr::Of => self.store_word(index, &(value as f32).to_le_bytes()),
            Vr::Fd | Vr::Od => self.store_word(index, &value.to_le_bytes()),
            Vr::Ds => self.store_text(index, value.to_string()),
            _ if self.vr.word_size() > 0 => {
                if value.fract() != 0.0 || !value.is_finite() {
                    return Err(DicomError::conversion(self.vr, "stored float", index));
                }
                self.store_i64(index, value as i64)
            }
            _ => self.store_text(index, value.to_string()),
        }
    }

    pub fn set_i8(&mut self, index: usize, value: i8) -> DicomResult<()> {
        self.store_i64(index, value as i64)
    }

    pub fn set_i16(&mut self, index: usize, value: i16) -> DicomResult<()> {
        self.store_i64(index, value as i64)
    }

    pub fn set_i32(&mut self, index: usize, value: i32) -> DicomResult<()> {
        self.store_i64(index, value as i64)
    }

    pub fn set_i64(&mut self, index: usize, value: i64) -> DicomResult<()> {
        self.store_i64(index, value)
    }

    pub fn set_u8(&mut self, index: usize, value: u8) -> DicomResult<()> {
        self.store_u64(index, value as u64)
    }

    pub fn set_u16(&mut self, index: usize, value: u16) -> DicomResult<()> {
        self.store_u64(index, value as u64)
    }

    pub fn set_u32(&mut self, index: usize, value: u32) -> DicomResult<()> {
        self.store_u64(index, value as u64)
    }

    pub fn set_u64(&mut self, index: usize, value: u64) -> DicomResult<()> {
        self.store_u64(index, value)
    }

    pub fn set_f32(&mut self, index: usize, value: f32) -> DicomResult<()> {
        self.store_f64(index, value as f64)
    }

    pub fn set_f64(&mut self, index: usize, value: f64) -> DicomResult<()> {
        self.store_f64(index, value)
    }

    pub fn set_string(&mut self, index: usize, value: &str) -> DicomResult<()> {
        if self.vr.word_size() > 0 {
            // Numeric buffers accept numbers in text form
            if let Ok(v) = value.trim().parse::<i64>() {
                return self.store_i64(index, v);
            }
            if let Ok(v) = value.trim().parse::<f64>() {
                return self.store_f64(index, v);
            }
            return Err(DicomError::conversion(self.vr, "stored string", index));
        }
        if !self.vr.is_single_value_text() && value.contains('\\') {
            return Err(DicomError::conversion(self.vr, "stored string", index));
        }
        self.store_text(index, value.to_string())
    }

    pub fn set_date(&mut self, index: usize, value: &DicomDate) -> DicomResult<()> {
        let text = match self.vr {
            Vr::Da => value.format_da(),
            Vr::Tm => value.format_tm(),
            Vr::Dt => value.format_dt(),
            _ => return Err(DicomError::conversion(self.vr, "stored date", index)),
        };
        self.store_text(index, text)
    }

    pub fn set_age(&mut self, index: usize, value: &Age) -> DicomResult<()> {
        if self.vr != Vr::As {
            return Err(DicomError::conversion(self.vr, "stored age", index));
        }
        self.store_text(index, value.to_string())
    }

    pub fn set_person_name(&mut self, index: usize, value: &PersonName) -> DicomResult<()> {
        if self.vr != Vr::Pn {
            return Err(DicomError::conversion(self.vr, "stored person name", index));
        }
        self.store_text(index, value.to_string())
    }

    /// Validate the staged values and swap them into the tag
    ///
    /// The tag's previous buffer stays untouched until the multiplicity
    /// check passes; on failure nothing is modified.
    pub fn commit(self) -> DicomResult<()> {
        let count = self.size() as u32;
        let buffer: Bytes = match self.staged {
            Staged::Text(values) => Bytes::from(values.join("\\")),
            Staged::Binary(memory) => memory.freeze(),
        };
        self.dataset.commit_buffer(self.tag, self.vr, buffer, count)
    }
}
