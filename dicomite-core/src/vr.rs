use crate::error::{DicomError, DicomResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DICOM Value Representation codes
///
/// The VR governs the element word size and the default parse/format rules
/// of a tag's buffer. Word size and maximum size are pure functions of the
/// VR; 0 means variable/unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vr {
    /// Application Entity
    Ae,
    /// Age String
    As,
    /// Attribute Tag
    At,
    /// Code String
    Cs,
    /// Date
    Da,
    /// Decimal String
    Ds,
    /// Date Time
    Dt,
    /// Floating Point Single
    Fl,
    /// Floating Point Double
    Fd,
    /// Integer String
    Is,
    /// Long String
    Lo,
    /// Long Text
    Lt,
    /// Other Byte
    Ob,
    /// Other Double
    Od,
    /// Other Float
    Of,
    /// Other Long
    Ol,
    /// Other 64-bit Very Long
    Ov,
    /// Other Word
    Ow,
    /// Person Name
    Pn,
    /// Short String
    Sh,
    /// Signed Long
    Sl,
    /// Sequence of Items
    Sq,
    /// Signed Short
    Ss,
    /// Short Text
    St,
    /// Signed 64-bit Very Long
    Sv,
    /// Time
    Tm,
    /// Unlimited Characters
    Uc,
    /// Unique Identifier
    Ui,
    /// Unsigned Long
    Ul,
    /// Unknown
    Un,
    /// URI/URL
    Ur,
    /// Unsigned Short
    Us,
    /// Unlimited Text
    Ut,
    /// Unsigned 64-bit Very Long
    Uv,
}

impl Vr {
    /// Size in bytes of a single element, 0 when the VR has no fixed
    /// element size
    pub const fn word_size(&self) -> u32 {
        match self {
            Vr::At => 4,
            Vr::Fl => 4,
            Vr::Fd => 8,
            Vr::Ob => 1,
            Vr::Od => 8,
            Vr::Of => 4,
            Vr::Ol => 4,
            Vr::Ov => 8,
            Vr::Ow => 2,
            Vr::Sl => 4,
            Vr::Ss => 2,
            Vr::Sv => 8,
            Vr::Ul => 4,
            Vr::Us => 2,
            Vr::Uv => 8,
            Vr::Un => 1,
            _ => 0,
        }
    }

    /// Maximum size in bytes of a tag with this VR, 0 when unbounded
    pub const fn max_size(&self) -> u32 {
        match self {
            Vr::Ae => 16,
            Vr::As => 4,
            Vr::At => 4,
            Vr::Cs => 16,
            Vr::Da => 10,
            Vr::Ds => 16,
            Vr::Dt => 26,
            Vr::Fl => 4,
            Vr::Fd => 8,
            Vr::Is => 12,
            Vr::Lo => 64,
            Vr::Lt => 10240,
            Vr::Pn => 64,
            Vr::Sh => 16,
            Vr::Sl => 4,
            Vr::Ss => 2,
            Vr::St => 1024,
            Vr::Sv => 8,
            Vr::Tm => 16,
            Vr::Ui => 64,
            Vr::Ul => 4,
            Vr::Us => 2,
            Vr::Uv => 8,
            _ => 0,
        }
    }

    /// Check if this VR stores binary numeric data
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Vr::At
                | Vr::Fl
                | Vr::Fd
                | Vr::Ob
                | Vr::Od
                | Vr::Of
                | Vr::Ol
                | Vr::Ov
                | Vr::Ow
                | Vr::Sl
                | Vr::Ss
                | Vr::Sv
                | Vr::Ul
                | Vr::Us
                | Vr::Uv
        )
    }

    /// Check if this VR stores signed numbers
    pub const fn is_signed(&self) -> bool {
        matches!(self, Vr::Sl | Vr::Ss | Vr::Sv)
    }

    /// Check if this VR stores floating point numbers
    pub const fn is_float(&self) -> bool {
        matches!(self, Vr::Fl | Vr::Fd | Vr::Of | Vr::Od)
    }

    /// Check if this VR stores character data
    pub const fn is_text(&self) -> bool {
        matches!(
            self,
            Vr::Ae
                | Vr::As
                | Vr::Cs
                | Vr::Da
                | Vr::Ds
                | Vr::Dt
                | Vr::Is
                | Vr::Lo
                | Vr::Lt
                | Vr::Pn
                | Vr::Sh
                | Vr::St
                | Vr::Tm
                | Vr::Uc
                | Vr::Ui
                | Vr::Ur
                | Vr::Ut
        )
    }

    /// Check if this text VR holds a single value (no backslash separator)
    pub const fn is_single_value_text(&self) -> bool {
        matches!(self, Vr::Lt | Vr::St | Vr::Ut | Vr::Ur)
    }

    /// Check if this VR uses the 4-byte length form in explicit VR
    /// transfer syntaxes
    pub const fn uses_long_length(&self) -> bool {
        matches!(
            self,
            Vr::Ob
                | Vr::Od
                | Vr::Of
                | Vr::Ol
                | Vr::Ov
                | Vr::Ow
                | Vr::Sq
                | Vr::Sv
                | Vr::Uc
                | Vr::Un
                | Vr::Ur
                | Vr::Ut
                | Vr::Uv
        )
    }

    /// Padding byte used to reach even value length
    pub const fn padding_byte(&self) -> u8 {
        if self.is_text() && !matches!(self, Vr::Ui) {
            b' '
        } else {
            0x00
        }
    }

    /// Parse a VR from its two-letter wire code
    pub fn from_bytes(code: [u8; 2]) -> DicomResult<Self> {
        match &code {
            b"AE" => Ok(Vr::Ae),
            b"AS" => Ok(Vr::As),
            b"AT" => Ok(Vr::At),
            b"CS" => Ok(Vr::Cs),
            b"DA" => Ok(Vr::Da),
            b"DS" => Ok(Vr::Ds),
            b"DT" => Ok(Vr::Dt),
            b"FL" => Ok(Vr::Fl),
            b"FD" => Ok(Vr::Fd),
            b"IS" => Ok(Vr::Is),
            b"LO" => Ok(Vr::Lo),
            b"LT" => Ok(Vr::Lt),
            b"OB" => Ok(Vr::Ob),
            b"OD" => Ok(Vr::Od),
            b"OF" => Ok(Vr::Of),
            b"OL" => Ok(Vr::Ol),
            b"OV" => Ok(Vr::Ov),
            b"OW" => Ok(Vr::Ow),
            b"PN" => Ok(Vr::Pn),
            b"SH" => Ok(Vr::Sh),
            b"SL" => Ok(Vr::Sl),
            b"SQ" => Ok(Vr::Sq),
            b"SS" => Ok(Vr::Ss),
            b"ST" => Ok(Vr::St),
            b"SV" => Ok(Vr::Sv),
            b"TM" => Ok(Vr::Tm),
            b"UC" => Ok(Vr::Uc),
            b"UI" => Ok(Vr::Ui),
            b"UL" => Ok(Vr::Ul),
            b"UN" => Ok(Vr::Un),
            b"UR" => Ok(Vr::Ur),
            b"US" => Ok(Vr::Us),
            b"UT" => Ok(Vr::Ut),
            b"UV" => Ok(Vr::Uv),
            _ => Err(DicomError::Codec(format!(
                "unknown VR code {:02X}{:02X}",
                code[0], code[1]
            ))),
        }
    }

    /// Two-letter wire code of this VR
    pub const fn as_bytes(&self) -> [u8; 2] {
        match self {
            Vr::Ae => *b"AE",
            Vr::As => *b"AS",
            Vr::At => *b"AT",
            Vr::Cs => *b"CS",
            Vr::Da => *b"DA",
            Vr::Ds => *b"DS",
            Vr::Dt => *b"DT",
            Vr::Fl => *b"FL",
            Vr::Fd => *b"FD",
            Vr::Is => *b"IS",
            Vr::Lo => *b"LO",
            Vr::Lt => *b"LT",
            Vr::Ob => *b"OB",
            Vr::Od => *b"OD",
            Vr::Of => *b"OF",
            Vr::Ol => *b"OL",
            Vr::Ov => *b"OV",
            Vr::Ow => *b"OW",
            Vr::Pn => *b"PN",
            Vr::Sh => *b"SH",
            Vr::Sl => *b"SL",
            Vr::Sq => *b"SQ",
            Vr::Ss => *b"SS",
            Vr::St => *b"ST",
            Vr::Sv => *b"SV",
            Vr::Tm => *b"TM",
            Vr::Uc => *b"UC",
            Vr::Ui => *b"UI",
            Vr::Ul => *b"UL",
            Vr::Un => *b"UN",
            Vr::Ur => *b"UR",
            Vr::Us => *b"US",
            Vr::Ut => *b"UT",
            Vr::Uv => *b"UV",
        }
    }
}

impl fmt::Display for Vr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.as_bytes();
        write!(f, "{}{}", code[0] as char, code[1] as char)
    }
}
