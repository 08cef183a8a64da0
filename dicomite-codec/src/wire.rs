//! Wire-level constants and helpers shared by the encoder and decoder

use dicomite_core::{TagId, Vr};

/// Marks sequences and items whose length is determined by delimiters
pub(crate) const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

/// Start of a sequence item (FFFE,E000)
pub(crate) const ITEM: TagId = TagId::new(0xFFFE, 0xE000);
/// End of an undefined-length item (FFFE,E00D)
pub(crate) const ITEM_DELIMITER: TagId = TagId::new(0xFFFE, 0xE00D);
/// End of an undefined-length sequence (FFFE,E0DD)
pub(crate) const SEQUENCE_DELIMITER: TagId = TagId::new(0xFFFE, 0xE0DD);

/// Byte-swap unit of a VR's binary values
///
/// An AT value is a (group, element) pair of two u16 halves that swap
/// independently; every other VR swaps whole words.
pub(crate) fn swap_unit(vr: Vr) -> usize {
    match vr {
        Vr::At => 2,
        _ => vr.word_size() as usize,
    }
}

/// Reverse the byte order of every word in `data`
///
/// Buffers are kept in little endian order in memory; this converts to
/// and from the big endian wire form. A trailing partial word is left
/// untouched.
pub(crate) fn swap_words(data: &mut [u8], word_size: usize) {
    if word_size < 2 {
        return;
    }
    for word in data.chunks_exact_mut(word_size) {
        word.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_words() {
        let mut data = [0x01, 0x02, 0x03, 0x04];
        swap_words(&mut data, 2);
        assert_eq!(data, [0x02, 0x01, 0x04, 0x03]);
        swap_words(&mut data, 4);
        assert_eq!(data, [0x03, 0x04, 0x01, 0x02]);
    }

    #[test]
    fn test_swap_single_byte_words_is_identity() {
        let mut data = [1, 2, 3];
        swap_words(&mut data, 1);
        assert_eq!(data, [1, 2, 3]);
    }

    #[test]
    fn test_swap_unit_splits_at_into_halves() {
        assert_eq!(swap_unit(Vr::At), 2);
        assert_eq!(swap_unit(Vr::Ul), 4);
        assert_eq!(swap_unit(Vr::Us), 2);
        assert_eq!(swap_unit(Vr::Ob), 1);
    }
}
