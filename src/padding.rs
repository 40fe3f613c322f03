//! Reversible block padding for primitives without a native length tag.
//!
//! Format: `[data][p bytes of value p]` with `1 <= p <= block`.
//! Input that is already aligned gains a full block of padding, so padding is
//! always present and always removable.

use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater};

use crate::error::FormatError;

/// Largest block size whose padding length fits in one byte.
pub const MAX_BLOCK_SIZE: usize = 255;

/// Pad `data` to a multiple of `block`.
///
/// Panics if `block` is 0 or larger than [`MAX_BLOCK_SIZE`]; block sizes come
/// from a primitive's layout, never from input.
pub fn pad(data: &[u8], block: usize) -> Vec<u8> {
    assert!(
        (1..=MAX_BLOCK_SIZE).contains(&block),
        "block size must be between 1 and {MAX_BLOCK_SIZE}"
    );
    let p = block - data.len() % block;
    let mut padded = Vec::with_capacity(data.len() + p);
    padded.extend_from_slice(data);
    padded.resize(data.len() + p, p as u8);
    padded
}

/// Strip padding added by [`pad`].
///
/// The final block is scanned in full, without early exit, so the time taken
/// does not depend on where the padding goes wrong.
pub fn unpad(padded: &[u8], block: usize) -> Result<&[u8], FormatError> {
    if !(1..=MAX_BLOCK_SIZE).contains(&block)
        || padded.is_empty()
        || padded.len() % block != 0
    {
        return Err(FormatError::WrongPadding);
    }

    let tail = &padded[padded.len() - block..];
    let p = tail[block - 1];

    // 1 <= p <= block
    let mut valid: Choice = !p.ct_eq(&0) & !p.ct_gt(&(block as u8));
    for (i, &byte) in tail.iter().rev().enumerate() {
        let in_padding = p.ct_gt(&(i as u8));
        valid &= !in_padding | byte.ct_eq(&p);
    }

    if !bool::from(valid) {
        return Err(FormatError::WrongPadding);
    }
    Ok(&padded[..padded.len() - usize::from(p)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_next_block() {
        let padded = pad(b"hello", 16);
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[5..], &[11u8; 11]);
    }

    #[test]
    fn aligned_input_gains_full_block() {
        let padded = pad(&[7u8; 16], 16);
        assert_eq!(padded.len(), 32);
        assert_eq!(&padded[16..], &[16u8; 16]);
    }

    #[test]
    fn empty_input_is_one_block() {
        assert_eq!(pad(b"", 16), vec![16u8; 16]);
    }

    #[test]
    fn unpad_round_trip_all_lengths() {
        for len in 0..=32 {
            let data: Vec<u8> = (0..len as u8).collect();
            let padded = pad(&data, 16);
            assert_eq!(padded.len() % 16, 0);
            assert_eq!(unpad(&padded, 16).unwrap(), &data[..], "length {len}");
        }
    }

    #[test]
    fn rejects_zero_pad_byte() {
        let mut padded = vec![1u8; 16];
        padded[15] = 0;
        assert_eq!(unpad(&padded, 16), Err(FormatError::WrongPadding));
    }

    #[test]
    fn rejects_pad_byte_larger_than_block() {
        let padded = vec![17u8; 32];
        assert_eq!(unpad(&padded, 16), Err(FormatError::WrongPadding));
    }

    #[test]
    fn rejects_inconsistent_padding_bytes() {
        let mut padded = pad(b"hello", 16);
        padded[6] = 3;
        assert_eq!(unpad(&padded, 16), Err(FormatError::WrongPadding));
    }

    #[test]
    fn rejects_unaligned_input() {
        assert_eq!(unpad(&[1u8; 15], 16), Err(FormatError::WrongPadding));
        assert_eq!(unpad(b"", 16), Err(FormatError::WrongPadding));
    }

    #[test]
    fn accepts_full_block_of_padding() {
        let padded = vec![16u8; 16];
        assert!(unpad(&padded, 16).unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "block size")]
    fn pad_rejects_zero_block() {
        pad(b"x", 0);
    }
}
