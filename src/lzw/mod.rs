//! Variable-width LZW as used by GIF image data: little-endian bit packing,
//! a clear code and an end code, and a 4096-entry dictionary that resets on
//! clear or on overflow.

mod decode;
mod encode;

pub(crate) use decode::decode;
pub(crate) use encode::encode;

pub(crate) fn clear_code(min_code_size: u8) -> u16 {
    1 << (min_code_size as u32)
}

pub(crate) fn end_code(min_code_size: u8) -> u16 {
    clear_code(min_code_size) + 1
}

/// Smallest code size (2..=8) whose literal range covers every index in `data`.
pub(crate) fn min_code_size_for(data: &[u8]) -> u8 {
    let max_index = data.iter().copied().max().unwrap_or(0);
    let span = max_index as u16 + 1;
    let bits_needed = if span <= 1 { 0 } else { 16 - (span - 1).leading_zeros() as u8 };
    bits_needed.max(2)
}
