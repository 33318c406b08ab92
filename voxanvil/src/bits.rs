//! functionality around bit manipulations specific to the region chunk format.

use bit_field::{BitArray, BitField};

/// Cells in a 16x16x16 section.
pub const SECTION_VOLUME: usize = 16 * 16 * 16;

/// Get the number of bits used per palette index for a palette of the given
/// size. Never less than 4.
pub fn bits_per_block(palette_len: usize) -> usize {
    let mut bits = 4;
    while (1usize << bits) < palette_len {
        bits += 1;
    }
    bits
}

/// Expand packed palette indices so each cell is an element of a `Vec`.
///
/// Two packings exist. Before 1.16 indices are packed tightly, so an index
/// can straddle two longs. From 1.16 a long holds `64 / bits` indices and the
/// remaining high bits are padding. Tightly packed data is recognised by its
/// length matching exactly.
///
/// Returns None if `data` is too short to hold `count` indices.
pub fn expand_indices(data: &[i64], bits: usize, count: usize) -> Option<Vec<u16>> {
    if bits == 0 || bits > 16 {
        return None;
    }

    if count * bits == data.len() * 64 {
        Some(expand_tight(data, bits, count))
    } else {
        expand_padded(data, bits, count)
    }
}

fn expand_padded(data: &[i64], bits: usize, count: usize) -> Option<Vec<u16>> {
    let values_per_64bits = 64 / bits;
    let longs_needed = (count + values_per_64bits - 1) / values_per_64bits;
    if data.len() < longs_needed {
        return None;
    }

    let mut result = Vec::with_capacity(count);
    for datum in &data[..longs_needed] {
        let datum = *datum as u64;
        for i in 0..values_per_64bits {
            if result.len() == count {
                break;
            }
            result.push(datum.get_bits(i * bits..(i + 1) * bits) as u16);
        }
    }

    Some(result)
}

fn expand_tight(data: &[i64], bits: usize, count: usize) -> Vec<u16> {
    // bit_field wants the unsigned view of the longs.
    let longs: Vec<u64> = data.iter().map(|l| *l as u64).collect();

    (0..count)
        .map(|i| {
            let begin = i * bits;
            longs.get_bits(begin..begin + bits) as u16
        })
        .collect()
}

/// Get a 4-bit value from a nibble array, as used by legacy sections. Even
/// indices are in the low nibble.
pub fn nibble(data: &[i8], index: usize) -> u8 {
    let byte = data[index / 2] as u8;
    if index % 2 == 0 {
        byte & 0x0f
    } else {
        byte >> 4
    }
}
