// Game Boy cartridge checksum folds.
//
// Both checksums are pure functions of the buffer contents. The global
// checksum covers the whole image including the header checksum byte, so the
// header checksum must be written first.

use super::layout::{GLOBAL_CHECKSUM_ADDR, HEADER_CHECKSUM_END, HEADER_CHECKSUM_START};

/// 8-bit header checksum over 0x0134..0x014D.
///
/// Seeded at 0; per byte: `v = v - byte - 1 (mod 256)`. Boot-ROM compatible.
pub fn header_checksum(image: &[u8]) -> u8 {
    image[HEADER_CHECKSUM_START..HEADER_CHECKSUM_END]
        .iter()
        .fold(0u8, |v, &b| v.wrapping_sub(b).wrapping_sub(1))
}

/// 16-bit global checksum: sum of every byte in the image except the two
/// bytes of the global-checksum field itself, mod 65536.
///
/// The field's current contents are irrelevant; they are simply skipped.
pub fn global_checksum(image: &[u8]) -> u16 {
    image
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != GLOBAL_CHECKSUM_ADDR && *i != GLOBAL_CHECKSUM_ADDR + 1)
        .fold(0u16, |sum, (_, &b)| sum.wrapping_add(b as u16))
}
