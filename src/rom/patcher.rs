// Precondition-checked injection of the save-patch edit table.
//
// Patching is all-or-nothing: every precondition is evaluated against the
// untouched input first, and the full violation list is reported before a
// single byte is written. `force` overrides the whole decision, never
// individual checks.

use log::warn;

use super::checksum::{global_checksum, header_checksum};
use super::layout::{
    CHECKS, EDITS, GLOBAL_CHECKSUM_ADDR, HEADER_CHECKSUM_ADDR, HEADER_WRITES, LayoutCheck,
    MIN_IMAGE_LEN,
};

/// One failed precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Bytes at a hook site did not match the expected original code.
    Mismatch {
        label: &'static str,
        address: usize,
        expected: Vec<u8>,
        actual: Vec<u8>,
    },
    /// The code cave contains non-zero bytes.
    DirtyCave { start: usize, end: usize },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mismatch {
                label,
                address,
                expected,
                actual,
            } => write!(
                f,
                "{label} @ {address:#08X}: expected {}, got {}",
                hex(expected),
                hex(actual)
            ),
            Self::DirtyCave { start, end } => write!(
                f,
                "code cave {start:#06X}-{:#06X} is not empty (non-zero bytes found)",
                end - 1
            ),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Patching error. Precondition failures are the only recoverable kind: the
/// caller can re-run with `force`. A too-small image can never be patched.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("image is {len} bytes, need at least {MIN_IMAGE_LEN} to hold the edit table")]
    ImageTooSmall { len: usize },
    #[error(
        "refusing to patch, {} precondition check(s) failed (use force to override):\n{}",
        .violations.len(),
        join_violations(.violations)
    )]
    PreconditionsFailed { violations: Vec<Violation> },
}

/// Evaluate every layout check against `image`, collecting all failures.
///
/// Checks never short-circuit; the result lists violations in table order so
/// the caller gets a complete diagnostic in one pass.
pub fn validate(image: &[u8]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for check in CHECKS {
        match check {
            LayoutCheck::Bytes {
                label,
                addr,
                expected,
            } => {
                // A truncated image counts as a mismatch, not a panic.
                let actual = image.get(addr..addr + expected.len()).unwrap_or(&[]);
                if actual != expected {
                    violations.push(Violation::Mismatch {
                        label,
                        address: addr,
                        expected: expected.to_vec(),
                        actual: actual.to_vec(),
                    });
                }
            }
            LayoutCheck::EmptyCave { start, end } => {
                let cave = image.get(start..end).unwrap_or(&[]);
                if cave.iter().any(|&b| b != 0x00) {
                    violations.push(Violation::DirtyCave { start, end });
                }
            }
        }
    }

    violations
}

/// Apply the full save-patch edit table to `image`, returning a new buffer.
///
/// Steps, in order: precondition validation, code injection, header field
/// writes, header checksum, global checksum. The global checksum is computed
/// last so it covers the freshly written header checksum byte.
pub fn patch_rom(image: &[u8], force: bool) -> Result<Vec<u8>, PatchError> {
    if image.len() < MIN_IMAGE_LEN {
        return Err(PatchError::ImageTooSmall { len: image.len() });
    }

    let violations = validate(image);
    if !violations.is_empty() {
        if !force {
            return Err(PatchError::PreconditionsFailed { violations });
        }
        for v in &violations {
            warn!("overriding failed precondition: {v}");
        }
    }

    let mut out = image.to_vec();

    for edit in EDITS {
        out[edit.addr..edit.addr + edit.bytes.len()].copy_from_slice(edit.bytes);
    }

    for (addr, value) in HEADER_WRITES {
        out[addr] = value;
    }

    out[HEADER_CHECKSUM_ADDR] = header_checksum(&out);
    let global = global_checksum(&out);
    out[GLOBAL_CHECKSUM_ADDR..GLOBAL_CHECKSUM_ADDR + 2].copy_from_slice(&global.to_be_bytes());

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::layout::{
        CART_TYPE_ADDR, CART_TYPE_MBC5_RAM_BATTERY, CAVE_START, EXPECT_INIT_BYTES,
        EXPECT_POSTNAME_CALL, INIT, INIT_ADDR, INIT_HOOK_ADDR, POSTNAME_HOOK_ADDR, RAM_SIZE_8K,
        RAM_SIZE_ADDR, ROM_SIZE, SAVE, SAVE_ADDR, STUB, STUB_ADDR,
    };

    /// A zeroed full-size image carrying the expected original bytes at both
    /// hook sites (the cave is already empty by construction).
    fn clean_image() -> Vec<u8> {
        let mut image = vec![0u8; ROM_SIZE];
        image[INIT_HOOK_ADDR..INIT_HOOK_ADDR + 3].copy_from_slice(&EXPECT_INIT_BYTES);
        image[POSTNAME_HOOK_ADDR..POSTNAME_HOOK_ADDR + 3].copy_from_slice(&EXPECT_POSTNAME_CALL);
        image
    }

    #[test]
    fn clean_image_passes_validation() {
        assert!(validate(&clean_image()).is_empty());
    }

    #[test]
    fn validation_aggregates_all_failures() {
        let mut image = clean_image();
        image[INIT_HOOK_ADDR] = 0xFF; // break the init check
        image[CAVE_START + 4] = 0x01; // dirty the cave

        let violations = validate(&image);
        assert_eq!(violations.len(), 2);
        assert!(matches!(
            violations[0],
            Violation::Mismatch { address: INIT_HOOK_ADDR, .. }
        ));
        assert!(matches!(violations[1], Violation::DirtyCave { .. }));
    }

    #[test]
    fn failed_validation_blocks_patching_and_mutates_nothing() {
        let mut image = clean_image();
        image[INIT_HOOK_ADDR] = 0xFF;
        image[CAVE_START] = 0x01;
        let before = image.clone();

        let err = patch_rom(&image, false).unwrap_err();
        match &err {
            PatchError::PreconditionsFailed { violations } => assert_eq!(violations.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        // Both violations appear in the rendered diagnostic.
        let msg = err.to_string();
        assert!(msg.contains("Init routine bytes"));
        assert!(msg.contains("code cave"));
        assert_eq!(image, before);
    }

    #[test]
    fn force_patches_despite_violations() {
        let mut image = clean_image();
        image[INIT_HOOK_ADDR] = 0xFF;
        image[CAVE_START] = 0x01;

        let out = patch_rom(&image, true).unwrap();
        assert_eq!(&out[STUB_ADDR..STUB_ADDR + STUB.len()], &STUB);
        assert_eq!(out[CART_TYPE_ADDR], CART_TYPE_MBC5_RAM_BATTERY);
    }

    #[test]
    fn patch_applies_all_edits_and_header_writes() {
        let out = patch_rom(&clean_image(), false).unwrap();

        assert_eq!(&out[STUB_ADDR..STUB_ADDR + STUB.len()], &STUB);
        assert_eq!(&out[INIT_ADDR..INIT_ADDR + INIT.len()], &INIT);
        assert_eq!(&out[SAVE_ADDR..SAVE_ADDR + SAVE.len()], &SAVE);
        // Hooks redirect into the cave.
        assert_eq!(&out[INIT_HOOK_ADDR..INIT_HOOK_ADDR + 3], &[0xC3, 0x30, 0x08]);
        assert_eq!(
            &out[POSTNAME_HOOK_ADDR..POSTNAME_HOOK_ADDR + 3],
            &[0xCD, 0x28, 0x08]
        );
        assert_eq!(out[CART_TYPE_ADDR], CART_TYPE_MBC5_RAM_BATTERY);
        assert_eq!(out[RAM_SIZE_ADDR], RAM_SIZE_8K);
    }

    #[test]
    fn checksums_are_consistent_with_final_contents() {
        let out = patch_rom(&clean_image(), false).unwrap();

        assert_eq!(out[HEADER_CHECKSUM_ADDR], header_checksum(&out));
        let stored = u16::from_be_bytes([
            out[GLOBAL_CHECKSUM_ADDR],
            out[GLOBAL_CHECKSUM_ADDR + 1],
        ]);
        assert_eq!(stored, global_checksum(&out));
    }

    #[test]
    fn undersized_image_is_rejected_even_with_force() {
        let image = vec![0u8; 0x1000];
        assert!(matches!(
            patch_rom(&image, true),
            Err(PatchError::ImageTooSmall { .. })
        ));
    }

    #[test]
    fn patching_is_deterministic() {
        let image = clean_image();
        assert_eq!(
            patch_rom(&image, false).unwrap(),
            patch_rom(&image, false).unwrap()
        );
    }
}
