// File-level helpers wrapping the in-memory cores.
//
// Provides `diff_files()`, `patch_file()` and `apply_file()` convenience
// functions. The algorithmic cores only ever see in-memory buffers; all file
// acquisition and release happens here. Optionally computes SHA-256 checksums
// of the produced artifacts (feature-gated behind `file-io`).

use std::path::Path;

use log::warn;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::ips::reader::{self, ApplyError};
use crate::ips::writer::{self, WriteError};
use crate::ips::{diff_runs, read_records};
use crate::rom::layout::ROM_SIZE;
use crate::rom::patcher::{self, PatchError};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `diff_files()`.
#[derive(Debug, Clone)]
pub struct DiffStats {
    /// Original image size in bytes.
    pub orig_size: u64,
    /// Modified image size in bytes.
    pub modified_size: u64,
    /// Serialized patch size in bytes.
    pub patch_size: u64,
    /// Number of IPS records written.
    pub records: u64,
    /// SHA-256 of the patch (if the `file-io` feature is enabled).
    pub patch_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `patch_file()`.
#[derive(Debug, Clone)]
pub struct PatchStats {
    /// Input image size in bytes.
    pub input_size: u64,
    /// Output image size in bytes (always equal to the input size).
    pub output_size: u64,
    /// Whether precondition violations were overridden with force.
    pub forced: bool,
    /// SHA-256 of the patched image (if the `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `apply_file()`.
#[derive(Debug, Clone)]
pub struct ApplyStats {
    /// Base image size in bytes.
    pub base_size: u64,
    /// Patched output size in bytes.
    pub output_size: u64,
    /// Number of IPS records applied.
    pub records: u64,
    /// SHA-256 of the output (if the `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file-level operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("patch serialization error: {0}")]
    Write(#[from] WriteError),
    #[error("patch apply error: {0}")]
    Apply(#[from] ApplyError),
    #[error(transparent)]
    Patch(#[from] PatchError),
}

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    let mut h = sha2::Sha256::new();
    h.update(data);
    Some(h.finalize().into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// diff_files
// ---------------------------------------------------------------------------

/// Diff two image files and write an IPS patch to `out_path`.
///
/// A length mismatch between the images is not an error; the patch simply
/// carries the tail (or cannot represent a truncation), so it is surfaced as
/// a warning and processing continues.
pub fn diff_files(
    orig_path: &Path,
    modified_path: &Path,
    out_path: &Path,
) -> Result<DiffStats, IoError> {
    let orig = std::fs::read(orig_path)?;
    let modified = std::fs::read(modified_path)?;

    if orig.len() != modified.len() {
        warn!(
            "image sizes differ (orig={}, modified={}); patch will include tail data",
            orig.len(),
            modified.len()
        );
    }

    let runs = diff_runs(&orig, &modified);
    let records: u64 = runs
        .iter()
        .map(|r| r.data.len().div_ceil(writer::MAX_RECORD_LEN) as u64)
        .sum();

    let mut patch = Vec::new();
    writer::write_patch(&mut patch, &runs)?;
    std::fs::write(out_path, &patch)?;

    Ok(DiffStats {
        orig_size: orig.len() as u64,
        modified_size: modified.len() as u64,
        patch_size: patch.len() as u64,
        records,
        patch_sha256: sha256(&patch),
    })
}

// ---------------------------------------------------------------------------
// patch_file
// ---------------------------------------------------------------------------

/// Apply the save-patch edit table to an image file.
///
/// An unexpected total size is a warning only; precondition validation is
/// what actually guards the edit table.
pub fn patch_file(
    input_path: &Path,
    output_path: &Path,
    force: bool,
) -> Result<PatchStats, IoError> {
    let image = std::fs::read(input_path)?;

    if image.len() != ROM_SIZE {
        warn!("image size is {} bytes, expected {ROM_SIZE:#X}", image.len());
    }

    let forced = force && !patcher::validate(&image).is_empty();
    let patched = patcher::patch_rom(&image, force)?;
    std::fs::write(output_path, &patched)?;

    Ok(PatchStats {
        input_size: image.len() as u64,
        output_size: patched.len() as u64,
        forced,
        output_sha256: sha256(&patched),
    })
}

// ---------------------------------------------------------------------------
// apply_file
// ---------------------------------------------------------------------------

/// Apply an IPS patch file to a base image, writing the result to `out_path`.
pub fn apply_file(
    base_path: &Path,
    patch_path: &Path,
    out_path: &Path,
) -> Result<ApplyStats, IoError> {
    let base = std::fs::read(base_path)?;
    let patch = std::fs::read(patch_path)?;

    let records = read_records(&patch)?.len() as u64;
    let output = reader::apply(&base, &patch)?;
    std::fs::write(out_path, &output)?;

    Ok(ApplyStats {
        base_size: base.len() as u64,
        output_size: output.len() as u64,
        records,
        output_sha256: sha256(&output),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn diff_apply_file_roundtrip() {
        let dir = tempdir().unwrap();
        let orig_path = dir.path().join("orig.gbc");
        let modified_path = dir.path().join("mod.gbc");
        let patch_path = dir.path().join("out.ips");
        let output_path = dir.path().join("rebuilt.gbc");

        let orig = b"The quick brown fox jumps over the lazy dog".to_vec();
        let modified = b"The quick brown cat sits on the lazy mat!!!".to_vec();
        std::fs::write(&orig_path, &orig).unwrap();
        std::fs::write(&modified_path, &modified).unwrap();

        let stats = diff_files(&orig_path, &modified_path, &patch_path).unwrap();
        assert_eq!(stats.orig_size, orig.len() as u64);
        assert_eq!(stats.modified_size, modified.len() as u64);
        assert!(stats.records >= 1);
        assert!(stats.patch_size > 8);

        let apply_stats = apply_file(&orig_path, &patch_path, &output_path).unwrap();
        assert_eq!(apply_stats.records, stats.records);
        assert_eq!(std::fs::read(&output_path).unwrap(), modified);
    }

    #[test]
    fn diff_identical_files_writes_empty_patch() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let out = dir.path().join("empty.ips");
        std::fs::write(&a, b"identical").unwrap();

        let stats = diff_files(&a, &a, &out).unwrap();
        assert_eq!(stats.records, 0);
        assert_eq!(stats.patch_size, 8);
        assert_eq!(std::fs::read(&out).unwrap(), b"PATCHEOF");
    }

    #[test]
    fn patch_file_writes_patched_image() {
        use crate::rom::layout::{
            CART_TYPE_ADDR, CART_TYPE_MBC5_RAM_BATTERY, EXPECT_INIT_BYTES, EXPECT_POSTNAME_CALL,
            INIT_HOOK_ADDR, POSTNAME_HOOK_ADDR, ROM_SIZE,
        };

        let dir = tempdir().unwrap();
        let input = dir.path().join("clean.gbc");
        let output = dir.path().join("patched.gbc");

        let mut image = vec![0u8; ROM_SIZE];
        image[INIT_HOOK_ADDR..INIT_HOOK_ADDR + 3].copy_from_slice(&EXPECT_INIT_BYTES);
        image[POSTNAME_HOOK_ADDR..POSTNAME_HOOK_ADDR + 3].copy_from_slice(&EXPECT_POSTNAME_CALL);
        std::fs::write(&input, &image).unwrap();

        let stats = patch_file(&input, &output, false).unwrap();
        assert_eq!(stats.input_size, ROM_SIZE as u64);
        assert_eq!(stats.output_size, ROM_SIZE as u64);
        assert!(!stats.forced);

        let patched = std::fs::read(&output).unwrap();
        assert_eq!(patched[CART_TYPE_ADDR], CART_TYPE_MBC5_RAM_BATTERY);
    }

    #[test]
    fn patch_file_propagates_validation_failure() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("dirty.gbc");
        let output = dir.path().join("never.gbc");

        // Full-size image with neither hook site intact.
        std::fs::write(&input, vec![0u8; crate::rom::layout::ROM_SIZE]).unwrap();

        let err = patch_file(&input, &output, false).unwrap_err();
        assert!(matches!(
            err,
            IoError::Patch(PatchError::PreconditionsFailed { .. })
        ));
        assert!(!output.exists());
    }

    #[cfg(feature = "file-io")]
    #[test]
    fn stats_carry_sha256() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        let out = dir.path().join("p.ips");
        std::fs::write(&a, b"aaaa").unwrap();
        std::fs::write(&b, b"aaab").unwrap();

        let stats = diff_files(&a, &b, &out).unwrap();
        assert!(stats.patch_sha256.is_some());
    }
}
