// IPS container serialization.
//
// Layout (bit-exact, consumed by external patchers):
//
//   [5 bytes]  "PATCH"
//   repeat {
//     [3 bytes] big-endian offset (0..0xFFFFFF)
//     [2 bytes] big-endian length L (1..0xFFFF)
//     [L bytes] payload
//   }
//   [3 bytes]  "EOF"
//
// There is no record count field; records are concatenated until the trailer.
// Runs longer than 0xFFFF are split into multiple records with offsets
// advancing by chunk length.

use std::io::{self, Write};

use super::diff::{DiffRun, diff_runs};

/// Leading container marker.
pub const PATCH_MAGIC: [u8; 5] = *b"PATCH";
/// Trailing container marker.
pub const EOF_MARKER: [u8; 3] = *b"EOF";
/// Maximum payload length of a single record (2-byte size field).
pub const MAX_RECORD_LEN: usize = 0xFFFF;
/// Maximum addressable offset (3-byte offset field).
pub const MAX_OFFSET: usize = 0xFF_FFFF;

/// Serialization error.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// A record would start beyond the 3-byte offset field's range.
    #[error("record offset {0:#X} exceeds IPS limit {MAX_OFFSET:#X}")]
    OffsetOverflow(usize),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Write a sequence of diff runs as an IPS container.
///
/// Each run is split into records of at most [`MAX_RECORD_LEN`] bytes.
pub fn write_patch<W: Write>(w: &mut W, runs: &[DiffRun]) -> Result<(), WriteError> {
    w.write_all(&PATCH_MAGIC)?;

    for run in runs {
        let mut offset = run.offset;
        for chunk in run.data.chunks(MAX_RECORD_LEN) {
            if offset > MAX_OFFSET {
                return Err(WriteError::OffsetOverflow(offset));
            }
            let len = chunk.len();
            w.write_all(&[
                (offset >> 16) as u8,
                (offset >> 8) as u8,
                offset as u8,
            ])?;
            w.write_all(&[(len >> 8) as u8, len as u8])?;
            w.write_all(chunk)?;
            offset += len;
        }
    }

    w.write_all(&EOF_MARKER)?;
    Ok(())
}

/// Diff two buffers and serialize the result as an IPS container.
///
/// Identical inputs produce a valid 8-byte empty patch (magic + trailer).
pub fn encode(original: &[u8], modified: &[u8]) -> Result<Vec<u8>, WriteError> {
    let runs = diff_runs(original, modified);
    let payload: usize = runs.iter().map(|r| r.data.len()).sum();
    let records: usize = runs
        .iter()
        .map(|r| r.data.len().div_ceil(MAX_RECORD_LEN))
        .sum();
    let mut out = Vec::with_capacity(PATCH_MAGIC.len() + EOF_MARKER.len() + payload + 5 * records);
    write_patch(&mut out, &runs)?;
    Ok(out)
}
