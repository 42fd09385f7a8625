// IPS container parsing and application.
//
// The consumer side of the format emitted by `writer`: walks the record
// stream between the "PATCH" magic and the "EOF" trailer and applies each
// record to a base buffer, growing it when a record writes past the end.

use super::writer::{EOF_MARKER, PATCH_MAGIC};

/// A single parsed IPS record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRecord {
    /// Target offset of the payload.
    pub offset: usize,
    /// Replacement bytes (1..=0xFFFF of them).
    pub data: Vec<u8>,
}

/// Parse/apply error.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("not an IPS patch: missing PATCH magic")]
    BadMagic,
    #[error("truncated record at patch byte {0}")]
    TruncatedRecord(usize),
    #[error("patch ends without EOF trailer")]
    MissingTrailer,
    #[error("record at patch byte {0} has zero length")]
    ZeroLengthRecord(usize),
}

/// Parse every record in an IPS container.
///
/// The trailer is the literal bytes "EOF" where the next record's offset
/// field would start. Trailing bytes after the trailer are ignored, matching
/// common IPS tooling.
pub fn read_records(patch: &[u8]) -> Result<Vec<PatchRecord>, ApplyError> {
    if patch.len() < PATCH_MAGIC.len() || patch[..PATCH_MAGIC.len()] != PATCH_MAGIC {
        return Err(ApplyError::BadMagic);
    }

    let mut records = Vec::new();
    let mut pos = PATCH_MAGIC.len();

    loop {
        if patch.len() - pos >= EOF_MARKER.len() && patch[pos..pos + 3] == EOF_MARKER {
            return Ok(records);
        }
        if patch.len() - pos < 5 {
            return Err(ApplyError::MissingTrailer);
        }

        let offset =
            ((patch[pos] as usize) << 16) | ((patch[pos + 1] as usize) << 8) | patch[pos + 2] as usize;
        let len = ((patch[pos + 3] as usize) << 8) | patch[pos + 4] as usize;
        if len == 0 {
            // RLE records (length 0) are not produced by this encoder.
            return Err(ApplyError::ZeroLengthRecord(pos));
        }
        pos += 5;

        if patch.len() - pos < len {
            return Err(ApplyError::TruncatedRecord(pos));
        }
        records.push(PatchRecord {
            offset,
            data: patch[pos..pos + len].to_vec(),
        });
        pos += len;
    }
}

/// Apply an IPS patch to `base`, returning the patched buffer.
///
/// Records past the end of `base` grow the output (trailing-append records
/// emitted when the modified image was longer than the original). The format
/// cannot shrink a buffer, so the output is never shorter than `base`.
pub fn apply(base: &[u8], patch: &[u8]) -> Result<Vec<u8>, ApplyError> {
    let records = read_records(patch)?;
    let mut out = base.to_vec();

    for rec in &records {
        let end = rec.offset + rec.data.len();
        if end > out.len() {
            out.resize(end, 0);
        }
        out[rec.offset..end].copy_from_slice(&rec.data);
    }

    Ok(out)
}
