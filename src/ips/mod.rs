// IPS patch format implementation.
//
// Byte-for-byte compatible with the classic IPS container as consumed by
// common ROM patchers (Lunar IPS, Floating IPS, emulator soft-patching).
//
// # Modules
//
// - `diff`   — byte-level diff run scanner
// - `writer` — container serialization (record splitting, markers)
// - `reader` — container parsing and patch application

pub mod diff;
pub mod reader;
pub mod writer;

// Re-export key types for convenience.
pub use diff::{DiffRun, diff_runs};
pub use reader::{ApplyError, PatchRecord, apply, read_records};
pub use writer::{EOF_MARKER, MAX_OFFSET, MAX_RECORD_LEN, PATCH_MAGIC, WriteError, encode};
