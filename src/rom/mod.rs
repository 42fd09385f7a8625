// Game Boy ROM image patcher.
//
// Injects battery-backed high-score save support into the Centipede (GBC)
// image: four routines in a bank-0 code cave, two call-site hooks, the
// cartridge header fields declaring SRAM + battery, and both cartridge
// checksums recomputed over the final buffer.
//
// # Modules
//
// - `layout`   — fixed addresses, routine bodies, edit/check tables
// - `checksum` — header and global checksum folds
// - `patcher`  — precondition validation and injection

pub mod checksum;
pub mod layout;
pub mod patcher;

// Re-export key types for convenience.
pub use checksum::{global_checksum, header_checksum};
pub use layout::{EditRecord, LayoutCheck, MIN_IMAGE_LEN, ROM_SIZE};
pub use patcher::{PatchError, Violation, patch_rom, validate};
