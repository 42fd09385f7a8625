//! Gbpatch: IPS patch generation and Game Boy ROM save-patching.
//!
//! The crate provides:
//! - A bit-exact IPS encoder/applier (`ips`)
//! - The Centipede (GBC) battery-save injection patcher (`rom`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use gbpatch::ips;
//!
//! let original = b"hello old world";
//! let modified = b"hello new world";
//!
//! let patch = ips::encode(original, modified).unwrap();
//! let rebuilt = ips::apply(original, &patch).unwrap();
//! assert_eq!(rebuilt, modified);
//! ```

pub mod io;
pub mod ips;
pub mod rom;

#[cfg(feature = "cli")]
pub mod cli;
