// Fixed image-layout constants for the Centipede (GBC) high-score save patch.
//
// Everything here is format data, not configuration: injection addresses,
// the machine-code routine bodies, the precondition byte sequences, and the
// cartridge header field locations. The routines live in an unused stretch
// of bank 0 (the "code cave" at 0x0828..0x08D0) and hook two sites in the
// original code: the init path at 0x0474 and the post-name-entry commit call
// at 0x18CE8.

/// Expected total image size. Other sizes are processed with a warning.
pub const ROM_SIZE: usize = 0x10_0000;

/// Call-stub routine address (hooked from the post-name-entry call site).
pub const STUB_ADDR: usize = 0x0828;
/// Init/load hook routine address (hooked from the init path).
pub const INIT_ADDR: usize = 0x0830;
/// Load-high-scores routine address.
pub const LOAD_ADDR: usize = 0x0850;
/// Save-high-scores routine address.
pub const SAVE_ADDR: usize = 0x08A0;

/// Init-path hook site and the original bytes expected there.
pub const INIT_HOOK_ADDR: usize = 0x0474;
/// `LD HL,$0486` — start of the original high-score table copy.
pub const EXPECT_INIT_BYTES: [u8; 3] = [0x21, 0x86, 0x04];

/// Post-name-entry hook site and the original bytes expected there.
pub const POSTNAME_HOOK_ADDR: usize = 0x18CE8;
/// `CALL $490E` — the original commit call displaced by the stub hook.
pub const EXPECT_POSTNAME_CALL: [u8; 3] = [0xCD, 0x0E, 0x49];

/// Code cave that must be all zero before injection.
pub const CAVE_START: usize = 0x0828;
pub const CAVE_END: usize = 0x08D0;

// --- Cartridge header fields ---

/// Cartridge type byte: set to MBC5 + RAM + BATTERY.
pub const CART_TYPE_ADDR: usize = 0x0147;
pub const CART_TYPE_MBC5_RAM_BATTERY: u8 = 0x1B;
/// RAM size byte: set to the 8 KiB size class.
pub const RAM_SIZE_ADDR: usize = 0x0149;
pub const RAM_SIZE_8K: u8 = 0x02;

/// Header checksum field and the range it covers.
pub const HEADER_CHECKSUM_ADDR: usize = 0x014D;
pub const HEADER_CHECKSUM_START: usize = 0x0134;
pub const HEADER_CHECKSUM_END: usize = 0x014D;

/// Global checksum field (2 bytes, big-endian).
pub const GLOBAL_CHECKSUM_ADDR: usize = 0x014E;

/// Smallest image the edit table can be applied to. Not overridable: writes
/// past the end of the buffer are impossible, force or not.
pub const MIN_IMAGE_LEN: usize = POSTNAME_HOOK_ADDR + EXPECT_POSTNAME_CALL.len();

// --- Injected routines (Game Boy SM83 machine code) ---

/// Re-issues the displaced commit call, then saves high scores to SRAM.
pub const STUB: [u8; 7] = [
    0xCD, 0x0E, 0x49, // CALL $490E (the displaced original call)
    0xCD, SAVE_ADDR as u8, (SAVE_ADDR >> 8) as u8, // CALL save routine
    0xC9, // RET
];

/// Tries to load saved scores; falls back to the original ROM table copy.
pub const INIT: [u8; 23] = [
    0xCD, LOAD_ADDR as u8, (LOAD_ADDR >> 8) as u8, // CALL load routine
    0xB7, // OR A
    0xC0, // RET NZ (loaded from SRAM)
    0x21, 0x86, 0x04, // LD HL,$0486
    0x11, 0x00, 0xDD, // LD DE,$DD00
    0x01, 0x5A, 0x00, // LD BC,$005A
    0x2A, // LD A,(HL+)
    0x12, // LD (DE),A
    0x13, // INC DE
    0x0B, // DEC BC
    0x78, // LD A,B
    0xB1, // OR C
    0x20, 0xF8, // JR NZ,-8
    0xC9, // RET
];

/// Copies 0x5A bytes from SRAM to WRAM when the "HS" signature is present.
/// Returns A=1 on success, A=0 when SRAM holds no valid save.
pub const LOAD: [u8; 72] = [
    0xC5, // PUSH BC
    0xD5, // PUSH DE
    0xE5, // PUSH HL
    0xF0, 0x70, // LDH A,($70)
    0x4F, // LD C,A
    0x3E, 0x01, // LD A,$01
    0xE0, 0x70, // LDH ($70),A
    0x3E, 0x0A, // LD A,$0A
    0xEA, 0x00, 0x00, // LD ($0000),A  ; RAMG enable
    0xAF, // XOR A
    0xEA, 0x00, 0x40, // LD ($4000),A  ; RAMB=0
    0x21, 0x00, 0xA0, // LD HL,$A000
    0x7E, // LD A,(HL)
    0xFE, 0x48, // CP 'H'
    0x20, 0x21, // JR NZ,invalid
    0x23, // INC HL
    0x7E, // LD A,(HL)
    0xFE, 0x53, // CP 'S'
    0x20, 0x1B, // JR NZ,invalid
    0x21, 0x02, 0xA0, // LD HL,$A002
    0x11, 0x00, 0xDD, // LD DE,$DD00
    0x06, 0x5A, // LD B,$5A
    0x2A, // LD A,(HL+)
    0x12, // LD (DE),A
    0x13, // INC DE
    0x05, // DEC B
    0x20, 0xFA, // JR NZ,loop
    0xAF, // XOR A
    0xEA, 0x00, 0x00, // LD ($0000),A  ; SRAM disable
    0x79, // LD A,C
    0xE0, 0x70, // LDH ($70),A
    0xE1, // POP HL
    0xD1, // POP DE
    0xC1, // POP BC
    0x3E, 0x01, // LD A,$01
    0xC9, // RET
    // invalid:
    0xAF, // XOR A
    0xEA, 0x00, 0x00, // LD ($0000),A  ; SRAM disable
    0x79, // LD A,C
    0xE0, 0x70, // LDH ($70),A
    0xE1, // POP HL
    0xD1, // POP DE
    0xC1, // POP BC
    0xAF, // XOR A
    0xC9, // RET
];

/// Copies 0x5A bytes from WRAM to SRAM and writes the "HS" signature.
/// Note: ends at 0x08D6, a few bytes past the checked cave range; the bytes
/// beyond 0x08D0 are unused in the target image as well.
pub const SAVE: [u8; 54] = [
    0xC5, // PUSH BC
    0xD5, // PUSH DE
    0xE5, // PUSH HL
    0xF0, 0x70, // LDH A,($70)
    0x4F, // LD C,A
    0x3E, 0x01, // LD A,$01
    0xE0, 0x70, // LDH ($70),A
    0x3E, 0x0A, // LD A,$0A
    0xEA, 0x00, 0x00, // LD ($0000),A  ; RAMG enable
    0xAF, // XOR A
    0xEA, 0x00, 0x40, // LD ($4000),A  ; RAMB=0
    0x21, 0x00, 0xDD, // LD HL,$DD00
    0x11, 0x02, 0xA0, // LD DE,$A002
    0x06, 0x5A, // LD B,$5A
    0x2A, // LD A,(HL+)
    0x12, // LD (DE),A
    0x13, // INC DE
    0x05, // DEC B
    0x20, 0xFA, // JR NZ,loop
    0x3E, 0x48, // LD A,'H'
    0xEA, 0x00, 0xA0, // LD ($A000),A
    0x3E, 0x53, // LD A,'S'
    0xEA, 0x01, 0xA0, // LD ($A001),A
    0xAF, // XOR A
    0xEA, 0x00, 0x00, // LD ($0000),A  ; SRAM disable
    0x79, // LD A,C
    0xE0, 0x70, // LDH ($70),A
    0xE1, // POP HL
    0xD1, // POP DE
    0xC1, // POP BC
    0xC9, // RET
];

/// `JP init` written over the init-path hook site.
pub const INIT_HOOK: [u8; 3] = [0xC3, INIT_ADDR as u8, (INIT_ADDR >> 8) as u8];
/// `CALL stub` written over the post-name-entry hook site.
pub const POSTNAME_HOOK: [u8; 3] = [0xCD, STUB_ADDR as u8, (STUB_ADDR >> 8) as u8];

// --- Edit and check tables ---

/// One fixed injection: a byte sequence written at a fixed address.
#[derive(Debug, Clone, Copy)]
pub struct EditRecord {
    pub name: &'static str,
    pub addr: usize,
    pub bytes: &'static [u8],
}

/// All code injections, in application order: routine bodies first, then the
/// two call-site redirections into them.
pub const EDITS: [EditRecord; 6] = [
    EditRecord { name: "save call stub", addr: STUB_ADDR, bytes: &STUB },
    EditRecord { name: "init/load routine", addr: INIT_ADDR, bytes: &INIT },
    EditRecord { name: "load routine", addr: LOAD_ADDR, bytes: &LOAD },
    EditRecord { name: "save routine", addr: SAVE_ADDR, bytes: &SAVE },
    EditRecord { name: "init hook", addr: INIT_HOOK_ADDR, bytes: &INIT_HOOK },
    EditRecord { name: "post-name hook", addr: POSTNAME_HOOK_ADDR, bytes: &POSTNAME_HOOK },
];

/// Unconditional header field writes, applied after the code injections.
pub const HEADER_WRITES: [(usize, u8); 2] = [
    (CART_TYPE_ADDR, CART_TYPE_MBC5_RAM_BATTERY),
    (RAM_SIZE_ADDR, RAM_SIZE_8K),
];

/// A precondition that must hold (or be forced past) before any mutation.
#[derive(Debug, Clone, Copy)]
pub enum LayoutCheck {
    /// The bytes at `addr` must equal `expected` exactly.
    Bytes {
        label: &'static str,
        addr: usize,
        expected: &'static [u8],
    },
    /// Every byte in `start..end` must be 0x00.
    EmptyCave { start: usize, end: usize },
}

/// All precondition checks, evaluated independently and in order.
pub const CHECKS: [LayoutCheck; 3] = [
    LayoutCheck::Bytes {
        label: "Init routine bytes",
        addr: INIT_HOOK_ADDR,
        expected: &EXPECT_INIT_BYTES,
    },
    LayoutCheck::Bytes {
        label: "Post-name call bytes",
        addr: POSTNAME_HOOK_ADDR,
        expected: &EXPECT_POSTNAME_CALL,
    },
    LayoutCheck::EmptyCave {
        start: CAVE_START,
        end: CAVE_END,
    },
];
