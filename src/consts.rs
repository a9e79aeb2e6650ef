//! VM parameters: register indices, instruction shape, segment layout.

/// Number of registers in the register file.
pub const REGISTER_COUNT: usize = 16;

/// Smallest general-purpose register index. Indices `0..=12` are callee-saved
/// by convention; the engine places no other constraint on them.
pub const REG_GP_FIRST: usize = 0x0;

/// Largest general-purpose register index.
pub const REG_GP_LAST: usize = 0xc;

/// Return-value register.
pub const REG_RA: usize = 0xd;

/// Base pointer.
pub const REG_BP: usize = 0xe;

/// Stack pointer.
pub const REG_SP: usize = 0xf;

/// Width in bytes of a fetched instruction.
pub const INSTRUCTION_LEN: u64 = 4;

/// Width in bytes of a stack cell (one register).
pub const STACK_CELL_LEN: u64 = 8;

/// Base address of the code segment.
pub const CODE_BASE: u64 = 0x0000_0000;

/// Base address of the heap segment.
pub const HEAP_BASE: u64 = 0x1000_0000;

/// Highest legal stack address (the stack grows down from here).
pub const STACK_TOP: u64 = 0xFFFF_FFFF;

/// Default heap capacity: 1 MiB.
pub const DEFAULT_HEAP_SIZE: u64 = 1024 * 1024;

/// Default stack capacity: 64 KiB.
pub const DEFAULT_STACK_SIZE: u64 = 64 * 1024;

/// Register names for disassembly/debugger display, indexed `0..16`.
pub const REGISTER_NAMES: [&str; REGISTER_COUNT] = [
    "r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "r10", "r11", "r12", "ra", "bp", "sp",
];
