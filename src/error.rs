//! Runtime interpreter error variants.
//!
//! Every variant here is fatal: the engine surfaces it to its caller and
//! transitions to [`crate::interpreter::State::Halted`](crate::interpreter::State::Halted).
//! There is no resume-after-error contract (spec.md §7).

use thiserror::Error;

/// Errors raised by the register file, memory manager, or execution engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Loaded bytecode exceeds the configured code segment size.
    #[error("program of {size} bytes exceeds the {capacity}-byte code segment")]
    ProgramTooLarge {
        /// Size of the bytecode that was loaded.
        size: usize,
        /// Capacity of the code segment.
        capacity: usize,
    },

    /// Opcode byte `0x00` or an otherwise unassigned opcode byte was fetched.
    #[error("invalid opcode byte {0:#04x}")]
    InvalidOpcode(u8),

    /// A register index outside `[0, 16)` was used.
    #[error("register index {0} is out of range")]
    InvalidRegister(u8),

    /// A memory read touched bytes outside every region.
    #[error("read of {len} bytes at address {addr:#x} is outside every memory region")]
    InvalidRead {
        /// Address the read started at.
        addr: u64,
        /// Number of bytes requested.
        len: u8,
    },

    /// A memory write touched the code region or bytes outside every region.
    #[error("write of {len} bytes at address {addr:#x} is invalid (read-only or out of bounds)")]
    InvalidWrite {
        /// Address the write started at.
        addr: u64,
        /// Number of bytes written.
        len: u8,
    },

    /// A stack push/pop moved `sp` outside the configured stack region.
    #[error("stack pointer {sp:#x} is out of bounds")]
    StackOutOfBounds {
        /// The stack pointer value that violated the bound.
        sp: u64,
    },

    /// The bump allocator could not satisfy an `alloc` request.
    #[error("heap exhausted: {requested} bytes requested, {remaining} remaining")]
    HeapExhausted {
        /// Bytes requested.
        requested: u64,
        /// Bytes left in the heap.
        remaining: u64,
    },

    /// `DIVI`/`DIVU`/`MODI`/`MODU` with a zero right-hand operand.
    #[error("division by zero")]
    DivideByZero,

    /// Signed `INT_MIN / -1` or `INT_MIN % -1`.
    #[error("signed integer overflow")]
    IntegerOverflow,

    /// `SYSCALL` was executed; no syscall semantics are defined.
    #[error("syscall is not implemented")]
    UnimplementedSyscall,

    /// `GETCHAR`/`PUTCHAR` failed at the stream boundary.
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for VmError {
    fn from(e: std::io::Error) -> Self {
        VmError::Io(e.to_string())
    }
}
