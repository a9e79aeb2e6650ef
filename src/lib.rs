//! CRVM: a register-based virtual machine executing a fixed-width,
//! little-endian, 4-byte instruction encoding.
//!
//! The crate never installs a global `tracing` subscriber — that is left
//! to the binaries in `src/bin/`, matching the library/CLI split used
//! throughout this codebase.

pub mod consts;
pub mod debug;
pub mod disasm;
pub mod error;
pub mod instruction;
pub mod interpreter;
pub mod loader;
pub mod memory;
pub mod opcode;
pub mod register;

pub use debug::Debugger;
pub use error::VmError;
pub use interpreter::{Engine, State};
