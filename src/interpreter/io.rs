//! `GETCHAR`/`PUTCHAR`: raw byte I/O against the process's standard streams
//! (spec.md §4.E "Other", §6 "Standard streams").

use std::io::{Read, Write};

use crate::error::VmError;
use crate::instruction::Instruction;

use super::Engine;

/// Sentinel value `GETCHAR` writes on end-of-file, since the spec leaves
/// the exact sentinel to the implementer and zero-extension would
/// otherwise be indistinguishable from a real NUL byte.
const EOF_SENTINEL: i64 = -1;

/// `GETCHAR`: read one byte from stdin, zero-extend into `D`, or write the
/// EOF sentinel.
pub(super) fn exec_getchar(engine: &mut Engine, inst: Instruction) -> Result<Option<u64>, VmError> {
    let mut byte = [0u8; 1];
    let value = match engine.stdin.read(&mut byte)? {
        0 => EOF_SENTINEL,
        _ => byte[0] as i64,
    };
    engine.regs.write::<i64>(inst.d(), value)?;
    Ok(None)
}

/// `PUTCHAR`: write the low byte of `reg[S1]` to stdout as a raw byte.
pub(super) fn exec_putchar(engine: &mut Engine, inst: Instruction) -> Result<Option<u64>, VmError> {
    let value: u8 = engine.regs.read(inst.s1())?;
    engine.stdout.write_all(&[value])?;
    engine.stdout.flush()?;
    Ok(None)
}
