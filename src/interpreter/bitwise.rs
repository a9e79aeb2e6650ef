//! Logical/bitwise and shift operations at 32- and 64-bit width, register
//! and immediate forms (spec.md §4.E "Bitwise / shift").

use crate::error::VmError;
use crate::instruction::Instruction;
use crate::opcode::Opcode;

use super::Engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Sll,
    Srl,
    Sra,
    Or,
    And,
    Xor,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    W32,
    W64,
}

fn classify(op: Opcode) -> (Op, Width) {
    use Opcode::*;
    match op {
        Sll32 | Sll32I => (Op::Sll, Width::W32),
        Srl32 | Srl32I => (Op::Srl, Width::W32),
        Sra32 | Sra32I => (Op::Sra, Width::W32),
        Or32 | Or32I => (Op::Or, Width::W32),
        And32 | And32I => (Op::And, Width::W32),
        Xor32 | Xor32I => (Op::Xor, Width::W32),
        Not32 => (Op::Not, Width::W32),
        Sll64 | Sll64I => (Op::Sll, Width::W64),
        Srl64 | Srl64I => (Op::Srl, Width::W64),
        Sra64 | Sra64I => (Op::Sra, Width::W64),
        Or64 | Or64I => (Op::Or, Width::W64),
        And64 | And64I => (Op::And, Width::W64),
        Xor64 | Xor64I => (Op::Xor, Width::W64),
        Not64 => (Op::Not, Width::W64),
        _ => unreachable!("bitwise::classify called with a non-bitwise opcode"),
    }
}

/// Recommended masking of an out-of-range shift amount to `[0, width-1]`
/// (spec.md §4.E).
fn mask_shift(amount: u64, width: Width) -> u32 {
    let mask = match width {
        Width::W32 => 31,
        Width::W64 => 63,
    };
    (amount & mask) as u32
}

fn compute32(op: Op, a: u32, b: u32) -> u32 {
    match op {
        Op::Sll => a.wrapping_shl(mask_shift(b as u64, Width::W32)),
        Op::Srl => a.wrapping_shr(mask_shift(b as u64, Width::W32)),
        Op::Sra => ((a as i32).wrapping_shr(mask_shift(b as u64, Width::W32))) as u32,
        Op::Or => a | b,
        Op::And => a & b,
        Op::Xor => a ^ b,
        Op::Not => !a,
    }
}

fn compute64(op: Op, a: u64, b: u64) -> u64 {
    match op {
        Op::Sll => a.wrapping_shl(mask_shift(b, Width::W64)),
        Op::Srl => a.wrapping_shr(mask_shift(b, Width::W64)),
        Op::Sra => ((a as i64).wrapping_shr(mask_shift(b, Width::W64))) as u64,
        Op::Or => a | b,
        Op::And => a & b,
        Op::Xor => a ^ b,
        Op::Not => !a,
    }
}

/// Register-register form: `D = S1 op S2` (unary `NOT` ignores `S2`).
pub(super) fn exec_reg(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    let (kind, width) = classify(op);
    apply(engine, kind, width, inst.d(), inst.s1(), |e| match width {
        Width::W32 => e.regs.read::<u32>(inst.s2()).map(|v| v as u64),
        Width::W64 => e.regs.read::<u64>(inst.s2()),
    })
}

/// Register-immediate form: `D = S1 op sign_extend(imm16)`.
pub(super) fn exec_imm(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    let (kind, width) = classify(op);
    let imm = inst.imm16 as i64 as u64;
    apply(engine, kind, width, inst.d(), inst.s1(), move |_| Ok(imm))
}

fn apply(
    engine: &mut Engine,
    kind: Op,
    width: Width,
    d: usize,
    s1: usize,
    rhs: impl FnOnce(&Engine) -> Result<u64, VmError>,
) -> Result<Option<u64>, VmError> {
    let b = rhs(engine)?;
    match width {
        Width::W32 => {
            let a: u32 = engine.regs.read(s1)?;
            let v = compute32(kind, a, b as u32);
            // Sign-extend the 32-bit result to 64 bits (spec.md §4.E), rather
            // than the zero-extension `write::<u32>` would give.
            engine.regs.write::<i64>(d, v as i32 as i64)?;
        }
        Width::W64 => {
            let a: u64 = engine.regs.read(s1)?;
            let v = compute64(kind, a, b);
            engine.regs.write::<u64>(d, v)?;
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(vec![0; 4], 256, 256, false).unwrap()
    }

    #[test]
    fn sra_is_sign_propagating() {
        let mut e = engine();
        e.regs.write::<i32>(1, -8).unwrap();
        e.regs.write::<i32>(2, 1).unwrap();
        let inst = Instruction::decode([Opcode::Sra32 as u8, 0x01, 0x20, 0x00]);
        exec_reg(&mut e, Opcode::Sra32, inst).unwrap();
        assert_eq!(e.regs.read::<i32>(0).unwrap(), -4);
    }

    #[test]
    fn srl_is_zero_filled() {
        let mut e = engine();
        e.regs.write::<u32>(1, 0x8000_0000).unwrap();
        e.regs.write::<u32>(2, 4).unwrap();
        let inst = Instruction::decode([Opcode::Srl32 as u8, 0x01, 0x20, 0x00]);
        exec_reg(&mut e, Opcode::Srl32, inst).unwrap();
        assert_eq!(e.regs.read::<u32>(0).unwrap(), 0x0800_0000);
    }

    #[test]
    fn not_is_unary() {
        let mut e = engine();
        e.regs.write::<u32>(1, 0).unwrap();
        let inst = Instruction::decode([Opcode::Not32 as u8, 0x01, 0x00, 0x00]);
        exec_reg(&mut e, Opcode::Not32, inst).unwrap();
        assert_eq!(e.regs.read::<u32>(0).unwrap(), u32::MAX);
    }

    #[test]
    fn width_32_result_is_sign_extended_to_64_bits() {
        let mut e = engine();
        e.regs.write::<u32>(1, 0).unwrap();
        let inst = Instruction::decode([Opcode::Not32 as u8, 0x01, 0x00, 0x00]);
        exec_reg(&mut e, Opcode::Not32, inst).unwrap();
        assert_eq!(e.regs.read::<u64>(0).unwrap(), u64::MAX);
    }

    #[test]
    fn shift_amount_is_masked() {
        let mut e = engine();
        e.regs.write::<u32>(1, 1).unwrap();
        // shift by 32 masks to 0 at width 32
        let inst = Instruction::decode([Opcode::Sll32I as u8, 0x01, 32, 0]);
        exec_imm(&mut e, Opcode::Sll32I, inst).unwrap();
        assert_eq!(e.regs.read::<u32>(0).unwrap(), 1);
    }
}
