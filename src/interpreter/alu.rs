//! Integer arithmetic: register-register and register-immediate forms at
//! 32- and 64-bit width (spec.md §4.E "Integer arithmetic").

use crate::error::VmError;
use crate::instruction::Instruction;
use crate::opcode::Opcode;

use super::Engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Divi,
    Divu,
    Modi,
    Modu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    W32,
    W64,
}

fn classify(op: Opcode) -> (Op, Width) {
    use Opcode::*;
    match op {
        Add32 | Add32I => (Op::Add, Width::W32),
        Sub32 | Sub32I => (Op::Sub, Width::W32),
        Mul32 | Mul32I => (Op::Mul, Width::W32),
        Divi32 | Divi32I => (Op::Divi, Width::W32),
        Divu32 | Divu32I => (Op::Divu, Width::W32),
        Modi32 | Modi32I => (Op::Modi, Width::W32),
        Modu32 | Modu32I => (Op::Modu, Width::W32),
        Add64 | Add64I => (Op::Add, Width::W64),
        Sub64 | Sub64I => (Op::Sub, Width::W64),
        Mul64 | Mul64I => (Op::Mul, Width::W64),
        Divi64 | Divi64I => (Op::Divi, Width::W64),
        Divu64 | Divu64I => (Op::Divu, Width::W64),
        Modi64 | Modi64I => (Op::Modi, Width::W64),
        Modu64 | Modu64I => (Op::Modu, Width::W64),
        _ => unreachable!("alu::classify called with a non-arithmetic opcode"),
    }
}

fn compute_signed(op: Op, a: i64, b: i64, width: Width) -> Result<i64, VmError> {
    match width {
        Width::W32 => compute_signed32(op, a as i32, b as i32),
        Width::W64 => compute_signed64(op, a, b),
    }
}

fn compute_signed32(op: Op, a: i32, b: i32) -> Result<i64, VmError> {
    let v = match op {
        Op::Add => a.wrapping_add(b),
        Op::Sub => a.wrapping_sub(b),
        Op::Mul => a.wrapping_mul(b),
        Op::Divi => {
            if b == 0 {
                return Err(VmError::DivideByZero);
            }
            if a == i32::MIN && b == -1 {
                return Err(VmError::IntegerOverflow);
            }
            a.wrapping_div(b)
        }
        Op::Modi => {
            if b == 0 {
                return Err(VmError::DivideByZero);
            }
            if a == i32::MIN && b == -1 {
                return Err(VmError::IntegerOverflow);
            }
            a.wrapping_rem(b)
        }
        Op::Divu | Op::Modu => unreachable!("unsigned ops dispatched separately"),
    };
    Ok(v as i64)
}

fn compute_signed64(op: Op, a: i64, b: i64) -> Result<i64, VmError> {
    let v = match op {
        Op::Add => a.wrapping_add(b),
        Op::Sub => a.wrapping_sub(b),
        Op::Mul => a.wrapping_mul(b),
        Op::Divi => {
            if b == 0 {
                return Err(VmError::DivideByZero);
            }
            if a == i64::MIN && b == -1 {
                return Err(VmError::IntegerOverflow);
            }
            a.wrapping_div(b)
        }
        Op::Modi => {
            if b == 0 {
                return Err(VmError::DivideByZero);
            }
            if a == i64::MIN && b == -1 {
                return Err(VmError::IntegerOverflow);
            }
            a.wrapping_rem(b)
        }
        Op::Divu | Op::Modu => unreachable!("unsigned ops dispatched separately"),
    };
    Ok(v)
}

fn compute_unsigned(op: Op, a: u64, b: u64, width: Width) -> Result<u64, VmError> {
    match width {
        Width::W32 => compute_unsigned32(op, a as u32, b as u32).map(|v| v as u64),
        Width::W64 => compute_unsigned64(op, a, b),
    }
}

fn compute_unsigned32(op: Op, a: u32, b: u32) -> Result<u32, VmError> {
    match op {
        Op::Divu => {
            if b == 0 {
                return Err(VmError::DivideByZero);
            }
            Ok(a.wrapping_div(b))
        }
        Op::Modu => {
            if b == 0 {
                return Err(VmError::DivideByZero);
            }
            Ok(a.wrapping_rem(b))
        }
        _ => unreachable!("only divu/modu use unsigned arithmetic"),
    }
}

fn compute_unsigned64(op: Op, a: u64, b: u64) -> Result<u64, VmError> {
    match op {
        Op::Divu => {
            if b == 0 {
                return Err(VmError::DivideByZero);
            }
            Ok(a.wrapping_div(b))
        }
        Op::Modu => {
            if b == 0 {
                return Err(VmError::DivideByZero);
            }
            Ok(a.wrapping_rem(b))
        }
        _ => unreachable!("only divu/modu use unsigned arithmetic"),
    }
}

/// Register-register form (`0x10..0x1D`): `D = S1 op S2`.
pub(super) fn exec_reg(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    let (kind, width) = classify(op);
    match kind {
        Op::Divu | Op::Modu => {
            let a: u64 = read_width_u(engine, inst.s1(), width)?;
            let b: u64 = read_width_u(engine, inst.s2(), width)?;
            let v = compute_unsigned(kind, a, b, width)?;
            write_width_u(engine, inst.d(), width, v)?;
        }
        _ => {
            let a: i64 = read_width_i(engine, inst.s1(), width)?;
            let b: i64 = read_width_i(engine, inst.s2(), width)?;
            let v = compute_signed(kind, a, b, width)?;
            write_width_i(engine, inst.d(), width, v)?;
        }
    }
    Ok(None)
}

/// Register-immediate form (`0x20..0x2D`): `D = S1 op sign_extend(imm16)`.
pub(super) fn exec_imm(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    let (kind, width) = classify(op);
    let imm = inst.imm16 as i64;
    match kind {
        Op::Divu | Op::Modu => {
            let a: u64 = read_width_u(engine, inst.s1(), width)?;
            let v = compute_unsigned(kind, a, imm as u64, width)?;
            write_width_u(engine, inst.d(), width, v)?;
        }
        _ => {
            let a: i64 = read_width_i(engine, inst.s1(), width)?;
            let v = compute_signed(kind, a, imm, width)?;
            write_width_i(engine, inst.d(), width, v)?;
        }
    }
    Ok(None)
}

fn read_width_i(engine: &Engine, index: usize, width: Width) -> Result<i64, VmError> {
    match width {
        Width::W32 => engine.regs.read::<i32>(index).map(|v| v as i64),
        Width::W64 => engine.regs.read::<i64>(index),
    }
}

fn write_width_i(engine: &mut Engine, index: usize, width: Width, value: i64) -> Result<(), VmError> {
    match width {
        Width::W32 => engine.regs.write::<i32>(index, value as i32),
        Width::W64 => engine.regs.write::<i64>(index, value),
    }
}

fn read_width_u(engine: &Engine, index: usize, width: Width) -> Result<u64, VmError> {
    match width {
        Width::W32 => engine.regs.read::<u32>(index).map(|v| v as u64),
        Width::W64 => engine.regs.read::<u64>(index),
    }
}

fn write_width_u(engine: &mut Engine, index: usize, width: Width, value: u64) -> Result<(), VmError> {
    match width {
        Width::W32 => engine.regs.write::<u32>(index, value as u32),
        Width::W64 => engine.regs.write::<u64>(index, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;

    fn engine() -> Engine {
        Engine::new(vec![0; 4], 256, 256, false).unwrap()
    }

    #[test]
    fn add32_sign_extends_result() {
        let mut e = engine();
        e.regs.write::<i32>(1, -1).unwrap();
        e.regs.write::<i32>(2, 0).unwrap();
        // add32 d=0 s1=1 s2=2
        let inst = Instruction::decode([Opcode::Add32 as u8, 0x01, 0x20, 0x00]);
        exec_reg(&mut e, Opcode::Add32, inst).unwrap();
        assert_eq!(e.regs.read::<i64>(0).unwrap(), -1);
    }

    #[test]
    fn divi32_by_zero_is_fatal() {
        let mut e = engine();
        e.regs.write::<i32>(1, 10).unwrap();
        e.regs.write::<i32>(2, 0).unwrap();
        let inst = Instruction::decode([Opcode::Divi32 as u8, 0x01, 0x20, 0x00]);
        assert!(matches!(exec_reg(&mut e, Opcode::Divi32, inst), Err(VmError::DivideByZero)));
    }

    #[test]
    fn divi32_int_min_by_minus_one_overflows() {
        let mut e = engine();
        e.regs.write::<i32>(1, i32::MIN).unwrap();
        e.regs.write::<i32>(2, -1).unwrap();
        let inst = Instruction::decode([Opcode::Divi32 as u8, 0x01, 0x20, 0x00]);
        assert!(matches!(
            exec_reg(&mut e, Opcode::Divi32, inst),
            Err(VmError::IntegerOverflow)
        ));
    }

    #[test]
    fn add32i_uses_sign_extended_immediate() {
        let mut e = engine();
        e.regs.write::<i32>(1, 5).unwrap();
        let inst = Instruction::decode([Opcode::Add32I as u8, 0x01, 0xFF, 0xFF]);
        exec_imm(&mut e, Opcode::Add32I, inst).unwrap();
        assert_eq!(e.regs.read::<i64>(0).unwrap(), 4);
    }
}
