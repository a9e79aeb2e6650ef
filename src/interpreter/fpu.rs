//! IEEE-754 floating-point arithmetic at single (f32) and double (f64)
//! precision (spec.md §4.E "Floating-point").

use crate::error::VmError;
use crate::instruction::Instruction;
use crate::opcode::Opcode;

use super::Engine;

/// Binary float ops (`ADD`/`SUB`/`MUL`/`DIV`, both widths): `D = S1 op S2`.
pub(super) fn exec_binary(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    use Opcode::*;
    match op {
        AddF32 | SubF32 | MulF32 | DivF32 => {
            let a: f32 = engine.regs.read(inst.s1())?;
            let b: f32 = engine.regs.read(inst.s2())?;
            let v = match op {
                AddF32 => a + b,
                SubF32 => a - b,
                MulF32 => a * b,
                DivF32 => a / b,
                _ => unreachable!(),
            };
            engine.regs.write::<f32>(inst.d(), v)?;
        }
        AddF64 | SubF64 | MulF64 | DivF64 => {
            let a: f64 = engine.regs.read(inst.s1())?;
            let b: f64 = engine.regs.read(inst.s2())?;
            let v = match op {
                AddF64 => a + b,
                SubF64 => a - b,
                MulF64 => a * b,
                DivF64 => a / b,
                _ => unreachable!(),
            };
            engine.regs.write::<f64>(inst.d(), v)?;
        }
        _ => unreachable!("exec_binary called with a non-binary-float opcode"),
    }
    Ok(None)
}

/// Unary float ops (`SQRT`/`ABS`/`NEG`, both widths): `D = op(S1)`.
pub(super) fn exec_unary(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    use Opcode::*;
    match op {
        SqrtF32 | AbsF32 | NegF32 => {
            let a: f32 = engine.regs.read(inst.s1())?;
            let v = match op {
                SqrtF32 => a.sqrt(),
                AbsF32 => a.abs(),
                NegF32 => -a,
                _ => unreachable!(),
            };
            engine.regs.write::<f32>(inst.d(), v)?;
        }
        SqrtF64 | AbsF64 | NegF64 => {
            let a: f64 = engine.regs.read(inst.s1())?;
            let v = match op {
                SqrtF64 => a.sqrt(),
                AbsF64 => a.abs(),
                NegF64 => -a,
                _ => unreachable!(),
            };
            engine.regs.write::<f64>(inst.d(), v)?;
        }
        _ => unreachable!("exec_unary called with a non-unary-float opcode"),
    }
    Ok(None)
}
