//! Explicit numeric conversions between integer widths/signedness and
//! floating-point (spec.md §4.E "Conversions").
//!
//! Rust's `as` cast between float and integer types already saturates
//! out-of-range values and maps NaN to zero, matching the rules specified
//! for `CVTF*I*`/`CVTF*U*` exactly.

use crate::error::VmError;
use crate::instruction::Instruction;
use crate::opcode::Opcode;

use super::Engine;

pub(super) fn exec(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    use Opcode::*;
    let regs = &mut engine.regs;
    let d = inst.d();
    let s1 = inst.s1();
    match op {
        CvtI32I64 => {
            let v: i32 = regs.read(s1)?;
            regs.write::<i64>(d, v as i64)?;
        }
        CvtI64I32 => {
            let v: i64 = regs.read(s1)?;
            // The destination's unused high bits are zero (spec.md §4.E), so
            // this goes through `u64` rather than the sign-extending
            // `i32`/`RegisterValue` path.
            regs.write::<u64>(d, (v as i32 as u32) as u64)?;
        }
        CvtU32U64 => {
            let v: u32 = regs.read(s1)?;
            regs.write::<u64>(d, v as u64)?;
        }
        CvtU64U32 => {
            let v: u64 = regs.read(s1)?;
            regs.write::<u32>(d, v as u32)?;
        }
        CvtI32F32 => {
            let v: i32 = regs.read(s1)?;
            regs.write::<f32>(d, v as f32)?;
        }
        CvtI64F64 => {
            let v: i64 = regs.read(s1)?;
            regs.write::<f64>(d, v as f64)?;
        }
        CvtU32F32 => {
            let v: u32 = regs.read(s1)?;
            regs.write::<f32>(d, v as f32)?;
        }
        CvtU64F64 => {
            let v: u64 = regs.read(s1)?;
            regs.write::<f64>(d, v as f64)?;
        }
        CvtF32I32 => {
            let v: f32 = regs.read(s1)?;
            // Same zero-upper-bits rule as `CvtI64I32` above.
            regs.write::<u64>(d, (v as i32 as u32) as u64)?;
        }
        CvtF64I64 => {
            let v: f64 = regs.read(s1)?;
            regs.write::<i64>(d, v as i64)?;
        }
        CvtF32U32 => {
            let v: f32 = regs.read(s1)?;
            regs.write::<u32>(d, v as u32)?;
        }
        CvtF64U64 => {
            let v: f64 = regs.read(s1)?;
            regs.write::<u64>(d, v as u64)?;
        }
        CvtF32F64 => {
            let v: f32 = regs.read(s1)?;
            regs.write::<f64>(d, v as f64)?;
        }
        CvtF64F32 => {
            let v: f64 = regs.read(s1)?;
            regs.write::<f32>(d, v as f32)?;
        }
        _ => unreachable!("convert::exec called with a non-conversion opcode"),
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
    fn int_float_round_trip() {
        let mut e = engine();
        e.regs.write::<i32>(1, 42).unwrap();
        let to_f = Instruction::decode([Opcode::CvtI32F32 as u8, 0x01, 0x00, 0x00]);
        exec(&mut e, Opcode::CvtI32F32, to_f).unwrap();
        assert_eq!(e.regs.read::<f32>(0).unwrap(), 42.0);

        let back = Instruction::decode([Opcode::CvtF32I32 as u8, 0x10, 0x00, 0x00]);
        exec(&mut e, Opcode::CvtF32I32, back).unwrap();
        assert_eq!(e.regs.read::<i32>(1).unwrap(), 42);
    }

    #[test]
    fn nan_to_int_saturates_to_zero() {
        let mut e = engine();
        e.regs.write::<f32>(1, f32::NAN).unwrap();
        let inst = Instruction::decode([Opcode::CvtF32I32 as u8, 0x01, 0x00, 0x00]);
        exec(&mut e, Opcode::CvtF32I32, inst).unwrap();
        assert_eq!(e.regs.read::<i32>(0).unwrap(), 0);
    }

    #[test]
    fn narrowing_truncates() {
        let mut e = engine();
        e.regs.write::<i64>(1, 0x1_0000_0001).unwrap();
        let inst = Instruction::decode([Opcode::CvtI64I32 as u8, 0x01, 0x00, 0x00]);
        exec(&mut e, Opcode::CvtI64I32, inst).unwrap();
        assert_eq!(e.regs.read::<i32>(0).unwrap(), 1);
    }

    #[test]
    fn narrowing_signed_conversions_zero_the_upper_bits() {
        let mut e = engine();
        e.regs.write::<i64>(1, -1).unwrap();
        let inst = Instruction::decode([Opcode::CvtI64I32 as u8, 0x01, 0x00, 0x00]);
        exec(&mut e, Opcode::CvtI64I32, inst).unwrap();
        assert_eq!(e.regs.read::<u64>(0).unwrap(), 0xFFFF_FFFF);

        let mut e = engine();
        e.regs.write::<f32>(1, -1.0).unwrap();
        let inst = Instruction::decode([Opcode::CvtF32I32 as u8, 0x01, 0x00, 0x00]);
        exec(&mut e, Opcode::CvtF32I32, inst).unwrap();
        assert_eq!(e.regs.read::<u64>(0).unwrap(), 0xFFFF_FFFF);
    }
}
