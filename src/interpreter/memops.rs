//! Immediate loaders (`LUI`/`LLI`) and segmented-memory loads/stores
//! (spec.md §4.E "Immediate loaders", "Loads", "Stores").

use crate::error::VmError;
use crate::instruction::Instruction;
use crate::opcode::Opcode;

use super::Engine;

/// `LUI`/`LLI`: replace 16 bits of `D`, leaving the rest of the register
/// untouched.
pub(super) fn exec_immediate_load(
    engine: &mut Engine,
    op: Opcode,
    inst: Instruction,
) -> Result<Option<u64>, VmError> {
    let imm = inst.imm16 as u16;
    match op {
        Opcode::Lli => engine.regs.set_low16(inst.d(), imm)?,
        Opcode::Lui => engine.regs.set_high16_of_low32(inst.d(), imm)?,
        _ => unreachable!("exec_immediate_load called with neither LUI nor LLI"),
    }
    Ok(None)
}

fn effective_address(engine: &Engine, base_index: usize, offset: i16) -> Result<u64, VmError> {
    let base: u64 = engine.regs.read(base_index)?;
    Ok(base.wrapping_add(offset as i64 as u64))
}

/// `LOAD8/16/32/64` (sign-extending) and `LOADU8/16/32` (zero-extending):
/// `D = *(S1 + sign_extend(offset16))`.
pub(super) fn exec_load(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    let addr = effective_address(engine, inst.s1(), inst.imm16)?;
    use Opcode::*;
    let value: i64 = match op {
        Load8 => engine.mem.read_uint(addr, 1)? as u8 as i8 as i64,
        Load16 => engine.mem.read_uint(addr, 2)? as u16 as i16 as i64,
        Load32 => engine.mem.read_uint(addr, 4)? as u32 as i32 as i64,
        Load64 => engine.mem.read_uint(addr, 8)? as i64,
        LoadU8 => engine.mem.read_uint(addr, 1)? as i64,
        LoadU16 => engine.mem.read_uint(addr, 2)? as i64,
        LoadU32 => engine.mem.read_uint(addr, 4)? as i64,
        _ => unreachable!("exec_load called with a non-load opcode"),
    };
    engine.regs.write::<i64>(inst.d(), value)?;
    Ok(None)
}

/// `STORE8/16/32/64`: `*(D + sign_extend(offset16)) = low_bytes(S1)`.
pub(super) fn exec_store(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    let addr = effective_address(engine, inst.d(), inst.imm16)?;
    let value: u64 = engine.regs.read(inst.s1())?;
    use Opcode::*;
    let len = match op {
        Store8 => 1,
        Store16 => 2,
        Store32 => 4,
        Store64 => 8,
        _ => unreachable!("exec_store called with a non-store opcode"),
    };
    engine.mem.write_uint(addr, len, value)?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::HEAP_BASE;

    fn engine() -> Engine {
        Engine::new(vec![0; 4], 256, 256, false).unwrap()
    }

    #[test]
    fn lli_then_lui_builds_low32() {
        let mut e = engine();
        let lli = Instruction::decode([Opcode::Lli as u8, 0x00, 0x34, 0x12]);
        exec_immediate_load(&mut e, Opcode::Lli, lli).unwrap();
        let lui = Instruction::decode([Opcode::Lui as u8, 0x00, 0x78, 0x56]);
        exec_immediate_load(&mut e, Opcode::Lui, lui).unwrap();
        assert_eq!(e.regs.raw(0).unwrap(), 0x5678_1234);
    }

    #[test]
    fn load32_sign_extends() {
        let mut e = engine();
        e.regs.write::<u64>(1, HEAP_BASE).unwrap();
        e.mem.write_uint(HEAP_BASE, 4, 0xFFFF_FFFF).unwrap();
        let inst = Instruction::decode([Opcode::Load32 as u8, 0x01, 0x00, 0x00]);
        exec_load(&mut e, Opcode::Load32, inst).unwrap();
        assert_eq!(e.regs.read::<i64>(0).unwrap(), -1);
    }

    #[test]
    fn loadu32_zero_extends() {
        let mut e = engine();
        e.regs.write::<u64>(1, HEAP_BASE).unwrap();
        e.mem.write_uint(HEAP_BASE, 4, 0xFFFF_FFFF).unwrap();
        let inst = Instruction::decode([Opcode::LoadU32 as u8, 0x01, 0x00, 0x00]);
        exec_load(&mut e, Opcode::LoadU32, inst).unwrap();
        assert_eq!(e.regs.read::<u64>(0).unwrap(), 0xFFFF_FFFF);
    }

    #[test]
    fn store32_then_load64_roundtrips_low_bytes() {
        let mut e = engine();
        e.regs.write::<u64>(0, HEAP_BASE).unwrap();
        e.regs.write::<u32>(1, 0xDEAD_BEEF).unwrap();
        let store = Instruction::decode([Opcode::Store32 as u8, 0x01, 0x00, 0x00]);
        exec_store(&mut e, Opcode::Store32, store).unwrap();
        assert_eq!(e.mem.read_uint(HEAP_BASE, 4).unwrap(), 0xDEAD_BEEF);
    }
}
