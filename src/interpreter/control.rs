//! Branches, jumps, and the call/ret/push/pop function-call protocol
//! (spec.md §4.E "Branches", "JMP", "Function protocol").
//!
//! Register-slot convention for the three-register branch form: since
//! spec.md's field table only names `D`/`S1`/`S2` for arithmetic shapes, a
//! branch's three registers are read positionally from the same byte
//! offsets — the first source in the `D` slot, the second source in the
//! `S1` slot, and the target-address register in the `S2` slot.

use crate::consts::STACK_CELL_LEN;
use crate::error::VmError;
use crate::instruction::Instruction;
use crate::opcode::Opcode;

use super::Engine;

/// `BEQ`/`BNE`/`BLT`/`BLE`/`BGT`/`BGE`: compare the low 32 bits of the two
/// source registers as unsigned, branch to `reg[target]` if taken.
pub(super) fn exec_branch(engine: &mut Engine, op: Opcode, inst: Instruction) -> Result<Option<u64>, VmError> {
    let a: u32 = engine.regs.read(inst.d())?;
    let b: u32 = engine.regs.read(inst.s1())?;
    let taken = match op {
        Opcode::Beq => a == b,
        Opcode::Bne => a != b,
        Opcode::Blt => a < b,
        Opcode::Ble => a <= b,
        Opcode::Bgt => a > b,
        Opcode::Bge => a >= b,
        _ => unreachable!("exec_branch called with a non-branch opcode"),
    };
    if taken {
        let target: u64 = engine.regs.read(inst.s2())?;
        Ok(Some(target))
    } else {
        Ok(None)
    }
}

/// `JMP reg[D]`: unconditional absolute jump.
pub(super) fn exec_jmp(engine: &mut Engine, inst: Instruction) -> Result<Option<u64>, VmError> {
    let target: u64 = engine.regs.read(inst.d())?;
    Ok(Some(target))
}

fn sp(engine: &Engine) -> Result<u64, VmError> {
    engine.regs.read(crate::consts::REG_SP)
}

fn set_sp(engine: &mut Engine, value: u64) -> Result<(), VmError> {
    engine.mem.check_stack_pointer(value)?;
    engine.regs.write::<u64>(crate::consts::REG_SP, value)
}

/// `CALL reg[D]`: push the return address, jump to the callee.
pub(super) fn exec_call(engine: &mut Engine, inst: Instruction) -> Result<Option<u64>, VmError> {
    let target: u64 = engine.regs.read(inst.d())?;
    let return_addr = engine.pc.wrapping_add(crate::consts::INSTRUCTION_LEN);
    let new_sp = sp(engine)?.wrapping_sub(STACK_CELL_LEN);
    engine.mem.check_stack_pointer(new_sp)?;
    engine.mem.write_uint(new_sp, 8, return_addr)?;
    set_sp(engine, new_sp)?;
    Ok(Some(target))
}

/// `RET`: pop the return address and resume there.
pub(super) fn exec_ret(engine: &mut Engine) -> Result<Option<u64>, VmError> {
    let cur_sp = sp(engine)?;
    let return_addr = engine.mem.read_uint(cur_sp, 8)?;
    set_sp(engine, cur_sp.wrapping_add(STACK_CELL_LEN))?;
    Ok(Some(return_addr))
}

/// `PUSH reg[S1]`: push one 8-byte stack cell.
pub(super) fn exec_push(engine: &mut Engine, inst: Instruction) -> Result<Option<u64>, VmError> {
    let value: u64 = engine.regs.read(inst.s1())?;
    let new_sp = sp(engine)?.wrapping_sub(STACK_CELL_LEN);
    engine.mem.check_stack_pointer(new_sp)?;
    engine.mem.write_uint(new_sp, 8, value)?;
    set_sp(engine, new_sp)?;
    Ok(None)
}

/// `POP reg[D]`: pop one 8-byte stack cell.
pub(super) fn exec_pop(engine: &mut Engine, inst: Instruction) -> Result<Option<u64>, VmError> {
    let cur_sp = sp(engine)?;
    let value = engine.mem.read_uint(cur_sp, 8)?;
    engine.regs.write::<u64>(inst.d(), value)?;
    set_sp(engine, cur_sp.wrapping_add(STACK_CELL_LEN))?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::STACK_TOP;

    fn engine() -> Engine {
        Engine::new(vec![0; 4], 256, 256, false).unwrap()
    }

    #[test]
    fn branch_compares_low_32_bits_unsigned() {
        let mut e = engine();
        // r0 = -1 (all-ones 64-bit), sign-extended by a prior signed load;
        // the low 32 bits are still 0xFFFF_FFFF, the largest u32.
        e.regs.write::<i64>(0, -1).unwrap();
        e.regs.write::<i32>(1, 5).unwrap();
        e.regs.write::<u64>(2, 0x1000).unwrap();
        let inst = Instruction::decode([Opcode::Blt as u8, 0x01, 0x20, 0x00]);
        let result = exec_branch(&mut e, Opcode::Blt, inst).unwrap();
        assert_eq!(result, None, "0xFFFFFFFF is not < 5 when compared unsigned");
    }

    #[rstest::rstest]
    #[case(Opcode::Beq, 5, 5, true)]
    #[case(Opcode::Beq, 5, 6, false)]
    #[case(Opcode::Bne, 5, 6, true)]
    #[case(Opcode::Bne, 5, 5, false)]
    #[case(Opcode::Blt, 3, 5, true)]
    #[case(Opcode::Blt, 5, 3, false)]
    #[case(Opcode::Ble, 5, 5, true)]
    #[case(Opcode::Ble, 6, 5, false)]
    #[case(Opcode::Bgt, 6, 5, true)]
    #[case(Opcode::Bgt, 5, 6, false)]
    #[case(Opcode::Bge, 5, 5, true)]
    #[case(Opcode::Bge, 4, 5, false)]
    fn branch_polarity_taken_and_not_taken(
        #[case] op: Opcode,
        #[case] a: u32,
        #[case] b: u32,
        #[case] expect_taken: bool,
    ) {
        let mut e = engine();
        e.regs.write::<u32>(0, a).unwrap();
        e.regs.write::<u32>(1, b).unwrap();
        e.regs.write::<u64>(2, 0x1000).unwrap();
        let inst = Instruction::decode([op as u8, 0x01, 0x20, 0x00]);
        let result = exec_branch(&mut e, op, inst).unwrap();
        if expect_taken {
            assert_eq!(result, Some(0x1000), "{op:?}({a}, {b}) should branch");
        } else {
            assert_eq!(result, None, "{op:?}({a}, {b}) should not branch");
        }
    }

    #[test]
    fn push_pop_is_lifo_and_restores_sp() {
        let mut e = engine();
        let initial_sp = sp(&e).unwrap();
        e.regs.write::<u64>(0, 11).unwrap();
        e.regs.write::<u64>(1, 22).unwrap();
        exec_push(&mut e, Instruction::decode([Opcode::Push as u8, 0x00, 0x00, 0x00])).unwrap();
        exec_push(&mut e, Instruction::decode([Opcode::Push as u8, 0x01, 0x00, 0x00])).unwrap();
        exec_pop(&mut e, Instruction::decode([Opcode::Pop as u8, 0x20, 0x00, 0x00])).unwrap();
        exec_pop(&mut e, Instruction::decode([Opcode::Pop as u8, 0x30, 0x00, 0x00])).unwrap();
        assert_eq!(e.regs.read::<u64>(2).unwrap(), 22);
        assert_eq!(e.regs.read::<u64>(3).unwrap(), 11);
        assert_eq!(sp(&e).unwrap(), initial_sp);
    }

    #[test]
    fn call_then_ret_restores_sp_and_returns_past_call() {
        let mut e = engine();
        let initial_sp = sp(&e).unwrap();
        e.pc = 0x10;
        e.regs.write::<u64>(5, 0x40).unwrap();
        let call = Instruction::decode([Opcode::Call as u8, 0x50, 0x00, 0x00]);
        let next_pc = exec_call(&mut e, call).unwrap().unwrap();
        assert_eq!(next_pc, 0x40);
        e.pc = next_pc;
        let next_pc = exec_ret(&mut e).unwrap().unwrap();
        assert_eq!(next_pc, 0x14);
        assert_eq!(sp(&e).unwrap(), initial_sp);
    }

    #[test]
    fn push_beyond_stack_floor_is_out_of_bounds() {
        let mut e = Engine::new(vec![0; 4], 16, 8, false).unwrap();
        let bottom = STACK_TOP + 1 - 8;
        set_sp(&mut e, bottom).unwrap();
        let inst = Instruction::decode([Opcode::Push as u8, 0x00, 0x00, 0x00]);
        assert!(matches!(exec_push(&mut e, inst), Err(VmError::StackOutOfBounds { .. })));
    }
}
