//! Pure disassembly of a single 4-byte instruction. No engine state; depends
//! only on [`crate::opcode`].

use crate::consts::REGISTER_NAMES;
use crate::instruction::Instruction;
use crate::opcode::{Opcode, OperandShape};

fn reg_name(index: u8) -> &'static str {
    REGISTER_NAMES
        .get(index as usize)
        .copied()
        .unwrap_or("r?")
}

/// Render the 4 raw bytes of an instruction as a human-readable string.
/// Unknown opcodes render as `"???"` rather than erroring, since this
/// function is also used to disassemble data accidentally executed as
/// code.
pub fn disassemble(bytes: [u8; 4]) -> String {
    let inst = Instruction::decode(bytes);
    let Ok(op) = Opcode::decode(inst.opcode_byte) else {
        return "???".to_string();
    };
    let mnemonic = op.mnemonic();
    match op.operand_shape() {
        OperandShape::None => mnemonic.to_string(),
        OperandShape::R => {
            // Most "R" opcodes name a D-slot register (call/jmp/pop/getchar);
            // push/putchar instead name their S1-slot source register.
            let reg = match op {
                Opcode::Push | Opcode::Putchar => inst.field_s1,
                _ => inst.field_d,
            };
            format!("{mnemonic} {}", reg_name(reg))
        }
        OperandShape::I => format!("{mnemonic} {:#x}", inst.imm16),
        OperandShape::RR => format!("{mnemonic} {}, {}", reg_name(inst.field_d), reg_name(inst.field_s1)),
        OperandShape::RI => format!("{mnemonic} {}, {:#x}", reg_name(inst.field_d), inst.imm16),
        OperandShape::RRR => format!(
            "{mnemonic} {}, {}, {}",
            reg_name(inst.field_d),
            reg_name(inst.field_s1),
            reg_name(inst.field_s2)
        ),
        OperandShape::RRI => format!(
            "{mnemonic} {}, {}, {:#x}",
            reg_name(inst.field_d),
            reg_name(inst.field_s1),
            inst.imm16
        ),
    }
}
