//! The fetch/decode/execute loop and the engine that owns register, memory,
//! and program-counter state for one running program.

mod alu;
mod bitwise;
mod control;
mod convert;
mod fpu;
mod io;
mod memops;

use tracing::{debug, trace, warn};

use crate::consts::{REG_BP, REG_SP, STACK_TOP};
use crate::disasm::disassemble;
use crate::error::VmError;
use crate::instruction::Instruction;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::register::RegisterFile;

/// The two externally observable engine states (spec.md §4.E).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The engine will execute another instruction on the next `step()`.
    Running,
    /// `step()`/`run()` are no-ops; a fatal error or `HALT` already fired.
    Halted,
}

/// Owns the register file, memory, and program counter for one program run.
pub struct Engine {
    regs: RegisterFile,
    mem: Memory,
    pc: u64,
    state: State,
    instructions_executed: u64,
    trace: bool,
    stdin: Box<dyn std::io::Read>,
    stdout: Box<dyn std::io::Write>,
}

impl Engine {
    /// Construct an engine with `program` loaded into the code segment and
    /// `bp`/`sp` initialized to the top of the stack segment, wired to the
    /// process's real standard streams.
    pub fn new(program: Vec<u8>, heap_size: u64, stack_size: u64, trace: bool) -> Result<Self, VmError> {
        Self::with_io(
            program,
            heap_size,
            stack_size,
            trace,
            Box::new(std::io::stdin()),
            Box::new(std::io::stdout()),
        )
    }

    /// As [`Self::new`], but with `GETCHAR`/`PUTCHAR` wired to the given
    /// streams instead of the process's real stdin/stdout. Tests use this
    /// to capture output byte-for-byte (spec.md §6).
    pub fn with_io(
        program: Vec<u8>,
        heap_size: u64,
        stack_size: u64,
        trace: bool,
        stdin: Box<dyn std::io::Read>,
        stdout: Box<dyn std::io::Write>,
    ) -> Result<Self, VmError> {
        let code_len = program.len();
        let mem = Memory::new(program, heap_size, stack_size)?;
        let mut regs = RegisterFile::new();
        let stack_top = STACK_TOP + 1;
        regs.write::<u64>(REG_SP, stack_top)?;
        regs.write::<u64>(REG_BP, stack_top)?;
        debug!(code_len, heap_size, stack_size, "engine constructed");
        Ok(Self {
            regs,
            mem,
            pc: 0,
            state: State::Running,
            instructions_executed: 0,
            trace,
            stdin,
            stdout,
        })
    }

    /// Current program counter.
    pub fn pc(&self) -> u64 {
        self.pc
    }

    /// `true` once the engine has transitioned to [`State::Halted`].
    pub fn is_halted(&self) -> bool {
        self.state == State::Halted || self.pc >= self.mem.code_end()
    }

    /// Current value of register `index`, reinterpreted as `T`. Exposed for
    /// the debugger adapter.
    pub fn register<T: crate::register::RegisterValue>(&self, index: usize) -> Result<T, VmError> {
        self.regs.read(index)
    }

    /// Number of instructions successfully executed so far.
    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }

    fn halt_at_code_end(&mut self) {
        self.pc = self.mem.code_end();
        self.state = State::Halted;
    }

    /// Execute exactly one instruction, or do nothing if already halted.
    pub fn step(&mut self) -> Result<(), VmError> {
        if self.is_halted() {
            self.state = State::Halted;
            return Ok(());
        }

        let bytes = self.mem.fetch_instruction(self.pc)?;
        if self.trace {
            trace!(pc = self.pc, text = %disassemble(bytes), "step");
        }
        let inst = Instruction::decode(bytes);
        let result = self.dispatch(inst);
        match result {
            Ok(Some(new_pc)) => {
                self.pc = new_pc;
            }
            Ok(None) => {
                self.pc = self.pc.wrapping_add(crate::consts::INSTRUCTION_LEN);
            }
            Err(e) => {
                warn!(pc = self.pc, error = %e, "fatal error, halting");
                self.state = State::Halted;
                return Err(e);
            }
        }
        self.instructions_executed += 1;
        if self.pc >= self.mem.code_end() {
            self.state = State::Halted;
        }
        Ok(())
    }

    /// Run until [`Self::is_halted`] returns `true`.
    pub fn run(&mut self) -> Result<(), VmError> {
        while !self.is_halted() {
            self.step()?;
        }
        Ok(())
    }

    /// Run until `is_halted()` or `pc()` matches one of `breakpoints`
    /// (after a step), used by the debugger adapter.
    pub fn run_until(&mut self, breakpoints: &std::collections::HashSet<u64>) -> Result<(), VmError> {
        loop {
            if self.is_halted() {
                return Ok(());
            }
            self.step()?;
            if self.is_halted() || breakpoints.contains(&self.pc) {
                return Ok(());
            }
        }
    }

    /// Dispatch one decoded instruction; returns `Some(next_pc)` when the
    /// opcode already resolved the next `pc` (branches, jmp, call, ret,
    /// halt), or `None` to advance by one instruction width.
    fn dispatch(&mut self, inst: Instruction) -> Result<Option<u64>, VmError> {
        let op = Opcode::decode(inst.opcode_byte)?;
        use Opcode::*;
        match op {
            Lui | Lli => memops::exec_immediate_load(self, op, inst),
            Load8 | Load16 | Load32 | Load64 | LoadU8 | LoadU16 | LoadU32 => {
                memops::exec_load(self, op, inst)
            }
            Store8 | Store16 | Store32 | Store64 => memops::exec_store(self, op, inst),

            Add32 | Sub32 | Mul32 | Divi32 | Divu32 | Modi32 | Modu32 | Add64 | Sub64 | Mul64
            | Divi64 | Divu64 | Modi64 | Modu64 => alu::exec_reg(self, op, inst),
            Add32I | Sub32I | Mul32I | Divi32I | Divu32I | Modi32I | Modu32I | Add64I | Sub64I
            | Mul64I | Divi64I | Divu64I | Modi64I | Modu64I => alu::exec_imm(self, op, inst),

            AddF32 | SubF32 | MulF32 | DivF32 | AddF64 | SubF64 | MulF64 | DivF64 => {
                fpu::exec_binary(self, op, inst)
            }
            SqrtF32 | AbsF32 | NegF32 | SqrtF64 | AbsF64 | NegF64 => fpu::exec_unary(self, op, inst),

            CvtI32I64 | CvtI64I32 | CvtU32U64 | CvtU64U32 | CvtI32F32 | CvtI64F64 | CvtU32F32
            | CvtU64F64 | CvtF32I32 | CvtF64I64 | CvtF32U32 | CvtF64U64 | CvtF32F64
            | CvtF64F32 => convert::exec(self, op, inst),

            Sll32 | Srl32 | Sra32 | Or32 | And32 | Xor32 | Not32 | Sll64 | Srl64 | Sra64 | Or64
            | And64 | Xor64 | Not64 => bitwise::exec_reg(self, op, inst),
            Sll32I | Srl32I | Sra32I | Or32I | And32I | Xor32I | Sll64I | Srl64I | Sra64I
            | Or64I | And64I | Xor64I => bitwise::exec_imm(self, op, inst),

            Beq | Bne | Blt | Ble | Bgt | Bge => control::exec_branch(self, op, inst),
            Jmp => control::exec_jmp(self, inst),
            Call => control::exec_call(self, inst),
            Ret => control::exec_ret(self),
            Push => control::exec_push(self, inst),
            Pop => control::exec_pop(self, inst),

            Nop => Ok(None),
            Halt => {
                self.halt_at_code_end();
                Ok(Some(self.mem.code_end()))
            }
            Getchar => io::exec_getchar(self, inst),
            Putchar => io::exec_putchar(self, inst),
            Syscall => Err(VmError::UnimplementedSyscall),
        }
    }
}
