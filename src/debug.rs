//! Debugger adapter: a thin, breakpoint-aware surface over [`Engine`]
//! (spec.md §4.F). The interactive REPL itself is an external collaborator
//! (`src/bin/ceruleanvm_dbg.rs`); this module only owns the breakpoint set
//! and the hooks the REPL drives.

use std::collections::HashSet;

use crate::error::VmError;
use crate::interpreter::Engine;
use crate::register::RegisterValue;

/// Wraps an [`Engine`] with a caller-managed set of breakpoint addresses.
pub struct Debugger {
    engine: Engine,
    breakpoints: HashSet<u64>,
}

impl Debugger {
    /// Wrap an already-constructed engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            breakpoints: HashSet::new(),
        }
    }

    /// Add a breakpoint at `addr`.
    pub fn add_breakpoint(&mut self, addr: u64) {
        self.breakpoints.insert(addr);
    }

    /// Remove a breakpoint at `addr`; returns whether one was present.
    pub fn remove_breakpoint(&mut self, addr: u64) -> bool {
        self.breakpoints.remove(&addr)
    }

    /// Currently active breakpoint addresses, for `list`-style commands.
    pub fn breakpoints(&self) -> impl Iterator<Item = &u64> {
        self.breakpoints.iter()
    }

    /// Execute exactly one instruction.
    pub fn step(&mut self) -> Result<(), VmError> {
        self.engine.step()
    }

    /// Run until halted or `pc()` lands on a breakpoint.
    pub fn run_until_breakpoint(&mut self) -> Result<(), VmError> {
        self.engine.run_until(&self.breakpoints)
    }

    /// `true` once the engine has halted.
    pub fn is_halted(&self) -> bool {
        self.engine.is_halted()
    }

    /// Current program counter.
    pub fn pc(&self) -> u64 {
        self.engine.pc()
    }

    /// Value of register `index`, reinterpreted as `T`.
    pub fn register<T: RegisterValue>(&self, index: usize) -> Result<T, VmError> {
        self.engine.register(index)
    }

    /// All 16 raw register slots, for a `list`/dump command.
    pub fn registers_raw(&self) -> [u64; 16] {
        let mut out = [0u64; 16];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.engine.register::<u64>(i).expect("index < 16 is always valid");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(vec![0x91, 0, 0, 0], 256, 256, false).unwrap()
    }

    #[test]
    fn run_until_breakpoint_stops_at_set_address() {
        let program = vec![
            0x90, 0, 0, 0, // nop
            0x90, 0, 0, 0, // nop
            0x91, 0, 0, 0, // halt
        ];
        let engine = Engine::new(program, 64, 64, false).unwrap();
        let mut dbg = Debugger::new(engine);
        dbg.add_breakpoint(4);
        dbg.run_until_breakpoint().unwrap();
        assert_eq!(dbg.pc(), 4);
        assert!(!dbg.is_halted());
    }

    #[test]
    fn halt_is_observable_through_the_adapter() {
        let engine = engine();
        let mut dbg = Debugger::new(engine);
        dbg.step().unwrap();
        assert!(dbg.is_halted());
    }

    #[test]
    fn breakpoints_can_be_removed() {
        let mut dbg = Debugger::new(engine());
        dbg.add_breakpoint(4);
        assert!(dbg.remove_breakpoint(4));
        assert!(!dbg.remove_breakpoint(4));
    }
}
