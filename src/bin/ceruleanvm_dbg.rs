//! `ceruleanvm_dbg`: an interactive step-debugger REPL built only on the
//! engine's debugger hooks (spec.md §4.F, §6).

use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ceruleanvm::consts::{DEFAULT_HEAP_SIZE, DEFAULT_STACK_SIZE, REGISTER_NAMES};
use ceruleanvm::loader::load_program;
use ceruleanvm::{Debugger, Engine};

#[derive(Parser)]
#[command(name = "ceruleanvm_dbg", about = "Interactively step a CRVM bytecode program")]
struct Args {
    /// Path to the raw little-endian bytecode file.
    bytecode_file: PathBuf,

    /// Heap segment capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_HEAP_SIZE)]
    heap_size: u64,

    /// Stack segment capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_STACK_SIZE)]
    stack_size: u64,
}

const HELP: &str = "\
s, step           execute one instruction
c, continue       run until halted or a breakpoint is hit
b, break <addr>   set a breakpoint at <addr> (hex or decimal)
d, delete <addr>  remove the breakpoint at <addr>
l, list           list active breakpoints
p, print <reg>    print a register's value (r0..r12, ra, bp, sp)
h, help           show this text
q, quit           exit the debugger";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let program = load_program(&args.bytecode_file)?;
    let engine = Engine::new(program, args.heap_size, args.stack_size, false)?;
    let mut dbg = Debugger::new(engine);

    let stdin = io::stdin();
    print!("(crvm) ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("s") | Some("step") => report_step(dbg.step()),
            Some("c") | Some("continue") => report_step(dbg.run_until_breakpoint()),
            Some("b") | Some("break") => match parts.next().and_then(parse_addr) {
                Some(addr) => dbg.add_breakpoint(addr),
                None => println!("usage: break <addr>"),
            },
            Some("d") | Some("delete") => match parts.next().and_then(parse_addr) {
                Some(addr) => {
                    if !dbg.remove_breakpoint(addr) {
                        println!("no breakpoint at {addr:#x}");
                    }
                }
                None => println!("usage: delete <addr>"),
            },
            Some("l") | Some("list") => {
                let mut bps: Vec<_> = dbg.breakpoints().copied().collect();
                bps.sort_unstable();
                for addr in bps {
                    println!("{addr:#x}");
                }
            }
            Some("p") | Some("print") => match parts.next() {
                Some(name) => print_register(&dbg, name),
                None => println!("usage: print <reg>"),
            },
            Some("h") | Some("help") => println!("{HELP}"),
            Some("q") | Some("quit") => break,
            Some(other) => println!("unknown command: {other} (try 'help')"),
            None => {}
        }
        println!("pc={:#x} halted={}", dbg.pc(), dbg.is_halted());
        print!("(crvm) ");
        io::stdout().flush()?;
    }
    Ok(())
}

fn report_step(result: Result<(), ceruleanvm::VmError>) {
    if let Err(e) = result {
        println!("error: {e}");
    }
}

fn parse_addr(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

fn print_register(dbg: &Debugger, name: &str) {
    match REGISTER_NAMES.iter().position(|&r| r == name) {
        Some(index) => match dbg.register::<u64>(index) {
            Ok(value) => println!("{name} = {value:#x}"),
            Err(e) => println!("error: {e}"),
        },
        None => println!("unknown register: {name}"),
    }
}
