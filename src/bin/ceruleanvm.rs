//! `ceruleanvm`: load a bytecode file and run it to completion.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use ceruleanvm::consts::{DEFAULT_HEAP_SIZE, DEFAULT_STACK_SIZE};
use ceruleanvm::loader::load_program;
use ceruleanvm::Engine;

#[derive(Parser)]
#[command(name = "ceruleanvm", about = "Run a CRVM bytecode program to completion")]
struct Args {
    /// Path to the raw little-endian bytecode file.
    bytecode_file: PathBuf,

    /// Heap segment capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_HEAP_SIZE)]
    heap_size: u64,

    /// Stack segment capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_STACK_SIZE)]
    stack_size: u64,

    /// Emit a trace event for every executed instruction.
    #[arg(long)]
    trace: bool,

    /// Print the instruction count and final pc to stderr after halting.
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.trace {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let program = load_program(&args.bytecode_file)?;
    let mut engine = Engine::new(program, args.heap_size, args.stack_size, args.trace)?;
    engine.run()?;

    if args.stats {
        eprintln!(
            "instructions executed: {}, final pc: {:#x}",
            engine.instructions_executed(),
            engine.pc()
        );
    }
    Ok(())
}
