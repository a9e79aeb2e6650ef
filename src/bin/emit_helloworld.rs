//! Demo utility: writes the hello-loop bytecode (prints ten `*` then a
//! newline) to a file, for manually exercising `ceruleanvm`/`ceruleanvm_dbg`.
//!
//! Grounded on `original_source/ceruleanvm/tools/emit_helloworld.cpp`; an
//! external collaborator per spec.md §1, out of the engine's own scope.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "emit-helloworld", about = "Write the hello-loop demo bytecode to a file")]
struct Args {
    /// Output path for the generated bytecode.
    output: PathBuf,
}

/// See `DESIGN.md` for the instruction-by-instruction derivation of this
/// program from spec.md §8 scenario 1.
#[rustfmt::skip]
const HELLO_LOOP: &[u8] = &[
    0x02, 0x10, 0x0A, 0x00, // lli r1, 10        (loop limit)
    0x02, 0x20, 0x2A, 0x00, // lli r2, '*'
    0x02, 0x30, 0x0A, 0x00, // lli r3, '\n'
    0x02, 0x00, 0x00, 0x00, // lli r0, 0         (counter)
    0x93, 0x02, 0x00, 0x00, // putchar r2
    0x02, 0x40, 0x01, 0x00, // lli r4, 1
    0x10, 0x00, 0x40, 0x00, // add32 r0, r0, r4
    0x02, 0x90, 0x10, 0x00, // lli r9, 16        (loop body address)
    0x72, 0x01, 0x90, 0x00, // blt r0, r1, r9
    0x93, 0x03, 0x00, 0x00, // putchar r3
    0x91, 0x00, 0x00, 0x00, // halt
];

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    std::fs::write(&args.output, HELLO_LOOP)?;
    eprintln!("wrote {} bytes to {}", HELLO_LOOP.len(), args.output.display());
    Ok(())
}
