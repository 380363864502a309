//! Quantum Teleportation Demo
//!
//! Teleports `ry(angle)|0⟩` across a three-qubit register and checks that
//! undoing the rotation on the receiving qubit gives back |0⟩.

use anyhow::Result;
use clap::Parser;

use qsim_demos::teleport::run_teleport;
use qsim_demos::{
    LogFormat, init_tracing, print_failure, print_header, print_result, print_section,
    print_success,
};

#[derive(Parser, Debug)]
#[command(name = "demo-teleport")]
#[command(about = "Teleport a single-qubit state")]
struct Args {
    /// Preparation angle in radians
    #[arg(short, long, default_value = "0.123", allow_negative_numbers = true)]
    angle: f64,

    /// Number of runs
    #[arg(short, long, default_value = "8")]
    runs: u64,

    /// Base seed; run i uses seed + i
    #[arg(long, env = "QSIM_SEED", default_value = "0")]
    seed: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(if args.verbose { "debug" } else { "warn" }, LogFormat::from_env())?;

    print_header("Quantum Teleportation Demo");

    print_section("Setup");
    print_result("Message state", format!("ry({})|0⟩", args.angle));
    print_result("Runs", args.runs);

    print_section("Runs");
    let mut worst = 1.0_f64;
    let mut leak = 0.0_f64;
    for i in 0..args.runs {
        let run = run_teleport(args.angle, args.seed.wrapping_add(i))?;
        worst = worst.min(run.p_zero);
        leak = leak.max(run.amplitudes[1].norm());
        print_result(
            &format!("run {i}"),
            format!(
                "Z={} X={}  P(|0⟩)={:.9}  {}",
                u8::from(run.corrections.phase_flip),
                u8::from(run.corrections.bit_flip),
                run.p_zero,
                run.state
            ),
        );
    }

    println!();
    if leak < 1e-6 && (1.0 - worst).abs() < 1e-6 {
        print_success("State arrived intact in every run");
    } else {
        print_failure(&format!(
            "Worst P(|0⟩) {worst:.9}, largest |1⟩ amplitude {leak:.3e}"
        ));
    }

    Ok(())
}
