//! CHSH Game Demo
//!
//! Compares the best classical strategy with the entangled one.

use anyhow::Result;
use clap::Parser;
use qsim_demos::chsh::{
    Strategy, constant_strategy, estimate_win_probability_with, quantum_strategy,
};
use qsim_demos::{
    LogFormat, create_progress_bar, init_tracing, print_failure, print_header, print_info,
    print_result, print_section, print_success,
};
use qsim_device::DeviceResult;

/// Classical bound on the win probability.
const CLASSICAL_BOUND: f64 = 0.75;

#[derive(Parser, Debug)]
#[command(name = "demo-chsh")]
#[command(about = "Play the CHSH game with classical and quantum strategies")]
struct Args {
    /// Rounds per strategy
    #[arg(short, long, default_value = "2000")]
    rounds: usize,

    /// Referee seed
    #[arg(long, env = "QSIM_SEED", default_value = "0")]
    seed: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn play<S, F>(label: &str, rounds: usize, seed: u64, make_strategy: F) -> Result<f64>
where
    S: Strategy,
    F: FnMut(u64) -> DeviceResult<S>,
{
    let pb = create_progress_bar(rounds as u64, label);
    let p = estimate_win_probability_with(make_strategy, rounds, seed, |_| pb.inc(1))?;
    pb.finish_and_clear();
    Ok(p)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(if args.verbose { "debug" } else { "warn" }, LogFormat::from_env())?;

    print_header("CHSH Game Demo");
    print_info("Players win when a XOR b == x AND y");

    print_section("Classical Strategy");
    let classical = play("constant", args.rounds, args.seed, |_| Ok(constant_strategy()))?;
    print_result("Win rate", format!("{:.1}%", 100.0 * classical));

    print_section("Quantum Strategy");
    let quantum = play("entangled", args.rounds, args.seed, quantum_strategy)?;
    print_result("Win rate", format!("{:.1}%", 100.0 * quantum));
    print_result(
        "Theoretical",
        format!("{:.1}%", 100.0 * (std::f64::consts::PI / 8.0).cos().powi(2)),
    );

    println!();
    if quantum > CLASSICAL_BOUND {
        print_success("Entanglement beats the classical bound");
    } else {
        print_failure("Quantum strategy did not beat 75%; try more rounds");
    }

    Ok(())
}
