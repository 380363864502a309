//! BB84 Key Exchange Demo
//!
//! Establishes a shared key between two simulated devices and uses it as a
//! one-time pad.

use anyhow::{Result, bail};
use clap::Parser;

use qsim_demos::bb84::{bits_to_hex, encrypt, simulate_bb84};
use qsim_demos::{
    LogFormat, bit_string, demo_simulator, init_tracing, print_failure, print_header,
    print_result, print_section, print_success,
};

/// Sample plaintext, 96 bits.
const MESSAGE: &str = "110110000011110111011100100101101101100000111101\
                       110111000000110100111101110111001011101110111011";

#[derive(Parser, Debug)]
#[command(name = "demo-bb84")]
#[command(about = "Simulate BB84 quantum key distribution")]
struct Args {
    /// Key length in bits
    #[arg(short = 'n', long, default_value = "96")]
    bits: usize,

    /// RNG seed for the sender; the receiver uses seed + 1
    #[arg(long, env = "QSIM_SEED")]
    seed: Option<u64>,

    /// Show the raw key bits
    #[arg(long)]
    show_bits: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(if args.verbose { "debug" } else { "warn" }, LogFormat::from_env())?;

    print_header("BB84 Key Exchange Demo");

    let sender = demo_simulator(1, args.seed)?;
    let receiver = demo_simulator(1, args.seed.map(|s| s.wrapping_add(1)))?;

    print_section("Key Generation");
    let key = simulate_bb84(&sender, &receiver, args.bits)?;
    print_result("Key length", key.bits.len());
    print_result("Rounds", key.iterations);
    print_result(
        "Sifting yield",
        format!(
            "{:.1}%",
            100.0 * key.bits.len() as f64 / key.iterations.max(1) as f64
        ),
    );
    print_result("Error rate", format!("{:.1}%", 100.0 * key.error_rate()));
    print_result("Key", bits_to_hex(&key.bits));
    if args.show_bits {
        print_result("Key bits", bit_string(&key.bits));
    }

    print_section("One-Time Pad");
    let message: Vec<bool> = MESSAGE.chars().map(|c| c == '1').collect();
    if key.bits.len() < message.len() {
        bail!(
            "key has {} bits but the message needs {}; rerun with -n {}",
            key.bits.len(),
            message.len(),
            message.len()
        );
    }
    let cipher = encrypt(&message, &key.bits);
    let decrypted = encrypt(&cipher, &key.bits);
    print_result("Message", bits_to_hex(&message));
    print_result("Encrypted", bits_to_hex(&cipher));
    print_result("Decrypted", bits_to_hex(&decrypted));

    println!();
    if decrypted == message && key.errors == 0 {
        print_success("Receiver recovered the message");
    } else {
        print_failure("Key mismatch between sender and receiver");
    }

    Ok(())
}
