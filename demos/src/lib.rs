//! qsim demo suite
//!
//! Textbook protocols written against the [`qsim_device`] traits:
//!
//! - **QRNG**: random bits from measuring |+⟩, plus classical-bit
//!   transmission in matching and mismatched bases
//! - **BB84**: key exchange with basis sifting
//! - **CHSH**: the nonlocal game, classical vs. entangled strategies
//! - **Teleportation**: moving an unknown state with one Bell pair and two
//!   classical bits
//!
//! The `demo-*` binaries drive these modules and print results with the
//! console helpers below.

pub mod bb84;
pub mod chsh;
pub mod logging;
pub mod qrng;
pub mod teleport;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use qsim_device::{DeviceResult, Simulator, SimulatorConfig};

pub use logging::{LogFormat, init_tracing};

/// Simulator for a demo that needs `capacity` qubits.
///
/// Tolerance and seed come from the `QSIM_*` environment; an explicit
/// `seed` takes precedence.
pub fn demo_simulator(capacity: usize, seed: Option<u64>) -> DeviceResult<Simulator> {
    let mut config = SimulatorConfig::from_env()?;
    config.capacity = capacity;
    if seed.is_some() {
        config.seed = seed;
    }
    Simulator::from_config(&config)
}

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(bar_style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(bar_style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a failure message.
pub fn print_failure(message: &str) {
    println!("{} {}", style("✗").red().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Render bits as `0`/`1` characters.
pub fn bit_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}
