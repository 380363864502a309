//! Integration tests for the demo protocols.
//!
//! All devices are seeded so statistical assertions are reproducible.

use qsim_demos::bb84::{bits_to_hex, encrypt, send_single_bit, simulate_bb84};
use qsim_demos::chsh::{constant_strategy, estimate_win_probability, quantum_strategy};
use qsim_demos::qrng::{
    random_bit, send_classical_bit, send_classical_bit_plusminus, send_classical_bit_wrong_basis,
};
use qsim_demos::teleport::{TeleportRun, run_teleport, teleport};
use qsim_device::{QuantumDevice, Qubit, Simulator};

/// Teleportation reproduces the prepared state for every correction branch.
#[test]
fn test_teleport_fidelity() {
    for seed in 0..64 {
        let run = run_teleport(0.123, seed).unwrap();
        assert_receiver_is_zero(&run, &format!("seed {seed}"));
    }
}

/// The receiving qubit is |0⟩ up to a global phase, checked on amplitudes
/// rather than the squared probability.
fn assert_receiver_is_zero(run: &TeleportRun, context: &str) {
    let [zero, one] = run.amplitudes;
    assert!(one.norm() < 1e-6, "{context}: amplitude on |1⟩ is {one}");
    assert!(
        (zero.norm() - 1.0).abs() < 1e-6,
        "{context}: amplitude on |0⟩ is {zero}"
    );
    assert!((run.p_zero - 1.0).abs() < 1e-6, "{context}: P(|0⟩) = {}", run.p_zero);
}

#[test]
fn test_teleport_covers_all_corrections() {
    let mut seen = std::collections::HashSet::new();
    for seed in 0..64 {
        let run = run_teleport(1.0, seed).unwrap();
        seen.insert((run.corrections.phase_flip, run.corrections.bit_flip));
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn test_teleport_various_angles() {
    for (i, angle) in [0.0, 0.5, std::f64::consts::FRAC_PI_2, 2.0, -1.3, std::f64::consts::PI]
        .into_iter()
        .enumerate()
    {
        let run = run_teleport(angle, i as u64).unwrap();
        assert_receiver_is_zero(&run, &format!("angle {angle}"));
    }
}

/// After teleportation the sender's qubits are back in |0⟩.
#[test]
fn test_teleport_resets_sender_side() {
    let sim = Simulator::with_seed(3, 21).unwrap();
    sim.using_register(3, |q| {
        q[0].rx(0.8)?;
        teleport(&q[0], &q[1], &q[2])?;
        assert!(q[0].probability_of_one()? < 1e-12);
        assert!(q[1].probability_of_one()? < 1e-12);
        let expected = (0.4_f64).sin().powi(2);
        assert!((q[2].probability_of_one()? - expected).abs() < 1e-9);
        Ok(())
    })
    .unwrap();
    assert_eq!(sim.available(), 3);
}

#[test]
fn test_bb84_matched_and_mismatched_bases() {
    let sender = Simulator::with_seed(1, 100).unwrap();
    let receiver = Simulator::with_seed(1, 200).unwrap();

    let mut matched = 0;
    let mut matched_agree = 0;
    let mut mismatched = 0;
    let mut mismatched_agree = 0;
    for _ in 0..4000 {
        let round = send_single_bit(&sender, &receiver).unwrap();
        if round.bases_match() {
            matched += 1;
            matched_agree += usize::from(round.received == round.message);
        } else {
            mismatched += 1;
            mismatched_agree += usize::from(round.received == round.message);
        }
    }

    assert!(matched > 0 && mismatched > 0);
    assert_eq!(matched_agree, matched, "matched bases must always agree");
    let rate = mismatched_agree as f64 / mismatched as f64;
    assert!((rate - 0.5).abs() < 0.05, "mismatched agreement {rate}");
}

#[test]
fn test_bb84_key_exchange() {
    let sender = Simulator::with_seed(1, 7).unwrap();
    let receiver = Simulator::with_seed(1, 8).unwrap();
    let key = simulate_bb84(&sender, &receiver, 96).unwrap();

    assert_eq!(key.bits.len(), 96);
    assert_eq!(key.errors, 0);
    assert!(key.iterations >= 96);
    // About half of the rounds survive sifting.
    assert!(key.iterations < 96 * 4);

    let message: Vec<bool> = (0..96).map(|i| i % 3 == 0).collect();
    let cipher = encrypt(&message, &key.bits);
    assert_eq!(encrypt(&cipher, &key.bits), message);
    assert!(bits_to_hex(&key.bits).starts_with("0x"));
}

#[test]
fn test_chsh_quantum_beats_classical() {
    let quantum = estimate_win_probability(quantum_strategy, 2000, 42).unwrap();
    assert!(quantum > 0.80, "quantum strategy won {quantum}");
    assert!(quantum < 0.91, "quantum strategy won {quantum}");

    let classical = estimate_win_probability(|_| Ok(constant_strategy()), 2000, 42).unwrap();
    assert!(classical < quantum);
}

#[test]
fn test_qrng_classical_bits() {
    let sim = Simulator::with_seed(1, 5).unwrap();
    for i in 0..32 {
        let bit = i % 2 == 0;
        assert_eq!(send_classical_bit(&sim, bit).unwrap(), bit);
        assert_eq!(send_classical_bit_plusminus(&sim, bit).unwrap(), bit);
    }
}

#[test]
fn test_qrng_wrong_basis_is_coin_flip() {
    let sim = Simulator::with_seed(1, 6).unwrap();
    let trials = 4000;
    let flipped = (0..trials)
        .filter(|_| !send_classical_bit_wrong_basis(&sim, true).unwrap())
        .count();
    let rate = flipped as f64 / trials as f64;
    assert!((rate - 0.5).abs() < 0.05, "flip rate {rate}");
}

#[test]
fn test_random_bit_is_fair() {
    let sim = Simulator::with_seed(1, 2024).unwrap();
    let trials = 10_000;
    let ones = (0..trials).filter(|_| random_bit(&sim).unwrap()).count();
    let freq = ones as f64 / trials as f64;
    // Binomial 99% interval around 0.5.
    let bound = 2.576 * (0.25 / trials as f64).sqrt();
    assert!((freq - 0.5).abs() < bound, "frequency {freq} outside ±{bound}");
    assert_eq!(sim.available(), 1);
}
