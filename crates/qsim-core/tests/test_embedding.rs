//! Properties of operator embedding and unitary evolution.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;

use qsim_core::embedding::{embed, identity, kron};
use qsim_core::gates::{self, CNOT, HADAMARD, IDENTITY, PAULI_X, SWAP};
use qsim_core::{SimError, StandardGate, StateVector};

fn approx_eq(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) -> bool {
    a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < tol)
}

/// Normalised random state from raw (re, im) pairs.
fn random_state(n: usize, raw: &[(f64, f64)]) -> Option<StateVector> {
    let amps: Vec<Complex64> = raw
        .iter()
        .take(1 << n)
        .map(|&(re, im)| Complex64::new(re, im))
        .collect();
    let norm: f64 = amps.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    if norm < 1e-3 {
        return None;
    }
    StateVector::from_amplitudes(amps.into_iter().map(|a| a / norm).collect()).ok()
}

fn arb_gate() -> impl Strategy<Value = StandardGate> {
    prop_oneof![
        Just(StandardGate::H),
        Just(StandardGate::X),
        Just(StandardGate::Y),
        Just(StandardGate::Z),
        Just(StandardGate::S),
        Just(StandardGate::T),
        (-6.3_f64..6.3).prop_map(StandardGate::Rx),
        (-6.3_f64..6.3).prop_map(StandardGate::Ry),
        (-6.3_f64..6.3).prop_map(StandardGate::Rz),
        Just(StandardGate::CX),
        Just(StandardGate::CZ),
        Just(StandardGate::Swap),
    ]
}

// ---------------------------------------------------------------------------
// Hand-computed cases
// ---------------------------------------------------------------------------

#[test]
fn identity_embeds_to_identity_everywhere() {
    for n in 1..=4 {
        for t in 0..n {
            let op = embed(&IDENTITY, &[t], n).unwrap();
            assert!(approx_eq(&op, &identity(1 << n), 1e-15));
        }
    }
}

#[test]
fn identity_pair_embeds_to_identity() {
    let id4 = identity(4);
    for (a, b) in [(0, 1), (0, 2), (2, 0), (1, 3)] {
        let op = embed(&id4, &[a, b], 4).unwrap();
        assert!(approx_eq(&op, &identity(16), 1e-15));
    }
}

#[test]
fn single_qubit_three_register_matches_kron() {
    // X on the middle qubit of three: I ⊗ X ⊗ I.
    let op = embed(&PAULI_X, &[1], 3).unwrap();
    let expected = kron(&kron(&IDENTITY, &PAULI_X), &IDENTITY);
    assert!(approx_eq(&op, &expected, 1e-15));
}

#[test]
fn non_adjacent_pair_matches_swap_conjugation() {
    // CNOT on (0, 2) of three qubits equals SWAP(1,2) · CNOT(0,1) · SWAP(1,2).
    let direct = embed(&CNOT, &[0, 2], 3).unwrap();
    let swap12 = embed(&SWAP, &[1, 2], 3).unwrap();
    let adjacent = embed(&CNOT, &[0, 1], 3).unwrap();
    let conjugated = swap12.dot(&adjacent).dot(&swap12);
    assert!(approx_eq(&direct, &conjugated, 1e-15));
}

#[test]
fn cnot_zero_two_on_basis_states() {
    // |100⟩ (index 4) → |101⟩ (index 5); |000⟩ stays.
    let op = embed(&CNOT, &[0, 2], 3).unwrap();
    assert_eq!(op[[5, 4]], Complex64::new(1.0, 0.0));
    assert_eq!(op[[0, 0]], Complex64::new(1.0, 0.0));
    assert_eq!(op[[4, 4]], Complex64::new(0.0, 0.0));
}

#[test]
fn hadamard_twice_is_identity() {
    let op = embed(&HADAMARD, &[1], 2).unwrap();
    assert!(approx_eq(&op.dot(&op), &identity(4), 1e-12));
}

#[test]
fn rotations_compose_to_identity() {
    for theta in [0.123, 1.0, -2.2] {
        let fwd = embed(&gates::ry(theta), &[0], 2).unwrap();
        let back = embed(&gates::ry(-theta), &[0], 2).unwrap();
        assert!(approx_eq(&back.dot(&fwd), &identity(4), 1e-12));
    }
}

#[test]
fn repeated_pair_target_is_rejected() {
    // A pair embedding on one position would not be unitary.
    for n in 2..=4 {
        for t in 0..n {
            assert!(matches!(
                embed(&CNOT, &[t, t], n),
                Err(SimError::InvalidTarget { position, .. }) if position == t
            ));
        }
    }
}

#[test]
fn out_of_range_pair_target_is_rejected() {
    assert!(matches!(
        embed(&SWAP, &[0, 3], 3),
        Err(SimError::InvalidTarget { position: 3, .. })
    ));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn unitary_preserves_norm(
        n in 2_usize..=4,
        gate in arb_gate(),
        a in 0_usize..4,
        b in 0_usize..4,
        raw in prop::collection::vec((-1.0_f64..1.0, -1.0_f64..1.0), 16),
    ) {
        let a = a % n;
        let b = b % n;
        prop_assume!(gate.num_qubits() == 1 || a != b);
        let targets: Vec<usize> = if gate.num_qubits() == 1 { vec![a] } else { vec![a, b] };

        if let Some(mut state) = random_state(n, &raw) {
            let before = state.norm();
            let op = embed(&gate.matrix(), &targets, n).unwrap();
            state.apply(&op).unwrap();
            prop_assert!((state.norm() - before).abs() < 1e-9);
        }
    }

    #[test]
    fn embedded_gates_stay_unitary(
        n in 1_usize..=3,
        gate in arb_gate(),
        a in 0_usize..3,
        b in 0_usize..3,
    ) {
        let a = a % n;
        let b = b % n;
        prop_assume!(gate.num_qubits() == 1 || (n >= 2 && a != b));
        let targets: Vec<usize> = if gate.num_qubits() == 1 { vec![a] } else { vec![a, b] };
        let op = embed(&gate.matrix(), &targets, n).unwrap();
        prop_assert!(gates::is_unitary(&op, 1e-9));
    }

    #[test]
    fn swap_twice_is_identity(n in 2_usize..=4, a in 0_usize..4, b in 0_usize..4) {
        let a = a % n;
        let b = b % n;
        prop_assume!(a != b);
        let op = embed(&SWAP, &[a, b], n).unwrap();
        prop_assert!(approx_eq(&op.dot(&op), &identity(1 << n), 1e-12));
    }
}
