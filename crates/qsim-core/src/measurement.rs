//! Projective measurement in the computational basis.

use rand::Rng;
use tracing::trace;

use crate::embedding::embed;
use crate::error::{SimError, SimResult};
use crate::gates::{PROJECTOR_0, PROJECTOR_1};
use crate::statevector::StateVector;

/// Outcome probabilities `(p0, p1)` for measuring `position`.
///
/// Both projectors are applied to copies of `state`; the live state is not
/// touched.
pub fn probabilities(state: &StateVector, position: usize) -> SimResult<(f64, f64)> {
    let (zero, one) = project(state, position)?;
    Ok((zero.norm_sqr(), one.norm_sqr()))
}

/// Measure `position`, collapse `state`, and return the outcome.
///
/// `true` means the qubit was found in |1⟩. The sampled branch is
/// renormalised before it replaces the live state.
///
/// # Errors
///
/// - [`SimError::InvalidTarget`] if `position` is out of range.
/// - [`SimError::StateInvariant`] if `p0 + p1` differs from 1 by more than
///   `tolerance`.
pub fn measure<R: Rng>(
    state: &mut StateVector,
    position: usize,
    rng: &mut R,
    tolerance: f64,
) -> SimResult<bool> {
    let (zero, one) = project(state, position)?;
    let p0 = zero.norm_sqr();
    let p1 = one.norm_sqr();

    let total = p0 + p1;
    if (total - 1.0).abs() > tolerance {
        return Err(SimError::StateInvariant(format!(
            "measurement probabilities sum to {total} (p0 = {p0}, p1 = {p1})"
        )));
    }

    let r: f64 = rng.r#gen();
    let outcome = r >= p0;
    trace!(position, p0, p1, outcome, "sampled measurement");

    let mut collapsed = if outcome { one } else { zero };
    collapsed.normalize()?;
    *state = collapsed;
    Ok(outcome)
}

fn project(state: &StateVector, position: usize) -> SimResult<(StateVector, StateVector)> {
    let n = state.num_qubits();
    let p0 = embed(&PROJECTOR_0, &[position], n)?;
    let p1 = embed(&PROJECTOR_1, &[position], n)?;

    let mut zero = state.clone();
    zero.apply(&p0)?;
    let mut one = state.clone();
    one.apply(&p1)?;
    Ok((zero, one))
}
