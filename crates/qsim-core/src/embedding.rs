//! Embedding of local operators into the full register space.
//!
//! Basis ordering: position 0 is the most-significant tensor factor, so in
//! an n-qubit register position `p` is bit `n - 1 - p` of the basis index.
//! [`bit_of`] is the only place that mapping is written down; measurement
//! and formatting go through it as well.
//!
//! All functions here are pure in `(operator, targets, n)`.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// Bit index of `position` inside a basis-state index.
#[inline]
pub fn bit_of(position: usize, num_qubits: usize) -> usize {
    num_qubits - 1 - position
}

/// `dim × dim` identity.
pub fn identity(dim: usize) -> Array2<Complex64> {
    Array2::eye(dim)
}

/// Kronecker product `a ⊗ b`.
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (m, n) = a.dim();
    let (p, q) = b.dim();
    let mut out = Array2::<Complex64>::zeros((m * p, n * q));
    for ((i, j), &av) in a.indexed_iter() {
        if av == Complex64::new(0.0, 0.0) {
            continue;
        }
        for ((k, l), &bv) in b.indexed_iter() {
            out[[i * p + k, j * q + l]] = av * bv;
        }
    }
    out
}

/// Check that every target is in range and no target repeats.
pub fn validate_targets(targets: &[usize], num_qubits: usize) -> SimResult<()> {
    for (i, &t) in targets.iter().enumerate() {
        if t >= num_qubits {
            return Err(SimError::out_of_range(t, num_qubits));
        }
        if targets[..i].contains(&t) {
            return Err(SimError::duplicate(t, num_qubits));
        }
    }
    Ok(())
}

/// Expand a 1- or 2-qubit `unitary` acting on `targets` into the
/// `2^n × 2^n` operator on the whole register.
///
/// For two targets the first one is the high bit of the local index,
/// i.e. `CNOT` embedded at `[c, t]` uses `c` as control.
///
/// # Errors
///
/// - [`SimError::UnsupportedArity`] unless exactly one or two targets.
/// - [`SimError::InvalidTarget`] for out-of-range or duplicate targets.
/// - [`SimError::DimensionMismatch`] if `unitary` is not `2^k × 2^k`.
pub fn embed(
    unitary: &Array2<Complex64>,
    targets: &[usize],
    num_qubits: usize,
) -> SimResult<Array2<Complex64>> {
    let arity = targets.len();
    if arity != 1 && arity != 2 {
        return Err(SimError::UnsupportedArity(arity));
    }
    validate_targets(targets, num_qubits)?;

    let local_dim = 1 << arity;
    let (rows, cols) = unitary.dim();
    if rows != local_dim || cols != local_dim {
        return Err(SimError::DimensionMismatch {
            expected: local_dim,
            got: rows.max(cols),
        });
    }

    if arity == 1 {
        Ok(embed_single(unitary, targets[0], num_qubits))
    } else {
        Ok(embed_pair(unitary, targets[0], targets[1], num_qubits))
    }
}

/// `I ⊗ … ⊗ U ⊗ … ⊗ I` with `U` in slot `target`.
///
/// Unchecked; [`embed`] validates `target` and the 2×2 shape first.
fn embed_single(
    unitary: &Array2<Complex64>,
    target: usize,
    num_qubits: usize,
) -> Array2<Complex64> {
    let id2 = identity(2);
    (0..num_qubits).fold(identity(1), |acc, position| {
        let factor = if position == target { unitary } else { &id2 };
        kron(&acc, factor)
    })
}

/// Index-based embedding of a 4×4 operator on positions `(first, second)`.
///
/// Each column basis state contributes only to rows that share its passive
/// bits, so the full operator is filled by scattering the local column of
/// `unitary` into the target bit slots. Adjacency and order of the two
/// targets do not matter. Unchecked; [`embed`] validates that the targets
/// are distinct and in range.
fn embed_pair(
    unitary: &Array2<Complex64>,
    first: usize,
    second: usize,
    num_qubits: usize,
) -> Array2<Complex64> {
    let dim = 1 << num_qubits;
    let hi = 1 << bit_of(first, num_qubits);
    let lo = 1 << bit_of(second, num_qubits);
    let passive = !(hi | lo);

    let local_of = |index: usize| -> usize {
        (usize::from(index & hi != 0) << 1) | usize::from(index & lo != 0)
    };
    let deposit = |local: usize| -> usize {
        (if local & 0b10 != 0 { hi } else { 0 }) | (if local & 0b01 != 0 { lo } else { 0 })
    };

    let mut full = Array2::<Complex64>::zeros((dim, dim));
    for col in 0..dim {
        let local_col = local_of(col);
        let base = col & passive;
        for local_row in 0..4 {
            let value = unitary[[local_row, local_col]];
            if value.norm_sqr() == 0.0 {
                continue;
            }
            full[[base | deposit(local_row), col]] = value;
        }
    }
    full
}
