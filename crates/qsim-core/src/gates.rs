//! Standard gate matrices.
//!
//! Fixed matrices are process-wide statics built once on first use.
//! Rotations depend on an angle and are constructed per call.
//!
//! Two-qubit matrices use the local ordering `|a b⟩ = 2·a + b`, where `a`
//! is the first target passed to the embedding (for CNOT, the control).

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt;
use std::sync::LazyLock;

use ndarray::{Array2, array};
use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Single-qubit identity.
pub static IDENTITY: LazyLock<Array2<Complex64>> =
    LazyLock::new(|| array![[ONE, ZERO], [ZERO, ONE]]);

/// Hadamard gate.
pub static HADAMARD: LazyLock<Array2<Complex64>> = LazyLock::new(|| {
    let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
    array![[s, s], [s, -s]]
});

/// Pauli-X (bit flip).
pub static PAULI_X: LazyLock<Array2<Complex64>> =
    LazyLock::new(|| array![[ZERO, ONE], [ONE, ZERO]]);

/// Pauli-Y.
pub static PAULI_Y: LazyLock<Array2<Complex64>> =
    LazyLock::new(|| array![[ZERO, -I], [I, ZERO]]);

/// Pauli-Z (phase flip).
pub static PAULI_Z: LazyLock<Array2<Complex64>> =
    LazyLock::new(|| array![[ONE, ZERO], [ZERO, -ONE]]);

/// S gate (sqrt(Z)).
pub static PHASE_S: LazyLock<Array2<Complex64>> =
    LazyLock::new(|| array![[ONE, ZERO], [ZERO, I]]);

/// T gate (fourth root of Z).
pub static PHASE_T: LazyLock<Array2<Complex64>> =
    LazyLock::new(|| array![[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, PI / 4.0)]]);

/// Projector onto |0⟩.
pub static PROJECTOR_0: LazyLock<Array2<Complex64>> =
    LazyLock::new(|| array![[ONE, ZERO], [ZERO, ZERO]]);

/// Projector onto |1⟩.
pub static PROJECTOR_1: LazyLock<Array2<Complex64>> =
    LazyLock::new(|| array![[ZERO, ZERO], [ZERO, ONE]]);

/// Controlled-NOT, control on the first target.
pub static CNOT: LazyLock<Array2<Complex64>> = LazyLock::new(|| {
    array![
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, ZERO, ONE],
        [ZERO, ZERO, ONE, ZERO],
    ]
});

/// Controlled-Z (symmetric in its targets).
pub static CZ: LazyLock<Array2<Complex64>> = LazyLock::new(|| {
    array![
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, ONE, ZERO],
        [ZERO, ZERO, ZERO, -ONE],
    ]
});

/// SWAP.
pub static SWAP: LazyLock<Array2<Complex64>> = LazyLock::new(|| {
    array![
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ZERO, ONE, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, ZERO, ONE],
    ]
});

/// RX rotation: `exp(-i θ X / 2)`.
pub fn rx(theta: f64) -> Array2<Complex64> {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    array![[c, s], [s, c]]
}

/// RY rotation: `exp(-i θ Y / 2)`.
pub fn ry(theta: f64) -> Array2<Complex64> {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new((theta / 2.0).sin(), 0.0);
    array![[c, -s], [s, c]]
}

/// RZ rotation: `exp(-i θ Z / 2)`.
pub fn rz(theta: f64) -> Array2<Complex64> {
    array![
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)]
    ]
}

/// Gates the simulated device exposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardGate {
    /// Identity.
    I,
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// S gate.
    S,
    /// T gate.
    T,
    /// Rotation around X.
    Rx(f64),
    /// Rotation around Y.
    Ry(f64),
    /// Rotation around Z.
    Rz(f64),
    /// Controlled-NOT (control, target).
    CX,
    /// Controlled-Z.
    CZ,
    /// SWAP.
    Swap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::S => "s",
            StandardGate::T => "t",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,
            _ => 1,
        }
    }

    /// The local unitary of this gate.
    pub fn matrix(&self) -> Array2<Complex64> {
        match self {
            StandardGate::I => IDENTITY.clone(),
            StandardGate::H => HADAMARD.clone(),
            StandardGate::X => PAULI_X.clone(),
            StandardGate::Y => PAULI_Y.clone(),
            StandardGate::Z => PAULI_Z.clone(),
            StandardGate::S => PHASE_S.clone(),
            StandardGate::T => PHASE_T.clone(),
            StandardGate::Rx(theta) => rx(*theta),
            StandardGate::Ry(theta) => ry(*theta),
            StandardGate::Rz(theta) => rz(*theta),
            StandardGate::CX => CNOT.clone(),
            StandardGate::CZ => CZ.clone(),
            StandardGate::Swap => SWAP.clone(),
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardGate::Rx(t) | StandardGate::Ry(t) | StandardGate::Rz(t) => {
                write!(f, "{}({t})", self.name())
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Check `U†U = I` within `tolerance`.
pub fn is_unitary(matrix: &Array2<Complex64>, tolerance: f64) -> bool {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return false;
    }
    let product = matrix.t().mapv(|z| z.conj()).dot(matrix);
    product.indexed_iter().all(|((r, c), z)| {
        let expected = if r == c { ONE } else { ZERO };
        (z - expected).norm() < tolerance
    })
}
