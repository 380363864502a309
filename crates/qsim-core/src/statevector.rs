//! Complex statevector of an n-qubit register.

use std::fmt;

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::embedding::bit_of;
use crate::error::{SimError, SimResult};

/// Default numerical tolerance for norm and probability checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Largest statevector this crate will allocate (2^24 amplitudes, 256 MiB).
pub const MAX_QUBITS: usize = 24;

/// A statevector representing a quantum state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Array1<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl StateVector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// # Panics
    ///
    /// Panics if `num_qubits` exceeds [`MAX_QUBITS`]; use
    /// [`try_new`](Self::try_new) for sizes that are not known to be small.
    pub fn new(num_qubits: usize) -> Self {
        assert!(
            num_qubits <= MAX_QUBITS,
            "statevector of {num_qubits} qubits exceeds the {MAX_QUBITS}-qubit limit"
        );
        Self::zero_state(num_qubits)
    }

    /// Checked variant of [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// [`SimError::TooManyQubits`] if `num_qubits` exceeds [`MAX_QUBITS`].
    pub fn try_new(num_qubits: usize) -> SimResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self::zero_state(num_qubits))
    }

    fn zero_state(num_qubits: usize) -> Self {
        let mut amplitudes = Array1::zeros(1 << num_qubits);
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Build a state from raw amplitudes.
    ///
    /// The length must be a power of two and the vector must already be
    /// normalised within [`DEFAULT_TOLERANCE`].
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(SimError::DimensionMismatch {
                expected: len.next_power_of_two().max(1),
                got: len,
            });
        }
        let state = Self {
            amplitudes: Array1::from(amplitudes),
            num_qubits: len.trailing_zeros() as usize,
        };
        if !state.is_normalized(DEFAULT_TOLERANCE) {
            return Err(SimError::StateInvariant(format!(
                "initial amplitudes have norm {}",
                state.norm()
            )));
        }
        Ok(state)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Length of the amplitude vector (2^n).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Borrow the amplitudes.
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Left-multiply by a full-register operator.
    pub fn apply(&mut self, operator: &Array2<Complex64>) -> SimResult<()> {
        let dim = self.dim();
        let (rows, cols) = operator.dim();
        if rows != dim || cols != dim {
            return Err(SimError::DimensionMismatch {
                expected: dim,
                got: rows.max(cols),
            });
        }
        self.amplitudes = operator.dot(&self.amplitudes);
        Ok(())
    }

    /// Squared L2 norm.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// L2 norm.
    pub fn norm(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Whether the norm is 1 within `tolerance`.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm() - 1.0).abs() <= tolerance
    }

    /// Rescale to unit norm.
    ///
    /// # Errors
    ///
    /// [`SimError::DegenerateState`] if the norm is below [`DEFAULT_TOLERANCE`].
    pub fn normalize(&mut self) -> SimResult<()> {
        let norm = self.norm();
        if norm < DEFAULT_TOLERANCE {
            return Err(SimError::DegenerateState(norm));
        }
        self.amplitudes.mapv_inplace(|a| a / norm);
        Ok(())
    }

    /// Probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Ket label of a basis index, position 0 first.
    pub fn basis_label(&self, index: usize) -> String {
        (0..self.num_qubits)
            .map(|p| {
                if index >> bit_of(p, self.num_qubits) & 1 == 1 {
                    '1'
                } else {
                    '0'
                }
            })
            .collect()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (index, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() < 1e-12 {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if amp.im.abs() < 1e-12 {
                write!(f, "{:.4}", amp.re)?;
            } else {
                write!(f, "({:.4}{:+.4}i)", amp.re, amp.im)?;
            }
            write!(f, "|{}⟩", self.basis_label(index))?;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
