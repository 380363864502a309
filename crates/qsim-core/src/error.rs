//! Error types for the core engine.

use thiserror::Error;

/// Errors raised by the statevector engine.
///
/// Every variant is a programming error or an internal invariant violation;
/// none of them is expected during a correct simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Target position out of range or repeated.
    #[error("Invalid target {position} for a {num_qubits}-qubit register{}", format_reason(.reason))]
    InvalidTarget {
        /// The offending position.
        position: usize,
        /// Number of qubits in the register.
        num_qubits: usize,
        /// Extra context, e.g. "duplicate target".
        reason: Option<&'static str>,
    },

    /// Only one- and two-qubit operators can be embedded.
    #[error("Unsupported operator arity: {0} targets (expected 1 or 2)")]
    UnsupportedArity(usize),

    /// Matrix or vector has the wrong shape.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        got: usize,
    },

    /// Normalisation or probability-sum check failed outside tolerance.
    #[error("State invariant violated: {0}")]
    StateInvariant(String),

    /// Register too large to represent as a dense statevector.
    #[error("Too many qubits: {requested} requested, at most {max} supported")]
    TooManyQubits {
        /// Requested number of qubits.
        requested: usize,
        /// Largest supported number of qubits.
        max: usize,
    },

    /// Attempted to normalise a numerically zero vector.
    #[error("Cannot normalise a degenerate state (norm {0:e})")]
    DegenerateState(f64),
}

impl SimError {
    pub(crate) fn out_of_range(position: usize, num_qubits: usize) -> Self {
        SimError::InvalidTarget {
            position,
            num_qubits,
            reason: None,
        }
    }

    pub(crate) fn duplicate(position: usize, num_qubits: usize) -> Self {
        SimError::InvalidTarget {
            position,
            num_qubits,
            reason: Some("duplicate target"),
        }
    }
}

#[allow(clippy::ref_option)]
fn format_reason(reason: &Option<&'static str>) -> String {
    match reason {
        Some(r) => format!(" ({r})"),
        None => String::new(),
    }
}

/// Result type for engine operations.
pub type SimResult<T> = Result<T, SimError>;
