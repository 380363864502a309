//! Error types for the device layer.

use qsim_core::SimError;
use thiserror::Error;

/// Errors that can occur while allocating or driving simulated qubits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeviceError {
    /// Not enough free positions. Expected under load; callers may retry
    /// after releasing qubits or reduce demand.
    #[error("Capacity exhausted: requested {requested} qubits, {available} available")]
    CapacityExhausted {
        /// Number of qubits requested.
        requested: usize,
        /// Number of free positions at the time of the request.
        available: usize,
    },

    /// The qubit was already returned to the pool.
    #[error("Qubit at position {0} was already deallocated")]
    DoubleFree(usize),

    /// The qubit was deallocated (and possibly re-issued) before this use.
    #[error("Qubit at position {0} used after deallocation")]
    UseAfterFree(usize),

    /// The qubit belongs to a different register.
    #[error("Qubit at position {0} belongs to another register")]
    ForeignQubit(usize),

    /// The simulator owning this qubit has been dropped.
    #[error("Simulator owning this qubit no longer exists")]
    DeviceDropped,

    /// A user-supplied operator is not unitary.
    #[error("Operator is not unitary within tolerance {0:e}")]
    NonUnitary(f64),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the statevector engine.
    #[error("Engine error: {0}")]
    Sim(#[from] SimError),
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;
