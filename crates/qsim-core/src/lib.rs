//! qsim statevector engine
//!
//! This crate holds the numerical core of the qsim register simulator: an
//! exact, noiseless statevector, the embedding of one- and two-qubit
//! operators into the full register space, and projective measurement with
//! collapse.
//!
//! # Basis ordering
//!
//! Position 0 is the most-significant tensor factor. In a 3-qubit register
//! the basis state `|q0 q1 q2⟩` has index `4·q0 + 2·q1 + q2`. See
//! [`embedding::bit_of`].
//!
//! # Example
//!
//! ```rust
//! use qsim_core::{StateVector, embed, gates, measure};
//! use rand::SeedableRng;
//!
//! let mut state = StateVector::new(2);
//! state.apply(&embed(&gates::HADAMARD, &[0], 2).unwrap()).unwrap();
//! state.apply(&embed(&gates::CNOT, &[0, 1], 2).unwrap()).unwrap();
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let a = measure(&mut state, 0, &mut rng, 1e-9).unwrap();
//! let b = measure(&mut state, 1, &mut rng, 1e-9).unwrap();
//! assert_eq!(a, b);
//! ```
//!
//! # Cost
//!
//! Operators are materialised as dense `2^n × 2^n` matrices, so memory grows
//! as `16 · 4^n` bytes per operator.
//!
//! | Qubits | Operator size |
//! |--------|---------------|
//! | 4 | 4 KB |
//! | 8 | 1 MB |
//! | 10 | 16 MB |

pub mod embedding;
pub mod error;
pub mod gates;
pub mod measurement;
pub mod statevector;

pub use embedding::{bit_of, embed};
pub use error::{SimError, SimResult};
pub use gates::StandardGate;
pub use measurement::{measure, probabilities};
pub use statevector::{DEFAULT_TOLERANCE, MAX_QUBITS, StateVector};
