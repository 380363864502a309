//! qsim device layer
//!
//! Qubit allocation and the handle-based API on top of [`qsim_core`].
//!
//! - [`Register`]: the one statevector of a session plus the pool of free
//!   positions and the measurement RNG.
//! - [`Simulator`]: the device façade; hands out [`SimulatedQubit`]s.
//! - [`Qubit`] / [`QuantumDevice`]: the capability traits protocol code is
//!   written against, including the scoped `using_qubit` and
//!   `using_register` helpers.
//!
//! # Allocation policy
//!
//! Free positions form a LIFO stack that initially yields 0, 1, 2, …;
//! a released position is the next one handed out. Deallocation resets the
//! qubit to |0⟩ before the position re-enters the pool, so a reused
//! position never carries entanglement from its previous owner.
//!
//! # Example
//!
//! ```rust
//! use qsim_device::{QuantumDevice, Qubit, Simulator};
//!
//! let sim = Simulator::with_seed(2, 42).unwrap();
//! let (a, b) = sim
//!     .using_register(2, |q| {
//!         q[0].h()?;
//!         q[0].cnot(&q[1])?;
//!         Ok((q[0].measure()?, q[1].measure()?))
//!     })
//!     .unwrap();
//! assert_eq!(a, b);
//! assert_eq!(sim.available(), 2);
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod register;
pub mod simulator;

pub use config::SimulatorConfig;
pub use device::{QuantumDevice, Qubit};
pub use error::{DeviceError, DeviceResult};
pub use register::{MAX_CAPACITY, QubitRef, Register, RegisterId};
pub use simulator::{SimulatedQubit, Simulator};
