//! Simulated device and qubit handles.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use ndarray::Array2;
use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qsim_core::{DEFAULT_TOLERANCE, StandardGate, embed};

use crate::config::SimulatorConfig;
use crate::device::{QuantumDevice, Qubit};
use crate::error::{DeviceError, DeviceResult};
use crate::register::{QubitRef, Register, RegisterId};

/// Local statevector device.
///
/// Owns one [`Register`] behind a mutex; every gate, measurement, and
/// allocation holds the lock for its whole read-modify-write. Operators
/// are embedded before the lock is taken.
pub struct Simulator {
    register: Arc<Mutex<Register>>,
    id: RegisterId,
    capacity: usize,
}

impl Simulator {
    /// Create a simulator of `capacity` qubits seeded from OS entropy.
    pub fn new(capacity: usize) -> DeviceResult<Self> {
        Self::with_rng(capacity, StdRng::from_entropy(), DEFAULT_TOLERANCE)
    }

    /// Create a simulator whose measurements are reproducible.
    pub fn with_seed(capacity: usize, seed: u64) -> DeviceResult<Self> {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed), DEFAULT_TOLERANCE)
    }

    /// One-qubit simulator.
    pub fn single_qubit() -> DeviceResult<Self> {
        Self::new(1)
    }

    /// Create a simulator from a validated configuration.
    pub fn from_config(config: &SimulatorConfig) -> DeviceResult<Self> {
        config.validate()?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self::with_rng(config.capacity, rng, config.tolerance)
    }

    /// Create a simulator with an explicit random source and tolerance.
    pub fn with_rng(capacity: usize, rng: StdRng, tolerance: f64) -> DeviceResult<Self> {
        let register = Register::new(capacity, rng, tolerance)?;
        let id = register.id();
        debug!(register = %id, capacity, "created simulator");
        Ok(Self {
            register: Arc::new(Mutex::new(register)),
            id,
            capacity,
        })
    }

    /// Number of qubits in the register.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Identity of the underlying register.
    pub fn id(&self) -> RegisterId {
        self.id
    }

    /// Raw amplitudes of the whole register.
    pub fn dump(&self) -> Vec<Complex64> {
        self.lock().snapshot()
    }

    /// Ket-notation rendering of the register state.
    pub fn state_string(&self) -> String {
        self.lock().state().to_string()
    }

    /// Apply an arbitrary unitary to one or two qubits of this device.
    pub fn apply_unitary(
        &self,
        matrix: &Array2<Complex64>,
        qubits: &[&SimulatedQubit],
    ) -> DeviceResult<()> {
        let refs: Vec<QubitRef> = qubits.iter().map(|q| q.qubit).collect();
        self.lock().apply_unitary(matrix, &refs)
    }

    fn lock(&self) -> MutexGuard<'_, Register> {
        self.register
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, qubit: QubitRef) -> SimulatedQubit {
        SimulatedQubit {
            qubit,
            register: Arc::downgrade(&self.register),
            capacity: self.capacity,
        }
    }
}

impl QuantumDevice for Simulator {
    type Qubit = SimulatedQubit;

    fn allocate(&self) -> Option<SimulatedQubit> {
        let qubit = self.lock().allocate()?;
        Some(self.handle(qubit))
    }

    fn allocate_many(&self, n: usize) -> Option<Vec<SimulatedQubit>> {
        let qubits = self.lock().allocate_many(n)?;
        Some(qubits.into_iter().map(|q| self.handle(q)).collect())
    }

    fn deallocate(&self, qubit: SimulatedQubit) -> DeviceResult<()> {
        if qubit.qubit.register() != self.id {
            return Err(DeviceError::ForeignQubit(qubit.position()));
        }
        self.lock().release(qubit.qubit)
    }

    fn available(&self) -> usize {
        self.lock().available()
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("id", &self.id)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Handle to one allocated position of a [`Simulator`].
///
/// Not `Clone`: exactly one handle exists per allocated position, and
/// [`QuantumDevice::deallocate`] consumes it. The link back to the
/// register is weak; the simulator stays the sole owner of the state.
#[derive(Debug)]
pub struct SimulatedQubit {
    qubit: QubitRef,
    register: Weak<Mutex<Register>>,
    capacity: usize,
}

impl SimulatedQubit {
    /// Position inside the register.
    pub fn position(&self) -> usize {
        self.qubit.position()
    }

    /// Underlying address.
    pub fn qubit_ref(&self) -> QubitRef {
        self.qubit
    }

    /// Probability of measuring 1, without collapsing.
    pub fn probability_of_one(&self) -> DeviceResult<f64> {
        self.with_register(|reg| reg.probability_of_one(self.qubit))
    }

    fn with_register<T>(
        &self,
        f: impl FnOnce(&mut Register) -> DeviceResult<T>,
    ) -> DeviceResult<T> {
        let register = self.register.upgrade().ok_or(DeviceError::DeviceDropped)?;
        let mut guard = register.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn gate(&self, gate: StandardGate) -> DeviceResult<()> {
        let operator = embed(&gate.matrix(), &[self.position()], self.capacity)?;
        self.with_register(|reg| reg.apply_operator(&operator, &[self.qubit]))
    }

    fn pair_gate(&self, gate: StandardGate, other: &Self) -> DeviceResult<()> {
        if other.qubit.register() != self.qubit.register() {
            return Err(DeviceError::ForeignQubit(other.position()));
        }
        let operator = embed(
            &gate.matrix(),
            &[self.position(), other.position()],
            self.capacity,
        )?;
        self.with_register(|reg| reg.apply_operator(&operator, &[self.qubit, other.qubit]))
    }
}

impl Qubit for SimulatedQubit {
    fn h(&self) -> DeviceResult<()> {
        self.gate(StandardGate::H)
    }

    fn x(&self) -> DeviceResult<()> {
        self.gate(StandardGate::X)
    }

    fn y(&self) -> DeviceResult<()> {
        self.gate(StandardGate::Y)
    }

    fn z(&self) -> DeviceResult<()> {
        self.gate(StandardGate::Z)
    }

    fn s(&self) -> DeviceResult<()> {
        self.gate(StandardGate::S)
    }

    fn t(&self) -> DeviceResult<()> {
        self.gate(StandardGate::T)
    }

    fn rx(&self, angle: f64) -> DeviceResult<()> {
        self.gate(StandardGate::Rx(angle))
    }

    fn ry(&self, angle: f64) -> DeviceResult<()> {
        self.gate(StandardGate::Ry(angle))
    }

    fn rz(&self, angle: f64) -> DeviceResult<()> {
        self.gate(StandardGate::Rz(angle))
    }

    fn swap(&self, other: &Self) -> DeviceResult<()> {
        self.pair_gate(StandardGate::Swap, other)
    }

    fn cnot(&self, target: &Self) -> DeviceResult<()> {
        self.pair_gate(StandardGate::CX, target)
    }

    fn cz(&self, other: &Self) -> DeviceResult<()> {
        self.pair_gate(StandardGate::CZ, other)
    }

    #[instrument(skip(self), fields(qubit = %self.qubit))]
    fn measure(&self) -> DeviceResult<bool> {
        self.with_register(|reg| reg.measure(self.qubit))
    }

    fn reset(&self) -> DeviceResult<()> {
        self.with_register(|reg| reg.reset(self.qubit))
    }
}
