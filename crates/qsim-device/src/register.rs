//! Register state and the qubit allocation pool.
//!
//! A [`Register`] owns the single statevector of a simulation session, the
//! pool of free positions, and the random source used for measurement.
//! Positions are addressed through [`QubitRef`] values.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array2;
use num_complex::Complex64;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use qsim_core::{SimError, StandardGate, StateVector, embed, gates, measurement};

use crate::error::{DeviceError, DeviceResult};

/// Largest supported register. Operators are dense `2^n × 2^n` matrices.
pub const MAX_CAPACITY: usize = 10;

static NEXT_REGISTER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterId(u64);

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reg{}", self.0)
    }
}

/// Address of one allocated position.
///
/// The generation is bumped each time the position is handed out, so a
/// ref kept past its release is detected instead of silently aliasing the
/// next owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QubitRef {
    register: RegisterId,
    position: usize,
    generation: u64,
}

impl QubitRef {
    /// Register this ref belongs to.
    pub fn register(&self) -> RegisterId {
        self.register
    }

    /// Position inside the register (0 is the most-significant factor).
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for QubitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.position)
    }
}

/// Fixed-capacity register with a LIFO pool of free positions.
pub struct Register {
    id: RegisterId,
    state: StateVector,
    /// Free positions; the next allocation pops from the end.
    free: Vec<usize>,
    allocated: Vec<bool>,
    generations: Vec<u64>,
    rng: StdRng,
    tolerance: f64,
}

impl Register {
    /// Create a register of `capacity` qubits in |0…0⟩.
    ///
    /// The pool starts as `[capacity-1, …, 0]`, so allocations hand out
    /// position 0 first, then 1, and so on.
    pub fn new(capacity: usize, rng: StdRng, tolerance: f64) -> DeviceResult<Self> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(DeviceError::InvalidConfig(format!(
                "capacity must be in 1..={MAX_CAPACITY}, got {capacity}"
            )));
        }
        if !(tolerance > 0.0 && tolerance < 1e-3) {
            return Err(DeviceError::InvalidConfig(format!(
                "tolerance must be in (0, 1e-3), got {tolerance}"
            )));
        }
        Ok(Self {
            id: RegisterId(NEXT_REGISTER_ID.fetch_add(1, Ordering::Relaxed)),
            state: StateVector::try_new(capacity)?,
            free: (0..capacity).rev().collect(),
            allocated: vec![false; capacity],
            generations: vec![0; capacity],
            rng,
            tolerance,
        })
    }

    /// Identity of this register.
    pub fn id(&self) -> RegisterId {
        self.id
    }

    /// Total number of positions.
    pub fn capacity(&self) -> usize {
        self.state.num_qubits()
    }

    /// Number of free positions.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Numerical tolerance used for invariant checks.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Current state.
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Copy of the raw amplitudes.
    pub fn snapshot(&self) -> Vec<Complex64> {
        self.state.amplitudes().to_vec()
    }

    /// Take one free position, or `None` when the pool is empty.
    pub fn allocate(&mut self) -> Option<QubitRef> {
        let position = self.free.pop()?;
        Some(self.issue(position))
    }

    /// Take `n` positions at once, or none at all.
    pub fn allocate_many(&mut self, n: usize) -> Option<Vec<QubitRef>> {
        if n > self.free.len() {
            return None;
        }
        Some((0..n).filter_map(|_| self.allocate()).collect())
    }

    fn issue(&mut self, position: usize) -> QubitRef {
        self.allocated[position] = true;
        self.generations[position] += 1;
        debug!(register = %self.id, position, "allocated qubit");
        QubitRef {
            register: self.id,
            position,
            generation: self.generations[position],
        }
    }

    /// Reset the qubit to |0⟩ and return its position to the pool.
    ///
    /// # Errors
    ///
    /// [`DeviceError::DoubleFree`] if `qubit` was already released,
    /// [`DeviceError::ForeignQubit`] if it belongs to another register.
    pub fn release(&mut self, qubit: QubitRef) -> DeviceResult<()> {
        if qubit.register != self.id {
            return Err(DeviceError::ForeignQubit(qubit.position));
        }
        if !self.is_live(qubit) {
            return Err(DeviceError::DoubleFree(qubit.position));
        }
        self.reset_position(qubit.position)?;
        self.allocated[qubit.position] = false;
        self.free.push(qubit.position);
        debug!(register = %self.id, position = qubit.position, "released qubit");
        Ok(())
    }

    fn is_live(&self, qubit: QubitRef) -> bool {
        self.allocated[qubit.position] && self.generations[qubit.position] == qubit.generation
    }

    /// Validate that `qubit` is currently allocated in this register.
    pub fn check(&self, qubit: QubitRef) -> DeviceResult<usize> {
        if qubit.register != self.id {
            return Err(DeviceError::ForeignQubit(qubit.position));
        }
        if !self.is_live(qubit) {
            return Err(DeviceError::UseAfterFree(qubit.position));
        }
        Ok(qubit.position)
    }

    /// Apply a standard gate to `targets`.
    pub fn apply(&mut self, gate: StandardGate, targets: &[QubitRef]) -> DeviceResult<()> {
        let positions = self.check_all(targets)?;
        let operator = embed(&gate.matrix(), &positions, self.capacity())?;
        trace!(register = %self.id, %gate, ?positions, "applying gate");
        self.apply_operator(&operator, targets)
    }

    /// Apply an arbitrary 1- or 2-qubit unitary to `targets`.
    ///
    /// # Errors
    ///
    /// [`DeviceError::NonUnitary`] if `matrix` fails the `U†U = I` check.
    pub fn apply_unitary(
        &mut self,
        matrix: &Array2<Complex64>,
        targets: &[QubitRef],
    ) -> DeviceResult<()> {
        if !gates::is_unitary(matrix, self.tolerance) {
            return Err(DeviceError::NonUnitary(self.tolerance));
        }
        let positions = self.check_all(targets)?;
        let operator = embed(matrix, &positions, self.capacity())?;
        self.apply_operator(&operator, targets)
    }

    /// Apply an already embedded full-register operator.
    ///
    /// The refs are validated here so an operator built outside the lock
    /// cannot act on released positions. The resulting state must stay
    /// normalised; otherwise the live state is left untouched.
    pub fn apply_operator(
        &mut self,
        operator: &Array2<Complex64>,
        targets: &[QubitRef],
    ) -> DeviceResult<()> {
        self.check_all(targets)?;
        let mut next = self.state.clone();
        next.apply(operator)?;
        if !next.is_normalized(self.tolerance) {
            return Err(SimError::StateInvariant(format!(
                "norm drifted to {} after operator application",
                next.norm()
            ))
            .into());
        }
        self.state = next;
        Ok(())
    }

    /// Measure `qubit` in the computational basis and collapse the state.
    pub fn measure(&mut self, qubit: QubitRef) -> DeviceResult<bool> {
        let position = self.check(qubit)?;
        let outcome = measurement::measure(&mut self.state, position, &mut self.rng, self.tolerance)?;
        debug!(register = %self.id, position, outcome, "measured qubit");
        Ok(outcome)
    }

    /// Measure, then flip back to |0⟩ if the outcome was 1.
    pub fn reset(&mut self, qubit: QubitRef) -> DeviceResult<()> {
        let position = self.check(qubit)?;
        self.reset_position(position)
    }

    fn reset_position(&mut self, position: usize) -> DeviceResult<()> {
        let n = self.capacity();
        let outcome = measurement::measure(&mut self.state, position, &mut self.rng, self.tolerance)?;
        if outcome {
            let flip = embed(&gates::PAULI_X, &[position], n)?;
            self.state.apply(&flip)?;
        }
        Ok(())
    }

    /// Probability that measuring `qubit` yields 1. Does not collapse.
    pub fn probability_of_one(&self, qubit: QubitRef) -> DeviceResult<f64> {
        let position = self.check(qubit)?;
        let (_, p1) = measurement::probabilities(&self.state, position)?;
        Ok(p1)
    }

    fn check_all(&self, targets: &[QubitRef]) -> DeviceResult<Vec<usize>> {
        targets.iter().map(|&q| self.check(q)).collect()
    }
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Register")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("available", &self.available())
            .field("state", &format_args!("{}", self.state))
            .finish_non_exhaustive()
    }
}
