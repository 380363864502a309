//! Qubit and device capability traits.

use tracing::warn;

use crate::error::{DeviceError, DeviceResult};

/// Operations available on one allocated qubit.
///
/// Two-qubit operations take the partner by reference; both qubits must
/// come from the same device.
pub trait Qubit {
    /// Hadamard.
    fn h(&self) -> DeviceResult<()>;

    /// Pauli-X (bit flip).
    fn x(&self) -> DeviceResult<()>;

    /// Pauli-Y.
    fn y(&self) -> DeviceResult<()>;

    /// Pauli-Z (phase flip).
    fn z(&self) -> DeviceResult<()>;

    /// S gate.
    fn s(&self) -> DeviceResult<()>;

    /// T gate.
    fn t(&self) -> DeviceResult<()>;

    /// Rotation about X by `angle` radians.
    fn rx(&self, angle: f64) -> DeviceResult<()>;

    /// Rotation about Y by `angle` radians.
    fn ry(&self, angle: f64) -> DeviceResult<()>;

    /// Rotation about Z by `angle` radians.
    fn rz(&self, angle: f64) -> DeviceResult<()>;

    /// Exchange the states of `self` and `other`.
    fn swap(&self, other: &Self) -> DeviceResult<()>;

    /// Controlled-NOT with `self` as control.
    fn cnot(&self, target: &Self) -> DeviceResult<()>;

    /// Controlled-Z.
    fn cz(&self, other: &Self) -> DeviceResult<()>;

    /// Measure in the computational basis; `true` means |1⟩.
    fn measure(&self) -> DeviceResult<bool>;

    /// Return the qubit to |0⟩.
    fn reset(&self) -> DeviceResult<()>;
}

/// A source of qubits.
pub trait QuantumDevice {
    /// Handle type issued by this device.
    type Qubit: Qubit;

    /// Take one qubit, or `None` if the device is full.
    fn allocate(&self) -> Option<Self::Qubit>;

    /// Take `n` qubits atomically, or `None` if fewer than `n` are free.
    fn allocate_many(&self, n: usize) -> Option<Vec<Self::Qubit>>;

    /// Return a qubit to the device. The qubit is reset to |0⟩ first.
    fn deallocate(&self, qubit: Self::Qubit) -> DeviceResult<()>;

    /// Number of qubits that can still be allocated.
    fn available(&self) -> usize;

    /// Like [`allocate`](Self::allocate) but reports exhaustion as an error.
    fn try_allocate(&self) -> DeviceResult<Self::Qubit> {
        self.allocate().ok_or_else(|| DeviceError::CapacityExhausted {
            requested: 1,
            available: self.available(),
        })
    }

    /// Like [`allocate_many`](Self::allocate_many) but reports exhaustion
    /// as an error.
    fn try_allocate_many(&self, n: usize) -> DeviceResult<Vec<Self::Qubit>> {
        self.allocate_many(n)
            .ok_or_else(|| DeviceError::CapacityExhausted {
                requested: n,
                available: self.available(),
            })
    }

    /// Run `f` with a freshly allocated qubit.
    ///
    /// The qubit is reset and deallocated on every exit path, including an
    /// `Err` from `f` or a panic. An error from `f` takes precedence over a
    /// cleanup error.
    fn using_qubit<T, F>(&self, f: F) -> DeviceResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self::Qubit) -> DeviceResult<T>,
    {
        let guard = ScopeGuard::new(self, vec![self.try_allocate()?]);
        let result = f(&guard.qubits[0]);
        let cleanup = guard.release();
        result.and_then(|value| cleanup.map(|()| value))
    }

    /// Run `f` with `n` freshly allocated qubits, released like
    /// [`using_qubit`](Self::using_qubit).
    fn using_register<T, F>(&self, n: usize, f: F) -> DeviceResult<T>
    where
        Self: Sized,
        F: FnOnce(&[Self::Qubit]) -> DeviceResult<T>,
    {
        let guard = ScopeGuard::new(self, self.try_allocate_many(n)?);
        let result = f(&guard.qubits);
        let cleanup = guard.release();
        result.and_then(|value| cleanup.map(|()| value))
    }
}

/// Hands qubits back to their device when dropped.
struct ScopeGuard<'d, D: QuantumDevice> {
    device: &'d D,
    qubits: Vec<D::Qubit>,
}

impl<'d, D: QuantumDevice> ScopeGuard<'d, D> {
    fn new(device: &'d D, qubits: Vec<D::Qubit>) -> Self {
        Self { device, qubits }
    }

    /// Release explicitly and report the first failure.
    fn release(mut self) -> DeviceResult<()> {
        let qubits = std::mem::take(&mut self.qubits);
        release_all(self.device, qubits)
    }
}

impl<D: QuantumDevice> Drop for ScopeGuard<'_, D> {
    fn drop(&mut self) {
        if self.qubits.is_empty() {
            return;
        }
        let qubits = std::mem::take(&mut self.qubits);
        if let Err(e) = release_all(self.device, qubits) {
            warn!("failed to release scoped qubits during unwind: {e}");
        }
    }
}

fn release_all<D: QuantumDevice>(device: &D, qubits: Vec<D::Qubit>) -> DeviceResult<()> {
    let mut first_error = None;
    for qubit in qubits {
        if let Err(e) = device.deallocate(qubit) {
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}
