//! Quantum teleportation.

use num_complex::Complex64;
use qsim_device::{DeviceResult, QuantumDevice, Qubit, Simulator};
use tracing::debug;

/// Classical bits sent from `here` to `there` during teleportation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corrections {
    /// Outcome on the message qubit; selects a Z correction.
    pub phase_flip: bool,
    /// Outcome on the sender's half of the Bell pair; selects an X correction.
    pub bit_flip: bool,
}

/// Move the state of `msg` onto `there`, using `here` as the sender's half
/// of a freshly made Bell pair.
///
/// `here` and `there` must start in |0⟩. On return `msg` and `here` are
/// back in |0⟩ and `there` holds the original message state.
pub fn teleport<Q: Qubit>(msg: &Q, here: &Q, there: &Q) -> DeviceResult<Corrections> {
    here.h()?;
    here.cnot(there)?;

    msg.cnot(here)?;
    msg.h()?;

    let phase_flip = msg.measure()?;
    if phase_flip {
        there.z()?;
    }
    let bit_flip = here.measure()?;
    if bit_flip {
        there.x()?;
    }

    msg.reset()?;
    here.reset()?;

    debug!(phase_flip, bit_flip, "teleported");
    Ok(Corrections {
        phase_flip,
        bit_flip,
    })
}

/// Result of [`run_teleport`].
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportRun {
    /// Probability of |0⟩ on the receiving qubit after undoing the
    /// preparation; 1 when teleportation is exact.
    pub p_zero: f64,
    /// Amplitudes `[⟨0|, ⟨1|]` of the receiving qubit after undoing the
    /// preparation, read with `msg` and `here` in |0⟩; `[1, 0]` up to a
    /// global phase when teleportation is exact.
    pub amplitudes: [Complex64; 2],
    /// Corrections the receiver applied.
    pub corrections: Corrections,
    /// Register state in ket notation after undoing the preparation.
    pub state: String,
}

/// Prepare `ry(angle)|0⟩`, teleport it, and apply `ry(-angle)` on the
/// receiving end.
pub fn run_teleport(angle: f64, seed: u64) -> DeviceResult<TeleportRun> {
    let sim = Simulator::with_seed(3, seed)?;
    sim.using_register(3, |q| {
        let (msg, here, there) = (&q[0], &q[1], &q[2]);
        msg.ry(angle)?;
        let corrections = teleport(msg, here, there)?;
        there.ry(-angle)?;
        // `there` is position 2, the least significant bit; the sender side
        // is back in |0⟩, so its amplitudes sit at indices 0 and 1.
        let amps = sim.dump();
        Ok(TeleportRun {
            p_zero: 1.0 - there.probability_of_one()?,
            amplitudes: [amps[0], amps[1]],
            corrections,
            state: sim.state_string(),
        })
    })
}
