//! Quantum random numbers and classical bits sent over qubits.
//!
//! A qubit prepared in |+⟩ measures to 0 or 1 with equal probability. The
//! same preparation machinery carries a classical bit: encode it in the Z
//! basis (|0⟩/|1⟩) or the X basis (|+⟩/|−⟩), and read it back in a
//! matching or mismatched basis.

use qsim_device::{DeviceResult, QuantumDevice, Qubit};
use tracing::debug;

/// One uniformly random bit.
pub fn random_bit<D: QuantumDevice>(device: &D) -> DeviceResult<bool> {
    device.using_qubit(|q| {
        q.h()?;
        q.measure()
    })
}

/// Eight random bits, most significant first.
pub fn random_byte<D: QuantumDevice>(device: &D) -> DeviceResult<u8> {
    let mut byte = 0u8;
    for _ in 0..8 {
        byte = (byte << 1) | u8::from(random_bit(device)?);
    }
    Ok(byte)
}

/// Encode `bit` in the Z basis and measure in the Z basis.
///
/// Always returns `bit`.
pub fn send_classical_bit<D: QuantumDevice>(device: &D, bit: bool) -> DeviceResult<bool> {
    device.using_qubit(|q| {
        prepare_z(bit, q)?;
        q.measure()
    })
}

/// Encode `bit` in the X basis and measure in the X basis.
///
/// Always returns `bit`.
pub fn send_classical_bit_plusminus<D: QuantumDevice>(device: &D, bit: bool) -> DeviceResult<bool> {
    device.using_qubit(|q| {
        prepare_z(bit, q)?;
        q.h()?;
        measure_x(q)
    })
}

/// Encode `bit` in the Z basis but measure in the X basis.
///
/// The result is a fair coin, independent of `bit`.
pub fn send_classical_bit_wrong_basis<D: QuantumDevice>(
    device: &D,
    bit: bool,
) -> DeviceResult<bool> {
    let received = device.using_qubit(|q| {
        prepare_z(bit, q)?;
        measure_x(q)
    })?;
    if received != bit {
        debug!(sent = bit, received, "basis mismatch flipped the bit");
    }
    Ok(received)
}

fn prepare_z<Q: Qubit>(bit: bool, q: &Q) -> DeviceResult<()> {
    if bit {
        q.x()?;
    }
    Ok(())
}

fn measure_x<Q: Qubit>(q: &Q) -> DeviceResult<bool> {
    q.h()?;
    q.measure()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_device::Simulator;

    #[test]
    fn test_matching_bases_preserve_bit() {
        let sim = Simulator::with_seed(1, 11).unwrap();
        for bit in [false, true, true, false] {
            assert_eq!(send_classical_bit(&sim, bit).unwrap(), bit);
            assert_eq!(send_classical_bit_plusminus(&sim, bit).unwrap(), bit);
        }
        assert_eq!(sim.available(), 1);
    }

    #[test]
    fn test_random_byte_varies() {
        let sim = Simulator::with_seed(1, 3).unwrap();
        let bytes: Vec<u8> = (0..16).map(|_| random_byte(&sim).unwrap()).collect();
        assert!(bytes.iter().any(|&b| b != bytes[0]));
    }
}
