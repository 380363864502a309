//! BB84 key exchange.
//!
//! The sender picks a random message bit and a random basis (Z or X),
//! prepares one qubit accordingly, and the receiver measures it in a basis
//! of their own choosing. Rounds where the two bases agree contribute the
//! message bit to the shared key; the rest are discarded.

use qsim_device::{DeviceResult, QuantumDevice, Qubit};
use tracing::{debug, info};

use crate::qrng::random_bit;

/// Encode `message` on `q`; `basis == true` selects the X basis.
pub fn prepare_message_qubit<Q: Qubit>(message: bool, basis: bool, q: &Q) -> DeviceResult<()> {
    if message {
        q.x()?;
    }
    if basis {
        q.h()?;
    }
    Ok(())
}

/// Measure `q` in the given basis and reset it.
pub fn measure_message_qubit<Q: Qubit>(basis: bool, q: &Q) -> DeviceResult<bool> {
    if basis {
        q.h()?;
    }
    let result = q.measure()?;
    q.reset()?;
    Ok(result)
}

/// Everything both parties know after one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    /// Bit the sender encoded.
    pub message: bool,
    /// Sender's basis; `true` is X.
    pub basis: bool,
    /// Bit the receiver measured.
    pub received: bool,
    /// Receiver's basis; `true` is X.
    pub receiver_basis: bool,
}

impl Exchange {
    /// Whether this round survives sifting.
    pub fn bases_match(&self) -> bool {
        self.basis == self.receiver_basis
    }
}

/// Run one round: random bits come from `sender`, the receiver's basis
/// from `receiver`, and the message qubit lives on `sender`.
pub fn send_single_bit<S, R>(sender: &S, receiver: &R) -> DeviceResult<Exchange>
where
    S: QuantumDevice,
    R: QuantumDevice,
{
    let message = random_bit(sender)?;
    let basis = random_bit(sender)?;
    let receiver_basis = random_bit(receiver)?;

    let received = sender.using_qubit(|q| {
        prepare_message_qubit(message, basis, q)?;
        measure_message_qubit(receiver_basis, q)
    })?;

    Ok(Exchange {
        message,
        basis,
        received,
        receiver_basis,
    })
}

/// Sifted key produced by [`simulate_bb84`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bb84Key {
    /// Key bits, as held by the sender.
    pub bits: Vec<bool>,
    /// Rounds spent, including discarded ones.
    pub iterations: usize,
    /// Sifted rounds where the receiver's bit disagreed with the sender's.
    pub errors: usize,
}

impl Bb84Key {
    /// Fraction of sifted rounds that disagreed.
    pub fn error_rate(&self) -> f64 {
        if self.bits.is_empty() {
            0.0
        } else {
            self.errors as f64 / self.bits.len() as f64
        }
    }
}

/// Repeat rounds until `n_bits` key bits have been sifted.
pub fn simulate_bb84<S, R>(sender: &S, receiver: &R, n_bits: usize) -> DeviceResult<Bb84Key>
where
    S: QuantumDevice,
    R: QuantumDevice,
{
    let mut bits = Vec::with_capacity(n_bits);
    let mut iterations = 0;
    let mut errors = 0;

    while bits.len() < n_bits {
        let exchange = send_single_bit(sender, receiver)?;
        iterations += 1;
        if exchange.bases_match() {
            if exchange.received != exchange.message {
                errors += 1;
            }
            bits.push(exchange.message);
        } else {
            debug!(round = iterations, "bases differ, round discarded");
        }
    }

    info!(n_bits, iterations, errors, "bb84 key established");
    Ok(Bb84Key {
        bits,
        iterations,
        errors,
    })
}

/// One-time pad: XOR `message` with `key`, truncated to the shorter.
pub fn encrypt(message: &[bool], key: &[bool]) -> Vec<bool> {
    message.iter().zip(key).map(|(m, k)| m ^ k).collect()
}

/// Hex rendering of a big-endian bit string, e.g. `0x1f`.
///
/// Leading zero nibbles are dropped; an empty or all-zero input gives
/// `0x0`.
pub fn bits_to_hex(bits: &[bool]) -> String {
    let pad = (4 - bits.len() % 4) % 4;
    let padded: Vec<bool> = std::iter::repeat_n(false, pad)
        .chain(bits.iter().copied())
        .collect();

    let digits: String = padded
        .chunks(4)
        .map(|nibble| {
            let value = nibble
                .iter()
                .fold(0u32, |acc, &b| (acc << 1) | u32::from(b));
            char::from_digit(value, 16).unwrap_or('0')
        })
        .skip_while(|&c| c == '0')
        .collect();

    if digits.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{digits}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_bits_to_hex() {
        assert_eq!(bits_to_hex(&bits("11111")), "0x1f");
        assert_eq!(bits_to_hex(&bits("1010")), "0xa");
        assert_eq!(bits_to_hex(&bits("00001")), "0x1");
        assert_eq!(bits_to_hex(&bits("0000")), "0x0");
        assert_eq!(bits_to_hex(&[]), "0x0");
    }

    #[test]
    fn test_encrypt_is_involution() {
        let message = bits("110110000011");
        let key = bits("011100101110");
        let cipher = encrypt(&message, &key);
        assert_ne!(cipher, message);
        assert_eq!(encrypt(&cipher, &key), message);
    }

    #[test]
    fn test_encrypt_truncates_to_key() {
        assert_eq!(encrypt(&bits("111"), &bits("10")), bits("01"));
    }

    #[test]
    fn test_exchange_sifting() {
        let round = Exchange {
            message: true,
            basis: true,
            received: true,
            receiver_basis: false,
        };
        assert!(!round.bases_match());
    }
}
