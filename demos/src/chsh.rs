//! The CHSH nonlocal game.
//!
//! A referee sends each of two players a random question bit. The players
//! answer without communicating and win when
//! `player_answer XOR opponent_answer == player_question AND opponent_question`.
//! Any classical strategy wins at most 75% of rounds; sharing a Bell pair
//! lifts that to cos²(π/8) ≈ 85.4%.

use std::f64::consts::PI;

use qsim_device::{DeviceResult, QuantumDevice, Qubit, SimulatedQubit, Simulator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Rotation angles (radians) indexed by the question bit.
const PLAYER_ANGLES: [f64; 2] = [PI / 2.0, 0.0];
const OPPONENT_ANGLES: [f64; 2] = [PI / 4.0, 3.0 * PI / 4.0];

/// Answers for one round of the game.
///
/// Each side is asked at most once per instance.
pub trait Strategy {
    /// First player's answer to `question`.
    fn player(&mut self, question: bool) -> DeviceResult<bool>;

    /// Second player's answer to `question`.
    fn opponent(&mut self, question: bool) -> DeviceResult<bool>;
}

/// Both players always answer 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantStrategy;

impl Strategy for ConstantStrategy {
    fn player(&mut self, _question: bool) -> DeviceResult<bool> {
        Ok(false)
    }

    fn opponent(&mut self, _question: bool) -> DeviceResult<bool> {
        Ok(false)
    }
}

/// The classical strategy that wins unless both questions are 1.
pub fn constant_strategy() -> ConstantStrategy {
    ConstantStrategy
}

/// Players share a Bell pair and measure after a question-dependent
/// Y rotation.
#[derive(Debug)]
pub struct QuantumStrategy {
    player_qubit: SimulatedQubit,
    opponent_qubit: SimulatedQubit,
    // Handles are weak; the simulator must outlive them.
    _device: Simulator,
}

/// Prepare a fresh Bell pair (|00⟩ + |11⟩)/√2 on a two-qubit simulator.
pub fn quantum_strategy(seed: u64) -> DeviceResult<QuantumStrategy> {
    let device = Simulator::with_seed(2, seed)?;
    let player_qubit = device.try_allocate()?;
    let opponent_qubit = device.try_allocate()?;

    player_qubit.h()?;
    player_qubit.cnot(&opponent_qubit)?;

    Ok(QuantumStrategy {
        player_qubit,
        opponent_qubit,
        _device: device,
    })
}

impl Strategy for QuantumStrategy {
    fn player(&mut self, question: bool) -> DeviceResult<bool> {
        self.player_qubit.ry(PLAYER_ANGLES[usize::from(question)])?;
        self.player_qubit.measure()
    }

    fn opponent(&mut self, question: bool) -> DeviceResult<bool> {
        self.opponent_qubit.ry(OPPONENT_ANGLES[usize::from(question)])?;
        self.opponent_qubit.measure()
    }
}

/// Play one round; `true` if the players win.
pub fn referee<S: Strategy, R: Rng>(strategy: &mut S, rng: &mut R) -> DeviceResult<bool> {
    let player_question: bool = rng.r#gen();
    let opponent_question: bool = rng.r#gen();

    let parity = strategy.player(player_question)? != strategy.opponent(opponent_question)?;
    let win = parity == (player_question && opponent_question);
    debug!(player_question, opponent_question, parity, win, "chsh round");
    Ok(win)
}

/// Fraction of `rounds` won, with a fresh strategy per round.
///
/// `make_strategy` receives a seed drawn from the referee's RNG so a
/// quantum strategy's device is reproducible too.
pub fn estimate_win_probability<S, F>(make_strategy: F, rounds: usize, seed: u64) -> DeviceResult<f64>
where
    S: Strategy,
    F: FnMut(u64) -> DeviceResult<S>,
{
    estimate_win_probability_with(make_strategy, rounds, seed, |_| {})
}

/// [`estimate_win_probability`] that reports each round's outcome to
/// `on_round`, e.g. to drive a progress bar.
pub fn estimate_win_probability_with<S, F, P>(
    mut make_strategy: F,
    rounds: usize,
    seed: u64,
    mut on_round: P,
) -> DeviceResult<f64>
where
    S: Strategy,
    F: FnMut(u64) -> DeviceResult<S>,
    P: FnMut(bool),
{
    if rounds == 0 {
        return Ok(0.0);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut wins = 0usize;
    for _ in 0..rounds {
        let mut strategy = make_strategy(rng.r#gen())?;
        let win = referee(&mut strategy, &mut rng)?;
        if win {
            wins += 1;
        }
        on_round(win);
    }
    Ok(wins as f64 / rounds as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_strategy_wins_three_quarters() {
        let p = estimate_win_probability(|_| Ok(constant_strategy()), 4000, 1).unwrap();
        assert!((p - 0.75).abs() < 0.04, "constant strategy won {p}");
    }

    #[test]
    fn test_quantum_strategy_starts_as_bell_pair() {
        let mut strategy = quantum_strategy(5).unwrap();
        // Player angle for question 1 is 0, so this is a plain Z measurement.
        let a = strategy.player(true).unwrap();
        let b = strategy.opponent_qubit.measure().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_hook_sees_every_round() {
        let mut seen = 0usize;
        let mut won = 0usize;
        let p = estimate_win_probability_with(quantum_strategy, 200, 9, |win| {
            seen += 1;
            won += usize::from(win);
        })
        .unwrap();
        assert_eq!(seen, 200);
        assert!((p - won as f64 / 200.0).abs() < 1e-12);
        assert!((p - estimate_win_probability(quantum_strategy, 200, 9).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rounds() {
        assert_eq!(
            estimate_win_probability(|_| Ok(constant_strategy()), 0, 0).unwrap(),
            0.0
        );
    }
}
