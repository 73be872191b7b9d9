//! The single entropy funnel for the engine.
//!
//! Every probabilistic branch in the simulation is expressed as a comparison
//! against one fresh unit-interval draw, and every uniform pick is the same
//! draw scaled by the pool size. Routing all of it through these two helpers
//! keeps the draw sequence scriptable in tests.

use rand::{Rng, RngCore};
use std::collections::VecDeque;

/// One uniform draw in `[0, 1)`.
pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// Uniform index into a pool of `len` candidates.
///
/// `len` must be non-zero; the result is always `< len`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0, "pick_index on an empty pool");
    let scaled = roll(rng) * len as f64;
    (scaled as usize).min(len.saturating_sub(1))
}

/// `f64` draws carry 53 bits taken from the top of `next_u64`.
const DRAW_SCALE: f64 = (1u64 << 53) as f64;

/// Deterministic source replaying a scripted sequence of unit-interval draws.
///
/// Intended for tests: each `roll` consumes one scripted value, and an
/// exhausted script yields `0.0` so trailing quiet ticks stay quiet.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    words: VecDeque<u64>,
}

impl ScriptedRng {
    #[must_use]
    pub fn new<I>(draws: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            words: draws.into_iter().map(Self::encode).collect(),
        }
    }

    /// Number of scripted draws not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.words.len()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn encode(draw: f64) -> u64 {
        let clamped = draw.clamp(0.0, 1.0 - f64::EPSILON);
        ((clamped * DRAW_SCALE) as u64) << 11
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        {
            (self.next_u64() >> 32) as u32
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.words.pop_front().unwrap_or(0)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_draws_come_back_in_order() {
        let mut rng = ScriptedRng::new([0.0, 0.25, 0.5, 0.75, 0.99]);
        for expected in [0.0, 0.25, 0.5, 0.75, 0.99] {
            let draw = roll(&mut rng);
            assert!(
                (draw - expected).abs() < 1e-9,
                "scripted draw drifted: wanted {expected}, got {draw}"
            );
        }
    }

    #[test]
    fn exhausted_script_yields_zero() {
        let mut rng = ScriptedRng::new([0.9]);
        let _ = roll(&mut rng);
        assert_eq!(rng.remaining(), 0);
        assert!(roll(&mut rng) < f64::EPSILON);
    }

    #[test]
    fn pick_index_scales_the_draw() {
        let mut rng = ScriptedRng::new([0.0, 0.3, 0.75, 0.95]);
        assert_eq!(pick_index(&mut rng, 11), 0);
        assert_eq!(pick_index(&mut rng, 11), 3);
        assert_eq!(pick_index(&mut rng, 11), 8);
        assert_eq!(pick_index(&mut rng, 11), 10);
    }

    #[test]
    fn pick_index_never_reaches_len() {
        let mut rng = ScriptedRng::new([0.999_999]);
        assert_eq!(pick_index(&mut rng, 5), 4);
    }
}
