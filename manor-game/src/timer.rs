//! Cancellable deferred-call slots.
//!
//! The engine never owns wall-clock time: the shell schedules the periodic
//! tick and the hide timeout, and calls back with the token it was handed.
//! A slot invalidates outstanding tokens by bumping its generation, so a
//! callback that fires after cancellation or re-arming is a structural no-op
//! rather than a race.

use serde::{Deserialize, Serialize};

/// Proof that a scheduled callback belongs to the current arming of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

/// One deferred-call slot: at most one pending callback at a time.
///
/// Re-arming supersedes the previous timer (its token goes stale) instead of
/// stacking a second callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSlot {
    generation: u64,
    armed: bool,
}

impl TimerSlot {
    /// Arm the slot, invalidating any previously issued token.
    pub fn arm(&mut self) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        TimerToken(self.generation)
    }

    /// Disarm without issuing a new token. Pending callbacks go stale.
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    /// Whether `token` is the live token of the current arming.
    #[must_use]
    pub fn accepts(&self, token: TimerToken) -> bool {
        self.armed && token.0 == self.generation
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// The live token, if the slot is armed.
    #[must_use]
    pub fn token(&self) -> Option<TimerToken> {
        if self.armed {
            Some(TimerToken(self.generation))
        } else {
            None
        }
    }
}
