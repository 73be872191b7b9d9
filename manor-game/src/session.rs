//! High-level session wrapper binding the state, the entropy source, and
//! the two deferred-call slots.
//!
//! The shell drives real time: it schedules a periodic callback every
//! [`TICK_PERIOD`] with the token from [`Session::tick_token`], and a
//! one-shot callback [`HIDE_TIMEOUT`] after a successful [`Session::hide`].
//! Whenever a token goes stale (leaving the playable range, a restart, a
//! re-hide), the late callback is a no-op and the shell reschedules against
//! the current token.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Duration;

use crate::constants::{
    ANTAGONIST_ACTIVE_THRESHOLD, ANTAGONIST_SHIFT_INTERVAL_SECS, EVENT_CHANCE_THRESHOLD,
    EVENT_INTERVAL_SECS,
};
use crate::events::trigger_random_event;
use crate::rng::{pick_index, roll};
use crate::state::{AntagonistId, Difficulty, Ending, LocationId, SessionState};
use crate::timer::{TimerSlot, TimerToken};

/// The simulation advances one second per tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Real-time window after which hiding auto-clears.
pub const HIDE_TIMEOUT: Duration = Duration::from_secs(5);

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// False when the token was stale and nothing ran.
    pub advanced: bool,
    /// Whether the event generator fired this tick.
    pub event_triggered: bool,
    /// The ending resolved this tick, if any.
    pub ending: Option<Ending>,
}

impl TickOutcome {
    const fn skipped() -> Self {
        Self {
            advanced: false,
            event_triggered: false,
            ending: None,
        }
    }
}

/// One player's session: state, entropy, and pending timers.
#[derive(Debug, Clone)]
pub struct Session<R: Rng = SmallRng> {
    state: SessionState,
    rng: R,
    tick_slot: TimerSlot,
    hide_slot: TimerSlot,
}

impl Session<SmallRng> {
    /// Session with an OS-seeded entropy source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }
}

impl Default for Session<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Session<R> {
    /// Session with an injected entropy source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: SessionState::default(),
            rng,
            tick_slot: TimerSlot::default(),
            hide_slot: TimerSlot::default(),
        }
    }

    /// Read-only snapshot for rendering.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable access for shells that restore snapshots and for tests.
    pub const fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Consume the session, returning the final state.
    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Live token for the periodic tick, `Some` only while playable.
    #[must_use]
    pub fn tick_token(&self) -> Option<TimerToken> {
        self.tick_slot.token()
    }

    /// Live token for the pending hide timeout, if one is outstanding.
    #[must_use]
    pub fn hide_token(&self) -> Option<TimerToken> {
        self.hide_slot.token()
    }

    /// Begin a fresh playthrough. Outstanding timers go stale; the returned
    /// token belongs to the new tick loop.
    pub fn start_session(&mut self, difficulty: Difficulty) -> TimerToken {
        self.hide_slot.cancel();
        self.state.reset_for_session(difficulty);
        self.tick_slot.arm()
    }

    /// Advance the simulation by one second.
    ///
    /// The fixed step order: clock, event window, achievements, antagonist
    /// shift window, endings. Steps after the first observe the incremented
    /// clock of this same tick.
    pub fn tick(&mut self, token: TimerToken) -> TickOutcome {
        if !self.tick_slot.accepts(token) {
            return TickOutcome::skipped();
        }
        debug_assert!(self.state.is_playable(), "armed tick outside playable state");

        let now = self.state.time_elapsed + 1;
        self.state.time_elapsed = now;

        let mut event_triggered = false;
        if now % EVENT_INTERVAL_SECS == 0 && roll(&mut self.rng) > EVENT_CHANCE_THRESHOLD {
            trigger_random_event(&mut self.state, &mut self.rng);
            event_triggered = true;
        }

        self.state.check_achievements();

        if now % ANTAGONIST_SHIFT_INTERVAL_SECS == 0 {
            let id = AntagonistId::ALL[pick_index(&mut self.rng, AntagonistId::ALL.len())];
            let active = roll(&mut self.rng) > ANTAGONIST_ACTIVE_THRESHOLD;
            self.state.antagonist_activity.set(id, active);
        }

        let ending = self.state.check_ending();
        if ending.is_some() {
            // Loop teardown: both pending callbacks go stale.
            self.tick_slot.cancel();
            self.hide_slot.cancel();
        }

        TickOutcome {
            advanced: true,
            event_triggered,
            ending,
        }
    }

    /// Move to a location (meta/unknown ids no-op). Entering or leaving the
    /// playable range re-syncs the tick loop.
    pub fn visit_location(&mut self, id: LocationId) {
        self.state.visit_location(id, &mut self.rng);
        self.sync_tick_slot();
    }

    /// Search the current room.
    pub fn find_item(&mut self) {
        self.state.find_item(&mut self.rng);
    }

    /// Duck into cover. On success, returns the token the shell must hand
    /// back via [`Session::hide_timeout`] after [`HIDE_TIMEOUT`]. Hiding
    /// again re-arms: the earlier token goes stale instead of stacking.
    pub fn hide(&mut self) -> Option<TimerToken> {
        if self.state.hide() {
            Some(self.hide_slot.arm())
        } else {
            None
        }
    }

    /// The hide window elapsed. Stale tokens (re-hide, restart, ending) are
    /// ignored.
    pub fn hide_timeout(&mut self, token: TimerToken) {
        if self.hide_slot.accepts(token) {
            self.hide_slot.cancel();
            self.state.finish_hiding();
        }
    }

    /// Back out to the menu; the session state survives for a later return.
    pub fn exit_to_menu(&mut self) {
        self.state.exit_to_menu();
        self.sync_tick_slot();
    }

    pub fn toggle_sound(&mut self) {
        self.state.toggle_sound();
    }

    /// Keep the tick slot armed exactly while the state is playable. An
    /// already-armed loop keeps its token so the shell's periodic timer
    /// stays valid; re-entry after a pause arms a fresh one.
    fn sync_tick_slot(&mut self) {
        if self.state.is_playable() {
            if !self.tick_slot.is_armed() {
                self.tick_slot.arm();
            }
        } else {
            self.tick_slot.cancel();
        }
    }
}
