//! Manor Game Engine
//!
//! Platform-agnostic core game logic for the Manor survival horror game.
//! This crate provides all game mechanics without UI or platform-specific
//! dependencies: the session state, the one-second tick loop, the random
//! event generator, ending resolution, achievements, and the cross-session
//! aggregate recorder. A shell renders snapshots, forwards player intents,
//! and drives the two real-time timers through explicit tokens.

pub mod constants;
pub mod data;
pub mod events;
pub mod rng;
pub mod session;
pub mod state;
pub mod stats;
pub mod timer;

// Re-export commonly used types
pub use data::{
    ACHIEVEMENTS, ANTAGONISTS, AchievementData, AntagonistData, FINDABLE_ITEMS, LOCATIONS,
    LocationData, achievement_data, antagonist_data, location_data,
};
pub use events::{
    CAUGHT_SUFFIX, EVENT_CATALOG, EventDef, EventKind, GameEvent, SpecialEvent,
    trigger_random_event,
};
pub use rng::ScriptedRng;
pub use session::{HIDE_TIMEOUT, Session, TICK_PERIOD, TickOutcome};
pub use state::{
    AchievementId, AchievementSet, AntagonistActivity, AntagonistId, Difficulty, Ending,
    Inventory, ItemId, LocationId, SessionState, SoundCue,
};
pub use stats::{AggregateStats, EndingCounts, StatsPersistError};
pub use timer::{TimerSlot, TimerToken};

/// Trait for abstracting aggregate-stats persistence.
/// Platform-specific implementations should provide this.
pub trait StatsStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the persisted aggregate blob, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load_blob(&self) -> Result<Option<String>, Self::Error>;

    /// Replace the persisted aggregate blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save_blob(&self, blob: &str) -> Result<(), Self::Error>;
}

/// Engine facade binding the recorder to a persistence backend.
///
/// Loaded once at construction; every recorded session rewrites the blob.
/// An unreadable or corrupted blob is discarded in favour of the zeroed
/// default — persistence failures on load are never surfaced to the player.
pub struct GameEngine<S>
where
    S: StatsStore,
{
    store: S,
    stats: AggregateStats,
}

impl<S> GameEngine<S>
where
    S: StatsStore,
{
    /// Create an engine over the provided store, loading the persisted
    /// aggregate record (or the default when missing/corrupt/unreadable).
    pub fn new(store: S) -> Self {
        let stats = match store.load_blob() {
            Ok(blob) => AggregateStats::from_json_or_default(blob.as_deref()),
            Err(_) => AggregateStats::default(),
        };
        Self { store, stats }
    }

    /// The current aggregate record.
    #[must_use]
    pub const fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    /// Fold a finished session into the aggregates and persist them.
    ///
    /// Returns `Ok(false)` for a session that has not ended (nothing to
    /// record). The shell is responsible for calling this exactly once per
    /// ending, before the next `start_session`; the engine does not
    /// deduplicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated record cannot be encoded or written.
    pub fn record_completed_session(
        &mut self,
        state: &SessionState,
    ) -> Result<bool, StatsPersistError<S::Error>> {
        let Some(ending) = state.ending else {
            return Ok(false);
        };
        let items = u32::try_from(state.inventory.len()).unwrap_or(u32::MAX);
        self.stats
            .record_completed_session(state.time_elapsed, items, state.rules_violated, ending);
        self.persist()?;
        Ok(true)
    }

    /// Zero the aggregates and persist the empty record.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty record cannot be encoded or written.
    pub fn reset_stats(&mut self) -> Result<(), StatsPersistError<S::Error>> {
        self.stats.reset();
        self.persist()
    }

    fn persist(&self) -> Result<(), StatsPersistError<S::Error>> {
        let blob = self.stats.to_json()?;
        self.store.save_blob(&blob).map_err(StatsPersistError::Store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStore {
        blob: Rc<RefCell<Option<String>>>,
    }

    impl StatsStore for MemoryStore {
        type Error = Infallible;

        fn load_blob(&self) -> Result<Option<String>, Self::Error> {
            Ok(self.blob.borrow().clone())
        }

        fn save_blob(&self, blob: &str) -> Result<(), Self::Error> {
            *self.blob.borrow_mut() = Some(blob.to_string());
            Ok(())
        }
    }

    fn ended_state(ending: Ending) -> SessionState {
        let mut state = SessionState::default();
        state.reset_for_session(Difficulty::Normal);
        state.time_elapsed = 90;
        state.rules_violated = 2;
        state.ending = Some(ending);
        state.location = LocationId::Ending;
        state
    }

    #[test]
    fn engine_records_and_persists_round_trip() {
        let store = MemoryStore::default();
        let mut engine = GameEngine::new(store.clone());
        assert!(
            engine
                .record_completed_session(&ended_state(Ending::Caught))
                .unwrap()
        );

        let reloaded = GameEngine::new(store);
        assert_eq!(reloaded.stats().total_games, 1);
        assert_eq!(reloaded.stats().endings.count(Ending::Caught), 1);
        assert_eq!(reloaded.stats().best_survival_time, 90);
    }

    #[test]
    fn unfinished_session_is_not_recorded() {
        let mut engine = GameEngine::new(MemoryStore::default());
        let mut state = SessionState::default();
        state.reset_for_session(Difficulty::Normal);
        assert!(!engine.record_completed_session(&state).unwrap());
        assert_eq!(engine.stats().total_games, 0);
    }

    #[test]
    fn corrupted_blob_loads_as_default() {
        let store = MemoryStore::default();
        *store.blob.borrow_mut() = Some(String::from("§ not json §"));
        let engine = GameEngine::new(store);
        assert_eq!(engine.stats(), &AggregateStats::default());
    }

    #[test]
    fn reset_persists_the_empty_record() {
        let store = MemoryStore::default();
        let mut engine = GameEngine::new(store.clone());
        engine
            .record_completed_session(&ended_state(Ending::Cursed))
            .unwrap();
        engine.reset_stats().unwrap();
        let reloaded = GameEngine::new(store);
        assert_eq!(reloaded.stats(), &AggregateStats::default());
    }
}
