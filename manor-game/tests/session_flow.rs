//! End-to-end session scenarios driven through the public API.

use manor_game::{
    AchievementId, AggregateStats, Difficulty, Ending, GameEngine, ItemId, LocationId,
    ScriptedRng, Session, SessionState, StatsStore,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
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

fn scripted_session(draws: &[f64]) -> Session<ScriptedRng> {
    Session::with_rng(ScriptedRng::new(draws.iter().copied()))
}

fn assert_invariants(state: &SessionState) {
    assert!((0..=100).contains(&state.health), "health {}", state.health);
    assert!((0..=100).contains(&state.sanity), "sanity {}", state.sanity);
    assert_eq!(
        state.ending.is_some(),
        state.location == LocationId::Ending,
        "ending/location desynced: {:?} at {}",
        state.ending,
        state.location
    );
}

#[test]
fn repeated_basement_visits_end_in_insanity() {
    let mut session = scripted_session(&[]);
    session.start_session(Difficulty::Normal);

    // Danger 5 costs 25 sanity per visit; four visits drain it fully.
    for visit in 1..=4 {
        session.visit_location(LocationId::Basement);
        assert_eq!(session.state().sanity, 100 - visit * 25);
        assert_invariants(session.state());
    }
    assert_eq!(session.state().sanity, 0);
    assert_eq!(session.state().ending, None, "intents never resolve endings");

    let token = session.tick_token().expect("still playable");
    let outcome = session.tick(token);
    assert_eq!(outcome.ending, Some(Ending::Insanity));
    assert_eq!(session.state().location, LocationId::Ending);
    assert_invariants(session.state());
}

#[test]
fn full_quiet_run_ends_in_exhaustion() {
    let mut session = scripted_session(&[]);
    let token = session.start_session(Difficulty::Normal);

    let mut ticks = 0;
    while session.state().ending.is_none() {
        let outcome = session.tick(token);
        assert!(outcome.advanced);
        assert!(!outcome.event_triggered, "scripted zeros never pass 0.5");
        assert_invariants(session.state());
        ticks += 1;
        assert!(ticks <= 300, "run failed to terminate");
    }

    assert_eq!(ticks, 300);
    assert_eq!(session.state().time_elapsed, 300);
    assert_eq!(session.state().ending, Some(Ending::Exhaustion));
    // Vitals were never touched along the way.
    assert_eq!(session.state().health, 100);
    assert!(
        session
            .state()
            .achievements
            .is_unlocked(AchievementId::Survivor)
    );
}

#[test]
fn forced_medicine_find_heals_and_counts() {
    let mut session = scripted_session(&[0.7, 0.3]);
    session.start_session(Difficulty::Normal);
    session.state_mut().health = 60;

    session.find_item();

    let state = session.state();
    assert_eq!(state.health, 75);
    assert_eq!(
        state.inventory.as_slice(),
        &[ItemId::Flashlight, ItemId::Medicine]
    );
    assert_eq!(state.discovered_clues, 1);
    assert_invariants(state);
}

#[test]
fn five_traps_curse_the_session() {
    // Each find_item consumes an item pick and a trap draw above 0.7.
    let draws: Vec<f64> = (0..5).flat_map(|_| [0.1, 0.9]).collect();
    let mut session = scripted_session(&draws);
    session.start_session(Difficulty::Normal);

    for _ in 0..5 {
        session.find_item();
        assert_invariants(session.state());
    }
    assert_eq!(session.state().rules_violated, 5);
    assert_eq!(session.state().health, 50);
    assert_eq!(session.state().sanity, 50);
    assert!(
        session
            .state()
            .achievements
            .is_unlocked(AchievementId::Rulebreaker)
    );
    assert_eq!(session.state().ending, None);

    let token = session.tick_token().unwrap();
    assert_eq!(session.tick(token).ending, Some(Ending::Cursed));
    assert_invariants(session.state());
}

#[test]
fn hide_window_reverts_on_timeout_only() {
    let mut session = scripted_session(&[]);
    session.start_session(Difficulty::Normal);

    let token = session.hide().expect("hide applies while playable");
    assert!(session.state().is_hiding);
    assert_eq!(session.state().sanity, 95);

    // Game ticks pass; the hide window is wall-clock, not simulated time.
    let tick = session.tick_token().unwrap();
    for _ in 0..3 {
        session.tick(tick);
    }
    assert!(session.state().is_hiding);

    let before = session.state().clone();
    session.hide_timeout(token);
    assert!(!session.state().is_hiding);
    assert!(session.state().current_event.is_none());
    assert_eq!(session.state().sanity, before.sanity);
    assert_eq!(session.state().health, before.health);
    assert_eq!(session.state().time_elapsed, before.time_elapsed);
}

#[test]
fn double_recording_double_counts_by_contract() {
    // The "exactly once" rule is the shell's responsibility; the engine
    // deliberately does not deduplicate.
    let mut engine = GameEngine::new(MemoryStore::default());

    let mut session = scripted_session(&[]);
    session.start_session(Difficulty::Normal);
    session.state_mut().health = 0;
    let token = session.tick_token().unwrap();
    let outcome = session.tick(token);
    assert_eq!(outcome.ending, Some(Ending::Caught));

    engine.record_completed_session(session.state()).unwrap();
    engine.record_completed_session(session.state()).unwrap();

    assert_eq!(engine.stats().total_games, 2);
    assert_eq!(engine.stats().endings.count(Ending::Caught), 2);
}

#[test]
fn achievements_survive_a_restart() {
    let mut session = scripted_session(&[]);
    session.start_session(Difficulty::Normal);
    session.state_mut().rules_violated = 3;
    session.state_mut().check_achievements();
    assert!(
        session
            .state()
            .achievements
            .is_unlocked(AchievementId::Rulebreaker)
    );

    session.start_session(Difficulty::Easy);
    assert_eq!(session.state().rules_violated, 0);
    assert!(
        session
            .state()
            .achievements
            .is_unlocked(AchievementId::Rulebreaker),
        "latches survive the session reset"
    );
}

#[test]
fn seeded_run_holds_invariants_to_completion() {
    let mut session = Session::with_rng(SmallRng::seed_from_u64(0x4D414E4F52));
    let mut token = session.start_session(Difficulty::Nightmare);

    let mut guard = 0;
    loop {
        // Poke intents along the way like a restless player would.
        match session.state().time_elapsed % 40 {
            7 => session.visit_location(LocationId::Library),
            13 => session.find_item(),
            21 => {
                let _ = session.hide();
            }
            _ => {}
        }
        assert_invariants(session.state());

        let Some(live) = session.tick_token() else {
            break;
        };
        token = live;
        session.tick(token);
        assert_invariants(session.state());

        guard += 1;
        assert!(guard <= 400, "session failed to reach an ending");
    }

    let state = session.state().clone();
    assert!(state.ending.is_some());
    assert_eq!(state.location, LocationId::Ending);
    assert!(!session.tick(token).advanced, "ended sessions never tick");

    // The final snapshot feeds the recorder cleanly.
    let mut engine = GameEngine::new(MemoryStore::default());
    assert!(engine.record_completed_session(&state).unwrap());
    assert_eq!(engine.stats().total_games, 1);
    assert_eq!(
        engine.stats().endings.count(state.ending.unwrap()),
        1,
        "the reached ending is the one counted"
    );
}

#[test]
fn recorder_blob_survives_process_restarts() {
    let store = MemoryStore::default();
    {
        let mut engine = GameEngine::new(store.clone());
        let mut session = scripted_session(&[]);
        session.start_session(Difficulty::Normal);
        session.state_mut().time_elapsed = 299;
        let token = session.tick_token().unwrap();
        assert_eq!(session.tick(token).ending, Some(Ending::Exhaustion));
        engine.record_completed_session(session.state()).unwrap();
    }

    // A new engine over the same store sees the persisted aggregates.
    let engine = GameEngine::new(store);
    assert_eq!(engine.stats().total_games, 1);
    assert_eq!(engine.stats().best_survival_time, 300);
    assert_ne!(engine.stats(), &AggregateStats::default());
}
