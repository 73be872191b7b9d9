//! The random narrative-event catalog and its resolution rules.
//!
//! One event is drawn uniformly from a fixed catalog of eleven entries.
//! Resolution applies the first matching rule: help heals, the two special
//! entries rewire antagonists or steal time, an event bound to an active
//! antagonist stings harder and may escalate into being caught, and
//! everything else just costs sanity by severity.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ACTIVE_ANTAGONIST_SANITY_BONUS, CAUGHT_HEALTH_PENALTY, CAUGHT_THRESHOLD,
    DANGER_SANITY_PENALTY, DISTRACTION_FLAG_THRESHOLD, DISTRACTION_SANITY_PENALTY,
    HELP_HEALTH_RESTORE, HELP_SANITY_RESTORE, INFO_SANITY_PENALTY, LOG_EVENT_CAUGHT,
    LOG_EVENT_PREFIX, TIME_THEFT_JUMP_SECS, TIME_THEFT_SANITY_PENALTY, WARNING_SANITY_PENALTY,
};
use crate::rng::{pick_index, roll};
use crate::state::{AchievementId, AntagonistId, SessionState, SoundCue};

/// Severity tier of a narrative event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Danger,
    Warning,
    Info,
    Help,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Help => "help",
        }
    }

    /// Base sanity cost before difficulty scaling. Help events never charge.
    const fn base_sanity_penalty(self) -> f64 {
        match self {
            Self::Danger => DANGER_SANITY_PENALTY,
            Self::Warning => WARNING_SANITY_PENALTY,
            Self::Info | Self::Help => INFO_SANITY_PENALTY,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The narrative event surfaced to the player. Replaces any previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub message: String,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antagonist: Option<AntagonistId>,
}

/// Marker for the two catalog entries with bespoke resolution rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialEvent {
    /// Re-rolls every antagonist's activity flag upward.
    LoudDistraction,
    /// Steals ten seconds on top of the sanity cost.
    TimeTheft,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDef {
    pub message: &'static str,
    pub kind: EventKind,
    pub antagonist: Option<AntagonistId>,
    pub special: Option<SpecialEvent>,
}

impl EventDef {
    const fn plain(message: &'static str, kind: EventKind) -> Self {
        Self {
            message,
            kind,
            antagonist: None,
            special: None,
        }
    }

    const fn bound(message: &'static str, kind: EventKind, antagonist: AntagonistId) -> Self {
        Self {
            message,
            kind,
            antagonist: Some(antagonist),
            special: None,
        }
    }

    const fn special(message: &'static str, kind: EventKind, special: SpecialEvent) -> Self {
        Self {
            message,
            kind,
            antagonist: None,
            special: Some(special),
        }
    }
}

/// Appended to the message when an escalation catches the player.
pub const CAUGHT_SUFFIX: &str = " YOU HAVE BEEN SPOTTED!";

pub const EVENT_CATALOG: [EventDef; 11] = [
    EventDef::plain("You hear footsteps outside the door...", EventKind::Warning),
    EventDef::plain("The lights begin to flicker", EventKind::Danger),
    EventDef::plain("The silence is becoming unbearable", EventKind::Info),
    EventDef::bound(
        "Dottore is close. You can smell the chemicals.",
        EventKind::Danger,
        AntagonistId::Dottore,
    ),
    EventDef::bound(
        "Tartaglia is hunting. You hear the clatter of weapons.",
        EventKind::Danger,
        AntagonistId::Tartaglia,
    ),
    EventDef::bound(
        "Venti is mocking you from somewhere nearby",
        EventKind::Warning,
        AntagonistId::Venti,
    ),
    EventDef::bound(
        "Scaramouche is furious. The air is charged with static.",
        EventKind::Danger,
        AntagonistId::Scaramouche,
    ),
    EventDef::bound(
        "Sandrone's puppets are moving through the corridors",
        EventKind::Danger,
        AntagonistId::Sandrone,
    ),
    EventDef::plain(
        "Mualani has appeared! She brought medicine and calmed you down.",
        EventKind::Help,
    ),
    EventDef::special(
        "Barbara is singing at the top of her voice, drawing the antagonists' attention!",
        EventKind::Danger,
        SpecialEvent::LoudDistraction,
    ),
    EventDef::special(
        "Aether pranked you and locked the door. You are losing time...",
        EventKind::Warning,
        SpecialEvent::TimeTheft,
    ),
];

/// The state is integral; fractional penalties round at the point of
/// application.
#[allow(clippy::cast_possible_truncation)]
fn rounded(amount: f64) -> i32 {
    amount.round() as i32
}

fn scaled(amount: f64, multiplier: f64) -> i32 {
    rounded(amount * multiplier)
}

/// Draw one event from the catalog and resolve it against the state.
///
/// `current_event` is always replaced with the resolved event, including a
/// possibly suffixed message when an escalation fires.
pub fn trigger_random_event<R: Rng + ?Sized>(state: &mut SessionState, rng: &mut R) {
    let def = &EVENT_CATALOG[pick_index(rng, EVENT_CATALOG.len())];
    let multiplier = state.difficulty.multiplier();
    state
        .logs
        .push(format!("{LOG_EVENT_PREFIX}{}", def.kind.as_str()));

    if def.kind == EventKind::Help {
        state.apply_health_delta(HELP_HEALTH_RESTORE);
        state.apply_sanity_delta(HELP_SANITY_RESTORE);
        state.achievements.unlock(AchievementId::Escaped);
        state.play_sound(SoundCue::Whisper);
        state.current_event = Some(event_from(def));
        return;
    }

    match def.special {
        Some(SpecialEvent::LoudDistraction) => {
            for id in AntagonistId::ALL {
                if roll(rng) > DISTRACTION_FLAG_THRESHOLD {
                    state.antagonist_activity.set(id, true);
                }
            }
            state.apply_sanity_delta(-scaled(DISTRACTION_SANITY_PENALTY, multiplier));
            state.play_sound(SoundCue::Whisper);
            state.current_event = Some(event_from(def));
            return;
        }
        Some(SpecialEvent::TimeTheft) => {
            state.apply_sanity_delta(-scaled(TIME_THEFT_SANITY_PENALTY, multiplier));
            state.time_elapsed += TIME_THEFT_JUMP_SECS;
            state.play_sound(SoundCue::Door);
            state.current_event = Some(event_from(def));
            return;
        }
        None => {}
    }

    let mut penalty = def.kind.base_sanity_penalty() * multiplier;
    if let Some(antagonist) = def.antagonist {
        if state.antagonist_activity.is_active(antagonist) {
            penalty += ACTIVE_ANTAGONIST_SANITY_BONUS * multiplier;
            if roll(rng) > CAUGHT_THRESHOLD && !state.is_hiding {
                state.apply_health_delta(-scaled(CAUGHT_HEALTH_PENALTY, multiplier));
                state.apply_sanity_delta(-rounded(penalty));
                state.rules_violated += 1;
                state.play_sound(SoundCue::Scream);
                state.current_event = Some(GameEvent {
                    message: format!("{}{CAUGHT_SUFFIX}", def.message),
                    kind: def.kind,
                    antagonist: def.antagonist,
                });
                state.logs.push(String::from(LOG_EVENT_CAUGHT));
                return;
            }
        }
    }

    state.apply_sanity_delta(-rounded(penalty));
    match def.kind {
        EventKind::Danger => state.play_sound(SoundCue::Heartbeat),
        EventKind::Warning => state.play_sound(SoundCue::Footsteps),
        EventKind::Info | EventKind::Help => {}
    }
    state.current_event = Some(event_from(def));
}

fn event_from(def: &EventDef) -> GameEvent {
    GameEvent {
        message: def.message.to_string(),
        kind: def.kind,
        antagonist: def.antagonist,
    }
}
