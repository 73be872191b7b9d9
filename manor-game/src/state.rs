//! Session state and the intent handlers that mutate it.
//!
//! One playthrough owns exactly one [`SessionState`]. Every mutation clamps
//! the vitals back into range, endings are resolved only by the tick loop,
//! and achievement latches never revert once set.

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    AMBUSH_HEALTH_PENALTY, AMBUSH_THRESHOLD, COLLECTOR_ITEM_COUNT, HEALTH_MAX, HIDE_SANITY_COST,
    LOCATION_DANGER_SANITY_STEP, LOG_AMBUSH, LOG_BOOTING, LOG_ENDING_PREFIX, LOG_EXIT_MENU,
    LOG_HIDE_END, LOG_HIDE_START, LOG_ITEM_FOUND, LOG_ITEM_TRAP, LOG_SESSION_START,
    MEDICINE_HEALTH_RESTORE, RULEBREAKER_VIOLATIONS, RULE_VIOLATION_LIMIT, SACRIFICE_CLUE_COUNT,
    SACRIFICE_HEALTH_CEILING, SANITY_MAX, SESSION_TIME_LIMIT_SECS, SURVIVOR_TIME_SECS,
    TRAP_HEALTH_PENALTY, TRAP_SANITY_PENALTY, TRAP_THRESHOLD,
};
use crate::data::{FINDABLE_ITEMS, antagonist_data, location_data};
use crate::events::{EventKind, GameEvent};
use crate::rng::{pick_index, roll};

/// Where the player currently is. `Menu` and `Ending` are meta-locations
/// with no content-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationId {
    #[default]
    Menu,
    Corridor,
    Basement,
    Library,
    Attic,
    Bedroom,
    Kitchen,
    Ending,
}

impl LocationId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Corridor => "corridor",
            Self::Basement => "basement",
            Self::Library => "library",
            Self::Attic => "attic",
            Self::Bedroom => "bedroom",
            Self::Kitchen => "kitchen",
            Self::Ending => "ending",
        }
    }

    /// True for the six explorable rooms; the tick loop only runs here.
    #[must_use]
    pub const fn is_playable(self) -> bool {
        !matches!(self, Self::Menu | Self::Ending)
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu" => Ok(Self::Menu),
            "corridor" => Ok(Self::Corridor),
            "basement" => Ok(Self::Basement),
            "library" => Ok(Self::Library),
            "attic" => Ok(Self::Attic),
            "bedroom" => Ok(Self::Bedroom),
            "kitchen" => Ok(Self::Kitchen),
            "ending" => Ok(Self::Ending),
            _ => Err(()),
        }
    }
}

/// The five hunters stalking the manor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntagonistId {
    Dottore,
    Tartaglia,
    Venti,
    Scaramouche,
    Sandrone,
}

impl AntagonistId {
    pub const ALL: [Self; 5] = [
        Self::Dottore,
        Self::Tartaglia,
        Self::Venti,
        Self::Scaramouche,
        Self::Sandrone,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Dottore => 0,
            Self::Tartaglia => 1,
            Self::Venti => 2,
            Self::Scaramouche => 3,
            Self::Sandrone => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dottore => "dottore",
            Self::Tartaglia => "tartaglia",
            Self::Venti => "venti",
            Self::Scaramouche => "scaramouche",
            Self::Sandrone => "sandrone",
        }
    }
}

impl fmt::Display for AntagonistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-wide damage scaling, fixed at `start_session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Nightmare,
}

impl Difficulty {
    /// Scalar applied to most damage and sanity-loss calculations.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Easy => 0.5,
            Self::Normal => 1.0,
            Self::Nightmare => 2.0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Nightmare => "nightmare",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "nightmare" => Ok(Self::Nightmare),
            _ => Err(()),
        }
    }
}

/// Terminal outcome of a session. Once set, the session is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ending {
    Insanity,
    Caught,
    Exhaustion,
    Cursed,
    Sacrifice,
}

impl Ending {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insanity => "insanity",
            Self::Caught => "caught",
            Self::Exhaustion => "exhaustion",
            Self::Cursed => "cursed",
            Self::Sacrifice => "sacrifice",
        }
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Items the player can carry. Duplicates are allowed in the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    Flashlight,
    OldKey,
    Diary,
    Candle,
    Medicine,
    StrangeArtifact,
}

impl ItemId {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flashlight => "Flashlight",
            Self::OldKey => "Old key",
            Self::Diary => "Diary",
            Self::Candle => "Candle",
            Self::Medicine => "Medicine",
            Self::StrangeArtifact => "Strange artifact",
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementId {
    Survivor,
    Collector,
    Rulebreaker,
    Explorer,
    Escaped,
}

impl AchievementId {
    pub const ALL: [Self; 5] = [
        Self::Survivor,
        Self::Collector,
        Self::Rulebreaker,
        Self::Explorer,
        Self::Escaped,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Survivor => 0,
            Self::Collector => 1,
            Self::Rulebreaker => 2,
            Self::Explorer => 3,
            Self::Escaped => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Survivor => "survivor",
            Self::Collector => "collector",
            Self::Rulebreaker => "rulebreaker",
            Self::Explorer => "explorer",
            Self::Escaped => "escaped",
        }
    }
}

/// Audio hint emitted by the engine; playback is a presentation concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Footsteps,
    Heartbeat,
    Whisper,
    Door,
    Scream,
}

/// Per-antagonist "active right now" flags. Always exactly five entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AntagonistActivity {
    #[serde(default)]
    pub dottore: bool,
    #[serde(default)]
    pub tartaglia: bool,
    #[serde(default)]
    pub venti: bool,
    #[serde(default)]
    pub scaramouche: bool,
    #[serde(default)]
    pub sandrone: bool,
}

impl AntagonistActivity {
    #[must_use]
    pub const fn is_active(&self, id: AntagonistId) -> bool {
        match id {
            AntagonistId::Dottore => self.dottore,
            AntagonistId::Tartaglia => self.tartaglia,
            AntagonistId::Venti => self.venti,
            AntagonistId::Scaramouche => self.scaramouche,
            AntagonistId::Sandrone => self.sandrone,
        }
    }

    pub const fn set(&mut self, id: AntagonistId, active: bool) {
        match id {
            AntagonistId::Dottore => self.dottore = active,
            AntagonistId::Tartaglia => self.tartaglia = active,
            AntagonistId::Venti => self.venti = active,
            AntagonistId::Scaramouche => self.scaramouche = active,
            AntagonistId::Sandrone => self.sandrone = active,
        }
    }

    /// Ids whose flag is currently set, in canonical order.
    #[must_use]
    pub fn active_ids(&self) -> SmallVec<[AntagonistId; 5]> {
        AntagonistId::ALL
            .into_iter()
            .filter(|id| self.is_active(*id))
            .collect()
    }

    #[must_use]
    pub fn any_active(&self) -> bool {
        AntagonistId::ALL.into_iter().any(|id| self.is_active(id))
    }
}

/// One-way unlock latches, one per achievement. Latches survive
/// `start_session`; only a fresh [`SessionState`] starts fully locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AchievementSet {
    #[serde(default)]
    pub survivor: bool,
    #[serde(default)]
    pub collector: bool,
    #[serde(default)]
    pub rulebreaker: bool,
    #[serde(default)]
    pub explorer: bool,
    #[serde(default)]
    pub escaped: bool,
}

impl AchievementSet {
    #[must_use]
    pub const fn is_unlocked(&self, id: AchievementId) -> bool {
        match id {
            AchievementId::Survivor => self.survivor,
            AchievementId::Collector => self.collector,
            AchievementId::Rulebreaker => self.rulebreaker,
            AchievementId::Explorer => self.explorer,
            AchievementId::Escaped => self.escaped,
        }
    }

    /// Latch `id` on. There is deliberately no way to latch one off.
    pub const fn unlock(&mut self, id: AchievementId) {
        match id {
            AchievementId::Survivor => self.survivor = true,
            AchievementId::Collector => self.collector = true,
            AchievementId::Rulebreaker => self.rulebreaker = true,
            AchievementId::Explorer => self.explorer = true,
            AchievementId::Escaped => self.escaped = true,
        }
    }

    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        AchievementId::ALL
            .into_iter()
            .filter(|id| self.is_unlocked(*id))
            .count()
    }
}

/// Discovery-ordered item labels; duplicates allowed.
pub type Inventory = SmallVec<[ItemId; 8]>;

/// The single mutable aggregate for one playthrough.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub location: LocationId,
    pub health: i32,
    pub sanity: i32,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub rules_violated: u32,
    #[serde(default)]
    pub discovered_clues: u32,
    #[serde(default)]
    pub antagonist_activity: AntagonistActivity,
    #[serde(default)]
    pub time_elapsed: u32,
    #[serde(default)]
    pub current_event: Option<GameEvent>,
    #[serde(default)]
    pub ending: Option<Ending>,
    #[serde(default)]
    pub is_hiding: bool,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub achievements: AchievementSet,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    /// Most recent audio hint; replaced, never queued.
    #[serde(default)]
    pub last_sound: Option<SoundCue>,
    pub logs: Vec<String>,
}

const fn default_sound_enabled() -> bool {
    true
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            location: LocationId::Menu,
            health: HEALTH_MAX,
            sanity: SANITY_MAX,
            inventory: Inventory::new(),
            rules_violated: 0,
            discovered_clues: 0,
            antagonist_activity: AntagonistActivity::default(),
            time_elapsed: 0,
            current_event: None,
            ending: None,
            is_hiding: false,
            difficulty: Difficulty::default(),
            achievements: AchievementSet::default(),
            sound_enabled: default_sound_enabled(),
            last_sound: None,
            logs: vec![String::from(LOG_BOOTING)],
        }
    }
}

impl SessionState {
    /// Whether the tick loop should be running.
    #[must_use]
    pub const fn is_playable(&self) -> bool {
        self.location.is_playable()
    }

    /// Reset for a new playthrough. Achievements and the sound toggle are
    /// the only survivors of the reset.
    pub fn reset_for_session(&mut self, difficulty: Difficulty) {
        let achievements = self.achievements;
        let sound_enabled = self.sound_enabled;
        *self = Self {
            location: LocationId::Corridor,
            inventory: Inventory::from_slice(&[ItemId::Flashlight]),
            difficulty,
            achievements,
            sound_enabled,
            logs: vec![format!("{LOG_SESSION_START}.{}", difficulty.as_str())],
            ..Self::default()
        };
    }

    pub(crate) fn apply_health_delta(&mut self, delta: i32) {
        self.health = (self.health + delta).clamp(0, HEALTH_MAX);
    }

    pub(crate) fn apply_sanity_delta(&mut self, delta: i32) {
        self.sanity = (self.sanity + delta).clamp(0, SANITY_MAX);
    }

    /// Record an audio hint; muted sessions record nothing.
    pub(crate) fn play_sound(&mut self, cue: SoundCue) {
        if self.sound_enabled {
            self.last_sound = Some(cue);
        }
    }

    /// Idempotent ending latch: an existing ending is never overwritten,
    /// and setting one moves the player to the ending screen.
    pub(crate) fn set_ending(&mut self, ending: Ending) {
        if self.ending.is_none() {
            self.ending = Some(ending);
            self.location = LocationId::Ending;
            self.logs
                .push(format!("{LOG_ENDING_PREFIX}{}", ending.as_str()));
        }
    }

    /// Evaluate the terminal predicates in strict priority order.
    ///
    /// Returns the ending set by this call, `None` when the session
    /// continues or had already ended.
    pub fn check_ending(&mut self) -> Option<Ending> {
        if self.ending.is_some() {
            return None;
        }
        let ending = if self.health <= 0 {
            Ending::Caught
        } else if self.sanity <= 0 {
            Ending::Insanity
        } else if self.time_elapsed >= SESSION_TIME_LIMIT_SECS {
            Ending::Exhaustion
        } else if self.rules_violated >= RULE_VIOLATION_LIMIT {
            Ending::Cursed
        } else if self.discovered_clues >= SACRIFICE_CLUE_COUNT
            && self.health < SACRIFICE_HEALTH_CEILING
        {
            Ending::Sacrifice
        } else {
            return None;
        };
        self.set_ending(ending);
        Some(ending)
    }

    /// Latch every achievement whose predicate holds.
    ///
    /// `Escaped` unlocks only as a side effect of the help event, and
    /// `Explorer` is defined in the roster without an unlock rule in the
    /// shipped content.
    pub fn check_achievements(&mut self) {
        if self.time_elapsed >= SURVIVOR_TIME_SECS {
            self.achievements.unlock(AchievementId::Survivor);
        }
        if self.inventory.len() >= COLLECTOR_ITEM_COUNT {
            self.achievements.unlock(AchievementId::Collector);
        }
        if self.rules_violated >= RULEBREAKER_VIOLATIONS {
            self.achievements.unlock(AchievementId::Rulebreaker);
        }
    }

    /// Move to a location. Meta and unknown ids are silent no-ops.
    ///
    /// Entering costs `danger * 5` sanity. If any antagonist is active, one
    /// ambush draw above 0.6 triggers an encounter: a flat 15 health hit
    /// (deliberately not difficulty-scaled), one rule violation, and a
    /// danger event naming the attacker.
    pub fn visit_location<R: Rng + ?Sized>(&mut self, id: LocationId, rng: &mut R) {
        if self.ending.is_some() {
            return;
        }
        let Some(location) = location_data(id) else {
            return;
        };

        self.apply_sanity_delta(-(i32::from(location.danger) * LOCATION_DANGER_SANITY_STEP));
        self.location = id;

        let active = self.antagonist_activity.active_ids();
        if !active.is_empty() && roll(rng) > AMBUSH_THRESHOLD {
            let attacker = active[pick_index(rng, active.len())];
            self.apply_health_delta(-AMBUSH_HEALTH_PENALTY);
            self.rules_violated += 1;
            self.current_event = Some(GameEvent {
                message: format!(
                    "You ran straight into {} at the entrance!",
                    antagonist_data(attacker).name
                ),
                kind: EventKind::Danger,
                antagonist: Some(attacker),
            });
            self.logs
                .push(format!("{LOG_AMBUSH}.{}", attacker.as_str()));
        } else {
            self.current_event = None;
        }
        self.is_hiding = false;
        self.check_achievements();
    }

    /// Search the current room. Roughly one search in three is a trap.
    pub fn find_item<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.is_playable() {
            return;
        }
        let item = FINDABLE_ITEMS[pick_index(rng, FINDABLE_ITEMS.len())];
        if roll(rng) > TRAP_THRESHOLD {
            self.apply_health_delta(-TRAP_HEALTH_PENALTY);
            self.apply_sanity_delta(-TRAP_SANITY_PENALTY);
            self.rules_violated += 1;
            self.current_event = Some(GameEvent {
                message: String::from("It was a trap! You have drawn attention."),
                kind: EventKind::Danger,
                antagonist: None,
            });
            self.logs.push(String::from(LOG_ITEM_TRAP));
        } else {
            self.inventory.push(item);
            self.discovered_clues += 1;
            if item == ItemId::Medicine {
                self.apply_health_delta(MEDICINE_HEALTH_RESTORE);
            }
            self.current_event = Some(GameEvent {
                message: format!("Found: {}", item.name()),
                kind: EventKind::Info,
                antagonist: None,
            });
            self.logs.push(String::from(LOG_ITEM_FOUND));
        }
        self.check_achievements();
    }

    /// Duck into cover. Returns whether the intent applied, so the caller
    /// can arm the hide timeout.
    pub fn hide(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        self.is_hiding = true;
        self.apply_sanity_delta(-HIDE_SANITY_COST);
        self.current_event = Some(GameEvent {
            message: String::from("You are hiding in the darkness..."),
            kind: EventKind::Info,
            antagonist: None,
        });
        self.logs.push(String::from(LOG_HIDE_START));
        true
    }

    /// The hide timeout fired: come out of cover, clear the hint.
    pub(crate) fn finish_hiding(&mut self) {
        self.is_hiding = false;
        self.current_event = None;
        self.logs.push(String::from(LOG_HIDE_END));
    }

    /// Back out to the menu without resetting. Counters, inventory and
    /// vitals survive; only an ending or a restart truly resets.
    pub fn exit_to_menu(&mut self) {
        if self.ending.is_some() {
            return;
        }
        self.location = LocationId::Menu;
        self.logs.push(String::from(LOG_EXIT_MENU));
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }
}
