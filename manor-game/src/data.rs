//! Static content tables for the manor.
//!
//! Pure data: the playable locations, the five antagonists, the findable
//! item pool, and the achievement roster. Lookups by meta or unknown ids
//! return `None`, which is what makes the corresponding intents no-ops.

use crate::state::{AchievementId, AntagonistId, ItemId, LocationId};

/// A playable location and its danger rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationData {
    pub id: LocationId,
    pub name: &'static str,
    /// 1 (calm) to 5 (lethal); sanity cost on entry is `danger * 5`.
    pub danger: u8,
    pub description: &'static str,
}

pub const LOCATIONS: [LocationData; 6] = [
    LocationData {
        id: LocationId::Corridor,
        name: "Corridors",
        danger: 2,
        description: "Dimly lit passages where footsteps echo",
    },
    LocationData {
        id: LocationId::Basement,
        name: "Basement",
        danger: 5,
        description: "The most dangerous place in the manor",
    },
    LocationData {
        id: LocationId::Library,
        name: "Library",
        danger: 1,
        description: "Ancient knowledge and clues",
    },
    LocationData {
        id: LocationId::Attic,
        name: "Attic",
        danger: 3,
        description: "Secret items are hidden up here",
    },
    LocationData {
        id: LocationId::Bedroom,
        name: "Bedrooms",
        danger: 2,
        description: "Temporary shelter from danger",
    },
    LocationData {
        id: LocationId::Kitchen,
        name: "Kitchen",
        danger: 2,
        description: "A source of survival supplies",
    },
];

/// Look up the content entry for a location.
///
/// Meta locations (`Menu`, `Ending`) have no entry, so intents that resolve
/// through this lookup silently ignore them.
#[must_use]
pub fn location_data(id: LocationId) -> Option<&'static LocationData> {
    LOCATIONS.iter().find(|location| location.id == id)
}

/// Display metadata for one antagonist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntagonistData {
    pub id: AntagonistId,
    pub name: &'static str,
    pub threat: &'static str,
}

/// Indexed by [`AntagonistId::index`].
pub const ANTAGONISTS: [AntagonistData; 5] = [
    AntagonistData {
        id: AntagonistId::Dottore,
        name: "Dottore",
        threat: "Experiments",
    },
    AntagonistData {
        id: AntagonistId::Tartaglia,
        name: "Tartaglia",
        threat: "Pursuit",
    },
    AntagonistData {
        id: AntagonistId::Venti,
        name: "Venti",
        threat: "Deception",
    },
    AntagonistData {
        id: AntagonistId::Scaramouche,
        name: "Scaramouche",
        threat: "Wrath",
    },
    AntagonistData {
        id: AntagonistId::Sandrone,
        name: "Sandrone",
        threat: "Puppets",
    },
];

#[must_use]
pub fn antagonist_data(id: AntagonistId) -> &'static AntagonistData {
    &ANTAGONISTS[id.index()]
}

/// The pool `find_item` draws from. The flashlight is the starting item and
/// is never found again.
pub const FINDABLE_ITEMS: [ItemId; 5] = [
    ItemId::OldKey,
    ItemId::Diary,
    ItemId::Candle,
    ItemId::Medicine,
    ItemId::StrangeArtifact,
];

/// Display metadata for one achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementData {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
}

/// Indexed by [`AchievementId::index`].
pub const ACHIEVEMENTS: [AchievementData; 5] = [
    AchievementData {
        id: AchievementId::Survivor,
        name: "Survivor",
        description: "Lasted three minutes",
    },
    AchievementData {
        id: AchievementId::Collector,
        name: "Collector",
        description: "Find five items",
    },
    AchievementData {
        id: AchievementId::Rulebreaker,
        name: "Rulebreaker",
        description: "Break three rules",
    },
    AchievementData {
        id: AchievementId::Explorer,
        name: "Explorer",
        description: "Visit every location",
    },
    AchievementData {
        id: AchievementId::Escaped,
        name: "Escaped",
        description: "Met Mualani",
    },
];

#[must_use]
pub fn achievement_data(id: AchievementId) -> &'static AchievementData {
    &ACHIEVEMENTS[id.index()]
}
