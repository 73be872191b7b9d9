//! Centralized balance and tuning constants for the manor engine.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! assets.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_BOOTING: &str = "log.booting";
pub(crate) const LOG_SESSION_START: &str = "log.session.start";
pub(crate) const LOG_EVENT_PREFIX: &str = "log.event.";
pub(crate) const LOG_EVENT_CAUGHT: &str = "log.event.caught";
pub(crate) const LOG_AMBUSH: &str = "log.ambush";
pub(crate) const LOG_ITEM_FOUND: &str = "log.item.found";
pub(crate) const LOG_ITEM_TRAP: &str = "log.item.trap";
pub(crate) const LOG_HIDE_START: &str = "log.hide.start";
pub(crate) const LOG_HIDE_END: &str = "log.hide.end";
pub(crate) const LOG_EXIT_MENU: &str = "log.exit-menu";
pub(crate) const LOG_ENDING_PREFIX: &str = "log.ending.";

// Vitals -------------------------------------------------------------------
pub(crate) const HEALTH_MAX: i32 = 100;
pub(crate) const SANITY_MAX: i32 = 100;

// Tick loop ----------------------------------------------------------------
pub(crate) const EVENT_INTERVAL_SECS: u32 = 15;
pub(crate) const EVENT_CHANCE_THRESHOLD: f64 = 0.5;
pub(crate) const ANTAGONIST_SHIFT_INTERVAL_SECS: u32 = 10;
pub(crate) const ANTAGONIST_ACTIVE_THRESHOLD: f64 = 0.6;

// Random events ------------------------------------------------------------
pub(crate) const DANGER_SANITY_PENALTY: f64 = 10.0;
pub(crate) const WARNING_SANITY_PENALTY: f64 = 5.0;
pub(crate) const INFO_SANITY_PENALTY: f64 = 2.0;
pub(crate) const HELP_HEALTH_RESTORE: i32 = 20;
pub(crate) const HELP_SANITY_RESTORE: i32 = 15;
pub(crate) const DISTRACTION_FLAG_THRESHOLD: f64 = 0.5;
pub(crate) const DISTRACTION_SANITY_PENALTY: f64 = 15.0;
pub(crate) const TIME_THEFT_SANITY_PENALTY: f64 = 10.0;
pub(crate) const TIME_THEFT_JUMP_SECS: u32 = 10;
pub(crate) const ACTIVE_ANTAGONIST_SANITY_BONUS: f64 = 15.0;
pub(crate) const CAUGHT_THRESHOLD: f64 = 0.7;
pub(crate) const CAUGHT_HEALTH_PENALTY: f64 = 20.0;

// Intents ------------------------------------------------------------------
pub(crate) const LOCATION_DANGER_SANITY_STEP: i32 = 5;
pub(crate) const AMBUSH_THRESHOLD: f64 = 0.6;
// Ambush damage is deliberately flat across difficulties.
pub(crate) const AMBUSH_HEALTH_PENALTY: i32 = 15;
pub(crate) const TRAP_THRESHOLD: f64 = 0.7;
pub(crate) const TRAP_HEALTH_PENALTY: i32 = 10;
pub(crate) const TRAP_SANITY_PENALTY: i32 = 10;
pub(crate) const MEDICINE_HEALTH_RESTORE: i32 = 15;
pub(crate) const HIDE_SANITY_COST: i32 = 5;

// Endings ------------------------------------------------------------------
pub(crate) const SESSION_TIME_LIMIT_SECS: u32 = 300;
pub(crate) const RULE_VIOLATION_LIMIT: u32 = 5;
pub(crate) const SACRIFICE_CLUE_COUNT: u32 = 10;
pub(crate) const SACRIFICE_HEALTH_CEILING: i32 = 30;

// Achievements -------------------------------------------------------------
pub(crate) const SURVIVOR_TIME_SECS: u32 = 180;
pub(crate) const COLLECTOR_ITEM_COUNT: usize = 5;
pub(crate) const RULEBREAKER_VIOLATIONS: u32 = 3;
