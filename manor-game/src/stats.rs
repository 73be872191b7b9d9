//! Cross-session aggregate statistics.
//!
//! The aggregate record is fed exactly once per completed session, when the
//! player leaves the ending screen; the engine never touches it mid-session.
//! Persistence is an opaque string blob: a missing or corrupted blob decodes
//! to the zeroed default rather than an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::Ending;

/// Occurrence count per terminal outcome. One field per `Ending` variant,
/// so a new ending cannot be forgotten here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EndingCounts {
    #[serde(default)]
    pub insanity: u32,
    #[serde(default)]
    pub caught: u32,
    #[serde(default)]
    pub exhaustion: u32,
    #[serde(default)]
    pub cursed: u32,
    #[serde(default)]
    pub sacrifice: u32,
}

impl EndingCounts {
    #[must_use]
    pub const fn count(&self, ending: Ending) -> u32 {
        match ending {
            Ending::Insanity => self.insanity,
            Ending::Caught => self.caught,
            Ending::Exhaustion => self.exhaustion,
            Ending::Cursed => self.cursed,
            Ending::Sacrifice => self.sacrifice,
        }
    }

    const fn count_mut(&mut self, ending: Ending) -> &mut u32 {
        match ending {
            Ending::Insanity => &mut self.insanity,
            Ending::Caught => &mut self.caught,
            Ending::Exhaustion => &mut self.exhaustion,
            Ending::Cursed => &mut self.cursed,
            Ending::Sacrifice => &mut self.sacrifice,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.insanity + self.caught + self.exhaustion + self.cursed + self.sacrifice
    }
}

/// Process-wide totals across playthroughs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AggregateStats {
    #[serde(default)]
    pub total_games: u32,
    /// Sum of survival times, in simulated seconds.
    #[serde(default)]
    pub total_time: u64,
    #[serde(default)]
    pub best_survival_time: u32,
    #[serde(default)]
    pub items_collected: u32,
    #[serde(default)]
    pub rules_violated: u32,
    #[serde(default)]
    pub endings: EndingCounts,
}

impl AggregateStats {
    /// Fold one completed session into the totals.
    ///
    /// Callers are expected to invoke this exactly once per ending; the
    /// engine does not deduplicate, so a double call double-counts.
    pub fn record_completed_session(
        &mut self,
        time_elapsed: u32,
        items_collected: u32,
        rules_violated: u32,
        ending: Ending,
    ) {
        self.total_games += 1;
        self.total_time += u64::from(time_elapsed);
        self.best_survival_time = self.best_survival_time.max(time_elapsed);
        self.items_collected += items_collected;
        self.rules_violated += rules_violated;
        *self.endings.count_mut(ending) += 1;
    }

    /// Decode a persisted blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not a valid aggregate record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Decode a persisted blob, treating a missing or corrupted one as the
    /// zeroed default.
    #[must_use]
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        json.and_then(|blob| Self::from_json(blob).ok())
            .unwrap_or_default()
    }

    /// Encode for persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Failure to push the aggregate record into the backing store.
#[derive(Debug, Error)]
pub enum StatsPersistError<E>
where
    E: std::error::Error + 'static,
{
    /// The aggregate record could not be encoded for storage.
    #[error("failed to encode aggregate stats: {0}")]
    Encode(#[from] serde_json::Error),
    /// The backing store rejected the write.
    #[error("stats store write failed: {0}")]
    Store(#[source] E),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_totals_and_bests() {
        let mut stats = AggregateStats::default();
        stats.record_completed_session(120, 3, 1, Ending::Caught);
        stats.record_completed_session(45, 0, 5, Ending::Cursed);
        stats.record_completed_session(300, 7, 0, Ending::Exhaustion);

        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.total_time, 465);
        assert_eq!(stats.best_survival_time, 300);
        assert_eq!(stats.items_collected, 10);
        assert_eq!(stats.rules_violated, 6);
        assert_eq!(stats.endings.count(Ending::Caught), 1);
        assert_eq!(stats.endings.count(Ending::Cursed), 1);
        assert_eq!(stats.endings.count(Ending::Exhaustion), 1);
        assert_eq!(stats.endings.total(), 3);
    }

    #[test]
    fn best_survival_time_never_regresses() {
        let mut stats = AggregateStats::default();
        stats.record_completed_session(200, 0, 0, Ending::Insanity);
        stats.record_completed_session(30, 0, 0, Ending::Insanity);
        assert_eq!(stats.best_survival_time, 200);
    }

    #[test]
    fn blob_round_trips() {
        let mut stats = AggregateStats::default();
        stats.record_completed_session(77, 2, 4, Ending::Sacrifice);
        let blob = stats.to_json().unwrap();
        assert_eq!(AggregateStats::from_json(&blob).unwrap(), stats);
    }

    #[test]
    fn corrupted_blob_falls_back_to_default() {
        assert_eq!(
            AggregateStats::from_json_or_default(Some("{not json")),
            AggregateStats::default()
        );
        assert_eq!(
            AggregateStats::from_json_or_default(Some("[1, 2, 3]")),
            AggregateStats::default()
        );
        assert_eq!(
            AggregateStats::from_json_or_default(None),
            AggregateStats::default()
        );
    }

    #[test]
    fn partial_blob_fills_missing_fields() {
        let stats = AggregateStats::from_json_or_default(Some(r#"{"total_games": 9}"#));
        assert_eq!(stats.total_games, 9);
        assert_eq!(stats.best_survival_time, 0);
        assert_eq!(stats.endings, EndingCounts::default());
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut stats = AggregateStats::default();
        stats.record_completed_session(10, 1, 1, Ending::Caught);
        stats.reset();
        assert_eq!(stats, AggregateStats::default());
    }
}
