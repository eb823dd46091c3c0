//! Tunable constants for the statistics engine.

use serde::{Deserialize, Serialize};

/// Thresholds used by the statistics engine. Every key is optional when
/// parsed from JSON; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Sessions counted as "recent" for form comparisons.
    pub recent_window: usize,
    /// Lowest running hit count (before the throw) that counts as clutch.
    pub clutch_min_hits: u32,
    /// Highest running hit count (before the throw) that counts as clutch.
    pub clutch_max_hits: u32,
    /// Rounds numbered up to this are early rounds; later ones are late.
    pub early_round_limit: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            recent_window: 5,
            clutch_min_hits: 3,
            clutch_max_hits: 4,
            early_round_limit: 3,
        }
    }
}

impl StatsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_clutch(&self, hits_before: u32) -> bool {
        (self.clutch_min_hits..=self.clutch_max_hits).contains(&hits_before)
    }
}
