//! Game phases: named bands of kubb-count difficulty.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{KubbError, KubbResult};

/// An inclusive range of kubb counts a round may be generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawKubbRange")]
pub struct KubbRange {
    min: u32,
    max: u32,
}

#[derive(Deserialize)]
struct RawKubbRange {
    min: u32,
    max: u32,
}

impl TryFrom<RawKubbRange> for KubbRange {
    type Error = KubbError;

    fn try_from(raw: RawKubbRange) -> KubbResult<Self> {
        KubbRange::new(raw.min, raw.max)
    }
}

impl KubbRange {
    /// Build a range, rejecting empty or zero-based ones.
    pub fn new(min: u32, max: u32) -> KubbResult<Self> {
        if min == 0 || min > max {
            return Err(KubbError::MalformedInput(format!(
                "invalid kubb range {}..={}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, kubbs: u32) -> bool {
        (self.min..=self.max).contains(&kubbs)
    }
}

/// Difficulty band of an Inkast & Blast session.
///
/// `All` is a selection/filter value spanning every band. It is never the
/// result of [`phase_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Early,
    Mid,
    End,
    All,
}

impl GamePhase {
    /// The three bands a round can be classified into.
    pub const CLASSIFIED: [GamePhase; 3] = [GamePhase::Early, GamePhase::Mid, GamePhase::End];

    /// Kubb counts this phase generates rounds from.
    pub fn range(self) -> KubbRange {
        let (min, max) = match self {
            GamePhase::Early => (1, 3),
            GamePhase::Mid => (4, 7),
            GamePhase::End => (8, 10),
            GamePhase::All => (1, 10),
        };
        KubbRange { min, max }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GamePhase::Early => "Early Game",
            GamePhase::Mid => "Mid Game",
            GamePhase::End => "End Game",
            GamePhase::All => "All Phases",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.range();
        write!(f, "{} ({}-{})", self.display_name(), range.min, range.max)
    }
}

/// Classify a kubb count into Early (1-3), Mid (4-7) or End (8-10).
pub fn phase_of(kubbs: u32) -> Option<GamePhase> {
    match kubbs {
        1..=3 => Some(GamePhase::Early),
        4..=7 => Some(GamePhase::Mid),
        8..=10 => Some(GamePhase::End),
        _ => None,
    }
}

/// Draw an inkast kubb count uniformly from `range`.
pub fn random_inkast_count<R: Rng + ?Sized>(range: KubbRange, rng: &mut R) -> u32 {
    rng.gen_range(range.min..=range.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn deserialized_ranges_are_validated() {
        let range: KubbRange = serde_json::from_str(r#"{"min":4,"max":7}"#).unwrap();
        assert_eq!(range, GamePhase::Mid.range());
        assert!(serde_json::from_str::<KubbRange>(r#"{"min":5,"max":4}"#).is_err());
        assert!(serde_json::from_str::<KubbRange>(r#"{"min":0,"max":3}"#).is_err());
    }

    #[test]
    fn boundaries_split_at_three_and_seven() {
        assert_eq!(phase_of(3), Some(GamePhase::Early));
        assert_eq!(phase_of(4), Some(GamePhase::Mid));
        assert_eq!(phase_of(7), Some(GamePhase::Mid));
        assert_eq!(phase_of(8), Some(GamePhase::End));
        assert_eq!(phase_of(10), Some(GamePhase::End));
    }

    #[test]
    fn out_of_domain_counts_are_unclassified() {
        assert_eq!(phase_of(0), None);
        assert_eq!(phase_of(11), None);
    }

    #[test]
    fn all_is_never_a_classification() {
        for kubbs in 0..=20 {
            assert_ne!(phase_of(kubbs), Some(GamePhase::All));
        }
    }

    #[test]
    fn phase_ranges_match_classification() {
        for phase in GamePhase::CLASSIFIED {
            let range = phase.range();
            for kubbs in range.min()..=range.max() {
                assert_eq!(phase_of(kubbs), Some(phase));
            }
        }
        assert_eq!(GamePhase::All.range(), KubbRange::new(1, 10).unwrap());
    }

    #[test]
    fn display_includes_range() {
        assert_eq!(GamePhase::Mid.to_string(), "Mid Game (4-7)");
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(KubbRange::new(0, 3).is_err());
        assert!(KubbRange::new(5, 4).is_err());
        assert!(KubbRange::new(2, 2).is_ok());
    }

    #[test]
    fn random_counts_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for phase in [GamePhase::Early, GamePhase::Mid, GamePhase::End, GamePhase::All] {
            for _ in 0..50 {
                let kubbs = random_inkast_count(phase.range(), &mut rng);
                assert!(phase.range().contains(kubbs));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_one_to_ten_always_classified(kubbs in 1u32..=10) {
            prop_assert!(phase_of(kubbs).is_some());
        }

        #[test]
        fn prop_above_ten_never_classified(kubbs in 11u32..10_000) {
            prop_assert_eq!(phase_of(kubbs), None);
        }
    }
}
