//! Rule engine for Kubb training sessions.
//!
//! Two practice modes share the same shape: a session owns rounds, a round
//! owns throws, and every mutation goes through one append entry point per
//! aggregate so the running totals can never drift from the details.
//!
//! - [`practice`]: 8-meter practice, six throws per round at five kubbs.
//! - [`blast`]: Inkast & Blast, variable kubb counts cleared against par.
//! - [`stats`]: pure statistics over finished sessions.

pub mod blast;
pub mod config;
pub mod error;
pub mod phase;
pub mod practice;
pub mod session;
pub mod sim;
pub mod stats;
pub mod storage;
pub mod throw;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use blast::{target_batons, BlastRound, BlastSession, BlastTotals};
pub use config::StatsConfig;
pub use error::{KubbError, KubbResult, StoreError, StoreResult};
pub use phase::{phase_of, random_inkast_count, GamePhase, KubbRange};
pub use practice::{PracticeRound, PracticeSession};
pub use session::Session;
pub use sim::{BlastContext, InkastOutcome, ThrowContext, Thrower};
pub use storage::{MemoryStore, SessionStore};
pub use throw::{ThrowKind, ThrowRecord};

/// Re-export for throwers to use.
pub use rand::RngCore;

/// Where a round stands after a throw was appended.
///
/// Rounds only move from `Open` to `Complete`; the way back is an explicit
/// reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Open,
    Complete,
}

impl RoundStatus {
    pub fn is_complete(self) -> bool {
        self == RoundStatus::Complete
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundStatus::Open => write!(f, "open"),
            RoundStatus::Complete => write!(f, "complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_status_displays_human_readable_text() {
        assert_eq!(RoundStatus::Open.to_string(), "open");
        assert_eq!(RoundStatus::Complete.to_string(), "complete");
        assert!(RoundStatus::Complete.is_complete());
    }

    #[test]
    fn full_practice_flow_through_public_api() {
        let mut session = PracticeSession::new(12).unwrap();
        let mut statuses = Vec::new();
        for _ in 0..6 {
            statuses.push(session.record_throw(true).unwrap());
        }
        assert_eq!(statuses.last(), Some(&RoundStatus::Complete));
        session.start_next_round().unwrap();
        for _ in 0..6 {
            session.record_throw(false).unwrap();
        }
        session.complete_session().unwrap();

        let store = MemoryStore::new();
        store.save(&Session::from(session.clone())).unwrap();
        let history = store.load_all().unwrap();
        let (practice, _) =
            session::finished_sessions(&history, chrono::Utc::now().date_naive());

        let stats = stats::practice::practice_stats(&practice, &StatsConfig::default());
        assert_eq!(stats.total_throws, 12);
        assert_eq!(stats.total_hits, 6);
        assert_eq!(stats.records.perfect_rounds, 1);
        assert_eq!(stats.streak.best, 6);
        assert_eq!(stats.streak.current, 0);
    }
}
