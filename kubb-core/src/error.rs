//! Error types for round, session and store operations.

use uuid::Uuid;

/// Result type for rule-engine operations.
pub type KubbResult<T> = Result<T, KubbError>;

/// Result type for session store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Rejections raised by rounds and sessions.
///
/// A rejected operation never touches any counter, so the caller can retry
/// with valid input or abandon the round.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KubbError {
    #[error("round {round} is already complete")]
    RoundAlreadyComplete { round: u32 },

    #[error("round {round} is still open")]
    RoundStillOpen { round: u32 },

    #[error("session is already complete")]
    SessionComplete,

    #[error("inkast results for round {round} have not been recorded")]
    InkastNotRecorded { round: u32 },

    #[error("inkast results for round {round} were already recorded")]
    InkastAlreadyRecorded { round: u32 },

    #[error("session has no active round at index {index}")]
    NoActiveRound { index: usize },

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl From<&str> for KubbError {
    fn from(s: &str) -> Self {
        KubbError::MalformedInput(s.to_string())
    }
}

/// Failures of the session store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("session {0} not found")]
    NotFound(Uuid),

    #[error("store lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_human_readable_text() {
        assert_eq!(
            KubbError::RoundAlreadyComplete { round: 2 }.to_string(),
            "round 2 is already complete"
        );
        assert_eq!(
            KubbError::from("negative kubbs").to_string(),
            "malformed input: negative kubbs"
        );
        assert_eq!(
            KubbError::NoActiveRound { index: 3 }.to_string(),
            "session has no active round at index 3"
        );
    }

    #[test]
    fn json_errors_convert_into_store_errors() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let store: StoreError = err.into();
        assert!(matches!(store, StoreError::Serialization(_)));
    }
}
