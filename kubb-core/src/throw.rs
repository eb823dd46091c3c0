//! Immutable records of single baton throws.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a practice throw was aimed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrowKind {
    #[default]
    Kubb,
    /// The bonus sixth throw after a clean five-for-five baseline.
    King,
}

/// One baton throw. Created once when the throw is appended to its round and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowRecord {
    is_hit: bool,
    kubbs_hit: u32,
    ordinal: u32,
    #[serde(default)]
    kind: ThrowKind,
    timestamp: DateTime<Utc>,
}

impl ThrowRecord {
    /// Only rounds create records; a miss never carries kubbs.
    pub(crate) fn new(is_hit: bool, kubbs_hit: u32, ordinal: u32, kind: ThrowKind) -> Self {
        Self {
            is_hit,
            kubbs_hit: if is_hit { kubbs_hit } else { 0 },
            ordinal,
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.is_hit
    }

    pub fn kubbs_hit(&self) -> u32 {
        self.kubbs_hit
    }

    /// 1-based position within the owning round.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn kind(&self) -> ThrowKind {
        self.kind
    }

    pub fn is_king(&self) -> bool {
        self.kind == ThrowKind::King
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misses_never_carry_kubbs() {
        let record = ThrowRecord::new(false, 4, 1, ThrowKind::Kubb);
        assert!(!record.is_hit());
        assert_eq!(record.kubbs_hit(), 0);
    }

    #[test]
    fn kind_defaults_to_kubb_when_missing() {
        let json = r#"{"is_hit":true,"kubbs_hit":1,"ordinal":2,"timestamp":"2024-05-01T10:00:00Z"}"#;
        let record: ThrowRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind(), ThrowKind::Kubb);
        assert_eq!(record.ordinal(), 2);
    }
}
