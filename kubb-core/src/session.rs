//! Either kind of session, as the store and export files hold them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blast::BlastSession;
use crate::practice::PracticeSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    Practice(PracticeSession),
    InkastBlast(BlastSession),
}

impl Session {
    pub fn id(&self) -> Uuid {
        match self {
            Session::Practice(s) => s.id(),
            Session::InkastBlast(s) => s.id(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Session::Practice(s) => s.date(),
            Session::InkastBlast(s) => s.date(),
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        match self {
            Session::Practice(s) => s.start_time(),
            Session::InkastBlast(s) => s.start_time(),
        }
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        match self {
            Session::Practice(s) => s.modified_at(),
            Session::InkastBlast(s) => s.modified_at(),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Session::Practice(s) => s.is_complete(),
            Session::InkastBlast(s) => s.is_complete(),
        }
    }

    pub fn is_incomplete(&self, today: NaiveDate) -> bool {
        match self {
            Session::Practice(s) => s.is_incomplete(today),
            Session::InkastBlast(s) => s.is_incomplete(today),
        }
    }

    pub fn is_effectively_complete(&self, today: NaiveDate) -> bool {
        match self {
            Session::Practice(s) => s.is_effectively_complete(today),
            Session::InkastBlast(s) => s.is_effectively_complete(today),
        }
    }

    pub fn finalize_if_stale(&mut self, today: NaiveDate) -> bool {
        match self {
            Session::Practice(s) => s.finalize_if_stale(today),
            Session::InkastBlast(s) => s.finalize_if_stale(today),
        }
    }

    pub fn as_practice(&self) -> Option<&PracticeSession> {
        match self {
            Session::Practice(s) => Some(s),
            Session::InkastBlast(_) => None,
        }
    }

    pub fn as_blast(&self) -> Option<&BlastSession> {
        match self {
            Session::Practice(_) => None,
            Session::InkastBlast(s) => Some(s),
        }
    }
}

impl From<PracticeSession> for Session {
    fn from(session: PracticeSession) -> Self {
        Session::Practice(session)
    }
}

impl From<BlastSession> for Session {
    fn from(session: BlastSession) -> Self {
        Session::InkastBlast(session)
    }
}

/// Split a mixed history into finished practice and blast sessions, judged
/// as of `today`.
pub fn finished_sessions(
    sessions: &[Session],
    today: NaiveDate,
) -> (Vec<PracticeSession>, Vec<BlastSession>) {
    let mut practice = Vec::new();
    let mut blast = Vec::new();
    for session in sessions.iter().filter(|s| s.is_effectively_complete(today)) {
        match session {
            Session::Practice(s) => practice.push(s.clone()),
            Session::InkastBlast(s) => blast.push(s.clone()),
        }
    }
    (practice, blast)
}
