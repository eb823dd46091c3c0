//! Standard 8-meter practice: six-throw rounds against five baseline kubbs
//! and sessions that run until a planned number of batons has been thrown.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{KubbError, KubbResult};
use crate::stats::ratio;
use crate::throw::{ThrowKind, ThrowRecord};
use crate::RoundStatus;

/// Batons available in one practice round.
pub const THROWS_PER_ROUND: u32 = 6;

/// Kubbs standing on the baseline at the start of a practice round.
pub const BASELINE_KUBBS: u32 = 5;

/// One six-throw practice round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeRound {
    round_number: u32,
    throws: Vec<ThrowRecord>,
    is_complete: bool,
}

impl PracticeRound {
    pub fn new(round_number: u32) -> Self {
        Self {
            round_number,
            throws: Vec::with_capacity(THROWS_PER_ROUND as usize),
            is_complete: false,
        }
    }

    /// Append a throw and report whether the round is now complete.
    ///
    /// The throw is a king throw iff the round stood at five hits from five
    /// throws before it was made.
    pub fn record_throw(&mut self, is_hit: bool) -> KubbResult<RoundStatus> {
        if self.is_complete {
            warn!("rejected throw on completed round {}", self.round_number);
            return Err(KubbError::RoundAlreadyComplete {
                round: self.round_number,
            });
        }

        let kind = self.next_throw_kind();
        let kubbs_hit = u32::from(is_hit && kind == ThrowKind::Kubb);
        let ordinal = self.total_throws() + 1;
        self.throws
            .push(ThrowRecord::new(is_hit, kubbs_hit, ordinal, kind));

        // Six throws end the round. "Five hits and six throws" is the same
        // condition and needs no separate check.
        if self.total_throws() >= THROWS_PER_ROUND {
            self.is_complete = true;
            debug!(
                "practice round {} complete: {}/{} hits",
                self.round_number,
                self.hits(),
                self.total_throws()
            );
            return Ok(RoundStatus::Complete);
        }
        Ok(RoundStatus::Open)
    }

    /// How the next throw will be classified, given the throws so far.
    pub fn next_throw_kind(&self) -> ThrowKind {
        if self.hits() == BASELINE_KUBBS && self.total_throws() == BASELINE_KUBBS {
            ThrowKind::King
        } else {
            ThrowKind::Kubb
        }
    }

    /// Clear every throw, keeping the round number.
    pub fn reset(&mut self) {
        self.throws.clear();
        self.is_complete = false;
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn throws(&self) -> &[ThrowRecord] {
        &self.throws
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn total_throws(&self) -> u32 {
        self.throws.len() as u32
    }

    pub fn hits(&self) -> u32 {
        self.throws.iter().filter(|t| t.is_hit()).count() as u32
    }

    pub fn misses(&self) -> u32 {
        self.total_throws() - self.hits()
    }

    pub fn kubbs_hit(&self) -> u32 {
        self.throws.iter().map(ThrowRecord::kubbs_hit).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.hits(), self.total_throws())
    }

    /// All five baseline kubbs went down.
    pub fn has_baseline_clear(&self) -> bool {
        self.hits() >= BASELINE_KUBBS
    }

    /// Six hits from six throws, king included.
    pub fn is_perfect(&self) -> bool {
        self.total_throws() == THROWS_PER_ROUND && self.hits() == THROWS_PER_ROUND
    }

    pub fn king_throws(&self) -> u32 {
        self.throws.iter().filter(|t| t.is_king()).count() as u32
    }

    pub fn king_hits(&self) -> u32 {
        self.throws
            .iter()
            .filter(|t| t.is_king() && t.is_hit())
            .count() as u32
    }

    pub fn king_accuracy(&self) -> f64 {
        ratio(self.king_hits(), self.king_throws())
    }
}

/// A practice session: rounds of six throws until `target` batons are thrown.
///
/// `total_batons` and `total_kubbs` are running sums updated in the same call
/// that appends or clears throws, so they always match the rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSession {
    id: Uuid,
    date: NaiveDate,
    target: u32,
    total_kubbs: u32,
    total_batons: u32,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    modified_at: DateTime<Utc>,
    is_complete: bool,
    is_paused: bool,
    rounds: Vec<PracticeRound>,
    active_round: usize,
}

impl PracticeSession {
    /// Start a session planned for `target` throws, dated today.
    pub fn new(target: u32) -> KubbResult<Self> {
        Self::starting_at(target, Utc::now())
    }

    /// Start a session whose clock began at `start_time`.
    pub fn starting_at(target: u32, start_time: DateTime<Utc>) -> KubbResult<Self> {
        if target == 0 {
            return Err(KubbError::MalformedInput(
                "practice target must be at least one throw".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            date: start_time.date_naive(),
            target,
            total_kubbs: 0,
            total_batons: 0,
            start_time,
            end_time: None,
            modified_at: start_time,
            is_complete: false,
            is_paused: false,
            rounds: vec![PracticeRound::new(1)],
            active_round: 0,
        })
    }

    /// Record a throw on the active round.
    pub fn record_throw(&mut self, is_hit: bool) -> KubbResult<RoundStatus> {
        self.ensure_open()?;
        let index = self.active_round;
        let round = self
            .rounds
            .get_mut(index)
            .ok_or(KubbError::NoActiveRound { index })?;
        let status = round.record_throw(is_hit)?;
        let kubbs = round.throws().last().map_or(0, ThrowRecord::kubbs_hit);

        self.total_batons += 1;
        self.total_kubbs += kubbs;
        self.touch();

        if self.is_target_reached() {
            debug!(
                "practice session {} reached target of {} throws",
                self.id, self.target
            );
        }
        Ok(status)
    }

    /// Open round `n + 1` once round `n` is complete. Returns the new number.
    pub fn start_next_round(&mut self) -> KubbResult<u32> {
        self.ensure_open()?;
        let index = self.active_round;
        let current = self
            .active_round()
            .ok_or(KubbError::NoActiveRound { index })?;
        if !current.is_complete() {
            warn!("round {} still open, not advancing", current.round_number());
            return Err(KubbError::RoundStillOpen {
                round: current.round_number(),
            });
        }

        let next = current.round_number() + 1;
        self.rounds.push(PracticeRound::new(next));
        self.active_round = self.rounds.len() - 1;
        self.touch();
        debug!("practice session {} advanced to round {}", self.id, next);
        Ok(next)
    }

    /// Clear the active round and take its throws back out of the totals.
    ///
    /// Totals are recounted from the rounds, so a snapshot loaded with
    /// drifted totals is repaired rather than underflowing.
    pub fn reset_current_round(&mut self) -> KubbResult<()> {
        self.ensure_open()?;
        let index = self.active_round;
        let round = self
            .rounds
            .get_mut(index)
            .ok_or(KubbError::NoActiveRound { index })?;

        round.reset();
        self.recount_totals();
        self.touch();
        Ok(())
    }

    /// Suspend without finalizing. Does not stamp `end_time`.
    pub fn pause_session(&mut self) -> KubbResult<()> {
        self.ensure_open()?;
        self.is_paused = true;
        self.touch();
        Ok(())
    }

    pub fn resume_session(&mut self) -> KubbResult<()> {
        self.ensure_open()?;
        self.is_paused = false;
        self.touch();
        Ok(())
    }

    pub fn complete_session(&mut self) -> KubbResult<()> {
        self.ensure_open()?;
        let now = Utc::now();
        self.is_complete = true;
        self.is_paused = false;
        self.end_time = Some(now);
        self.modified_at = now;
        debug!("practice session {} complete", self.id);
        Ok(())
    }

    /// Stamp `end_time` without marking the session complete.
    pub fn end_session_early(&mut self) -> KubbResult<()> {
        self.ensure_open()?;
        let now = Utc::now();
        self.end_time = Some(now);
        self.modified_at = now;
        Ok(())
    }

    /// Resumable: dated `today`, not complete, and paused or short of target.
    pub fn is_incomplete(&self, today: NaiveDate) -> bool {
        !self.is_complete && self.date == today && (self.is_paused || !self.is_target_reached())
    }

    /// Read-only view: whatever is not resumable counts as complete.
    pub fn is_effectively_complete(&self, today: NaiveDate) -> bool {
        self.is_complete || !self.is_incomplete(today)
    }

    /// Mark a session from an earlier day complete. Leaves `modified_at`
    /// alone so external sync state stays valid. Returns whether it changed.
    pub fn finalize_if_stale(&mut self, today: NaiveDate) -> bool {
        if self.is_complete || self.date == today {
            return false;
        }
        self.is_complete = true;
        self.is_paused = false;
        debug!("auto-finalized stale practice session {}", self.id);
        true
    }

    fn ensure_open(&self) -> KubbResult<()> {
        if self.is_complete {
            warn!("rejected operation on completed session {}", self.id);
            return Err(KubbError::SessionComplete);
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    fn recount_totals(&mut self) {
        self.total_batons = self.rounds.iter().map(PracticeRound::total_throws).sum();
        self.total_kubbs = self.rounds.iter().map(PracticeRound::kubbs_hit).sum();
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn total_kubbs(&self) -> u32 {
        self.total_kubbs
    }

    pub fn total_batons(&self) -> u32 {
        self.total_batons
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn rounds(&self) -> &[PracticeRound] {
        &self.rounds
    }

    pub fn active_round(&self) -> Option<&PracticeRound> {
        self.rounds.get(self.active_round)
    }

    pub fn active_round_index(&self) -> usize {
        self.active_round
    }

    pub fn is_target_reached(&self) -> bool {
        self.total_batons >= self.target
    }

    pub fn remaining_throws(&self) -> u32 {
        self.target.saturating_sub(self.total_batons)
    }

    pub fn hits(&self) -> u32 {
        self.rounds.iter().map(PracticeRound::hits).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.hits(), self.total_batons)
    }

    pub fn completed_rounds(&self) -> u32 {
        self.rounds.iter().filter(|r| r.is_complete()).count() as u32
    }

    pub fn baseline_clears(&self) -> u32 {
        self.rounds.iter().filter(|r| r.has_baseline_clear()).count() as u32
    }

    pub fn perfect_rounds(&self) -> u32 {
        self.rounds.iter().filter(|r| r.is_perfect()).count() as u32
    }

    pub fn king_throws(&self) -> u32 {
        self.rounds.iter().map(PracticeRound::king_throws).sum()
    }

    pub fn king_hits(&self) -> u32 {
        self.rounds.iter().map(PracticeRound::king_hits).sum()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Running totals agree with the recorded throws.
    pub fn totals_consistent(&self) -> bool {
        let batons: u32 = self.rounds.iter().map(PracticeRound::total_throws).sum();
        let kubbs: u32 = self.rounds.iter().map(PracticeRound::kubbs_hit).sum();
        batons == self.total_batons && kubbs == self.total_kubbs
    }
}
