//! Inkast & Blast: rounds with a variable number of kubbs that are first
//! tossed into the field and then cleared with as few batons as possible.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{KubbError, KubbResult};
use crate::phase::{random_inkast_count, GamePhase, KubbRange};
use crate::stats::blast::Handicap;
use crate::stats::ratio;
use crate::throw::{ThrowKind, ThrowRecord};
use crate::RoundStatus;

/// Par for clearing `inkast_kubbs` kubbs.
pub fn target_batons(inkast_kubbs: u32) -> u32 {
    match inkast_kubbs {
        0..=2 => 1,
        3..=4 => 2,
        5..=7 => 3,
        8..=10 => 4,
        n => (n + 1).div_ceil(2),
    }
}

/// One Inkast & Blast round.
///
/// Setup happens in two steps: [`record_inkast_results`] once, then
/// [`add_baton_throw`] until every kubb on the field, penalty kubbs
/// included, has been knocked down.
///
/// [`record_inkast_results`]: BlastRound::record_inkast_results
/// [`add_baton_throw`]: BlastRound::add_baton_throw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastRound {
    round_number: u32,
    inkast_kubbs: u32,
    kubbs_out_first_attempt: u32,
    kubbs_out_second_attempt: u32,
    neighbor_kubbs: u32,
    inkast_recorded: bool,
    throws: Vec<ThrowRecord>,
    is_complete: bool,
}

impl BlastRound {
    pub fn new(round_number: u32, inkast_kubbs: u32) -> KubbResult<Self> {
        if inkast_kubbs == 0 {
            return Err(KubbError::MalformedInput(
                "a round needs at least one kubb".to_string(),
            ));
        }
        Ok(Self {
            round_number,
            inkast_kubbs,
            kubbs_out_first_attempt: 0,
            kubbs_out_second_attempt: 0,
            neighbor_kubbs: 0,
            inkast_recorded: false,
            throws: Vec::new(),
            is_complete: false,
        })
    }

    /// A round with a kubb count drawn from `range`.
    pub fn generate<R: Rng + ?Sized>(round_number: u32, range: KubbRange, rng: &mut R) -> Self {
        let inkast_kubbs = random_inkast_count(range, rng);
        Self {
            round_number,
            inkast_kubbs,
            kubbs_out_first_attempt: 0,
            kubbs_out_second_attempt: 0,
            neighbor_kubbs: 0,
            inkast_recorded: false,
            throws: Vec::new(),
            is_complete: false,
        }
    }

    /// Record where the inkast landed. Kubbs still out after the second
    /// attempt become penalty kubbs.
    pub fn record_inkast_results(
        &mut self,
        first_attempt_out: u32,
        second_attempt_out: u32,
        neighbors: u32,
    ) -> KubbResult<()> {
        if self.is_complete {
            return Err(KubbError::RoundAlreadyComplete {
                round: self.round_number,
            });
        }
        if self.inkast_recorded {
            return Err(KubbError::InkastAlreadyRecorded {
                round: self.round_number,
            });
        }
        if first_attempt_out > self.inkast_kubbs {
            return Err(KubbError::MalformedInput(format!(
                "{} kubbs out of bounds but only {} thrown",
                first_attempt_out, self.inkast_kubbs
            )));
        }
        if second_attempt_out > first_attempt_out {
            return Err(KubbError::MalformedInput(format!(
                "{} kubbs out on the second attempt but only {} rethrown",
                second_attempt_out, first_attempt_out
            )));
        }
        if neighbors > self.inkast_kubbs {
            return Err(KubbError::MalformedInput(format!(
                "{} neighbor kubbs but only {} thrown",
                neighbors, self.inkast_kubbs
            )));
        }

        self.kubbs_out_first_attempt = first_attempt_out;
        self.kubbs_out_second_attempt = second_attempt_out;
        self.neighbor_kubbs = neighbors;
        self.inkast_recorded = true;
        Ok(())
    }

    /// Throw one baton. A miss always counts zero kubbs; a hit claiming more
    /// kubbs than remain is clamped to what remains.
    pub fn add_baton_throw(&mut self, is_hit: bool, kubbs_hit: u32) -> KubbResult<RoundStatus> {
        if self.is_complete {
            warn!("rejected baton on completed round {}", self.round_number);
            return Err(KubbError::RoundAlreadyComplete {
                round: self.round_number,
            });
        }
        if !self.inkast_recorded {
            return Err(KubbError::InkastNotRecorded {
                round: self.round_number,
            });
        }

        let remaining = self.kubbs_remaining();
        let kubbs = if !is_hit {
            0
        } else if kubbs_hit > remaining {
            warn!(
                "round {}: {} kubbs claimed with {} remaining, clamping",
                self.round_number, kubbs_hit, remaining
            );
            remaining
        } else {
            kubbs_hit
        };
        let ordinal = self.batons_used() + 1;
        self.throws
            .push(ThrowRecord::new(is_hit, kubbs, ordinal, ThrowKind::Kubb));

        if self.kubbs_cleared() >= self.clearing_target() {
            self.is_complete = true;
            debug!(
                "blast round {} complete: {} kubbs in {} batons (par {})",
                self.round_number,
                self.inkast_kubbs,
                self.batons_used(),
                self.target_batons()
            );
            return Ok(RoundStatus::Complete);
        }
        Ok(RoundStatus::Open)
    }

    /// Back to Open: no inkast results, no throws.
    pub fn reset(&mut self) {
        self.kubbs_out_first_attempt = 0;
        self.kubbs_out_second_attempt = 0;
        self.neighbor_kubbs = 0;
        self.inkast_recorded = false;
        self.throws.clear();
        self.is_complete = false;
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn inkast_kubbs(&self) -> u32 {
        self.inkast_kubbs
    }

    pub fn kubbs_out_first_attempt(&self) -> u32 {
        self.kubbs_out_first_attempt
    }

    pub fn kubbs_out_second_attempt(&self) -> u32 {
        self.kubbs_out_second_attempt
    }

    /// Same as the second-attempt outs.
    pub fn penalty_kubbs(&self) -> u32 {
        self.kubbs_out_second_attempt
    }

    pub fn neighbor_kubbs(&self) -> u32 {
        self.neighbor_kubbs
    }

    pub fn inkast_recorded(&self) -> bool {
        self.inkast_recorded
    }

    pub fn throws(&self) -> &[ThrowRecord] {
        &self.throws
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn total_kubbs_in_bounds(&self) -> u32 {
        self.inkast_kubbs.saturating_sub(self.penalty_kubbs())
    }

    /// In-bounds kubbs plus penalty kubbs.
    pub fn clearing_target(&self) -> u32 {
        self.total_kubbs_in_bounds() + self.penalty_kubbs()
    }

    /// Cumulative kubbs knocked down over every baton of the round.
    pub fn kubbs_cleared(&self) -> u32 {
        self.throws.iter().map(ThrowRecord::kubbs_hit).sum()
    }

    pub fn kubbs_remaining(&self) -> u32 {
        self.clearing_target().saturating_sub(self.kubbs_cleared())
    }

    /// Kubbs that landed in bounds on the first inkast attempt.
    pub fn first_cast_in_bounds(&self) -> u32 {
        self.inkast_kubbs.saturating_sub(self.kubbs_out_first_attempt)
    }

    pub fn kubbs_out_of_bounds(&self) -> u32 {
        self.kubbs_out_first_attempt + self.kubbs_out_second_attempt
    }

    pub fn batons_used(&self) -> u32 {
        self.throws.len() as u32
    }

    pub fn misses(&self) -> u32 {
        self.throws.iter().filter(|t| !t.is_hit()).count() as u32
    }

    /// Kubbs knocked down by the very first baton.
    pub fn initial_blast(&self) -> u32 {
        self.throws.first().map_or(0, ThrowRecord::kubbs_hit)
    }

    pub fn target_batons(&self) -> u32 {
        target_batons(self.inkast_kubbs)
    }

    /// Positive when finished under par, negative when over.
    pub fn performance_vs_target(&self) -> i32 {
        self.target_batons() as i32 - self.batons_used() as i32
    }

    pub fn kubbs_per_baton(&self) -> f64 {
        ratio(self.kubbs_cleared(), self.batons_used())
    }

    pub fn phase(&self) -> Option<GamePhase> {
        crate::phase::phase_of(self.inkast_kubbs)
    }
}

/// Running totals of an Inkast & Blast session, one field per round metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastTotals {
    pub total_rounds: u32,
    pub total_inkast_kubbs: u32,
    pub total_kubbs_cleared: u32,
    pub total_batons_used: u32,
    pub total_penalty_kubbs: u32,
    pub total_neighbor_kubbs: u32,
    pub total_misses: u32,
}

impl BlastTotals {
    pub fn record(&mut self, round: &BlastRound) {
        self.total_rounds += 1;
        self.total_inkast_kubbs += round.inkast_kubbs();
        self.total_kubbs_cleared += round.kubbs_cleared();
        self.total_batons_used += round.batons_used();
        self.total_penalty_kubbs += round.penalty_kubbs();
        self.total_neighbor_kubbs += round.neighbor_kubbs();
        self.total_misses += round.misses();
    }

    pub fn merge(&mut self, other: &BlastTotals) {
        self.total_rounds += other.total_rounds;
        self.total_inkast_kubbs += other.total_inkast_kubbs;
        self.total_kubbs_cleared += other.total_kubbs_cleared;
        self.total_batons_used += other.total_batons_used;
        self.total_penalty_kubbs += other.total_penalty_kubbs;
        self.total_neighbor_kubbs += other.total_neighbor_kubbs;
        self.total_misses += other.total_misses;
    }
}

/// An Inkast & Blast session. Only complete rounds are folded in, so the
/// totals never contain a partial round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastSession {
    id: Uuid,
    date: NaiveDate,
    game_phase: GamePhase,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    modified_at: DateTime<Utc>,
    is_complete: bool,
    is_paused: bool,
    totals: BlastTotals,
    rounds: Vec<BlastRound>,
}

impl BlastSession {
    pub fn new(game_phase: GamePhase) -> Self {
        Self::starting_at(game_phase, Utc::now())
    }

    pub fn starting_at(game_phase: GamePhase, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: start_time.date_naive(),
            game_phase,
            start_time,
            end_time: None,
            modified_at: start_time,
            is_complete: false,
            is_paused: false,
            totals: BlastTotals::default(),
            rounds: Vec::new(),
        }
    }

    pub fn next_round_number(&self) -> u32 {
        self.rounds.len() as u32 + 1
    }

    /// A fresh round for this session's phase.
    pub fn generate_round<R: Rng + ?Sized>(&self, rng: &mut R) -> BlastRound {
        BlastRound::generate(self.next_round_number(), self.game_phase.range(), rng)
    }

    /// Fold a finished round into the session.
    pub fn add_round(&mut self, round: BlastRound) -> KubbResult<()> {
        self.ensure_open()?;
        if !round.is_complete() {
            warn!("refusing to add open round {}", round.round_number());
            return Err(KubbError::RoundStillOpen {
                round: round.round_number(),
            });
        }

        self.totals.record(&round);
        self.rounds.push(round);
        self.touch();
        debug!(
            "blast session {} now has {} rounds",
            self.id, self.totals.total_rounds
        );
        Ok(())
    }

    /// Suspend and stamp `end_time` as the last-active marker.
    pub fn pause_session(&mut self) -> KubbResult<()> {
        self.ensure_open()?;
        let now = Utc::now();
        self.is_paused = true;
        self.end_time = Some(now);
        self.modified_at = now;
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
        debug!("blast session {} complete", self.id);
        Ok(())
    }

    pub fn end_session_early(&mut self) -> KubbResult<()> {
        self.ensure_open()?;
        let now = Utc::now();
        self.end_time = Some(now);
        self.modified_at = now;
        Ok(())
    }

    /// When the session was last active: the end-time marker, else the start.
    pub fn last_active(&self) -> DateTime<Utc> {
        self.end_time.unwrap_or(self.start_time)
    }

    /// Resumable: not complete and last active `today`.
    pub fn is_incomplete(&self, today: NaiveDate) -> bool {
        !self.is_complete && self.last_active().date_naive() == today
    }

    pub fn is_effectively_complete(&self, today: NaiveDate) -> bool {
        self.is_complete || self.last_active().date_naive() != today
    }

    /// Mark a stale session complete without touching `modified_at`.
    pub fn finalize_if_stale(&mut self, today: NaiveDate) -> bool {
        if self.is_complete || self.last_active().date_naive() == today {
            return false;
        }
        self.is_complete = true;
        self.is_paused = false;
        debug!("auto-finalized stale blast session {}", self.id);
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

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn game_phase(&self) -> GamePhase {
        self.game_phase
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

    pub fn totals(&self) -> &BlastTotals {
        &self.totals
    }

    pub fn rounds(&self) -> &[BlastRound] {
        &self.rounds
    }

    pub fn average_kubbs_per_baton(&self) -> f64 {
        ratio(self.totals.total_kubbs_cleared, self.totals.total_batons_used)
    }

    pub fn penalty_rate(&self) -> f64 {
        ratio(self.totals.total_penalty_kubbs, self.totals.total_inkast_kubbs)
    }

    pub fn neighbor_rate(&self) -> f64 {
        ratio(self.totals.total_neighbor_kubbs, self.totals.total_inkast_kubbs)
    }

    pub fn kubbs_out_of_bounds(&self) -> u32 {
        self.rounds.iter().map(BlastRound::kubbs_out_of_bounds).sum()
    }

    pub fn handicap(&self) -> Handicap {
        Handicap::from_rounds(self.rounds.iter())
    }

    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}
